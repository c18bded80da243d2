use alloy_primitives::{Address, B256, U256};
use lh_types::SignedRoot;
use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use tree_hash_derive::TreeHash;

use crate::{
    error::SigError, BlsPublicKey, BlsPublicKeyBytes, BlsSignature, BlsSignatureBytes,
    ExecutionPayload,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode, TreeHash)]
#[serde(deny_unknown_fields)]
pub struct BidTrace {
    /// The slot associated with the block.
    #[serde(with = "serde_utils::quoted_u64")]
    pub slot: u64,
    /// The parent hash of the block.
    pub parent_hash: B256,
    /// The hash of the block.
    pub block_hash: B256,
    /// The public key of the builder.
    pub builder_pubkey: BlsPublicKeyBytes,
    /// The public key of the proposer.
    pub proposer_pubkey: BlsPublicKeyBytes,
    /// The recipient of the proposer's fee.
    pub proposer_fee_recipient: Address,
    /// The gas limit associated with the block.
    #[serde(with = "serde_utils::quoted_u64")]
    pub gas_limit: u64,
    /// The gas used within the block.
    #[serde(with = "serde_utils::quoted_u64")]
    pub gas_used: u64,
    /// The value associated with the block.
    #[serde(with = "serde_utils::quoted_u256")]
    pub value: U256,
}

impl SignedRoot for BidTrace {}

/// Request object of POST `/relay/v1/builder/blocks`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignedBidSubmission {
    pub message: BidTrace,
    pub execution_payload: ExecutionPayload,
    pub signature: BlsSignatureBytes,
}

impl SignedBidSubmission {
    pub fn verify_signature(&self, builder_domain: B256) -> Result<(), SigError> {
        let builder_pubkey = BlsPublicKey::deserialize(self.message.builder_pubkey.as_serialized())
            .map_err(|_| SigError::InvalidBlsPubkeyBytes)?;
        let signature = BlsSignature::deserialize(self.signature.serialize().as_slice())
            .map_err(|_| SigError::InvalidBlsSignatureBytes)?;

        let message = self.message.signing_root(builder_domain);
        if !signature.verify(&builder_pubkey, message) {
            return Err(SigError::InvalidBlsSignature);
        }

        Ok(())
    }

    pub fn block_hash(&self) -> &B256 {
        &self.message.block_hash
    }

    pub fn slot(&self) -> u64 {
        self.message.slot
    }
}
