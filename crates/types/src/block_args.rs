use alloy_primitives::{Address, Bytes, B256};
use serde::{Deserialize, Serialize};

/// Parameters of a single block build request, supplied by the caller and never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildBlockArgs {
    pub slot: u64,
    pub proposer_pubkey: Bytes,
    pub parent: B256,
    pub timestamp: u64,
    pub fee_recipient: Address,
    pub gas_limit: u64,
    pub random: B256,
    pub withdrawals: Vec<Withdrawal>,
}

/// Execution layer withdrawal as passed to the execution engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Withdrawal {
    #[serde(with = "alloy_serde::quantity")]
    pub index: u64,
    #[serde(rename = "validatorIndex", with = "alloy_serde::quantity")]
    pub validator: u64,
    pub address: Address,
    #[serde(with = "alloy_serde::quantity")]
    pub amount: u64,
}
