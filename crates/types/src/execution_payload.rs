use alloy_primitives::{Address, Bytes, FixedBytes, B256, U256, U512};
use serde::{Deserialize, Serialize};

use crate::{PayloadConversionError, Withdrawal};

const LOGS_BLOOM_SIZE: usize = 256;
const MAX_EXTRA_DATA_BYTES: usize = 32;

pub type Bloom = FixedBytes<LOGS_BLOOM_SIZE>;

/// Execution payload as produced by the execution engine, before any width checks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutableData {
    pub parent_hash: B256,
    pub fee_recipient: Address,
    pub state_root: B256,
    pub receipts_root: B256,
    pub logs_bloom: Bytes,
    #[serde(rename = "prevRandao")]
    pub random: B256,
    #[serde(with = "alloy_serde::quantity")]
    pub number: u64,
    #[serde(with = "alloy_serde::quantity")]
    pub gas_limit: u64,
    #[serde(with = "alloy_serde::quantity")]
    pub gas_used: u64,
    #[serde(with = "alloy_serde::quantity")]
    pub timestamp: u64,
    pub extra_data: Bytes,
    pub base_fee_per_gas: U512,
    pub block_hash: B256,
    pub transactions: Vec<Bytes>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub withdrawals: Option<Vec<Withdrawal>>,
}

/// Output of one engine build: the payload and the value it pays to the proposer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionPayloadEnvelope {
    pub execution_payload: ExecutableData,
    pub block_value: U512,
}

/// Capella execution payload in the builder API JSON encoding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExecutionPayload {
    pub parent_hash: B256,
    pub fee_recipient: Address,
    pub state_root: B256,
    pub receipts_root: B256,
    pub logs_bloom: Bloom,
    pub prev_randao: B256,
    #[serde(with = "serde_utils::quoted_u64")]
    pub block_number: u64,
    #[serde(with = "serde_utils::quoted_u64")]
    pub gas_limit: u64,
    #[serde(with = "serde_utils::quoted_u64")]
    pub gas_used: u64,
    #[serde(with = "serde_utils::quoted_u64")]
    pub timestamp: u64,
    pub extra_data: Bytes,
    #[serde(with = "serde_utils::quoted_u256")]
    pub base_fee_per_gas: U256,
    pub block_hash: B256,
    pub transactions: Vec<Bytes>,
    pub withdrawals: Vec<CapellaWithdrawal>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapellaWithdrawal {
    #[serde(with = "serde_utils::quoted_u64")]
    pub index: u64,
    #[serde(with = "serde_utils::quoted_u64")]
    pub validator_index: u64,
    pub address: Address,
    /// Amount in gwei.
    #[serde(with = "serde_utils::quoted_u64")]
    pub amount: u64,
}

impl From<&Withdrawal> for CapellaWithdrawal {
    fn from(w: &Withdrawal) -> Self {
        Self { index: w.index, validator_index: w.validator, address: w.address, amount: w.amount }
    }
}

/// Narrows a 512-bit engine value to the 256-bit wire width, `None` on overflow.
pub fn narrow_u512(value: U512) -> Option<U256> {
    let bytes = value.to_be_bytes::<64>();
    if bytes[..32].iter().any(|b| *b != 0) {
        return None;
    }
    Some(U256::from_be_slice(&bytes[32..]))
}

impl TryFrom<&ExecutableData> for ExecutionPayload {
    type Error = PayloadConversionError;

    fn try_from(data: &ExecutableData) -> Result<Self, Self::Error> {
        if data.logs_bloom.len() != LOGS_BLOOM_SIZE {
            return Err(PayloadConversionError::LogsBloomLength {
                got: data.logs_bloom.len(),
                expected: LOGS_BLOOM_SIZE,
            });
        }

        if data.extra_data.len() > MAX_EXTRA_DATA_BYTES {
            return Err(PayloadConversionError::ExtraDataTooLong {
                got: data.extra_data.len(),
                max: MAX_EXTRA_DATA_BYTES,
            });
        }

        let base_fee_per_gas = narrow_u512(data.base_fee_per_gas).ok_or_else(|| {
            PayloadConversionError::BaseFeeOverflow(data.base_fee_per_gas.to_string())
        })?;

        let withdrawals = data
            .withdrawals
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(CapellaWithdrawal::from)
            .collect();

        Ok(Self {
            parent_hash: data.parent_hash,
            fee_recipient: data.fee_recipient,
            state_root: data.state_root,
            receipts_root: data.receipts_root,
            logs_bloom: Bloom::from_slice(&data.logs_bloom),
            prev_randao: data.random,
            block_number: data.number,
            gas_limit: data.gas_limit,
            gas_used: data.gas_used,
            timestamp: data.timestamp,
            extra_data: data.extra_data.clone(),
            base_fee_per_gas,
            block_hash: data.block_hash,
            transactions: data.transactions.clone(),
            withdrawals,
        })
    }
}
