use alloy_primitives::{keccak256, Bytes, B256};
use serde::{Deserialize, Serialize};

/// Refund percentage given to the user transactions of a matched bundle when the user did not
/// set one.
pub const DEFAULT_REFUND_PERCENT: u64 = 10;

/// An ordered, atomic group of raw signed transactions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bundle {
    #[serde(default, skip_serializing_if = "Option::is_none", with = "alloy_serde::quantity::opt")]
    pub block_number: Option<u64>,
    /// EIP-2718 encoded transactions, in execution order.
    pub txs: Vec<Bytes>,
    /// Hashes of the transactions in `txs` that are allowed to revert.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reverting_hashes: Vec<B256>,
    #[serde(rename = "percent", default, skip_serializing_if = "Option::is_none")]
    pub refund_percent: Option<u64>,
}

impl Bundle {
    pub fn new(txs: Vec<Bytes>) -> Self {
        Self { txs, ..Default::default() }
    }

    pub fn tx_hash(tx: &Bytes) -> B256 {
        keccak256(tx)
    }

    pub fn can_revert(&self, tx: &Bytes) -> bool {
        !self.reverting_hashes.is_empty() && self.reverting_hashes.contains(&Self::tx_hash(tx))
    }

    /// Transactions paired with their "may revert" flag, in bundle order.
    pub fn body(&self) -> impl Iterator<Item = (&Bytes, bool)> + '_ {
        self.txs.iter().map(move |tx| (tx, self.can_revert(tx)))
    }

    pub fn refund_percent_or_default(&self) -> u64 {
        self.refund_percent.unwrap_or(DEFAULT_REFUND_PERCENT)
    }

    /// Appends `other` after this bundle's transactions. Neither side is reordered.
    pub fn append(&mut self, other: Bundle) {
        self.txs.extend(other.txs);
        self.reverting_hashes.extend(other.reverting_hashes);
    }
}
