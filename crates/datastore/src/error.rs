use alloy_primitives::Address;
use suave_types::BidId;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("bid {bid_id} not found")]
    BidNotFound { bid_id: BidId },

    #[error("no data for bid {bid_id} in namespace {namespace}")]
    DataNotFound { bid_id: BidId, namespace: String },

    #[error("{caller} is not an allowed peeker of bid {bid_id}")]
    PermissionDenied { caller: Address, bid_id: BidId },

    #[error("could not decode {namespace} record of bid {bid_id}: {reason}")]
    MalformedRecord { bid_id: BidId, namespace: String, reason: String },

    #[error("confidential store unavailable: {0}")]
    Upstream(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::BidNotFound { .. } | StoreError::DataNotFound { .. })
    }
}
