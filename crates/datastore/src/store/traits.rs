use alloy_primitives::{Address, Bytes};
use async_trait::async_trait;
use suave_types::{Bid, BidId};

use crate::error::StoreError;

/// Read side of the confidential data store. Owned by the execution environment.
///
/// Implementations are network backed in general: every call is a suspension point and is
/// bounded by the deadline of the calling request.
#[async_trait]
#[auto_impl::auto_impl(Arc, &)]
pub trait ConfidentialStore: Send + Sync {
    async fn fetch_bid(&self, bid_id: BidId) -> Result<Bid, StoreError>;

    /// Raw read of the data stored for `bid_id` under `namespace` on behalf of `caller`.
    async fn retrieve(
        &self,
        bid_id: BidId,
        caller: Address,
        namespace: &str,
    ) -> Result<Bytes, StoreError>;
}
