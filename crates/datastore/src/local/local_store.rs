use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use alloy_primitives::{Address, Bytes};
use async_trait::async_trait;
use dashmap::DashMap;
use suave_types::{Bid, BidId, Bundle};
use tracing::trace;

use crate::{
    error::StoreError,
    records::{encode_bid_ids, encode_bundle},
    ConfidentialStore,
};

/// In-process confidential store, shared by clones.
///
/// Also carries the write side used by local deployments and tests, which is not part of
/// [`ConfidentialStore`].
#[derive(Clone, Default)]
pub struct LocalStore {
    bids: Arc<DashMap<BidId, Bid>>,
    data: Arc<DashMap<(BidId, String), Bytes>>,
    retrievals: Arc<AtomicUsize>,
}

impl LocalStore {
    pub fn insert_bid(&self, bid: Bid) {
        self.bids.insert(bid.id, bid);
    }

    pub fn store(&self, bid_id: BidId, namespace: &str, value: Bytes) {
        self.data.insert((bid_id, namespace.to_string()), value);
    }

    pub fn store_bundle(
        &self,
        bid_id: BidId,
        namespace: &str,
        bundle: &Bundle,
    ) -> Result<(), serde_json::Error> {
        self.store(bid_id, namespace, encode_bundle(bundle)?);
        Ok(())
    }

    pub fn store_bid_ids(&self, bid_id: BidId, namespace: &str, bid_ids: &[BidId]) {
        self.store(bid_id, namespace, encode_bid_ids(bid_ids));
    }

    /// Number of successful raw reads served so far.
    pub fn retrieval_count(&self) -> usize {
        self.retrievals.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl ConfidentialStore for LocalStore {
    async fn fetch_bid(&self, bid_id: BidId) -> Result<Bid, StoreError> {
        self.bids
            .get(&bid_id)
            .map(|bid| bid.value().clone())
            .ok_or(StoreError::BidNotFound { bid_id })
    }

    async fn retrieve(
        &self,
        bid_id: BidId,
        caller: Address,
        namespace: &str,
    ) -> Result<Bytes, StoreError> {
        let bid = self.fetch_bid(bid_id).await?;
        if !bid.is_peeker(&caller) {
            return Err(StoreError::PermissionDenied { caller, bid_id });
        }

        let value = self
            .data
            .get(&(bid_id, namespace.to_string()))
            .map(|value| value.value().clone())
            .ok_or_else(|| StoreError::DataNotFound { bid_id, namespace: namespace.to_string() })?;

        self.retrievals.fetch_add(1, Ordering::Relaxed);
        trace!(%bid_id, namespace, len = value.len(), "served confidential data");
        Ok(value)
    }
}
