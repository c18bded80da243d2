use alloy_primitives::{Address, Bytes};
use suave_types::{Bid, BidId, Bundle};
use tracing::{debug, warn};

use crate::{
    error::StoreError,
    records::{decode_bid_ids, decode_bundle},
    ConfidentialStore,
};

/// Access gate in front of a [`ConfidentialStore`].
///
/// Payload reads take the [`Bid`] they belong to and check the caller against its allowed
/// peekers first, so no stored byte is returned across a failed check.
#[derive(Clone)]
pub struct StoreGateway<S> {
    store: S,
}

impl<S: ConfidentialStore> StoreGateway<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn fetch_bid(&self, bid_id: BidId) -> Result<Bid, StoreError> {
        self.store.fetch_bid(bid_id).await
    }

    pub fn check_access(caller: Address, bid: &Bid) -> Result<(), StoreError> {
        if !bid.is_peeker(&caller) {
            warn!(%caller, bid_id = %bid.id, "caller not in allowed peekers");
            return Err(StoreError::PermissionDenied { caller, bid_id: bid.id });
        }
        Ok(())
    }

    /// Fetches a bid and checks `caller` may read it.
    pub async fn fetch_peekable_bid(
        &self,
        caller: Address,
        bid_id: BidId,
    ) -> Result<Bid, StoreError> {
        let bid = self.store.fetch_bid(bid_id).await?;
        Self::check_access(caller, &bid)?;
        Ok(bid)
    }

    pub async fn retrieve_checked(
        &self,
        caller: Address,
        bid: &Bid,
        namespace: &str,
    ) -> Result<Bytes, StoreError> {
        Self::check_access(caller, bid)?;
        debug!(bid_id = %bid.id, namespace, "retrieving confidential data");
        self.store.retrieve(bid.id, caller, namespace).await
    }

    pub async fn retrieve_bundle(
        &self,
        caller: Address,
        bid: &Bid,
        namespace: &str,
    ) -> Result<Bundle, StoreError> {
        let data = self.retrieve_checked(caller, bid, namespace).await?;
        decode_bundle(&data).map_err(|err| StoreError::MalformedRecord {
            bid_id: bid.id,
            namespace: namespace.to_string(),
            reason: err.to_string(),
        })
    }

    pub async fn retrieve_bid_ids(
        &self,
        caller: Address,
        bid: &Bid,
        namespace: &str,
    ) -> Result<Vec<BidId>, StoreError> {
        let data = self.retrieve_checked(caller, bid, namespace).await?;
        decode_bid_ids(&data).map_err(|err| StoreError::MalformedRecord {
            bid_id: bid.id,
            namespace: namespace.to_string(),
            reason: err.to_string(),
        })
    }
}
