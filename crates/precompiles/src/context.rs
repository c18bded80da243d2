use suave_common::SigningKeys;
use suave_datastore::{ConfidentialStore, StoreGateway};

use crate::{engine::ExecutionEngine, relay::RelayClient};

/// Collaborators of a single confidential call, borrowed from the execution environment for
/// the duration of that call.
pub struct ConfidentialContext<'a, S, E> {
    pub store: &'a S,
    pub engine: &'a E,
    pub keys: &'a SigningKeys,
    pub relay: &'a RelayClient,
}

impl<'a, S: ConfidentialStore, E: ExecutionEngine> ConfidentialContext<'a, S, E> {
    pub fn new(store: &'a S, engine: &'a E, keys: &'a SigningKeys, relay: &'a RelayClient) -> Self {
        Self { store, engine, keys, relay }
    }

    pub fn gateway(&self) -> StoreGateway<&'a S> {
        StoreGateway::new(self.store)
    }
}
