use alloy_primitives::{Address, Bytes, B256, U512};
use async_trait::async_trait;
use parking_lot::Mutex;
use suave_datastore::{LocalStore, StoreGateway};
use suave_types::{
    Bid, BidId, BidVersion, BuildBlockArgs, Bundle, ExecutableData, ExecutionPayloadEnvelope,
    ETH_BUNDLES_NAMESPACE, MERGED_BIDS_NAMESPACE, MEVSHARE_ETH_BUNDLES_NAMESPACE,
    MEVSHARE_MERGED_BIDS_NAMESPACE,
};

use crate::{
    dispatch::{BUILD_ETH_BLOCK_ADDRESS, FILL_MEV_SHARE_BUNDLE_ADDRESS},
    engine::{EngineError, ExecutionEngine},
};

pub const PEEKER: Address = Address::repeat_byte(0x42);

pub fn bid(n: u8, version: BidVersion) -> Bid {
    Bid {
        id: BidId::repeat_byte(n),
        version,
        decryption_condition: 100,
        allowed_peekers: vec![PEEKER, BUILD_ETH_BLOCK_ADDRESS, FILL_MEV_SHARE_BUNDLE_ADDRESS],
        namespace: None,
    }
}

/// [`LocalStore`] with shortcuts to lay out bid trees.
#[derive(Default)]
pub struct TestStore {
    pub inner: LocalStore,
}

impl TestStore {
    pub fn gateway(&self) -> StoreGateway<&LocalStore> {
        StoreGateway::new(&self.inner)
    }

    pub fn insert(&self, bid: Bid) -> BidId {
        let id = bid.id;
        self.inner.insert_bid(bid);
        id
    }

    pub fn default_bid(&self, n: u8, bundle: &Bundle) -> BidId {
        let id = self.insert(bid(n, BidVersion::DefaultBundle));
        self.inner.store_bundle(id, ETH_BUNDLES_NAMESPACE, bundle).unwrap();
        id
    }

    pub fn unmatched_bid(&self, n: u8, bundle: &Bundle) -> BidId {
        let id = self.insert(bid(n, BidVersion::UnmatchedBundle));
        self.inner.store_bundle(id, MEVSHARE_ETH_BUNDLES_NAMESPACE, bundle).unwrap();
        id
    }

    /// Matched bid `n` over user bid `n + 0x40` and searcher bid `n + 0x80`.
    pub fn matched_bid(&self, n: u8, user: &Bundle, matched: &Bundle) -> BidId {
        let user_id = self.unmatched_bid(n + 0x40, user);
        let matched_id = self.unmatched_bid(n + 0x80, matched);

        let id = self.insert(bid(n, BidVersion::MatchedBundle));
        self.inner.store_bid_ids(id, MEVSHARE_MERGED_BIDS_NAMESPACE, &[user_id, matched_id]);
        id
    }

    pub fn merged_bid(&self, n: u8, children: &[BidId]) -> BidId {
        let id = self.insert(bid(n, BidVersion::from(MERGED_BIDS_NAMESPACE)));
        self.inner.store_bid_ids(id, MERGED_BIDS_NAMESPACE, children);
        id
    }
}

pub fn build_args() -> BuildBlockArgs {
    BuildBlockArgs {
        slot: 123,
        proposer_pubkey: Bytes::from(vec![0x11; 48]),
        parent: B256::repeat_byte(0x01),
        timestamp: 1_700_000_000,
        fee_recipient: Address::repeat_byte(0x02),
        gas_limit: 30_000_000,
        random: B256::repeat_byte(0x03),
        withdrawals: Vec::new(),
    }
}

pub fn envelope(block_value: U512, gas_used: u64) -> ExecutionPayloadEnvelope {
    ExecutionPayloadEnvelope {
        execution_payload: ExecutableData {
            parent_hash: B256::repeat_byte(0x01),
            fee_recipient: Address::repeat_byte(0x02),
            logs_bloom: Bytes::from(vec![0u8; 256]),
            number: 10,
            gas_limit: 30_000_000,
            gas_used,
            timestamp: 1_700_000_000,
            extra_data: Bytes::from_static(b"kettle"),
            base_fee_per_gas: U512::from(7u64),
            block_hash: B256::repeat_byte(0xbb),
            transactions: vec![Bytes::from_static(&[0x02, 0x01])],
            withdrawals: Some(Vec::new()),
            ..Default::default()
        },
        block_value,
    }
}

/// Engine returning a fixed result and recording what it was asked to build.
pub struct MockEngine {
    result: Result<ExecutionPayloadEnvelope, EngineError>,
    pub bundle_calls: Mutex<Vec<Vec<Bundle>>>,
    pub tx_calls: Mutex<Vec<Vec<Bytes>>>,
}

impl MockEngine {
    pub fn new(envelope: ExecutionPayloadEnvelope) -> Self {
        Self::with_result(Ok(envelope))
    }

    pub fn failing(err: EngineError) -> Self {
        Self::with_result(Err(err))
    }

    fn with_result(result: Result<ExecutionPayloadEnvelope, EngineError>) -> Self {
        Self { result, bundle_calls: Mutex::new(Vec::new()), tx_calls: Mutex::new(Vec::new()) }
    }
}

#[async_trait]
impl ExecutionEngine for MockEngine {
    async fn build_from_bundles(
        &self,
        _args: &BuildBlockArgs,
        bundles: &[Bundle],
    ) -> Result<ExecutionPayloadEnvelope, EngineError> {
        self.bundle_calls.lock().push(bundles.to_vec());
        self.result.clone()
    }

    async fn build_from_txs(
        &self,
        _args: Option<&BuildBlockArgs>,
        txs: &[Bytes],
    ) -> Result<ExecutionPayloadEnvelope, EngineError> {
        self.tx_calls.lock().push(txs.to_vec());
        self.result.clone()
    }
}
