use alloy_primitives::{address, Address, Bytes};
use suave_datastore::ConfidentialStore;
use tracing::{debug, warn};

use crate::{
    abi::{
        encode_bytes_output, encode_u64_output, BuildEthBlockInput, BundleInput,
        FillMevShareBundleInput, HandlerInput, SubmitBlockBidInput, SubmitBundleJsonRpcInput,
    },
    block_builder::build_block_bid,
    context::ConfidentialContext,
    engine::ExecutionEngine,
    error::PrecompileError,
    mevshare::fill_share_bundle,
    simulate::{extract_hint, simulate_bundle},
};

pub const SIMULATE_BUNDLE_ADDRESS: Address = address!("0000000000000000000000000000000042100000");
pub const EXTRACT_HINT_ADDRESS: Address = address!("0000000000000000000000000000000042100037");
pub const BUILD_ETH_BLOCK_ADDRESS: Address = address!("0000000000000000000000000000000042100001");
pub const SUBMIT_ETH_BLOCK_BID_TO_RELAY_ADDRESS: Address =
    address!("0000000000000000000000000000000042100002");
pub const SUBMIT_BUNDLE_JSON_RPC_ADDRESS: Address =
    address!("0000000000000000000000000000000043000001");
pub const FILL_MEV_SHARE_BUNDLE_ADDRESS: Address =
    address!("0000000000000000000000000000000043200001");

/// Handlers callable at a fixed address.
///
/// Every handler has a plain mode, available anywhere, and a confidential mode that may read
/// the confidential store and use the signing keys. The handler's own address is the caller
/// identity checked against a bid's allowed peekers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Precompile {
    SimulateBundle,
    ExtractHint,
    BuildEthBlock,
    SubmitEthBlockBidToRelay,
    SubmitBundleJsonRpc,
    FillMevShareBundle,
}

impl Precompile {
    pub const ALL: [Precompile; 6] = [
        Precompile::SimulateBundle,
        Precompile::ExtractHint,
        Precompile::BuildEthBlock,
        Precompile::SubmitEthBlockBidToRelay,
        Precompile::SubmitBundleJsonRpc,
        Precompile::FillMevShareBundle,
    ];

    pub fn at(address: Address) -> Option<Precompile> {
        Self::ALL.into_iter().find(|precompile| precompile.address() == address)
    }

    pub const fn address(&self) -> Address {
        match self {
            Precompile::SimulateBundle => SIMULATE_BUNDLE_ADDRESS,
            Precompile::ExtractHint => EXTRACT_HINT_ADDRESS,
            Precompile::BuildEthBlock => BUILD_ETH_BLOCK_ADDRESS,
            Precompile::SubmitEthBlockBidToRelay => SUBMIT_ETH_BLOCK_BID_TO_RELAY_ADDRESS,
            Precompile::SubmitBundleJsonRpc => SUBMIT_BUNDLE_JSON_RPC_ADDRESS,
            Precompile::FillMevShareBundle => FILL_MEV_SHARE_BUNDLE_ADDRESS,
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Precompile::SimulateBundle => "simulateBundle",
            Precompile::ExtractHint => "extractHint",
            Precompile::BuildEthBlock => "buildEthBlock",
            Precompile::SubmitEthBlockBidToRelay => "submitEthBlockBidToRelay",
            Precompile::SubmitBundleJsonRpc => "submitBundleJsonRPC",
            Precompile::FillMevShareBundle => "fillMevShareBundle",
        }
    }

    /// Flat gas cost, independent of the input.
    pub fn required_gas(&self, _input: &[u8]) -> u64 {
        match self {
            Precompile::SimulateBundle | Precompile::ExtractHint | Precompile::BuildEthBlock => {
                10_000
            }
            Precompile::SubmitEthBlockBidToRelay |
            Precompile::SubmitBundleJsonRpc |
            Precompile::FillMevShareBundle => 1_000,
        }
    }

    pub fn is_confidential_only(&self) -> bool {
        matches!(self, Precompile::SubmitBundleJsonRpc | Precompile::FillMevShareBundle)
    }

    /// Plain mode: confidential only handlers fail, the others echo their input.
    pub fn run(&self, input: &[u8]) -> Result<Bytes, PrecompileError> {
        if self.is_confidential_only() {
            return Err(PrecompileError::NotAvailable);
        }
        Ok(Bytes::copy_from_slice(input))
    }

    /// Confidential mode. The caller must have checked that a confidential context is active.
    pub async fn run_confidential<S: ConfidentialStore, E: ExecutionEngine>(
        &self,
        ctx: &ConfidentialContext<'_, S, E>,
        input: &[u8],
    ) -> Result<Bytes, PrecompileError> {
        debug!(precompile = self.name(), len = input.len(), "running confidential precompile");

        let res = self.run_confidential_inner(ctx, input).await;
        if let Err(err) = &res {
            warn!(precompile = self.name(), %err, "confidential precompile failed");
        }
        res
    }

    async fn run_confidential_inner<S: ConfidentialStore, E: ExecutionEngine>(
        &self,
        ctx: &ConfidentialContext<'_, S, E>,
        input: &[u8],
    ) -> Result<Bytes, PrecompileError> {
        let caller = self.address();

        match self {
            Precompile::SimulateBundle => {
                let BundleInput { bundle } = BundleInput::decode(input)?;
                let egp = simulate_bundle(ctx.engine, &bundle).await?;
                Ok(encode_u64_output(egp))
            }

            Precompile::ExtractHint => {
                let BundleInput { bundle } = BundleInput::decode(input)?;
                let hint = extract_hint(&bundle)?;
                Ok(encode_bytes_output(vec![to_json(&hint, "hint")?]))
            }

            Precompile::BuildEthBlock => {
                let BuildEthBlockInput { args, bid_id, namespace } =
                    BuildEthBlockInput::decode(input)?;
                debug!(%bid_id, %namespace, "build eth block");

                let (bid, envelope) = build_block_bid(ctx, &args, bid_id, caller).await?;
                Ok(encode_bytes_output(vec![
                    to_json(&bid, "builder bid")?,
                    to_json(&envelope, "execution payload envelope")?,
                ]))
            }

            Precompile::SubmitEthBlockBidToRelay => {
                let SubmitBlockBidInput { relay_url, builder_bid } =
                    SubmitBlockBidInput::decode(input)?;
                ctx.relay.submit_block_bid(&relay_url, builder_bid).await?;
                Ok(Bytes::new())
            }

            Precompile::SubmitBundleJsonRpc => {
                let SubmitBundleJsonRpcInput { url, method, params } =
                    SubmitBundleJsonRpcInput::decode(input)?;
                ctx.relay.submit_bundle_json_rpc(ctx.keys, &url, &method, &params).await?;
                Ok(Bytes::new())
            }

            Precompile::FillMevShareBundle => {
                let FillMevShareBundleInput { bid_id } = FillMevShareBundleInput::decode(input)?;
                let share_bundle = fill_share_bundle(&ctx.gateway(), bid_id, caller).await?;
                Ok(encode_bytes_output(vec![to_json(&share_bundle, "share bundle")?]))
            }
        }
    }
}

fn to_json<T: serde::Serialize>(value: &T, what: &str) -> Result<Bytes, PrecompileError> {
    serde_json::to_vec(value)
        .map(Bytes::from)
        .map_err(|err| PrecompileError::Encoding(format!("{what}: {err}")))
}
