use std::time::Duration;

use alloy_consensus::{Transaction, TxEnvelope};
use alloy_eips::eip2718::Decodable2718;
use alloy_primitives::{Address, Bytes, U512};
use serde::{Deserialize, Serialize};
use suave_types::Bundle;
use tracing::debug;

use crate::{
    engine::{EngineError, ExecutionEngine},
    error::PrecompileError,
};

pub const SIMULATION_TIMEOUT: Duration = Duration::from_secs(1);

/// Public part of a bundle: where its first transaction goes and with which calldata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Hint {
    pub to: Address,
    pub data: Bytes,
}

fn parse_bundle(bundle_json: &[u8]) -> Result<Bundle, PrecompileError> {
    serde_json::from_slice(bundle_json)
        .map_err(|err| PrecompileError::MalformedInput(format!("invalid bundle json: {err}")))
}

/// Builds a block from the bundle's transactions on top of the head and returns the effective
/// gas price it pays.
pub async fn simulate_bundle<E: ExecutionEngine>(
    engine: &E,
    bundle_json: &[u8],
) -> Result<u64, PrecompileError> {
    let bundle = parse_bundle(bundle_json)?;

    let build = engine.build_from_txs(None, &bundle.txs);
    let envelope = tokio::time::timeout(SIMULATION_TIMEOUT, build)
        .await
        .map_err(|_| EngineError::Timeout)??;

    let gas_used = envelope.execution_payload.gas_used;
    if gas_used == 0 {
        return Err(PrecompileError::SimulationFailed("bundle used no gas".to_string()));
    }

    let egp = envelope.block_value / U512::from(gas_used);
    let egp = u64::try_from(egp).map_err(|_| PrecompileError::ValueOverflow(egp.to_string()))?;

    debug!(n_txs = bundle.txs.len(), gas_used, egp, "simulated bundle");
    Ok(egp)
}

pub fn extract_hint(bundle_json: &[u8]) -> Result<Hint, PrecompileError> {
    let bundle = parse_bundle(bundle_json)?;
    let first = bundle
        .txs
        .first()
        .ok_or_else(|| PrecompileError::MalformedInput("bundle has no transactions".to_string()))?;

    let tx = TxEnvelope::decode_2718(&mut first.as_ref())
        .map_err(|err| PrecompileError::MalformedInput(format!("invalid transaction: {err}")))?;
    let to = tx.to().ok_or_else(|| {
        PrecompileError::MalformedInput("contract creation has no hint".to_string())
    })?;

    Ok(Hint { to, data: tx.input().clone() })
}
