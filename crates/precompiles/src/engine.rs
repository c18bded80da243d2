use alloy_primitives::Bytes;
use async_trait::async_trait;
use suave_types::{BuildBlockArgs, Bundle, ExecutionPayloadEnvelope};

#[derive(Debug, Clone, thiserror::Error)]
pub enum EngineError {
    #[error("{0}")]
    Build(String),

    #[error("block build timed out")]
    Timeout,
}

/// Block execution engine of the host. Turns an ordered list of bundles into a payload and
/// the value it pays.
#[async_trait]
#[auto_impl::auto_impl(Arc, &)]
pub trait ExecutionEngine: Send + Sync {
    /// Builds a block applying `bundles` in the given order.
    async fn build_from_bundles(
        &self,
        args: &BuildBlockArgs,
        bundles: &[Bundle],
    ) -> Result<ExecutionPayloadEnvelope, EngineError>;

    /// Builds a block from raw transactions, on top of the current head if `args` is `None`.
    async fn build_from_txs(
        &self,
        args: Option<&BuildBlockArgs>,
        txs: &[Bytes],
    ) -> Result<ExecutionPayloadEnvelope, EngineError>;
}
