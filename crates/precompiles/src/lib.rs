pub mod abi;
pub mod block_builder;
pub mod context;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod mevshare;
pub mod relay;
pub mod resolver;
pub mod simulate;

#[cfg(test)]
mod test_utils;

pub use context::ConfidentialContext;
pub use dispatch::Precompile;
pub use engine::{EngineError, ExecutionEngine};
pub use error::PrecompileError;
pub use relay::RelayClient;
