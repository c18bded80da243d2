use suave_common::SigningError;
use suave_datastore::StoreError;
use suave_types::{BidId, PayloadConversionError};

use crate::engine::EngineError;

/// Failure of a precompile call. Every variant aborts the whole call, there is no partial
/// output.
#[derive(Debug, thiserror::Error)]
pub enum PrecompileError {
    #[error("not available in this context")]
    NotAvailable,

    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("invalid merge record for bid {bid_id}: {reason}")]
    InvalidMergeRecord { bid_id: BidId, reason: String },

    #[error("unknown bid version {version} for bid {bid_id}")]
    UnknownBidVersion { bid_id: BidId, version: String },

    #[error("could not format execution payload as capella payload: {0}")]
    PayloadConversion(#[from] PayloadConversionError),

    #[error("value {0} overflows")]
    ValueOverflow(String),

    #[error("could not build eth block: {0}")]
    Engine(#[from] EngineError),

    #[error("simulation failed: {0}")]
    SimulationFailed(String),

    #[error("signing error: {0}")]
    Signing(#[from] SigningError),

    #[error("could not encode {0}")]
    Encoding(String),

    #[error("upstream failure: {0}")]
    Upstream(String),

    #[error("relay request failed with code {status}: {body}")]
    RelayRejected { status: u16, body: String },
}

impl From<StoreError> for PrecompileError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::BidNotFound { .. } | StoreError::DataNotFound { .. } => {
                PrecompileError::NotFound(err.to_string())
            }
            StoreError::PermissionDenied { .. } => {
                PrecompileError::PermissionDenied(err.to_string())
            }
            StoreError::MalformedRecord { .. } => PrecompileError::MalformedInput(err.to_string()),
            StoreError::Upstream(reason) => PrecompileError::Upstream(reason),
        }
    }
}
