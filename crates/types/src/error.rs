#[derive(Debug, thiserror::Error)]
pub enum SigError {
    #[error("invalid signature bytes")]
    InvalidBlsSignatureBytes,

    #[error("invalid pubkey bytes")]
    InvalidBlsPubkeyBytes,

    #[error("invalid signature")]
    InvalidBlsSignature,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PayloadConversionError {
    #[error("invalid logs bloom length: got {got}, expected {expected}")]
    LogsBloomLength { got: usize, expected: usize },

    #[error("base fee per gas {0} does not fit in 256 bits")]
    BaseFeeOverflow(String),

    #[error("extra data too long: got {got}, max {max}")]
    ExtraDataTooLong { got: usize, max: usize },
}
