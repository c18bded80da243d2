mod bid;
mod bid_submission;
mod block_args;
mod bundle;
mod error;
mod execution_payload;
mod share_bundle;
mod signing;

pub use bid::*;
pub use bid_submission::*;
pub use block_args::*;
pub use bundle::*;
pub use error::*;
pub use execution_payload::*;
pub use lh_types::SignedRoot;
pub use share_bundle::*;
pub use signing::*;

pub type BlsPublicKey = lh_bls::PublicKey;
pub type BlsPublicKeyBytes = lh_bls::PublicKeyBytes;
pub type BlsSecretKey = lh_bls::SecretKey;
pub type BlsSignature = lh_bls::Signature;
pub type BlsSignatureBytes = lh_bls::SignatureBytes;
