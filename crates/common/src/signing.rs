use alloy_primitives::{hex, keccak256, B256};
use ethers::{
    signers::{LocalWallet, Signer, WalletError},
    types::Address,
    utils::to_checksum,
};
use suave_types::{BlsPublicKeyBytes, BlsSecretKey, BlsSignatureBytes, SignedRoot};

pub const BUILDER_SIGNING_KEY_ENV: &str = "BUILDER_SIGNING_KEY";
pub const BUNDLE_SIGNING_KEY_ENV: &str = "BUNDLE_SIGNING_KEY";

#[derive(Debug, thiserror::Error)]
pub enum SigningError {
    #[error("missing env var {0}")]
    MissingEnvVar(&'static str),

    #[error("invalid builder signing key")]
    InvalidBuilderKey,

    #[error("bundle signing key error: {0}")]
    Bundle(#[from] WalletError),
}

/// Keys owned by the execution environment for the lifetime of the process.
///
/// Handlers only ever see a `&SigningKeys` for the duration of one call; nothing derived from
/// them (including the builder public key) is cached.
pub struct SigningKeys {
    eth_block_signing_key: BlsSecretKey,
    eth_bundle_signing_key: LocalWallet,
}

impl SigningKeys {
    pub fn new(eth_block_signing_key: BlsSecretKey, eth_bundle_signing_key: LocalWallet) -> Self {
        Self { eth_block_signing_key, eth_bundle_signing_key }
    }

    pub fn random() -> Self {
        Self::new(BlsSecretKey::random(), LocalWallet::new(&mut ethers::core::rand::thread_rng()))
    }

    /// Loads both keys from hex encoded environment variables.
    pub fn from_env() -> Result<Self, SigningError> {
        let builder_key = std::env::var(BUILDER_SIGNING_KEY_ENV)
            .map_err(|_| SigningError::MissingEnvVar(BUILDER_SIGNING_KEY_ENV))?;
        let bundle_key = std::env::var(BUNDLE_SIGNING_KEY_ENV)
            .map_err(|_| SigningError::MissingEnvVar(BUNDLE_SIGNING_KEY_ENV))?;

        let builder_key_bytes = hex::decode(builder_key.trim())
            .map_err(|_| SigningError::InvalidBuilderKey)?;
        let eth_block_signing_key = BlsSecretKey::deserialize(&builder_key_bytes)
            .map_err(|_| SigningError::InvalidBuilderKey)?;
        let eth_bundle_signing_key: LocalWallet =
            bundle_key.trim().trim_start_matches("0x").parse()?;

        Ok(Self::new(eth_block_signing_key, eth_bundle_signing_key))
    }

    pub fn builder_pubkey(&self) -> BlsPublicKeyBytes {
        BlsPublicKeyBytes::from(self.eth_block_signing_key.public_key())
    }

    pub fn sign_builder_message(&self, msg: &impl SignedRoot, domain: B256) -> BlsSignatureBytes {
        let root = msg.signing_root(domain);
        BlsSignatureBytes::from(self.eth_block_signing_key.sign(root))
    }

    pub fn bundle_signer_address(&self) -> Address {
        self.eth_bundle_signing_key.address()
    }

    /// Flashbots style request signature: personal-sign of the hex keccak256 digest of `body`,
    /// formatted as `<address>:<signature>`.
    pub async fn sign_request_body(&self, body: &[u8]) -> Result<String, SigningError> {
        let digest = hex::encode_prefixed(keccak256(body));
        let signature = self.eth_bundle_signing_key.sign_message(digest).await?;

        Ok(format!(
            "{}:{}",
            to_checksum(&self.bundle_signer_address(), None),
            hex::encode_prefixed(signature.to_vec())
        ))
    }
}
