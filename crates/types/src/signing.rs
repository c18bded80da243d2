use alloy_primitives::B256;
use sha2::{Digest, Sha256};

/// Genesis fork version the builder signing domain is derived from.
///
/// Hardcoded to Goerli: bids signed here are only valid on that network until the fork version
/// is passed in with the build inputs.
pub const GENESIS_FORK_VERSION: [u8; 4] = [0x00, 0x00, 0x10, 0x20];

pub const DOMAIN_APPLICATION_BUILDER: [u8; 4] = [0x00, 0x00, 0x00, 0x01];

/// `compute_domain(DOMAIN_APPLICATION_BUILDER, fork_version, genesis_validators_root)`
pub fn compute_builder_domain(fork_version: [u8; 4], genesis_validators_root: B256) -> B256 {
    // hash_tree_root(ForkData), two 32 byte leaves
    let mut leaves = [0u8; 64];
    leaves[..4].copy_from_slice(&fork_version);
    leaves[32..].copy_from_slice(genesis_validators_root.as_slice());
    let fork_data_root = Sha256::digest(leaves);

    let mut domain = [0u8; 32];
    domain[..4].copy_from_slice(&DOMAIN_APPLICATION_BUILDER);
    domain[4..].copy_from_slice(&fork_data_root[..28]);
    B256::from(domain)
}

/// Domain every builder bid produced by this crate is signed under.
pub fn builder_signing_domain() -> B256 {
    compute_builder_domain(GENESIS_FORK_VERSION, B256::ZERO)
}
