use std::fmt;

use alloy_primitives::{Address, FixedBytes};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// 128-bit identifier of a stored bid.
pub type BidId = FixedBytes<16>;

/// Store namespace of the list of bid ids a bid was merged from.
pub const MERGED_BIDS_NAMESPACE: &str = "default:v0:mergedBids";
/// Store namespace of default bundle payloads.
pub const ETH_BUNDLES_NAMESPACE: &str = "default:v0:ethBundles";
/// Store namespace of the `[user, match]` pair of a matched mev-share bid.
pub const MEVSHARE_MERGED_BIDS_NAMESPACE: &str = "mevshare:v0:mergedBids";
/// Store namespace of mev-share bundle payloads, matched or not.
pub const MEVSHARE_ETH_BUNDLES_NAMESPACE: &str = "mevshare:v0:ethBundles";

/// Version tag of a stored bid, deciding how its payload is laid out in the store.
///
/// The string tags are part of the store key schema and are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BidVersion {
    /// A single bundle stored under [`ETH_BUNDLES_NAMESPACE`].
    DefaultBundle,
    /// A single mev-share bundle stored under [`MEVSHARE_ETH_BUNDLES_NAMESPACE`].
    UnmatchedBundle,
    /// A user bundle and its match, see [`MEVSHARE_MERGED_BIDS_NAMESPACE`].
    MatchedBundle,
    Other(String),
}

impl BidVersion {
    pub const DEFAULT_BUNDLE: &'static str = "default:v0:ethBundles";
    pub const UNMATCHED_BUNDLE: &'static str = "mevshare:v0:unmatchedBundles";
    pub const MATCHED_BUNDLE: &'static str = "mevshare:v0:matchBids";

    pub fn as_str(&self) -> &str {
        match self {
            BidVersion::DefaultBundle => Self::DEFAULT_BUNDLE,
            BidVersion::UnmatchedBundle => Self::UNMATCHED_BUNDLE,
            BidVersion::MatchedBundle => Self::MATCHED_BUNDLE,
            BidVersion::Other(tag) => tag,
        }
    }
}

impl From<&str> for BidVersion {
    fn from(tag: &str) -> Self {
        match tag {
            Self::DEFAULT_BUNDLE => BidVersion::DefaultBundle,
            Self::UNMATCHED_BUNDLE => BidVersion::UnmatchedBundle,
            Self::MATCHED_BUNDLE => BidVersion::MatchedBundle,
            other => BidVersion::Other(other.to_string()),
        }
    }
}

impl fmt::Display for BidVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for BidVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for BidVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(BidVersion::from(tag.as_str()))
    }
}

/// A confidential bid as recorded in the store. Read-only and immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bid {
    pub id: BidId,
    pub version: BidVersion,
    /// Block height after which the payload may be revealed.
    #[serde(with = "alloy_serde::quantity")]
    pub decryption_condition: u64,
    pub allowed_peekers: Vec<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

impl Bid {
    pub fn is_peeker(&self, caller: &Address) -> bool {
        self.allowed_peekers.contains(caller)
    }
}
