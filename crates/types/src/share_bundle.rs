use alloy_primitives::Bytes;
use serde::{Deserialize, Serialize};

pub const SHARE_BUNDLE_VERSION: &str = "v0.1";

/// A matched user/searcher pair in the mev-share `mev_sendBundle` encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareBundle {
    pub version: String,
    pub inclusion: Inclusion,
    pub body: Vec<BodyItem>,
    pub validity: Validity,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inclusion {
    #[serde(with = "alloy_serde::quantity")]
    pub block: u64,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "alloy_serde::quantity::opt")]
    pub max_block: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyItem {
    pub tx: Bytes,
    pub can_revert: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validity {
    pub refund: Vec<Refund>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Refund {
    pub body_idx: usize,
    pub percent: u64,
}

impl ShareBundle {
    pub fn new(inclusion_block: u64) -> Self {
        Self {
            version: SHARE_BUNDLE_VERSION.to_string(),
            inclusion: Inclusion { block: inclusion_block, max_block: None },
            body: Vec::new(),
            validity: Validity::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::bytes;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_share_bundle_json() {
        let mut bundle = ShareBundle::new(17);
        bundle.body.push(BodyItem { tx: bytes!("aabb"), can_revert: false });
        bundle.validity.refund.push(Refund { body_idx: 0, percent: 10 });

        assert_eq!(
            serde_json::to_value(&bundle).unwrap(),
            json!({
                "version": "v0.1",
                "inclusion": { "block": "0x11" },
                "body": [{ "tx": "0xaabb", "canRevert": false }],
                "validity": { "refund": [{ "bodyIdx": 0, "percent": 10 }] }
            })
        );
    }
}
