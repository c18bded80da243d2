use alloy_primitives::Address;
use suave_datastore::{ConfidentialStore, StoreError, StoreGateway};
use suave_types::{
    Bid, BidId, BidVersion, Bundle, ETH_BUNDLES_NAMESPACE, MERGED_BIDS_NAMESPACE,
    MEVSHARE_ETH_BUNDLES_NAMESPACE, MEVSHARE_MERGED_BIDS_NAMESPACE,
};
use tracing::debug;

use crate::error::PrecompileError;

/// A user bid and the bid matched against it, in stored order.
#[derive(Debug, Clone)]
pub struct MatchedPair {
    pub user: Bid,
    pub matched: Bid,
}

/// Where the bundle of one working list entry lives, known once every bid in the tree has been
/// fetched and checked.
enum BundleSource {
    Default(Bid),
    Unmatched(Bid),
    Matched(MatchedPair),
}

/// Resolves a bid into the ordered bundles it stands for.
///
/// A bid with a merge record expands into its children in stored order, a bid without one is
/// its own single child. Children are never expanded through their own merge record. All bids
/// are fetched and access checked before any bundle is read.
pub async fn resolve<S: ConfidentialStore>(
    gateway: &StoreGateway<S>,
    top_bid_id: BidId,
    caller: Address,
) -> Result<Vec<Bundle>, PrecompileError> {
    let top = gateway.fetch_peekable_bid(caller, top_bid_id).await?;

    let children = match gateway.retrieve_bid_ids(caller, &top, MERGED_BIDS_NAMESPACE).await {
        Ok(ids) if ids.is_empty() => {
            return Err(PrecompileError::InvalidMergeRecord {
                bid_id: top_bid_id,
                reason: "merge record is empty".to_string(),
            });
        }
        Ok(ids) => {
            let mut children = Vec::with_capacity(ids.len());
            for id in ids {
                children.push(gateway.fetch_peekable_bid(caller, id).await?);
            }
            children
        }
        Err(err) if err.is_not_found() => vec![top],
        Err(StoreError::MalformedRecord { reason, .. }) => {
            return Err(PrecompileError::InvalidMergeRecord { bid_id: top_bid_id, reason });
        }
        Err(err) => return Err(err.into()),
    };

    let mut sources = Vec::with_capacity(children.len());
    for bid in children {
        sources.push(bundle_source(gateway, bid, caller).await?);
    }

    let mut bundles = Vec::with_capacity(sources.len());
    for source in sources {
        let bundle = match source {
            BundleSource::Default(bid) => {
                gateway.retrieve_bundle(caller, &bid, ETH_BUNDLES_NAMESPACE).await?
            }
            BundleSource::Unmatched(bid) => {
                gateway.retrieve_bundle(caller, &bid, MEVSHARE_ETH_BUNDLES_NAMESPACE).await?
            }
            BundleSource::Matched(pair) => {
                let mut bundle = gateway
                    .retrieve_bundle(caller, &pair.user, MEVSHARE_ETH_BUNDLES_NAMESPACE)
                    .await?;
                let matched = gateway
                    .retrieve_bundle(caller, &pair.matched, MEVSHARE_ETH_BUNDLES_NAMESPACE)
                    .await?;
                bundle.append(matched);
                bundle
            }
        };
        bundles.push(bundle);
    }

    debug!(bid_id = %top_bid_id, n_bundles = bundles.len(), "resolved bid");
    Ok(bundles)
}

async fn bundle_source<S: ConfidentialStore>(
    gateway: &StoreGateway<S>,
    bid: Bid,
    caller: Address,
) -> Result<BundleSource, PrecompileError> {
    match bid.version {
        BidVersion::DefaultBundle => Ok(BundleSource::Default(bid)),
        BidVersion::UnmatchedBundle => Ok(BundleSource::Unmatched(bid)),
        BidVersion::MatchedBundle => {
            Ok(BundleSource::Matched(fetch_matched_pair(gateway, &bid, caller).await?))
        }
        BidVersion::Other(version) => {
            Err(PrecompileError::UnknownBidVersion { bid_id: bid.id, version })
        }
    }
}

/// Reads the `[user, match]` record of a matched bid and fetches both sides.
pub async fn fetch_matched_pair<S: ConfidentialStore>(
    gateway: &StoreGateway<S>,
    bid: &Bid,
    caller: Address,
) -> Result<MatchedPair, PrecompileError> {
    let ids = gateway
        .retrieve_bid_ids(caller, bid, MEVSHARE_MERGED_BIDS_NAMESPACE)
        .await
        .map_err(|err| match err {
            StoreError::MalformedRecord { reason, .. } => {
                PrecompileError::InvalidMergeRecord { bid_id: bid.id, reason }
            }
            err => err.into(),
        })?;

    let [user_id, matched_id] = <[BidId; 2]>::try_from(ids).map_err(|ids| {
        PrecompileError::InvalidMergeRecord {
            bid_id: bid.id,
            reason: format!("matched pair has {} entries, expected 2", ids.len()),
        }
    })?;

    let user = gateway.fetch_peekable_bid(caller, user_id).await?;
    let matched = gateway.fetch_peekable_bid(caller, matched_id).await?;

    Ok(MatchedPair { user, matched })
}
