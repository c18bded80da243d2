use alloy_primitives::Address;
use suave_datastore::{ConfidentialStore, StoreGateway};
use suave_types::{BidId, BodyItem, Refund, ShareBundle, MEVSHARE_ETH_BUNDLES_NAMESPACE};
use tracing::debug;

use crate::{error::PrecompileError, resolver::fetch_matched_pair};

/// Composes the mev-share bundle of a matched bid: user transactions first, then the match,
/// with a refund entry for every user transaction.
pub async fn fill_share_bundle<S: ConfidentialStore>(
    gateway: &StoreGateway<S>,
    bid_id: BidId,
    caller: Address,
) -> Result<ShareBundle, PrecompileError> {
    let bid = gateway.fetch_peekable_bid(caller, bid_id).await?;
    let pair = fetch_matched_pair(gateway, &bid, caller).await?;

    let user = gateway.retrieve_bundle(caller, &pair.user, MEVSHARE_ETH_BUNDLES_NAMESPACE).await?;
    let matched =
        gateway.retrieve_bundle(caller, &pair.matched, MEVSHARE_ETH_BUNDLES_NAMESPACE).await?;

    let mut share_bundle = ShareBundle::new(bid.decryption_condition);
    share_bundle.body = user
        .body()
        .chain(matched.body())
        .map(|(tx, can_revert)| BodyItem { tx: tx.clone(), can_revert })
        .collect();

    let percent = user.refund_percent_or_default();
    share_bundle.validity.refund =
        (0..user.txs.len()).map(|body_idx| Refund { body_idx, percent }).collect();

    debug!(%bid_id, n_txs = share_bundle.body.len(), "filled mev-share bundle");
    Ok(share_bundle)
}
