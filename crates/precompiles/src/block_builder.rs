use alloy_primitives::Address;
use suave_datastore::ConfidentialStore;
use suave_types::{
    builder_signing_domain, narrow_u512, BidId, BidTrace, BlsPublicKeyBytes, BuildBlockArgs,
    ExecutionPayload, ExecutionPayloadEnvelope, SignedBidSubmission,
};
use tracing::{debug, info};

use crate::{
    context::ConfidentialContext, engine::ExecutionEngine, error::PrecompileError, resolver,
};

/// Builds a block from the bundles `bid_id` resolves to and signs a builder bid for it.
///
/// Returns the signed bid, ready for a relay, and the engine envelope it was made from.
pub async fn build_block_bid<S: ConfidentialStore, E: ExecutionEngine>(
    ctx: &ConfidentialContext<'_, S, E>,
    args: &BuildBlockArgs,
    bid_id: BidId,
    caller: Address,
) -> Result<(SignedBidSubmission, ExecutionPayloadEnvelope), PrecompileError> {
    let bundles = resolver::resolve(&ctx.gateway(), bid_id, caller).await?;
    debug!(%bid_id, slot = args.slot, n_bundles = bundles.len(), "building block");

    let envelope = ctx.engine.build_from_bundles(args, &bundles).await?;
    let execution_payload = ExecutionPayload::try_from(&envelope.execution_payload)?;

    let value = narrow_u512(envelope.block_value)
        .ok_or_else(|| PrecompileError::ValueOverflow(envelope.block_value.to_string()))?;

    let proposer_pubkey = BlsPublicKeyBytes::try_from(args.proposer_pubkey.as_ref())
        .map_err(|_| PrecompileError::MalformedInput("invalid proposer pubkey".to_string()))?;

    let message = BidTrace {
        slot: args.slot,
        parent_hash: execution_payload.parent_hash,
        block_hash: execution_payload.block_hash,
        builder_pubkey: ctx.keys.builder_pubkey(),
        proposer_pubkey,
        proposer_fee_recipient: args.fee_recipient,
        gas_limit: execution_payload.gas_limit,
        gas_used: execution_payload.gas_used,
        value,
    };
    let signature = ctx.keys.sign_builder_message(&message, builder_signing_domain());

    info!(
        %bid_id,
        slot = args.slot,
        block_hash = %message.block_hash,
        %value,
        "built block bid"
    );

    Ok((SignedBidSubmission { message, execution_payload, signature }, envelope))
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{bytes, Bytes, U256, U512};
    use suave_common::SigningKeys;
    use suave_types::Bundle;

    use super::*;
    use crate::{
        engine::EngineError,
        relay::RelayClient,
        test_utils::{build_args, envelope, MockEngine, TestStore, PEEKER},
    };

    #[tokio::test]
    async fn test_build_and_sign() {
        let store = TestStore::default();
        let bundle = Bundle::new(vec![bytes!("01")]);
        let id = store.default_bid(1, &bundle);
        let engine = MockEngine::new(envelope(U512::from(1_000_000u64), 21_000));
        let keys = SigningKeys::random();
        let relay = RelayClient::default();
        let ctx = ConfidentialContext::new(&store.inner, &engine, &keys, &relay);

        let args = build_args();
        let (bid, env) = build_block_bid(&ctx, &args, id, PEEKER).await.unwrap();

        assert_eq!(engine.bundle_calls.lock().as_slice(), &[vec![bundle]]);
        assert_eq!(bid.message.value, U256::from(1_000_000u64));
        assert_eq!(bid.message.slot, args.slot);
        assert_eq!(bid.message.gas_used, 21_000);
        assert_eq!(bid.message.proposer_fee_recipient, args.fee_recipient);
        assert_eq!(bid.message.builder_pubkey, keys.builder_pubkey());
        assert_eq!(*bid.block_hash(), env.execution_payload.block_hash);
        assert!(bid.verify_signature(builder_signing_domain()).is_ok());
    }

    #[tokio::test]
    async fn test_value_overflow() {
        let store = TestStore::default();
        let id = store.default_bid(1, &Bundle::new(vec![bytes!("01")]));
        let engine = MockEngine::new(envelope(U512::from(1u64) << 256, 21_000));
        let keys = SigningKeys::random();
        let relay = RelayClient::default();
        let ctx = ConfidentialContext::new(&store.inner, &engine, &keys, &relay);

        let res = build_block_bid(&ctx, &build_args(), id, PEEKER).await;
        assert!(matches!(res, Err(PrecompileError::ValueOverflow(_))));
    }

    #[tokio::test]
    async fn test_engine_error_surfaced() {
        let store = TestStore::default();
        let id = store.default_bid(1, &Bundle::new(vec![bytes!("01")]));
        let engine = MockEngine::failing(EngineError::Build("nonce too low".to_string()));
        let keys = SigningKeys::random();
        let relay = RelayClient::default();
        let ctx = ConfidentialContext::new(&store.inner, &engine, &keys, &relay);

        let res = build_block_bid(&ctx, &build_args(), id, PEEKER).await;
        assert!(matches!(res, Err(PrecompileError::Engine(EngineError::Build(msg))) if msg == "nonce too low"));
    }

    #[tokio::test]
    async fn test_bad_payload_and_pubkey() {
        let store = TestStore::default();
        let id = store.default_bid(1, &Bundle::new(vec![bytes!("01")]));
        let mut env = envelope(U512::from(1u64), 21_000);
        env.execution_payload.extra_data = Bytes::from(vec![0u8; 33]);
        let engine = MockEngine::new(env);
        let keys = SigningKeys::random();
        let relay = RelayClient::default();
        let ctx = ConfidentialContext::new(&store.inner, &engine, &keys, &relay);

        let res = build_block_bid(&ctx, &build_args(), id, PEEKER).await;
        assert!(matches!(res, Err(PrecompileError::PayloadConversion(_))));

        let engine = MockEngine::new(envelope(U512::from(1u64), 21_000));
        let ctx = ConfidentialContext::new(&store.inner, &engine, &keys, &relay);
        let mut args = build_args();
        args.proposer_pubkey = Bytes::from(vec![0x11; 20]);

        let res = build_block_bid(&ctx, &args, id, PEEKER).await;
        assert!(matches!(res, Err(PrecompileError::MalformedInput(_))));
    }

    #[tokio::test]
    async fn test_denied_caller_never_reaches_engine() {
        let store = TestStore::default();
        let id = store.default_bid(1, &Bundle::new(vec![bytes!("01")]));
        let engine = MockEngine::new(envelope(U512::from(1u64), 21_000));
        let keys = SigningKeys::random();
        let relay = RelayClient::default();
        let ctx = ConfidentialContext::new(&store.inner, &engine, &keys, &relay);

        let res = build_block_bid(&ctx, &build_args(), id, Address::repeat_byte(0x99)).await;
        assert!(matches!(res, Err(PrecompileError::PermissionDenied(_))));
        assert!(engine.bundle_calls.lock().is_empty());
    }
}
