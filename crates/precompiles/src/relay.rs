use std::time::Duration;

use alloy_primitives::Bytes;
use reqwest::{
    header::{ACCEPT, CONTENT_TYPE},
    RequestBuilder,
};
use serde::Serialize;
use serde_json::value::RawValue;
use suave_common::{SigningKeys, DEFAULT_RELAY_TIMEOUT_MS};
use suave_types::SignedBidSubmission;
use tracing::{debug, warn};

use crate::error::PrecompileError;

pub const BUILDER_BLOCKS_PATH: &str = "/relay/v1/builder/blocks";
pub const FLASHBOTS_SIGNATURE_HEADER: &str = "X-Flashbots-Signature";
pub const DEFAULT_RELAY_TIMEOUT: Duration = Duration::from_millis(DEFAULT_RELAY_TIMEOUT_MS);

#[derive(Serialize)]
struct JsonRpcRequest<'a> {
    id: u64,
    jsonrpc: &'static str,
    method: &'a str,
    params: [&'a RawValue; 1],
}

/// HTTP client for relays and bundle endpoints. Every request is a single attempt bounded by
/// `timeout`.
#[derive(Clone)]
pub struct RelayClient {
    http: reqwest::Client,
    timeout: Duration,
}

impl Default for RelayClient {
    fn default() -> Self {
        Self::new(reqwest::Client::new(), DEFAULT_RELAY_TIMEOUT)
    }
}

impl RelayClient {
    pub fn new(http: reqwest::Client, timeout: Duration) -> Self {
        Self { http, timeout }
    }

    /// POSTs an already serialized builder bid to `<relay_url>/relay/v1/builder/blocks`.
    pub async fn submit_block_bid(
        &self,
        relay_url: &str,
        builder_bid: Bytes,
    ) -> Result<(), PrecompileError> {
        let endpoint = format!("{}{BUILDER_BLOCKS_PATH}", relay_url.trim_end_matches('/'));
        debug!(%endpoint, len = builder_bid.len(), "submitting block bid");

        let request = self
            .http
            .post(endpoint)
            .timeout(self.timeout)
            .header(CONTENT_TYPE, "application/json")
            .body(builder_bid.to_vec());

        Self::send(request).await
    }

    pub async fn submit_signed_bid(
        &self,
        relay_url: &str,
        bid: &SignedBidSubmission,
    ) -> Result<(), PrecompileError> {
        let body = serde_json::to_vec(bid)
            .map_err(|err| PrecompileError::Encoding(format!("builder bid: {err}")))?;
        self.submit_block_bid(relay_url, body.into()).await
    }

    /// Sends `params` as the single parameter of a JSON-RPC call, signed with the bundle key.
    pub async fn submit_bundle_json_rpc(
        &self,
        keys: &SigningKeys,
        url: &str,
        method: &str,
        params: &[u8],
    ) -> Result<(), PrecompileError> {
        let params = std::str::from_utf8(params)
            .ok()
            .and_then(|params| serde_json::from_str::<&RawValue>(params).ok())
            .ok_or_else(|| {
                PrecompileError::MalformedInput("params are not valid json".to_string())
            })?;

        let request = JsonRpcRequest { id: 1, jsonrpc: "2.0", method, params: [params] };
        let body = serde_json::to_vec(&request)
            .map_err(|err| PrecompileError::Encoding(format!("json-rpc request: {err}")))?;

        let signature = keys.sign_request_body(&body).await?;

        debug!(%url, method, "submitting bundle json-rpc");
        let request = self
            .http
            .post(url)
            .timeout(self.timeout)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .header(FLASHBOTS_SIGNATURE_HEADER, signature)
            .body(body);

        Self::send(request).await
    }

    async fn send(request: RequestBuilder) -> Result<(), PrecompileError> {
        let response = request
            .send()
            .await
            .map_err(|err| PrecompileError::Upstream(format!("could not send request: {err}")))?;
        Self::process_response(response).await
    }

    async fn process_response(response: reqwest::Response) -> Result<(), PrecompileError> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.map_err(|err| {
            PrecompileError::Upstream(format!(
                "could not read error response body for status code {status}: {err}"
            ))
        })?;

        warn!(status = status.as_u16(), %body, "request rejected");
        Err(PrecompileError::RelayRejected { status: status.as_u16(), body })
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;

    use super::*;

    #[tokio::test]
    async fn test_submit_block_bid_success() {
        let mut server = mockito::Server::new_async().await;
        let client = RelayClient::default();

        for status in [200, 204] {
            let mock = server
                .mock("POST", BUILDER_BLOCKS_PATH)
                .match_header("content-type", "application/json")
                .match_body(r#"{"bid":1}"#)
                .with_status(status)
                .create_async()
                .await;

            client
                .submit_block_bid(&server.url(), Bytes::from_static(br#"{"bid":1}"#))
                .await
                .unwrap();
            mock.assert_async().await;
            mock.remove_async().await;
        }
    }

    #[tokio::test]
    async fn test_submit_block_bid_rejected() {
        let mut server = mockito::Server::new_async().await;
        let client = RelayClient::default();

        for (status, body) in [(400, "invalid signature"), (500, "{\"code\":500,\"message\":\"boom\"}")] {
            let mock = server
                .mock("POST", BUILDER_BLOCKS_PATH)
                .with_status(status)
                .with_body(body)
                .create_async()
                .await;

            let err = client
                .submit_block_bid(&server.url(), Bytes::from_static(b"{}"))
                .await
                .unwrap_err();
            assert!(matches!(
                &err,
                PrecompileError::RelayRejected { status: s, body: b } if *s == status as u16 && b == body
            ));
            assert!(err.to_string().contains(body));
            mock.remove_async().await;
        }
    }

    #[test]
    fn test_default_timeout() {
        assert_eq!(DEFAULT_RELAY_TIMEOUT, Duration::from_secs(3));
    }

    #[tokio::test]
    async fn test_unreachable_relay() {
        let client = RelayClient::default();
        let res = client.submit_block_bid("http://127.0.0.1:1", Bytes::from_static(b"{}")).await;
        assert!(matches!(res, Err(PrecompileError::Upstream(_))));
    }

    #[tokio::test]
    async fn test_relay_timeout() {
        // accepted by the backlog, never answered
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());

        let client = RelayClient::new(reqwest::Client::new(), Duration::from_millis(100));
        let res = client.submit_block_bid(&url, Bytes::from_static(b"{}")).await;
        assert!(matches!(res, Err(PrecompileError::Upstream(_))));
    }

    #[tokio::test]
    async fn test_submit_bundle_json_rpc() {
        let mut server = mockito::Server::new_async().await;
        let keys = SigningKeys::random();
        let client = RelayClient::default();

        let expected_body =
            r#"{"id":1,"jsonrpc":"2.0","method":"mev_sendBundle","params":[{"txs":["0x01"]}]}"#;
        let mock = server
            .mock("POST", "/")
            .match_header("content-type", "application/json")
            .match_header("accept", "application/json")
            .match_header(
                "x-flashbots-signature",
                Matcher::Regex("^0x[0-9a-fA-F]{40}:0x[0-9a-f]{130}$".to_string()),
            )
            .match_body(expected_body)
            .with_status(200)
            .with_body(r#"{"id":1,"jsonrpc":"2.0","result":null}"#)
            .create_async()
            .await;

        client
            .submit_bundle_json_rpc(&keys, &server.url(), "mev_sendBundle", br#"{"txs":["0x01"]}"#)
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_submit_bundle_json_rpc_errors() {
        let mut server = mockito::Server::new_async().await;
        let keys = SigningKeys::random();
        let client = RelayClient::default();

        let res = client.submit_bundle_json_rpc(&keys, &server.url(), "mev_sendBundle", b"{not json").await;
        assert!(matches!(res, Err(PrecompileError::MalformedInput(_))));

        let _mock = server
            .mock("POST", "/")
            .with_status(403)
            .with_body("unknown signer")
            .create_async()
            .await;
        let res = client.submit_bundle_json_rpc(&keys, &server.url(), "mev_sendBundle", b"{}").await;
        assert!(matches!(res, Err(PrecompileError::RelayRejected { status: 403, body }) if body == "unknown signer"));
    }
}
