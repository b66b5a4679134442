//! Minimal JSON-RPC 2.0 client.
//!
//! Only the read methods in [`RpcMethod`] can be expressed, so nothing built
//! on this client can submit a transaction.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use dysnomia_types::Address;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use url::Url;

use crate::RpcError;
use crate::slots::{self, Word};

const CONNECT_TIMEOUT_SECS: u64 = 10;
const MAX_ERROR_BODY_BYTES: usize = 4 * 1024;

/// The read-only methods the loader needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpcMethod {
    GetStorageAt,
    Call,
    ChainId,
}

impl RpcMethod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GetStorageAt => "eth_getStorageAt",
            Self::Call => "eth_call",
            Self::ChainId => "eth_chainId",
        }
    }
}

#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'static str,
    params: &'a Value,
}

#[derive(Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

fn client_builder() -> reqwest::ClientBuilder {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .redirect(reqwest::redirect::Policy::none())
}

#[derive(Debug)]
pub struct RpcClient {
    http: reqwest::Client,
    endpoint: Url,
    next_id: AtomicU64,
}

impl RpcClient {
    /// Build a client with a whole-request timeout.
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, RpcError> {
        let http = client_builder().timeout(timeout).build()?;
        Ok(Self::with_client(http, endpoint))
    }

    #[must_use]
    pub fn with_client(http: reqwest::Client, endpoint: Url) -> Self {
        Self {
            http,
            endpoint,
            next_id: AtomicU64::new(1),
        }
    }

    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn request(&self, method: RpcMethod, params: Value) -> Result<Value, RpcError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = RpcRequest {
            jsonrpc: "2.0",
            id,
            method: method.as_str(),
            params: &params,
        };
        tracing::debug!(method = method.as_str(), id, "RPC request");

        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await
            .inspect_err(|e| {
                tracing::warn!(method = method.as_str(), %e, "RPC transport failure");
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = read_capped_body(response).await;
            tracing::warn!(method = method.as_str(), %status, "RPC HTTP error");
            return Err(RpcError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: RpcResponse = response.json().await.map_err(|e| {
            tracing::warn!(method = method.as_str(), %e, "RPC response was not JSON-RPC");
            RpcError::Malformed(format!("{}: {e}", method.as_str()))
        })?;

        if let Some(error) = parsed.error {
            tracing::warn!(
                method = method.as_str(),
                code = error.code,
                message = %error.message,
                "RPC error object"
            );
            return Err(RpcError::Rpc {
                code: error.code,
                message: error.message,
            });
        }
        parsed
            .result
            .ok_or_else(|| RpcError::Malformed(format!("{}: missing result", method.as_str())))
    }

    async fn request_hex(&self, method: RpcMethod, params: Value) -> Result<String, RpcError> {
        match self.request(method, params).await? {
            Value::String(s) => Ok(s),
            other => Err(RpcError::Malformed(format!(
                "{}: expected hex string, got {other}",
                method.as_str()
            ))),
        }
    }

    pub async fn chain_id(&self) -> Result<u64, RpcError> {
        let raw = self.request_hex(RpcMethod::ChainId, json!([])).await?;
        let value = slots::parse_hex_uint(&raw)?;
        u64::try_from(value)
            .map_err(|_| RpcError::Malformed(format!("chain id out of range: {raw}")))
    }

    /// `eth_getStorageAt(contract, slot, "latest")`.
    pub async fn get_storage_at(&self, contract: Address, slot: u64) -> Result<Word, RpcError> {
        let raw = self
            .request_hex(
                RpcMethod::GetStorageAt,
                json!([contract.to_string(), slots::slot_key(slot), "latest"]),
            )
            .await?;
        Word::from_hex(&raw)
    }

    /// `eth_call` against `contract` with raw calldata; returns the result as
    /// an unsigned integer.
    pub async fn call_uint(&self, contract: Address, data: &[u8]) -> Result<BigUint, RpcError> {
        let raw = self
            .request_hex(
                RpcMethod::Call,
                json!([{ "to": contract.to_string(), "data": slots::encode_hex(data) }, "latest"]),
            )
            .await?;
        slots::parse_hex_uint(&raw)
    }

    pub async fn total_supply(&self, token: Address) -> Result<BigUint, RpcError> {
        self.call_uint(token, &slots::SELECTOR_TOTAL_SUPPLY).await
    }

    pub async fn balance_of(&self, token: Address, holder: Address) -> Result<BigUint, RpcError> {
        let mut data = Vec::with_capacity(36);
        data.extend_from_slice(&slots::SELECTOR_BALANCE_OF);
        data.extend_from_slice(&[0u8; 12]);
        data.extend_from_slice(holder.as_bytes());
        self.call_uint(token, &data).await
    }
}

async fn read_capped_body(response: reqwest::Response) -> String {
    match response.bytes().await {
        Ok(bytes) if bytes.len() > MAX_ERROR_BODY_BYTES => {
            let text = String::from_utf8_lossy(&bytes[..MAX_ERROR_BODY_BYTES]);
            format!("{text}...(truncated)")
        }
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(_) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> RpcClient {
        RpcClient::new(server.uri().parse().unwrap(), Duration::from_secs(5)).unwrap()
    }

    fn token() -> Address {
        "0x00000000000000000000000000000000000000aa".parse().unwrap()
    }

    fn rpc_ok(result: serde_json::Value) -> ResponseTemplate {
        ResponseTemplate::new(200)
            .set_body_json(json!({"jsonrpc": "2.0", "id": 1, "result": result}))
    }

    #[tokio::test]
    async fn chain_id_parses_hex_quantity() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"jsonrpc": "2.0", "method": "eth_chainId"})))
            .respond_with(rpc_ok(json!("0x171")))
            .expect(1)
            .mount(&server)
            .await;

        assert_eq!(client(&server).chain_id().await.unwrap(), 369);
    }

    #[tokio::test]
    async fn storage_read_sends_padded_slot() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "method": "eth_getStorageAt",
                "params": [token().to_string(), slots::slot_key(7), "latest"],
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "result": format!("0x{:064x}", 5u64),
            })))
            .mount(&server)
            .await;

        let word = client(&server).get_storage_at(token(), 7).await.unwrap();
        assert_eq!(word.low_u64(), 5);
    }

    #[tokio::test]
    async fn balance_of_encodes_holder() {
        let server = MockServer::start().await;
        let holder: Address = "0x1111111111111111111111111111111111111111".parse().unwrap();
        let data = format!("0x70a08231{}{}", "0".repeat(24), "11".repeat(20));
        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "method": "eth_call",
                "params": [{"to": token().to_string(), "data": data}, "latest"],
            })))
            .respond_with(rpc_ok(json!("0x0de0b6b3a7640000")))
            .mount(&server)
            .await;

        let balance = client(&server).balance_of(token(), holder).await.unwrap();
        assert_eq!(balance, BigUint::from(10u64.pow(18)));
    }

    #[tokio::test]
    async fn error_object_surfaces_as_rpc_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "error": {"code": -32000, "message": "header not found"},
            })))
            .mount(&server)
            .await;

        let err = client(&server).chain_id().await.unwrap_err();
        assert!(matches!(
            err,
            RpcError::Rpc { code: -32000, ref message } if message == "header not found"
        ));
    }

    #[tokio::test]
    async fn http_status_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .expect(1)
            .mount(&server)
            .await;

        let err = client(&server).chain_id().await.unwrap_err();
        match err {
            RpcError::Status { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body, "overloaded");
            }
            other => panic!("expected Status, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_hex_result_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(rpc_ok(json!(17)))
            .mount(&server)
            .await;

        let err = client(&server).chain_id().await.unwrap_err();
        assert!(matches!(err, RpcError::Malformed(_)));
    }

    #[test]
    fn method_names() {
        assert_eq!(RpcMethod::GetStorageAt.as_str(), "eth_getStorageAt");
        assert_eq!(RpcMethod::Call.as_str(), "eth_call");
        assert_eq!(RpcMethod::ChainId.as_str(), "eth_chainId");
    }
}
