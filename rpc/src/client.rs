//! JSON-RPC 1.0 client for the Elements node.

use crate::{
    api::NodeRpc,
    convert::sats_to_units,
    error::{RpcError, RpcResult},
    model::*,
};
use amm_core::{debug, trace};
use amm_pool::AssetId;
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use std::{
    collections::HashMap,
    str::FromStr,
    sync::atomic::{AtomicU64, Ordering},
};

/// Label under which the node reports the policy asset.
pub const POLICY_ASSET_LABEL: &str = "bitcoin";

#[derive(Serialize)]
struct Request<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Deserialize)]
struct Response<T> {
    result: Option<T>,
    error: Option<ErrorObject>,
}

#[derive(Deserialize)]
struct ErrorObject {
    code: i64,
    message: String,
}

pub struct HttpNodeClient {
    url: String,
    user: String,
    password: String,
    client: reqwest::Client,
    next_id: AtomicU64,
}

impl HttpNodeClient {
    /// `server` is `host:port`, optionally with a scheme. Plain HTTP is assumed without one.
    pub fn new(server: &str, user: &str, password: &str) -> Self {
        let url = if server.contains("://") { server.to_string() } else { format!("http://{server}") };
        Self {
            url,
            user: user.to_string(),
            password: password.to_string(),
            client: reqwest::Client::new(),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn request_body<'a>(&self, method: &'a str, params: Value) -> Request<'a> {
        Request { jsonrpc: "1.0", id: self.next_id.fetch_add(1, Ordering::Relaxed), method, params }
    }

    async fn call<T: DeserializeOwned>(&self, method: &'static str, params: Value) -> RpcResult<T> {
        let body = self.request_body(method, params);
        trace!("rpc request {} #{}: {}", method, body.id, body.params);

        let response = self.client.post(&self.url).basic_auth(&self.user, Some(&self.password)).json(&body).send().await?;
        // Node errors come with a non-success status and a regular JSON-RPC body
        let status = response.status();
        let text = response.text().await?;
        decode_response(method, status.as_u16(), &text)
    }
}

fn decode_response<T: DeserializeOwned>(method: &'static str, status: u16, text: &str) -> RpcResult<T> {
    let response: Response<T> = match serde_json::from_str(text) {
        Ok(response) => response,
        Err(_) if !(200..300).contains(&status) => return Err(RpcError::HttpStatus { status, body: text.to_string() }),
        Err(err) => return Err(RpcError::Decode { method, reason: err.to_string() }),
    };
    if let Some(error) = response.error {
        return Err(RpcError::Node { method, code: error.code, message: error.message });
    }
    response.result.ok_or(RpcError::MissingResult(method))
}

#[async_trait]
impl NodeRpc for HttpNodeClient {
    async fn issue_asset(&self, amount: u64, token_amount: u64) -> RpcResult<IssueAssetResponse> {
        // Unblinded issuance, so the asset and amounts stay explicit on chain
        let params = json!([sats_to_units(amount), sats_to_units(token_amount), false]);
        let response: IssueAssetResponse = self.call("issueasset", params).await?;
        debug!("Issued {} sats of asset {} in {}", amount, response.asset, response.txid);
        Ok(response)
    }

    async fn send_to_address(&self, address: &str, amount: u64, asset: &AssetId) -> RpcResult<String> {
        let params = json!({ "address": address, "amount": sats_to_units(amount), "assetlabel": asset.to_string() });
        let txid: String = self.call("sendtoaddress", params).await?;
        debug!("Sent {} sats of {} to {} in {}", amount, asset, address, txid);
        Ok(txid)
    }

    async fn get_raw_transaction(&self, txid: &str) -> RpcResult<RawTransaction> {
        self.call("getrawtransaction", json!([txid, true])).await
    }

    async fn send_raw_transaction(&self, tx_hex: &str) -> RpcResult<String> {
        self.call("sendrawtransaction", json!([tx_hex])).await
    }

    async fn policy_asset(&self) -> RpcResult<AssetId> {
        let labels: HashMap<String, String> = self.call("dumpassetlabels", json!([])).await?;
        let asset = labels.get(POLICY_ASSET_LABEL).ok_or_else(|| RpcError::MissingAssetLabel(POLICY_ASSET_LABEL.to_string()))?;
        AssetId::from_str(asset).map_err(|err| RpcError::Decode { method: "dumpassetlabels", reason: err.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_url() {
        assert_eq!(HttpNodeClient::new("localhost:18884", "user", "pass").url(), "http://localhost:18884");
        assert_eq!(HttpNodeClient::new("https://node.example:443", "user", "pass").url(), "https://node.example:443");
    }

    #[test]
    fn test_request_body() {
        let client = HttpNodeClient::new("localhost:18884", "user", "pass");
        let first = serde_json::to_value(client.request_body("getrawtransaction", json!(["ab", true]))).unwrap();
        let second = serde_json::to_value(client.request_body("sendrawtransaction", json!(["00"]))).unwrap();
        assert_eq!(first, json!({ "jsonrpc": "1.0", "id": 1, "method": "getrawtransaction", "params": ["ab", true] }));
        assert_eq!(second["id"], json!(2));
    }

    #[test]
    fn test_decode_response() {
        let ok: RpcResult<String> = decode_response("sendrawtransaction", 200, r#"{"result":"ab12","error":null,"id":1}"#);
        assert_eq!(ok.unwrap(), "ab12");

        let rejected: RpcResult<String> = decode_response(
            "sendrawtransaction",
            500,
            r#"{"result":null,"error":{"code":-26,"message":"non-mandatory-script-verify-flag"},"id":1}"#,
        );
        match rejected {
            Err(RpcError::Node { method, code, message }) => {
                assert_eq!(method, "sendrawtransaction");
                assert_eq!(code, -26);
                assert_eq!(message, "non-mandatory-script-verify-flag");
            }
            other => panic!("unexpected result {other:?}"),
        }

        let unauthorized: RpcResult<String> = decode_response("getrawtransaction", 401, "");
        assert!(matches!(unauthorized, Err(RpcError::HttpStatus { status: 401, .. })));

        let empty: RpcResult<String> = decode_response("getrawtransaction", 200, r#"{"result":null,"error":null,"id":1}"#);
        assert!(matches!(empty, Err(RpcError::MissingResult("getrawtransaction"))));
    }
}
