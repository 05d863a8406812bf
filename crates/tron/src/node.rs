use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Body for `/wallet/triggersmartcontract`. Addresses are call-form hex;
/// the parameter hex carries only the ABI-encoded arguments (the node
/// derives the selector from `function_selector`).
#[derive(Debug, Clone, Serialize)]
pub struct TriggerSmartContractRequest {
    pub owner_address: String,
    pub contract_address: String,
    pub function_selector: String,
    pub parameter: String,
    pub call_value: u64,
    pub fee_limit: u64,
}

/// Body for `/wallet/createtransaction`. Native transfers use user-form
/// addresses directly; `visible: true` asks the node to echo them back in
/// that form.
#[derive(Debug, Clone, Serialize)]
pub struct CreateTransactionRequest {
    pub owner_address: String,
    pub to_address: String,
    pub amount: u64,
    pub visible: bool,
}

/// Node-issued unsigned transaction. `raw_data` is opaque to this client:
/// it is re-serialized into the signed envelope but never reinterpreted.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTransaction {
    #[serde(default)]
    pub visible: bool,
    #[serde(rename = "txID", default)]
    pub tx_id: String,
    #[serde(default)]
    pub raw_data: Value,
    #[serde(default)]
    pub raw_data_hex: String,
}

/// Broadcastable envelope: the unsigned transaction's fields plus exactly
/// one signature. `raw_data` is the re-serialized string form and
/// `visible` is forced off for broadcast.
#[derive(Debug, Clone, Serialize)]
pub struct SignedTransaction {
    pub visible: bool,
    #[serde(rename = "txID")]
    pub tx_id: String,
    pub raw_data: String,
    pub raw_data_hex: String,
    pub signature: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct TriggerSmartContractResponse {
    #[serde(default)]
    transaction: Option<RawTransaction>,
}

#[derive(Debug, Deserialize)]
struct BroadcastResponse {
    #[serde(default)]
    result: bool,
    #[serde(default)]
    txid: String,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    #[serde(default)]
    error: Option<JsonRpcError>,
    #[serde(default)]
    result: Option<String>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
}

/// HTTP gateway to a Tron full/solidity node pair.
///
/// Every call is a blocking request/response with a client-level timeout;
/// timeouts surface as transport errors, the same retryable branch as a
/// non-200 status.
pub struct NodeClient {
    http: reqwest::Client,
    full_node_url: String,
    solidity_node_url: String,
    next_id: AtomicU64,
}

impl NodeClient {
    pub fn new(full_node_url: &str, solidity_node_url: &str) -> Result<Self> {
        let http = reqwest::ClientBuilder::new()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::Transport {
                op: "client",
                message: e.to_string(),
            })?;
        Ok(Self {
            http,
            full_node_url: full_node_url.trim_end_matches('/').to_string(),
            solidity_node_url: solidity_node_url.trim_end_matches('/').to_string(),
            next_id: AtomicU64::new(1),
        })
    }

    async fn post_json<B: Serialize>(
        &self,
        op: &'static str,
        url: String,
        body: &B,
    ) -> Result<String> {
        let resp = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| Error::Transport {
                op,
                message: format!("POST {url}: {e}"),
            })?;
        let status = resp.status().as_u16();
        let text = resp.text().await.map_err(|e| Error::Transport {
            op,
            message: format!("read body: {e}"),
        })?;
        if status != 200 {
            return Err(Error::Protocol {
                op,
                status,
                body: text,
            });
        }
        Ok(text)
    }

    /// Asks the node to assemble an unsigned token-transfer transaction.
    /// A 200 with no transaction or an empty `txID` is a protocol error.
    pub async fn trigger_smart_contract(
        &self,
        req: &TriggerSmartContractRequest,
    ) -> Result<RawTransaction> {
        let op = "triggersmartcontract";
        let url = format!("{}/wallet/triggersmartcontract", self.solidity_node_url);
        let body = self.post_json(op, url, req).await?;
        let parsed: TriggerSmartContractResponse =
            serde_json::from_str(&body).map_err(|_| Error::Protocol {
                op,
                status: 200,
                body: body.clone(),
            })?;
        match parsed.transaction {
            Some(tx) if !tx.tx_id.is_empty() => Ok(tx),
            _ => Err(Error::Protocol {
                op,
                status: 200,
                body,
            }),
        }
    }

    /// Asks the node to assemble an unsigned native transfer.
    pub async fn create_transaction(
        &self,
        req: &CreateTransactionRequest,
    ) -> Result<RawTransaction> {
        let op = "createtransaction";
        let url = format!("{}/wallet/createtransaction", self.full_node_url);
        let body = self.post_json(op, url, req).await?;
        let tx: RawTransaction = serde_json::from_str(&body).map_err(|_| Error::Protocol {
            op,
            status: 200,
            body: body.clone(),
        })?;
        if tx.tx_id.is_empty() {
            return Err(Error::Protocol {
                op,
                status: 200,
                body,
            });
        }
        Ok(tx)
    }

    /// Submits a signed envelope; success requires `result == true` and a
    /// non-empty `txid`, which is returned verbatim.
    pub async fn broadcast_transaction(&self, tx: &SignedTransaction) -> Result<String> {
        let op = "broadcasttransaction";
        let url = format!("{}/wallet/broadcasttransaction", self.solidity_node_url);
        let body = self.post_json(op, url, tx).await?;
        let parsed: BroadcastResponse = serde_json::from_str(&body).map_err(|_| Error::Protocol {
            op,
            status: 200,
            body: body.clone(),
        })?;
        if !parsed.result || parsed.txid.is_empty() {
            return Err(Error::Protocol {
                op,
                status: 200,
                body,
            });
        }
        Ok(parsed.txid)
    }

    async fn json_rpc(&self, op: &'static str, method: &str, params: Value) -> Result<String> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let req = serde_json::json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });
        let url = format!("{}/jsonrpc", self.solidity_node_url);
        let body = self.post_json(op, url, &req).await?;
        let parsed: JsonRpcResponse = serde_json::from_str(&body).map_err(|_| Error::Protocol {
            op,
            status: 200,
            body: body.clone(),
        })?;
        if let Some(err) = parsed.error {
            return Err(Error::Rpc {
                op,
                message: format!("code {}: {}", err.code, err.message),
            });
        }
        match parsed.result {
            // "0x" alone is not a hex number; reject instead of reading zero.
            Some(result) if result.len() >= 3 => Ok(result),
            _ => Err(Error::Protocol {
                op,
                status: 200,
                body,
            }),
        }
    }

    /// Generic read-only contract call; returns the raw `0x...` result hex.
    pub async fn eth_call(&self, to: &str, data: &str) -> Result<String> {
        self.json_rpc(
            "eth_call",
            "eth_call",
            serde_json::json!([{ "to": to, "value": "0x0", "data": data }, "latest"]),
        )
        .await
    }

    /// Native balance query; returns the raw `0x...` result hex in sun.
    pub async fn eth_get_balance(&self, address: &str) -> Result<String> {
        self.json_rpc(
            "eth_getBalance",
            "eth_getBalance",
            serde_json::json!([address, "latest"]),
        )
        .await
    }
}
