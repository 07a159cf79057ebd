//! The JSON-RPC 2.0 endpoint: envelope validation, method routing, and
//! error mapping.
//!
//! Methods are routed by prefix. `btc_*` and `metashrew_*` are passthrough
//! forwards whose backend envelopes are returned verbatim; `esplora_*` maps
//! onto the explorer operations and wraps their results in a fresh envelope.
//! Any core error surfaces as a generic internal error (`-32603`) carrying
//! the error's message.

use axum::extract::State;
use axum::Json;
use bitcoin::Txid;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use turnstile_core::error::GatewayError;
use turnstile_core::esplora::EsploraApi;
use turnstile_core::resolve;
use turnstile_core::types::Utxo;

use super::SharedState;

// JSON-RPC 2.0 error codes.
const INVALID_REQUEST: i64 = -32600;
const METHOD_NOT_FOUND: i64 = -32601;
const INTERNAL_ERROR: i64 = -32603;

pub(super) async fn handle(
    State(state): State<SharedState>,
    Json(body): Json<Value>,
) -> Json<Value> {
    let jsonrpc_ok = body.get("jsonrpc").and_then(Value::as_str) == Some("2.0");
    let method = body.get("method").and_then(Value::as_str).map(str::to_owned);
    let (Some(method), true) = (method, jsonrpc_ok) else {
        return Json(error_response(
            Value::Null,
            INVALID_REQUEST,
            "Invalid JSON-RPC request",
        ));
    };

    let id = body.get("id").cloned().unwrap_or(Value::Null);
    let params = body
        .get("params")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    debug!(%method, params = params.len(), "json-rpc request");

    if let Some(node_method) = method.strip_prefix("btc_") {
        // btc_getBlock -> getblock; the node's own envelope is returned as-is.
        return Json(
            match state
                .node
                .call(&node_method.to_ascii_lowercase(), &params, &id)
                .await
            {
                Ok(envelope) => envelope,
                Err(err) => error_response(id, INTERNAL_ERROR, &err.to_string()),
            },
        );
    }

    if method.starts_with("metashrew_") {
        return Json(match state.indexer.forward(&body).await {
            Ok(envelope) => envelope,
            Err(err) => error_response(id, INTERNAL_ERROR, &err.to_string()),
        });
    }

    if method.starts_with("esplora_") {
        return Json(dispatch_esplora(state.esplora.as_ref(), &method, &params, id).await);
    }

    Json(error_response(id, METHOD_NOT_FOUND, "Method not supported"))
}

async fn dispatch_esplora(
    esplora: &dyn EsploraApi,
    method: &str,
    params: &[Value],
    id: Value,
) -> Value {
    match run_esplora(esplora, method, params).await {
        Ok(Some(result)) => success_response(id, result),
        Ok(None) => error_response(
            id,
            METHOD_NOT_FOUND,
            &format!("Method {method} not found"),
        ),
        Err(err) => error_response(id, INTERNAL_ERROR, &err.to_string()),
    }
}

/// Run one explorer operation. `Ok(None)` means the method name is unknown.
async fn run_esplora(
    esplora: &dyn EsploraApi,
    method: &str,
    params: &[Value],
) -> Result<Option<Value>, GatewayError> {
    let result = match method {
        "esplora_tx" => {
            let txid: Txid = param(params, 0, "txid")?;
            to_result(esplora.transaction(&txid).await?)?
        }
        "esplora_tx::hex" => {
            let txid: Txid = param(params, 0, "txid")?;
            to_result(esplora.transaction_hex(&txid).await?)?
        }
        "esplora_tx::broadcast" => {
            let raw_hex: String = param(params, 0, "rawHex")?;
            let provider: Option<String> = opt_param(params, 1, "provider")?;
            to_result(esplora.broadcast(&raw_hex, provider.as_deref()).await?)?
        }
        "esplora_txs:bulk" => {
            let txids: Vec<Txid> = param(params, 0, "txids")?;
            to_result(esplora.bulk_transactions(&txids).await?)?
        }
        "esplora_utxos:spendable" => {
            let utxos: Vec<Utxo> = param(params, 0, "utxos")?;
            to_result(resolve::spendable_utxos(esplora, &utxos).await?)?
        }
        "esplora_utxo" => {
            let outpoint: String = param(params, 0, "outpoint")?;
            to_result(esplora.utxo(&outpoint).await?)?
        }
        "esplora_address" => {
            let address: String = param(params, 0, "address")?;
            to_result(esplora.address(&address).await?)?
        }
        "esplora_address::balance" => {
            let address: String = param(params, 0, "address")?;
            to_result(esplora.address_balance(&address).await?)?
        }
        "esplora_address::utxo" => {
            let address: String = param(params, 0, "address")?;
            to_result(esplora.address_utxos(&address).await?)?
        }
        "esplora_address::txs" => {
            let address: String = param(params, 0, "address")?;
            let last_seen: Option<Txid> = opt_param(params, 1, "lastSeenTxid")?;
            to_result(esplora.address_txs(&address, last_seen.as_ref()).await?)?
        }
        "esplora_fee" => to_result(esplora.fee_estimate().await?)?,
        _ => return Ok(None),
    };
    Ok(Some(result))
}

fn to_result<T: serde::Serialize>(value: T) -> Result<Value, GatewayError> {
    serde_json::to_value(value)
        .map_err(|e| GatewayError::InvalidResponse(format!("serialize result: {e}")))
}

/// Deserialize one positional parameter. The caller is trusted to supply
/// correctly shaped parameters; a mismatch is reported as an operation
/// failure, not as a distinct invalid-params response.
fn param<T: DeserializeOwned>(params: &[Value], index: usize, name: &str) -> Result<T, GatewayError> {
    let value = params.get(index).cloned().unwrap_or(Value::Null);
    serde_json::from_value(value)
        .map_err(|e| GatewayError::BadParams(format!("invalid `{name}` parameter: {e}")))
}

/// Deserialize one optional positional parameter; absent or null is `None`.
fn opt_param<T: DeserializeOwned>(
    params: &[Value],
    index: usize,
    name: &str,
) -> Result<Option<T>, GatewayError> {
    match params.get(index) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value.clone())
            .map(Some)
            .map_err(|e| GatewayError::BadParams(format!("invalid `{name}` parameter: {e}"))),
    }
}

pub(super) fn success_response(id: Value, result: Value) -> Value {
    serde_json::json!({ "jsonrpc": "2.0", "id": id, "result": result })
}

pub(super) fn error_response(id: Value, code: i64, message: &str) -> Value {
    serde_json::json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": { "code": code, "message": message },
    })
}
