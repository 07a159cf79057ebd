//! Bitcoin Core node JSON-RPC forwarding client.

use std::time::Duration;

use serde_json::Value;
use tracing::{debug, trace};

use crate::error::GatewayError;

/// Forwards single RPC calls to a Bitcoin Core-style node.
///
/// The node speaks the JSON-RPC 1.0 dialect and reports errors inside its
/// own response envelope, often with a non-2xx status. The full envelope is
/// returned verbatim so callers see exactly what the node produced.
pub struct NodeRpcClient {
    client: reqwest::Client,
    url: String,
    auth: Option<(String, String)>,
}

impl NodeRpcClient {
    pub fn new(url: &str, user: Option<&str>, pass: Option<&str>) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .build()
            .expect("reqwest client builder uses valid static config");

        let auth = match (user, pass) {
            (Some(user), Some(pass)) => Some((user.to_owned(), pass.to_owned())),
            _ => None,
        };

        Self {
            client,
            url: url.to_owned(),
            auth,
        }
    }

    /// Issue one RPC call and return the node's full response envelope.
    pub async fn call(
        &self,
        method: &str,
        params: &[Value],
        id: &Value,
    ) -> Result<Value, GatewayError> {
        let body = serde_json::json!({
            "jsonrpc": "1.0",
            "id": id,
            "method": method,
            "params": params,
        });
        debug!(rpc.method = method, rpc.params = params.len(), "node rpc call");

        let mut builder = self.client.post(&self.url).json(&body);
        if let Some((user, pass)) = &self.auth {
            builder = builder.basic_auth(user, Some(pass));
        }

        let response = builder
            .send()
            .await
            .map_err(|e| GatewayError::Backend(format!("node rpc request failed: {e}")))?;
        let status = response.status();
        let text = response.text().await.map_err(|e| {
            GatewayError::Backend(format!("failed to read node rpc response: {e}"))
        })?;
        trace!(%status, body = %text, "node rpc response");

        // Error envelopes arrive with non-2xx statuses; the body is still
        // the response, so only an undecodable body is a failure here.
        serde_json::from_str(&text).map_err(|e| {
            GatewayError::InvalidResponse(format!("decode node rpc response: {e}; body={text}"))
        })
    }
}
