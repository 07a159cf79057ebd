//! Indexer JSON-RPC passthrough client.

use std::time::Duration;

use serde_json::Value;
use tracing::{debug, trace};

use crate::error::GatewayError;

/// Forwards whole JSON-RPC request bodies to the indexer and returns its
/// responses verbatim.
pub struct IndexerClient {
    client: reqwest::Client,
    url: String,
}

impl IndexerClient {
    pub fn new(url: &str) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .build()
            .expect("reqwest client builder uses valid static config");

        Self {
            client,
            url: url.to_owned(),
        }
    }

    pub async fn forward(&self, body: &Value) -> Result<Value, GatewayError> {
        debug!("indexer rpc forward");

        let response = self
            .client
            .post(&self.url)
            .json(body)
            .send()
            .await
            .map_err(|e| GatewayError::Backend(format!("indexer rpc request failed: {e}")))?;
        let status = response.status();
        let text = response.text().await.map_err(|e| {
            GatewayError::Backend(format!("failed to read indexer rpc response: {e}"))
        })?;
        trace!(%status, body = %text, "indexer rpc response");

        serde_json::from_str(&text).map_err(|e| {
            GatewayError::InvalidResponse(format!("decode indexer rpc response: {e}; body={text}"))
        })
    }
}
