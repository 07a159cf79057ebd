use std::num::NonZeroU32;
use std::time::Duration;

use async_trait::async_trait;
use bitcoin::Txid;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::header;
use tracing::{debug, trace};

use crate::error::GatewayError;
use crate::types::{AddressInfo, DecodedTransaction, Utxo};

use super::EsploraApi;

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Esplora REST client over HTTP(S).
///
/// If `requests_per_second` is set, outbound requests are rate-limited
/// (a batched call counts as one request). Public explorer deployments
/// throttle aggressively, so operators pointing at one usually want this.
#[derive(Debug)]
pub struct HttpEsploraClient {
    client: reqwest::Client,
    base_url: String,
    limiter: Option<DirectRateLimiter>,
}

impl HttpEsploraClient {
    pub fn new(
        base_url: &str,
        requests_per_second: Option<u32>,
    ) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .tcp_nodelay(true)
            .build()
            .expect("reqwest client builder uses valid static config");

        let limiter = match requests_per_second {
            None => None,
            Some(limit) => {
                let limit = NonZeroU32::new(limit).ok_or_else(|| {
                    GatewayError::BadParams(
                        "esplora requests_per_second must be at least 1".to_owned(),
                    )
                })?;
                Some(RateLimiter::direct(Quota::per_second(limit)))
            }
        };

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            limiter,
        })
    }

    async fn wait_for_rate_limit(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: String,
        what: &str,
    ) -> Result<T, GatewayError> {
        let body = self.get_text(url.clone(), what).await?;
        serde_json::from_str(&body).map_err(|e| {
            GatewayError::InvalidResponse(format!("decode {what} from {url}: {e}"))
        })
    }

    async fn get_text(&self, url: String, what: &str) -> Result<String, GatewayError> {
        self.wait_for_rate_limit().await;
        debug!(%url, what, "esplora request");

        let response = self.client.get(&url).send().await.map_err(|e| {
            GatewayError::Backend(format!("failed to fetch {what} from {url}: {e}"))
        })?;
        let status = response.status();
        let body = response.text().await.map_err(|e| {
            GatewayError::Backend(format!("failed to read {what} response from {url}: {e}"))
        })?;
        debug!(%url, %status, body_len = body.len(), "esplora response");
        trace!(%url, body = %body, "esplora response body");

        if !status.is_success() {
            return Err(GatewayError::Backend(format!(
                "failed to fetch {what} from {url}: {status}: {body}"
            )));
        }
        Ok(body)
    }
}

#[async_trait]
impl EsploraApi for HttpEsploraClient {
    async fn transaction(&self, txid: &Txid) -> Result<DecodedTransaction, GatewayError> {
        self.get_json(format!("{}/tx/{txid}", self.base_url), "transaction")
            .await
    }

    async fn transaction_hex(&self, txid: &Txid) -> Result<String, GatewayError> {
        let body = self
            .get_text(format!("{}/tx/{txid}/hex", self.base_url), "raw transaction")
            .await?;
        Ok(body.trim().to_owned())
    }

    async fn bulk_transactions(
        &self,
        txids: &[Txid],
    ) -> Result<Vec<DecodedTransaction>, GatewayError> {
        let url = format!("{}/txs", self.base_url);
        self.wait_for_rate_limit().await;
        debug!(%url, tx_count = txids.len(), "esplora bulk transaction request");

        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "txs": txids }))
            .send()
            .await
            .map_err(|e| {
                GatewayError::Backend(format!("failed to fetch transactions from {url}: {e}"))
            })?;
        let status = response.status();
        let body = response.text().await.map_err(|e| {
            GatewayError::Backend(format!("failed to read transactions from {url}: {e}"))
        })?;
        debug!(%url, %status, body_len = body.len(), "esplora bulk transaction response");
        trace!(%url, body = %body, "esplora bulk transaction response body");

        if !status.is_success() {
            return Err(GatewayError::Backend(format!(
                "failed to fetch transactions from {url}: {status}: {body}"
            )));
        }

        let entries: Vec<serde_json::Value> = serde_json::from_str(&body).map_err(|e| {
            GatewayError::InvalidResponse(format!("decode bulk transactions from {url}: {e}"))
        })?;

        // Entries without a usable txid are dropped rather than failing the
        // whole batch; resolution reports precisely which parents are missing.
        entries
            .into_iter()
            .filter(|entry| entry.get("txid").is_some_and(serde_json::Value::is_string))
            .map(|entry| {
                serde_json::from_value(entry).map_err(|e| {
                    GatewayError::InvalidResponse(format!(
                        "decode bulk transaction entry from {url}: {e}"
                    ))
                })
            })
            .collect()
    }

    async fn address(&self, address: &str) -> Result<AddressInfo, GatewayError> {
        self.get_json(
            format!("{}/address/{address}", self.base_url),
            "address info",
        )
        .await
    }

    async fn address_utxos(&self, address: &str) -> Result<Vec<Utxo>, GatewayError> {
        let utxos: Vec<Utxo> = self
            .get_json(
                format!("{}/address/{address}/utxo", self.base_url),
                "address utxos",
            )
            .await?;
        // Confirmed outputs only.
        Ok(utxos.into_iter().filter(|u| u.status.confirmed).collect())
    }

    async fn address_txs(
        &self,
        address: &str,
        last_seen_txid: Option<&Txid>,
    ) -> Result<Vec<DecodedTransaction>, GatewayError> {
        let base = format!("{}/address/{address}/txs", self.base_url);
        let url = match last_seen_txid {
            Some(txid) => format!("{base}/chain/{txid}"),
            None => base,
        };
        self.get_json(url, "address transactions").await
    }

    async fn fee_estimate(&self) -> Result<f64, GatewayError> {
        let estimates: std::collections::HashMap<String, f64> = self
            .get_json(format!("{}/fee-estimates", self.base_url), "fee estimates")
            .await?;
        estimates.get("1").copied().ok_or_else(|| {
            GatewayError::InvalidResponse("fee tier \"1\" not present in fee estimates".to_owned())
        })
    }

    async fn broadcast(
        &self,
        raw_hex: &str,
        provider: Option<&str>,
    ) -> Result<Txid, GatewayError> {
        let base = provider.unwrap_or(&self.base_url).trim_end_matches('/');
        let url = format!("{base}/tx");
        self.wait_for_rate_limit().await;
        debug!(%url, hex_len = raw_hex.len(), "esplora broadcast");

        let response = self
            .client
            .post(&url)
            .header(header::CONTENT_TYPE, "text/plain")
            .body(raw_hex.to_owned())
            .send()
            .await
            .map_err(|e| GatewayError::Backend(format!("failed to broadcast transaction: {e}")))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| {
            GatewayError::Backend(format!("failed to read broadcast response: {e}"))
        })?;

        if !status.is_success() {
            return Err(GatewayError::Backend(format!(
                "failed to broadcast transaction: {status}: {body}"
            )));
        }

        // The response body is just the txid as plain text.
        body.trim().parse().map_err(|e| {
            GatewayError::InvalidResponse(format!(
                "broadcast returned invalid txid `{}`: {e}",
                body.trim()
            ))
        })
    }
}
