//! Block-explorer (Esplora) REST abstraction.
//!
//! Defines the [`EsploraApi`] trait and provides an HTTP implementation
//! ([`HttpEsploraClient`]) plus a test mock (`mock::MockEsplora`).

mod http;
#[cfg(test)]
pub mod mock;

pub use http::HttpEsploraClient;

use async_trait::async_trait;
use bitcoin::Txid;

use crate::error::GatewayError;
use crate::types::{AddressInfo, DecodedTransaction, Utxo};

/// The explorer operations the gateway forwards to.
///
/// Implementations handle transport, status checking, and response
/// deserialization internally; every method returns either a decoded value
/// or a `GatewayError`, never a raw transport failure.
#[async_trait]
pub trait EsploraApi: Send + Sync {
    /// Fetch a single decoded transaction.
    async fn transaction(&self, txid: &Txid) -> Result<DecodedTransaction, GatewayError>;

    /// Fetch the raw serialized hex of a transaction.
    async fn transaction_hex(&self, txid: &Txid) -> Result<String, GatewayError>;

    /// Fetch many decoded transactions with exactly one batched request.
    ///
    /// The response may come back in any order and may omit ids the backend
    /// does not know; callers own the matching.
    async fn bulk_transactions(
        &self,
        txids: &[Txid],
    ) -> Result<Vec<DecodedTransaction>, GatewayError>;

    /// Fetch funding/spending stats for an address.
    async fn address(&self, address: &str) -> Result<AddressInfo, GatewayError>;

    /// Fetch the confirmed UTXOs of an address.
    async fn address_utxos(&self, address: &str) -> Result<Vec<Utxo>, GatewayError>;

    /// Fetch transactions for an address. With `last_seen_txid`, fetch the
    /// page after that transaction (the explorer's chain pagination).
    async fn address_txs(
        &self,
        address: &str,
        last_seen_txid: Option<&Txid>,
    ) -> Result<Vec<DecodedTransaction>, GatewayError>;

    /// Fastest-tier fee estimate in sat/vB.
    async fn fee_estimate(&self) -> Result<f64, GatewayError>;

    /// Broadcast a raw transaction, optionally through an alternate provider.
    /// Returns the txid the backend reports.
    async fn broadcast(&self, raw_hex: &str, provider: Option<&str>)
        -> Result<Txid, GatewayError>;

    /// Confirmed balance of an address in BTC, derived from the address stats.
    async fn address_balance(&self, address: &str) -> Result<f64, GatewayError> {
        let info = self.address(address).await?;
        Ok(info.chain_stats.balance().to_btc())
    }

    /// Look up one output as a spendable reference via its parent transaction.
    async fn utxo(&self, outpoint: &str) -> Result<Utxo, GatewayError> {
        let (txid, vout) = parse_outpoint(outpoint)?;
        let tx = self.transaction(&txid).await?;
        let output = tx.vout.get(vout as usize).ok_or_else(|| {
            GatewayError::MalformedTx(format!("transaction {txid} has no output {vout}"))
        })?;
        Ok(Utxo {
            txid: tx.txid,
            vout,
            value: output.value,
            status: tx.status.clone(),
        })
    }
}

/// Parse a `txid:vout` outpoint string.
fn parse_outpoint(outpoint: &str) -> Result<(Txid, u32), GatewayError> {
    let (txid, vout) = outpoint.split_once(':').ok_or_else(|| {
        GatewayError::BadParams(format!(
            "invalid outpoint `{outpoint}`, expected `txid:vout`"
        ))
    })?;
    let txid = txid.parse().map_err(|e| {
        GatewayError::BadParams(format!("invalid txid in outpoint `{outpoint}`: {e}"))
    })?;
    let vout = vout.parse().map_err(|e| {
        GatewayError::BadParams(format!("invalid vout in outpoint `{outpoint}`: {e}"))
    })?;
    Ok((txid, vout))
}
