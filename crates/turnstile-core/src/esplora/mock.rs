use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use bitcoin::consensus::encode::deserialize;
use bitcoin::hex::FromHex;
use bitcoin::{Transaction, Txid};

use crate::error::GatewayError;
use crate::reconstruct;
use crate::types::{AddressInfo, DecodedTransaction, Utxo};

use super::EsploraApi;

/// A mock explorer backend for testing. Serves canned transactions from a
/// `HashMap` populated via the builder pattern, and records every bulk
/// request it receives.
pub struct MockEsplora {
    transactions: HashMap<Txid, DecodedTransaction>,
    /// Entries returned at the front of every bulk response, before lookups.
    /// Used to simulate duplicate or unsolicited entries in the response.
    bulk_extra: Vec<DecodedTransaction>,
    bulk_failure: Option<String>,
    bulk_requests: Mutex<Vec<Vec<Txid>>>,
}

impl MockEsplora {
    pub fn builder() -> MockEsploraBuilder {
        MockEsploraBuilder {
            transactions: HashMap::new(),
            bulk_extra: Vec::new(),
            bulk_failure: None,
        }
    }

    /// The txid lists of every bulk request issued so far, in call order.
    pub fn bulk_requests(&self) -> Vec<Vec<Txid>> {
        self.bulk_requests
            .lock()
            .expect("mock mutex is never poisoned")
            .clone()
    }
}

pub struct MockEsploraBuilder {
    transactions: HashMap<Txid, DecodedTransaction>,
    bulk_extra: Vec<DecodedTransaction>,
    bulk_failure: Option<String>,
}

impl MockEsploraBuilder {
    pub fn with_tx(mut self, tx: DecodedTransaction) -> Self {
        self.transactions.insert(tx.txid, tx);
        self
    }

    pub fn with_bulk_extra(mut self, tx: DecodedTransaction) -> Self {
        self.bulk_extra.push(tx);
        self
    }

    pub fn with_bulk_failure(mut self, message: &str) -> Self {
        self.bulk_failure = Some(message.to_owned());
        self
    }

    pub fn build(self) -> MockEsplora {
        MockEsplora {
            transactions: self.transactions,
            bulk_extra: self.bulk_extra,
            bulk_failure: self.bulk_failure,
            bulk_requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl EsploraApi for MockEsplora {
    async fn transaction(&self, txid: &Txid) -> Result<DecodedTransaction, GatewayError> {
        self.transactions
            .get(txid)
            .cloned()
            .ok_or_else(|| GatewayError::Backend(format!("transaction {txid} not found")))
    }

    async fn transaction_hex(&self, txid: &Txid) -> Result<String, GatewayError> {
        let tx = self.transaction(txid).await?;
        Ok(reconstruct::with_hex(&tx)?.hex)
    }

    async fn bulk_transactions(
        &self,
        txids: &[Txid],
    ) -> Result<Vec<DecodedTransaction>, GatewayError> {
        self.bulk_requests
            .lock()
            .expect("mock mutex is never poisoned")
            .push(txids.to_vec());

        if let Some(message) = &self.bulk_failure {
            return Err(GatewayError::Backend(message.clone()));
        }

        // Known ids resolve; unknown ids are silently absent, matching the
        // real endpoint's behavior.
        let mut response = self.bulk_extra.clone();
        response.extend(
            txids
                .iter()
                .filter_map(|txid| self.transactions.get(txid))
                .cloned(),
        );
        Ok(response)
    }

    async fn address(&self, address: &str) -> Result<AddressInfo, GatewayError> {
        Err(GatewayError::Backend(format!(
            "no address data in mock for {address}"
        )))
    }

    async fn address_utxos(&self, _address: &str) -> Result<Vec<Utxo>, GatewayError> {
        Ok(Vec::new())
    }

    async fn address_txs(
        &self,
        _address: &str,
        _last_seen_txid: Option<&Txid>,
    ) -> Result<Vec<DecodedTransaction>, GatewayError> {
        Ok(Vec::new())
    }

    async fn fee_estimate(&self) -> Result<f64, GatewayError> {
        Ok(1.5)
    }

    async fn broadcast(
        &self,
        raw_hex: &str,
        _provider: Option<&str>,
    ) -> Result<Txid, GatewayError> {
        let bytes = Vec::<u8>::from_hex(raw_hex)
            .map_err(|e| GatewayError::Backend(format!("invalid raw transaction hex: {e}")))?;
        let tx: Transaction = deserialize(&bytes)
            .map_err(|e| GatewayError::Backend(format!("undecodable raw transaction: {e}")))?;
        Ok(tx.compute_txid())
    }
}
