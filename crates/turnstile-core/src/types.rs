//! Domain types for the gateway's explorer-facing surface.
//!
//! These mirror the JSON shapes the Esplora backend produces (`DecodedTransaction`,
//! `Utxo`, `AddressInfo`) plus the enriched output types the gateway adds on top
//! (`TransactionWithHex`, `SpendableUtxo`). Hex-encoded fields are typed with the
//! `bitcoin` crate's primitives so malformed hex is rejected at the serde boundary
//! and never reaches the serialization path.

use bitcoin::{Amount, BlockHash, ScriptBuf, Txid};
use serde::{Deserialize, Serialize};

// ==============================================================================
// Confirmation Status
// ==============================================================================

/// Confirmation metadata attached to transactions and UTXOs by the explorer.
/// Defaults to unconfirmed when the backend omits it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TxStatus {
    #[serde(default)]
    pub confirmed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_hash: Option<BlockHash>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_time: Option<u64>,
}

// ==============================================================================
// Decoded Transactions
// ==============================================================================

/// One input of a decoded transaction.
///
/// For coinbase inputs the explorer still emits `txid`/`vout` placeholders;
/// both are ignored during reconstruction, so they stay optional here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TxInputEntry {
    #[serde(default)]
    pub is_coinbase: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub txid: Option<Txid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vout: Option<u32>,
    /// Unlocking script, embedded verbatim when the transaction is rebuilt.
    #[serde(default)]
    pub scriptsig: ScriptBuf,
    pub sequence: u32,
}

/// One output of a decoded transaction. The `scriptpubkey_*` annotations are
/// explorer decorations, carried through untouched so callers keep them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TxOutEntry {
    pub scriptpubkey: ScriptBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scriptpubkey_asm: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scriptpubkey_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scriptpubkey_address: Option<String>,
    #[serde(with = "bitcoin::amount::serde::as_sat")]
    pub value: Amount,
}

/// A transaction as decoded by the explorer. `vin`/`vout` ordering is
/// significant: it defines the wire order during reconstruction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecodedTransaction {
    pub txid: Txid,
    pub version: i32,
    pub locktime: u32,
    pub vin: Vec<TxInputEntry>,
    pub vout: Vec<TxOutEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee: Option<u64>,
    #[serde(default)]
    pub status: TxStatus,
}

/// A decoded transaction together with its canonical serialized hex.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionWithHex {
    #[serde(flatten)]
    pub tx: DecodedTransaction,
    pub hex: String,
}

// ==============================================================================
// UTXOs
// ==============================================================================

/// A reference to one spendable output, without its parent transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Utxo {
    pub txid: Txid,
    pub vout: u32,
    #[serde(with = "bitcoin::amount::serde::as_sat")]
    pub value: Amount,
    #[serde(default)]
    pub status: TxStatus,
}

/// A UTXO reference augmented with its fully serialized parent transaction.
///
/// Invariants upheld by the resolver: `prev_tx.tx.txid == utxo.txid`, and
/// `prev_tx.tx.vout` contains an entry at index `utxo.vout`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpendableUtxo {
    #[serde(flatten)]
    pub utxo: Utxo,
    #[serde(rename = "prevTx")]
    pub prev_tx: TransactionWithHex,
}

// ==============================================================================
// Addresses
// ==============================================================================

/// Aggregate funding/spending totals for one address on one side of the
/// confirmation boundary (chain or mempool).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressStats {
    pub funded_txo_count: u64,
    #[serde(with = "bitcoin::amount::serde::as_sat")]
    pub funded_txo_sum: Amount,
    pub spent_txo_count: u64,
    #[serde(with = "bitcoin::amount::serde::as_sat")]
    pub spent_txo_sum: Amount,
    pub tx_count: u64,
}

impl AddressStats {
    /// Net balance: funded minus spent, floored at zero.
    #[must_use]
    pub fn balance(&self) -> Amount {
        self.funded_txo_sum
            .checked_sub(self.spent_txo_sum)
            .unwrap_or(Amount::ZERO)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressInfo {
    pub address: String,
    pub chain_stats: AddressStats,
    pub mempool_stats: AddressStats,
}
