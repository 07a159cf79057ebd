//! Rebuilds the canonical wire encoding of a transaction from the decoded
//! JSON form the block explorer returns.
//!
//! Wallet flows need the original byte-for-byte serialization of a parent
//! transaction (e.g. as the non-witness UTXO of a PSBT input), but the bulk
//! explorer endpoint only hands back decoded JSON. This module maps that JSON
//! onto a `bitcoin::Transaction`; consensus encoding itself is delegated to
//! the `bitcoin` crate. We intentionally avoid reimplementing the wire format.
//!
//! Two details of the mapping are load-bearing:
//! - coinbase inputs serialize with the null previous output (32 zero bytes
//!   and index `0xffffffff`), ignoring whatever placeholder `txid`/`vout`
//!   the explorer attached to them;
//! - the explorer's `txid` hex is display order, while the wire format wants
//!   the reversed byte order. Parsing into `Txid` performs that reversal.

use bitcoin::absolute::LockTime;
use bitcoin::consensus::encode::serialize_hex;
use bitcoin::transaction::Version;
use bitcoin::{OutPoint, Sequence, Transaction, TxIn, TxOut, Witness};

use crate::error::GatewayError;
use crate::types::{DecodedTransaction, TransactionWithHex};

/// Map a decoded transaction back onto `bitcoin::Transaction`.
///
/// Deterministic and free of I/O. Script bytes are embedded verbatim, never
/// re-derived. Witnesses are left empty, so the encoder emits the legacy
/// (pre-segwit) serialization.
///
/// The only failure mode is a non-coinbase input missing its previous
/// outpoint, which means the explorer handed us something unusable.
pub fn raw_transaction(tx: &DecodedTransaction) -> Result<Transaction, GatewayError> {
    let mut input = Vec::with_capacity(tx.vin.len());
    for (index, vin) in tx.vin.iter().enumerate() {
        let previous_output = if vin.is_coinbase {
            OutPoint::null()
        } else {
            let prev_txid = vin.txid.ok_or_else(|| {
                GatewayError::MalformedTx(format!(
                    "input {index} of {} is not coinbase but carries no previous txid",
                    tx.txid
                ))
            })?;
            let prev_vout = vin.vout.ok_or_else(|| {
                GatewayError::MalformedTx(format!(
                    "input {index} of {} is not coinbase but carries no previous vout",
                    tx.txid
                ))
            })?;
            OutPoint::new(prev_txid, prev_vout)
        };

        input.push(TxIn {
            previous_output,
            script_sig: vin.scriptsig.clone(),
            sequence: Sequence(vin.sequence),
            witness: Witness::new(),
        });
    }

    let output = tx
        .vout
        .iter()
        .map(|vout| TxOut {
            value: vout.value,
            script_pubkey: vout.scriptpubkey.clone(),
        })
        .collect();

    Ok(Transaction {
        version: Version(tx.version),
        lock_time: LockTime::from_consensus(tx.locktime),
        input,
        output,
    })
}

/// Attach the canonical serialized hex to a decoded transaction.
pub fn with_hex(tx: &DecodedTransaction) -> Result<TransactionWithHex, GatewayError> {
    let raw = raw_transaction(tx)?;
    Ok(TransactionWithHex {
        tx: tx.clone(),
        hex: serialize_hex(&raw),
    })
}
