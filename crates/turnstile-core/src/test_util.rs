//! Shared test helpers for `turnstile-core` unit tests.
//!
//! Builder functions for decoded transactions and UTXO references so tests
//! across modules share one source of dummy data construction.

use bitcoin::hashes::Hash;
use bitcoin::{Amount, ScriptBuf, Txid};

use crate::types::{DecodedTransaction, TxInputEntry, TxOutEntry, TxStatus, Utxo};

/// Create a deterministic `Txid` from a single distinguishing byte.
pub fn txid_from_byte(b: u8) -> Txid {
    let mut bytes = [0u8; 32];
    bytes[0] = b;
    Txid::from_byte_array(bytes)
}

/// Build a minimal decoded transaction with sane defaults.
/// Override individual fields after construction when needed.
pub fn decoded_tx(txid: Txid, vin: Vec<TxInputEntry>, vout: Vec<TxOutEntry>) -> DecodedTransaction {
    DecodedTransaction {
        txid,
        version: 2,
        locktime: 0,
        vin,
        vout,
        size: None,
        weight: None,
        fee: None,
        status: TxStatus {
            confirmed: true,
            block_height: Some(100),
            block_hash: None,
            block_time: None,
        },
    }
}

/// A coinbase input, including the placeholder fields explorers attach to it.
pub fn coinbase_entry() -> TxInputEntry {
    TxInputEntry {
        is_coinbase: true,
        txid: Some(Txid::from_byte_array([0u8; 32])),
        vout: Some(u32::MAX),
        scriptsig: ScriptBuf::from_bytes(vec![0x03, 0x01, 0x02, 0x03]),
        sequence: 0xFFFF_FFFF,
    }
}

/// A spending input referencing `prev_txid:vout`.
pub fn spending_entry(prev_txid: Txid, vout: u32) -> TxInputEntry {
    TxInputEntry {
        is_coinbase: false,
        txid: Some(prev_txid),
        vout: Some(vout),
        scriptsig: ScriptBuf::new(),
        sequence: 0xFFFF_FFFE,
    }
}

/// A minimal P2WPKH output with the given satoshi value.
pub fn p2wpkh_output(sats: u64) -> TxOutEntry {
    let script_bytes = [
        0x00, 0x14, // OP_0, PUSH20
        0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e, 0x0f,
        0x10, 0x11, 0x12, 0x13, 0x14,
    ];
    TxOutEntry {
        scriptpubkey: ScriptBuf::from_bytes(script_bytes.to_vec()),
        scriptpubkey_asm: None,
        scriptpubkey_type: None,
        scriptpubkey_address: None,
        value: Amount::from_sat(sats),
    }
}

/// A confirmed UTXO reference.
pub fn utxo_ref(txid: Txid, vout: u32, sats: u64) -> Utxo {
    Utxo {
        txid,
        vout,
        value: Amount::from_sat(sats),
        status: TxStatus {
            confirmed: true,
            block_height: Some(100),
            block_hash: None,
            block_time: None,
        },
    }
}
