//! Spendable-UTXO resolution.
//!
//! Attaches the fully serialized parent transaction to each UTXO reference so
//! callers can spend the outputs without further lookups. Parents are fetched
//! with a single batched explorer call regardless of batch size; resolution is
//! all-or-nothing: one unresolvable parent fails the whole batch.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::error::GatewayError;
use crate::esplora::EsploraApi;
use crate::reconstruct;
use crate::types::{SpendableUtxo, Utxo};

/// Resolve a batch of UTXO references into spendable UTXOs, preserving the
/// input order.
///
/// Fails with `MissingParent` naming the first reference whose parent the
/// explorer did not return. No partial result is produced in that case.
pub async fn spendable_utxos(
    esplora: &dyn EsploraApi,
    utxos: &[Utxo],
) -> Result<Vec<SpendableUtxo>, GatewayError> {
    if utxos.is_empty() {
        return Ok(Vec::new());
    }

    // One batched fetch for the distinct parents.
    let mut seen = HashSet::new();
    let parent_ids: Vec<_> = utxos
        .iter()
        .map(|utxo| utxo.txid)
        .filter(|txid| seen.insert(*txid))
        .collect();

    debug!(
        utxo_count = utxos.len(),
        parent_count = parent_ids.len(),
        "resolving spendable utxos"
    );

    let parents = esplora.bulk_transactions(&parent_ids).await?;

    // Last entry wins on duplicate ids; duplicates are unexpected but harmless.
    let by_txid: HashMap<_, _> = parents.into_iter().map(|tx| (tx.txid, tx)).collect();

    let mut resolved = Vec::with_capacity(utxos.len());
    for utxo in utxos {
        let parent = by_txid
            .get(&utxo.txid)
            .ok_or(GatewayError::MissingParent(utxo.txid))?;
        if parent.vout.get(utxo.vout as usize).is_none() {
            return Err(GatewayError::MalformedTx(format!(
                "parent transaction {} has no output {}",
                utxo.txid, utxo.vout
            )));
        }
        resolved.push(SpendableUtxo {
            utxo: utxo.clone(),
            prev_tx: reconstruct::with_hex(parent)?,
        });
    }

    Ok(resolved)
}
