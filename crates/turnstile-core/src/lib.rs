pub mod error;
pub mod esplora;
pub mod indexer;
pub mod node;
pub mod reconstruct;
pub mod resolve;
pub mod types;

#[cfg(test)]
pub(crate) mod test_util;

pub use error::GatewayError;
pub use types::{DecodedTransaction, SpendableUtxo, Utxo};
