use bitcoin::Txid;

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("backend request failed: {0}")]
    Backend(String),

    #[error("invalid backend response: {0}")]
    InvalidResponse(String),

    #[error("malformed transaction data: {0}")]
    MalformedTx(String),

    #[error("parent transaction not found: {0}")]
    MissingParent(Txid),

    #[error("invalid request parameters: {0}")]
    BadParams(String),
}
