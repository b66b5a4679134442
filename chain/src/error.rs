use thiserror::Error;

/// A failed state read. Surfaced immediately; nothing is retried or served
/// from a stale copy.
#[derive(Debug, Error)]
pub enum RpcError {
    #[error("RPC transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("RPC endpoint returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("malformed RPC response: {0}")]
    Malformed(String),
}
