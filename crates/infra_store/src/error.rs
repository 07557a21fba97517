//! Adapter-side errors

use thiserror::Error;

/// Errors loading or saving ledger snapshots
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Reading or writing the snapshot file failed
    #[error("snapshot io error: {0}")]
    Io(#[from] std::io::Error),

    /// The snapshot contents could not be decoded
    #[error("snapshot decode error: {0}")]
    Decode(#[from] serde_json::Error),
}
