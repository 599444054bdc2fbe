use thiserror::Error;

/// Why a stored view-state snapshot couldn't be used.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("snapshot is not a JSON object")]
    NotAnObject,
}
