use crate::product::ProductId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VerifyError {
    /// The API refused the create request.
    #[error("create failed with HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("API response has no usable id: {0}")]
    MissingId(String),

    #[error("product {id} not found in the database after {elapsed_ms}ms")]
    NotPersisted { id: ProductId, elapsed_ms: u64 },

    #[error("{field} mismatch: expected {expected}, found {actual}")]
    Mismatch {
        field: &'static str,
        expected: String,
        actual: String,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("database error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("database connection lock poisoned")]
    LockPoisoned,

    #[error("database task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
