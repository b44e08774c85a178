use thiserror::Error;

/// Structural failure of the movie store (unreadable or unwritable data
/// file). These propagate to the calling use case; per-record merge
/// conflicts do not exist — they are resolved inside the store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("movie store I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("movie store serialization failure: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Outcome of identity resolution when no record could be found or
/// created.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// No stored record matches any interpretation of the supplied
    /// identifiers and no creation data was given. Distinguishable so
    /// callers can prompt for movie data instead of reporting a generic
    /// failure.
    #[error("movie '{candidate_id}' not found; supply movie data to create it")]
    NotFound { candidate_id: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}
