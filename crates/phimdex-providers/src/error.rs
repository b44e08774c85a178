use thiserror::Error;

/// Failure inside one provider adapter.
///
/// Adapters absorb these locally (logged, degraded to an absent result)
/// for anything reachable from an aggregate request; the type still
/// crosses the trait boundary so construction-time and unexpected faults
/// stay diagnosable.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected payload from {url}: {reason}")]
    Payload { url: String, reason: String },

    #[error("failed to initialize provider '{name}': {reason}")]
    Init { name: String, reason: String },
}
