use reqwest::StatusCode;
use thiserror::Error;

/// Failures talking to an advice provider.
///
/// These never reach a client: [`crate::Advisor`] logs them and serves a
/// fallback instead.
#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("{status}: {message}")]
    Upstream { status: StatusCode, message: String },
    #[error("malformed provider output: {0}")]
    Json(#[from] serde_json::Error),
    #[error("provider returned no content")]
    EmptyResponse,
}
