use reqwest::StatusCode;
use thiserror::Error;

/// Errors raised while obtaining a fresh set of session cookies.
#[derive(Debug, Error)]
pub enum AcquisitionError {
    #[error("network failure during session handshake: {0}")]
    NetworkFailure(#[from] reqwest::Error),
    #[error("unexpected status {status} from {url}")]
    UnexpectedStatus { url: String, status: StatusCode },
}

/// Errors raised by a single option-chain request or while decoding its body.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network failure while fetching option chain: {0}")]
    NetworkFailure(#[from] reqwest::Error),
    #[error("session rejected with status {0}")]
    Unauthorized(StatusCode),
    #[error("unexpected status {0}")]
    UnexpectedStatus(StatusCode),
    #[error("malformed body: {0}")]
    MalformedBody(String),
}

impl FetchError {
    /// Whether the remote rejected the session cookies (401/403).
    #[inline]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }

    /// Short machine-friendly label, used in status reporting.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NetworkFailure(_) => "network_failure",
            Self::Unauthorized(_) => "unauthorized",
            Self::UnexpectedStatus(_) => "unexpected_status",
            Self::MalformedBody(_) => "malformed_body",
        }
    }
}

impl AcquisitionError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NetworkFailure(_) => "network_failure",
            Self::UnexpectedStatus { .. } => "unexpected_status",
        }
    }
}
