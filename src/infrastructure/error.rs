use thiserror::Error;

/// Failure reaching an exchange endpoint.
///
/// `Request` covers connection, TLS, timeout and body-decode failures at
/// the reqwest level; `Status` is a reachable endpoint answering with a
/// non-success HTTP status.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("exchange request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("exchange returned HTTP {status}")]
    Status { status: reqwest::StatusCode },
}
