use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::warn;

pub type Result<T> = std::result::Result<T, ProxyError>;

/// Request-level error taxonomy.
///
/// Every variant is converted to a plain-text HTTP response at the
/// request boundary — no internal failure crashes the serving process or
/// leaks a stack trace to the client. Per-reference resolution failures
/// inside a manifest never reach this type; the rewrite engine recovers
/// from them locally by leaving the reference untouched.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("missing url parameter")]
    MissingParameter,

    #[error("target is not a valid absolute URL")]
    InvalidTargetUrl,

    #[error("target not allowed: {0}")]
    ForbiddenTarget(String),

    #[error("origin fetch failed: {0}")]
    OriginFetchError(#[from] reqwest::Error),

    /// Origin answered with a non-2xx status; forwarded verbatim.
    #[error("origin returned status {0}")]
    OriginStatus(StatusCode),

    #[error("failed to decode origin body: {0}")]
    DecodeError(String),
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::MissingParameter => (StatusCode::BAD_REQUEST, "Missing url parameter"),
            Self::InvalidTargetUrl => (StatusCode::BAD_REQUEST, "Invalid URL"),
            Self::ForbiddenTarget(_) => (StatusCode::FORBIDDEN, "Host not allowed by proxy"),
            Self::OriginFetchError(_) => (StatusCode::BAD_GATEWAY, "Error fetching the URL"),
            Self::OriginStatus(code) => (*code, "Failed to fetch resource"),
            Self::DecodeError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Server error"),
        };

        warn!("request failed: {}", self);

        (status, body).into_response()
    }
}
