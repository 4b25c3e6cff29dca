//! Error taxonomy for calls against the remote API.
//!
//! DESIGN
//! ======
//! Every transport failure is classified once, at the response boundary, so
//! pages and the auth controller can branch on [`ErrorKind`] instead of raw
//! status codes. Server-supplied messages are kept verbatim for 4xx and
//! surfaced through [`ApiError::server_message`].

use serde_json::Value;

/// Coarse classification used for messaging and retry decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Timeout, connection refused, DNS failure, undecodable body.
    Network,
    /// 401. The transport has already invalidated the session.
    Unauthorized,
    /// 4xx other than 401. The server message is user-facing.
    Validation,
    /// 5xx.
    Server,
}

/// Errors produced by transport and resource-client operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The configured base URL cannot be used to build requests.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// The request never produced a response.
    #[error("request failed: {0}")]
    Transport(String),

    /// The request exceeded its timeout.
    #[error("request timed out")]
    Timeout,

    /// The server rejected the bearer credential (or sent none).
    #[error("unauthorized: {}", message.as_deref().unwrap_or("session expired"))]
    Unauthorized { message: Option<String> },

    /// The server rejected the request with a 4xx status.
    #[error("request rejected: status {status}")]
    Rejected { status: u16, message: Option<String> },

    /// The server failed with a 5xx status.
    #[error("server error: status {status}")]
    Server { status: u16, message: Option<String> },

    /// The response body did not match the expected shape.
    #[error("response decode failed: {0}")]
    Decode(String),
}

impl ApiError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthorized { .. } => ErrorKind::Unauthorized,
            Self::Rejected { .. } => ErrorKind::Validation,
            Self::Server { .. } => ErrorKind::Server,
            Self::InvalidBaseUrl(_) | Self::HttpClientBuild(_) | Self::Transport(_) | Self::Timeout | Self::Decode(_) => {
                ErrorKind::Network
            }
        }
    }

    /// The message the server put in the error body, if any.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Unauthorized { message } | Self::Rejected { message, .. } | Self::Server { message, .. } => {
                message.as_deref()
            }
            _ => None,
        }
    }

    /// HTTP status of the failed response, if one was received.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::Rejected { status, .. } | Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether a read may be transparently retried once.
    #[must_use]
    pub fn retryable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Timeout | Self::Server { .. })
    }

    /// Classify a non-success response from its status and raw body.
    pub(crate) fn from_status(status: u16, body: &[u8]) -> Self {
        let message = extract_error_message(body);
        match status {
            401 => Self::Unauthorized { message },
            500..=599 => Self::Server { status, message },
            _ => Self::Rejected { status, message },
        }
    }

    pub(crate) fn from_reqwest(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else if error.is_decode() {
            Self::Decode(error.to_string())
        } else {
            Self::Transport(error.to_string())
        }
    }
}

/// Pull the user-facing message out of an error body.
///
/// The API answers with `{"error": "...", "detail": ..., "success": false}`;
/// `error` wins, a string `detail` is the fallback. Validation bodies whose
/// `detail` is a list are not user-facing and yield `None`.
pub(crate) fn extract_error_message(body: &[u8]) -> Option<String> {
    let value = serde_json::from_slice::<Value>(body).ok()?;
    ["error", "detail"]
        .iter()
        .filter_map(|key| value.get(key).and_then(Value::as_str))
        .map(str::trim)
        .find(|msg| !msg.is_empty())
        .map(ToOwned::to_owned)
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
