//! # API Errors
//!
//! Errors returned by the ZPA management API and the transports talking to it.

use serde::Deserialize;
use thiserror::Error;

/// Error from a call to the ZPA API
#[derive(Debug, Error)]
pub enum ApiError {
    /// The API answered with a non-2xx status
    #[error("ZPA API returned HTTP {status}: {message}")]
    Status {
        status: u16,
        /// Machine readable error id from the body, e.g. `resource.not.found`
        code: Option<String>,
        message: String,
    },
    /// The request never produced a response
    #[error("ZPA API request failed: {0}")]
    Transport(String),
    /// The response body was not what the client expected
    #[error("failed to decode ZPA API response: {0}")]
    Decode(String),
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    reason: Option<String>,
}

/// Longest raw body kept in an error message
const MAX_BODY_IN_MESSAGE: usize = 256;

impl ApiError {
    /// Build a status error from a response, pulling `id`/`reason` from a JSON body
    pub fn from_response(status: u16, body: &str) -> Self {
        let parsed = serde_json::from_str::<ErrorBody>(body).ok();
        let code = parsed.as_ref().and_then(|b| b.id.clone());
        let message = parsed
            .and_then(|b| b.reason)
            .unwrap_or_else(|| body.chars().take(MAX_BODY_IN_MESSAGE).collect());
        Self::Status {
            status,
            code,
            message,
        }
    }

    /// True when the error means the remote object does not exist.
    ///
    /// ZPA reports a missing object either as 404 or as 400 with a
    /// `resource.not.found` id.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Status { status: 404, .. } => true,
            Self::Status {
                status: 400,
                code,
                message,
            } => {
                code.as_deref()
                    .is_some_and(|c| c.to_ascii_lowercase().contains("not.found"))
                    || message.to_ascii_lowercase().contains("not found")
            }
            _ => false,
        }
    }

    /// HTTP status, when the API answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        // without_url keeps query strings out of error messages
        Self::Transport(error.without_url().to_string())
    }
}
