//! Pricing service error taxonomy
//!
//! Every failure a channel can see is one of these three kinds. None of them
//! is fatal: the workspace maps them to a user-visible message and stays
//! interactive.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    /// The request never completed (connect, timeout, interrupted body).
    #[error("Pricing service unavailable: {0}")]
    Transport(String),

    /// The service answered with a non-success status.
    #[error("Pricing service rejected request ({status}): {}", .detail.as_deref().unwrap_or("no detail"))]
    Rejected { status: u16, detail: Option<String> },

    /// A success response whose body is not the expected shape.
    #[error("Invalid pricing service response: {0}")]
    Malformed(String),
}

impl ApiError {
    /// Server-provided detail text, when the service sent a usable one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Rejected {
                detail: Some(detail),
                ..
            } if !detail.trim().is_empty() => Some(detail.as_str()),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Malformed(e.to_string())
        } else {
            Self::Transport(e.to_string())
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
