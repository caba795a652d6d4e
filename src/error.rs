use crate::storage::StorageError;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Reserved; not raised by the advice pipeline.
    InsufficientData,
    /// Reserved; not raised by the advice pipeline.
    WeatherUnavailable,
    ProcessingError,
    /// Emitted by callers after consulting the quota status.
    QuotaExceeded,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::InsufficientData => "INSUFFICIENT_DATA",
            ErrorCode::WeatherUnavailable => "WEATHER_UNAVAILABLE",
            ErrorCode::ProcessingError => "PROCESSING_ERROR",
            ErrorCode::QuotaExceeded => "QUOTA_EXCEEDED",
        };
        write!(f, "{s}")
    }
}

#[derive(Error, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[error("{code}: {message}")]
pub struct CaddyError {
    pub code: ErrorCode,
    pub message: String,
    pub suggestion: String,
}

impl CaddyError {
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    #[must_use]
    pub fn processing(message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ProcessingError,
            message,
            "Check the shot details and try again.",
        )
    }

    #[must_use]
    pub fn quota_exceeded() -> Self {
        Self::new(
            ErrorCode::QuotaExceeded,
            "free advice quota reached",
            "Upgrade to Plus for unlimited caddy advice.",
        )
    }
}

impl From<StorageError> for CaddyError {
    fn from(err: StorageError) -> Self {
        Self::processing(format!("store error: {err}"))
    }
}

impl From<String> for CaddyError {
    fn from(err: String) -> Self {
        Self::processing(err)
    }
}

impl From<&str> for CaddyError {
    fn from(err: &str) -> Self {
        Self::processing(err)
    }
}
