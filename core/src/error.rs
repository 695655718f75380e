// core/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PaygateError {
    /// A required gateway setting is missing or blank. Never retried.
    #[error("Gateway configuration missing: {field}")]
    Configuration { field: &'static str },

    #[error("Invalid payment amount: {reason}")]
    InvalidAmount { reason: String },

    #[error("Failed to encode gateway payload. Source: {source}")]
    Encode {
        #[source]
        source: serde_json::Error,
    },

    #[error("Gateway call to '{endpoint}' failed. Source: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Gateway returned an unreadable response from '{endpoint}' (HTTP {status}). Source: {source}")]
    UnexpectedResponse {
        endpoint: String,
        status: u16,
        #[source]
        source: AnyhowError,
    },
}

impl PaygateError {
    /// Bad settings and bad amounts fail the same way on every attempt.
    pub fn is_fatal(&self) -> bool {
        matches!(self, PaygateError::Configuration { .. } | PaygateError::InvalidAmount { .. })
    }
}

pub type PaygateResult<T, E = PaygateError> = std::result::Result<T, E>;
