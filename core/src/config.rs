// core/src/config.rs

use crate::error::{PaygateError, PaygateResult};
use std::fmt;
use std::time::Duration;

/// Outbound calls get this timeout unless the caller overrides it.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Credentials and endpoint of the payment gateway.
///
/// Built once at startup and handed to [`crate::PhonePeClient`] and
/// [`crate::ChecksumSigner`]. [`GatewayConfig::new`] is the only constructor
/// and rejects blank values, so a misconfigured deployment fails before any
/// network call is attempted.
#[derive(Clone)]
pub struct GatewayConfig {
    merchant_id: String,
    salt_key: String,
    salt_index: String,
    base_url: String,
    request_timeout: Duration,
}

impl GatewayConfig {
    pub fn new(
        merchant_id: impl Into<String>,
        salt_key: impl Into<String>,
        salt_index: impl Into<String>,
        base_url: impl Into<String>,
    ) -> PaygateResult<Self> {
        let merchant_id = required("merchant_id", merchant_id.into())?;
        let salt_key = required("salt_key", salt_key.into())?;
        let salt_index = required("salt_index", salt_index.into())?;
        let base_url = required("base_url", base_url.into())?;

        Ok(Self {
            merchant_id,
            salt_key,
            salt_index,
            // Endpoint paths are appended with a leading slash.
            base_url: base_url.trim_end_matches('/').to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        })
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn merchant_id(&self) -> &str {
        &self.merchant_id
    }

    pub(crate) fn salt_key(&self) -> &str {
        &self.salt_key
    }

    pub fn salt_index(&self) -> &str {
        &self.salt_index
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn required(field: &'static str, value: String) -> PaygateResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(PaygateError::Configuration { field });
    }
    Ok(trimmed.to_string())
}

// The salt key is a shared secret and must not end up in logs.
impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("merchant_id", &self.merchant_id)
            .field("salt_key", &"[REDACTED]")
            .field("salt_index", &self.salt_index)
            .field("base_url", &self.base_url)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}
