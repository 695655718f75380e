// core/src/checksum.rs

//! `X-VERIFY` checksums.
//!
//! Every call to the gateway carries `sha256(content + path + salt_key)` in
//! lowercase hex followed by `###` and the salt index. For the pay call the
//! content is the base64 request body; for the status query the content is
//! empty and the status path itself is what gets signed.

use crate::config::GatewayConfig;
use crate::error::{PaygateError, PaygateResult};
use sha2::{Digest, Sha256};

pub const PAY_PATH: &str = "/pg/v1/pay";
const STATUS_PATH_PREFIX: &str = "/pg/v1/status";
const SEPARATOR: &str = "###";

pub fn status_path(merchant_id: &str, merchant_transaction_id: &str) -> String {
    format!("{}/{}/{}", STATUS_PATH_PREFIX, merchant_id, merchant_transaction_id)
}

#[derive(Clone)]
pub struct ChecksumSigner {
    salt_key: String,
    salt_index: String,
}

impl ChecksumSigner {
    pub fn new(salt_key: impl Into<String>, salt_index: impl Into<String>) -> PaygateResult<Self> {
        let salt_key = salt_key.into();
        let salt_index = salt_index.into();
        if salt_key.is_empty() {
            return Err(PaygateError::Configuration { field: "salt_key" });
        }
        if salt_index.is_empty() {
            return Err(PaygateError::Configuration { field: "salt_index" });
        }
        Ok(Self { salt_key, salt_index })
    }

    pub fn from_config(config: &GatewayConfig) -> PaygateResult<Self> {
        Self::new(config.salt_key(), config.salt_index())
    }

    /// `hex(sha256(content + path_suffix + salt_key)) + "###" + salt_index`
    pub fn sign(&self, content: &str, path_suffix: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        hasher.update(path_suffix.as_bytes());
        hasher.update(self.salt_key.as_bytes());
        format!("{}{}{}", hex::encode(hasher.finalize()), SEPARATOR, self.salt_index)
    }

    pub fn sign_pay_request(&self, base64_payload: &str) -> String {
        self.sign(base64_payload, PAY_PATH)
    }

    pub fn sign_status_query(&self, merchant_id: &str, merchant_transaction_id: &str) -> String {
        self.sign("", &status_path(merchant_id, merchant_transaction_id))
    }

    /// Checks a gateway-supplied `X-VERIFY` value over `content + path_suffix`.
    /// The hex part is compared case-insensitively; the salt index must match exactly.
    pub fn verify(&self, content: &str, path_suffix: &str, x_verify: &str) -> bool {
        let expected = self.sign(content, path_suffix);
        match (expected.split_once(SEPARATOR), x_verify.trim().split_once(SEPARATOR)) {
            (Some((want_hex, want_idx)), Some((got_hex, got_idx))) => {
                want_idx == got_idx && want_hex.eq_ignore_ascii_case(got_hex)
            }
            _ => false,
        }
    }
}

impl std::fmt::Debug for ChecksumSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChecksumSigner")
            .field("salt_key", &"[REDACTED]")
            .field("salt_index", &self.salt_index)
            .finish()
    }
}
