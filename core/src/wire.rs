// core/src/wire.rs

//! Typed request and response schema for the gateway's pay and status APIs.
//!
//! Responses are decoded leniently: every field except `success` is optional
//! so that an error body (which the gateway sends with most fields absent)
//! still decodes, and callers branch on what is actually present.

use crate::checksum::ChecksumSigner;
use crate::error::{PaygateError, PaygateResult};
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

pub const STATE_COMPLETED: &str = "COMPLETED";
const REDIRECT_MODE: &str = "REDIRECT";
const PAY_PAGE_INSTRUMENT: &str = "PAY_PAGE";

/// What the caller decides about a payment; the client adds the merchant id
/// and the fixed pay-page fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRequest {
    pub merchant_transaction_id: String,
    pub merchant_user_id: String,
    pub amount_minor: i64,
    pub redirect_url: String,
    pub callback_url: String,
    pub mobile_number: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PayPayload {
    pub merchant_id: String,
    pub merchant_transaction_id: String,
    pub merchant_user_id: String,
    pub amount: i64,
    pub redirect_url: String,
    pub redirect_mode: String,
    pub callback_url: String,
    pub mobile_number: String,
    pub payment_instrument: PaymentInstrument,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentInstrument {
    #[serde(rename = "type")]
    pub kind: String,
}

impl PayPayload {
    pub fn for_pay_page(merchant_id: &str, request: &PaymentRequest) -> Self {
        Self {
            merchant_id: merchant_id.to_string(),
            merchant_transaction_id: request.merchant_transaction_id.clone(),
            merchant_user_id: request.merchant_user_id.clone(),
            amount: request.amount_minor,
            redirect_url: request.redirect_url.clone(),
            redirect_mode: REDIRECT_MODE.to_string(),
            callback_url: request.callback_url.clone(),
            mobile_number: request.mobile_number.clone(),
            payment_instrument: PaymentInstrument {
                kind: PAY_PAGE_INSTRUMENT.to_string(),
            },
        }
    }
}

/// Body of the pay call: `{"request": "<base64 JSON>"}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PayEnvelope {
    pub request: String,
}

/// A pay call ready to send: body plus its `X-VERIFY` header value.
#[derive(Debug, Clone)]
pub struct SealedPayRequest {
    pub envelope: PayEnvelope,
    pub x_verify: String,
}

impl SealedPayRequest {
    pub fn seal(payload: &PayPayload, signer: &ChecksumSigner) -> PaygateResult<Self> {
        let json = serde_json::to_vec(payload).map_err(|source| PaygateError::Encode { source })?;
        let encoded = BASE64_STANDARD.encode(json);
        let x_verify = signer.sign_pay_request(&encoded);
        Ok(Self {
            envelope: PayEnvelope { request: encoded },
            x_verify,
        })
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PayResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<PayResponseData>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PayResponseData {
    #[serde(default)]
    pub merchant_id: Option<String>,
    #[serde(default)]
    pub merchant_transaction_id: Option<String>,
    #[serde(default)]
    pub instrument_response: Option<InstrumentResponse>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentResponse {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub redirect_info: Option<RedirectInfo>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct RedirectInfo {
    pub url: String,
    #[serde(default)]
    pub method: Option<String>,
}

impl PayResponse {
    /// The hosted pay-page URL, if the gateway issued one.
    pub fn redirect_url(&self) -> Option<&str> {
        self.data
            .as_ref()
            .and_then(|d| d.instrument_response.as_ref())
            .and_then(|i| i.redirect_info.as_ref())
            .map(|r| r.url.as_str())
            .filter(|url| !url.is_empty())
    }

    pub fn failure_message(&self) -> String {
        self.message
            .clone()
            .or_else(|| self.code.clone())
            .unwrap_or_else(|| "Failed to initiate payment with the gateway".to_string())
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<StatusData>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StatusData {
    #[serde(default)]
    pub merchant_id: Option<String>,
    #[serde(default)]
    pub merchant_transaction_id: Option<String>,
    #[serde(default)]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub amount: Option<i64>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub response_code: Option<String>,
}

impl StatusResponse {
    pub fn state(&self) -> Option<&str> {
        self.data.as_ref().and_then(|d| d.state.as_deref())
    }

    pub fn transaction_id(&self) -> Option<&str> {
        self.data
            .as_ref()
            .and_then(|d| d.transaction_id.as_deref())
            .filter(|id| !id.is_empty())
    }

    pub fn is_completed(&self) -> bool {
        self.success && self.state() == Some(STATE_COMPLETED)
    }
}

/// Server-to-server callback body: `{"response": "<base64 JSON>"}`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CallbackEnvelope {
    pub response: String,
}

impl CallbackEnvelope {
    /// Decodes the embedded payload, which shares the status response shape.
    pub fn decode(&self) -> PaygateResult<StatusResponse> {
        let unexpected = |source: anyhow::Error| PaygateError::UnexpectedResponse {
            endpoint: "callback".to_string(),
            status: 200,
            source,
        };
        let raw = BASE64_STANDARD
            .decode(self.response.trim())
            .map_err(|e| unexpected(anyhow::Error::new(e).context("callback response is not base64")))?;
        serde_json::from_slice(&raw)
            .map_err(|e| unexpected(anyhow::Error::new(e).context("callback response is not a status document")))
    }
}
