// core/src/lib.rs

//! Paygate: a checksum-signed client for a PhonePe-style pay-page gateway.
//!
//! The crate covers the gateway half of a checkout:
//!  - `X-VERIFY` checksums for pay calls and status queries.
//!  - Validated gateway configuration (missing secrets fail before any call).
//!  - Minor-unit amount conversion.
//!  - Merchant transaction identifiers.
//!  - A typed wire schema and the reqwest-backed [`PhonePeClient`], behind the
//!    [`PaymentGateway`] trait so applications can substitute their own.

pub mod amount;
pub mod checksum;
pub mod client;
pub mod config;
pub mod error;
pub mod transaction_id;
pub mod wire;

// --- Re-exports for the Public API ---

pub use crate::amount::{from_minor_units, to_minor_units, MINOR_UNITS_PER_MAJOR};
pub use crate::checksum::{status_path, ChecksumSigner, PAY_PATH};
pub use crate::client::{PaymentGateway, PhonePeClient, X_MERCHANT_ID, X_VERIFY};
pub use crate::config::{GatewayConfig, DEFAULT_REQUEST_TIMEOUT};
pub use crate::error::{PaygateError, PaygateResult};
pub use crate::transaction_id::new_merchant_transaction_id;
pub use crate::wire::{
    CallbackEnvelope, PayEnvelope, PayPayload, PayResponse, PaymentRequest, SealedPayRequest, StatusResponse,
};
