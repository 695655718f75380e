// storefront/src/services/mod.rs

//! The two halves of the payment handshake.

pub mod initiator;
pub mod verifier;

pub use initiator::{CheckoutRequest, PaymentInitiator};
pub use verifier::{PaymentVerifier, SignedCallback};
