// storefront/src/state.rs
use crate::config::AppConfig;
use crate::errors::Result;
use crate::services::{PaymentInitiator, PaymentVerifier};
use crate::store::OrderStore;
use paygate::PaymentGateway;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub config: Arc<AppConfig>,
  pub order_store: Arc<dyn OrderStore>,
  pub initiator: Arc<PaymentInitiator>,
  pub verifier: Arc<PaymentVerifier>,
}

impl AppState {
  pub fn new(config: Arc<AppConfig>, gateway: Arc<dyn PaymentGateway>, order_store: Arc<dyn OrderStore>) -> Result<Self> {
    let initiator = PaymentInitiator::new(gateway.clone(), order_store.clone(), config.clone());
    let verifier = PaymentVerifier::new(gateway, order_store.clone(), config.clone())?;
    Ok(Self {
      config,
      order_store,
      initiator: Arc::new(initiator),
      verifier: Arc::new(verifier),
    })
  }
}
