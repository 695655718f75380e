// storefront/src/services/initiator.rs

use paygate::{new_merchant_transaction_id, to_minor_units, PaymentGateway, PaymentRequest};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::errors::{AppError, Result};
use crate::models::{NewOrder, OrderItem};
use crate::store::OrderStore;

/// Checkout body as sent by the storefront.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
  pub amount: Decimal,
  pub customer_name: String,
  pub customer_email: String,
  pub customer_phone: String,
  #[serde(default)]
  pub items: Vec<OrderItem>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InitiatedPayment {
  pub payment_url: String,
  pub merchant_transaction_id: String,
}

pub struct PaymentInitiator {
  gateway: Arc<dyn PaymentGateway>,
  store: Arc<dyn OrderStore>,
  config: Arc<AppConfig>,
}

impl PaymentInitiator {
  pub fn new(gateway: Arc<dyn PaymentGateway>, store: Arc<dyn OrderStore>, config: Arc<AppConfig>) -> Self {
    Self { gateway, store, config }
  }

  /// Starts a hosted pay-page payment for `user_id` and records the PENDING order.
  ///
  /// The order is written only after the gateway accepted the request, so a
  /// declined or failed call leaves no trace in the store. Every call mints a
  /// new merchant transaction id; retrying after a failure is a new attempt.
  #[instrument(
    name = "service::initiate_payment",
    skip(self, request, user_id),
    fields(user_id = %user_id, amount = %request.amount, merchant_transaction_id)
  )]
  pub async fn initiate(&self, request: CheckoutRequest, user_id: Uuid) -> Result<InitiatedPayment> {
    validate(&request)?;

    // Minted once, before anything leaves the process.
    let merchant_transaction_id = new_merchant_transaction_id();
    tracing::Span::current().record("merchant_transaction_id", merchant_transaction_id.as_str());

    let amount_minor = to_minor_units(request.amount)?;
    warn_on_item_total_mismatch(&request);

    let payment_request = PaymentRequest {
      merchant_transaction_id: merchant_transaction_id.clone(),
      merchant_user_id: user_id.to_string(),
      amount_minor,
      redirect_url: self.config.payment_redirect_url(),
      callback_url: self.config.payment_callback_url(&merchant_transaction_id),
      mobile_number: request.customer_phone.trim().to_string(),
    };

    info!("Submitting pay request for {} minor units.", amount_minor);
    let response = self.gateway.pay(&payment_request).await.map_err(|e| {
      error!(error = %e, retryable = !e.is_fatal(), "Pay request could not be completed.");
      AppError::from(e)
    })?;

    if !response.success {
      let message = response.failure_message();
      warn!(code = ?response.code, "Gateway declined payment: {}", message);
      return Err(AppError::Gateway(message));
    }
    let payment_url = response
      .redirect_url()
      .ok_or_else(|| AppError::Gateway("Gateway response did not include a payment URL".to_string()))?
      .to_string();

    let order = self
      .store
      .insert(NewOrder {
        user_id,
        merchant_transaction_id: merchant_transaction_id.clone(),
        amount: request.amount,
        items: request.items,
        customer_name: request.customer_name,
        customer_email: request.customer_email,
        customer_phone: request.customer_phone,
        payment_url: payment_url.clone(),
      })
      .await
      .map_err(|e| {
        error!(error = %e, "Error creating order after gateway accepted payment.");
        AppError::from(e)
      })?;

    info!(order_id = %order.id, "Order recorded as PENDING.");
    Ok(InitiatedPayment {
      payment_url,
      merchant_transaction_id,
    })
  }
}

/// Largest amount the `orders.amount NUMERIC(14,2)` column holds.
const MAX_ORDER_AMOUNT: Decimal = Decimal::from_parts(276_447_231, 23_283, 0, false, 2);

// Decimal places the order record keeps.
const AMOUNT_SCALE: u32 = 2;

fn validate(request: &CheckoutRequest) -> Result<()> {
  if request.amount <= Decimal::ZERO {
    return Err(AppError::Validation("Amount must be greater than zero".to_string()));
  }
  // The stored amount must be exactly the amount charged.
  if request.amount.normalize().scale() > AMOUNT_SCALE {
    return Err(AppError::Validation(format!(
      "Amount {} has more than {} decimal places",
      request.amount, AMOUNT_SCALE
    )));
  }
  if request.amount > MAX_ORDER_AMOUNT {
    return Err(AppError::Validation(format!(
      "Amount {} exceeds the maximum of {}",
      request.amount, MAX_ORDER_AMOUNT
    )));
  }
  if request.customer_phone.trim().is_empty() {
    return Err(AppError::Validation("Customer phone number is required".to_string()));
  }
  if let Some(item) = request.items.iter().find(|item| item.quantity == 0) {
    return Err(AppError::Validation(format!("Item '{}' has quantity 0", item.id)));
  }
  Ok(())
}

// The charged amount is the client's figure; a differing item total is only
// reported, not corrected.
fn warn_on_item_total_mismatch(request: &CheckoutRequest) {
  if request.items.is_empty() {
    return;
  }
  let items_total: Decimal = request
    .items
    .iter()
    .map(|item| item.price * Decimal::from(item.quantity))
    .sum();
  if items_total != request.amount {
    warn!(
      %items_total,
      amount = %request.amount,
      "Checkout amount differs from the sum of its items; charging the submitted amount."
    );
  }
}
