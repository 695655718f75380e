// storefront/src/web/handlers/payment_handlers.rs

use actix_web::{http::header, web, HttpRequest, HttpResponse};
use paygate::{CallbackEnvelope, X_VERIFY};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info, instrument};

use crate::errors::{AppError, Result};
use crate::services::{CheckoutRequest, SignedCallback};
use crate::state::AppState;
use crate::store::UpdateOutcome;
use crate::web::extractors::AuthenticatedUser;

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
  #[serde(rename = "merchantTransactionId")]
  pub merchant_transaction_id: Option<String>,
}

#[instrument(
    name = "handler::initiate_payment",
    skip(app_state, auth_user, payload),
    fields(user_id = %auth_user.user_id)
)]
pub async fn initiate_payment_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  payload: web::Json<CheckoutRequest>,
) -> Result<HttpResponse> {
  let initiated = app_state
    .initiator
    .initiate(payload.into_inner(), auth_user.user_id)
    .await?;

  info!(
    merchant_transaction_id = %initiated.merchant_transaction_id,
    "Payment initiated; returning pay-page URL."
  );
  Ok(HttpResponse::Ok().json(json!({
    "success": true,
    "paymentUrl": initiated.payment_url,
    "merchantTransactionId": initiated.merchant_transaction_id,
  })))
}

/// Gateway callback and shopper return. Always answers 302 with no body.
#[instrument(name = "handler::verify_payment", skip(app_state, req, body))]
pub async fn verify_payment_handler(app_state: web::Data<AppState>, req: HttpRequest, body: web::Bytes) -> HttpResponse {
  let merchant_transaction_id = web::Query::<CallbackQuery>::from_query(req.query_string())
    .ok()
    .and_then(|q| q.into_inner().merchant_transaction_id);

  let callback = signed_callback(&req, &body);
  debug!(
    has_query_id = merchant_transaction_id.is_some(),
    signed_body = callback.is_some(),
    "Payment callback received."
  );

  let outcome = app_state
    .verifier
    .verify_callback(merchant_transaction_id.as_deref(), callback)
    .await;
  debug!(status = ?outcome.status, location = %outcome.redirect_url, "Redirecting shopper.");

  HttpResponse::Found()
    .insert_header((header::LOCATION, outcome.redirect_url))
    .finish()
}

fn signed_callback(req: &HttpRequest, body: &web::Bytes) -> Option<SignedCallback> {
  if body.is_empty() {
    return None;
  }
  let x_verify = req.headers().get(X_VERIFY)?.to_str().ok()?.to_string();
  let envelope = serde_json::from_slice::<CallbackEnvelope>(body).ok()?;
  Some(SignedCallback { envelope, x_verify })
}

#[instrument(
    name = "handler::reconcile_payment",
    skip(app_state, auth_user, path),
    fields(user_id = %auth_user.user_id, merchant_transaction_id = %path.as_str())
)]
pub async fn reconcile_payment_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<String>,
) -> Result<HttpResponse> {
  let merchant_transaction_id = path.into_inner();
  super::order_handlers::owned_order(&app_state, &auth_user, &merchant_transaction_id).await?;

  let order = match app_state.verifier.reconcile(&merchant_transaction_id).await? {
    UpdateOutcome::Applied(order) | UpdateOutcome::AlreadyFinal(order) => order,
    UpdateOutcome::NotFound => return Err(AppError::NotFound("Order not found".to_string())),
  };

  info!(status = order.status.as_str(), "Manual reconciliation finished.");
  Ok(HttpResponse::Ok().json(json!({ "success": true, "order": order })))
}
