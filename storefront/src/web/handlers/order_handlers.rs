// storefront/src/web/handlers/order_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::{instrument, warn};

use crate::errors::{AppError, Result};
use crate::models::Order;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

/// Loads an order the caller owns. Someone else's order is reported as missing.
pub(crate) async fn owned_order(
  app_state: &AppState,
  auth_user: &AuthenticatedUser,
  merchant_transaction_id: &str,
) -> Result<Order> {
  let order = app_state
    .order_store
    .find_by_transaction(merchant_transaction_id)
    .await?
    .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

  if order.user_id != auth_user.user_id {
    warn!(owner = %order.user_id, "Order lookup by a different user.");
    return Err(AppError::NotFound("Order not found".to_string()));
  }
  Ok(order)
}

#[instrument(
    name = "handler::get_order",
    skip(app_state, auth_user, path),
    fields(user_id = %auth_user.user_id, merchant_transaction_id = %path.as_str())
)]
pub async fn get_order_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<String>,
) -> Result<HttpResponse> {
  let order = owned_order(&app_state, &auth_user, &path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(json!({ "success": true, "order": order })))
}
