// storefront/src/web/routes.rs

use actix_cors::Cors;
use actix_web::{error, web, HttpResponse};

use crate::config::AppConfig;
use crate::errors::AppError;
use crate::web::cors::cors_policy;
use crate::web::handlers::{order_handlers, payment_handlers};

async fn health_check_handler() -> HttpResponse {
  HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

// Malformed checkout bodies get the same `{success: false, error}` envelope
// as every other initiation failure.
fn json_config() -> web::JsonConfig {
  web::JsonConfig::default().error_handler(|err, _req| {
    let message = match &err {
      error::JsonPayloadError::Deserialize(e) => format!("Invalid checkout request: {}", e),
      other => format!("Invalid checkout request: {}", other),
    };
    AppError::Validation(message).into()
  })
}

/// Routes under `/api/v1`. The browser-facing routes sit behind the storefront
/// CORS policy. The verify callback stays outside it: it answers 302 whatever
/// origin the gateway or the shopper's redirect arrives from.
pub fn configure_app_routes(config: &AppConfig) -> impl FnOnce(&mut web::ServiceConfig) {
  let payments_cors = cors_policy(config);
  let orders_cors = cors_policy(config);
  move |cfg| configure_api_scope(cfg, payments_cors, orders_cors)
}

fn configure_api_scope(cfg: &mut web::ServiceConfig, payments_cors: Cors, orders_cors: Cors) {
  cfg.service(
    web::scope("/api/v1")
      .app_data(json_config())
      .route("/health", web::get().to(health_check_handler))
      .service(
        web::resource("/payments/verify")
          .route(web::get().to(payment_handlers::verify_payment_handler))
          .route(web::post().to(payment_handlers::verify_payment_handler)),
      )
      .service(
        web::scope("/payments")
          .wrap(payments_cors)
          .route(
            "/initiate",
            web::post().to(payment_handlers::initiate_payment_handler),
          )
          .route(
            "/{merchant_transaction_id}/reconcile",
            web::post().to(payment_handlers::reconcile_payment_handler),
          ),
      )
      .service(
        web::scope("/orders").wrap(orders_cors).route(
          "/{merchant_transaction_id}",
          web::get().to(order_handlers::get_order_handler),
        ),
      ),
  );
}
