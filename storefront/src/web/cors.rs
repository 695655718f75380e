// storefront/src/web/cors.rs

use actix_cors::Cors;
use actix_web::http::{header, Method};

use crate::config::AppConfig;

const PREFLIGHT_MAX_AGE_SECS: usize = 60 * 60;

/// The storefront calls this API from its own origin, so only that origin is
/// allowed, together with the header that carries the authenticated user.
pub fn cors_policy(config: &AppConfig) -> Cors {
  Cors::default()
    .allowed_origin(&config.app_base_url)
    .allowed_methods([Method::GET, Method::POST, Method::OPTIONS])
    .allowed_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    .allowed_header(config.auth_user_header.as_str())
    .max_age(PREFLIGHT_MAX_AGE_SECS)
}
