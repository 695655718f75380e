// storefront/src/web/extractors.rs

use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;

/// The principal the hosting platform authenticated for this request.
///
/// Session handling lives in front of this service; it forwards the user id
/// in a trusted header (`AUTH_USER_HEADER`, `X-User-ID` by default). A request
/// without a valid id is rejected before the handler body runs.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser {
  pub user_id: Uuid,
}

impl FromRequest for AuthenticatedUser {
  type Error = AppError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    let header_name = req
      .app_data::<web::Data<AppState>>()
      .map(|state| state.config.auth_user_header.clone())
      .unwrap_or_else(|| "X-User-ID".to_string());

    let user_id = req
      .headers()
      .get(header_name.as_str())
      .and_then(|value| value.to_str().ok())
      .and_then(|value| Uuid::parse_str(value.trim()).ok());

    match user_id {
      Some(user_id) => ready(Ok(AuthenticatedUser { user_id })),
      None => {
        warn!(header = %header_name, "AuthenticatedUser extractor: missing or invalid user id.");
        ready(Err(AppError::Auth("Unauthorized".to_string())))
      }
    }
  }
}
