// storefront/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use paygate::GatewayConfig;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStoreBackend {
  Postgres,
  Memory,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  /// Storefront origin every user-facing redirect points at.
  pub app_base_url: String,
  /// Public origin of this service; the gateway's callback URL is built from it.
  pub public_api_url: String,

  pub order_store: OrderStoreBackend,
  pub database_url: Option<String>,
  pub run_migrations: bool,

  pub gateway: GatewayConfig,

  /// Header the hosting platform uses to forward the authenticated user id.
  pub auth_user_header: String,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present

    let get_env = |var_name: &str| {
      env::var(var_name).map_err(|e| AppError::Config(format!("Missing environment variable '{}': {}", var_name, e)))
    };

    let server_host = get_env("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let server_port = get_env("SERVER_PORT")
      .unwrap_or_else(|_| "8080".to_string())
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?;
    let app_base_url = get_env("APP_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
    let public_api_url =
      get_env("PUBLIC_API_URL").unwrap_or_else(|_| format!("http://{}:{}", server_host, server_port));

    let order_store = match get_env("ORDER_STORE")
      .unwrap_or_else(|_| "postgres".to_string())
      .to_ascii_lowercase()
      .as_str()
    {
      "postgres" => OrderStoreBackend::Postgres,
      "memory" => OrderStoreBackend::Memory,
      other => return Err(AppError::Config(format!("Invalid ORDER_STORE value: '{}'", other))),
    };
    let database_url = match order_store {
      OrderStoreBackend::Postgres => Some(get_env("DATABASE_URL")?),
      OrderStoreBackend::Memory => get_env("DATABASE_URL").ok(),
    };
    let run_migrations = get_env("RUN_MIGRATIONS")
      .unwrap_or_else(|_| "true".to_string())
      .parse::<bool>()
      .map_err(|e| AppError::Config(format!("Invalid RUN_MIGRATIONS value: {}", e)))?;

    // Gateway credentials have no defaults. A blank value is as fatal as a missing one.
    let gateway_timeout_secs = get_env("PHONEPE_TIMEOUT_SECS")
      .unwrap_or_else(|_| paygate::DEFAULT_REQUEST_TIMEOUT.as_secs().to_string())
      .parse::<u64>()
      .map_err(|e| AppError::Config(format!("Invalid PHONEPE_TIMEOUT_SECS: {}", e)))?;
    let gateway = GatewayConfig::new(
      get_env("PHONEPE_MERCHANT_ID")?,
      get_env("PHONEPE_SALT_KEY")?,
      get_env("PHONEPE_SALT_INDEX")?,
      get_env("PHONEPE_BASE_URL")?,
    )?
    .with_request_timeout(Duration::from_secs(gateway_timeout_secs));

    let auth_user_header = get_env("AUTH_USER_HEADER").unwrap_or_else(|_| "X-User-ID".to_string());

    tracing::info!("Application configuration loaded successfully.");
    tracing::debug!(gateway = ?gateway, store = ?order_store, "Loaded config details");

    Ok(Self {
      server_host,
      server_port,
      app_base_url: app_base_url.trim_end_matches('/').to_string(),
      public_api_url: public_api_url.trim_end_matches('/').to_string(),
      order_store,
      database_url,
      run_migrations,
      gateway,
      auth_user_header,
    })
  }

  /// Where the gateway sends the shopper after the hosted pay page.
  pub fn payment_redirect_url(&self) -> String {
    format!("{}/cart?payment=success", self.app_base_url)
  }

  /// Server-to-server callback target, carrying the id it should reconcile.
  pub fn payment_callback_url(&self, merchant_transaction_id: &str) -> String {
    format!(
      "{}/api/v1/payments/verify?merchantTransactionId={}",
      self.public_api_url, merchant_transaction_id
    )
  }

  pub fn success_redirect(&self, merchant_transaction_id: &str) -> String {
    format!("{}/cart?payment=success&txnId={}", self.app_base_url, merchant_transaction_id)
  }

  pub fn failure_redirect(&self) -> String {
    format!("{}/cart?payment=failed", self.app_base_url)
  }
}
