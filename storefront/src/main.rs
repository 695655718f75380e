// storefront/src/main.rs

mod config;
mod errors;
mod models;
mod services;
mod state;
mod store;
mod web;

#[cfg(test)]
mod test_support;

use crate::config::{AppConfig, OrderStoreBackend};
use crate::state::AppState;
use crate::store::{InMemoryOrderStore, OrderStore, PgOrderStore};

use actix_web::{web as actix_data, App, HttpServer};
use anyhow::Context;
use paygate::PhonePeClient;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  tracing_subscriber::fmt()
    .with_max_level(Level::INFO)
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .with_span_events(FmtSpan::CLOSE)
    .init();

  tracing::info!("Starting storefront payments server...");

  // Missing gateway credentials stop the process here, before any request is served.
  let app_config = match AppConfig::from_env() {
    Ok(cfg) => Arc::new(cfg),
    Err(e) => {
      tracing::error!(error = %e, "Failed to load application configuration.");
      std::process::exit(1);
    }
  };

  let order_store: Arc<dyn OrderStore> = match app_config.order_store {
    OrderStoreBackend::Postgres => match connect_database(&app_config).await {
      Ok(pool) => Arc::new(PgOrderStore::new(pool)),
      Err(e) => {
        tracing::error!(error = ?e, "Order store unavailable.");
        std::process::exit(1);
      }
    },
    OrderStoreBackend::Memory => {
      tracing::warn!("Using the in-memory order store; orders are lost on restart.");
      Arc::new(InMemoryOrderStore::new())
    }
  };

  let gateway = match PhonePeClient::new(app_config.gateway.clone()) {
    Ok(client) => Arc::new(client),
    Err(e) => {
      tracing::error!(error = %e, "Failed to build the gateway client.");
      std::process::exit(1);
    }
  };

  let app_state = match AppState::new(app_config.clone(), gateway, order_store) {
    Ok(state) => state,
    Err(e) => {
      tracing::error!(error = %e, "Failed to assemble application state.");
      std::process::exit(1);
    }
  };

  let server_address = format!("{}:{}", app_config.server_host, app_config.server_port);
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(web::configure_app_routes(&app_config))
  })
  .bind(&server_address)?
  .run()
  .await
}

async fn connect_database(app_config: &AppConfig) -> anyhow::Result<PgPool> {
  let database_url = app_config
    .database_url
    .as_deref()
    .context("DATABASE_URL is required for the postgres order store")?;
  let pool = PgPool::connect(database_url)
    .await
    .context("Failed to connect to the database")?;
  tracing::info!("Successfully connected to the database.");

  if app_config.run_migrations {
    sqlx::migrate!("./migrations")
      .run(&pool)
      .await
      .context("Failed to run database migrations")?;
    tracing::info!("Database migrations applied.");
  }
  Ok(pool)
}
