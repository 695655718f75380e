// storefront/src/store/mod.rs

//! Persistence for orders.
//!
//! The initiator inserts an order exactly once; the verifier then applies
//! status updates by merchant transaction id. Updates may be delivered more
//! than once (the gateway retries callbacks), so [`OrderStore::apply_status`]
//! must be safe to re-apply: it only touches orders that are still PENDING.

pub mod in_memory;
pub mod postgres;

use crate::models::{NewOrder, Order, StatusUpdate};
use async_trait::async_trait;
use thiserror::Error;

pub use in_memory::InMemoryOrderStore;
pub use postgres::PgOrderStore;

#[derive(Debug, Error)]
pub enum StoreError {
  #[error("an order with merchant transaction id '{0}' already exists")]
  DuplicateTransaction(String),

  #[error("database error: {0}")]
  Database(#[from] sqlx::Error),
}

#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
  /// The order was PENDING and now carries the update.
  Applied(Order),
  /// The order had already reached a terminal state and was left untouched.
  AlreadyFinal(Order),
  NotFound,
}

#[async_trait]
pub trait OrderStore: Send + Sync {
  async fn insert(&self, order: NewOrder) -> Result<Order, StoreError>;

  async fn find_by_transaction(&self, merchant_transaction_id: &str) -> Result<Option<Order>, StoreError>;

  async fn apply_status(&self, merchant_transaction_id: &str, update: StatusUpdate)
    -> Result<UpdateOutcome, StoreError>;
}
