// storefront/src/models/order.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::Type as SqlxType;
use uuid::Uuid;

use super::order_item::OrderItem;

/// PENDING is the only initial state; COMPLETED and FAILED are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, SqlxType)]
#[sqlx(type_name = "order_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
  Pending,
  Completed,
  Failed,
}

impl OrderStatus {
  pub fn is_terminal(self) -> bool {
    matches!(self, OrderStatus::Completed | OrderStatus::Failed)
  }

  pub fn as_str(self) -> &'static str {
    match self {
      OrderStatus::Pending => "PENDING",
      OrderStatus::Completed => "COMPLETED",
      OrderStatus::Failed => "FAILED",
    }
  }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
  pub id: Uuid,
  pub user_id: Uuid,
  pub merchant_transaction_id: String,
  pub amount: Decimal,
  pub status: OrderStatus,
  pub items: Vec<OrderItem>,
  pub customer_name: String,
  pub customer_email: String,
  pub customer_phone: String,
  pub payment_url: Option<String>,
  pub phonepe_transaction_id: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Everything the initiator knows when it records a new order.
#[derive(Debug, Clone)]
pub struct NewOrder {
  pub user_id: Uuid,
  pub merchant_transaction_id: String,
  pub amount: Decimal,
  pub items: Vec<OrderItem>,
  pub customer_name: String,
  pub customer_email: String,
  pub customer_phone: String,
  pub payment_url: String,
}

/// The verifier's write: a target status and, when the gateway reported one,
/// its transaction id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusUpdate {
  pub status: OrderStatus,
  pub phonepe_transaction_id: Option<String>,
}

impl Order {
  /// Pure form of the store's guarded update: terminal orders are left alone,
  /// and the gateway transaction id is only filled once. Returns whether the
  /// order was eligible for the update.
  pub fn apply(&mut self, update: &StatusUpdate, now: DateTime<Utc>) -> bool {
    if self.status.is_terminal() {
      return false;
    }
    self.status = update.status;
    if self.phonepe_transaction_id.is_none() {
      self.phonepe_transaction_id = update.phonepe_transaction_id.clone();
    }
    self.updated_at = now;
    true
  }
}
