// storefront/src/store/postgres.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use tracing::{debug, instrument};
use uuid::Uuid;

use super::{OrderStore, StoreError, UpdateOutcome};
use crate::models::{NewOrder, Order, OrderItem, OrderStatus, StatusUpdate};

const ORDER_COLUMNS: &str = "id, user_id, merchant_transaction_id, amount, status, items, customer_name, \
   customer_email, customer_phone, payment_url, phonepe_transaction_id, created_at, updated_at";

// Postgres unique_violation.
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, FromRow)]
struct OrderRow {
  id: Uuid,
  user_id: Uuid,
  merchant_transaction_id: String,
  amount: Decimal,
  status: OrderStatus,
  items: Json<Vec<OrderItem>>,
  customer_name: String,
  customer_email: String,
  customer_phone: String,
  payment_url: Option<String>,
  phonepe_transaction_id: Option<String>,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

impl From<OrderRow> for Order {
  fn from(row: OrderRow) -> Self {
    Order {
      id: row.id,
      user_id: row.user_id,
      merchant_transaction_id: row.merchant_transaction_id,
      amount: row.amount,
      status: row.status,
      items: row.items.0,
      customer_name: row.customer_name,
      customer_email: row.customer_email,
      customer_phone: row.customer_phone,
      payment_url: row.payment_url,
      phonepe_transaction_id: row.phonepe_transaction_id,
      created_at: row.created_at,
      updated_at: row.updated_at,
    }
  }
}

/// Orders in the `orders` table (see `migrations/`).
///
/// The status update is a single conditional `UPDATE ... WHERE status = 'PENDING'`,
/// so concurrent callbacks for the same transaction cannot move a terminal
/// order and need no further locking.
#[derive(Clone)]
pub struct PgOrderStore {
  pool: PgPool,
}

impl PgOrderStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl OrderStore for PgOrderStore {
  #[instrument(name = "store::insert", skip(self, new), fields(merchant_transaction_id = %new.merchant_transaction_id))]
  async fn insert(&self, new: NewOrder) -> Result<Order, StoreError> {
    let sql = format!(
      "INSERT INTO orders (id, user_id, merchant_transaction_id, amount, status, items, customer_name, \
       customer_email, customer_phone, payment_url) \
       VALUES ($1, $2, $3, $4, 'PENDING', $5, $6, $7, $8, $9) \
       RETURNING {}",
      ORDER_COLUMNS
    );
    let result = sqlx::query_as::<_, OrderRow>(&sql)
      .bind(Uuid::new_v4())
      .bind(new.user_id)
      .bind(&new.merchant_transaction_id)
      .bind(new.amount)
      .bind(Json(&new.items))
      .bind(&new.customer_name)
      .bind(&new.customer_email)
      .bind(&new.customer_phone)
      .bind(&new.payment_url)
      .fetch_one(&self.pool)
      .await;

    match result {
      Ok(row) => Ok(row.into()),
      Err(sqlx::Error::Database(db_err)) if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) => {
        Err(StoreError::DuplicateTransaction(new.merchant_transaction_id))
      }
      Err(e) => Err(StoreError::Database(e)),
    }
  }

  async fn find_by_transaction(&self, merchant_transaction_id: &str) -> Result<Option<Order>, StoreError> {
    let sql = format!("SELECT {} FROM orders WHERE merchant_transaction_id = $1", ORDER_COLUMNS);
    let row = sqlx::query_as::<_, OrderRow>(&sql)
      .bind(merchant_transaction_id)
      .fetch_optional(&self.pool)
      .await?;
    Ok(row.map(Order::from))
  }

  #[instrument(name = "store::apply_status", skip(self, update), fields(status = update.status.as_str()))]
  async fn apply_status(
    &self,
    merchant_transaction_id: &str,
    update: StatusUpdate,
  ) -> Result<UpdateOutcome, StoreError> {
    let sql = format!(
      "UPDATE orders \
       SET status = $2, \
           phonepe_transaction_id = COALESCE(phonepe_transaction_id, $3), \
           updated_at = NOW() \
       WHERE merchant_transaction_id = $1 AND status = 'PENDING' \
       RETURNING {}",
      ORDER_COLUMNS
    );
    let updated = sqlx::query_as::<_, OrderRow>(&sql)
      .bind(merchant_transaction_id)
      .bind(update.status)
      .bind(update.phonepe_transaction_id.as_deref())
      .fetch_optional(&self.pool)
      .await?;

    if let Some(row) = updated {
      return Ok(UpdateOutcome::Applied(row.into()));
    }

    // Nothing updated: either the order is already final or it does not exist.
    debug!("Conditional update matched no PENDING row; checking for a final order.");
    Ok(match self.find_by_transaction(merchant_transaction_id).await? {
      Some(order) => UpdateOutcome::AlreadyFinal(order),
      None => UpdateOutcome::NotFound,
    })
  }
}
