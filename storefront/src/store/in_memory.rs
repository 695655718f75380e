// storefront/src/store/in_memory.rs

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use super::{OrderStore, StoreError, UpdateOutcome};
use crate::models::{NewOrder, Order, OrderStatus, StatusUpdate};

/// Orders keyed by merchant transaction id, held in process memory.
///
/// Used for local runs without Postgres (`ORDER_STORE=memory`) and in tests.
/// The lock is never held across an `.await`.
#[derive(Default, Clone)]
pub struct InMemoryOrderStore {
  orders: Arc<RwLock<HashMap<String, Order>>>,
}

impl InMemoryOrderStore {
  pub fn new() -> Self {
    Self::default()
  }

  #[cfg(test)]
  pub fn len(&self) -> usize {
    self.orders.read().len()
  }

  #[cfg(test)]
  pub fn is_empty(&self) -> bool {
    self.orders.read().is_empty()
  }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
  async fn insert(&self, new: NewOrder) -> Result<Order, StoreError> {
    let mut orders = self.orders.write();
    if orders.contains_key(&new.merchant_transaction_id) {
      return Err(StoreError::DuplicateTransaction(new.merchant_transaction_id));
    }
    let now = Utc::now();
    let order = Order {
      id: Uuid::new_v4(),
      user_id: new.user_id,
      merchant_transaction_id: new.merchant_transaction_id.clone(),
      amount: new.amount,
      status: OrderStatus::Pending,
      items: new.items,
      customer_name: new.customer_name,
      customer_email: new.customer_email,
      customer_phone: new.customer_phone,
      payment_url: Some(new.payment_url),
      phonepe_transaction_id: None,
      created_at: now,
      updated_at: now,
    };
    orders.insert(new.merchant_transaction_id, order.clone());
    Ok(order)
  }

  async fn find_by_transaction(&self, merchant_transaction_id: &str) -> Result<Option<Order>, StoreError> {
    Ok(self.orders.read().get(merchant_transaction_id).cloned())
  }

  async fn apply_status(
    &self,
    merchant_transaction_id: &str,
    update: StatusUpdate,
  ) -> Result<UpdateOutcome, StoreError> {
    let mut orders = self.orders.write();
    let Some(order) = orders.get_mut(merchant_transaction_id) else {
      return Ok(UpdateOutcome::NotFound);
    };
    if order.apply(&update, Utc::now()) {
      Ok(UpdateOutcome::Applied(order.clone()))
    } else {
      Ok(UpdateOutcome::AlreadyFinal(order.clone()))
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_support::new_order;

  fn completed(txn: &str) -> StatusUpdate {
    StatusUpdate {
      status: OrderStatus::Completed,
      phonepe_transaction_id: Some(txn.to_string()),
    }
  }

  #[tokio::test]
  async fn insert_starts_pending_and_rejects_duplicates() {
    let store = InMemoryOrderStore::new();
    let order = store.insert(new_order("TXN_1_a")).await.unwrap();
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.payment_url.as_deref(), Some("https://pay.test/page/TXN_1_a"));
    assert!(order.phonepe_transaction_id.is_none());

    let dup = store.insert(new_order("TXN_1_a")).await;
    assert!(matches!(dup, Err(StoreError::DuplicateTransaction(id)) if id == "TXN_1_a"));
    assert_eq!(store.len(), 1);
  }

  #[tokio::test]
  async fn reapplying_the_same_update_is_a_no_op() {
    let store = InMemoryOrderStore::new();
    store.insert(new_order("TXN_2_b")).await.unwrap();

    let first = store.apply_status("TXN_2_b", completed("PPT1")).await.unwrap();
    let UpdateOutcome::Applied(after_first) = first else {
      panic!("first update should apply, got {:?}", first);
    };
    let second = store.apply_status("TXN_2_b", completed("PPT1")).await.unwrap();
    let UpdateOutcome::AlreadyFinal(after_second) = second else {
      panic!("second update should find a final order, got {:?}", second);
    };

    assert_eq!(after_first, after_second);
    assert_eq!(after_second.status, OrderStatus::Completed);
    assert_eq!(after_second.phonepe_transaction_id.as_deref(), Some("PPT1"));
  }

  #[tokio::test]
  async fn terminal_orders_never_flip() {
    let store = InMemoryOrderStore::new();
    store.insert(new_order("TXN_3_c")).await.unwrap();
    store.apply_status("TXN_3_c", completed("PPT1")).await.unwrap();

    for status in [OrderStatus::Failed, OrderStatus::Pending] {
      let outcome = store
        .apply_status(
          "TXN_3_c",
          StatusUpdate {
            status,
            phonepe_transaction_id: Some("OTHER".into()),
          },
        )
        .await
        .unwrap();
      assert!(matches!(outcome, UpdateOutcome::AlreadyFinal(_)));
    }
    let order = store.find_by_transaction("TXN_3_c").await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Completed);
    assert_eq!(order.phonepe_transaction_id.as_deref(), Some("PPT1"));
  }

  #[tokio::test]
  async fn pending_update_keeps_order_open() {
    let store = InMemoryOrderStore::new();
    store.insert(new_order("TXN_4_d")).await.unwrap();
    let outcome = store
      .apply_status(
        "TXN_4_d",
        StatusUpdate {
          status: OrderStatus::Pending,
          phonepe_transaction_id: None,
        },
      )
      .await
      .unwrap();
    assert!(matches!(outcome, UpdateOutcome::Applied(ref o) if o.status == OrderStatus::Pending));

    let later = store.apply_status("TXN_4_d", completed("PPT9")).await.unwrap();
    assert!(matches!(later, UpdateOutcome::Applied(ref o) if o.status == OrderStatus::Completed));
  }

  #[tokio::test]
  async fn unknown_transaction_is_not_found() {
    let store = InMemoryOrderStore::new();
    let outcome = store.apply_status("TXN_missing", completed("PPT1")).await.unwrap();
    assert_eq!(outcome, UpdateOutcome::NotFound);
    assert!(store.find_by_transaction("TXN_missing").await.unwrap().is_none());
    assert!(store.is_empty());
  }
}
