// storefront/src/models/mod.rs

//! Order data as persisted by the order store.

pub mod order;
pub mod order_item;

pub use order::{NewOrder, Order, OrderStatus, StatusUpdate};
pub use order_item::OrderItem;
