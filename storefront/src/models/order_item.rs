// storefront/src/models/order_item.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// A line item copied into the order at checkout. Later catalog edits never
/// reach it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
  #[serde(deserialize_with = "string_or_number")]
  pub id: String,
  pub name: String,
  pub price: Decimal,
  pub quantity: u32,
}

// Catalog ids arrive as either JSON strings or numbers.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
  D: Deserializer<'de>,
{
  #[derive(Deserialize)]
  #[serde(untagged)]
  enum RawId {
    Text(String),
    Int(i64),
    Float(f64),
  }

  Ok(match RawId::deserialize(deserializer)? {
    RawId::Text(s) => s,
    RawId::Int(n) => n.to_string(),
    RawId::Float(n) => n.to_string(),
  })
}
