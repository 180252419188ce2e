// shopsync/src/model/cart.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One row of `cart_table`. `product_id` is the primary key, so a product has at
/// most one row. Rows with `count < 1` are deleted rather than stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow)]
pub struct CartRow {
  pub product_id: i64,
  pub count: i64,
}

impl CartRow {
  pub fn new(product_id: i64, count: i64) -> Self {
    Self { product_id, count }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartEntry {
  pub product_id: i64,
  pub count: i64,
}

impl From<CartRow> for CartEntry {
  fn from(row: CartRow) -> Self {
    Self {
      product_id: row.product_id,
      count: row.count,
    }
  }
}
