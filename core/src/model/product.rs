// shopsync/src/model/product.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A catalog product as the rest of the application sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
  pub server_id: i64,
  pub image_url: String,
  pub name: String,
  pub description: String,
  /// Minor-unit amount.
  pub price: i64,
  pub currency_symbol: String,
  /// Available stock.
  pub quantity: i64,
  pub status: String,
}

impl Product {
  pub fn price_text(&self) -> String {
    format!("{}{}", self.currency_symbol, self.price)
  }
}

/// A cached row of `product_table`.
///
/// `local_id` is storage identity only; `product_server_id` is unique and is what
/// upserts key on.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct ProductRow {
  pub local_id: i64,
  pub product_server_id: i64,
  pub description: String,
  pub name: String,
  pub price: i64,
  pub currency_code: String,
  pub currency_symbol: String,
  pub quantity: i64,
  pub image_url: String,
  pub status: String,
}

/// A product row before the table assigns its surrogate key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProductRow {
  pub product_server_id: i64,
  pub description: String,
  pub name: String,
  pub price: i64,
  pub currency_code: String,
  pub currency_symbol: String,
  pub quantity: i64,
  pub image_url: String,
  pub status: String,
}

impl NewProductRow {
  pub fn with_local_id(self, local_id: i64) -> ProductRow {
    ProductRow {
      local_id,
      product_server_id: self.product_server_id,
      description: self.description,
      name: self.name,
      price: self.price,
      currency_code: self.currency_code,
      currency_symbol: self.currency_symbol,
      quantity: self.quantity,
      image_url: self.image_url,
      status: self.status,
    }
  }
}

impl From<ProductRow> for Product {
  fn from(row: ProductRow) -> Self {
    Self {
      server_id: row.product_server_id,
      image_url: row.image_url,
      name: row.name,
      description: row.description,
      price: row.price,
      currency_symbol: row.currency_symbol,
      quantity: row.quantity,
      status: row.status,
    }
  }
}

/// One record of the `GET /productBundles` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteProduct {
  pub id: i64,
  pub name: String,
  pub description: String,
  pub price: i64,
  pub currency_code: String,
  pub currency_symbol: String,
  pub quantity: i64,
  #[serde(rename = "imageLocation")]
  pub image_url: String,
  pub status: String,
}

impl From<RemoteProduct> for NewProductRow {
  fn from(remote: RemoteProduct) -> Self {
    Self {
      product_server_id: remote.id,
      description: remote.description,
      name: remote.name,
      price: remote.price,
      currency_code: remote.currency_code,
      currency_symbol: remote.currency_symbol,
      quantity: remote.quantity,
      image_url: remote.image_url,
      status: remote.status,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn price_text_prefixes_symbol() {
    let product = Product {
      server_id: 1,
      image_url: String::new(),
      name: "Banana".to_string(),
      description: String::new(),
      price: 10,
      currency_symbol: "$".to_string(),
      quantity: 3,
      status: "Active".to_string(),
    };
    assert_eq!(product.price_text(), "$10");
  }

  #[test]
  fn remote_record_decodes_wire_names() {
    let body = r#"[{
      "id": 7,
      "name": "Coffee",
      "description": "Ground",
      "price": 450,
      "currencyCode": "GBP",
      "currencySymbol": "£",
      "quantity": 12,
      "imageLocation": "https://img.example/coffee.png",
      "status": "Active"
    }]"#;
    let records: Vec<RemoteProduct> = serde_json::from_str(body).unwrap();
    let row = NewProductRow::from(records[0].clone());
    assert_eq!(row.product_server_id, 7);
    assert_eq!(row.currency_code, "GBP");
    assert_eq!(row.image_url, "https://img.example/coffee.png");
  }

  #[test]
  fn row_to_product_drops_storage_only_fields() {
    let row = NewProductRow {
      product_server_id: 3,
      description: "d".to_string(),
      name: "n".to_string(),
      price: 5,
      currency_code: "USD".to_string(),
      currency_symbol: "$".to_string(),
      quantity: 2,
      image_url: "u".to_string(),
      status: "Active".to_string(),
    }
    .with_local_id(42);
    let product = Product::from(row);
    assert_eq!(product.server_id, 3);
    assert_eq!(product.price_text(), "$5");
  }
}
