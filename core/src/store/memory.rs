// shopsync/src/store/memory.rs

use crate::error::{ShopError, ShopResult};
use crate::model::{CartRow, NewProductRow, ProductRow};
use crate::store::live::{live_query, ChangeNotifier};
use crate::store::{CartStore, ProductStore};

use async_trait::async_trait;
use futures_util::stream::BoxStream;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Default)]
struct Tables {
  // Keyed by product_server_id, which is the unique column.
  products: BTreeMap<i64, ProductRow>,
  next_local_id: i64,
  cart: BTreeMap<i64, CartRow>,
}

impl Tables {
  fn upsert_product(&mut self, row: NewProductRow) {
    let local_id = match self.products.get(&row.product_server_id) {
      Some(existing) => existing.local_id,
      None => {
        self.next_local_id += 1;
        self.next_local_id
      }
    };
    self.products.insert(row.product_server_id, row.with_local_id(local_id));
  }

  fn products_by_local_id(&self) -> Vec<ProductRow> {
    let mut rows: Vec<ProductRow> = self.products.values().cloned().collect();
    rows.sort_by_key(|row| row.local_id);
    rows
  }
}

/// Both tables held in process memory, with the same change semantics as
/// [`SqliteStore`](crate::store::SqliteStore).
///
/// Lock guards are never held across `.await`.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
  tables: Arc<RwLock<Tables>>,
  product_changes: Arc<ChangeNotifier>,
  cart_changes: Arc<ChangeNotifier>,
  failing: Arc<AtomicBool>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// While set, every read and write fails with a storage I/O error.
  pub fn set_failing(&self, failing: bool) {
    self.failing.store(failing, Ordering::SeqCst);
  }

  pub fn product_version(&self) -> u64 {
    self.product_changes.version()
  }

  pub fn cart_version(&self) -> u64 {
    self.cart_changes.version()
  }

  pub fn product_rows(&self) -> Vec<ProductRow> {
    self.tables.read().products_by_local_id()
  }

  pub fn cart_rows(&self) -> Vec<CartRow> {
    self.tables.read().cart.values().copied().collect()
  }

  fn check(failing: &AtomicBool) -> ShopResult<()> {
    if failing.load(Ordering::SeqCst) {
      return Err(ShopError::Storage(sqlx::Error::Io(std::io::Error::new(
        std::io::ErrorKind::Other,
        "memory store set to fail",
      ))));
    }
    Ok(())
  }
}

#[async_trait]
impl ProductStore for MemoryStore {
  async fn insert(&self, row: NewProductRow) -> ShopResult<()> {
    Self::check(&self.failing)?;
    self.tables.write().upsert_product(row);
    self.product_changes.notify();
    Ok(())
  }

  async fn insert_all(&self, rows: Vec<NewProductRow>) -> ShopResult<()> {
    Self::check(&self.failing)?;
    if rows.is_empty() {
      return Ok(());
    }
    {
      let mut tables = self.tables.write();
      for row in rows {
        tables.upsert_product(row);
      }
    }
    self.product_changes.notify();
    Ok(())
  }

  fn observe_all(&self) -> BoxStream<'static, ShopResult<Vec<ProductRow>>> {
    let tables = self.tables.clone();
    let failing = self.failing.clone();
    live_query(self.product_changes.subscribe(), move || {
      let result = Self::check(&failing).map(|_| tables.read().products_by_local_id());
      async move { result }
    })
  }

  async fn get(&self, server_id: i64) -> ShopResult<Option<ProductRow>> {
    Self::check(&self.failing)?;
    Ok(self.tables.read().products.get(&server_id).cloned())
  }
}

#[async_trait]
impl CartStore for MemoryStore {
  fn observe_all(&self) -> BoxStream<'static, ShopResult<Vec<CartRow>>> {
    let tables = self.tables.clone();
    let failing = self.failing.clone();
    live_query(self.cart_changes.subscribe(), move || {
      let result = Self::check(&failing).map(|_| tables.read().cart.values().copied().collect::<Vec<CartRow>>());
      async move { result }
    })
  }

  async fn get(&self, product_id: i64) -> ShopResult<Option<CartRow>> {
    Self::check(&self.failing)?;
    Ok(self.tables.read().cart.get(&product_id).copied())
  }

  async fn insert(&self, row: CartRow) -> ShopResult<()> {
    Self::check(&self.failing)?;
    self.tables.write().cart.insert(row.product_id, row);
    self.cart_changes.notify();
    Ok(())
  }

  async fn delete(&self, row: CartRow) -> ShopResult<()> {
    Self::check(&self.failing)?;
    let removed = self.tables.write().cart.remove(&row.product_id);
    if removed.is_some() {
      self.cart_changes.notify();
    }
    Ok(())
  }

  async fn replace_in_transaction(&self, old: CartRow, new: CartRow) -> ShopResult<()> {
    Self::check(&self.failing)?;
    {
      let mut tables = self.tables.write();
      tables.cart.remove(&old.product_id);
      tables.cart.insert(new.product_id, new);
    }
    self.cart_changes.notify();
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn row(server_id: i64, name: &str) -> NewProductRow {
    NewProductRow {
      product_server_id: server_id,
      description: String::new(),
      name: name.to_string(),
      price: 10,
      currency_code: "USD".to_string(),
      currency_symbol: "$".to_string(),
      quantity: 1,
      image_url: String::new(),
      status: "Active".to_string(),
    }
  }

  #[tokio::test]
  async fn upsert_keeps_surrogate_and_replaces_fields() {
    let store = MemoryStore::new();
    ProductStore::insert(&store, row(1, "first")).await.unwrap();
    ProductStore::insert(&store, row(2, "second")).await.unwrap();
    ProductStore::insert(&store, row(1, "renamed")).await.unwrap();

    let rows = store.product_rows();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].local_id, 1);
    assert_eq!(rows[0].name, "renamed");
    assert_eq!(rows[1].local_id, 2);
  }

  #[tokio::test]
  async fn empty_insert_all_does_not_notify() {
    let store = MemoryStore::new();
    store.insert_all(Vec::new()).await.unwrap();
    assert_eq!(store.product_version(), 0);
  }
}
