// shopsync/src/store/mod.rs

//! Persisted tables for the product cache and the cart.
//!
//! Both tables are reached through object-safe traits so the synchronizer and the
//! cart manager never see the engine behind them. Every committed mutation bumps a
//! per-table change notifier, which is what drives `observe_all()` re-emissions.

pub mod live;
pub mod memory;
pub mod sqlite;

use crate::error::ShopResult;
use crate::model::{CartRow, NewProductRow, ProductRow};

use async_trait::async_trait;
use futures_util::stream::BoxStream;

pub use live::{live_query, ChangeNotifier};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// The cached catalog, keyed uniquely by `product_server_id`.
#[async_trait]
pub trait ProductStore: Send + Sync {
  /// Upserts one row. An existing row with the same server id is replaced entirely.
  async fn insert(&self, row: NewProductRow) -> ShopResult<()>;

  /// Upserts all rows as one unit and notifies observers once.
  async fn insert_all(&self, rows: Vec<NewProductRow>) -> ShopResult<()>;

  /// Live query over the whole table, ordered by surrogate key.
  fn observe_all(&self) -> BoxStream<'static, ShopResult<Vec<ProductRow>>>;

  async fn get(&self, server_id: i64) -> ShopResult<Option<ProductRow>>;
}

/// `(product_id -> count)` rows. Callers keep `count >= 1`; the table does not check it.
#[async_trait]
pub trait CartStore: Send + Sync {
  /// Live query over the whole table, ordered by product id.
  fn observe_all(&self) -> BoxStream<'static, ShopResult<Vec<CartRow>>>;

  async fn get(&self, product_id: i64) -> ShopResult<Option<CartRow>>;

  /// Insert-or-replace keyed by `product_id`.
  async fn insert(&self, row: CartRow) -> ShopResult<()>;

  async fn delete(&self, row: CartRow) -> ShopResult<()>;

  /// Deletes `old` and inserts `new` in a single transaction. Observers see either
  /// the table before or after, never an intermediate state.
  async fn replace_in_transaction(&self, old: CartRow, new: CartRow) -> ShopResult<()>;
}
