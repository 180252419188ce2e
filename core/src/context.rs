// shopsync/src/context.rs

use crate::cart::keyed_lock::KeyedLock;
use crate::error::ShopResult;
use crate::remote::ProductRemote;
use crate::store::{CartStore, MemoryStore, ProductStore, SqliteStore};

use std::sync::Arc;

/// Shared handles to the tables and the remote, built once at startup and passed by
/// reference to [`ProductSynchronizer::new`](crate::sync::ProductSynchronizer::new),
/// [`CartManager::new`](crate::cart::CartManager::new) and
/// [`ShopViewModel::new`](crate::presentation::ShopViewModel::new).
#[derive(Clone)]
pub struct ShopContext {
  pub product_store: Arc<dyn ProductStore>,
  pub cart_store: Arc<dyn CartStore>,
  pub remote: Arc<dyn ProductRemote>,
  /// Per-product cart locks shared by every `CartManager` built from this context.
  pub cart_locks: Arc<KeyedLock>,
}

impl ShopContext {
  pub fn new(
    product_store: Arc<dyn ProductStore>,
    cart_store: Arc<dyn CartStore>,
    remote: Arc<dyn ProductRemote>,
  ) -> Self {
    Self {
      product_store,
      cart_store,
      remote,
      cart_locks: Arc::new(KeyedLock::new()),
    }
  }

  /// Both tables in one SQLite database at `database_url`.
  pub async fn sqlite(database_url: &str, remote: Arc<dyn ProductRemote>) -> ShopResult<Self> {
    let store = Arc::new(SqliteStore::connect(database_url).await?);
    Ok(Self::new(store.clone(), store, remote))
  }

  /// Both tables in process memory. Returns the store so callers can inspect it.
  pub fn in_memory(remote: Arc<dyn ProductRemote>) -> (Self, MemoryStore) {
    let store = MemoryStore::new();
    let ctx = Self::new(Arc::new(store.clone()), Arc::new(store.clone()), remote);
    (ctx, store)
  }
}
