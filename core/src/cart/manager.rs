// shopsync/src/cart/manager.rs

use crate::cart::keyed_lock::KeyedLock;
use crate::context::ShopContext;
use crate::error::{ShopError, ShopResult};
use crate::model::{CartEntry, CartRow};
use crate::store::CartStore;

use futures_util::stream::{BoxStream, StreamExt};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Enforces the cart quantity rules: a persisted entry always has `count >= 1`,
/// and a product has at most one entry.
///
/// Each read-then-write runs under a per-product lock shared through the
/// [`ShopContext`], so concurrent adds and removes on the same product apply one
/// after the other no matter which manager issues them. Storage errors are passed
/// back unchanged; nothing is retried.
#[derive(Clone)]
pub struct CartManager {
  store: Arc<dyn CartStore>,
  locks: Arc<KeyedLock>,
}

impl CartManager {
  pub fn new(ctx: &ShopContext) -> Self {
    Self {
      store: ctx.cart_store.clone(),
      locks: ctx.cart_locks.clone(),
    }
  }

  /// Live view of every cart entry, unfiltered.
  pub fn subscribe_cart_entries(&self) -> BoxStream<'static, ShopResult<Vec<CartEntry>>> {
    self
      .store
      .observe_all()
      .map(|result| result.map(|rows| rows.into_iter().map(CartEntry::from).collect::<Vec<_>>()))
      .boxed()
  }

  /// Adds one unit of `product_id`. Returns the new count.
  #[instrument(name = "CartManager::add_item", skip(self), err(Display))]
  pub async fn add_item(&self, product_id: i64) -> ShopResult<i64> {
    let _guard = self.locks.lock(product_id).await;
    let count = match self.store.get(product_id).await? {
      Some(existing) => existing.count + 1,
      None => 1,
    };
    self.store.insert(CartRow::new(product_id, count)).await?;
    debug!(count, "Cart entry stored.");
    Ok(count)
  }

  /// Adds one unit of `product_id` unless the entry already holds `limit` units.
  ///
  /// The count is read and checked under the product's lock. Returns the new count,
  /// or `None` when the limit is reached and nothing was written.
  #[instrument(name = "CartManager::add_item_up_to", skip(self), err(Display))]
  pub async fn add_item_up_to(&self, product_id: i64, limit: i64) -> ShopResult<Option<i64>> {
    let _guard = self.locks.lock(product_id).await;
    let current = self.store.get(product_id).await?.map_or(0, |row| row.count);
    if current >= limit {
      debug!(current, limit, "Cart entry at limit; not adding.");
      return Ok(None);
    }
    let count = current + 1;
    self.store.insert(CartRow::new(product_id, count)).await?;
    debug!(count, "Cart entry stored.");
    Ok(Some(count))
  }

  /// Removes one unit of `product_id`. Returns the new count, 0 once the entry is gone.
  ///
  /// Removing a product that is not in the cart does nothing.
  #[instrument(name = "CartManager::remove_item", skip(self), err(Display))]
  pub async fn remove_item(&self, product_id: i64) -> ShopResult<i64> {
    let _guard = self.locks.lock(product_id).await;
    let Some(existing) = self.store.get(product_id).await? else {
      debug!("No cart entry; nothing to remove.");
      return Ok(0);
    };

    let count = existing.count - 1;
    if count < 1 {
      self.store.delete(existing).await?;
      debug!("Cart entry deleted.");
      return Ok(0);
    }
    self
      .store
      .replace_in_transaction(existing, CartRow::new(product_id, count))
      .await?;
    debug!(count, "Cart entry decremented.");
    Ok(count)
  }

  /// The persisted count for `product_id`, or 0 when it has no entry.
  pub async fn get_count(&self, product_id: i64) -> ShopResult<i64> {
    Ok(self.store.get(product_id).await?.map_or(0, |row| row.count))
  }

  /// Sum of every entry's count.
  pub async fn cart_size(&self) -> ShopResult<i64> {
    let entries = self.entries().await?;
    Ok(entries.iter().map(|entry| entry.count).sum())
  }

  /// Current contents of the cart.
  pub async fn entries(&self) -> ShopResult<Vec<CartEntry>> {
    self
      .subscribe_cart_entries()
      .next()
      .await
      .unwrap_or(Err(ShopError::SubscriptionClosed))
  }
}
