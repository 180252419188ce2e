// shopsync/src/sync/product_sync.rs

use crate::context::ShopContext;
use crate::error::{ShopError, ShopResult};
use crate::model::{NewProductRow, Product};
use crate::remote::ProductRemote;
use crate::store::ProductStore;
use crate::sync::stream::ProductStream;
use crate::task::TaskGuard;

use futures_util::StreamExt;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, info_span, instrument, warn, Instrument};

const SUBSCRIPTION_BUFFER: usize = 16;

/// Merges the cached product table and the remote catalog into one live list.
#[derive(Clone)]
pub struct ProductSynchronizer {
  store: Arc<dyn ProductStore>,
  remote: Arc<dyn ProductRemote>,
}

impl ProductSynchronizer {
  pub fn new(ctx: &ShopContext) -> Self {
    Self {
      store: ctx.product_store.clone(),
      remote: ctx.remote.clone(),
    }
  }

  /// Starts a new live subscription to the product list.
  ///
  /// The cache is observed and one remote fetch is issued at the same time. The
  /// fetched records are upserted into the cache, which in turn makes the observer
  /// re-emit; nothing from the network is sent to the subscriber directly. Empty
  /// lists are never emitted. A failed fetch is yielded as the final item and leaves
  /// the cache untouched.
  ///
  /// Must be called from within a tokio runtime.
  pub fn subscribe_products(&self) -> ProductStream {
    let (tx, rx) = mpsc::channel(SUBSCRIPTION_BUFFER);
    let store = self.store.clone();
    let remote = self.remote.clone();
    let producer = TaskGuard::spawn(
      run_subscription(store, remote, tx).instrument(info_span!("ProductSynchronizer::subscription")),
    );
    ProductStream::new(rx, producer)
  }

  /// One fetch-and-upsert pass. Returns how many records were written.
  #[instrument(name = "ProductSynchronizer::refresh", skip(self), err(Display))]
  pub async fn refresh(&self) -> ShopResult<usize> {
    fetch_into_cache(self.store.as_ref(), self.remote.as_ref()).await
  }

  /// Reads one product from the cache by server id.
  ///
  /// The remote is never consulted, so an id that was never synced is `NotFound`
  /// even if the server knows it.
  #[instrument(name = "ProductSynchronizer::fetch_single", skip(self), err(Display))]
  pub async fn fetch_single(&self, product_id: i64) -> ShopResult<Product> {
    self
      .store
      .get(product_id)
      .await?
      .map(Product::from)
      .ok_or(ShopError::NotFound { product_id })
  }
}

async fn fetch_into_cache(store: &dyn ProductStore, remote: &dyn ProductRemote) -> ShopResult<usize> {
  let records = remote.fetch_products().await?;
  let rows: Vec<NewProductRow> = records.into_iter().map(NewProductRow::from).collect();
  let written = rows.len();
  store.insert_all(rows).await?;
  Ok(written)
}

async fn run_subscription(
  store: Arc<dyn ProductStore>,
  remote: Arc<dyn ProductRemote>,
  tx: mpsc::Sender<ShopResult<Vec<Product>>>,
) {
  let observe_cache = async {
    let mut rows = store.observe_all();
    while let Some(result) = rows.next().await {
      let item = match result {
        Ok(rows) => {
          let products: Vec<Product> = rows.into_iter().map(Product::from).collect();
          if products.is_empty() {
            debug!("Cache is empty, holding emission.");
            continue;
          }
          Ok(products)
        }
        Err(err) => Err(err),
      };
      let failed = item.is_err();
      if tx.send(item).await.is_err() || failed {
        return;
      }
    }
  };

  let fetch_remote = async {
    match fetch_into_cache(store.as_ref(), remote.as_ref()).await {
      Ok(written) => {
        info!(written, "Product cache refreshed from remote.");
        // Done; the cache observer keeps the subscription alive from here.
        std::future::pending::<()>().await;
      }
      Err(err) => {
        warn!(error = %err, "Product fetch failed; cache left as-is.");
        let _ = tx.send(Err(err)).await;
      }
    }
  };

  tokio::select! {
    _ = observe_cache => {},
    _ = fetch_remote => {},
    _ = tx.closed() => debug!("Product subscriber went away."),
  }
}
