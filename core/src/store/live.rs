// shopsync/src/store/live.rs

use crate::error::ShopResult;

use futures_util::stream::{self, BoxStream, StreamExt};
use std::future::Future;
use tokio::sync::watch;
use tracing::trace;

/// Version counter for one table. Bumped once per committed mutation.
#[derive(Debug)]
pub struct ChangeNotifier {
  tx: watch::Sender<u64>,
}

impl ChangeNotifier {
  pub fn new() -> Self {
    let (tx, _rx) = watch::channel(0);
    Self { tx }
  }

  pub fn notify(&self) {
    self.tx.send_modify(|version| *version = version.wrapping_add(1));
  }

  pub fn version(&self) -> u64 {
    *self.tx.borrow()
  }

  pub fn subscribe(&self) -> watch::Receiver<u64> {
    self.tx.subscribe()
  }
}

impl Default for ChangeNotifier {
  fn default() -> Self {
    Self::new()
  }
}

/// Turns a change receiver and a query into a live query stream.
///
/// The current result is emitted right away, then once more after every version
/// change. The version is marked seen before the query runs, so a write that lands
/// mid-query always produces another emission. Bursts of writes between two polls
/// may collapse into a single emission of the latest contents.
pub fn live_query<T, F, Fut>(changes: watch::Receiver<u64>, query: F) -> BoxStream<'static, ShopResult<T>>
where
  T: Send + 'static,
  F: Fn() -> Fut + Send + Sync + 'static,
  Fut: Future<Output = ShopResult<T>> + Send + 'static,
{
  stream::unfold((changes, query, true), |(mut changes, query, first)| async move {
    if !first && changes.changed().await.is_err() {
      return None;
    }
    let version = *changes.borrow_and_update();
    trace!(version, "Live query re-running.");
    let result = query().await;
    Some((result, (changes, query, false)))
  })
  .boxed()
}
