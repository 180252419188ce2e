// shopsync/src/sync/stream.rs

use crate::error::ShopResult;
use crate::model::Product;
use crate::task::TaskGuard;

use futures_util::Stream;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

/// One live product subscription.
///
/// Yields non-empty product lists as the cache changes. A failure is yielded once,
/// after which the stream ends. Dropping the stream aborts the producer task, which
/// cancels both the cache observer and any fetch still in flight.
#[derive(Debug)]
pub struct ProductStream {
  inner: ReceiverStream<ShopResult<Vec<Product>>>,
  producer: TaskGuard,
}

impl ProductStream {
  pub(crate) fn new(rx: mpsc::Receiver<ShopResult<Vec<Product>>>, producer: TaskGuard) -> Self {
    Self {
      inner: ReceiverStream::new(rx),
      producer,
    }
  }

  /// True once the producer task has stopped, for any reason.
  pub fn is_terminated(&self) -> bool {
    self.producer.is_finished()
  }
}

impl Stream for ProductStream {
  type Item = ShopResult<Vec<Product>>;

  fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
    Pin::new(&mut self.get_mut().inner).poll_next(cx)
  }
}
