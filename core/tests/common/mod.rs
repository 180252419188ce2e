// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use async_trait::async_trait;
use futures_util::{Stream, StreamExt};
use parking_lot::Mutex;
use shopsync::{ProductRemote, RemoteProduct, ShopError, ShopResult};
use std::future::Future;
use std::sync::{
  atomic::{AtomicBool, AtomicUsize, Ordering},
  Arc,
};
use std::time::Duration;
use tokio::sync::Notify;
use tracing::Level;

pub const WAIT: Duration = Duration::from_secs(2);

// --- Fixtures ---
pub fn remote_product(id: i64, name: &str) -> RemoteProduct {
  RemoteProduct {
    id,
    name: name.to_string(),
    description: format!("{} description", name),
    price: 10 * id,
    currency_code: "USD".to_string(),
    currency_symbol: "$".to_string(),
    quantity: 5,
    image_url: format!("https://img.example/{}.png", id),
    status: "Active".to_string(),
  }
}

// --- Fake remotes ---

/// Returns whatever it currently holds; can be flipped into failing.
#[derive(Default)]
pub struct StaticRemote {
  products: Mutex<Vec<RemoteProduct>>,
  failing: AtomicBool,
  calls: AtomicUsize,
}

impl StaticRemote {
  pub fn with(products: Vec<RemoteProduct>) -> Arc<Self> {
    let remote = Self::default();
    *remote.products.lock() = products;
    Arc::new(remote)
  }

  pub fn failing() -> Arc<Self> {
    let remote = Self::default();
    remote.failing.store(true, Ordering::SeqCst);
    Arc::new(remote)
  }

  pub fn set_products(&self, products: Vec<RemoteProduct>) {
    *self.products.lock() = products;
  }

  pub fn set_failing(&self, failing: bool) {
    self.failing.store(failing, Ordering::SeqCst);
  }

  pub fn calls(&self) -> usize {
    self.calls.load(Ordering::SeqCst)
  }
}

#[async_trait]
impl ProductRemote for StaticRemote {
  async fn fetch_products(&self) -> ShopResult<Vec<RemoteProduct>> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    if self.failing.load(Ordering::SeqCst) {
      return Err(ShopError::network(anyhow::anyhow!("HTTP 503 from test remote")));
    }
    Ok(self.products.lock().clone())
  }
}

/// Holds every fetch until `open()` is called, and records fetches that were
/// dropped before finishing.
#[derive(Default)]
pub struct GateRemote {
  products: Mutex<Vec<RemoteProduct>>,
  gate: Notify,
  started: AtomicUsize,
  cancelled: Arc<AtomicBool>,
}

struct InFlight {
  cancelled: Arc<AtomicBool>,
  finished: bool,
}

impl Drop for InFlight {
  fn drop(&mut self) {
    if !self.finished {
      self.cancelled.store(true, Ordering::SeqCst);
    }
  }
}

impl GateRemote {
  pub fn with(products: Vec<RemoteProduct>) -> Arc<Self> {
    let remote = Self::default();
    *remote.products.lock() = products;
    Arc::new(remote)
  }

  pub fn open(&self) {
    self.gate.notify_waiters();
  }

  pub fn started(&self) -> usize {
    self.started.load(Ordering::SeqCst)
  }

  pub fn was_cancelled(&self) -> bool {
    self.cancelled.load(Ordering::SeqCst)
  }
}

#[async_trait]
impl ProductRemote for GateRemote {
  async fn fetch_products(&self) -> ShopResult<Vec<RemoteProduct>> {
    let mut in_flight = InFlight {
      cancelled: self.cancelled.clone(),
      finished: false,
    };
    let opened = self.gate.notified();
    self.started.fetch_add(1, Ordering::SeqCst);
    opened.await;
    in_flight.finished = true;
    Ok(self.products.lock().clone())
  }
}

// --- Async helpers ---

/// Pulls items until one matches, failing the test on timeout or stream end.
pub async fn next_matching<S, T, F>(stream: &mut S, mut pred: F) -> T
where
  S: Stream<Item = T> + Unpin,
  F: FnMut(&T) -> bool,
{
  let found = tokio::time::timeout(WAIT, async {
    while let Some(item) = stream.next().await {
      if pred(&item) {
        return Some(item);
      }
    }
    None
  })
  .await
  .expect("timed out waiting for a matching stream item");
  found.expect("stream ended before a matching item")
}

pub async fn within<F: Future>(future: F) -> F::Output {
  tokio::time::timeout(WAIT, future).await.expect("timed out")
}

/// Polls `check` until it holds or the wait runs out.
pub async fn eventually<F>(mut check: F)
where
  F: FnMut() -> bool,
{
  within(async {
    while !check() {
      tokio::time::sleep(Duration::from_millis(5)).await;
    }
  })
  .await
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
