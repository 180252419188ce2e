// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use async_trait::async_trait;
use shop_app::config::ShopConfig;
use shop_app::state::AppState;
use shopsync::{ProductRemote, RemoteProduct, ShopContext, ShopError, ShopResult, ShopViewModel};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub fn remote_product(id: i64, name: &str, quantity: i64) -> RemoteProduct {
  RemoteProduct {
    id,
    name: name.to_string(),
    description: format!("{} description", name),
    price: 10 * id,
    currency_code: "USD".to_string(),
    currency_symbol: "$".to_string(),
    quantity,
    image_url: format!("https://img.example/{}.png", id),
    status: "Active".to_string(),
  }
}

#[derive(Default)]
pub struct FakeRemote {
  products: Mutex<Vec<RemoteProduct>>,
  failing: AtomicBool,
}

impl FakeRemote {
  pub fn with(products: Vec<RemoteProduct>) -> Arc<Self> {
    let remote = Self::default();
    *remote.products.lock().unwrap() = products;
    Arc::new(remote)
  }

  pub fn set_failing(&self, failing: bool) {
    self.failing.store(failing, Ordering::SeqCst);
  }
}

#[async_trait]
impl ProductRemote for FakeRemote {
  async fn fetch_products(&self) -> ShopResult<Vec<RemoteProduct>> {
    if self.failing.load(Ordering::SeqCst) {
      return Err(ShopError::network(anyhow::anyhow!("HTTP 500 from fake remote")));
    }
    Ok(self.products.lock().unwrap().clone())
  }
}

pub fn test_config() -> ShopConfig {
  ShopConfig {
    server_host: "127.0.0.1".to_string(),
    server_port: 0,
    database_url: "sqlite::memory:".to_string(),
    product_api_base_url: "http://127.0.0.1:1".to_string(),
    http_timeout: Duration::from_secs(2),
    auto_load_products: false,
  }
}

/// App state over an in-memory cache with the view model not yet loading.
pub fn deferred_state(remote: Arc<FakeRemote>) -> AppState {
  let (ctx, _) = ShopContext::in_memory(remote);
  AppState {
    view_model: Arc::new(ShopViewModel::deferred(&ctx)),
    config: Arc::new(test_config()),
  }
}

/// Same as [`deferred_state`] but over an in-memory SQLite cache.
pub async fn sqlite_state(remote: Arc<FakeRemote>) -> AppState {
  let ctx = ShopContext::sqlite("sqlite::memory:", remote).await.unwrap();
  AppState {
    view_model: Arc::new(ShopViewModel::deferred(&ctx)),
    config: Arc::new(test_config()),
  }
}
