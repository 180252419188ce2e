// shopsync/src/remote/mod.rs

//! The remote catalog source.

pub mod http;

use crate::error::ShopResult;
use crate::model::RemoteProduct;

use async_trait::async_trait;

pub use http::{HttpProductRemote, RemoteSettings, PRODUCT_BUNDLES_PATH};

/// Fetches the full product list. No pagination; one call returns everything.
#[async_trait]
pub trait ProductRemote: Send + Sync {
  async fn fetch_products(&self) -> ShopResult<Vec<RemoteProduct>>;
}
