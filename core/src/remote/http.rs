// shopsync/src/remote/http.rs

use crate::error::ShopResult;
use crate::model::RemoteProduct;
use crate::remote::ProductRemote;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use std::time::Duration;
use tracing::{debug, instrument};

pub const PRODUCT_BUNDLES_PATH: &str = "productBundles";

#[derive(Debug, Clone)]
pub struct RemoteSettings {
  pub base_url: String,
  pub timeout: Duration,
}

impl RemoteSettings {
  pub fn new(base_url: impl Into<String>) -> Self {
    Self {
      base_url: base_url.into(),
      timeout: Duration::from_secs(30),
    }
  }

  pub fn with_timeout(mut self, timeout: Duration) -> Self {
    self.timeout = timeout;
    self
  }
}

/// `GET {base_url}/productBundles` over reqwest.
///
/// A transport error, a non-2xx status, or a body that is not a JSON array of
/// product records all surface as [`ShopError::Network`](crate::error::ShopError::Network).
/// Nothing is retried here.
#[derive(Debug, Clone)]
pub struct HttpProductRemote {
  http: HttpClient,
  endpoint: String,
}

impl HttpProductRemote {
  pub fn new(settings: &RemoteSettings) -> ShopResult<Self> {
    let http = HttpClient::builder().timeout(settings.timeout).build()?;
    Ok(Self {
      http,
      endpoint: format!("{}/{}", settings.base_url.trim_end_matches('/'), PRODUCT_BUNDLES_PATH),
    })
  }

  pub fn endpoint(&self) -> &str {
    &self.endpoint
  }
}

#[async_trait]
impl ProductRemote for HttpProductRemote {
  #[instrument(name = "HttpProductRemote::fetch_products", skip(self), fields(endpoint = %self.endpoint), err(Display))]
  async fn fetch_products(&self) -> ShopResult<Vec<RemoteProduct>> {
    let response = self.http.get(&self.endpoint).send().await?.error_for_status()?;
    let records = response.json::<Vec<RemoteProduct>>().await?;
    debug!(count = records.len(), "Fetched product bundles.");
    Ok(records)
  }
}
