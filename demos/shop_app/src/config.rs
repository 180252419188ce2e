// demos/shop_app/src/config.rs

use crate::errors::{AppError, Result}; // Use AppError specific Result
use dotenvy::dotenv;
use shopsync::RemoteSettings;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ShopConfig {
  pub server_host: String,
  pub server_port: u16,
  pub database_url: String,
  pub product_api_base_url: String,
  pub http_timeout: Duration,

  // Subscribe to the catalog as soon as the server starts.
  pub auto_load_products: bool,
}

impl ShopConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present

    let get_env = |var_name: &str| {
      env::var(var_name).map_err(|e| AppError::Config(format!("Missing environment variable '{}': {}", var_name, e)))
    };

    let server_host = get_env("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let server_port = get_env("SERVER_PORT")
      .unwrap_or_else(|_| "8080".to_string())
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?;
    let database_url = get_env("DATABASE_URL").unwrap_or_else(|_| "sqlite://shop_app_database.db".to_string());
    let product_api_base_url = get_env("PRODUCT_API_BASE_URL")?;

    let http_timeout_secs = get_env("HTTP_TIMEOUT_SECS")
      .unwrap_or_else(|_| "30".to_string())
      .parse::<u64>()
      .map_err(|e| AppError::Config(format!("Invalid HTTP_TIMEOUT_SECS: {}", e)))?;
    if http_timeout_secs == 0 {
      return Err(AppError::Config("HTTP_TIMEOUT_SECS must be at least 1".to_string()));
    }

    let auto_load_products = get_env("AUTO_LOAD_PRODUCTS")
      .unwrap_or_else(|_| "true".to_string())
      .parse::<bool>()
      .map_err(|e| AppError::Config(format!("Invalid AUTO_LOAD_PRODUCTS value: {}", e)))?;

    tracing::info!("Application configuration loaded successfully.");

    Ok(Self {
      server_host,
      server_port,
      database_url,
      product_api_base_url,
      http_timeout: Duration::from_secs(http_timeout_secs),
      auto_load_products,
    })
  }

  pub fn remote_settings(&self) -> RemoteSettings {
    RemoteSettings::new(self.product_api_base_url.clone()).with_timeout(self.http_timeout)
  }

  pub fn server_address(&self) -> String {
    format!("{}:{}", self.server_host, self.server_port)
  }
}
