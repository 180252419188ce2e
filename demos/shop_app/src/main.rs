// demos/shop_app/src/main.rs

use shop_app::config::ShopConfig;
use shop_app::state::AppState;
use shop_app::web::configure_app_routes;

use actix_web::{web as actix_data, App, HttpServer}; // Renamed web to actix_data
use shopsync::{HttpProductRemote, ShopContext, ShopViewModel};
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan; // For span events in tracing

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  // Initialize tracing subscriber for logging
  tracing_subscriber::fmt()
    .with_max_level(Level::INFO) // Default level
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env()) // Allow RUST_LOG override
    .with_span_events(FmtSpan::CLOSE) // Log when spans close, showing duration
    .init();

  tracing::info!("Starting shop application server...");

  let app_config = match ShopConfig::from_env() {
    Ok(cfg) => Arc::new(cfg),
    Err(e) => {
      tracing::error!(error = %e, "Failed to load application configuration.");
      return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
    }
  };

  let remote = match HttpProductRemote::new(&app_config.remote_settings()) {
    Ok(remote) => Arc::new(remote),
    Err(e) => {
      tracing::error!(error = %e, "Failed to build the product API client.");
      return Err(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()));
    }
  };
  tracing::info!(endpoint = remote.endpoint(), "Product API client ready.");

  let ctx = match ShopContext::sqlite(&app_config.database_url, remote).await {
    Ok(ctx) => {
      tracing::info!("Successfully opened the product cache.");
      ctx
    }
    Err(e) => {
      tracing::error!(error = %e, "Failed to open the product cache database.");
      return Err(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()));
    }
  };

  let view_model = if app_config.auto_load_products {
    ShopViewModel::new(&ctx)
  } else {
    tracing::info!("AUTO_LOAD_PRODUCTS is off; waiting for POST /api/v1/products/refresh.");
    ShopViewModel::deferred(&ctx)
  };

  let app_state = AppState {
    view_model: Arc::new(view_model),
    config: app_config.clone(),
  };

  let server_address = app_config.server_address();
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone())) // Share AppState with handlers
      .wrap(tracing_actix_web::TracingLogger::default()) // Actix middleware for tracing requests
      .configure(configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await
}
