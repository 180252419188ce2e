// demos/shop_app/src/web/handlers/product_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Serialize;
use serde_json::json;
use shopsync::{Product, ProductDetailState, ProductListState};
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::state::AppState;

// --- Response DTOs ---
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
  pub server_id: i64,
  pub name: String,
  pub description: String,
  pub price: i64,
  pub price_text: String,
  pub currency_symbol: String,
  pub quantity: i64,
  pub image_url: String,
  pub status: String,
}

impl From<Product> for ProductResponse {
  fn from(product: Product) -> Self {
    Self {
      price_text: product.price_text(),
      server_id: product.server_id,
      name: product.name,
      description: product.description,
      price: product.price,
      currency_symbol: product.currency_symbol,
      quantity: product.quantity,
      image_url: product.image_url,
      status: product.status,
    }
  }
}

fn list_body(state: ProductListState) -> serde_json::Value {
  let show_error = state.show_error();
  let products: Vec<ProductResponse> = state.product_list.into_iter().map(ProductResponse::from).collect();
  json!({
      "loading": state.loading,
      "error": state.error,
      "showError": show_error,
      "products": products
  })
}

fn detail_body(state: ProductDetailState) -> serde_json::Value {
  json!({
      "count": state.count,
      "canBeIncreased": state.can_be_increased(),
      "canBeDecreased": state.can_be_decreased(),
      "product": state.product.map(ProductResponse::from)
  })
}

#[instrument(name = "handler::list_products", skip(app_state))]
pub async fn list_products_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let state = app_state.view_model.product_list().borrow().clone();
  info!(products = state.product_list.len(), loading = state.loading, "Serving product list.");
  Ok(HttpResponse::Ok().json(list_body(state)))
}

/// Resubscribes to the catalog and waits, up to the HTTP timeout, for the first
/// result. A still-loading state is returned as-is when the wait runs out.
#[instrument(name = "handler::refresh_products", skip(app_state))]
pub async fn refresh_products_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  app_state.view_model.load_products();

  let mut list = app_state.view_model.product_list();
  let settled = match tokio::time::timeout(app_state.config.http_timeout, list.wait_for(|state| !state.loading)).await {
    Ok(Ok(state)) => Some(state.clone()),
    Ok(Err(_)) => return Err(AppError::Internal("Product list state closed.".to_string())),
    Err(_) => None,
  };
  let state = match settled {
    Some(state) => state,
    None => {
      warn!("Product refresh still loading after timeout.");
      list.borrow().clone()
    }
  };
  Ok(HttpResponse::Ok().json(list_body(state)))
}

#[instrument(name = "handler::get_product", skip(app_state, path), fields(product_id = %path.as_ref()))]
pub async fn get_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();
  let detail = app_state.view_model.select_product(product_id).await?;

  if detail.product.is_none() {
    warn!("Product {} is not cached.", product_id);
    return Err(AppError::NotFound(format!("Product with ID {} not found.", product_id)));
  }
  Ok(HttpResponse::Ok().json(detail_body(detail)))
}
