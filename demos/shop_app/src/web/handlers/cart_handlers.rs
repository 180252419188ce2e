// demos/shop_app/src/web/handlers/cart_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::state::AppState;

#[instrument(name = "handler::get_cart", skip(app_state))]
pub async fn get_cart_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let entries = app_state.view_model.cart().entries().await?;
  let cart_size: i64 = entries.iter().map(|entry| entry.count).sum();
  Ok(HttpResponse::Ok().json(json!({
      "entries": entries,
      "cartSize": cart_size
  })))
}

#[instrument(name = "handler::add_to_cart", skip(app_state, path), fields(product_id = %path.as_ref()))]
pub async fn add_to_cart_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();
  // Unknown ids surface as NotFound, which maps to 404.
  let product = app_state.view_model.synchronizer().fetch_single(product_id).await?;

  let cart = app_state.view_model.cart();
  let Some(count) = cart.add_item_up_to(product_id, product.quantity).await? else {
    return Err(AppError::Validation(format!(
      "Product {} has no more stock to add (available: {}).",
      product_id, product.quantity
    )));
  };
  let cart_size = cart.cart_size().await?;
  info!(count, cart_size, "Item added to cart.");

  Ok(HttpResponse::Ok().json(json!({
      "productId": product_id,
      "count": count,
      "cartSize": cart_size
  })))
}

#[instrument(name = "handler::remove_from_cart", skip(app_state, path), fields(product_id = %path.as_ref()))]
pub async fn remove_from_cart_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();

  // Removing something that is not in the cart is a no-op with count 0.
  let cart = app_state.view_model.cart();
  let count = cart.remove_item(product_id).await?;
  let cart_size = cart.cart_size().await?;
  info!(count, cart_size, "Item removed from cart.");

  Ok(HttpResponse::Ok().json(json!({
      "productId": product_id,
      "count": count,
      "cartSize": cart_size
  })))
}
