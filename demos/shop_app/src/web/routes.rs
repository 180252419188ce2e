// demos/shop_app/src/web/routes.rs

use actix_web::web;

use crate::web::handlers::{cart_handlers, product_handlers};

async fn health_check_handler() -> actix_web::HttpResponse {
  actix_web::HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

// This function will be called in `main.rs` to configure services for the Actix App.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.service(
    web::scope("/api/v1") // Base path for API version 1
      .route("/health", web::get().to(health_check_handler))
      .service(
        web::scope("/products")
          .route("", web::get().to(product_handlers::list_products_handler))
          .route("/refresh", web::post().to(product_handlers::refresh_products_handler))
          .route("/{product_id}", web::get().to(product_handlers::get_product_handler)),
      )
      .service(
        web::scope("/cart")
          .route("", web::get().to(cart_handlers::get_cart_handler))
          .route("/{product_id}/add", web::post().to(cart_handlers::add_to_cart_handler))
          .route("/{product_id}/remove", web::post().to(cart_handlers::remove_from_cart_handler)),
      ),
  );
}
