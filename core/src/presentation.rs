// shopsync/src/presentation.rs

//! The UI-facing state holder.
//!
//! [`ShopViewModel`] subscribes to the synchronizer and the cart manager, projects
//! their output into three watchable states (product list, selected product, cart
//! size), and turns user intents back into calls on those two components.

use crate::cart::CartManager;
use crate::context::ShopContext;
use crate::error::{ShopError, ShopResult};
use crate::model::Product;
use crate::sync::ProductSynchronizer;
use crate::task::TaskGuard;

use futures_util::StreamExt;
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, warn};

/// Message shown for any catalog failure.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong.";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProductListState {
  pub loading: bool,
  pub product_list: Vec<Product>,
  pub error: Option<String>,
}

impl ProductListState {
  /// An error only takes over the screen when there is nothing cached to show.
  pub fn show_error(&self) -> bool {
    self.error.is_some() && self.product_list.is_empty()
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProductDetailState {
  pub product: Option<Product>,
  pub count: i64,
}

impl ProductDetailState {
  pub fn can_be_increased(&self) -> bool {
    self.product.as_ref().map_or(false, |product| self.count < product.quantity)
  }

  pub fn can_be_decreased(&self) -> bool {
    self.product.is_some() && self.count > 0
  }
}

struct Surfaces {
  product_list: watch::Sender<ProductListState>,
  selected_product: watch::Sender<ProductDetailState>,
  cart_size: watch::Sender<i64>,
  selected_product_id: Mutex<Option<i64>>,
}

impl Surfaces {
  fn selected_id(&self) -> Option<i64> {
    *self.selected_product_id.lock()
  }

  // Ignores counts for a product that is no longer selected.
  fn apply_count(&self, product_id: i64, count: i64) {
    if self.selected_id() == Some(product_id) {
      self.selected_product.send_modify(|state| state.count = count);
    }
  }

  async fn refresh_selected_count(&self, cart: &CartManager) {
    let Some(product_id) = self.selected_id() else {
      return;
    };
    match cart.get_count(product_id).await {
      Ok(count) => self.apply_count(product_id, count),
      Err(err) => warn!(product_id, error = %err, "Could not read cart count for selected product."),
    }
  }
}

/// Presentation state for the catalog and cart screens.
///
/// Background work lives on the current tokio runtime and is aborted when the view
/// model is dropped.
pub struct ShopViewModel {
  synchronizer: ProductSynchronizer,
  cart: CartManager,
  surfaces: Arc<Surfaces>,
  product_task: Mutex<Option<TaskGuard>>,
  _cart_task: TaskGuard,
}

impl ShopViewModel {
  /// Builds the view model and immediately starts loading products.
  pub fn new(ctx: &ShopContext) -> Self {
    let view_model = Self::deferred(ctx);
    view_model.load_products();
    view_model
  }

  /// Builds the view model without subscribing to products; call
  /// [`load_products`](Self::load_products) to start.
  pub fn deferred(ctx: &ShopContext) -> Self {
    let synchronizer = ProductSynchronizer::new(ctx);
    let cart = CartManager::new(ctx);
    let surfaces = Arc::new(Surfaces {
      product_list: watch::Sender::new(ProductListState::default()),
      selected_product: watch::Sender::new(ProductDetailState::default()),
      cart_size: watch::Sender::new(0),
      selected_product_id: Mutex::new(None),
    });
    let cart_task = Self::watch_cart(cart.clone(), surfaces.clone());

    Self {
      synchronizer,
      cart,
      surfaces,
      product_task: Mutex::new(None),
      _cart_task: cart_task,
    }
  }

  fn watch_cart(cart: CartManager, surfaces: Arc<Surfaces>) -> TaskGuard {
    TaskGuard::spawn(async move {
      let mut entries = cart.subscribe_cart_entries();
      while let Some(result) = entries.next().await {
        match result {
          Ok(entries) => {
            let size: i64 = entries.iter().map(|entry| entry.count).sum();
            surfaces.cart_size.send_replace(size);
            surfaces.refresh_selected_count(&cart).await;
          }
          Err(err) => {
            warn!(error = %err, "Cart subscription failed.");
            break;
          }
        }
      }
    })
  }

  pub fn product_list(&self) -> watch::Receiver<ProductListState> {
    self.surfaces.product_list.subscribe()
  }

  pub fn selected_product(&self) -> watch::Receiver<ProductDetailState> {
    self.surfaces.selected_product.subscribe()
  }

  pub fn cart_size(&self) -> watch::Receiver<i64> {
    self.surfaces.cart_size.subscribe()
  }

  pub fn selected_product_id(&self) -> Option<i64> {
    self.surfaces.selected_id()
  }

  pub fn synchronizer(&self) -> &ProductSynchronizer {
    &self.synchronizer
  }

  pub fn cart(&self) -> &CartManager {
    &self.cart
  }

  /// (Re)subscribes to the product list, replacing any earlier subscription. The
  /// previous list stays visible while loading and after a failure.
  pub fn load_products(&self) {
    self.surfaces.product_list.send_modify(|state| {
      state.loading = true;
      state.error = None;
    });

    let mut products = self.synchronizer.subscribe_products();
    let surfaces = self.surfaces.clone();
    let task = TaskGuard::spawn(async move {
      while let Some(result) = products.next().await {
        match result {
          Ok(list) => surfaces.product_list.send_modify(|state| {
            state.loading = false;
            state.product_list = list;
          }),
          Err(err) => {
            warn!(error = %err, "Product subscription failed.");
            surfaces.product_list.send_modify(|state| {
              state.loading = false;
              state.error = Some(GENERIC_ERROR_MESSAGE.to_string());
            });
            break;
          }
        }
      }
    });

    // Dropping the old guard cancels the old subscription.
    *self.product_task.lock() = Some(task);
  }

  /// Selects a product for the detail view and loads it from the cache with its
  /// cart count. A product missing from the cache leaves `product` empty.
  pub async fn select_product(&self, product_id: i64) -> ShopResult<ProductDetailState> {
    *self.surfaces.selected_product_id.lock() = Some(product_id);

    let product = match self.synchronizer.fetch_single(product_id).await {
      Ok(product) => Some(product),
      Err(ShopError::NotFound { .. }) => {
        debug!(product_id, "Selected product is not cached.");
        None
      }
      Err(err) => return Err(err),
    };
    let count = self.cart.get_count(product_id).await?;

    if self.surfaces.selected_id() == Some(product_id) {
      self.surfaces.selected_product.send_replace(ProductDetailState { product, count });
    }
    Ok(self.surfaces.selected_product.borrow().clone())
  }

  /// Adds one unit of the selected product. `None` when nothing is selected.
  pub async fn add_to_cart(&self) -> ShopResult<Option<i64>> {
    let Some(product_id) = self.surfaces.selected_id() else {
      return Ok(None);
    };
    let count = self.cart.add_item(product_id).await?;
    self.surfaces.apply_count(product_id, count);
    Ok(Some(count))
  }

  /// Removes one unit of the selected product. `None` when nothing is selected.
  pub async fn remove_from_cart(&self) -> ShopResult<Option<i64>> {
    let Some(product_id) = self.surfaces.selected_id() else {
      return Ok(None);
    };
    let count = self.cart.remove_item(product_id).await?;
    self.surfaces.apply_count(product_id, count);
    Ok(Some(count))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn product(quantity: i64) -> Product {
    Product {
      server_id: 1,
      image_url: String::new(),
      name: "Tea".to_string(),
      description: String::new(),
      price: 3,
      currency_symbol: "$".to_string(),
      quantity,
      status: "Active".to_string(),
    }
  }

  #[test]
  fn detail_bounds_follow_stock() {
    let mut state = ProductDetailState {
      product: Some(product(2)),
      count: 0,
    };
    assert!(state.can_be_increased());
    assert!(!state.can_be_decreased());

    state.count = 2;
    assert!(!state.can_be_increased());
    assert!(state.can_be_decreased());

    let empty = ProductDetailState::default();
    assert!(!empty.can_be_increased());
    assert!(!empty.can_be_decreased());
  }

  #[test]
  fn error_shown_only_without_products() {
    let mut state = ProductListState {
      error: Some(GENERIC_ERROR_MESSAGE.to_string()),
      ..Default::default()
    };
    assert!(state.show_error());
    state.product_list.push(product(1));
    assert!(!state.show_error());
  }
}
