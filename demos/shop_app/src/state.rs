// demos/shop_app/src/state.rs
use crate::config::ShopConfig;
use shopsync::ShopViewModel;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub view_model: Arc<ShopViewModel>,
  pub config: Arc<ShopConfig>, // Share loaded config
}
