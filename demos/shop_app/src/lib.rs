// demos/shop_app/src/lib.rs

//! HTTP front end over the shopsync view model: the product list, the selected
//! product and the cart served as JSON, with the cart intents as POST routes.

pub mod config;
pub mod errors;
pub mod state;
pub mod web;
