// shopsync/src/model/mod.rs

//! Domain, persisted, and wire shapes for products and cart entries.

pub mod cart;
pub mod product;

pub use cart::{CartEntry, CartRow};
pub use product::{NewProductRow, Product, ProductRow, RemoteProduct};
