// shopsync/src/cart/mod.rs

//! Cart quantity rules over the persisted cart table.

pub mod keyed_lock;
pub mod manager;

pub use manager::CartManager;
