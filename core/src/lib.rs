// src/lib.rs

//! shopsync: a local-first data layer for a product catalog and shopping cart.
//!
//! The catalog comes from a REST endpoint and is cached in a local table; readers
//! only ever see the cache. The pieces are:
//!  - `sync::ProductSynchronizer`, which merges a live query on the product cache
//!    with one remote fetch per subscription and upserts the fetched records.
//!  - `cart::CartManager`, which keeps cart counts at one or more per stored row
//!    and serializes read-then-write per product.
//!  - `store` tables behind `ProductStore` / `CartStore`, with SQLite and
//!    in-memory implementations that re-emit on every committed write.
//!  - `remote::ProductRemote`, with an HTTP implementation for `GET /productBundles`.
//!  - `presentation::ShopViewModel`, the state holder a UI binds to.

pub mod cart;
pub mod context;
pub mod error;
pub mod model;
pub mod presentation;
pub mod remote;
pub mod store;
pub mod sync;
pub mod task;

// --- Re-exports for the Public API ---

pub use crate::cart::CartManager;
pub use crate::context::ShopContext;
pub use crate::error::{ShopError, ShopResult};
pub use crate::model::{CartEntry, CartRow, NewProductRow, Product, ProductRow, RemoteProduct};
pub use crate::presentation::{ProductDetailState, ProductListState, ShopViewModel};
pub use crate::remote::{HttpProductRemote, ProductRemote, RemoteSettings};
pub use crate::store::{CartStore, MemoryStore, ProductStore, SqliteStore};
pub use crate::sync::{ProductStream, ProductSynchronizer};

/*
    Typical wiring:
    1. Build a `ShopContext` once, e.g. `ShopContext::sqlite(url, Arc::new(HttpProductRemote::new(&settings)?))`.
    2. Hand `&ctx` to `ShopViewModel::new` (or to `ProductSynchronizer::new` / `CartManager::new` directly).
    3. Watch `product_list()`, `selected_product()` and `cart_size()`; drive `select_product`,
       `add_to_cart`, `remove_from_cart` and `load_products` from user input.
*/
