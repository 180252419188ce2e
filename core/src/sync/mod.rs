// shopsync/src/sync/mod.rs

//! Local-first catalog synchronization.

pub mod product_sync;
pub mod stream;

pub use product_sync::ProductSynchronizer;
pub use stream::ProductStream;
