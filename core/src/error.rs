// shopsync/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShopError {
    /// The remote fetch could not complete, returned a non-2xx status, or sent a body
    /// that does not decode into product records.
    #[error("Network failure while fetching products. Source: {source}")]
    Network {
        #[source]
        source: AnyhowError,
    },

    #[error("Product not found in local cache: {product_id}")]
    NotFound { product_id: i64 },

    /// Underlying table I/O. Passed through unwrapped; the in-flight operation is lost.
    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("Subscription channel closed before an item was delivered")]
    SubscriptionClosed,
}

impl ShopError {
    pub fn network<E>(err: E) -> Self
    where
        E: Into<AnyhowError>,
    {
        ShopError::Network { source: err.into() }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, ShopError::Network { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ShopError::NotFound { .. })
    }
}

// Anything the remote layer raises through anyhow is a fetch failure.
impl From<AnyhowError> for ShopError {
    fn from(err: AnyhowError) -> Self {
        ShopError::Network { source: err }
    }
}

impl From<reqwest::Error> for ShopError {
    fn from(err: reqwest::Error) -> Self {
        ShopError::Network { source: err.into() }
    }
}

pub type ShopResult<T, E = ShopError> = std::result::Result<T, E>;
