//! Product catalog port and its HTTP implementation.
//!
//! # Architecture
//!
//! - The catalog is the source of truth for product details and stock
//! - Stock is always read live; product details are cached via `moka`
//! - [`ProductCatalog`] is the seam the cart store depends on, so tests can
//!   substitute an in-memory catalog
//!
//! # Example
//!
//! ```rust,ignore
//! use rocket_shoes_storefront::catalog::{HttpCatalog, ProductCatalog};
//!
//! let catalog = HttpCatalog::new(&config.catalog)?;
//! let stock = catalog.stock(ProductId::new(1)).await?;
//! ```

mod cache;
mod http;

pub use http::HttpCatalog;

use async_trait::async_trait;
use rocket_shoes_core::ProductId;
use thiserror::Error;

use crate::cart::{Product, StockRecord};

/// Errors that can occur when querying the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("Unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    /// Endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the API.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Any other backend failure (used by non-HTTP catalogs).
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),
}

/// Remote lookup of product details and stock levels.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Current stock for a product.
    async fn stock(&self, id: ProductId) -> Result<StockRecord, CatalogError>;

    /// Full product details.
    async fn product(&self, id: ProductId) -> Result<Product, CatalogError>;
}
