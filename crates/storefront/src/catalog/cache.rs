//! Cache types for catalog responses.

use rocket_shoes_core::ProductId;

use crate::cart::Product;

/// Cache key for catalog lookups.
///
/// Only product details are cached; stock must be read live for every check.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Product(ProductId),
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Product(Box<Product>),
}
