//! Cart operation errors.
//!
//! Every failure maps onto exactly one [`CartNotice`], which the store hands
//! to its notifier before returning the error. None of them is fatal: the
//! cart is left exactly as it was.

use rocket_shoes_core::ProductId;
use thiserror::Error;

use crate::cart::CartNotice;
use crate::catalog::CatalogError;

/// Why a cart operation did not commit.
#[derive(Debug, Error)]
pub enum CartError {
    /// The requested quantity is above the product's stock.
    #[error("Requested {requested} of product {product_id}, only {available} in stock")]
    StockExceeded {
        product_id: ProductId,
        requested: i64,
        available: i64,
    },

    /// The product has no entry in the cart.
    #[error("Product {0} is not in the cart")]
    NotInCart(ProductId),

    /// Catalog lookup failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

impl CartError {
    /// Notice to show the shopper. Stock problems always get their own
    /// message; everything else gets the operation's generic failure.
    #[must_use]
    pub const fn notice(&self, operation_failed: CartNotice) -> CartNotice {
        match self {
            Self::StockExceeded { .. } => CartNotice::StockExceeded,
            Self::NotInCart(_) | Self::Catalog(_) => operation_failed,
        }
    }
}

/// Result type alias for `CartError`.
pub type Result<T> = std::result::Result<T, CartError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_error_display() {
        let err = CartError::StockExceeded {
            product_id: ProductId::new(7),
            requested: 1,
            available: 0,
        };
        assert_eq!(
            err.to_string(),
            "Requested 1 of product 7, only 0 in stock"
        );

        let err = CartError::NotInCart(ProductId::new(3));
        assert_eq!(err.to_string(), "Product 3 is not in the cart");
    }

    #[test]
    fn test_notice_mapping() {
        let stock = CartError::StockExceeded {
            product_id: ProductId::new(1),
            requested: 2,
            available: 1,
        };
        assert_eq!(
            stock.notice(CartNotice::UpdateFailed),
            CartNotice::StockExceeded
        );

        let missing = CartError::NotInCart(ProductId::new(1));
        assert_eq!(
            missing.notice(CartNotice::RemoveFailed),
            CartNotice::RemoveFailed
        );

        let lookup = CartError::Catalog(CatalogError::NotFound("stock/1".to_string()));
        assert_eq!(lookup.notice(CartNotice::AddFailed), CartNotice::AddFailed);
    }
}
