//! Cart domain types.
//!
//! The persisted shape matches what the storefront API serves for a product,
//! with the selected quantity flattened alongside it:
//!
//! ```json
//! [{"id": 1, "title": "Tênis de Caminhada", "price": 179.9, "image": "https://...", "amount": 2}]
//! ```

use std::collections::{BTreeMap, HashSet};

use rocket_shoes_core::{CurrencyCode, Price, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// Catalog Records
// =============================================================================

/// Product details as served by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    /// Unit price in the store currency, a bare JSON number on the wire.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Image URL.
    pub image: String,
}

/// Stock level for a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRecord {
    pub id: ProductId,
    /// Units available. Negative when the product is oversold.
    pub amount: i64,
}

// =============================================================================
// Cart Entry
// =============================================================================

/// A product in the cart with the quantity selected by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartEntry {
    #[serde(flatten)]
    pub product: Product,
    /// Selected quantity, always at least 1.
    pub amount: u32,
}

impl CartEntry {
    /// Create an entry for a product freshly added to the cart.
    #[must_use]
    pub const fn new(product: Product) -> Self {
        Self { product, amount: 1 }
    }

    #[must_use]
    pub const fn id(&self) -> ProductId {
        self.product.id
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self, currency: CurrencyCode) -> Price {
        Price::new(self.product.price, currency) * self.amount
    }
}

// =============================================================================
// Cart
// =============================================================================

/// A persisted cart violated one of its invariants.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidCart {
    #[error("Duplicate entry for product {0}")]
    DuplicateEntry(ProductId),
    #[error("Entry for product {0} has zero amount")]
    ZeroAmount(ProductId),
}

/// Ordered cart contents.
///
/// Entries keep insertion order and there is at most one entry per product.
/// Deserialization enforces both invariants, so a cart read back from storage
/// is as trustworthy as one built through [`crate::cart::CartStore`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CartEntry>", into = "Vec<CartEntry>")]
pub struct Cart {
    entries: Vec<CartEntry>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    #[must_use]
    pub fn iter(&self) -> std::slice::Iter<'_, CartEntry> {
        self.entries.iter()
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up the entry for a product.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&CartEntry> {
        self.entries.iter().find(|entry| entry.id() == id)
    }

    /// Index of the entry for a product.
    #[must_use]
    pub fn position(&self, id: ProductId) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id() == id)
    }

    /// Selected quantity of a product, 0 when absent.
    #[must_use]
    pub fn amount_of(&self, id: ProductId) -> u32 {
        self.get(id).map_or(0, |entry| entry.amount)
    }

    /// Sum of all selected quantities.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.entries.iter().map(|entry| u64::from(entry.amount)).sum()
    }

    /// Quantity per product, for badge and listing lookups.
    #[must_use]
    pub fn amounts(&self) -> BTreeMap<ProductId, u32> {
        self.entries
            .iter()
            .map(|entry| (entry.id(), entry.amount))
            .collect()
    }

    /// Sum of line totals.
    #[must_use]
    pub fn subtotal(&self, currency: CurrencyCode) -> Price {
        self.entries
            .iter()
            .fold(Price::zero(currency), |acc, entry| {
                acc + entry.line_total(currency)
            })
    }

    // Mutators stay crate-private: the store is the only writer.

    pub(crate) fn push(&mut self, entry: CartEntry) {
        debug_assert!(self.get(entry.id()).is_none());
        self.entries.push(entry);
    }

    /// Set the amount of an existing entry. Returns `false` if absent.
    pub(crate) fn set_amount(&mut self, id: ProductId, amount: u32) -> bool {
        debug_assert!(amount >= 1);
        match self.entries.iter_mut().find(|entry| entry.id() == id) {
            Some(entry) => {
                entry.amount = amount;
                true
            }
            None => false,
        }
    }

    /// Remove the entry for a product. Returns the removed entry if present.
    pub(crate) fn remove(&mut self, id: ProductId) -> Option<CartEntry> {
        self.position(id).map(|index| self.entries.remove(index))
    }
}

impl TryFrom<Vec<CartEntry>> for Cart {
    type Error = InvalidCart;

    fn try_from(entries: Vec<CartEntry>) -> Result<Self, Self::Error> {
        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if entry.amount == 0 {
                return Err(InvalidCart::ZeroAmount(entry.id()));
            }
            if !seen.insert(entry.id()) {
                return Err(InvalidCart::DuplicateEntry(entry.id()));
            }
        }
        Ok(Self { entries })
    }
}

impl From<Cart> for Vec<CartEntry> {
    fn from(cart: Cart) -> Self {
        cart.entries
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartEntry;
    type IntoIter = std::slice::Iter<'a, CartEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
