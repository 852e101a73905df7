//! The cart store: add, remove and update operations over a persisted cart.
//!
//! Every operation copies the current cart, applies its change to the copy,
//! and then commits the copy by swapping the store's `Arc<Cart>`. Readers
//! holding an older snapshot keep seeing it unchanged, and a failed operation
//! never leaves a half-applied list behind.
//!
//! Mutations are serialized through a single writer lock held for the whole
//! operation, including its catalog lookups, so two adds of the same product
//! in flight at once both count.

use std::sync::{Arc, Mutex, PoisonError, RwLock};

use rocket_shoes_core::ProductId;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use super::model::{Cart, CartEntry};
use super::notice::{CartNotice, Notifier};
use crate::catalog::{CatalogError, ProductCatalog};
use crate::error::{CartError, Result};
use crate::storage::CartStorage;

/// Storage key the cart is persisted under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "@RocketShoes:cart";

/// Input for [`CartStore::update_product_amount`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductAmount {
    pub product_id: ProductId,
    /// New quantity. Zero or negative values are ignored.
    pub amount: i64,
}

/// Client-side cart state with stock checks and persistence.
///
/// Cheaply cloneable; clones share the same cart.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<CartStoreInner>,
}

struct CartStoreInner {
    catalog: Arc<dyn ProductCatalog>,
    storage: Arc<dyn CartStorage>,
    notifier: Arc<dyn Notifier>,
    storage_key: String,
    current: RwLock<Arc<Cart>>,
    /// The cart reference last written to storage.
    persisted: Mutex<Option<Arc<Cart>>>,
    writer: tokio::sync::Mutex<()>,
}

impl CartStore {
    /// Create a store, hydrating the cart from `storage`.
    ///
    /// A missing, unreadable or malformed persisted cart starts the store
    /// empty.
    pub fn new(
        catalog: Arc<dyn ProductCatalog>,
        storage: Arc<dyn CartStorage>,
        notifier: Arc<dyn Notifier>,
        storage_key: impl Into<String>,
    ) -> Self {
        let storage_key = storage_key.into();
        let initial = Arc::new(hydrate(storage.as_ref(), &storage_key));
        debug!(
            key = %storage_key,
            entries = initial.len(),
            "Cart hydrated"
        );

        Self {
            inner: Arc::new(CartStoreInner {
                catalog,
                storage,
                notifier,
                storage_key,
                // The hydrated cart already matches storage
                persisted: Mutex::new(Some(Arc::clone(&initial))),
                current: RwLock::new(initial),
                writer: tokio::sync::Mutex::new(()),
            }),
        }
    }

    /// Snapshot of the current cart.
    #[must_use]
    pub fn cart(&self) -> Arc<Cart> {
        Arc::clone(
            &self
                .inner
                .current
                .read()
                .unwrap_or_else(PoisonError::into_inner),
        )
    }

    /// Key the cart is persisted under.
    #[must_use]
    pub fn storage_key(&self) -> &str {
        &self.inner.storage_key
    }

    /// Add one unit of a product.
    ///
    /// Increments the existing entry, or appends a new entry with amount 1
    /// using details fetched from the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::StockExceeded`] when one more unit would exceed
    /// stock, or [`CartError::Catalog`] when a lookup fails. The matching
    /// notice has already been sent and the cart is unchanged.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_product(&self, product_id: ProductId) -> Result<()> {
        let _writer = self.inner.writer.lock().await;

        match self.apply_add(product_id).await {
            Ok(cart) => {
                self.commit(cart);
                Ok(())
            }
            Err(err) => Err(self.report(err, CartNotice::AddFailed)),
        }
    }

    /// Remove a product's entry.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NotInCart`] if the product has no entry. The
    /// removal-failure notice has already been sent.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn remove_product(&self, product_id: ProductId) -> Result<()> {
        let _writer = self.inner.writer.lock().await;

        let mut cart = Cart::clone(&self.cart());
        if cart.remove(product_id).is_none() {
            return Err(self.report(
                CartError::NotInCart(product_id),
                CartNotice::RemoveFailed,
            ));
        }

        self.commit(cart);
        Ok(())
    }

    /// Set a product's quantity.
    ///
    /// Amounts of zero or below are ignored without a notice.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::StockExceeded`] when the amount is above stock,
    /// [`CartError::NotInCart`] when the product has no entry, or
    /// [`CartError::Catalog`] when the stock lookup fails. The matching notice
    /// has already been sent and the cart is unchanged.
    #[instrument(skip(self, update), fields(product_id = %update.product_id, amount = update.amount))]
    pub async fn update_product_amount(&self, update: UpdateProductAmount) -> Result<()> {
        if update.amount <= 0 {
            return Ok(());
        }

        let _writer = self.inner.writer.lock().await;

        match self.apply_update(update).await {
            Ok(cart) => {
                self.commit(cart);
                Ok(())
            }
            Err(err) => Err(self.report(err, CartNotice::UpdateFailed)),
        }
    }

    /// Write the current cart to storage if the last write did not land.
    ///
    /// Commits persist on their own; this only retries after a storage
    /// failure and is a no-op otherwise.
    pub fn flush(&self) {
        self.persist(&self.cart());
    }

    async fn apply_add(&self, product_id: ProductId) -> Result<Cart> {
        let mut cart = Cart::clone(&self.cart());
        let current_amount = cart.amount_of(product_id);

        let stock = self.inner.catalog.stock(product_id).await?;
        let desired = i64::from(current_amount) + 1;
        let next = match current_amount.checked_add(1) {
            Some(next) if desired <= stock.amount => next,
            _ => {
                return Err(CartError::StockExceeded {
                    product_id,
                    requested: desired,
                    available: stock.amount,
                });
            }
        };

        if !cart.set_amount(product_id, next) {
            let product = self.inner.catalog.product(product_id).await?;
            if product.id != product_id {
                return Err(CatalogError::Unavailable(format!(
                    "requested product {product_id}, catalog returned {}",
                    product.id
                ))
                .into());
            }
            cart.push(CartEntry::new(product));
        }

        Ok(cart)
    }

    async fn apply_update(&self, update: UpdateProductAmount) -> Result<Cart> {
        let UpdateProductAmount { product_id, amount } = update;

        let stock = self.inner.catalog.stock(product_id).await?;
        let amount = match u32::try_from(amount) {
            Ok(fits) if amount <= stock.amount => fits,
            _ => {
                return Err(CartError::StockExceeded {
                    product_id,
                    requested: update.amount,
                    available: stock.amount,
                });
            }
        };

        let mut cart = Cart::clone(&self.cart());
        if !cart.set_amount(product_id, amount) {
            return Err(CartError::NotInCart(product_id));
        }

        Ok(cart)
    }

    /// Replace the current cart and persist it.
    fn commit(&self, cart: Cart) {
        let cart = Arc::new(cart);
        *self
            .inner
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Arc::clone(&cart);
        debug!(
            entries = cart.len(),
            total_quantity = cart.total_quantity(),
            "Cart committed"
        );
        self.persist(&cart);
    }

    /// Write `cart` unless it is the very reference last written.
    fn persist(&self, cart: &Arc<Cart>) {
        let mut persisted = self
            .inner
            .persisted
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if persisted
            .as_ref()
            .is_some_and(|previous| Arc::ptr_eq(previous, cart))
        {
            return;
        }

        let serialized = match serde_json::to_string(cart.as_ref()) {
            Ok(serialized) => serialized,
            Err(e) => {
                warn!(error = %e, "Failed to serialize cart");
                return;
            }
        };

        match self.inner.storage.set(&self.inner.storage_key, &serialized) {
            Ok(()) => {
                debug!(key = %self.inner.storage_key, "Cart persisted");
                *persisted = Some(Arc::clone(cart));
            }
            Err(e) => warn!(
                key = %self.inner.storage_key,
                error = %e,
                "Failed to persist cart"
            ),
        }
    }

    /// Send the shopper-facing notice for a failed operation.
    fn report(&self, err: CartError, operation_failed: CartNotice) -> CartError {
        let notice = err.notice(operation_failed);
        match &err {
            CartError::Catalog(e) => warn!(error = %e, ?notice, "Catalog lookup failed"),
            other => debug!(error = %other, ?notice, "Cart operation rejected"),
        }
        self.inner.notifier.error(notice);
        err
    }
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("storage_key", &self.inner.storage_key)
            .field("cart", &self.cart())
            .finish_non_exhaustive()
    }
}

/// Read the persisted cart, falling back to empty.
fn hydrate(storage: &dyn CartStorage, key: &str) -> Cart {
    match storage.get(key) {
        Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(key, error = %e, "Persisted cart is malformed, starting empty");
            Cart::new()
        }),
        Ok(None) => Cart::new(),
        Err(e) => {
            warn!(key, error = %e, "Failed to read persisted cart, starting empty");
            Cart::new()
        }
    }
}
