//! Application state: the cart store wired to its production collaborators.

use std::sync::Arc;

use crate::cart::{CartStore, Notifier, TracingNotifier};
use crate::catalog::{CatalogError, HttpCatalog};
use crate::config::CartConfig;
use crate::storage::FileStorage;

/// Shared application state.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration and the cart store built from it.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: CartConfig,
    catalog: HttpCatalog,
    cart: CartStore,
}

impl AppState {
    /// Create application state with notices sent to `tracing`.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog HTTP client cannot be built.
    pub fn new(config: CartConfig) -> Result<Self, CatalogError> {
        Self::with_notifier(config, Arc::new(TracingNotifier))
    }

    /// Create application state with a custom notifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog HTTP client cannot be built.
    pub fn with_notifier(
        config: CartConfig,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, CatalogError> {
        let catalog = HttpCatalog::new(&config.catalog)?;
        let storage = Arc::new(FileStorage::new(&config.storage_path));
        let cart = CartStore::new(
            Arc::new(catalog.clone()),
            storage,
            notifier,
            config.storage_key.clone(),
        );

        tracing::debug!(
            api = %catalog.base_url(),
            storage = %config.storage_path.display(),
            "Cart state initialized"
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                cart,
            }),
        })
    }

    /// Get a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &CartConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog client.
    #[must_use]
    pub fn catalog(&self) -> &HttpCatalog {
        &self.inner.catalog
    }

    /// Get a reference to the cart store.
    #[must_use]
    pub fn cart(&self) -> &CartStore {
        &self.inner.cart
    }
}
