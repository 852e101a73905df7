//! Integration tests for Rocket Shoes.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p rocket-shoes-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `http_catalog` - `HttpCatalog` against a local catalog API
//! - `cart_flow` - `CartStore` end to end with HTTP catalog and file storage
//!
//! The catalog API is served by [`CatalogServer`], an `axum` router bound to
//! an ephemeral localhost port that mimics the storefront's REST endpoints.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use rocket_shoes_storefront::config::CatalogConfig;
use serde_json::json;
use tokio::task::JoinHandle;
use url::Url;

#[derive(Default)]
struct CatalogState {
    products: Mutex<HashMap<i32, serde_json::Value>>,
    stock: Mutex<HashMap<i32, u32>>,
    failure: Mutex<Option<StatusCode>>,
    product_hits: AtomicUsize,
    stock_hits: AtomicUsize,
}

impl CatalogState {
    fn failure(&self) -> Option<StatusCode> {
        *self.failure.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A local stand-in for the catalog API.
pub struct CatalogServer {
    base_url: Url,
    state: Arc<CatalogState>,
    handle: JoinHandle<()>,
}

impl CatalogServer {
    /// Bind to an ephemeral port and start serving.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn start() -> Self {
        let state = Arc::new(CatalogState::default());

        let app = Router::new()
            .route("/stock/{id}", get(stock))
            .route("/products/{id}", get(product))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind catalog listener");
        let addr = listener.local_addr().expect("catalog listener address");

        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let base_url = Url::parse(&format!("http://{addr}/")).expect("catalog base url");
        Self {
            base_url,
            state,
            handle,
        }
    }

    /// Base URL of the server, with trailing slash.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Catalog client configuration pointing at this server.
    #[must_use]
    pub fn catalog_config(&self) -> CatalogConfig {
        CatalogConfig {
            base_url: self.base_url.clone(),
            product_cache_ttl: Duration::from_secs(300),
            request_timeout: Duration::from_secs(5),
        }
    }

    /// Register a product with its stock level.
    pub fn add_product(&self, id: i32, title: &str, price: f64, stock: u32) {
        self.state
            .products
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                id,
                json!({
                    "id": id,
                    "title": title,
                    "price": price,
                    "image": format!("https://cdn.rocketshoes.test/{id}.jpg"),
                }),
            );
        self.set_stock(id, stock);
    }

    /// Change a product's stock level.
    pub fn set_stock(&self, id: i32, amount: u32) {
        self.state
            .stock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, amount);
    }

    /// Make every request fail with `status` until cleared with `None`.
    pub fn fail_with(&self, status: Option<StatusCode>) {
        *self
            .state
            .failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = status;
    }

    /// Number of product detail requests served.
    #[must_use]
    pub fn product_hits(&self) -> usize {
        self.state.product_hits.load(Ordering::SeqCst)
    }

    /// Number of stock requests served.
    #[must_use]
    pub fn stock_hits(&self) -> usize {
        self.state.stock_hits.load(Ordering::SeqCst)
    }
}

impl Drop for CatalogServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn stock(State(state): State<Arc<CatalogState>>, Path(id): Path<i32>) -> Response {
    state.stock_hits.fetch_add(1, Ordering::SeqCst);
    if let Some(status) = state.failure() {
        return status.into_response();
    }

    let amount = state
        .stock
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&id)
        .copied();
    amount.map_or_else(
        || StatusCode::NOT_FOUND.into_response(),
        |amount| Json(json!({ "id": id, "amount": amount })).into_response(),
    )
}

async fn product(State(state): State<Arc<CatalogState>>, Path(id): Path<i32>) -> Response {
    state.product_hits.fetch_add(1, Ordering::SeqCst);
    if let Some(status) = state.failure() {
        return status.into_response();
    }

    let product = state
        .products
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&id)
        .cloned();
    product.map_or_else(
        || StatusCode::NOT_FOUND.into_response(),
        |product| Json(product).into_response(),
    )
}

/// A fresh storage file path under the system temp directory.
#[must_use]
pub fn temp_storage_path(name: &str) -> PathBuf {
    let path = std::env::temp_dir()
        .join(format!("rocket-shoes-it-{}-{name}", std::process::id()))
        .join("storage.json");
    let _ = std::fs::remove_file(&path);
    path
}
