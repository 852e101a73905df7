//! Integration tests for the HTTP catalog client.
//!
//! These run `HttpCatalog` against a local axum server that serves the
//! storefront's `stock/{id}` and `products/{id}` endpoints.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use rocket_shoes_core::{CurrencyCode, Price, ProductId};
use rocket_shoes_integration_tests::CatalogServer;
use rocket_shoes_storefront::catalog::{CatalogError, HttpCatalog, ProductCatalog};

async fn setup() -> (CatalogServer, HttpCatalog) {
    let server = CatalogServer::start().await;
    server.add_product(1, "Tênis de Caminhada Leve Confortável", 179.9, 3);
    let catalog = HttpCatalog::new(&server.catalog_config()).unwrap();
    (server, catalog)
}

#[tokio::test]
async fn test_fetches_stock() {
    let (_server, catalog) = setup().await;

    let stock = catalog.stock(ProductId::new(1)).await.unwrap();

    assert_eq!(stock.id, ProductId::new(1));
    assert_eq!(stock.amount, 3);
}

#[tokio::test]
async fn test_fetches_product_details() {
    let (_server, catalog) = setup().await;

    let product = catalog.product(ProductId::new(1)).await.unwrap();

    assert_eq!(product.title, "Tênis de Caminhada Leve Confortável");
    assert_eq!(Price::new(product.price, CurrencyCode::USD).display(), "$179.90");
    assert_eq!(product.image, "https://cdn.rocketshoes.test/1.jpg");
}

#[tokio::test]
async fn test_product_details_are_cached() {
    let (server, catalog) = setup().await;

    catalog.product(ProductId::new(1)).await.unwrap();
    catalog.product(ProductId::new(1)).await.unwrap();

    assert_eq!(server.product_hits(), 1);
}

#[tokio::test]
async fn test_stock_is_never_cached() {
    let (server, catalog) = setup().await;

    assert_eq!(catalog.stock(ProductId::new(1)).await.unwrap().amount, 3);
    server.set_stock(1, 0);
    assert_eq!(catalog.stock(ProductId::new(1)).await.unwrap().amount, 0);

    assert_eq!(server.stock_hits(), 2);
}

#[tokio::test]
async fn test_unknown_product_is_not_found() {
    let (_server, catalog) = setup().await;

    let err = catalog.stock(ProductId::new(99)).await.unwrap_err();

    assert!(matches!(err, CatalogError::NotFound(path) if path == "stock/99"));
}

#[tokio::test]
async fn test_rate_limited_response() {
    let (server, catalog) = setup().await;
    server.fail_with(Some(StatusCode::TOO_MANY_REQUESTS));

    let err = catalog.stock(ProductId::new(1)).await.unwrap_err();

    assert!(matches!(err, CatalogError::RateLimited(1)));
}

#[tokio::test]
async fn test_server_error_status() {
    let (server, catalog) = setup().await;
    server.fail_with(Some(StatusCode::INTERNAL_SERVER_ERROR));

    let err = catalog.product(ProductId::new(1)).await.unwrap_err();

    assert!(matches!(err, CatalogError::Status { status: 500, .. }));
}
