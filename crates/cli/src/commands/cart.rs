//! Cart commands.
//!
//! Each invocation opens the persisted cart, runs one operation, prints any
//! notices for the shopper, and then prints the resulting cart.

use std::fmt::Write as _;
use std::sync::Arc;

use rocket_shoes_core::{CurrencyCode, ProductId};
use rocket_shoes_storefront::cart::{Cart, MemoryNotifier};
use rocket_shoes_storefront::catalog::CatalogError;
use rocket_shoes_storefront::config::CartConfig;
use rocket_shoes_storefront::state::AppState;
use rocket_shoes_storefront::{CartError, UpdateProductAmount};

/// An open cart plus the notices raised while using it.
pub struct CartSession {
    state: AppState,
    notices: Arc<MemoryNotifier>,
}

impl CartSession {
    /// Open the cart described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog client cannot be built.
    pub fn open(config: CartConfig) -> Result<Self, CatalogError> {
        let notices = Arc::new(MemoryNotifier::new());
        let state = AppState::with_notifier(config, notices.clone())?;
        Ok(Self { state, notices })
    }

    /// Add one unit of a product and print the cart.
    ///
    /// # Errors
    ///
    /// Returns the store's error after its notice has been printed.
    pub async fn add(&self, product_id: ProductId) -> Result<(), CartError> {
        let result = self.state.cart().add_product(product_id).await;
        self.finish(result)
    }

    /// Remove a product and print the cart.
    ///
    /// # Errors
    ///
    /// Returns the store's error after its notice has been printed.
    pub async fn remove(&self, product_id: ProductId) -> Result<(), CartError> {
        let result = self.state.cart().remove_product(product_id).await;
        self.finish(result)
    }

    /// Set a product's quantity and print the cart.
    ///
    /// # Errors
    ///
    /// Returns the store's error after its notice has been printed.
    pub async fn update(&self, product_id: ProductId, amount: i64) -> Result<(), CartError> {
        let result = self
            .state
            .cart()
            .update_product_amount(UpdateProductAmount { product_id, amount })
            .await;
        self.finish(result)
    }

    /// Print the cart as a table or JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be serialized.
    pub fn show(&self, json: bool) -> Result<(), serde_json::Error> {
        let cart = self.state.cart().cart();
        let currency = self.state.config().currency;
        let output = if json {
            serde_json::to_string_pretty(&cart_json(&cart, currency))?
        } else {
            render_cart(&cart, currency)
        };

        #[allow(clippy::print_stdout)]
        {
            println!("{output}");
        }
        Ok(())
    }

    fn finish(&self, result: Result<(), CartError>) -> Result<(), CartError> {
        #[allow(clippy::print_stderr)]
        {
            for notice in self.notices.drain() {
                eprintln!("{notice}");
            }
        }

        if result.is_ok() {
            #[allow(clippy::print_stdout)]
            {
                println!(
                    "{}",
                    render_cart(&self.state.cart().cart(), self.state.config().currency)
                );
            }
        }
        result
    }
}

/// Render the cart as a plain-text table.
fn render_cart(cart: &Cart, currency: CurrencyCode) -> String {
    if cart.is_empty() {
        return "Cart is empty".to_string();
    }

    let mut out = String::new();
    for entry in cart {
        let _ = writeln!(
            out,
            "#{:<4} {:<40} x{:<3} {:>10} {:>10}",
            entry.id(),
            entry.product.title,
            entry.amount,
            rocket_shoes_core::Price::new(entry.product.price, currency).display(),
            entry.line_total(currency).display(),
        );
    }
    let _ = write!(
        out,
        "{} products, {} units, subtotal {}",
        cart.len(),
        cart.total_quantity(),
        cart.subtotal(currency).display()
    );
    out
}

/// JSON view of the cart with derived totals.
fn cart_json(cart: &Cart, currency: CurrencyCode) -> serde_json::Value {
    serde_json::json!({
        "entries": cart,
        "total_quantity": cart.total_quantity(),
        "subtotal": cart.subtotal(currency).display(),
        "currency": currency.code(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_cart() -> Cart {
        serde_json::from_str(
            r#"[
                {"id": 1, "title": "Tênis de Caminhada", "price": 179.9, "image": "a.jpg", "amount": 2},
                {"id": 2, "title": "Tênis VR Caminhada", "price": 139.9, "image": "b.jpg", "amount": 1}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_render_empty_cart() {
        assert_eq!(render_cart(&Cart::new(), CurrencyCode::USD), "Cart is empty");
    }

    #[test]
    fn test_render_cart_lists_entries_and_totals() {
        let out = render_cart(&sample_cart(), CurrencyCode::BRL);
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("#1"));
        assert!(lines[0].contains("R$359.80"));
        assert!(lines[1].contains("Tênis VR Caminhada"));
        assert_eq!(lines[2], "2 products, 3 units, subtotal R$499.70");
    }

    #[test]
    fn test_cart_json_shape() {
        let json = cart_json(&sample_cart(), CurrencyCode::USD);
        assert_eq!(json["total_quantity"], 3);
        assert_eq!(json["subtotal"], "$499.70");
        assert_eq!(json["entries"][1]["id"], 2);
        assert_eq!(json["currency"], "USD");
    }
}
