//! Rocket Shoes storefront cart library.
//!
//! Client-side cart state for the storefront: adding products with stock
//! checks, removing them, adjusting quantities, and persisting the cart
//! across sessions.
//!
//! # Modules
//!
//! - [`cart`] - `CartStore`, cart types and user-facing notices
//! - [`catalog`] - Product/stock lookup port and its HTTP client
//! - [`storage`] - Key-value persistence port with memory and file backends
//! - [`config`] - Environment-based configuration
//! - [`state`] - Production wiring of the store and its collaborators

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod state;
pub mod storage;

pub use cart::{Cart, CartEntry, CartNotice, CartStore, UpdateProductAmount};
pub use error::CartError;
