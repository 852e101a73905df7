//! CLI command implementations.

mod cart;

pub use cart::CartSession;
