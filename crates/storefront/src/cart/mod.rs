//! Shopping cart state.
//!
//! [`CartStore`] owns the cart, validates changes against live stock, and
//! persists every committed change. Front ends read snapshots through
//! [`CartStore::cart`] and re-render after each operation.

mod model;
mod notice;
mod store;

pub use model::{Cart, CartEntry, InvalidCart, Product, StockRecord};
pub use notice::{CartNotice, MemoryNotifier, Notifier, TracingNotifier};
pub use store::{CartStore, DEFAULT_STORAGE_KEY, UpdateProductAmount};
