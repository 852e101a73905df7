//! User-facing cart notices and the notifier port that surfaces them.

use std::fmt;
use std::sync::{Mutex, PoisonError};

use serde::Serialize;

/// The fixed set of messages shown to the shopper when a cart operation fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CartNotice {
    StockExceeded,
    AddFailed,
    RemoveFailed,
    UpdateFailed,
}

impl CartNotice {
    /// Message text shown to the shopper.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::StockExceeded => "requested quantity exceeds stock",
            Self::AddFailed => "failed to add product",
            Self::RemoveFailed => "failed to remove product",
            Self::UpdateFailed => "failed to update product quantity",
        }
    }
}

impl fmt::Display for CartNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Surfaces cart notices to the shopper.
///
/// Fire-and-forget: the store never waits on or inspects the outcome.
pub trait Notifier: Send + Sync {
    fn error(&self, notice: CartNotice);
}

/// Emits notices as `tracing` warnings.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn error(&self, notice: CartNotice) {
        tracing::warn!(notice = ?notice, "{notice}");
    }
}

/// Records notices in memory so a front end can drain and render them.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    notices: Mutex<Vec<CartNotice>>,
}

impl MemoryNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Notices recorded so far, oldest first.
    #[must_use]
    pub fn notices(&self) -> Vec<CartNotice> {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Take all recorded notices, leaving the notifier empty.
    pub fn drain(&self) -> Vec<CartNotice> {
        std::mem::take(&mut *self.notices.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl Notifier for MemoryNotifier {
    fn error(&self, notice: CartNotice) {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notice);
    }
}
