//! Cart store.
//!
//! Holds the ordered line items for the cart demo, persists a JSON snapshot
//! to the session-scoped storage area after every mutation, and notifies
//! subscribers through a watch channel. Repeat adds of the same product
//! consolidate into one line by incrementing its quantity.

use std::sync::{Arc, Mutex, PoisonError};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, warn};

use keymint_core::{CurrencyCode, Price, ProductId};

use crate::config::StorefrontConfig;
use crate::storage::{SessionStorage, keys};

/// A catalog product as offered on the demo pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
}

impl Product {
    /// Create a product descriptor.
    #[must_use]
    pub fn new(id: ProductId, title: impl Into<String>, price: Price) -> Self {
        Self {
            id,
            title: title.into(),
            price,
        }
    }
}

/// One cart line.
///
/// The persisted snapshot tolerates a missing `quantity` (older snapshots
/// stored one entry per add) by defaulting it to 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

const fn default_quantity() -> u32 {
    1
}

impl CartItem {
    /// Line total: unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}

/// Checkout summary amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Totals {
    pub subtotal: Price,
    pub tax: Price,
    pub total: Price,
}

/// Compute checkout totals over a set of cart lines.
///
/// Pure and deterministic: `subtotal` is the sum of line totals, `tax` is
/// `subtotal * tax_rate` rounded half-up to two decimal places, `total` is
/// their sum. `currency` is used when `items` is empty.
#[must_use]
pub fn compute_totals(items: &[CartItem], tax_rate: Decimal, currency: CurrencyCode) -> Totals {
    let currency = items.first().map_or(currency, |item| item.price.currency_code);
    let subtotal = items
        .iter()
        .fold(Price::zero(currency), |acc, item| acc.plus(&item.line_total()));
    let tax = Price::new(subtotal.amount * tax_rate, currency).rounded();
    let total = subtotal.plus(&tax);
    Totals {
        subtotal,
        tax,
        total,
    }
}

/// Session-persisted shopping cart.
///
/// Owned by the application root; views read snapshots and dispatch
/// mutations. The in-memory list stays authoritative even when persistence
/// fails (storage errors are logged and swallowed).
pub struct CartStore {
    items: Mutex<Vec<CartItem>>,
    storage: Arc<dyn SessionStorage>,
    tax_rate: Decimal,
    currency: CurrencyCode,
    revision: watch::Sender<u64>,
}

impl CartStore {
    /// Restore the cart from the session storage area.
    ///
    /// Absent or malformed snapshots load as an empty cart; this never
    /// fails.
    #[must_use]
    pub fn load(storage: Arc<dyn SessionStorage>, config: &StorefrontConfig) -> Self {
        let items = restore_snapshot(storage.as_ref());
        let (revision, _) = watch::channel(0);
        Self {
            items: Mutex::new(items),
            storage,
            tax_rate: config.tax_rate,
            currency: config.currency,
            revision,
        }
    }

    /// Add a product to the cart.
    ///
    /// If a line with the same product id exists its quantity is
    /// incremented, otherwise a new line is appended. Always succeeds.
    pub fn add_item(&self, product: &Product) {
        {
            let mut items = self.lock_items();
            if let Some(line) = items.iter_mut().find(|line| line.id == product.id) {
                line.quantity = line.quantity.saturating_add(1);
            } else {
                items.push(CartItem {
                    id: product.id,
                    title: product.title.clone(),
                    price: product.price,
                    quantity: 1,
                });
            }
            debug!(product = %product.id, "added product to cart");
            self.persist(&items);
        }
        self.notify();
    }

    /// Remove the line with the given product id entirely.
    ///
    /// A missing id is a no-op, not an error.
    pub fn remove_item(&self, id: ProductId) {
        {
            let mut items = self.lock_items();
            let before = items.len();
            items.retain(|line| line.id != id);
            if items.len() == before {
                return;
            }
            debug!(product = %id, "removed product from cart");
            self.persist(&items);
        }
        self.notify();
    }

    /// Set the quantity of the line with the given product id.
    ///
    /// Quantities clamp to a minimum of 1; use [`Self::remove_item`] to drop
    /// a line. A missing id is a no-op.
    pub fn update_quantity(&self, id: ProductId, quantity: u32) {
        {
            let mut items = self.lock_items();
            let Some(line) = items.iter_mut().find(|line| line.id == id) else {
                return;
            };
            line.quantity = quantity.max(1);
            self.persist(&items);
        }
        self.notify();
    }

    /// Empty the cart and delete the persisted snapshot.
    pub fn clear(&self) {
        {
            let mut items = self.lock_items();
            items.clear();
            if let Err(e) = self.storage.remove(keys::CART) {
                warn!("failed to clear persisted cart: {e}");
            }
        }
        self.notify();
    }

    /// Snapshot of the current lines, in insertion order.
    #[must_use]
    pub fn items(&self) -> Vec<CartItem> {
        self.lock_items().clone()
    }

    /// Total number of units across all lines (cart badge count).
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lock_items()
            .iter()
            .fold(0, |acc, line| acc.saturating_add(line.quantity))
    }

    /// Compute checkout totals for the current lines.
    #[must_use]
    pub fn totals(&self) -> Totals {
        compute_totals(&self.lock_items(), self.tax_rate, self.currency)
    }

    /// Subscribe to change notifications.
    ///
    /// The channel carries a revision counter; subscribers re-read
    /// [`Self::items`] and [`Self::totals`] when it changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    fn lock_items(&self) -> std::sync::MutexGuard<'_, Vec<CartItem>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self, items: &[CartItem]) {
        let snapshot = match serde_json::to_string(items) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("failed to encode cart snapshot: {e}");
                return;
            }
        };
        if let Err(e) = self.storage.set(keys::CART, &snapshot) {
            warn!("failed to persist cart: {e}");
        }
    }

    fn notify(&self) {
        self.revision.send_modify(|revision| *revision += 1);
    }
}

/// Read the persisted snapshot, treating absence and malformed content as an
/// empty cart.
pub(crate) fn restore_snapshot(storage: &dyn SessionStorage) -> Vec<CartItem> {
    let raw = match storage.get(keys::CART) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!("failed to read persisted cart: {e}");
            return Vec::new();
        }
    };
    match serde_json::from_str(&raw) {
        Ok(items) => items,
        Err(e) => {
            warn!("malformed cart snapshot, starting empty: {e}");
            Vec::new()
        }
    }
}
