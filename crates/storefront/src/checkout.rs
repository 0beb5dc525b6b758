//! Checkout handoff.
//!
//! The cart page hands its lines to checkout through in-memory navigation
//! state when available; otherwise checkout falls back to the persisted
//! session snapshot. The navigation state wins when both exist and is
//! re-persisted so a reload of the checkout page sees the same cart.
//!
//! Checkout renders a flat positional list, so removal here is by index
//! rather than by product id.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use keymint_core::{CurrencyCode, Price};

use crate::cart::{CartItem, Totals, compute_totals, restore_snapshot};
use crate::config::StorefrontConfig;
use crate::storage::{SessionStorage, keys};

/// Errors for checkout actions.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// `place_order` was called with nothing in the cart.
    #[error("cart is empty")]
    EmptyCart,
}

/// Confirmation returned when the simulated order is placed.
#[derive(Debug, Clone)]
pub struct OrderReceipt {
    pub receipt_id: Uuid,
    pub placed_at: DateTime<Utc>,
    pub total: Price,
}

/// Checkout page state.
pub struct Checkout {
    items: Mutex<Vec<CartItem>>,
    storage: Arc<dyn SessionStorage>,
    tax_rate: Decimal,
    currency: CurrencyCode,
}

impl Checkout {
    /// Begin checkout, reconciling the navigation state with the persisted
    /// snapshot.
    ///
    /// `nav_state` is the cart passed through in-memory navigation; when
    /// present it takes precedence and is re-persisted. When absent the
    /// persisted snapshot is used, and a missing or malformed snapshot
    /// yields an empty checkout.
    #[must_use]
    pub fn begin(
        nav_state: Option<Vec<CartItem>>,
        storage: Arc<dyn SessionStorage>,
        config: &StorefrontConfig,
    ) -> Self {
        let items = match nav_state {
            Some(items) => {
                persist(storage.as_ref(), &items);
                items
            }
            None => restore_snapshot(storage.as_ref()),
        };
        Self {
            items: Mutex::new(items),
            storage,
            tax_rate: config.tax_rate,
            currency: config.currency,
        }
    }

    /// Snapshot of the lines under checkout.
    #[must_use]
    pub fn items(&self) -> Vec<CartItem> {
        self.lock_items().clone()
    }

    /// Whether there is anything to check out.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock_items().is_empty()
    }

    /// Remove the line at `index`. Out-of-range indices are a no-op.
    pub fn remove_item(&self, index: usize) {
        let mut items = self.lock_items();
        if index >= items.len() {
            return;
        }
        items.remove(index);
        persist(self.storage.as_ref(), &items);
    }

    /// Empty the checkout and delete the persisted snapshot.
    pub fn clear(&self) {
        let mut items = self.lock_items();
        items.clear();
        if let Err(e) = self.storage.remove(keys::CART) {
            warn!("failed to clear persisted cart: {e}");
        }
    }

    /// Compute the summary amounts for the current lines.
    #[must_use]
    pub fn totals(&self) -> Totals {
        compute_totals(&self.lock_items(), self.tax_rate, self.currency)
    }

    /// Place the simulated order.
    ///
    /// Returns a receipt and empties the cart, deleting the persisted
    /// snapshot. No payment of any kind happens.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] when there is nothing to order.
    pub fn place_order(&self) -> Result<OrderReceipt, CheckoutError> {
        let mut items = self.lock_items();
        if items.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let totals = compute_totals(&items, self.tax_rate, self.currency);
        let receipt = OrderReceipt {
            receipt_id: Uuid::new_v4(),
            placed_at: Utc::now(),
            total: totals.total,
        };
        info!(receipt = %receipt.receipt_id, total = %receipt.total, "order placed");

        items.clear();
        if let Err(e) = self.storage.remove(keys::CART) {
            warn!("failed to clear persisted cart: {e}");
        }
        Ok(receipt)
    }

    fn lock_items(&self) -> std::sync::MutexGuard<'_, Vec<CartItem>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn persist(storage: &dyn SessionStorage, items: &[CartItem]) {
    let snapshot = match serde_json::to_string(items) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            warn!("failed to encode cart snapshot: {e}");
            return;
        }
    };
    if let Err(e) = storage.set(keys::CART, &snapshot) {
        warn!("failed to persist cart: {e}");
    }
}
