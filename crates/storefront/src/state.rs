//! Application state shared across views.
//!
//! The stores live here, constructed once at application-root scope and
//! injected into the pages that render them. Nothing in this crate is a
//! process-wide singleton; tests build as many roots as they like.

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::cart::{CartItem, CartStore};
use crate::checkout::Checkout;
use crate::config::StorefrontConfig;
use crate::forms::FormEndpoint;
use crate::fulfillment::DeliveryDemo;
use crate::storage::SessionStorage;
use crate::theme::ThemeStore;
use crate::wizard::SetupWizard;

/// Opening balance of the demo wallet.
const OPENING_BALANCE_CENTS: i64 = 1000;

/// Application state shared across all views.
///
/// Cheaply cloneable via `Arc`; each clone refers to the same stores.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    session_storage: Arc<dyn SessionStorage>,
    cart: CartStore,
    wizard: SetupWizard,
    theme: ThemeStore,
    delivery: DeliveryDemo,
    forms: FormEndpoint,
}

impl AppState {
    /// Build the application root.
    ///
    /// `session_storage` backs the cart (cleared with the session);
    /// `durable_storage` backs the theme preference. `os_prefers_dark` is
    /// the host's dark-mode hint, consulted when no theme is stored.
    #[must_use]
    pub fn new(
        config: StorefrontConfig,
        session_storage: Arc<dyn SessionStorage>,
        durable_storage: Arc<dyn SessionStorage>,
        os_prefers_dark: bool,
    ) -> Self {
        let cart = CartStore::load(Arc::clone(&session_storage), &config);
        let wizard = SetupWizard::new(config.sync.clone(), config.currency);
        let theme = ThemeStore::load(durable_storage, os_prefers_dark);
        let delivery = DeliveryDemo::new(
            Decimal::new(OPENING_BALANCE_CENTS, 2),
            config.delivery_latency,
        );
        let forms = FormEndpoint::new(config.form_latency);

        Self {
            inner: Arc::new(AppStateInner {
                cart,
                wizard,
                theme,
                delivery,
                forms,
                session_storage,
                config,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the cart store.
    #[must_use]
    pub fn cart(&self) -> &CartStore {
        &self.inner.cart
    }

    /// Get a reference to the setup wizard.
    #[must_use]
    pub fn wizard(&self) -> &SetupWizard {
        &self.inner.wizard
    }

    /// Get a reference to the theme store.
    #[must_use]
    pub fn theme(&self) -> &ThemeStore {
        &self.inner.theme
    }

    /// Get a reference to the wallet/delivery demo.
    #[must_use]
    pub fn delivery(&self) -> &DeliveryDemo {
        &self.inner.delivery
    }

    /// Get a reference to the simulated form endpoint.
    #[must_use]
    pub fn forms(&self) -> &FormEndpoint {
        &self.inner.forms
    }

    /// Begin checkout for the given navigation state.
    ///
    /// The cart page passes its lines as `nav_state`; a direct visit to the
    /// checkout page passes `None` and falls back to the persisted
    /// snapshot.
    #[must_use]
    pub fn checkout(&self, nav_state: Option<Vec<CartItem>>) -> Checkout {
        Checkout::begin(
            nav_state,
            Arc::clone(&self.inner.session_storage),
            &self.inner.config,
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use keymint_core::{CurrencyCode, Price, ProductId};

    use super::*;
    use crate::cart::Product;
    use crate::storage::MemoryStorage;

    fn app() -> AppState {
        AppState::new(
            StorefrontConfig::default(),
            Arc::new(MemoryStorage::new()),
            Arc::new(MemoryStorage::new()),
            false,
        )
    }

    #[test]
    fn test_clones_share_stores() {
        let app = app();
        let clone = app.clone();

        app.cart().add_item(&Product::new(
            ProductId::new(1),
            "Pro License",
            Price::from_units(49, CurrencyCode::USD),
        ));
        assert_eq!(clone.cart().item_count(), 1);
    }

    #[test]
    fn test_checkout_handoff_from_cart_page() {
        let app = app();
        app.cart().add_item(&Product::new(
            ProductId::new(1),
            "Pro License",
            Price::from_units(49, CurrencyCode::USD),
        ));

        let checkout = app.checkout(Some(app.cart().items()));
        assert_eq!(checkout.items(), app.cart().items());
    }

    #[test]
    fn test_direct_checkout_visit_reads_persisted_cart() {
        let app = app();
        app.cart().add_item(&Product::new(
            ProductId::new(2),
            "Enterprise License",
            Price::from_units(99, CurrencyCode::USD),
        ));

        let checkout = app.checkout(None);
        assert_eq!(checkout.items().len(), 1);
    }
}
