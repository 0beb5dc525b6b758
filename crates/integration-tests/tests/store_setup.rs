//! Integration tests for the store-setup wizard.
//!
//! Drives the five-step flow the setup page renders, with the sync
//! simulation under a paused tokio clock so the tests advance simulated
//! time instead of sleeping.

use std::sync::Arc;
use std::time::Duration;

use keymint_core::{ApiCredentials, CurrencyCode, Platform};
use keymint_storefront::config::{StorefrontConfig, SyncConfig};
use keymint_storefront::state::AppState;
use keymint_storefront::storage::MemoryStorage;
use keymint_storefront::theme::Theme;
use keymint_storefront::wizard::{SetupWizard, Step};

fn app() -> AppState {
    AppState::new(
        StorefrontConfig::default(),
        Arc::new(MemoryStorage::new()),
        Arc::new(MemoryStorage::new()),
        false,
    )
}

// =============================================================================
// Full Walkthrough
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_fresh_wizard_walkthrough() {
    let app = app();
    let wizard = app.wizard();
    assert_eq!(wizard.snapshot().step.number(), 1);

    // Step 1: pick Shopify.
    wizard.set_platform(Platform::Shopify);
    assert_eq!(wizard.next().expect("platform selected"), Step::StoreInfo);

    // Step 2: name and URL.
    wizard.set_store_info("Acme Keys", "https://acme.example");
    assert_eq!(wizard.next().expect("fields filled"), Step::Credentials);

    // Step 3: optional credentials, then connect.
    wizard.set_credentials(ApiCredentials::new(
        Some("https://acme.example/wp-json".to_string()),
        "ck_live_1234",
        "cs_live_5678",
    ));
    wizard.connect().expect("connect from credentials step");

    let snapshot = wizard.snapshot();
    assert_eq!(snapshot.step, Step::Syncing);
    assert!(snapshot.syncing);
    assert_eq!(snapshot.progress, 0);

    // Step 4 -> 5: the timer runs the progress to completion.
    let mut rx = wizard.subscribe();
    while rx.borrow().step != Step::Success {
        rx.changed().await.expect("wizard alive");
    }

    let snapshot = wizard.snapshot();
    assert_eq!(snapshot.progress, 100);
    assert!(!snapshot.syncing);

    // After the post-success delay the caller is told to navigate away.
    while !rx.borrow().redirect_ready {
        rx.changed().await.expect("wizard alive");
    }
    assert_eq!(wizard.snapshot().step, Step::Success);
}

#[tokio::test(start_paused = true)]
async fn test_progress_cadence_matches_configuration() {
    // 25% per tick: the observed progress sequence is exactly four ticks.
    let config = SyncConfig {
        tick: Duration::from_millis(500),
        step: 25,
        success_redirect: Duration::from_millis(2000),
    };
    let wizard = SetupWizard::new(config, CurrencyCode::USD);
    wizard.set_platform(Platform::WooCommerce);
    wizard.next().expect("platform selected");
    wizard.set_store_info("Acme Keys", "https://acme.example");
    wizard.next().expect("fields filled");
    wizard.connect().expect("connect from credentials step");

    let mut rx = wizard.subscribe();
    let mut observed = Vec::new();
    while rx.borrow().step != Step::Success {
        rx.changed().await.expect("wizard alive");
        observed.push(rx.borrow().progress);
    }
    assert_eq!(observed, vec![25, 50, 75, 100]);
}

// =============================================================================
// Gates and Guards
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_gates_report_step_scoped_messages() {
    let app = app();
    let wizard = app.wizard();

    let blocked = wizard.next().expect_err("no platform yet");
    assert_eq!(blocked.step, Step::SelectPlatform);
    assert_eq!(blocked.message, "Select a platform");

    wizard.set_platform(Platform::WooCommerce);
    wizard.next().expect("platform selected");

    let blocked = wizard.next().expect_err("store info empty");
    assert_eq!(blocked.step, Step::StoreInfo);
    assert_eq!(blocked.message, "Fill all fields");
}

#[tokio::test(start_paused = true)]
async fn test_no_backward_navigation_while_syncing() {
    let app = app();
    let wizard = app.wizard();
    wizard.set_platform(Platform::Shopify);
    wizard.next().expect("platform selected");
    wizard.set_store_info("Acme Keys", "https://acme.example");
    wizard.next().expect("fields filled");
    wizard.connect().expect("connect from credentials step");

    let before = wizard.snapshot();
    assert_eq!(wizard.previous(), Step::Syncing);
    assert_eq!(wizard.snapshot(), before);
    assert!(!wizard.skip(), "skip unavailable once syncing");
}

#[tokio::test(start_paused = true)]
async fn test_skip_hands_navigation_to_caller() {
    let app = app();
    let wizard = app.wizard();

    assert!(wizard.skip());
    assert!(wizard.snapshot().abandoned);
    // Skipping does not move the step; the caller navigates away.
    assert_eq!(wizard.snapshot().step, Step::SelectPlatform);
}

// =============================================================================
// Cross-Store Session Behavior
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_theme_outlives_session_cart_does_not() {
    let durable = Arc::new(MemoryStorage::new());

    {
        let app = AppState::new(
            StorefrontConfig::default(),
            Arc::new(MemoryStorage::new()),
            durable.clone(),
            false,
        );
        app.cart().add_item(&keymint_integration_tests::pro_license());
        assert_eq!(app.theme().toggle(), Theme::Dark);
    }

    // New browser session: fresh session storage, same durable storage.
    let app = AppState::new(
        StorefrontConfig::default(),
        Arc::new(MemoryStorage::new()),
        durable,
        false,
    );
    assert!(app.cart().items().is_empty(), "cart is session-scoped");
    assert_eq!(app.theme().current(), Theme::Dark, "theme is durable");
}
