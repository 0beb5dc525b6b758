//! Integration tests for KeyMint.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p keymint-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_checkout` - Cart persistence, totals, and the checkout handoff
//! - `store_setup` - The setup wizard's gates and sync simulation
//!
//! This crate only holds shared fixtures: the demo catalog and a storage
//! backend that always fails, for exercising the degrade-to-memory path.

#![cfg_attr(not(test), forbid(unsafe_code))]

use keymint_core::{CurrencyCode, Price, ProductId};
use keymint_storefront::cart::Product;
use keymint_storefront::storage::{SessionStorage, StorageError};

/// The cart demo's first sample product.
#[must_use]
pub fn pro_license() -> Product {
    Product::new(
        ProductId::new(1),
        "Pro License",
        Price::from_units(49, CurrencyCode::USD),
    )
}

/// The cart demo's second sample product.
#[must_use]
pub fn enterprise_license() -> Product {
    Product::new(
        ProductId::new(2),
        "Enterprise License",
        Price::from_units(99, CurrencyCode::USD),
    )
}

/// Storage backend that rejects every operation, standing in for a browser
/// with storage disabled or over quota.
#[derive(Debug, Default)]
pub struct FailingStorage;

impl SessionStorage for FailingStorage {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable("storage disabled".to_string()))
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::QuotaExceeded)
    }

    fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("storage disabled".to_string()))
    }
}
