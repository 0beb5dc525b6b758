//! Core types for KeyMint.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod credential;
pub mod email;
pub mod id;
pub mod platform;
pub mod price;

pub use credential::ApiCredentials;
pub use email::{Email, EmailError};
pub use id::*;
pub use platform::{Platform, PlatformError};
pub use price::{CurrencyCode, Price};
