//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional; the defaults reproduce the demo pages.
//!
//! - `KEYMINT_TAX_RATE` - Checkout tax rate as a decimal fraction
//!   (default: 0.10; the dashboard demo uses 0.07)
//! - `KEYMINT_CURRENCY` - ISO 4217 currency code (default: USD)
//! - `KEYMINT_SYNC_TICK_MS` - Store-sync progress tick interval (default: 500)
//! - `KEYMINT_SYNC_STEP` - Progress percentage added per tick (default: 10)
//! - `KEYMINT_SUCCESS_REDIRECT_MS` - Delay after wizard success before the
//!   caller is signalled to navigate away (default: 2000)
//! - `KEYMINT_DELIVERY_LATENCY_MS` - Simulated key-delivery latency
//!   (default: 450)
//! - `KEYMINT_FORM_LATENCY_MS` - Simulated form-submission latency
//!   (default: 900)

use std::str::FromStr;
use std::time::Duration;

use rust_decimal::Decimal;
use thiserror::Error;

use keymint_core::CurrencyCode;

const DEFAULT_TAX_RATE: &str = "0.10";
const DEFAULT_CURRENCY: &str = "USD";
const DEFAULT_SYNC_TICK_MS: &str = "500";
const DEFAULT_SYNC_STEP: &str = "10";
const DEFAULT_SUCCESS_REDIRECT_MS: &str = "2000";
const DEFAULT_DELIVERY_LATENCY_MS: &str = "450";
const DEFAULT_FORM_LATENCY_MS: &str = "900";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Tax rate applied at checkout, as a fraction in `[0, 1)`.
    pub tax_rate: Decimal,
    /// Display currency for the demo catalog.
    pub currency: CurrencyCode,
    /// Store-sync simulation timing.
    pub sync: SyncConfig,
    /// Simulated latency for the wallet/key-delivery demo.
    pub delivery_latency: Duration,
    /// Simulated latency for contact and trial-signup submissions.
    pub form_latency: Duration,
}

/// Timing for the setup wizard's sync simulation.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Interval between progress ticks.
    pub tick: Duration,
    /// Progress percentage added per tick.
    pub step: u8,
    /// Delay after reaching the success step before signalling the caller
    /// to navigate away.
    pub success_redirect: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(500),
            step: 10,
            success_redirect: Duration::from_millis(2000),
        }
    }
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            tax_rate: Decimal::new(10, 2),
            currency: CurrencyCode::USD,
            sync: SyncConfig::default(),
            delivery_latency: Duration::from_millis(450),
            form_latency: Duration::from_millis(900),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but fails to parse or
    /// validate.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let tax_rate = parse_tax_rate(&get_env_or_default("KEYMINT_TAX_RATE", DEFAULT_TAX_RATE))
            .map_err(|e| ConfigError::InvalidEnvVar("KEYMINT_TAX_RATE".to_string(), e))?;

        let currency =
            CurrencyCode::from_str(&get_env_or_default("KEYMINT_CURRENCY", DEFAULT_CURRENCY))
                .map_err(|e| ConfigError::InvalidEnvVar("KEYMINT_CURRENCY".to_string(), e))?;

        let sync = SyncConfig {
            tick: parse_tick_millis(&get_env_or_default(
                "KEYMINT_SYNC_TICK_MS",
                DEFAULT_SYNC_TICK_MS,
            ))
            .map_err(|e| ConfigError::InvalidEnvVar("KEYMINT_SYNC_TICK_MS".to_string(), e))?,
            step: parse_sync_step(&get_env_or_default("KEYMINT_SYNC_STEP", DEFAULT_SYNC_STEP))
                .map_err(|e| ConfigError::InvalidEnvVar("KEYMINT_SYNC_STEP".to_string(), e))?,
            success_redirect: parse_millis(&get_env_or_default(
                "KEYMINT_SUCCESS_REDIRECT_MS",
                DEFAULT_SUCCESS_REDIRECT_MS,
            ))
            .map_err(|e| {
                ConfigError::InvalidEnvVar("KEYMINT_SUCCESS_REDIRECT_MS".to_string(), e)
            })?,
        };

        let delivery_latency = parse_millis(&get_env_or_default(
            "KEYMINT_DELIVERY_LATENCY_MS",
            DEFAULT_DELIVERY_LATENCY_MS,
        ))
        .map_err(|e| ConfigError::InvalidEnvVar("KEYMINT_DELIVERY_LATENCY_MS".to_string(), e))?;

        let form_latency = parse_millis(&get_env_or_default(
            "KEYMINT_FORM_LATENCY_MS",
            DEFAULT_FORM_LATENCY_MS,
        ))
        .map_err(|e| ConfigError::InvalidEnvVar("KEYMINT_FORM_LATENCY_MS".to_string(), e))?;

        Ok(Self {
            tax_rate,
            currency,
            sync,
            delivery_latency,
            form_latency,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse a tax rate and validate it lies in `[0, 1)`.
fn parse_tax_rate(s: &str) -> Result<Decimal, String> {
    let rate = Decimal::from_str(s).map_err(|e| e.to_string())?;
    if rate < Decimal::ZERO || rate >= Decimal::ONE {
        return Err(format!("tax rate must be in [0, 1), got {rate}"));
    }
    Ok(rate)
}

/// Parse a duration given in milliseconds.
fn parse_millis(s: &str) -> Result<Duration, String> {
    let millis = s.parse::<u64>().map_err(|e| e.to_string())?;
    Ok(Duration::from_millis(millis))
}

/// Parse the sync tick interval; a zero interval would spin.
fn parse_tick_millis(s: &str) -> Result<Duration, String> {
    let duration = parse_millis(s)?;
    if duration.is_zero() {
        return Err("sync tick must be greater than zero".to_string());
    }
    Ok(duration)
}

/// Parse the per-tick progress step, `1..=100`.
fn parse_sync_step(s: &str) -> Result<u8, String> {
    let step = s.parse::<u8>().map_err(|e| e.to_string())?;
    if !(1..=100).contains(&step) {
        return Err(format!("sync step must be in 1..=100, got {step}"));
    }
    Ok(step)
}
