//! Wallet and key-delivery simulation.
//!
//! Backs the "watch an order get fulfilled" demo on the marketing pages:
//! an order arrives, the wallet balance is checked, and either a license
//! key is "delivered" and the cost debited, or the order pauses on an
//! insufficient balance. Everything is local; the delay is a timer, the
//! key is random characters.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use rand::Rng;
use rust_decimal::Decimal;
use tokio::time::sleep;
use tracing::info;

use crate::validate::round_currency;

/// Status message for an order paused on insufficient balance.
pub const PAUSED_MESSAGE: &str = "Insufficient balance — order paused.";

/// License keys are four groups of five characters.
const KEY_GROUPS: usize = 4;
const KEY_GROUP_LEN: usize = 5;

/// Unambiguous uppercase alphabet for generated keys (no I, O, 0, 1).
const KEY_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Result of one simulated fulfillment attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// The wallet covered the order; a key was generated and the cost
    /// debited.
    Delivered {
        license_key: String,
        new_balance: Decimal,
    },
    /// The wallet could not cover the order. The balance is untouched.
    Paused {
        message: &'static str,
    },
}

/// Wallet-backed delivery demo.
pub struct DeliveryDemo {
    balance: Mutex<Decimal>,
    latency: Duration,
}

impl DeliveryDemo {
    /// Create a demo wallet with an opening balance.
    #[must_use]
    pub const fn new(opening_balance: Decimal, latency: Duration) -> Self {
        Self {
            balance: Mutex::new(opening_balance),
            latency,
        }
    }

    /// Current wallet balance.
    #[must_use]
    pub fn balance(&self) -> Decimal {
        *self.balance.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add funds to the wallet.
    pub fn top_up(&self, amount: Decimal) {
        let mut balance = self.balance.lock().unwrap_or_else(PoisonError::into_inner);
        *balance = round_currency(*balance + amount.max(Decimal::ZERO));
    }

    /// Simulate fulfilling one order costing `cost`.
    ///
    /// Waits the configured latency, then delivers and debits when the
    /// balance covers the cost, or pauses the order otherwise. The balance
    /// never goes negative.
    pub async fn simulate(&self, cost: Decimal) -> DeliveryOutcome {
        sleep(self.latency).await;

        let cost = cost.max(Decimal::ZERO);
        let mut balance = self.balance.lock().unwrap_or_else(PoisonError::into_inner);
        if *balance >= cost {
            *balance = round_currency(*balance - cost);
            let license_key = generate_license_key(&mut rand::rng());
            info!(%cost, new_balance = %balance, "license delivered");
            DeliveryOutcome::Delivered {
                license_key,
                new_balance: *balance,
            }
        } else {
            info!(%cost, balance = %balance, "order paused on insufficient balance");
            DeliveryOutcome::Paused {
                message: PAUSED_MESSAGE,
            }
        }
    }
}

/// Generate a display license key, e.g. `V7QXK-2MNPD-8RTWG-5HJLB`.
pub fn generate_license_key<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut key = String::with_capacity(KEY_GROUPS * (KEY_GROUP_LEN + 1) - 1);
    for group in 0..KEY_GROUPS {
        if group > 0 {
            key.push('-');
        }
        for _ in 0..KEY_GROUP_LEN {
            let index = rng.random_range(0..KEY_ALPHABET.len());
            key.push(char::from(*KEY_ALPHABET.get(index).unwrap_or(&b'A')));
        }
    }
    key
}
