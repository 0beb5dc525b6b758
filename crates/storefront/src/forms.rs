//! Typed form records for the marketing pages.
//!
//! The contact and trial-signup forms never reach a server; submission
//! validates the record, waits the configured simulated latency, and
//! resolves to a canned confirmation. Each record carries its own
//! constraints so every page validates the same way.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tokio::time::sleep;
use tracing::info;

use crate::validate::{FieldError, non_empty, valid_email};

/// Confirmation shown after a contact request "goes through".
pub const CONTACT_CONFIRMATION: &str = "Thanks — we'll contact you within 24 hours.";

/// Minimum password length for trial signups.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Platform selection offered on the contact form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlatformInterest {
    #[default]
    WooCommerce,
    Shopify,
    Both,
    Other,
}

/// Demo-request form on the contact page.
#[derive(Debug, Clone)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub platform: PlatformInterest,
    /// Free-text order volume, e.g. "1,000".
    pub monthly_orders: String,
    pub priority: String,
    pub message: String,
}

impl Default for ContactRequest {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            platform: PlatformInterest::default(),
            monthly_orders: String::new(),
            priority: "Normal".to_string(),
            message: String::new(),
        }
    }
}

impl ContactRequest {
    /// Check the required fields.
    ///
    /// # Errors
    ///
    /// Returns one [`FieldError`] per failing field.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        if !non_empty(&self.name) {
            errors.push(FieldError {
                field: "name",
                message: "Name is required",
            });
        }
        if !valid_email(&self.email) {
            errors.push(FieldError {
                field: "email",
                message: "Enter a valid email address",
            });
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Trial-signup form.
///
/// The password is optional at this stage; when given it must meet the
/// minimum length. Terms must be accepted.
#[derive(Debug, Clone, Default)]
pub struct TrialSignup {
    pub name: String,
    pub email: String,
    pub company: String,
    pub password: Option<SecretString>,
    pub accepted_terms: bool,
}

impl TrialSignup {
    /// Check the signup constraints.
    ///
    /// # Errors
    ///
    /// Returns one [`FieldError`] per failing field.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        if !non_empty(&self.name) {
            errors.push(FieldError {
                field: "name",
                message: "Name is required",
            });
        }
        if !valid_email(&self.email) {
            errors.push(FieldError {
                field: "email",
                message: "Enter a valid email address",
            });
        }
        if !non_empty(&self.company) {
            errors.push(FieldError {
                field: "company",
                message: "Company or store name is required",
            });
        }
        if let Some(password) = &self.password
            && password.expose_secret().len() < MIN_PASSWORD_LENGTH
        {
            errors.push(FieldError {
                field: "password",
                message: "Password must be at least 8 characters",
            });
        }
        if !self.accepted_terms {
            errors.push(FieldError {
                field: "terms",
                message: "Accept the terms to continue",
            });
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Errors a simulated submission can report. Both are recoverable: the form
/// stays on screen and waits for corrected input or a retry.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// A submission is already in flight; extra clicks are ignored.
    #[error("a submission is already in flight")]
    InFlight,

    /// The record failed validation.
    #[error("validation failed")]
    Invalid(Vec<FieldError>),
}

/// Simulated submission endpoint shared by the demo forms.
///
/// Holds the in-flight flag that debounces double-clicks on the submit
/// button.
pub struct FormEndpoint {
    latency: Duration,
    in_flight: AtomicBool,
}

impl FormEndpoint {
    /// Create an endpoint with the configured simulated latency.
    #[must_use]
    pub const fn new(latency: Duration) -> Self {
        Self {
            latency,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Submit a contact request.
    ///
    /// # Errors
    ///
    /// [`SubmitError::InFlight`] when another submission is pending,
    /// [`SubmitError::Invalid`] when validation fails.
    pub async fn submit_contact(&self, request: &ContactRequest) -> Result<&'static str, SubmitError> {
        let guard = self.begin()?;
        request.validate().map_err(SubmitError::Invalid)?;

        sleep(self.latency).await;
        drop(guard);
        info!(platform = ?request.platform, "contact request submitted");
        Ok(CONTACT_CONFIRMATION)
    }

    /// Submit a trial signup.
    ///
    /// # Errors
    ///
    /// [`SubmitError::InFlight`] when another submission is pending,
    /// [`SubmitError::Invalid`] when validation fails.
    pub async fn submit_trial(&self, signup: &TrialSignup) -> Result<(), SubmitError> {
        let guard = self.begin()?;
        signup.validate().map_err(SubmitError::Invalid)?;

        sleep(self.latency).await;
        drop(guard);
        info!(company = %signup.company, "trial signup submitted");
        Ok(())
    }

    fn begin(&self) -> Result<InFlightGuard<'_>, SubmitError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(SubmitError::InFlight);
        }
        Ok(InFlightGuard {
            flag: &self.in_flight,
        })
    }
}

/// Clears the in-flight flag when the submission finishes or is torn down
/// mid-sleep.
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
