//! Store API credential types.
//!
//! Credentials entered in the setup wizard's advanced pane. The consumer
//! key and secret never appear in logs or `Debug` output.

use secrecy::{ExposeSecret, SecretString};

/// REST API credentials for a connected store.
///
/// Implements `Debug` manually to redact secret fields.
#[derive(Clone)]
pub struct ApiCredentials {
    /// Store API endpoint, when different from the public site URL.
    pub store_url: Option<String>,
    /// Consumer key.
    pub consumer_key: SecretString,
    /// Consumer secret.
    pub consumer_secret: SecretString,
}

impl ApiCredentials {
    /// Create credentials from the wizard's advanced-option fields.
    #[must_use]
    pub fn new(
        store_url: Option<String>,
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
    ) -> Self {
        Self {
            store_url,
            consumer_key: SecretString::from(consumer_key.into()),
            consumer_secret: SecretString::from(consumer_secret.into()),
        }
    }

    /// Whether all credential fields were left blank.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store_url.as_deref().is_none_or(str::is_empty)
            && self.consumer_key.expose_secret().is_empty()
            && self.consumer_secret.expose_secret().is_empty()
    }
}

impl std::fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiCredentials")
            .field("store_url", &self.store_url)
            .field("consumer_key", &"[REDACTED]")
            .field("consumer_secret", &"[REDACTED]")
            .finish()
    }
}
