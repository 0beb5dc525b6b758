//! Theme preference store.
//!
//! Light/dark preference persisted to the durable storage area so it
//! outlives the session. Resolution order at load: stored value, then the
//! operating-system preference, then light.

use core::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;
use tracing::warn;

use crate::storage::{SessionStorage, keys};

/// Color preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// The other theme.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Presentation tokens consumers feed into their CSS variables.
    #[must_use]
    pub const fn tokens(self) -> ThemeTokens {
        match self {
            Self::Light => ThemeTokens {
                background: "#f9fafb",
                text: "#111827",
                nav_background: "#f3f4f6",
                nav_text: "#111827",
            },
            Self::Dark => ThemeTokens {
                background: "#111827",
                text: "#f9fafb",
                nav_background: "#1f2937",
                nav_text: "#f9fafb",
            },
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Light => write!(f, "light"),
            Self::Dark => write!(f, "dark"),
        }
    }
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            _ => Err(format!("unknown theme token: {s}")),
        }
    }
}

/// Presentation color tokens for one theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeTokens {
    pub background: &'static str,
    pub text: &'static str,
    pub nav_background: &'static str,
    pub nav_text: &'static str,
}

/// Durable theme preference store.
pub struct ThemeStore {
    current: Mutex<Theme>,
    storage: Arc<dyn SessionStorage>,
    changed: watch::Sender<Theme>,
}

impl ThemeStore {
    /// Resolve the theme and build the store.
    ///
    /// A stored `"light"`/`"dark"` token wins; an absent or unrecognized
    /// token falls back to the operating-system preference, then light.
    /// Storage read failures degrade the same way.
    #[must_use]
    pub fn load(storage: Arc<dyn SessionStorage>, os_prefers_dark: bool) -> Self {
        let stored = match storage.get(keys::THEME) {
            Ok(stored) => stored,
            Err(e) => {
                warn!("failed to read theme preference: {e}");
                None
            }
        };
        let fallback = if os_prefers_dark {
            Theme::Dark
        } else {
            Theme::Light
        };
        let current = stored
            .and_then(|token| token.parse().ok())
            .unwrap_or(fallback);

        let (changed, _) = watch::channel(current);
        Self {
            current: Mutex::new(current),
            storage,
            changed,
        }
    }

    /// The active theme.
    #[must_use]
    pub fn current(&self) -> Theme {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Flip the theme, persist it durably, and notify subscribers.
    ///
    /// Persistence failures are logged and swallowed; the in-memory
    /// preference still flips. Returns the new theme.
    pub fn toggle(&self) -> Theme {
        let theme = {
            let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
            *current = current.toggled();
            *current
        };
        if let Err(e) = self.storage.set(keys::THEME, &theme.to_string()) {
            warn!("failed to persist theme preference: {e}");
        }
        self.changed.send_replace(theme);
        theme
    }

    /// Subscribe to theme changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Theme> {
        self.changed.subscribe()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_defaults_to_light() {
        let store = ThemeStore::load(Arc::new(MemoryStorage::new()), false);
        assert_eq!(store.current(), Theme::Light);
    }

    #[test]
    fn test_falls_back_to_os_preference() {
        let store = ThemeStore::load(Arc::new(MemoryStorage::new()), true);
        assert_eq!(store.current(), Theme::Dark);
    }

    #[test]
    fn test_stored_value_wins_over_os_preference() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(keys::THEME, "light").unwrap();

        let store = ThemeStore::load(storage, true);
        assert_eq!(store.current(), Theme::Light);
    }

    #[test]
    fn test_unrecognized_token_is_ignored() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(keys::THEME, "solarized").unwrap();

        let store = ThemeStore::load(storage, true);
        assert_eq!(store.current(), Theme::Dark);
    }

    #[test]
    fn test_toggle_persists_and_survives_reload() {
        let storage = Arc::new(MemoryStorage::new());
        let session: Arc<dyn SessionStorage> = storage.clone();

        let store = ThemeStore::load(session, false);
        assert_eq!(store.toggle(), Theme::Dark);
        assert_eq!(storage.get(keys::THEME).unwrap(), Some("dark".to_string()));
        drop(store);

        let reloaded = ThemeStore::load(storage, false);
        assert_eq!(reloaded.current(), Theme::Dark);
    }

    #[test]
    fn test_toggle_notifies_subscribers() {
        let store = ThemeStore::load(Arc::new(MemoryStorage::new()), false);
        let rx = store.subscribe();
        store.toggle();
        assert_eq!(*rx.borrow(), Theme::Dark);
    }

    #[test]
    fn test_tokens_differ_per_theme() {
        assert_eq!(Theme::Light.tokens().background, "#f9fafb");
        assert_eq!(Theme::Dark.tokens().background, "#111827");
        assert_ne!(Theme::Light.tokens(), Theme::Dark.tokens());
    }
}
