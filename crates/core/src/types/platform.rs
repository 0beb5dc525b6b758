//! Supported e-commerce platforms.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown platform token.
#[derive(thiserror::Error, Debug, Clone)]
#[error("unsupported platform: {0}")]
pub struct PlatformError(String);

/// E-commerce platform a store can be connected from.
///
/// The wire tokens (`"woocommerce"`, `"shopify"`) match the values the
/// setup wizard's platform selector submits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    WooCommerce,
    Shopify,
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WooCommerce => write!(f, "woocommerce"),
            Self::Shopify => write!(f, "shopify"),
        }
    }
}

impl std::str::FromStr for Platform {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "woocommerce" => Ok(Self::WooCommerce),
            "shopify" => Ok(Self::Shopify),
            _ => Err(PlatformError(s.to_owned())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!("woocommerce".parse::<Platform>().unwrap(), Platform::WooCommerce);
        assert_eq!("shopify".parse::<Platform>().unwrap(), Platform::Shopify);
        assert!("magento".parse::<Platform>().is_err());
    }

    #[test]
    fn test_display_roundtrip() {
        for platform in [Platform::WooCommerce, Platform::Shopify] {
            let parsed: Platform = platform.to_string().parse().unwrap();
            assert_eq!(parsed, platform);
        }
    }

    #[test]
    fn test_serde_tokens() {
        let json = serde_json::to_string(&Platform::WooCommerce).unwrap();
        assert_eq!(json, "\"woocommerce\"");
        let parsed: Platform = serde_json::from_str("\"shopify\"").unwrap();
        assert_eq!(parsed, Platform::Shopify);
    }
}
