//! Storefront configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::checkout::{CheckoutCalculator, ShippingRates, DEFAULT_TAX_RATE};
use crate::social::LikePolicy;
use crate::voucher::DEFAULT_DAILY_SPINS;

/// Storefront configuration file. Every field has a default.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StorefrontConfig {
    /// Where and under which keys the stores persist.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Shipping fees and tax.
    #[serde(default)]
    pub checkout: CheckoutConfig,

    /// Spin wheel settings.
    #[serde(default)]
    pub vouchers: VoucherConfig,

    /// Social feed settings.
    #[serde(default)]
    pub social: SocialConfig,
}

impl StorefrontConfig {
    /// Load config from a file; `.json` files are parsed as JSON, anything
    /// else as TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))
        } else {
            Self::from_toml_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
        }
    }

    /// Parse TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Calculator for the configured fees and tax rate.
    pub fn calculator(&self) -> CheckoutCalculator {
        CheckoutCalculator::new(
            ShippingRates {
                standard: self.checkout.standard_fee,
                express: self.checkout.express_fee,
            },
            self.checkout.tax_rate,
        )
    }
}

/// Storage keys and location.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    pub cart_key: String,
    pub wishlist_key: String,
    pub user_key: String,
    pub posts_key: String,
    /// Directory for the file-backed store; in-memory when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            cart_key: "cart-storage".to_string(),
            wishlist_key: "wishlist-storage".to_string(),
            user_key: "user-storage".to_string(),
            posts_key: "posts-storage".to_string(),
            data_dir: None,
        }
    }
}

/// Checkout fees.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CheckoutConfig {
    pub tax_rate: f64,
    pub standard_fee: f64,
    pub express_fee: f64,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        let rates = ShippingRates::default();
        Self {
            tax_rate: DEFAULT_TAX_RATE,
            standard_fee: rates.standard,
            express_fee: rates.express,
        }
    }
}

/// Spin wheel settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VoucherConfig {
    /// Spins granted per user per day.
    pub daily_spins: u32,
}

impl Default for VoucherConfig {
    fn default() -> Self {
        Self {
            daily_spins: DEFAULT_DAILY_SPINS,
        }
    }
}

/// Social feed settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SocialConfig {
    pub like_policy: LikePolicy,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = StorefrontConfig::default();
        assert_eq!(config.storage.cart_key, "cart-storage");
        assert_eq!(config.checkout.tax_rate, 0.08);
        assert_eq!(config.vouchers.daily_spins, 3);
        assert_eq!(config.social.like_policy, LikePolicy::Tally);
        assert!(config.storage.data_dir.is_none());
    }

    #[test]
    fn test_partial_toml() {
        let config = StorefrontConfig::from_toml_str(
            r#"
            [checkout]
            express_fee = 35000

            [social]
            like_policy = "idempotent"
            "#,
        )
        .unwrap();

        assert_eq!(config.checkout.express_fee, 35_000.0);
        assert_eq!(config.checkout.standard_fee, 15_000.0);
        assert_eq!(config.social.like_policy, LikePolicy::Idempotent);
        assert_eq!(config.storage.posts_key, "posts-storage");
    }

    #[test]
    fn test_invalid_toml() {
        assert!(StorefrontConfig::from_toml_str("[social]\nlike_policy = \"hearts\"").is_err());
    }

    #[test]
    fn test_load_json_by_extension() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"vouchers": {{"daily_spins": 5}}}}"#).unwrap();

        let config = StorefrontConfig::load(file.path()).unwrap();
        assert_eq!(config.vouchers.daily_spins, 5);
    }

    #[test]
    fn test_load_missing_file() {
        let err = StorefrontConfig::load("/nonexistent/crocus.toml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_calculator_uses_configured_fees() {
        let mut config = StorefrontConfig::default();
        config.checkout.tax_rate = 0.1;
        config.checkout.standard_fee = 10.0;

        let totals = config
            .calculator()
            .totals(100.0, crate::checkout::ShippingMethod::Standard);
        assert_eq!(totals.total, 120.0);
    }
}
