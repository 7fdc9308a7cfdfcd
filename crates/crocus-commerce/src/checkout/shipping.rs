//! Shipping methods and their flat fees.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Delivery speed chosen at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ShippingMethod {
    /// Standard delivery.
    #[default]
    Standard,
    /// Express delivery.
    Express,
}

impl ShippingMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShippingMethod::Standard => "standard",
            ShippingMethod::Express => "express",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ShippingMethod::Standard => "Standard delivery",
            ShippingMethod::Express => "Express delivery",
        }
    }

    /// Get delivery estimate string.
    pub fn delivery_estimate(&self) -> &'static str {
        match self {
            ShippingMethod::Standard => "3-5 days",
            ShippingMethod::Express => "1-2 days",
        }
    }
}

impl FromStr for ShippingMethod {
    type Err = ();

    /// Case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "standard" => Ok(ShippingMethod::Standard),
            "express" => Ok(ShippingMethod::Express),
            _ => Err(()),
        }
    }
}

/// Flat fee per shipping method, in currency units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShippingRates {
    pub standard: f64,
    pub express: f64,
}

impl ShippingRates {
    /// Fee for `method`.
    pub fn cost(&self, method: ShippingMethod) -> f64 {
        match method {
            ShippingMethod::Standard => self.standard,
            ShippingMethod::Express => self.express,
        }
    }
}

impl Default for ShippingRates {
    fn default() -> Self {
        Self {
            standard: 15_000.0,
            express: 29_000.0,
        }
    }
}
