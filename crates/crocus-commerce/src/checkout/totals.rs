//! Checkout totals.

use serde::{Deserialize, Serialize};

use crate::checkout::{ShippingMethod, ShippingRates};

/// Default sales tax rate.
pub const DEFAULT_TAX_RATE: f64 = 0.08;

/// Order summary shown on the checkout screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CheckoutTotals {
    pub subtotal: f64,
    pub shipping: f64,
    pub tax: f64,
    pub total: f64,
}

/// `total = subtotal + shipping(method) + subtotal * tax_rate`.
///
/// No rounding is applied; display formatting is the caller's concern.
pub fn calculate_totals(
    subtotal: f64,
    method: ShippingMethod,
    rates: &ShippingRates,
    tax_rate: f64,
) -> CheckoutTotals {
    let shipping = rates.cost(method);
    let tax = subtotal * tax_rate;
    CheckoutTotals {
        subtotal,
        shipping,
        tax,
        total: subtotal + shipping + tax,
    }
}

/// Shipping table and tax rate bundled for repeated use.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CheckoutCalculator {
    pub rates: ShippingRates,
    pub tax_rate: f64,
}

impl CheckoutCalculator {
    pub fn new(rates: ShippingRates, tax_rate: f64) -> Self {
        Self { rates, tax_rate }
    }

    pub fn totals(&self, subtotal: f64, method: ShippingMethod) -> CheckoutTotals {
        calculate_totals(subtotal, method, &self.rates, self.tax_rate)
    }
}

impl Default for CheckoutCalculator {
    fn default() -> Self {
        Self::new(ShippingRates::default(), DEFAULT_TAX_RATE)
    }
}
