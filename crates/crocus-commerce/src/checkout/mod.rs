//! Checkout module.
//!
//! Contains shipping rates, the totals calculator and order assembly.

mod order;
mod shipping;
mod totals;

pub use order::{build_order, Order, OrderRequest, OrderStatus, PaymentMethod};
pub use shipping::{ShippingMethod, ShippingRates};
pub use totals::{calculate_totals, CheckoutCalculator, CheckoutTotals, DEFAULT_TAX_RATE};
