//! Order types and order assembly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::account::{Address, User};
use crate::cart::CartLine;
use crate::checkout::{CheckoutCalculator, ShippingMethod};
use crate::error::CommerceError;
use crate::ids::{AddressId, OrderId, UserId};

/// Order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Order placed, awaiting processing.
    #[default]
    Pending,
    /// Order being prepared.
    Processing,
    /// Order shipped.
    Shipped,
    /// Order delivered.
    Delivered,
    /// Order cancelled.
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Processing => "Processing",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    /// Check if order is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Check if order can be cancelled.
    pub fn can_cancel(&self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::Processing)
    }
}

/// How the shopper pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PaymentMethod {
    #[default]
    #[serde(rename = "credit_card")]
    CreditCard,
    #[serde(rename = "paypal")]
    PayPal,
    #[serde(rename = "cash")]
    CashOnDelivery,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "credit_card",
            PaymentMethod::PayPal => "paypal",
            PaymentMethod::CashOnDelivery => "cash",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "Credit card",
            PaymentMethod::PayPal => "PayPal",
            PaymentMethod::CashOnDelivery => "Cash on delivery",
        }
    }
}

/// Choices made on the checkout screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderRequest {
    /// Address to ship to; `None` uses the default (else first) address.
    pub address_id: Option<AddressId>,
    pub shipping: ShippingMethod,
    pub payment: PaymentMethod,
}

impl OrderRequest {
    pub fn new(shipping: ShippingMethod, payment: PaymentMethod) -> Self {
        Self {
            address_id: None,
            shipping,
            payment,
        }
    }

    pub fn with_address(mut self, address_id: impl Into<AddressId>) -> Self {
        self.address_id = Some(address_id.into());
        self
    }
}

/// A placed order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Unique order identifier.
    pub id: OrderId,
    /// Customer user ID.
    pub user_id: UserId,
    /// Cart lines at the time of ordering.
    pub items: Vec<CartLine>,
    /// Order status.
    pub status: OrderStatus,
    /// Shipping address.
    pub shipping_address: Address,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub shipping_method: ShippingMethod,
    pub subtotal: f64,
    pub shipping_cost: f64,
    pub tax: f64,
    /// Grand total charged.
    pub total: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Generate a new order number.
    pub fn generate_order_id() -> OrderId {
        OrderId::new(format!("ORD-{}", OrderId::generate()))
    }

    /// Get total item count.
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|l| u64::from(l.quantity)).sum()
    }

    /// Cancel the order.
    pub fn cancel(&mut self) -> bool {
        if !self.status.can_cancel() {
            return false;
        }
        self.set_status(OrderStatus::Cancelled);
        true
    }

    /// Update order status.
    pub fn set_status(&mut self, status: OrderStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }
}

/// Assemble an order from the cart and the logged-in user.
///
/// Returns an error if:
/// - No user is logged in
/// - The cart is empty
/// - The requested address is unknown, or the user has no address
pub fn build_order(
    lines: &[CartLine],
    user: Option<&User>,
    request: &OrderRequest,
    calculator: &CheckoutCalculator,
) -> Result<Order, CommerceError> {
    let user = user.ok_or(CommerceError::NotAuthenticated)?;

    if lines.is_empty() {
        return Err(CommerceError::CheckoutIncomplete("cart items".to_string()));
    }

    let address = match &request.address_id {
        Some(id) => user.addresses.get(id),
        None => user.addresses.shipping_address(),
    }
    .ok_or_else(|| CommerceError::CheckoutIncomplete("shipping address".to_string()))?;

    let subtotal: f64 = lines.iter().map(CartLine::line_total).sum();
    let totals = calculator.totals(subtotal, request.shipping);
    let now = Utc::now();

    let order = Order {
        id: Order::generate_order_id(),
        user_id: user.id.clone(),
        items: lines.to_vec(),
        status: OrderStatus::Pending,
        shipping_address: address.clone(),
        payment_method: request.payment,
        shipping_method: request.shipping,
        subtotal: totals.subtotal,
        shipping_cost: totals.shipping,
        tax: totals.tax,
        total: totals.total,
        created_at: now,
        updated_at: now,
    };
    debug!(order_id = %order.id, total = order.total, "order assembled");
    Ok(order)
}
