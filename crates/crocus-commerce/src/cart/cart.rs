//! Cart state and line types.

use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::error::CommerceError;
use crate::ids::ProductId;

/// Composite identity of a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LineKey {
    pub product_id: ProductId,
    pub size: String,
    pub color: String,
}

impl LineKey {
    pub fn new(
        product_id: impl Into<ProductId>,
        size: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            size: size.into(),
            color: color.into(),
        }
    }
}

/// A line in the cart: one product in one size and color.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Product as it was when first added.
    pub product: Product,
    /// Quantity, always at least 1.
    pub quantity: u32,
    /// Selected size.
    pub size: String,
    /// Selected color.
    pub color: String,
}

impl CartLine {
    /// The line's composite key.
    pub fn key(&self) -> LineKey {
        LineKey::new(self.product.id.clone(), self.size.clone(), self.color.clone())
    }

    /// Whether this line is identified by `key`.
    pub fn matches(&self, key: &LineKey) -> bool {
        self.product.id == key.product_id && self.size == key.size && self.color == key.color
    }

    /// Price charged per unit.
    pub fn unit_price(&self) -> f64 {
        self.product.effective_price()
    }

    /// Unit price times quantity.
    pub fn line_total(&self) -> f64 {
        f64::from(self.quantity) * self.unit_price()
    }
}

/// Persisted cart state.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CartState {
    /// Lines in insertion order.
    pub items: Vec<CartLine>,
}

impl CartState {
    /// Add `quantity` units, merging into an existing line with the same key.
    ///
    /// Returns an error if:
    /// - Quantity is zero
    /// - The merged quantity would overflow
    pub fn add(
        &mut self,
        product: &Product,
        quantity: u32,
        size: &str,
        color: &str,
    ) -> Result<bool, CommerceError> {
        if quantity == 0 {
            return Err(CommerceError::InvalidQuantity(quantity));
        }

        let key = LineKey::new(product.id.clone(), size, color);
        if let Some(existing) = self.items.iter_mut().find(|l| l.matches(&key)) {
            existing.quantity = existing
                .quantity
                .checked_add(quantity)
                .ok_or(CommerceError::Overflow)?;
            return Ok(true);
        }

        self.items.push(CartLine {
            product: product.clone(),
            quantity,
            size: key.size,
            color: key.color,
        });
        Ok(true)
    }

    /// Remove the line with `key`.
    pub fn remove(&mut self, key: &LineKey) -> bool {
        let len_before = self.items.len();
        self.items.retain(|l| !l.matches(key));
        self.items.len() < len_before
    }

    /// Set a line's quantity. Zero removes the line.
    pub fn set_quantity(&mut self, key: &LineKey, quantity: u32) -> bool {
        if quantity == 0 {
            return self.remove(key);
        }

        match self.items.iter_mut().find(|l| l.matches(key)) {
            Some(line) if line.quantity != quantity => {
                line.quantity = quantity;
                true
            }
            _ => false,
        }
    }

    /// Remove every line.
    pub fn clear(&mut self) -> bool {
        if self.items.is_empty() {
            return false;
        }
        self.items.clear();
        true
    }

    /// Get a line by key.
    pub fn line(&self, key: &LineKey) -> Option<&CartLine> {
        self.items.iter().find(|l| l.matches(key))
    }

    /// Sum of line totals, recomputed on every call.
    pub fn subtotal(&self) -> f64 {
        self.items.iter().map(CartLine::line_total).sum()
    }

    /// Total units across all lines.
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|l| u64::from(l.quantity)).sum()
    }

    /// Merge lines sharing a key and drop zero-quantity lines, keeping the
    /// position of each key's first line. Returns whether anything changed.
    pub fn normalize(&mut self) -> bool {
        let mut merged: Vec<CartLine> = Vec::with_capacity(self.items.len());
        let mut changed = false;

        for line in self.items.drain(..) {
            if line.quantity == 0 {
                changed = true;
                continue;
            }
            let key = line.key();
            match merged.iter_mut().find(|l| l.matches(&key)) {
                Some(existing) => {
                    existing.quantity = existing.quantity.saturating_add(line.quantity);
                    changed = true;
                }
                None => merged.push(line),
            }
        }

        self.items = merged;
        changed
    }
}
