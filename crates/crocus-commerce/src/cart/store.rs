//! Cart store.

use crocus_cache::{Cache, Persisted};
use tracing::{debug, warn};

use crate::cart::{CartLine, CartState, LineKey};
use crate::catalog::Product;
use crate::error::CommerceError;
use crate::store::impl_persisted_store;

/// The shopping cart, persisted as one snapshot.
///
/// # Example
///
/// ```rust,ignore
/// let mut cart = CartStore::new(cache, "cart-storage");
/// cart.rehydrate().await?;
/// cart.add_item(&product, 2, "M", "Red")?;
/// assert_eq!(cart.item_count(), 2);
/// cart.sync().await?;
/// ```
#[derive(Debug)]
pub struct CartStore {
    inner: Persisted<CartState>,
}

impl CartStore {
    /// Create an empty cart persisted under `key`.
    pub fn new(cache: Cache, key: impl Into<String>) -> Self {
        Self {
            inner: Persisted::new(cache, key),
        }
    }

    /// Add units of a product variant, merging with an existing line.
    pub fn add_item(
        &mut self,
        product: &Product,
        quantity: u32,
        size: &str,
        color: &str,
    ) -> Result<(), CommerceError> {
        self.inner
            .try_mutate(|cart| cart.add(product, quantity, size, color))?;
        debug!(product_id = %product.id, size, color, quantity, "added to cart");
        Ok(())
    }

    /// Remove a line. Returns `false` if no line matched.
    pub fn remove_item(&mut self, key: &LineKey) -> bool {
        let removed = self.inner.mutate(|cart| cart.remove(key));
        if removed {
            debug!(product_id = %key.product_id, size = %key.size, color = %key.color, "removed cart line");
        }
        removed
    }

    /// Set a line's quantity directly. Zero removes the line.
    pub fn update_quantity(&mut self, key: &LineKey, quantity: u32) -> bool {
        self.inner.mutate(|cart| cart.set_quantity(key, quantity))
    }

    /// Add one unit to an existing line.
    pub fn increment(&mut self, key: &LineKey) -> Result<bool, CommerceError> {
        self.inner.try_mutate(|cart| match cart.line(key) {
            Some(line) => {
                let quantity = line.quantity.checked_add(1).ok_or(CommerceError::Overflow)?;
                Ok(cart.set_quantity(key, quantity))
            }
            None => Ok(false),
        })
    }

    /// Take one unit off a line; the last unit removes the line.
    pub fn decrement(&mut self, key: &LineKey) -> bool {
        self.inner.mutate(|cart| match cart.line(key) {
            Some(line) => {
                let quantity = line.quantity.saturating_sub(1);
                cart.set_quantity(key, quantity)
            }
            None => false,
        })
    }

    /// Remove every line.
    pub fn clear_cart(&mut self) -> bool {
        self.inner.mutate(CartState::clear)
    }

    /// Lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.inner.state().items
    }

    pub fn line(&self, key: &LineKey) -> Option<&CartLine> {
        self.inner.state().line(key)
    }

    /// Sum of `quantity * effective price` over all lines.
    pub fn subtotal(&self) -> f64 {
        self.inner.state().subtotal()
    }

    /// Total units across all lines.
    pub fn item_count(&self) -> u64 {
        self.inner.state().item_count()
    }

    pub fn unique_line_count(&self) -> usize {
        self.lines().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines().is_empty()
    }
}

impl CartStore {
    fn normalize_after_rehydrate(&mut self) {
        let lines_before = self.unique_line_count();
        if self.inner.mutate(CartState::normalize) {
            warn!(
                lines_before,
                lines_after = self.unique_line_count(),
                "repaired duplicate or empty lines in stored cart"
            );
        }
    }
}

impl_persisted_store!(CartStore, after_rehydrate = normalize_after_rehydrate);
