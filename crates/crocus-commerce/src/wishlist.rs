//! Wishlist store: a deduplicated set of saved products.

use std::collections::HashSet;

use crocus_cache::{Cache, Persisted};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::catalog::Product;
use crate::ids::ProductId;
use crate::store::impl_persisted_store;

/// Persisted wishlist state.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WishlistState {
    /// Saved products, oldest first, at most one per id.
    pub items: Vec<Product>,
}

impl WishlistState {
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.items.iter().any(|p| &p.id == product_id)
    }

    /// Insert unless the id is already present.
    pub fn insert(&mut self, product: &Product) -> bool {
        if self.contains(&product.id) {
            return false;
        }
        self.items.push(product.clone());
        true
    }

    pub fn remove(&mut self, product_id: &ProductId) -> bool {
        let len_before = self.items.len();
        self.items.retain(|p| &p.id != product_id);
        self.items.len() < len_before
    }

    /// Drop repeated ids, keeping the first entry of each.
    pub fn dedupe(&mut self) -> bool {
        let len_before = self.items.len();
        let mut seen = HashSet::new();
        self.items.retain(|p| seen.insert(p.id.clone()));
        self.items.len() < len_before
    }
}

/// Products the user saved for later.
#[derive(Debug)]
pub struct WishlistStore {
    inner: Persisted<WishlistState>,
}

impl WishlistStore {
    /// Create an empty wishlist persisted under `key`.
    pub fn new(cache: Cache, key: impl Into<String>) -> Self {
        Self {
            inner: Persisted::new(cache, key),
        }
    }

    /// Save a product. No-op if it is already saved.
    pub fn add_item(&mut self, product: &Product) -> bool {
        self.inner.mutate(|w| w.insert(product))
    }

    /// Drop a product. No-op if it is not saved.
    pub fn remove_item(&mut self, product_id: &ProductId) -> bool {
        self.inner.mutate(|w| w.remove(product_id))
    }

    /// Flip membership and return whether the product is now saved.
    pub fn toggle(&mut self, product: &Product) -> bool {
        let saved = !self.is_in_wishlist(&product.id);
        self.inner.mutate(|w| {
            if saved {
                w.insert(product)
            } else {
                w.remove(&product.id)
            }
        });
        debug!(product_id = %product.id, saved, "wishlist toggled");
        saved
    }

    pub fn is_in_wishlist(&self, product_id: &ProductId) -> bool {
        self.inner.state().contains(product_id)
    }

    /// Remove every saved product.
    pub fn clear_wishlist(&mut self) -> bool {
        self.inner.mutate(|w| {
            let had_items = !w.items.is_empty();
            w.items.clear();
            had_items
        })
    }

    pub fn items(&self) -> &[Product] {
        &self.inner.state().items
    }

    pub fn len(&self) -> usize {
        self.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }
}

impl WishlistStore {
    fn dedupe_after_rehydrate(&mut self) {
        if self.inner.mutate(WishlistState::dedupe) {
            warn!(items = self.len(), "dropped repeated products from stored wishlist");
        }
    }
}

impl_persisted_store!(WishlistStore, after_rehydrate = dedupe_after_rehydrate);
