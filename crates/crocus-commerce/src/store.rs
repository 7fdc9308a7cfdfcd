//! Persistence plumbing shared by the domain stores.
//!
//! Every store wraps a [`crocus_cache::Persisted`] in a field named `inner`;
//! this macro gives it the sync surface.

/// Implement `status`, `storage_key`, `sync` and `rehydrate` for a store.
///
/// An optional `after_rehydrate = method` runs once a snapshot was loaded,
/// letting a store repair invariants in data written by older clients.
macro_rules! impl_persisted_store {
    (@impl $store:ty, $after:expr) => {
        impl $store {
            /// Durability of the in-memory state.
            pub fn status(&self) -> crocus_cache::SyncStatus {
                self.inner.status()
            }

            /// Key the snapshot is stored under.
            pub fn storage_key(&self) -> &str {
                self.inner.key()
            }

            /// Write the full snapshot if the state changed since the last write.
            pub async fn sync(&mut self) -> Result<(), crate::CommerceError> {
                self.inner.sync().await?;
                Ok(())
            }

            /// Replace the in-memory state with the persisted snapshot.
            ///
            /// Returns `false` when nothing was persisted yet.
            pub async fn rehydrate(&mut self) -> Result<bool, crate::CommerceError> {
                let loaded = self.inner.rehydrate().await?;
                if loaded {
                    let after = $after;
                    after(self);
                }
                Ok(loaded)
            }
        }
    };
    ($store:ty) => {
        impl_persisted_store!(@impl $store, |_store: &mut $store| {});
    };
    ($store:ty, after_rehydrate = $hook:ident) => {
        impl_persisted_store!(@impl $store, |store: &mut $store| store.$hook());
    };
}

pub(crate) use impl_persisted_store;
