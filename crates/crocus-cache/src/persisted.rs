//! In-memory state with explicit durability tracking.

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::{Cache, CacheError, Snapshot};

/// Durability of a store's in-memory state relative to the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SyncStatus {
    /// The cache holds the current state.
    #[default]
    Synced,
    /// The state changed since the last successful write.
    Dirty,
    /// A write is in flight.
    Syncing,
}

impl SyncStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncStatus::Synced => "synced",
            SyncStatus::Dirty => "dirty",
            SyncStatus::Syncing => "syncing",
        }
    }
}

impl std::fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Store state persisted as one snapshot under one key.
///
/// Mutations apply to memory immediately and mark the state dirty;
/// [`Persisted::sync`] writes the full snapshot and reports failures.
///
/// # Example
///
/// ```rust,ignore
/// let mut wishlist = Persisted::<WishlistState>::new(cache, "wishlist-storage");
/// wishlist.rehydrate().await?;
/// wishlist.mutate(|s| s.insert(product));
/// wishlist.sync().await?;
/// ```
#[derive(Debug)]
pub struct Persisted<S> {
    state: S,
    cache: Cache,
    key: String,
    status: SyncStatus,
}

impl<S> Persisted<S>
where
    S: Serialize + DeserializeOwned + Default,
{
    /// Start from the default state; nothing is read until [`Self::rehydrate`].
    pub fn new(cache: Cache, key: impl Into<String>) -> Self {
        Self {
            state: S::default(),
            cache,
            key: key.into(),
            status: SyncStatus::Synced,
        }
    }

    /// Current in-memory state.
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Storage key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Current sync status.
    pub fn status(&self) -> SyncStatus {
        self.status
    }

    /// Whether memory is ahead of the cache.
    pub fn is_dirty(&self) -> bool {
        self.status != SyncStatus::Synced
    }

    /// Apply `f`; the state is marked dirty when it reports a change.
    pub fn mutate<F>(&mut self, f: F) -> bool
    where
        F: FnOnce(&mut S) -> bool,
    {
        let changed = f(&mut self.state);
        if changed {
            self.status = SyncStatus::Dirty;
        }
        changed
    }

    /// Fallible variant of [`Self::mutate`]. Errors never mark the state dirty.
    pub fn try_mutate<F, E>(&mut self, f: F) -> Result<bool, E>
    where
        F: FnOnce(&mut S) -> Result<bool, E>,
    {
        let changed = f(&mut self.state)?;
        if changed {
            self.status = SyncStatus::Dirty;
        }
        Ok(changed)
    }

    /// Replace the whole state.
    pub fn replace(&mut self, state: S) {
        self.state = state;
        self.status = SyncStatus::Dirty;
    }

    /// Write the full snapshot if memory is ahead of the cache.
    pub async fn sync(&mut self) -> Result<(), CacheError> {
        if self.status == SyncStatus::Synced {
            return Ok(());
        }

        self.status = SyncStatus::Syncing;
        let result = self.cache.set(&self.key, &Snapshot::new(&self.state)).await;

        match result {
            Ok(()) => {
                self.status = SyncStatus::Synced;
                debug!(key = %self.key, "snapshot written");
                Ok(())
            }
            Err(e) => {
                self.status = SyncStatus::Dirty;
                warn!(key = %self.key, error = %e, "snapshot write failed");
                Err(e)
            }
        }
    }

    /// Load the persisted snapshot, replacing the in-memory state.
    ///
    /// Returns `false` (state untouched) when nothing was persisted yet.
    pub async fn rehydrate(&mut self) -> Result<bool, CacheError> {
        let Some(snapshot) = self.cache.get::<Snapshot<S>>(&self.key).await? else {
            debug!(key = %self.key, "no snapshot to rehydrate");
            return Ok(false);
        };

        let version = snapshot.version;
        self.state = snapshot.into_state(&self.key)?;
        self.status = SyncStatus::Synced;
        debug!(key = %self.key, version, "rehydrated snapshot");
        Ok(true)
    }

    /// Drop the state and its persisted snapshot.
    pub async fn reset(&mut self) -> Result<(), CacheError> {
        self.state = S::default();
        self.cache.delete(&self.key).await?;
        self.status = SyncStatus::Synced;
        Ok(())
    }
}
