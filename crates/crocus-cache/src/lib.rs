//! Key-value persistence layer for the Crocus storefront stores.
//!
//! Every domain store keeps its whole state in memory and persists it as one
//! versioned JSON snapshot under its own key.
//!
//! # Example
//!
//! ```rust,ignore
//! use crocus_cache::{Cache, Persisted};
//!
//! let cache = Cache::open_dir("./data").await?;
//! let mut cart = Persisted::<CartState>::new(cache, "cart-storage");
//!
//! // Load whatever the last session left behind
//! cart.rehydrate().await?;
//!
//! // Mutate in memory, then write the snapshot
//! cart.mutate(|state| state.clear());
//! cart.sync().await?;
//! ```

mod error;
mod file;
mod kv;
mod memory;
mod persisted;
mod snapshot;

pub use error::CacheError;
pub use file::FileStore;
pub use kv::{Cache, KvStore};
pub use memory::MemoryStore;
pub use persisted::{Persisted, SyncStatus};
pub use snapshot::{Snapshot, SCHEMA_VERSION};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, KvStore, Persisted, Snapshot, SyncStatus};
}
