//! Versioned full-state snapshots.

use serde::{Deserialize, Serialize};

use crate::CacheError;

/// Schema version written by this build.
///
/// Version 0 is the unversioned layout written by earlier clients
/// (`{"state": ..., "version": 0}`); it decodes with the same field names.
pub const SCHEMA_VERSION: u32 = 1;

/// One persisted copy of a store's entire state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Snapshot<S> {
    /// The store state.
    pub state: S,
    /// Schema version of `state`.
    #[serde(default)]
    pub version: u32,
}

impl<S> Snapshot<S> {
    /// Wrap state at the current schema version.
    pub fn new(state: S) -> Self {
        Self {
            state,
            version: SCHEMA_VERSION,
        }
    }

    /// Unwrap the state, rejecting snapshots from a newer schema.
    pub fn into_state(self, key: &str) -> Result<S, CacheError> {
        if self.version > SCHEMA_VERSION {
            return Err(CacheError::UnsupportedSchema {
                key: key.to_string(),
                found: self.version,
                supported: SCHEMA_VERSION,
            });
        }
        Ok(self.state)
    }
}
