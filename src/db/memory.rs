// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory key-value store, used by tests and ephemeral deployments.

use crate::db::{KeyValueStore, StorageError};
use dashmap::DashMap;
use std::sync::Arc;

/// Key-value store backed by a shared concurrent map.
///
/// Clones share the same entries, so a clone can stand in for "the same
/// browser storage" across simulated process restarts.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Option<Arc<DashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            entries: Some(Arc::new(DashMap::new())),
        }
    }

    /// Create a store that behaves like disabled storage.
    ///
    /// All operations will return [`StorageError::Unavailable`].
    pub fn new_unavailable() -> Self {
        Self { entries: None }
    }

    fn entries(&self) -> Result<&DashMap<String, String>, StorageError> {
        self.entries
            .as_deref()
            .ok_or_else(|| StorageError::Unavailable("storage disabled".to_string()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries()?.get(key).map(|v| v.value().clone()))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries()?.remove(key);
        Ok(())
    }
}
