// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity store: owns the session's activity collection.
//!
//! Handles the core workflow:
//! 1. Validate raw form input and build a new activity
//! 2. Append it to the ordered in-memory collection
//! 3. Persist / restore the whole collection through a key-value store
//! 4. Hand out read-only copies to renderers
//!
//! All methods are synchronous; callers serialize access through a single
//! owner (see `AppState`).

use crate::db::{keys, KeyValueStore, StorageError};
use crate::models::record::{decode_activities, encode_activities, RecordError};
use crate::models::{Activity, ActivityForm, ValidationError};
use crate::time_utils::id_from_timestamp;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::sync::Arc;

/// Source of creation timestamps.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Whether the store currently holds any activities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreState {
    Empty,
    Populated,
}

/// Owner of the ordered activity collection.
pub struct ActivityStore {
    storage: Arc<dyn KeyValueStore>,
    activities: Vec<Activity>,
    clock: Clock,
}

impl ActivityStore {
    /// Create an empty store. Nothing is read until [`load_all`](Self::load_all).
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            storage,
            activities: Vec::new(),
            clock: Arc::new(Utc::now),
        }
    }

    /// Replace the clock used to stamp new activities.
    pub fn with_clock<F>(mut self, clock: F) -> Self
    where
        F: Fn() -> DateTime<Utc> + Send + Sync + 'static,
    {
        self.clock = Arc::new(clock);
        self
    }

    pub fn state(&self) -> StoreState {
        if self.activities.is_empty() {
            StoreState::Empty
        } else {
            StoreState::Populated
        }
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    /// Validate a form submission and append the new activity.
    ///
    /// Does not persist; call [`save_all`](Self::save_all) afterwards.
    /// On error the collection is left unchanged.
    pub fn create_activity(&mut self, form: &ActivityForm) -> Result<Activity, ValidationError> {
        let input = form.parse()?;
        let created_at = self.next_created_at()?;

        let activity = Activity::new(
            input.distance_km,
            input.duration_min,
            input.coordinates,
            input.variant,
            created_at,
        )?;

        tracing::info!(
            id = activity.id(),
            kind = %activity.kind(),
            distance_km = activity.distance_km(),
            duration_min = activity.duration_min(),
            "Activity created"
        );

        self.activities.push(activity.clone());
        Ok(activity)
    }

    /// Copy of the collection in insertion order.
    pub fn list_activities(&self) -> Vec<Activity> {
        self.activities.clone()
    }

    pub fn find_by_id(&self, id: &str) -> Option<Activity> {
        self.activities.iter().find(|a| a.id() == id).cloned()
    }

    /// Bump the selection counter of the matching activity.
    ///
    /// Returns the updated copy, or `None` (and changes nothing) for an
    /// unknown id.
    pub fn record_selection(&mut self, id: &str) -> Option<Activity> {
        let Some(slot) = self.activities.iter_mut().find(|a| a.id() == id) else {
            tracing::debug!(id, "Selection for unknown activity ignored");
            return None;
        };

        *slot = slot.with_selection();
        tracing::debug!(id, clicks = slot.click_count(), "Activity selected");
        Some(slot.clone())
    }

    /// Persist the whole collection under the `workouts` key.
    pub fn save_all(&self) -> Result<(), StoreError> {
        let json = encode_activities(&self.activities)?;
        self.storage.set(keys::WORKOUTS, &json)?;
        tracing::debug!(count = self.activities.len(), "Activities saved");
        Ok(())
    }

    /// Replace the collection with the persisted one.
    ///
    /// A missing key yields an empty collection. Corrupt data is rejected as a
    /// whole and the current collection is kept.
    pub fn load_all(&mut self) -> Result<usize, StoreError> {
        let restored = match self.storage.get(keys::WORKOUTS)? {
            Some(json) => decode_activities(&json)?,
            None => Vec::new(),
        };

        self.activities = restored;
        tracing::info!(count = self.activities.len(), "Activities restored");
        Ok(self.activities.len())
    }

    /// Clear persisted data and the in-memory collection.
    ///
    /// Storage is cleared first; if that fails the collection is kept.
    pub fn reset_all(&mut self) -> Result<(), StoreError> {
        self.storage.remove(keys::WORKOUTS)?;
        let cleared = self.activities.len();
        self.activities.clear();
        tracing::info!(cleared, "All activities reset");
        Ok(())
    }

    /// Creation timestamp for the next activity, truncated to milliseconds
    /// and strictly later than every existing one so ids stay unique.
    fn next_created_at(&self) -> Result<DateTime<Utc>, ValidationError> {
        let step = Duration::milliseconds(1);
        let now = (self.clock)();
        let mut created_at =
            DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now);

        if let Some(newest) = self.activities.iter().map(Activity::created_at).max() {
            let floor = newest
                .checked_add_signed(step)
                .ok_or(ValidationError::TimestampOutOfRange)?;
            if created_at < floor {
                created_at = floor;
            }
        }

        while self
            .activities
            .iter()
            .any(|a| a.id() == id_from_timestamp(created_at))
        {
            created_at = created_at
                .checked_add_signed(step)
                .ok_or(ValidationError::TimestampOutOfRange)?;
        }

        Ok(created_at)
    }
}

/// Errors from store persistence.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Persistence unavailable: {0}")]
    PersistenceUnavailable(StorageError),

    #[error("Persisted activities are corrupt: {0}")]
    CorruptData(#[from] RecordError),
}

impl From<StorageError> for StoreError {
    fn from(err: StorageError) -> Self {
        match err {
            // Readable storage holding bytes that are not text
            StorageError::InvalidData { key } => {
                StoreError::CorruptData(RecordError::Encoding(key))
            }
            other => StoreError::PersistenceUnavailable(other),
        }
    }
}
