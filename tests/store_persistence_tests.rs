// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Save/restore tests for the activity store.
//!
//! A "fresh process" is simulated by building a new store over the same
//! storage backend and calling `load_all`.

use chrono::{Duration, TimeZone, Utc};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use workout_tracker::db::{keys, FileStore, KeyValueStore, MemoryStore};
use workout_tracker::models::{ActivityForm, ActivityKind, RecordError};
use workout_tracker::services::{ActivityStore, StoreError, StoreState};

/// Clock that advances one second per call.
fn ticking_store(storage: Arc<dyn KeyValueStore>) -> ActivityStore {
    let start = Utc.with_ymd_and_hms(2024, 5, 31, 23, 59, 59).unwrap();
    let tick = AtomicI64::new(0);
    ActivityStore::new(storage)
        .with_clock(move || start + Duration::seconds(tick.fetch_add(1, Ordering::SeqCst)))
}

#[test]
fn test_save_and_reload_in_fresh_process() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("data");
    let storage = FileStore::open(&dir).unwrap();

    let mut store = ticking_store(Arc::new(storage.clone()));
    store
        .create_activity(&ActivityForm::running(5.0, 30.0, &[10.0, 20.0], 150.0))
        .unwrap();
    store
        .create_activity(&ActivityForm::cycling(20.0, 60.0, &[1.0, 1.0], 100.0))
        .unwrap();
    store.save_all().unwrap();
    let before = store.list_activities();
    drop(store);

    let mut restored = ActivityStore::new(Arc::new(FileStore::open(&dir).unwrap()));
    assert_eq!(restored.state(), StoreState::Empty);
    assert_eq!(restored.load_all().unwrap(), 2);
    assert_eq!(restored.state(), StoreState::Populated);

    let after = restored.list_activities();
    assert_eq!(after, before);
    assert_eq!(after[0].kind(), ActivityKind::Running);
    assert_eq!(after[0].pace_min_per_km(), Some(6.0));
    assert_eq!(after[1].kind(), ActivityKind::Cycling);
    assert_eq!(after[1].speed_km_per_h(), Some(20.0));

    // Descriptions follow the stored timestamps, which straddle midnight
    assert_eq!(after[0].description(), "Running on May 31");
    assert_eq!(after[1].description(), "Cycling on June 1");
}

#[test]
fn test_round_trip_keeps_click_counts_and_timestamps() {
    let storage = MemoryStore::new();
    let mut store = ticking_store(Arc::new(storage.clone()));

    let mut ids = Vec::new();
    for _ in 0..3 {
        let activity = store
            .create_activity(&ActivityForm::cycling("12.5", "41", &[45.0, 7.5], "0"))
            .unwrap();
        ids.push(activity.id().to_string());
    }
    store.record_selection(&ids[1]);
    store.record_selection(&ids[1]);
    store.record_selection(&ids[2]);
    store.save_all().unwrap();
    let before = store.list_activities();

    let mut restored = ActivityStore::new(Arc::new(storage));
    restored.load_all().unwrap();
    let after = restored.list_activities();

    assert_eq!(after, before);
    let clicks: Vec<u32> = after.iter().map(|a| a.click_count()).collect();
    assert_eq!(clicks, [0, 2, 1]);
    let restored_ids: Vec<&str> = after.iter().map(|a| a.id()).collect();
    assert_eq!(restored_ids, ids);
}

#[test]
fn test_new_activities_after_reload_get_fresh_ids() {
    let storage = MemoryStore::new();
    let mut store = ticking_store(Arc::new(storage.clone()));
    let first = store
        .create_activity(&ActivityForm::running(5.0, 30.0, &[10.0, 20.0], 150.0))
        .unwrap();
    store.save_all().unwrap();

    // Clock stuck before the saved activity: new ids must still be unique and later
    let stale = first.created_at() - Duration::hours(1);
    let mut restored = ActivityStore::new(Arc::new(storage)).with_clock(move || stale);
    restored.load_all().unwrap();
    let second = restored
        .create_activity(&ActivityForm::running(3.0, 20.0, &[10.0, 20.0], 160.0))
        .unwrap();

    assert_ne!(second.id(), first.id());
    assert!(second.created_at() > first.created_at());
    assert_eq!(restored.len(), 2);
}

#[test]
fn test_reset_then_load_is_empty() {
    let storage = MemoryStore::new();
    let mut store = ticking_store(Arc::new(storage.clone()));
    store
        .create_activity(&ActivityForm::running(5.0, 30.0, &[10.0, 20.0], 150.0))
        .unwrap();
    store.save_all().unwrap();

    store.reset_all().unwrap();

    let mut restored = ActivityStore::new(Arc::new(storage.clone()));
    assert_eq!(restored.load_all().unwrap(), 0);
    assert_eq!(restored.state(), StoreState::Empty);
    assert!(storage.get(keys::WORKOUTS).unwrap().is_none());
}

#[test]
fn test_load_rejects_unknown_kind() {
    let storage = MemoryStore::new();
    storage
        .set(
            keys::WORKOUTS,
            r#"[{"id":"1","kind":"workout","distanceKm":1.0,"durationMin":1.0,
                "coordinates":[0.0,0.0],"createdAt":"2024-01-01T00:00:00Z","clickCount":0}]"#,
        )
        .unwrap();

    let mut store = ActivityStore::new(Arc::new(storage));
    assert!(matches!(store.load_all(), Err(StoreError::CorruptData(_))));
    assert_eq!(store.state(), StoreState::Empty);
}

#[test]
fn test_load_rejects_non_utf8_file_as_corrupt() {
    let tmp = tempfile::tempdir().unwrap();
    let storage = FileStore::open(tmp.path()).unwrap();
    std::fs::write(tmp.path().join("workouts.json"), [0x5b, 0xff, 0x5d]).unwrap();

    let mut store = ActivityStore::new(Arc::new(storage));
    assert!(matches!(
        store.load_all(),
        Err(StoreError::CorruptData(RecordError::Encoding(key))) if key == "workouts"
    ));
    assert_eq!(store.state(), StoreState::Empty);
}

#[test]
fn test_load_reports_unavailable_storage() {
    let mut store = ActivityStore::new(Arc::new(MemoryStore::new_unavailable()));
    assert!(matches!(
        store.load_all(),
        Err(StoreError::PersistenceUnavailable(_))
    ));
}
