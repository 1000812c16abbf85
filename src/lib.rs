// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Workout-Tracker: log runs and rides dropped on a map.
//!
//! This crate provides the activity model, the session activity store with
//! its key-value persistence, and a small JSON API for the map frontend.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use services::ActivityStore;
use tokio::sync::Mutex;

/// Shared application state.
///
/// The mutex makes the store the single logical owner of every mutation.
/// Handlers take it with `blocking_lock` from the blocking pool, since store
/// persistence does synchronous file I/O.
pub struct AppState {
    pub config: Config,
    pub store: Mutex<ActivityStore>,
}

impl AppState {
    pub fn new(config: Config, store: ActivityStore) -> Self {
        Self {
            config,
            store: Mutex::new(store),
        }
    }
}
