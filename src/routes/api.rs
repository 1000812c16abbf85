// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity API routes.
//!
//! These mirror the map frontend's events: a form submit after a map click
//! creates an activity, clicking a list entry selects one, and the reset
//! button wipes everything.

use crate::error::{AppError, Result};
use crate::models::{ActivityForm, ActivityView};
use crate::services::ActivityStore;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;

/// Activity routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/activities",
            get(list_activities)
                .post(create_activity)
                .delete(reset_activities),
        )
        .route("/api/activities/{id}", get(get_activity))
        .route("/api/activities/{id}/select", post(select_activity))
}

/// Run `f` against the store on the blocking pool.
///
/// Store persistence does synchronous file I/O, so it stays off the async
/// worker threads. The store lock is held for the whole closure.
async fn with_store<T, F>(state: Arc<AppState>, f: F) -> Result<T>
where
    F: FnOnce(&mut ActivityStore) -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let mut store = state.store.blocking_lock();
        f(&mut store)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("Store task failed: {}", e)))?
}

/// List all activities in the order they were logged.
async fn list_activities(State(state): State<Arc<AppState>>) -> Result<Json<Vec<ActivityView>>> {
    let views = with_store(state, |store| {
        Ok(store
            .list_activities()
            .iter()
            .map(ActivityView::from)
            .collect())
    })
    .await?;
    Ok(Json(views))
}

/// Create an activity from a submitted form and persist the collection.
///
/// If persisting fails the activity is still kept for this session and the
/// caller gets a 503.
async fn create_activity(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<ActivityForm>, JsonRejection>,
) -> Result<(StatusCode, Json<ActivityView>)> {
    let Json(form) = payload?;

    let view = with_store(state, move |store| {
        let activity = store.create_activity(&form).inspect_err(|err| {
            tracing::info!(kind = ?form.kind, error = %err, "Rejected activity form");
        })?;
        store.save_all()?;
        Ok(ActivityView::from(&activity))
    })
    .await?;

    Ok((StatusCode::CREATED, Json(view)))
}

async fn get_activity(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ActivityView>> {
    let view = with_store(state, move |store| {
        store
            .find_by_id(&id)
            .map(|activity| ActivityView::from(&activity))
            .ok_or_else(|| AppError::NotFound(format!("Activity {} not found", id)))
    })
    .await?;
    Ok(Json(view))
}

/// Record that the user picked an activity in the list.
async fn select_activity(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ActivityView>> {
    let view = with_store(state, move |store| {
        let activity = store
            .record_selection(&id)
            .ok_or_else(|| AppError::NotFound(format!("Activity {} not found", id)))?;
        store.save_all()?;
        Ok(ActivityView::from(&activity))
    })
    .await?;
    Ok(Json(view))
}

/// Delete every activity, persisted and in memory.
async fn reset_activities(State(state): State<Arc<AppState>>) -> Result<StatusCode> {
    with_store(state, |store| Ok(store.reset_all()?)).await?;
    Ok(StatusCode::NO_CONTENT)
}
