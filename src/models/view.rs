// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Read-only activity snapshot for the map marker and list renderers.

use crate::models::activity::{Activity, ActivityDetails, ActivityKind};
use crate::time_utils::format_utc_rfc3339;
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// A labelled measurement (value, unit, formatted text).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MetricView {
    /// "pace", "speed", "cadence" or "elevation"
    pub name: String,
    pub value: f64,
    pub unit: String,
    pub display: String,
}

/// Everything a renderer needs to draw one activity.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ActivityView {
    pub id: String,
    pub kind: ActivityKind,
    pub description: String,
    pub icon: String,
    pub distance_km: f64,
    pub duration_min: f64,
    pub coordinates: [f64; 2],
    /// RFC3339
    pub created_at: String,
    pub click_count: u32,
    /// Pace (runs) or speed (rides)
    pub primary_metric: MetricView,
    /// Cadence (runs) or elevation gain (rides)
    pub detail: MetricView,
    /// CSS class for the marker popup
    pub popup_class: String,
}

impl From<&Activity> for ActivityView {
    fn from(activity: &Activity) -> Self {
        let (primary_metric, detail) = match *activity.details() {
            ActivityDetails::Running {
                cadence_spm,
                pace_min_per_km,
            } => (
                metric("pace", pace_min_per_km, "min/km", 1),
                metric("cadence", cadence_spm, "spm", 0),
            ),
            ActivityDetails::Cycling {
                elevation_gain_m,
                speed_km_per_h,
            } => (
                metric("speed", speed_km_per_h, "km/h", 1),
                metric("elevation", elevation_gain_m, "m", 0),
            ),
        };

        let kind = activity.kind();
        Self {
            id: activity.id().to_string(),
            kind,
            description: activity.description(),
            icon: icon(kind).to_string(),
            distance_km: activity.distance_km(),
            duration_min: activity.duration_min(),
            coordinates: activity.coordinates().into(),
            created_at: format_utc_rfc3339(activity.created_at()),
            click_count: activity.click_count(),
            primary_metric,
            detail,
            popup_class: format!("{}-popup", kind.as_str()),
        }
    }
}

fn icon(kind: ActivityKind) -> &'static str {
    match kind {
        ActivityKind::Running => "🏃",
        ActivityKind::Cycling => "🚴",
    }
}

fn metric(name: &str, value: f64, unit: &str, decimals: usize) -> MetricView {
    MetricView {
        name: name.to_string(),
        value,
        unit: unit.to_string(),
        display: format!("{:.*}", decimals, value),
    }
}
