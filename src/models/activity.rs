// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Activity model: a logged run or ride with its derived metrics.
//!
//! Activities are immutable once built. The only post-creation change is a
//! bumped selection counter, which produces a new value (see
//! [`Activity::with_selection`]).

use crate::time_utils::{id_from_timestamp, month_day_label};
use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Activity discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum ActivityKind {
    Running,
    Cycling,
}

impl ActivityKind {
    /// Wire name ("running" / "cycling").
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::Running => "running",
            ActivityKind::Cycling => "cycling",
        }
    }

    /// Human-readable label used in descriptions.
    pub fn label(&self) -> &'static str {
        match self {
            ActivityKind::Running => "Running",
            ActivityKind::Cycling => "Cycling",
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "running" => Ok(ActivityKind::Running),
            "cycling" => Ok(ActivityKind::Cycling),
            other => Err(ValidationError::UnknownKind(other.to_string())),
        }
    }
}

/// Latitude/longitude pair. Serialized as `[lat, lng]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinates {
    lat: f64,
    lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Result<Self, ValidationError> {
        if !lat.is_finite() || !lng.is_finite() {
            return Err(ValidationError::InvalidCoordinates);
        }
        Ok(Self { lat, lng })
    }

    /// Build from a raw slice handed over by the map; must be exactly `[lat, lng]`.
    pub fn from_slice(values: &[f64]) -> Result<Self, ValidationError> {
        match values {
            [lat, lng] => Self::new(*lat, *lng),
            _ => Err(ValidationError::InvalidCoordinates),
        }
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lng(&self) -> f64 {
        self.lng
    }
}

impl TryFrom<[f64; 2]> for Coordinates {
    type Error = ValidationError;

    fn try_from([lat, lng]: [f64; 2]) -> Result<Self, Self::Error> {
        Self::new(lat, lng)
    }
}

impl From<Coordinates> for [f64; 2] {
    fn from(c: Coordinates) -> Self {
        [c.lat, c.lng]
    }
}

/// Activity-type-specific measurement supplied at creation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VariantField {
    /// Running cadence (steps per minute)
    CadenceSpm(f64),
    /// Cycling elevation gain (meters)
    ElevationGainM(f64),
}

impl VariantField {
    pub fn kind(&self) -> ActivityKind {
        match self {
            VariantField::CadenceSpm(_) => ActivityKind::Running,
            VariantField::ElevationGainM(_) => ActivityKind::Cycling,
        }
    }
}

/// Variant payload with its derived metric, computed once at construction.
#[derive(Debug, Clone, PartialEq)]
pub enum ActivityDetails {
    Running {
        cadence_spm: f64,
        pace_min_per_km: f64,
    },
    Cycling {
        elevation_gain_m: f64,
        speed_km_per_h: f64,
    },
}

/// A single logged activity.
#[derive(Debug, Clone, PartialEq)]
pub struct Activity {
    id: String,
    distance_km: f64,
    duration_min: f64,
    coordinates: Coordinates,
    created_at: DateTime<Utc>,
    click_count: u32,
    details: ActivityDetails,
}

impl Activity {
    /// Build a new activity created at `created_at`.
    ///
    /// The id is derived from the creation timestamp; the caller is
    /// responsible for handing in distinct timestamps when ids must be unique.
    pub fn new(
        distance_km: f64,
        duration_min: f64,
        coordinates: Coordinates,
        variant: VariantField,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        Self::build(
            id_from_timestamp(created_at),
            created_at,
            0,
            distance_km,
            duration_min,
            coordinates,
            variant,
        )
    }

    pub fn running(
        distance_km: f64,
        duration_min: f64,
        coordinates: Coordinates,
        cadence_spm: f64,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        Self::new(
            distance_km,
            duration_min,
            coordinates,
            VariantField::CadenceSpm(cadence_spm),
            created_at,
        )
    }

    pub fn cycling(
        distance_km: f64,
        duration_min: f64,
        coordinates: Coordinates,
        elevation_gain_m: f64,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        Self::new(
            distance_km,
            duration_min,
            coordinates,
            VariantField::ElevationGainM(elevation_gain_m),
            created_at,
        )
    }

    /// Rebuild a persisted activity, keeping its id, timestamp and click count.
    pub(crate) fn restore(
        id: String,
        created_at: DateTime<Utc>,
        click_count: u32,
        distance_km: f64,
        duration_min: f64,
        coordinates: Coordinates,
        variant: VariantField,
    ) -> Result<Self, ValidationError> {
        Self::build(
            id,
            created_at,
            click_count,
            distance_km,
            duration_min,
            coordinates,
            variant,
        )
    }

    fn build(
        id: String,
        created_at: DateTime<Utc>,
        click_count: u32,
        distance_km: f64,
        duration_min: f64,
        coordinates: Coordinates,
        variant: VariantField,
    ) -> Result<Self, ValidationError> {
        // Ids and persisted timestamps assume a four-digit RFC 3339 year
        if !(0..=9999).contains(&created_at.year()) {
            return Err(ValidationError::TimestampOutOfRange);
        }
        check_positive("distance", distance_km)?;
        check_positive("duration", duration_min)?;

        let details = match variant {
            VariantField::CadenceSpm(cadence_spm) => {
                if !cadence_spm.is_finite() || cadence_spm <= 0.0 {
                    return Err(ValidationError::InvalidVariantField {
                        field: "cadence",
                        reason: "must be a positive number",
                    });
                }
                ActivityDetails::Running {
                    cadence_spm,
                    pace_min_per_km: duration_min / distance_km,
                }
            }
            VariantField::ElevationGainM(elevation_gain_m) => {
                if !elevation_gain_m.is_finite() || elevation_gain_m < 0.0 {
                    return Err(ValidationError::InvalidVariantField {
                        field: "elevation",
                        reason: "must be a non-negative number",
                    });
                }
                ActivityDetails::Cycling {
                    elevation_gain_m,
                    speed_km_per_h: distance_km / (duration_min / 60.0),
                }
            }
        };

        Ok(Self {
            id,
            distance_km,
            duration_min,
            coordinates,
            created_at,
            click_count,
            details,
        })
    }

    /// Copy of this activity with the selection counter bumped.
    pub fn with_selection(&self) -> Self {
        Self {
            click_count: self.click_count.saturating_add(1),
            ..self.clone()
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> ActivityKind {
        match self.details {
            ActivityDetails::Running { .. } => ActivityKind::Running,
            ActivityDetails::Cycling { .. } => ActivityKind::Cycling,
        }
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_km
    }

    pub fn duration_min(&self) -> f64 {
        self.duration_min
    }

    pub fn coordinates(&self) -> Coordinates {
        self.coordinates
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn click_count(&self) -> u32 {
        self.click_count
    }

    pub fn details(&self) -> &ActivityDetails {
        &self.details
    }

    /// The variant field this activity was created with.
    pub fn variant_field(&self) -> VariantField {
        match self.details {
            ActivityDetails::Running { cadence_spm, .. } => VariantField::CadenceSpm(cadence_spm),
            ActivityDetails::Cycling {
                elevation_gain_m, ..
            } => VariantField::ElevationGainM(elevation_gain_m),
        }
    }

    /// Pace in min/km (running only).
    pub fn pace_min_per_km(&self) -> Option<f64> {
        match self.details {
            ActivityDetails::Running {
                pace_min_per_km, ..
            } => Some(pace_min_per_km),
            ActivityDetails::Cycling { .. } => None,
        }
    }

    /// Speed in km/h (cycling only).
    pub fn speed_km_per_h(&self) -> Option<f64> {
        match self.details {
            ActivityDetails::Cycling { speed_km_per_h, .. } => Some(speed_km_per_h),
            ActivityDetails::Running { .. } => None,
        }
    }

    /// Primary derived metric: pace for runs, speed for rides.
    pub fn primary_metric(&self) -> f64 {
        match self.details {
            ActivityDetails::Running {
                pace_min_per_km, ..
            } => pace_min_per_km,
            ActivityDetails::Cycling { speed_km_per_h, .. } => speed_km_per_h,
        }
    }

    /// Label such as "Running on April 14".
    pub fn description(&self) -> String {
        format!(
            "{} on {}",
            self.kind().label(),
            month_day_label(self.created_at)
        )
    }
}

fn check_positive(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::InvalidMeasurement(field))
    }
}

/// Rejected activity input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid {0}: must be a positive number")]
    InvalidMeasurement(&'static str),

    #[error("Invalid coordinates: expected a [lat, lng] pair of finite numbers")]
    InvalidCoordinates,

    #[error("Invalid {field}: {reason}")]
    InvalidVariantField {
        field: &'static str,
        reason: &'static str,
    },

    #[error("Unknown activity kind: {0:?}")]
    UnknownKind(String),

    #[error("Creation time is outside years 0000-9999")]
    TimestampOutOfRange,
}

impl ValidationError {
    /// Stable machine-readable code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::InvalidMeasurement(_) => "invalid_measurement",
            ValidationError::InvalidCoordinates => "invalid_coordinates",
            ValidationError::InvalidVariantField { .. } => "invalid_variant_field",
            ValidationError::UnknownKind(_) => "unknown_kind",
            ValidationError::TimestampOutOfRange => "timestamp_out_of_range",
        }
    }
}
