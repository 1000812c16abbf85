// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Raw activity form input and its coercion into typed values.

use crate::models::activity::{ActivityKind, Coordinates, ValidationError, VariantField};
use serde::Deserialize;
use serde_json::Value;

/// A single untyped form value: numeric, text to be parsed, or anything else
/// the UI happened to send (booleans, arrays, objects).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawField {
    Number(f64),
    Text(String),
    Other(Value),
}

impl RawField {
    /// Parse as a finite number. Blank text counts as missing.
    fn as_finite(&self) -> Option<f64> {
        let value = match self {
            RawField::Number(n) => *n,
            RawField::Text(s) => parse_text(s)?,
            RawField::Other(_) => return None,
        };
        value.is_finite().then_some(value)
    }
}

fn parse_text(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Finite number from a JSON number or numeric string.
fn finite_from_value(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => parse_text(s)?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

impl From<f64> for RawField {
    fn from(value: f64) -> Self {
        RawField::Number(value)
    }
}

impl From<&str> for RawField {
    fn from(value: &str) -> Self {
        RawField::Text(value.to_string())
    }
}

/// Form submission as handed over by the UI after a map click.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActivityForm {
    #[serde(default)]
    pub kind: Option<RawField>,
    #[serde(default)]
    pub distance: Option<RawField>,
    #[serde(default)]
    pub duration: Option<RawField>,
    /// Running only; ignored for rides
    #[serde(default)]
    pub cadence: Option<RawField>,
    /// Cycling only; ignored for runs
    #[serde(default)]
    pub elevation: Option<RawField>,
    /// Clicked map position as `[lat, lng]` (numbers or numeric strings)
    #[serde(default)]
    pub coordinates: Option<RawField>,
}

/// Typed, range-checked creation input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewActivity {
    pub distance_km: f64,
    pub duration_min: f64,
    pub coordinates: Coordinates,
    pub variant: VariantField,
}

impl ActivityForm {
    pub fn running(
        distance: impl Into<RawField>,
        duration: impl Into<RawField>,
        coordinates: &[f64],
        cadence: impl Into<RawField>,
    ) -> Self {
        Self {
            kind: Some(ActivityKind::Running.as_str().into()),
            distance: Some(distance.into()),
            duration: Some(duration.into()),
            cadence: Some(cadence.into()),
            elevation: None,
            coordinates: Some(RawField::Other(Value::from(coordinates.to_vec()))),
        }
    }

    pub fn cycling(
        distance: impl Into<RawField>,
        duration: impl Into<RawField>,
        coordinates: &[f64],
        elevation: impl Into<RawField>,
    ) -> Self {
        Self {
            kind: Some(ActivityKind::Cycling.as_str().into()),
            distance: Some(distance.into()),
            duration: Some(duration.into()),
            cadence: None,
            elevation: Some(elevation.into()),
            coordinates: Some(RawField::Other(Value::from(coordinates.to_vec()))),
        }
    }

    /// Validate every field against the explicit `kind`.
    ///
    /// Checks run in order: kind, distance, duration, coordinates, variant field.
    pub fn parse(&self) -> Result<NewActivity, ValidationError> {
        let kind = parse_kind(self.kind.as_ref())?;

        let distance_km = positive(self.distance.as_ref(), "distance")?;
        let duration_min = positive(self.duration.as_ref(), "duration")?;
        let coordinates = parse_coordinates(self.coordinates.as_ref())?;

        let variant = match kind {
            ActivityKind::Running => {
                let cadence = self
                    .cadence
                    .as_ref()
                    .and_then(RawField::as_finite)
                    .filter(|c| *c > 0.0)
                    .ok_or(ValidationError::InvalidVariantField {
                        field: "cadence",
                        reason: "must be a positive number",
                    })?;
                VariantField::CadenceSpm(cadence)
            }
            ActivityKind::Cycling => {
                let elevation = self
                    .elevation
                    .as_ref()
                    .and_then(RawField::as_finite)
                    .filter(|e| *e >= 0.0)
                    .ok_or(ValidationError::InvalidVariantField {
                        field: "elevation",
                        reason: "must be a non-negative number",
                    })?;
                VariantField::ElevationGainM(elevation)
            }
        };

        Ok(NewActivity {
            distance_km,
            duration_min,
            coordinates,
            variant,
        })
    }
}

fn parse_kind(field: Option<&RawField>) -> Result<ActivityKind, ValidationError> {
    match field {
        Some(RawField::Text(s)) => s.parse(),
        Some(RawField::Number(n)) => Err(ValidationError::UnknownKind(n.to_string())),
        Some(RawField::Other(v)) => Err(ValidationError::UnknownKind(v.to_string())),
        None => Err(ValidationError::UnknownKind(String::new())),
    }
}

/// Coordinates must arrive as a two-element array.
fn parse_coordinates(field: Option<&RawField>) -> Result<Coordinates, ValidationError> {
    let Some(RawField::Other(Value::Array(items))) = field else {
        return Err(ValidationError::InvalidCoordinates);
    };
    let values: Vec<f64> = items
        .iter()
        .map(finite_from_value)
        .collect::<Option<_>>()
        .ok_or(ValidationError::InvalidCoordinates)?;
    Coordinates::from_slice(&values)
}

fn positive(field: Option<&RawField>, name: &'static str) -> Result<f64, ValidationError> {
    field
        .and_then(RawField::as_finite)
        .filter(|v| *v > 0.0)
        .ok_or(ValidationError::InvalidMeasurement(name))
}
