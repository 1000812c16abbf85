// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Persisted activity record layout.
//!
//! The stored value is a JSON array of flat records, one per activity, each
//! tagged with `kind`. Only the variant field matching the tag is present.

use crate::models::activity::{Activity, ActivityKind, Coordinates, ValidationError, VariantField};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Flat, serializable form of an [`Activity`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRecord {
    pub id: String,
    /// Kept as a raw string so unknown tags surface as a typed error
    pub kind: String,
    pub distance_km: f64,
    pub duration_min: f64,
    pub coordinates: [f64; 2],
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub click_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cadence_spm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation_gain_m: Option<f64>,
}

impl From<&Activity> for ActivityRecord {
    fn from(activity: &Activity) -> Self {
        let (cadence_spm, elevation_gain_m) = match activity.variant_field() {
            VariantField::CadenceSpm(c) => (Some(c), None),
            VariantField::ElevationGainM(e) => (None, Some(e)),
        };

        Self {
            id: activity.id().to_string(),
            kind: activity.kind().as_str().to_string(),
            distance_km: activity.distance_km(),
            duration_min: activity.duration_min(),
            coordinates: activity.coordinates().into(),
            created_at: activity.created_at(),
            click_count: activity.click_count(),
            cadence_spm,
            elevation_gain_m,
        }
    }
}

impl TryFrom<ActivityRecord> for Activity {
    type Error = RecordError;

    fn try_from(record: ActivityRecord) -> Result<Self, Self::Error> {
        let kind: ActivityKind = record
            .kind
            .parse()
            .map_err(|_| RecordError::UnknownKind(record.kind.clone()))?;

        let variant = match kind {
            ActivityKind::Running => {
                if record.elevation_gain_m.is_some() {
                    return Err(RecordError::UnexpectedField {
                        id: record.id,
                        field: "elevationGainM",
                    });
                }
                let cadence = record.cadence_spm.ok_or_else(|| RecordError::MissingField {
                    id: record.id.clone(),
                    field: "cadenceSpm",
                })?;
                VariantField::CadenceSpm(cadence)
            }
            ActivityKind::Cycling => {
                if record.cadence_spm.is_some() {
                    return Err(RecordError::UnexpectedField {
                        id: record.id,
                        field: "cadenceSpm",
                    });
                }
                let elevation =
                    record
                        .elevation_gain_m
                        .ok_or_else(|| RecordError::MissingField {
                            id: record.id.clone(),
                            field: "elevationGainM",
                        })?;
                VariantField::ElevationGainM(elevation)
            }
        };

        if record.id.is_empty() {
            return Err(RecordError::MissingField {
                id: record.id,
                field: "id",
            });
        }

        let coordinates = Coordinates::try_from(record.coordinates).map_err(|source| {
            RecordError::Invalid {
                id: record.id.clone(),
                source,
            }
        })?;

        Activity::restore(
            record.id.clone(),
            record.created_at,
            record.click_count,
            record.distance_km,
            record.duration_min,
            coordinates,
            variant,
        )
        .map_err(|source| RecordError::Invalid {
            id: record.id,
            source,
        })
    }
}

/// Serialize an ordered collection to the persisted JSON array.
pub fn encode_activities(activities: &[Activity]) -> Result<String, RecordError> {
    let records: Vec<ActivityRecord> = activities.iter().map(ActivityRecord::from).collect();
    serde_json::to_string(&records).map_err(|e| RecordError::Json(e.to_string()))
}

/// Parse a persisted JSON array back into activities, in stored order.
///
/// Fails on the first malformed record; ids must be unique.
pub fn decode_activities(json: &str) -> Result<Vec<Activity>, RecordError> {
    let records: Vec<ActivityRecord> =
        serde_json::from_str(json).map_err(|e| RecordError::Json(e.to_string()))?;

    let mut seen = HashSet::with_capacity(records.len());
    let mut activities = Vec::with_capacity(records.len());
    for record in records {
        if !seen.insert(record.id.clone()) {
            return Err(RecordError::DuplicateId(record.id));
        }
        activities.push(Activity::try_from(record)?);
    }
    Ok(activities)
}

/// Errors from decoding persisted records.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("Malformed activity data: {0}")]
    Json(String),

    #[error("Unrecognized activity kind: {0:?}")]
    UnknownKind(String),

    #[error("Activity {id:?} is missing field {field}")]
    MissingField { id: String, field: &'static str },

    #[error("Activity {id:?} has unexpected field {field}")]
    UnexpectedField { id: String, field: &'static str },

    #[error("Activity {id:?} is invalid: {source}")]
    Invalid {
        id: String,
        #[source]
        source: ValidationError,
    },

    #[error("Duplicate activity id: {0:?}")]
    DuplicateId(String),

    #[error("Stored value for {0:?} is not valid UTF-8")]
    Encoding(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_run() -> Activity {
        let created = Utc.timestamp_millis_opt(1_712_000_000_456).unwrap();
        Activity::running(5.0, 30.0, Coordinates::new(10.0, 20.0).unwrap(), 150.0, created)
            .unwrap()
    }

    #[test]
    fn test_record_layout_for_running() {
        let json = serde_json::to_value(ActivityRecord::from(&sample_run())).unwrap();

        assert_eq!(json["id"], "1712000000456");
        assert_eq!(json["kind"], "running");
        assert_eq!(json["distanceKm"], 5.0);
        assert_eq!(json["durationMin"], 30.0);
        assert_eq!(json["coordinates"], serde_json::json!([10.0, 20.0]));
        assert_eq!(json["createdAt"], "2024-04-01T19:33:20.456Z");
        assert_eq!(json["clickCount"], 0);
        assert_eq!(json["cadenceSpm"], 150.0);
        assert!(json.get("elevationGainM").is_none());
    }

    #[test]
    fn test_decode_restores_stored_fields() {
        let json = r#"[{
            "id": "abc",
            "kind": "cycling",
            "distanceKm": 20.0,
            "durationMin": 60.0,
            "coordinates": [1.0, 1.0],
            "createdAt": "2024-03-05T08:00:00Z",
            "clickCount": 7,
            "elevationGainM": 100.0
        }]"#;

        let activities = decode_activities(json).unwrap();
        assert_eq!(activities.len(), 1);
        let ride = &activities[0];
        assert_eq!(ride.id(), "abc");
        assert_eq!(ride.click_count(), 7);
        assert_eq!(ride.speed_km_per_h(), Some(20.0));
        assert_eq!(ride.description(), "Cycling on March 5");
    }

    #[test]
    fn test_decode_rejects_unknown_kind() {
        let json = r#"[{"id":"1","kind":"workout","distanceKm":1.0,"durationMin":1.0,
            "coordinates":[0.0,0.0],"createdAt":"2024-01-01T00:00:00Z"}]"#;
        assert!(matches!(
            decode_activities(json),
            Err(RecordError::UnknownKind(k)) if k == "workout"
        ));
    }

    #[test]
    fn test_decode_rejects_mixed_variant_fields() {
        let json = r#"[{"id":"1","kind":"running","distanceKm":1.0,"durationMin":1.0,
            "coordinates":[0.0,0.0],"createdAt":"2024-01-01T00:00:00Z",
            "cadenceSpm":150.0,"elevationGainM":5.0}]"#;
        assert!(matches!(
            decode_activities(json),
            Err(RecordError::UnexpectedField { .. })
        ));
    }

    #[test]
    fn test_decode_rejects_missing_variant_field() {
        let json = r#"[{"id":"1","kind":"cycling","distanceKm":1.0,"durationMin":1.0,
            "coordinates":[0.0,0.0],"createdAt":"2024-01-01T00:00:00Z"}]"#;
        assert!(matches!(
            decode_activities(json),
            Err(RecordError::MissingField {
                field: "elevationGainM",
                ..
            })
        ));
    }

    #[test]
    fn test_decode_rejects_invalid_measurement() {
        let json = r#"[{"id":"1","kind":"running","distanceKm":0.0,"durationMin":1.0,
            "coordinates":[0.0,0.0],"createdAt":"2024-01-01T00:00:00Z","cadenceSpm":150.0}]"#;
        assert!(matches!(
            decode_activities(json),
            Err(RecordError::Invalid {
                source: ValidationError::InvalidMeasurement("distance"),
                ..
            })
        ));
    }

    #[test]
    fn test_decode_rejects_far_future_timestamp() {
        let json = r#"[{"id":"1","kind":"running","distanceKm":5.0,"durationMin":30.0,
            "coordinates":[10.0,20.0],"createdAt":"+262142-12-31T23:59:59.999Z",
            "cadenceSpm":150.0}]"#;
        assert!(matches!(
            decode_activities(json),
            Err(RecordError::Invalid {
                source: ValidationError::TimestampOutOfRange,
                ..
            })
        ));
    }

    #[test]
    fn test_decode_rejects_duplicate_ids() {
        let run = sample_run();
        let json = encode_activities(&[run.clone(), run]).unwrap();
        assert!(matches!(
            decode_activities(&json),
            Err(RecordError::DuplicateId(_))
        ));
    }

    #[test]
    fn test_decode_rejects_non_array() {
        assert!(matches!(
            decode_activities("{}"),
            Err(RecordError::Json(_))
        ));
    }

    #[test]
    fn test_encode_decode_preserves_order_and_fields() {
        let first = sample_run().with_selection();
        let second = Activity::cycling(
            12.5,
            40.0,
            Coordinates::new(-33.9, 151.2).unwrap(),
            230.0,
            Utc.timestamp_millis_opt(1_712_000_001_000).unwrap(),
        )
        .unwrap();

        let json = encode_activities(&[first.clone(), second.clone()]).unwrap();
        let decoded = decode_activities(&json).unwrap();

        assert_eq!(decoded, vec![first, second]);
    }
}
