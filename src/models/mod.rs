// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod activity;
pub mod form;
pub mod record;
pub mod view;

pub use activity::{
    Activity, ActivityDetails, ActivityKind, Coordinates, ValidationError, VariantField,
};
pub use form::{ActivityForm, NewActivity, RawField};
pub use record::{ActivityRecord, RecordError};
pub use view::{ActivityView, MetricView};
