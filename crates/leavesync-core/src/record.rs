//! Interchange records for intervals.
//!
//! Collaborators that persist or transmit collections exchange flat JSON
//! records instead of the algebra's own types:
//!
//! ```json
//! { "category": "holiday", "start_date": "2000-01-01", "end_date": "2000-01-05",
//!   "half_day_at_start": true, "half_day_at_end": false }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::collection::IntervalCollection;
use crate::error::{IntervalError, Result};
use crate::interval::{EndBoundary, StartBoundary, TemporalInterval};

/// Flat, unvalidated form of a [`TemporalInterval`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalRecord {
    pub category: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub half_day_at_start: bool,
    #[serde(default)]
    pub half_day_at_end: bool,
}

impl TryFrom<IntervalRecord> for TemporalInterval {
    type Error = IntervalError;

    fn try_from(record: IntervalRecord) -> Result<Self, Self::Error> {
        TemporalInterval::parse(
            &record.category,
            &record.start_date,
            &record.end_date,
            StartBoundary::from_half(record.half_day_at_start),
            EndBoundary::from_half(record.half_day_at_end),
        )
    }
}

impl From<TemporalInterval> for IntervalRecord {
    fn from(interval: TemporalInterval) -> Self {
        Self {
            category: interval.category().as_str().to_string(),
            start_date: interval.start_date().format("%Y-%m-%d").to_string(),
            end_date: interval.end_date().format("%Y-%m-%d").to_string(),
            half_day_at_start: interval.start_boundary().is_half(),
            half_day_at_end: interval.end_boundary().is_half(),
        }
    }
}

/// Collections keyed by an opaque person identity.
pub type PeopleIntervals = BTreeMap<String, IntervalCollection>;

/// Parse a JSON list of records into a collection.
///
/// # Errors
/// Returns an error if the JSON is malformed or any record fails validation.
pub fn collection_from_json(json: &str) -> Result<IntervalCollection> {
    Ok(serde_json::from_str(json)?)
}

/// Parse a JSON object mapping person keys to record lists.
///
/// # Errors
/// Returns an error if the JSON is malformed or any record fails validation.
pub fn people_from_json(json: &str) -> Result<PeopleIntervals> {
    Ok(serde_json::from_str(json)?)
}
