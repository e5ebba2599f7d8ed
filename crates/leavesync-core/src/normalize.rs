//! Normalization of already-fetched platform records into intervals.
//!
//! Fetching is the collaborators' job; this module decides what each raw
//! record means: its category, its dates and whether it is a half day.
//! Records that cannot be turned into an interval are skipped with a
//! [`Skip`] diagnostic rather than failing the whole batch.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::collection::IntervalCollection;
use crate::config::SyncConfig;
use crate::error::IntervalError;
use crate::interval::{parse_date, Category, EndBoundary, StartBoundary, TemporalInterval};
use crate::record::PeopleIntervals;
use crate::working_time::WorkingTime;

/// Kind of leave record on the HR platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Absence,
    Sickness,
    Training,
}

/// A raw leave record from the HR platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRecord {
    pub kind: SourceKind,
    pub person: String,
    #[serde(default)]
    pub absence_type: Option<String>,
    #[serde(default)]
    pub leave_reason: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub half_start: bool,
    #[serde(default)]
    pub half_end: bool,
}

/// A raw booking from the project-management platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetBooking {
    #[serde(default)]
    pub id: Option<String>,
    pub person: String,
    pub event: String,
    pub started_on: String,
    pub ended_on: String,
    /// Booked minutes per day
    #[serde(default)]
    pub minutes: Option<u32>,
}

/// Why a record produced no interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    IgnoredLeaveReason { leave_reason: String },
    MissingDate { field: String },
    UnknownTargetEvent { event: String },
    MissingMinutes,
    Invalid { message: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IgnoredLeaveReason { leave_reason } => {
                write!(f, "leave reason '{leave_reason}' is ignored")
            }
            Self::MissingDate { field } => write!(f, "missing {field}"),
            Self::UnknownTargetEvent { event } => write!(f, "no category maps to event '{event}'"),
            Self::MissingMinutes => f.write_str("booking has no time"),
            Self::Invalid { message } => f.write_str(message),
        }
    }
}

impl From<IntervalError> for SkipReason {
    fn from(err: IntervalError) -> Self {
        Self::Invalid {
            message: err.to_string(),
        }
    }
}

/// One skipped record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Skip {
    pub person: String,
    #[serde(flatten)]
    pub reason: SkipReason,
}

/// Intervals grouped per person, plus what had to be skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Normalized {
    pub people: PeopleIntervals,
    pub skipped: Vec<Skip>,
}

/// Person keys are compared case-insensitively.
pub fn person_key(person: &str) -> String {
    person.trim().to_lowercase()
}

#[derive(Default)]
struct Grouper {
    people: BTreeMap<String, Vec<TemporalInterval>>,
    skipped: Vec<Skip>,
}

impl Grouper {
    fn add(&mut self, person: &str, result: Result<TemporalInterval, SkipReason>) {
        let key = person_key(person);
        let group = self.people.entry(key.clone()).or_default();

        match result {
            Ok(interval) => group.push(interval),
            Err(reason) => {
                warn!(person = %key, %reason, "skipping record");
                self.skipped.push(Skip { person: key, reason });
            }
        }
    }

    fn finish(self) -> Normalized {
        Normalized {
            people: self
                .people
                .into_iter()
                .map(|(person, intervals)| (person, IntervalCollection::new(intervals)))
                .collect(),
            skipped: self.skipped,
        }
    }
}

/// Maps raw platform records to intervals using a [`SyncConfig`].
#[derive(Debug, Clone, Copy)]
pub struct Normalizer<'a> {
    config: &'a SyncConfig,
}

impl<'a> Normalizer<'a> {
    pub fn new(config: &'a SyncConfig) -> Self {
        Self { config }
    }

    /// Normalize HR records.
    ///
    /// Ongoing sicknesses (no end date) are closed at `as_of`.
    pub fn normalize_source(&self, records: &[SourceRecord], as_of: NaiveDate) -> Normalized {
        let mut grouper = Grouper::default();
        for record in records {
            grouper.add(&record.person, self.source_interval(record, as_of));
        }
        grouper.finish()
    }

    /// Normalize target bookings.
    ///
    /// A single-day booking of at most half the day's working minutes is a
    /// half day; anything longer, and every multi-day booking, is full days.
    pub fn normalize_target<W: WorkingTime + ?Sized>(
        &self,
        bookings: &[TargetBooking],
        working_time: &mut W,
    ) -> Normalized {
        let mut grouper = Grouper::default();
        for booking in bookings {
            grouper.add(&booking.person, self.target_interval(booking, working_time));
        }
        grouper.finish()
    }

    fn source_interval(
        &self,
        record: &SourceRecord,
        as_of: NaiveDate,
    ) -> Result<TemporalInterval, SkipReason> {
        let category = match record.kind {
            SourceKind::Absence => {
                if self.config.is_ignored_reason(record.leave_reason.as_deref()) {
                    return Err(SkipReason::IgnoredLeaveReason {
                        leave_reason: record.leave_reason.clone().unwrap_or_default(),
                    });
                }
                self.config
                    .category_for_absence_type(record.absence_type.as_deref())
            }
            SourceKind::Sickness => Category::Sickness,
            SourceKind::Training => Category::OtherLeave,
        };

        let start_date = required_date(record.start_date.as_deref(), "start_date")?;
        let end_date = match (record.kind, record.end_date.as_deref()) {
            (SourceKind::Sickness, None) => as_of,
            (_, end) => required_date(end, "end_date")?,
        };

        Ok(TemporalInterval::new(
            category,
            start_date,
            end_date,
            StartBoundary::from_half(record.half_start),
            EndBoundary::from_half(record.half_end),
        )?)
    }

    fn target_interval<W: WorkingTime + ?Sized>(
        &self,
        booking: &TargetBooking,
        working_time: &mut W,
    ) -> Result<TemporalInterval, SkipReason> {
        let category = self
            .config
            .category_for_target_event(&booking.event)
            .ok_or_else(|| SkipReason::UnknownTargetEvent {
                event: booking.event.clone(),
            })?;
        let minutes = booking.minutes.ok_or(SkipReason::MissingMinutes)?;

        let start_date = parse_date(&booking.started_on)?;
        let end_date = parse_date(&booking.ended_on)?;

        let half_day = start_date == end_date
            && minutes <= working_time.working_minutes(&person_key(&booking.person), start_date) / 2;

        Ok(TemporalInterval::new(
            category,
            start_date,
            end_date,
            StartBoundary::from_half(half_day),
            EndBoundary::from_half(half_day),
        )?)
    }
}

fn required_date(text: Option<&str>, field: &str) -> Result<NaiveDate, SkipReason> {
    let text = text.ok_or_else(|| SkipReason::MissingDate {
        field: field.to_string(),
    })?;
    Ok(parse_date(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn config() -> SyncConfig {
        let mut config = SyncConfig::default();
        config.categories.insert("Holiday".into(), Category::Holiday);
        config.categories.insert("Unpaid leave".into(), Category::OtherUnplanned);
        config.ignored_reasons.push("Jury service".into());
        config.target_categories.insert("holiday".into(), "Holiday".into());
        config.target_categories.insert("sickness".into(), "Sick".into());
        config
    }

    fn record(kind: SourceKind, person: &str, start: Option<&str>, end: Option<&str>) -> SourceRecord {
        SourceRecord {
            kind,
            person: person.to_string(),
            absence_type: None,
            leave_reason: None,
            start_date: start.map(str::to_string),
            end_date: end.map(str::to_string),
            half_start: false,
            half_end: false,
        }
    }

    fn booking(person: &str, event: &str, start: &str, end: &str, minutes: Option<u32>) -> TargetBooking {
        TargetBooking {
            id: None,
            person: person.to_string(),
            event: event.to_string(),
            started_on: start.to_string(),
            ended_on: end.to_string(),
            minutes,
        }
    }

    #[test]
    fn test_absence_uses_category_mapping_and_fallback() {
        let config = config();
        let mut mapped = record(SourceKind::Absence, "Ada@Example.com", Some("2000-01-01"), Some("2000-01-03"));
        mapped.absence_type = Some("Holiday".into());
        mapped.half_start = true;
        let mut unmapped = record(SourceKind::Absence, "ada@example.com", Some("2000-02-01"), Some("2000-02-01"));
        unmapped.absence_type = Some("Compassionate".into());

        let normalized = Normalizer::new(&config).normalize_source(&[mapped, unmapped], date(2000, 6, 1));

        let ada = &normalized.people["ada@example.com"];
        assert_eq!(ada.len(), 2);
        assert_eq!(ada.items()[0].category(), Category::Holiday);
        assert_eq!(ada.items()[0].start_boundary(), StartBoundary::HalfDay);
        assert_eq!(ada.items()[1].category(), Category::OtherLeave);
        assert!(normalized.skipped.is_empty());
    }

    #[test]
    fn test_absence_with_ignored_reason_is_skipped() {
        let config = config();
        let mut ignored = record(SourceKind::Absence, "ada@example.com", Some("2000-01-01"), Some("2000-01-03"));
        ignored.leave_reason = Some("Jury service".into());

        let normalized = Normalizer::new(&config).normalize_source(&[ignored], date(2000, 6, 1));

        assert!(normalized.people["ada@example.com"].is_empty());
        assert_eq!(
            normalized.skipped,
            vec![Skip {
                person: "ada@example.com".into(),
                reason: SkipReason::IgnoredLeaveReason {
                    leave_reason: "Jury service".into()
                },
            }]
        );
    }

    #[test]
    fn test_ongoing_sickness_closes_at_as_of() {
        let config = config();
        let sickness = record(SourceKind::Sickness, "ada@example.com", Some("2000-01-01"), None);

        let normalized = Normalizer::new(&config).normalize_source(&[sickness], date(2000, 1, 4));

        let interval = normalized.people["ada@example.com"].items()[0];
        assert_eq!(interval.category(), Category::Sickness);
        assert_eq!(interval.end_date(), date(2000, 1, 4));
    }

    #[test]
    fn test_training_without_dates_is_skipped() {
        let config = config();
        let records = vec![
            record(SourceKind::Training, "ada@example.com", None, Some("2000-01-03")),
            record(SourceKind::Training, "ada@example.com", Some("2000-01-01"), None),
            record(SourceKind::Training, "ada@example.com", Some("2000-01-05"), Some("2000-01-05")),
        ];

        let normalized = Normalizer::new(&config).normalize_source(&records, date(2000, 6, 1));

        let ada = &normalized.people["ada@example.com"];
        assert_eq!(ada.len(), 1);
        assert_eq!(ada.items()[0].category(), Category::OtherLeave);
        assert_eq!(normalized.skipped.len(), 2);
        assert_eq!(
            normalized.skipped[0].reason,
            SkipReason::MissingDate {
                field: "start_date".into()
            }
        );
    }

    #[test]
    fn test_malformed_source_dates_are_skipped() {
        let config = config();
        let records = vec![
            record(SourceKind::Sickness, "ada@example.com", Some("not a date"), None),
            record(SourceKind::Training, "ada@example.com", Some("2000-01-05"), Some("2000-01-01")),
        ];

        let normalized = Normalizer::new(&config).normalize_source(&records, date(2000, 6, 1));

        assert_eq!(normalized.skipped.len(), 2);
        assert_eq!(
            normalized.skipped[0].reason.to_string(),
            "not a date is not a date"
        );
    }

    #[test]
    fn test_target_half_day_from_minutes() {
        let config = config();
        let bookings = vec![
            booking("ada@example.com", "Holiday", "2000-01-03", "2000-01-03", Some(210)),
            booking("ada@example.com", "Holiday", "2000-01-04", "2000-01-04", Some(211)),
            booking("ada@example.com", "Sick", "2000-01-05", "2000-01-07", Some(100)),
        ];
        let mut working_time = |_: &str, _: NaiveDate| -> u32 { 420 };

        let normalized = Normalizer::new(&config).normalize_target(&bookings, &mut working_time);

        let ada = normalized.people["ada@example.com"].items();
        assert_eq!(ada[0], TemporalInterval::half_day(Category::Holiday, date(2000, 1, 3)));
        assert_eq!(
            ada[1],
            TemporalInterval::full_days(Category::Holiday, date(2000, 1, 4), date(2000, 1, 4)).unwrap()
        );
        assert_eq!(
            ada[2],
            TemporalInterval::full_days(Category::Sickness, date(2000, 1, 5), date(2000, 1, 7)).unwrap()
        );
    }

    #[test]
    fn test_target_skips_unknown_event_and_missing_time() {
        let config = config();
        let bookings = vec![
            booking("ada@example.com", "Conference", "2000-01-03", "2000-01-03", Some(420)),
            booking("ada@example.com", "Holiday", "2000-01-04", "2000-01-04", None),
        ];
        let mut working_time = |_: &str, _: NaiveDate| -> u32 { 420 };

        let normalized = Normalizer::new(&config).normalize_target(&bookings, &mut working_time);

        assert!(normalized.people["ada@example.com"].is_empty());
        assert_eq!(
            normalized.skipped.iter().map(|s| s.reason.clone()).collect::<Vec<_>>(),
            vec![
                SkipReason::UnknownTargetEvent {
                    event: "Conference".into()
                },
                SkipReason::MissingMinutes,
            ]
        );
    }

    #[test]
    fn test_skip_serializes_flat() {
        let skip = Skip {
            person: "ada@example.com".into(),
            reason: SkipReason::MissingMinutes,
        };
        assert_eq!(
            serde_json::to_value(&skip).unwrap(),
            serde_json::json!({"person": "ada@example.com", "reason": "missing_minutes"})
        );
    }
}
