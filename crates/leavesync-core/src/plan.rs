//! Turning per-person changesets into booking creations and deletions.
//!
//! The planner is pure: it diffs each person's source intervals against their
//! target intervals and records what should happen. Applying a plan goes
//! through a [`Sink`], which owns all I/O against the target platform.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::SyncConfig;
use crate::error::SinkError;
use crate::interval::{parse_date, Category, TemporalInterval};
use crate::normalize::{person_key, TargetBooking};
use crate::record::PeopleIntervals;
use crate::working_time::WorkingTime;

pub type BookingId = String;

/// Minutes per day to book for an interval.
///
/// Any half-day boundary books half the day.
pub fn booked_minutes(interval: &TemporalInterval, working_minutes: u32) -> u32 {
    if interval.has_half_day() {
        working_minutes / 2
    } else {
        working_minutes
    }
}

/// A booking to create on the target platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creation {
    pub person: String,
    pub category: Category,
    pub event: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub minutes_per_day: u32,
}

/// Bookings matching these exact dates are to be removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deletion {
    pub person: String,
    pub category: Category,
    pub event: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SyncAction {
    Delete(Deletion),
    Create(Creation),
}

impl fmt::Display for SyncAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Delete(d) => write!(
                f,
                "{}: remove {} {} - {}",
                d.person, d.category, d.start_date, d.end_date
            ),
            Self::Create(c) => write!(
                f,
                "{}: create {} {} - {} ({} hours / day)",
                c.person,
                c.category,
                c.start_date,
                c.end_date,
                f64::from(c.minutes_per_day) / 60.0
            ),
        }
    }
}

/// Target platform operations needed to apply a plan.
pub trait Sink {
    /// Bookings of `deletion.person` with the same event and exact dates.
    fn find_bookings(&mut self, deletion: &Deletion) -> Result<Vec<BookingId>, SinkError>;

    fn delete_booking(&mut self, id: &str) -> Result<(), SinkError>;

    fn create_booking(&mut self, creation: &Creation) -> Result<BookingId, SinkError>;
}

/// Outcome of [`SyncPlan::apply`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ApplyReport {
    pub dry_run: bool,
    /// Actions reported but not performed (dry run)
    pub planned: usize,
    pub created: usize,
    pub deleted: usize,
    /// Deletions with no matching booking
    pub missing: usize,
}

/// Ordered actions for every matched person.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncPlan {
    pub actions: Vec<SyncAction>,
    /// People present on only one side
    pub unmatched: Vec<String>,
}

impl SyncPlan {
    /// Diff every person's source intervals against their target intervals.
    ///
    /// Per person, deletions come before creations; people are visited in key
    /// order.
    pub fn build<W: WorkingTime + ?Sized>(
        config: &SyncConfig,
        source: &PeopleIntervals,
        target: &PeopleIntervals,
        working_time: &mut W,
    ) -> Self {
        let options = config.change_options();
        let mut actions = Vec::new();
        let mut unmatched = BTreeSet::new();

        for (person, ours) in source {
            let Some(theirs) = target.get(person) else {
                warn!(%person, "no match on target");
                unmatched.insert(person.clone());
                continue;
            };

            let changes = ours.changes_from(theirs, options);
            debug!(
                %person,
                added = changes.added.len(),
                removed = changes.removed.len(),
                "found changes"
            );

            for interval in &changes.removed {
                actions.push(SyncAction::Delete(Deletion {
                    person: person.clone(),
                    category: interval.category(),
                    event: config.target_event(interval.category()).map(str::to_string),
                    start_date: interval.start_date(),
                    end_date: interval.end_date(),
                }));
            }

            for interval in &changes.added {
                let working_minutes = working_time.working_minutes(person, interval.start_date());
                actions.push(SyncAction::Create(Creation {
                    person: person.clone(),
                    category: interval.category(),
                    event: config.target_event(interval.category()).map(str::to_string),
                    start_date: interval.start_date(),
                    end_date: interval.end_date(),
                    minutes_per_day: booked_minutes(interval, working_minutes),
                }));
            }
        }

        for person in target.keys().filter(|person| !source.contains_key(*person)) {
            debug!(%person, "only present on target");
            unmatched.insert(person.clone());
        }

        Self {
            actions,
            unmatched: unmatched.into_iter().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn creations(&self) -> impl Iterator<Item = &Creation> {
        self.actions.iter().filter_map(|action| match action {
            SyncAction::Create(creation) => Some(creation),
            SyncAction::Delete(_) => None,
        })
    }

    pub fn deletions(&self) -> impl Iterator<Item = &Deletion> {
        self.actions.iter().filter_map(|action| match action {
            SyncAction::Delete(deletion) => Some(deletion),
            SyncAction::Create(_) => None,
        })
    }

    /// Carry out the plan against `sink`.
    ///
    /// A dry run still looks bookings up so every intended removal can be
    /// reported, but never creates or deletes anything.
    ///
    /// # Errors
    /// The first sink error stops the run and is returned.
    pub fn apply<S: Sink + ?Sized>(
        &self,
        sink: &mut S,
        dry_run: bool,
    ) -> Result<ApplyReport, SinkError> {
        let mut report = ApplyReport {
            dry_run,
            ..ApplyReport::default()
        };

        for action in &self.actions {
            match action {
                SyncAction::Delete(deletion) => {
                    let ids = sink.find_bookings(deletion)?;
                    if ids.is_empty() {
                        warn!(person = %deletion.person, "nothing to remove for {action}");
                        report.missing += 1;
                    }

                    for id in ids {
                        if dry_run {
                            info!(booking = %id, "{action}");
                            report.planned += 1;
                        } else {
                            sink.delete_booking(&id)?;
                            debug!(booking = %id, "deleted");
                            report.deleted += 1;
                        }
                    }
                }
                SyncAction::Create(creation) => {
                    if dry_run {
                        info!("{action}");
                        report.planned += 1;
                    } else {
                        let id = sink.create_booking(creation)?;
                        debug!(booking = %id, person = %creation.person, "created");
                        report.created += 1;
                    }
                }
            }
        }

        Ok(report)
    }
}

/// A booking held by [`MemorySink`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredBooking {
    pub person: String,
    pub event: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub minutes_per_day: u32,
}

/// In-process [`Sink`] for simulations and tests.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    bookings: BTreeMap<BookingId, StoredBooking>,
    next_id: u64,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from raw target bookings; ones with unparseable dates are left out.
    pub fn from_bookings(bookings: &[TargetBooking]) -> Self {
        let mut sink = Self::new();

        for booking in bookings {
            let (Ok(start_date), Ok(end_date)) =
                (parse_date(&booking.started_on), parse_date(&booking.ended_on))
            else {
                debug!(person = %booking.person, "unparseable booking left out");
                continue;
            };

            let stored = StoredBooking {
                person: person_key(&booking.person),
                event: Some(booking.event.clone()),
                start_date,
                end_date,
                minutes_per_day: booking.minutes.unwrap_or_default(),
            };
            match &booking.id {
                Some(id) => {
                    sink.bookings.insert(id.clone(), stored);
                }
                None => {
                    sink.insert(stored);
                }
            }
        }

        sink
    }

    pub fn insert(&mut self, booking: StoredBooking) -> BookingId {
        self.next_id += 1;
        let id = format!("mem-{}", self.next_id);
        self.bookings.insert(id.clone(), booking);
        id
    }

    pub fn bookings(&self) -> &BTreeMap<BookingId, StoredBooking> {
        &self.bookings
    }
}

impl Sink for MemorySink {
    fn find_bookings(&mut self, deletion: &Deletion) -> Result<Vec<BookingId>, SinkError> {
        Ok(self
            .bookings
            .iter()
            .filter(|(_, booking)| {
                booking.person == deletion.person
                    && booking.event == deletion.event
                    && booking.start_date == deletion.start_date
                    && booking.end_date == deletion.end_date
            })
            .map(|(id, _)| id.clone())
            .collect())
    }

    fn delete_booking(&mut self, id: &str) -> Result<(), SinkError> {
        self.bookings
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| SinkError::DeleteFailed {
                id: id.to_string(),
                message: "no such booking".into(),
            })
    }

    fn create_booking(&mut self, creation: &Creation) -> Result<BookingId, SinkError> {
        Ok(self.insert(StoredBooking {
            person: creation.person.clone(),
            event: creation.event.clone(),
            start_date: creation.start_date,
            end_date: creation.end_date,
            minutes_per_day: creation.minutes_per_day,
        }))
    }
}
