//! The temporal interval value and its algebra.
//!
//! Every comparison reduces to ordering endpoint *keys*: a start key is the
//! start date followed by the start boundary rank (full day before half day),
//! an end key is the end date followed by the end boundary rank (half day
//! before full day).

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Category, EndBoundary, StartBoundary};
use crate::error::IntervalError;
use crate::record::IntervalRecord;

/// One categorized span of calendar dates.
///
/// Immutable once constructed. Equality is structural over all five fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "IntervalRecord", into = "IntervalRecord")]
pub struct TemporalInterval {
    category: Category,
    start_date: NaiveDate,
    end_date: NaiveDate,
    start_boundary: StartBoundary,
    end_boundary: EndBoundary,
}

impl TemporalInterval {
    /// Create a validated interval.
    ///
    /// A single-day interval with both boundaries set to half day is valid
    /// and denotes one half day.
    ///
    /// # Errors
    /// Returns [`IntervalError::InvalidRange`] if `end_date < start_date`.
    pub fn new(
        category: Category,
        start_date: NaiveDate,
        end_date: NaiveDate,
        start_boundary: StartBoundary,
        end_boundary: EndBoundary,
    ) -> Result<Self, IntervalError> {
        if end_date < start_date {
            return Err(IntervalError::InvalidRange {
                start: start_date,
                end: end_date,
            });
        }

        Ok(Self {
            category,
            start_date,
            end_date,
            start_boundary,
            end_boundary,
        })
    }

    /// Create an interval occupying every day from `start_date` to `end_date`.
    pub fn full_days(
        category: Category,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Self, IntervalError> {
        Self::new(
            category,
            start_date,
            end_date,
            StartBoundary::FullDay,
            EndBoundary::FullDay,
        )
    }

    /// The whole of `date`.
    pub fn full_day(category: Category, date: NaiveDate) -> Self {
        Self {
            category,
            start_date: date,
            end_date: date,
            start_boundary: StartBoundary::FullDay,
            end_boundary: EndBoundary::FullDay,
        }
    }

    /// A single half day on `date`.
    pub fn half_day(category: Category, date: NaiveDate) -> Self {
        Self {
            category,
            start_date: date,
            end_date: date,
            start_boundary: StartBoundary::HalfDay,
            end_boundary: EndBoundary::HalfDay,
        }
    }

    /// Validate raw text input: a category tag and two ISO dates.
    ///
    /// # Errors
    /// [`IntervalError::InvalidCategory`] for an unknown tag,
    /// [`IntervalError::InvalidDate`] for unparseable dates and
    /// [`IntervalError::InvalidRange`] for a reversed range.
    pub fn parse(
        category: &str,
        start_date: &str,
        end_date: &str,
        start_boundary: StartBoundary,
        end_boundary: EndBoundary,
    ) -> Result<Self, IntervalError> {
        let category: Category = category.parse()?;
        let start_date = parse_date(start_date)?;
        let end_date = parse_date(end_date)?;

        Self::new(category, start_date, end_date, start_boundary, end_boundary)
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    pub fn start_boundary(&self) -> StartBoundary {
        self.start_boundary
    }

    pub fn end_boundary(&self) -> EndBoundary {
        self.end_boundary
    }

    pub fn is_single_day(&self) -> bool {
        self.start_date == self.end_date
    }

    /// True when either endpoint only occupies half of its day.
    pub fn has_half_day(&self) -> bool {
        self.start_boundary.is_half() || self.end_boundary.is_half()
    }

    /// Number of calendar dates touched, inclusive of both ends.
    pub fn day_count(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    /// Size of the span in half days.
    ///
    /// A single-day interval with any half boundary counts as one half day.
    pub fn half_day_count(&self) -> i64 {
        if self.is_single_day() {
            return if self.has_half_day() { 1 } else { 2 };
        }

        self.day_count() * 2
            - i64::from(self.start_boundary.is_half())
            - i64::from(self.end_boundary.is_half())
    }

    pub(crate) fn start_key(&self) -> (NaiveDate, u8) {
        (self.start_date, self.start_boundary.rank())
    }

    pub(crate) fn end_key(&self) -> (NaiveDate, u8) {
        (self.end_date, self.end_boundary.rank())
    }

    pub fn matches_category(&self, other: &Self) -> bool {
        self.category == other.category
    }

    /// Starts on an earlier date, or on the same date with a full-day start
    /// against a half-day start.
    pub fn starts_before(&self, other: &Self) -> bool {
        self.start_key() < other.start_key()
    }

    /// Ends on a later date, or on the same date with a full-day end against
    /// a half-day end.
    pub fn ends_after(&self, other: &Self) -> bool {
        self.end_key() > other.end_key()
    }

    /// Whether this span contains `other` and sticks out on at least one end.
    ///
    /// A shared endpoint counts as long as this side's boundary is at least
    /// as wide there. An identical span is not covered.
    pub fn covers(&self, other: &Self) -> bool {
        let space_around = self.starts_before(other) && self.ends_after(other);
        let shares_start = self.start_date == other.start_date
            && self.start_boundary.rank() <= other.start_boundary.rank()
            && self.ends_after(other);
        let shares_end = self.end_date == other.end_date
            && self.end_boundary.rank() >= other.end_boundary.rank()
            && self.starts_before(other);

        space_around || shares_start || shares_end
    }

    /// Whether the spans intersect without either covering the other.
    pub fn overlaps(&self, other: &Self) -> bool {
        if self.covers(other) || other.covers(self) {
            return false;
        }

        let other_starts_during = other.start_date < self.end_date
            || (other.start_date == self.end_date
                && (!self.end_boundary.is_half() || !other.start_boundary.is_half()));
        let starts_during_other = self.start_date < other.end_date
            || (self.start_date == other.end_date
                && (!other.end_boundary.is_half() || !self.start_boundary.is_half()));

        let prequel = self.starts_before(other) && !self.ends_after(other) && other_starts_during;
        let sequel = !self.starts_before(other) && self.ends_after(other) && starts_during_other;

        prequel || sequel
    }

    /// Zero gap and zero overlap in either order.
    pub fn adjacent_to(&self, other: &Self) -> bool {
        self.ends_where_starts(other) || other.ends_where_starts(self)
    }

    fn ends_where_starts(&self, next: &Self) -> bool {
        // Morning half then afternoon half of the same day.
        let same_day = self.end_date == next.start_date
            && self.end_boundary.is_half()
            && next.start_boundary.is_half();
        let next_day = self.end_date.succ_opt() == Some(next.start_date)
            && !self.end_boundary.is_half()
            && !next.start_boundary.is_half();

        same_day || next_day
    }

    pub fn mergeable_with(&self, other: &Self) -> bool {
        self.matches_category(other)
            && (self.adjacent_to(other)
                || self.overlaps(other)
                || self.covers(other)
                || other.covers(self))
    }

    /// Combine two mergeable intervals into the smallest span containing both.
    ///
    /// When one operand covers the other, that operand is returned as is.
    ///
    /// # Errors
    /// Returns [`IntervalError::MergeError`] if the pair is not mergeable.
    pub fn merge_with(&self, other: &Self) -> Result<Self, IntervalError> {
        if !self.mergeable_with(other) {
            return Err(IntervalError::MergeError);
        }

        if self.covers(other) {
            return Ok(*self);
        }
        if other.covers(self) {
            return Ok(*other);
        }

        let (start_date, start_boundary) = if other.starts_before(self) {
            (other.start_date, other.start_boundary)
        } else {
            (self.start_date, self.start_boundary)
        };
        let (end_date, end_boundary) = if other.ends_after(self) {
            (other.end_date, other.end_boundary)
        } else {
            (self.end_date, self.end_boundary)
        };

        Ok(Self {
            category: self.category,
            start_date,
            end_date,
            start_boundary,
            end_boundary,
        })
    }
}

impl fmt::Display for TemporalInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.category, self.start_date)?;
        if self.start_boundary.is_half() {
            f.write_str(" (half)")?;
        }
        write!(f, " - {}", self.end_date)?;
        if self.end_boundary.is_half() {
            f.write_str(" (half)")?;
        }
        Ok(())
    }
}

pub(crate) fn parse_date(text: &str) -> Result<NaiveDate, IntervalError> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map_err(|_| IntervalError::InvalidDate(text.to_string()))
}
