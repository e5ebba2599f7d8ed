//! Ordered collections of intervals.
//!
//! [`IntervalCollection`] keeps its items sorted by start date (stable for
//! ties) and never mutates in place: compression, half-day splitting, union
//! and diff all return new values.

mod changeset;

pub use changeset::{ChangeOptions, Changeset};

use std::collections::{BTreeMap, BTreeSet, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::interval::{Category, TemporalInterval};

/// Start-date ordered sequence of [`TemporalInterval`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<TemporalInterval>", into = "Vec<TemporalInterval>")]
pub struct IntervalCollection {
    items: Vec<TemporalInterval>,
}

impl IntervalCollection {
    pub fn new(mut items: Vec<TemporalInterval>) -> Self {
        items.sort_by_key(TemporalInterval::start_date);
        Self { items }
    }

    pub fn items(&self) -> &[TemporalInterval] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TemporalInterval> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Distinct categories present.
    pub fn categories(&self) -> BTreeSet<Category> {
        self.items.iter().map(TemporalInterval::category).collect()
    }

    /// Only the items of one category, order preserved.
    pub fn filter_category(&self, category: Category) -> Self {
        Self {
            items: self
                .items
                .iter()
                .filter(|item| item.category() == category)
                .copied()
                .collect(),
        }
    }

    /// Sum of every item's size in half days.
    pub fn half_day_count(&self) -> i64 {
        self.items.iter().map(TemporalInterval::half_day_count).sum()
    }

    /// Merge every run of mergeable same-category intervals.
    ///
    /// Each category group is ordered by start key and folded left in one
    /// pass: a running interval absorbs the next item while they are
    /// mergeable, otherwise it is closed and the next item starts a new run.
    /// Ordering by start key guarantees that once an item fails to merge, no
    /// later item can merge with the closed run either. An item equal to the
    /// running interval adds no days and is absorbed.
    pub fn compress(&self) -> Self {
        let mut groups: Vec<(Category, Vec<TemporalInterval>)> = Vec::new();
        for item in &self.items {
            match groups.iter_mut().find(|(category, _)| *category == item.category()) {
                Some((_, group)) => group.push(*item),
                None => groups.push((item.category(), vec![*item])),
            }
        }

        let mut merged = Vec::with_capacity(self.items.len());
        for (_, mut group) in groups {
            group.sort_by_key(TemporalInterval::start_key);

            let mut group = group.into_iter();
            let Some(mut current) = group.next() else {
                continue;
            };

            for next in group {
                if next == current {
                    continue;
                }
                match current.merge_with(&next) {
                    Ok(combined) => current = combined,
                    Err(_) => {
                        merged.push(current);
                        current = next;
                    }
                }
            }
            merged.push(current);
        }

        Self::new(merged)
    }

    /// Break multi-day intervals with half-day ends into atomic pieces.
    ///
    /// A half-day start leaves the afternoon of the start date, a half-day end
    /// the morning of the end date; both are emitted as single half days, and
    /// any whole days in between as one full-day interval. Single-day
    /// intervals are already atomic and pass through untouched.
    ///
    /// Stubs are shared per category and date: the same half twice is kept
    /// once, and a morning plus an afternoon make the whole day.
    pub fn split_half_days(&self) -> Self {
        let mut pieces = Vec::with_capacity(self.items.len());
        let mut stubs: BTreeMap<(Category, NaiveDate), DayHalves> = BTreeMap::new();

        for interval in &self.items {
            if interval.is_single_day() || !interval.has_half_day() {
                pieces.push(*interval);
                continue;
            }

            let category = interval.category();
            if interval.start_boundary().is_half() {
                stubs.entry((category, interval.start_date())).or_default().afternoon = true;
            }
            if interval.end_boundary().is_half() {
                stubs.entry((category, interval.end_date())).or_default().morning = true;
            }
            pieces.extend(whole_days(interval));
        }

        pieces.extend(stubs.into_iter().map(|((category, date), halves)| {
            if halves.morning && halves.afternoon {
                TemporalInterval::full_day(category, date)
            } else {
                TemporalInterval::half_day(category, date)
            }
        }));

        Self::new(pieces)
    }

    /// Value-based set difference against a baseline.
    pub fn diff(&self, other: &Self) -> Changeset {
        let ours: HashSet<&TemporalInterval> = self.items.iter().collect();
        let theirs: HashSet<&TemporalInterval> = other.items.iter().collect();

        let added = self
            .items
            .iter()
            .filter(|item| !theirs.contains(item))
            .copied()
            .collect();
        let removed = other
            .items
            .iter()
            .filter(|item| !ours.contains(item))
            .copied()
            .collect();

        Changeset {
            added: Self::new(added),
            removed: Self::new(removed),
        }
    }

    /// Prepare this collection per `options`, then diff it against `other`.
    pub fn changes_from(&self, other: &Self, options: ChangeOptions) -> Changeset {
        let mut prepared = self.clone();
        if options.compress {
            prepared = prepared.compress();
        }
        if options.split_half_days {
            prepared = prepared.split_half_days();
        }

        prepared.diff(other)
    }

    /// Both collections' items together, re-sorted; nothing is merged.
    pub fn union(&self, other: &Self) -> Self {
        let mut items = Vec::with_capacity(self.items.len() + other.items.len());
        items.extend_from_slice(&self.items);
        items.extend_from_slice(&other.items);
        Self::new(items)
    }
}

#[derive(Default)]
struct DayHalves {
    morning: bool,
    afternoon: bool,
}

/// The full days strictly inside an interval's half-day ends, if any.
fn whole_days(interval: &TemporalInterval) -> Option<TemporalInterval> {
    let first = if interval.start_boundary().is_half() {
        interval.start_date().succ_opt()?
    } else {
        interval.start_date()
    };
    let last = if interval.end_boundary().is_half() {
        interval.end_date().pred_opt()?
    } else {
        interval.end_date()
    };

    // Reversed when no whole day sits between the two half days.
    TemporalInterval::full_days(interval.category(), first, last).ok()
}

impl From<Vec<TemporalInterval>> for IntervalCollection {
    fn from(items: Vec<TemporalInterval>) -> Self {
        Self::new(items)
    }
}

impl From<IntervalCollection> for Vec<TemporalInterval> {
    fn from(collection: IntervalCollection) -> Self {
        collection.items
    }
}

impl FromIterator<TemporalInterval> for IntervalCollection {
    fn from_iter<I: IntoIterator<Item = TemporalInterval>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl IntoIterator for IntervalCollection {
    type Item = TemporalInterval;
    type IntoIter = std::vec::IntoIter<TemporalInterval>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a IntervalCollection {
    type Item = &'a TemporalInterval;
    type IntoIter = std::slice::Iter<'a, TemporalInterval>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
