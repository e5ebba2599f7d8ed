//! Property-based tests for the interval algebra.
//!
//! Intervals are drawn from a two-month window with short spans so that
//! containment, overlap and adjacency all come up often.

use std::collections::{BTreeMap, HashSet};

use chrono::{Duration, NaiveDate};
use leavesync_core::{
    Category, EndBoundary, IntervalCollection, IntervalError, StartBoundary, TemporalInterval,
};
use proptest::collection::vec;
use proptest::prelude::*;

fn category_strategy() -> impl Strategy<Value = Category> {
    prop_oneof![Just(Category::Holiday), Just(Category::Sickness)]
}

fn interval_strategy() -> impl Strategy<Value = TemporalInterval> {
    (category_strategy(), 0..60i64, 0..8i64, any::<bool>(), any::<bool>()).prop_map(
        |(category, offset, length, half_start, half_end)| {
            let start = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap() + Duration::days(offset);
            TemporalInterval::new(
                category,
                start,
                start + Duration::days(length),
                StartBoundary::from_half(half_start),
                EndBoundary::from_half(half_end),
            )
            .unwrap()
        },
    )
}

fn collection_strategy() -> impl Strategy<Value = IntervalCollection> {
    vec(interval_strategy(), 0..12).prop_map(IntervalCollection::new)
}

/// Collections whose half days sit only at the ends of multi-day intervals, so
/// every half day is a known morning or afternoon.
fn splittable_collection_strategy() -> impl Strategy<Value = IntervalCollection> {
    let interval = interval_strategy().prop_filter("single half day", |interval| {
        !interval.is_single_day() || !interval.has_half_day()
    });
    vec(interval, 0..12).prop_map(IntervalCollection::new)
}

/// Half days booked per category and date.
fn half_days_by_date(collection: &IntervalCollection) -> BTreeMap<(Category, NaiveDate), u32> {
    let mut counts = BTreeMap::new();
    for interval in collection.iter() {
        let category = interval.category();
        if interval.is_single_day() {
            let halves = if interval.has_half_day() { 1 } else { 2 };
            *counts.entry((category, interval.start_date())).or_insert(0) += halves;
            continue;
        }

        let mut day = interval.start_date();
        while day <= interval.end_date() {
            let half = (day == interval.start_date() && interval.start_boundary().is_half())
                || (day == interval.end_date() && interval.end_boundary().is_half());
            *counts.entry((category, day)).or_insert(0) += if half { 1 } else { 2 };
            day += Duration::days(1);
        }
    }
    counts
}

fn value_set(collection: &IntervalCollection) -> HashSet<TemporalInterval> {
    collection.iter().copied().collect()
}

proptest! {
    #[test]
    fn mergeable_is_symmetric(a in interval_strategy(), b in interval_strategy()) {
        prop_assert_eq!(a.mergeable_with(&b), b.mergeable_with(&a));
    }

    #[test]
    fn merge_spans_both_operands(a in interval_strategy(), b in interval_strategy()) {
        if a.mergeable_with(&b) {
            let merged = a.merge_with(&b).unwrap();
            let first = if b.starts_before(&a) { b } else { a };
            let last = if b.ends_after(&a) { b } else { a };
            prop_assert_eq!(merged.start_date(), first.start_date());
            prop_assert_eq!(merged.start_boundary(), first.start_boundary());
            prop_assert_eq!(merged.end_date(), last.end_date());
            prop_assert_eq!(merged.end_boundary(), last.end_boundary());
            prop_assert!(merged == a || merged.covers(&a));
            prop_assert!(merged == b || merged.covers(&b));
        } else {
            prop_assert_eq!(a.merge_with(&b), Err(IntervalError::MergeError));
        }
    }

    #[test]
    fn nothing_merges_with_itself(a in interval_strategy()) {
        prop_assert!(!a.covers(&a));
        prop_assert!(!a.mergeable_with(&a) || a.adjacent_to(&a));
    }

    #[test]
    fn overlapping_intervals_do_not_cover(a in interval_strategy(), b in interval_strategy()) {
        if a.overlaps(&b) {
            prop_assert!(!a.covers(&b));
            prop_assert!(!b.covers(&a));
        }
    }

    #[test]
    fn adjacent_intervals_do_not_overlap(a in interval_strategy(), b in interval_strategy()) {
        if a.adjacent_to(&b) {
            prop_assert!(!a.overlaps(&b));
            prop_assert!(!b.overlaps(&a));
        }
    }

    #[test]
    fn compress_is_idempotent(collection in collection_strategy()) {
        let once = collection.compress();
        let twice = once.compress();
        prop_assert_eq!(value_set(&once), value_set(&twice));
    }

    #[test]
    fn split_then_compress_keeps_half_days(collection in splittable_collection_strategy()) {
        let round_trip = collection.split_half_days().compress();
        prop_assert_eq!(half_days_by_date(&round_trip), half_days_by_date(&collection.compress()));
    }

    #[test]
    fn compress_keeps_categories(collection in collection_strategy()) {
        prop_assert_eq!(collection.compress().categories(), collection.categories());
    }

    #[test]
    fn collections_stay_sorted_by_start_date(collection in collection_strategy()) {
        for sorted in [&collection, &collection.compress(), &collection.split_half_days()] {
            let dates: Vec<_> = sorted.iter().map(TemporalInterval::start_date).collect();
            prop_assert!(dates.windows(2).all(|pair| pair[0] <= pair[1]));
        }
    }

    #[test]
    fn diff_never_reports_shared_values(ours in collection_strategy(), theirs in collection_strategy()) {
        let changes = ours.diff(&theirs);
        let shared: HashSet<_> = value_set(&ours).intersection(&value_set(&theirs)).copied().collect();

        prop_assert!(changes.added.iter().all(|item| !shared.contains(item)));
        prop_assert!(changes.removed.iter().all(|item| !shared.contains(item)));
    }

    #[test]
    fn diff_against_itself_is_empty(collection in collection_strategy()) {
        prop_assert!(collection.diff(&collection).is_empty());
    }

    #[test]
    fn union_keeps_every_item(a in collection_strategy(), b in collection_strategy()) {
        prop_assert_eq!(a.union(&b).len(), a.len() + b.len());
    }
}
