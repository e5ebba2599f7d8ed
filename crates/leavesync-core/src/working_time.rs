//! Daily working time lookups.
//!
//! Half days are derived from booked minutes against a day's working minutes,
//! and booked minutes from half-day flags, so both normalization and planning
//! need a [`WorkingTime`] source. Lookups can be expensive for a remote
//! implementation; wrap it in a [`CachedWorkingTime`] owned by the current run.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::config::SyncConfig;

/// Source of a person's working minutes on a date.
pub trait WorkingTime {
    fn working_minutes(&mut self, person: &str, date: NaiveDate) -> u32;
}

impl<F> WorkingTime for F
where
    F: FnMut(&str, NaiveDate) -> u32,
{
    fn working_minutes(&mut self, person: &str, date: NaiveDate) -> u32 {
        self(person, date)
    }
}

/// Answers every person from the configured weekly table.
#[derive(Debug, Clone, Copy)]
pub struct ConfiguredWorkingTime<'a> {
    config: &'a SyncConfig,
}

impl<'a> ConfiguredWorkingTime<'a> {
    pub fn new(config: &'a SyncConfig) -> Self {
        Self { config }
    }
}

impl WorkingTime for ConfiguredWorkingTime<'_> {
    fn working_minutes(&mut self, _person: &str, date: NaiveDate) -> u32 {
        self.config.working_minutes_on(date)
    }
}

/// Memoizes another [`WorkingTime`] per (person, date).
#[derive(Debug)]
pub struct CachedWorkingTime<W> {
    inner: W,
    cache: HashMap<(String, NaiveDate), u32>,
    misses: usize,
}

impl<W: WorkingTime> CachedWorkingTime<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            cache: HashMap::new(),
            misses: 0,
        }
    }

    /// Number of lookups that reached the wrapped source.
    pub fn misses(&self) -> usize {
        self.misses
    }

    /// Drop the cache and hand back the wrapped source.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: WorkingTime> WorkingTime for CachedWorkingTime<W> {
    fn working_minutes(&mut self, person: &str, date: NaiveDate) -> u32 {
        let key = (person.to_string(), date);
        if let Some(minutes) = self.cache.get(&key) {
            return *minutes;
        }

        self.misses += 1;
        let minutes = self.inner.working_minutes(person, date);
        self.cache.insert(key, minutes);
        minutes
    }
}
