//! Result of diffing two collections.

use serde::{Deserialize, Serialize};

use super::IntervalCollection;

/// Preparation applied to the receiver before diffing.
///
/// Steps run in field order: compress first, then split half days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeOptions {
    #[serde(default)]
    pub compress: bool,
    #[serde(default)]
    pub split_half_days: bool,
}

impl ChangeOptions {
    pub fn new(compress: bool, split_half_days: bool) -> Self {
        Self {
            compress,
            split_half_days,
        }
    }
}

/// Intervals to add to, and remove from, a baseline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Changeset {
    /// In the target, not value-equal to anything in the baseline
    pub added: IntervalCollection,
    /// In the baseline, not value-equal to anything in the target
    pub removed: IntervalCollection,
}

impl Changeset {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    /// Total number of additions and removals.
    pub fn len(&self) -> usize {
        self.added.len() + self.removed.len()
    }
}
