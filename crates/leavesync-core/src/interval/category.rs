//! Leave categories.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::IntervalError;

/// Kind of leave an interval represents.
///
/// Intervals only ever merge or compare within a matching category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Holiday,
    Sickness,
    OtherPlanned,
    OtherUnplanned,
    /// Catch-all for absence types without their own mapping (training etc.)
    OtherLeave,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Holiday,
        Category::Sickness,
        Category::OtherPlanned,
        Category::OtherUnplanned,
        Category::OtherLeave,
    ];

    /// Tag used in records and configuration files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Holiday => "holiday",
            Category::Sickness => "sickness",
            Category::OtherPlanned => "other_planned",
            Category::OtherUnplanned => "other_unplanned",
            Category::OtherLeave => "other_leave",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = IntervalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| IntervalError::InvalidCategory(s.to_string()))
    }
}
