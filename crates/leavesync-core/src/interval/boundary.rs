//! Sub-day position of an interval's endpoints.

use serde::{Deserialize, Serialize};

/// Where an interval begins on its start date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartBoundary {
    /// Occupies the whole start date
    #[default]
    FullDay,
    /// Occupies only the afternoon of the start date
    HalfDay,
}

/// Where an interval finishes on its end date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndBoundary {
    /// Occupies the whole end date
    #[default]
    FullDay,
    /// Occupies only the morning of the end date
    HalfDay,
}

impl StartBoundary {
    pub fn from_half(half: bool) -> Self {
        if half {
            Self::HalfDay
        } else {
            Self::FullDay
        }
    }

    pub fn is_half(self) -> bool {
        self == Self::HalfDay
    }

    /// Position within the day; a full-day start is earlier than a half-day one.
    pub(crate) fn rank(self) -> u8 {
        match self {
            Self::FullDay => 0,
            Self::HalfDay => 1,
        }
    }
}

impl EndBoundary {
    pub fn from_half(half: bool) -> Self {
        if half {
            Self::HalfDay
        } else {
            Self::FullDay
        }
    }

    pub fn is_half(self) -> bool {
        self == Self::HalfDay
    }

    /// Position within the day; a full-day end is later than a half-day one.
    pub(crate) fn rank(self) -> u8 {
        match self {
            Self::HalfDay => 0,
            Self::FullDay => 1,
        }
    }
}
