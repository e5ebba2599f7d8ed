//! Categorized date spans with half-day resolution at each end.
//!
//! This module provides:
//! - The closed [`Category`] tag every interval carries
//! - Start and end [boundary markers](StartBoundary) for half days
//! - [`TemporalInterval`] and its comparison/merge algebra

mod boundary;
mod category;
mod temporal;

pub use boundary::{EndBoundary, StartBoundary};
pub use category::Category;
pub use temporal::TemporalInterval;

pub(crate) use temporal::parse_date;
