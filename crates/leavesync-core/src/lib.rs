//! # Leavesync Core Library
//!
//! Half-day-aware date intervals and the logic to keep two leave systems in
//! agreement. Everything here is usable without the CLI binary; the binary is a
//! thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Interval algebra**: Categorized, inclusive date ranges whose ends may
//!   fall on half days, with containment, overlap, adjacency and merging
//! - **Collections**: Sorted interval sets supporting compression, half-day
//!   splitting, diffing and union
//! - **Normalization**: Raw source and target records mapped into per-person
//!   collections, with skipped records reported instead of failing the run
//! - **Planning**: Per-person changesets turned into booking creations and
//!   deletions, applied through a [`Sink`]
//!
//! ## Key Components
//!
//! - [`TemporalInterval`]: One categorized interval
//! - [`IntervalCollection`]: Ordered interval set
//! - [`SyncConfig`]: TOML-backed configuration
//! - [`SyncPlan`]: Actions needed to bring the target in line

pub mod collection;
pub mod config;
pub mod error;
pub mod interval;
pub mod normalize;
pub mod plan;
pub mod record;
pub mod working_time;

pub use collection::{ChangeOptions, Changeset, IntervalCollection};
pub use config::SyncConfig;
pub use error::{ConfigError, CoreError, IntervalError, SinkError};
pub use interval::{Category, EndBoundary, StartBoundary, TemporalInterval};
pub use normalize::{Normalized, Normalizer, Skip, SkipReason, SourceKind, SourceRecord, TargetBooking};
pub use plan::{
    ApplyReport, BookingId, MemorySink, Sink, StoredBooking, SyncAction, SyncPlan,
};
pub use record::{IntervalRecord, PeopleIntervals};
pub use working_time::{CachedWorkingTime, ConfiguredWorkingTime, WorkingTime};
