//! Core error types for leavesync-core.
//!
//! Each concern gets its own thiserror enum; [`CoreError`] wraps them for
//! callers that drive the whole pipeline.

use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

/// Core error type for leavesync-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Interval validation or merge errors
    #[error("Interval error: {0}")]
    Interval(#[from] IntervalError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Sink failures while applying a plan
    #[error("Sink error: {0}")]
    Sink(#[from] SinkError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parse errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Construction and merge failures of the interval algebra.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntervalError {
    /// Category tag is not one of the known categories
    #[error("{0} is not a recognized category")]
    InvalidCategory(String),

    /// Date text is not a valid ISO calendar date
    #[error("{0} is not a date")]
    InvalidDate(String),

    /// End date falls before the start date
    #[error("An interval cannot end ({end}) before it starts ({start})")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    /// The two intervals neither touch, overlap nor contain one another
    #[error("Cannot merge these intervals")]
    MergeError,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// No usable configuration directory
    #[error("Could not determine the configuration directory")]
    NoConfigDir,
}

/// Errors reported by a [`Sink`](crate::plan::Sink) implementation.
#[derive(Error, Debug)]
pub enum SinkError {
    /// Booking lookup failed
    #[error("Lookup failed for {person}: {message}")]
    LookupFailed { person: String, message: String },

    /// Creating a booking failed
    #[error("Create failed for {person}: {message}")]
    CreateFailed { person: String, message: String },

    /// Deleting a booking failed
    #[error("Delete failed for booking {id}: {message}")]
    DeleteFailed { id: String, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
