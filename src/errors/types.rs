//! Error type definitions for the autoblog service
//!
//! Errors are grouped by the layer that raises them. Upstream failures never
//! leave the generation client (they are turned into a fallback article), store
//! failures surface to the job runner, and schedule errors surface at startup.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Content store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Generation service errors
    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    /// Schedule errors
    #[error("Schedule error: {0}")]
    Schedule(#[from] ScheduleError),

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Content store errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// Candidate article failed validation
    #[error("Validation failed: {field} - {message}")]
    Validation { field: String, message: String },

    /// An explicit slug is already taken
    #[error("Duplicate slug: '{slug}' is already in use")]
    DuplicateSlug { slug: String },

    /// Backing file could not be read or written
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Backing file exists but does not hold a valid article collection
    #[error("Corrupt collection in {}: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Collection could not be serialized
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Upstream generation service errors
///
/// These never escape [`crate::generation::GenerationClient::generate`]; they
/// are logged and replaced by a fallback article.
#[derive(Error, Debug)]
pub enum GenerationError {
    /// Request exceeded the configured timeout
    #[error("Request to {url} timed out")]
    Timeout { url: String },

    /// Connection or protocol failure
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success HTTP status
    #[error("HTTP error: {status} - {message}")]
    Status { status: u16, message: String },

    /// Upstream answered with no usable text
    #[error("Empty response from generation service")]
    EmptyResponse,

    /// Upstream text is too short to hold an article
    #[error("Response too short: {length} characters (minimum {minimum})")]
    TooShort { length: usize, minimum: usize },

    /// Payload did not match any known response shape
    #[error("Malformed payload: {message}")]
    MalformedPayload { message: String },

    /// HTTP client could not be constructed
    #[error("Client setup failed: {message}")]
    Client { message: String },
}

/// Schedule specification and lifecycle errors
#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Invalid cron expression '{expression}': {message}")]
    InvalidCron { expression: String, message: String },

    #[error("Invalid timezone '{timezone}'. Use a named timezone such as 'Europe/London'")]
    InvalidTimezone { timezone: String },

    #[error("Invalid interval '{interval}': {message}")]
    InvalidInterval { interval: String, message: String },

    #[error("No schedule configured: set either a cron expression or an interval")]
    MissingSchedule,

    #[error("A schedule is already active")]
    AlreadyScheduled,
}

impl AppError {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

impl StoreError {
    /// Create a validation error for a specific field
    pub fn validation<F: Into<String>, M: Into<String>>(field: F, message: M) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a duplicate slug error
    pub fn duplicate_slug<S: Into<String>>(slug: S) -> Self {
        Self::DuplicateSlug { slug: slug.into() }
    }

    pub fn io<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True for errors caused by the candidate rather than the environment
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::DuplicateSlug { .. })
    }
}

impl GenerationError {
    /// Create a malformed payload error
    pub fn malformed<S: Into<String>>(message: S) -> Self {
        Self::MalformedPayload {
            message: message.into(),
        }
    }
}

impl ScheduleError {
    pub fn invalid_cron<E: Into<String>, M: Into<String>>(expression: E, message: M) -> Self {
        Self::InvalidCron {
            expression: expression.into(),
            message: message.into(),
        }
    }

    pub fn invalid_interval<I: Into<String>, M: Into<String>>(interval: I, message: M) -> Self {
        Self::InvalidInterval {
            interval: interval.into(),
            message: message.into(),
        }
    }
}
