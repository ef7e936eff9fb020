//! Centralized error handling for the autoblog service
//!
//! # Error Categories
//!
//! - **Store Errors**: candidate validation and backing-file failures
//! - **Generation Errors**: upstream transport, status and payload failures
//! - **Schedule Errors**: invalid cron/interval/timezone specifications
//!
//! # Usage
//!
//! ```rust
//! use autoblog::errors::{AppError, AppResult};
//!
//! fn example_function() -> AppResult<String> {
//!     Err(AppError::configuration("missing api_url"))
//! }
//! ```

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Convenience type alias for Store Results
pub type StoreResult<T> = Result<T, StoreError>;

/// Convenience type alias for Generation Results
pub type GenerationResult<T> = Result<T, GenerationError>;

/// Convenience type alias for Schedule Results
pub type ScheduleResult<T> = Result<T, ScheduleError>;
