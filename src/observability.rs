//! Logging infrastructure for the filter engine.
//!
//! The engine uses `tracing` for structured logging. All events use target
//! "catalog_filter" and include an `event` field for filtering.
//!
//! ## Library Integration
//!
//! The crate never initializes a global subscriber. Applications configure
//! tracing via `tracing_subscriber` or similar.
//!
//! ## Conventions
//!
//! - `event`: snake_case event name (required)
//! - `component`: pipeline stage (e.g., "parser", "evaluator")
//! - Use `%` for Display, `?` for Debug formatting
//! - Never log entity payloads, only sizes and column names

/// Target for all engine log events.
pub(crate) const FILTER_TARGET: &str = "catalog_filter";

/// Macro for debug-level log events.
///
/// # Example
/// ```ignore
/// log_debug!(
///     component = "engine",
///     event = "plan_compiled",
///     instructions = program.len(),
/// );
/// ```
macro_rules! log_debug {
    ($($field:tt)*) => {
        ::tracing::debug!(target: $crate::observability::FILTER_TARGET, $($field)*)
    };
}

/// Macro for warn-level log events.
macro_rules! log_warn {
    ($($field:tt)*) => {
        ::tracing::warn!(target: $crate::observability::FILTER_TARGET, $($field)*)
    };
}

pub(crate) use log_debug;
pub(crate) use log_warn;
