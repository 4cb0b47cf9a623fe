//! Tracing utilities for statement and plan observability.
//!
//! Enable the `tracing` feature to emit spans and events via the `tracing` crate.
//! These macros no-op when the feature is disabled, avoiding `#[cfg]` boilerplate
//! at every call site. The feature is evaluated in the calling crate.

/// Emit a debug-level tracing event with the SQL text and parameter count.
///
/// ```ignore
/// orma_trace_query!(&sql, params.len());
/// ```
#[macro_export]
macro_rules! orma_trace_query {
    ($sql:expr, $param_count:expr) => {
        #[cfg(feature = "tracing")]
        tracing::debug!(sql = %$sql, params = $param_count, "orma.query");
    };
}

/// Emit an info-level tracing event for connection scope lifecycle (begin, commit).
///
/// ```ignore
/// orma_trace_tx!("commit", "postgres.sync");
/// ```
#[macro_export]
macro_rules! orma_trace_tx {
    ($event:literal, $driver:literal) => {
        #[cfg(feature = "tracing")]
        tracing::info!(event = $event, driver = $driver, "orma.transaction");
    };
}

/// Emit a debug-level event when a field plan is built for a named type.
///
/// ```ignore
/// orma_trace_plan!("entity", name, plan.len());
/// ```
#[macro_export]
macro_rules! orma_trace_plan {
    ($kind:literal, $name:expr, $field_count:expr) => {
        #[cfg(feature = "tracing")]
        tracing::debug!(kind = $kind, name = %$name, fields = $field_count, "orma.plan");
    };
}
