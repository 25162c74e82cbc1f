//! Metric names recorded by the Store.
//!
//! The Store emits through the `metrics` facade; nothing is recorded until the
//! host application installs a recorder.

use ::metrics::{Unit, describe_counter, describe_histogram};

/// Actions processed by `Store::send` (including feedback actions)
pub const COMMANDS_TOTAL: &str = "store.commands.total";

/// Effects started, labelled by `type`
pub const EFFECTS_EXECUTED: &str = "store.effects.executed";

/// Wall time spent inside the reducer
pub const REDUCER_DURATION: &str = "store.reducer.duration_seconds";

/// Graceful shutdowns started
pub const SHUTDOWN_INITIATED: &str = "store.shutdown.initiated";

/// Actions rejected because the store was shutting down
pub const SHUTDOWN_REJECTED: &str = "store.shutdown.rejected_actions";

/// Register descriptions for every Store metric with the installed recorder.
///
/// Safe to call more than once; without a recorder this is a no-op.
pub fn describe_store_metrics() {
    describe_counter!(COMMANDS_TOTAL, Unit::Count, "Actions processed by the store");
    describe_counter!(EFFECTS_EXECUTED, Unit::Count, "Effects started, by effect type");
    describe_histogram!(REDUCER_DURATION, Unit::Seconds, "Time spent in the reducer");
    describe_counter!(SHUTDOWN_INITIATED, Unit::Count, "Graceful shutdowns initiated");
    describe_counter!(SHUTDOWN_REJECTED, Unit::Count, "Actions rejected during shutdown");
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Tests may panic
mod tests {
    use super::*;

    #[test]
    fn metric_names_are_namespaced() {
        for name in [
            COMMANDS_TOTAL,
            EFFECTS_EXECUTED,
            REDUCER_DURATION,
            SHUTDOWN_INITIATED,
            SHUTDOWN_REJECTED,
        ] {
            assert!(name.starts_with("store."), "{name}");
        }
    }

    #[test]
    fn describing_without_recorder_is_noop() {
        describe_store_metrics();
        describe_store_metrics();
    }
}
