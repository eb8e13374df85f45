//! Injected side-effect sinks for log lines and progress fractions.
//!
//! The engine treats both as best-effort: calls are synchronous, never
//! retried, and call order is the only guarantee. Implementations must be
//! cheap and non-blocking.

/// Receives human-readable log lines.
pub trait LogSink {
    fn log(&self, message: &str);
}

/// Receives progress fractions in `0.0..=1.0`, monotonically increasing
/// over one run.
pub trait ProgressSink {
    fn progress(&self, fraction: f64);
}

/// Discards everything.
pub struct NullSink;

impl LogSink for NullSink {
    fn log(&self, _message: &str) {}
}

impl ProgressSink for NullSink {
    fn progress(&self, _fraction: f64) {}
}

/// Adapts a closure into a [`LogSink`].
pub struct FnLog<F: Fn(&str)>(pub F);

impl<F: Fn(&str)> LogSink for FnLog<F> {
    fn log(&self, message: &str) {
        (self.0)(message)
    }
}

/// Adapts a closure into a [`ProgressSink`].
pub struct FnProgress<F: Fn(f64)>(pub F);

impl<F: Fn(f64)> ProgressSink for FnProgress<F> {
    fn progress(&self, fraction: f64) {
        (self.0)(fraction)
    }
}
