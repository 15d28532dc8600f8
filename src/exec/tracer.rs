//! Diagnostic tracing hooks

use std::panic::{self, AssertUnwindSafe};

use tracing::warn;

use crate::exec::errors::ExecError;
use crate::exec::frame::Frame;

/// Observer attached to a context for diagnostics.
///
/// A tracer sees every dispatched entry and every failure. It must not
/// influence execution: hooks take shared references only, and a panic
/// raised inside a hook is caught, logged and discarded.
pub trait Tracer: Send + Sync {
    /// Called immediately before an entry's action runs.
    fn before_execute(&self, frame: &Frame);

    /// Called when an entry fails, whether rejected by the depth limit or
    /// failed inside its action body.
    fn on_error(&self, frame: &Frame, error: &ExecError);
}

/// Invoke `before_execute`, swallowing panics from the hook.
pub(crate) fn guard_before_execute(tracer: &dyn Tracer, frame: &Frame) {
    if panic::catch_unwind(AssertUnwindSafe(|| tracer.before_execute(frame))).is_err() {
        warn!(
            "tracer panicked in before_execute at depth {}",
            frame.depth()
        );
    }
}

/// Invoke `on_error`, swallowing panics from the hook.
pub(crate) fn guard_on_error(tracer: &dyn Tracer, frame: &Frame, error: &ExecError) {
    if panic::catch_unwind(AssertUnwindSafe(|| tracer.on_error(frame, error))).is_err() {
        warn!("tracer panicked in on_error at depth {}", frame.depth());
    }
}
