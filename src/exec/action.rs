//! Unbound and bound actions
//!
//! An unbound action is a reusable command body. Binding pairs it with the
//! source it will run against; the pair travels through the queue as part
//! of a [`QueueEntry`](crate::exec::queue::QueueEntry).

use std::sync::Arc;

use crate::exec::control::ExecutionControl;
use crate::exec::errors::ActionResult;

/// A command function body, not yet tied to any particular source.
///
/// Implementations are shared behind `Arc` and may be bound to many
/// sources over their lifetime, so `execute` takes `&self`. Nested work is
/// queued through the control facade, never run inline.
pub trait UnboundAction<S>: Send + Sync {
    /// Execute against `source`, queueing any nested work through `ctl`.
    fn execute(&self, source: &S, ctl: &mut ExecutionControl<'_, S>) -> ActionResult;
}

impl<S, F> UnboundAction<S> for F
where
    F: Fn(&S, &mut ExecutionControl<'_, S>) -> ActionResult + Send + Sync,
{
    fn execute(&self, source: &S, ctl: &mut ExecutionControl<'_, S>) -> ActionResult {
        self(source, ctl)
    }
}

/// Wrap a closure as a shareable action.
///
/// Going through this helper (rather than `Arc::new` plus a cast) gives
/// closure type inference the signature it needs.
pub fn action_fn<S, F>(f: F) -> Arc<dyn UnboundAction<S>>
where
    F: Fn(&S, &mut ExecutionControl<'_, S>) -> ActionResult + Send + Sync + 'static,
    S: 'static,
{
    Arc::new(f)
}

/// Bind a shared action to one source.
///
/// Convenience for hosts fanning the same body out over many sources
/// before queueing the entries themselves.
pub fn bind<S>(source: S, action: &Arc<dyn UnboundAction<S>>) -> BoundAction<S> {
    BoundAction::new(source, Arc::clone(action))
}

/// An action paired with the source it will run against.
pub struct BoundAction<S> {
    /// Source identity the action is bound to.
    source: S,
    /// Shared command body.
    action: Arc<dyn UnboundAction<S>>,
}

impl<S> BoundAction<S> {
    /// Bind `action` to `source`.
    pub fn new(source: S, action: Arc<dyn UnboundAction<S>>) -> Self {
        Self { source, action }
    }

    /// The source this action is bound to.
    #[inline]
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Run the body against the bound source.
    pub(crate) fn run(&self, ctl: &mut ExecutionControl<'_, S>) -> ActionResult {
        self.action.execute(&self.source, ctl)
    }
}

impl<S: Clone> Clone for BoundAction<S> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            action: self.action.clone(),
        }
    }
}

impl<S: std::fmt::Debug> std::fmt::Debug for BoundAction<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundAction")
            .field("source", &self.source)
            .finish()
    }
}
