//! Nesting facade handed to running actions

use std::sync::Arc;

use crate::exec::action::{BoundAction, UnboundAction};
use crate::exec::context::ExecutionContext;
use crate::exec::frame::Frame;
use crate::exec::queue::QueueEntry;
use crate::exec::tracer::Tracer;

/// The only handle an action body gets for talking to the engine.
///
/// A borrowing facade over the owning [`ExecutionContext`], scoped to one
/// entry's execution: it lets the action queue nested work under its own
/// frame and manage the tracer, and exposes nothing else. The engine
/// creates one around every dispatched entry; hosts may create their own
/// to seed a context through the same narrow surface.
pub struct ExecutionControl<'a, S> {
    ctx: &'a mut ExecutionContext<S>,
    frame: Frame,
    source: &'a S,
}

impl<'a, S: Clone> ExecutionControl<'a, S> {
    /// Create a facade over `ctx` for work running at `frame` against
    /// `source`.
    pub fn new(ctx: &'a mut ExecutionContext<S>, frame: Frame, source: &'a S) -> Self {
        Self { ctx, frame, source }
    }

    /// Queue `action` against the ambient source, one level below this
    /// frame.
    ///
    /// The new entry runs after the current action returns but before
    /// anything queued earlier, giving depth-first call/return order.
    pub fn queue_next(&mut self, action: Arc<dyn UnboundAction<S>>) {
        let entry = QueueEntry::new(
            self.frame.child(),
            BoundAction::new(self.source.clone(), action),
        );
        self.ctx.queue_next(entry);
    }

    /// Replace the owning context's tracer.
    ///
    /// Takes effect starting with the next dispatched entry.
    pub fn set_tracer(&mut self, tracer: Option<Arc<dyn Tracer>>) {
        self.ctx.set_tracer(tracer);
    }

    /// The owning context's current tracer.
    pub fn tracer(&self) -> Option<Arc<dyn Tracer>> {
        self.ctx.tracer()
    }

    /// The frame the current action was dequeued with.
    #[inline]
    pub fn current_frame(&self) -> Frame {
        self.frame
    }
}
