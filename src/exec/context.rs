//! Execution context: the trampoline that drains command chains
//!
//! A context owns the pending queue for one batch of command chains and
//! dispatches entries iteratively, so arbitrarily deep call graphs never
//! grow the native stack.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::exec::control::ExecutionControl;
use crate::exec::errors::{EntryFailure, ExecError};
use crate::exec::frame::{ContextId, Frame};
use crate::exec::queue::{PendingQueue, QueueEntry};
use crate::exec::tracer::{self, Tracer};

/// Engine limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Maximum nesting depth a frame may reach before its entry is
    /// rejected.
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,
    /// Maximum number of entries the pending queue may hold.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    /// Conventional number of entries a host grants one `run` call.
    #[serde(default = "default_tick_budget")]
    pub tick_budget: u32,
}

fn default_max_depth() -> u32 {
    512
}

fn default_queue_capacity() -> usize {
    10_000_000
}

fn default_tick_budget() -> u32 {
    65_536
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            queue_capacity: default_queue_capacity(),
            tick_budget: default_tick_budget(),
        }
    }
}

/// Where a context is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// No entry has ever been dispatched.
    Idle,
    /// A `run` call is currently dispatching entries.
    Draining,
    /// The queue was drained empty; more work may still be queued.
    Completed,
    /// The entry budget ran out with work still queued; resumable.
    Suspended,
    /// The drain was torn down; terminal.
    Aborted(AbortReason),
}

/// Why a context aborted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    /// The pending queue outgrew its configured capacity.
    QueueOverflow,
}

/// A stackless execution context for one batch of command chains.
///
/// Work enters as [`QueueEntry`] values, either from the host or from
/// running actions through their [`ExecutionControl`]. [`run`] dispatches
/// entries depth-first under an entry budget; a context whose budget runs
/// out suspends with its queue intact and resumes on the next call.
///
/// [`run`]: ExecutionContext::run
pub struct ExecutionContext<S> {
    /// This context's identity; stamped into every frame it mints.
    id: ContextId,
    /// Limits in effect.
    config: EngineConfig,
    /// Pending work.
    queue: PendingQueue<S>,
    /// Diagnostic observer, if attached.
    tracer: Option<Arc<dyn Tracer>>,
    /// Lifecycle state.
    state: RunState,
    /// Entries dispatched over the context's lifetime.
    total_processed: u64,
    /// Deepest frame observed, rejected entries included.
    max_depth_seen: u32,
    /// Per-entry failures recorded for the host.
    failures: Vec<EntryFailure<S>>,
}

impl<S: Clone> ExecutionContext<S> {
    /// Create a context with default limits.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Create a context with explicit limits.
    pub fn with_config(config: EngineConfig) -> Self {
        let queue = PendingQueue::with_capacity_limit(config.queue_capacity);
        Self {
            id: ContextId::next(),
            config,
            queue,
            tracer: None,
            state: RunState::Idle,
            total_processed: 0,
            max_depth_seen: 0,
            failures: Vec::new(),
        }
    }

    /// This context's id.
    #[inline]
    pub fn id(&self) -> ContextId {
        self.id
    }

    /// Limits in effect.
    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Current lifecycle state.
    #[inline]
    pub fn state(&self) -> RunState {
        self.state
    }

    /// The depth-0 frame host-queued entries start from.
    #[inline]
    pub fn root_frame(&self) -> Frame {
        Frame::root(self.id)
    }

    /// Number of entries waiting to run.
    #[inline]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Entries dispatched over the context's lifetime, across all `run`
    /// calls. Counts entries rejected by the depth limit too.
    #[inline]
    pub fn total_processed(&self) -> u64 {
        self.total_processed
    }

    /// Deepest frame observed so far, including entries the depth limit
    /// rejected.
    #[inline]
    pub fn max_depth_seen(&self) -> u32 {
        self.max_depth_seen
    }

    /// Failures recorded so far.
    pub fn failures(&self) -> &[EntryFailure<S>] {
        &self.failures
    }

    /// Drain the recorded failures, leaving the list empty.
    pub fn take_failures(&mut self) -> Vec<EntryFailure<S>> {
        std::mem::take(&mut self.failures)
    }

    /// Attach, replace or remove the tracer.
    ///
    /// Takes effect starting with the next dispatched entry; the entry
    /// currently executing keeps the tracer it started with.
    pub fn set_tracer(&mut self, tracer: Option<Arc<dyn Tracer>>) {
        self.tracer = tracer;
    }

    /// The current tracer.
    pub fn tracer(&self) -> Option<Arc<dyn Tracer>> {
        self.tracer.clone()
    }

    /// Queue an entry for the next drain.
    ///
    /// Entries land on the staged list and are spliced to the front of the
    /// queue before the next dispatch, so work queued while a context sits
    /// suspended runs ahead of entries retained from the previous pass.
    ///
    /// The enqueue that trips the capacity limit empties the queue and
    /// leaves one [`ExecError::QueueOverflow`] failure behind; everything
    /// queued after that is silently dropped.
    pub fn queue_next(&mut self, entry: QueueEntry<S>) {
        debug_assert_eq!(
            entry.frame.context(),
            self.id,
            "entry queued into a foreign context"
        );
        let was_overflowed = self.queue.overflowed();
        if let Some(refused) = self.queue.push(entry) {
            if !was_overflowed {
                let error = ExecError::QueueOverflow {
                    capacity: self.config.queue_capacity,
                };
                self.fail_entry(refused.action.source().clone(), refused.frame, error);
            }
        }
    }

    /// Dispatch up to `budget` entries, in depth-first call/return order.
    ///
    /// Returns [`RunState::Completed`] once the queue is empty,
    /// [`RunState::Suspended`] when the budget ran out first (the queue is
    /// retained for the next call), or [`RunState::Aborted`] if the
    /// pending queue overflowed. Calling `run` on an aborted context
    /// returns the stored state unchanged.
    pub fn run(&mut self, budget: u32) -> RunState {
        if let RunState::Aborted(_) = self.state {
            return self.state;
        }

        self.state = RunState::Draining;
        let mut dispatched: u32 = 0;

        loop {
            if self.queue.overflowed() {
                error!(
                    "context {} aborted: pending queue overflow (capacity {})",
                    self.id, self.config.queue_capacity
                );
                self.state = RunState::Aborted(AbortReason::QueueOverflow);
                break;
            }

            self.queue.commit_staged();

            if self.queue.is_empty() {
                self.state = RunState::Completed;
                break;
            }
            if dispatched >= budget {
                info!(
                    "context {} suspended after {} entries, {} still queued",
                    self.id,
                    dispatched,
                    self.queue.len()
                );
                self.state = RunState::Suspended;
                break;
            }

            // Checked non-empty above.
            let Some(entry) = self.queue.pop_front() else {
                self.state = RunState::Completed;
                break;
            };

            dispatched += 1;
            self.total_processed += 1;
            let frame = entry.frame;
            if frame.depth() > self.max_depth_seen {
                self.max_depth_seen = frame.depth();
            }

            if frame.depth() > self.config.max_depth {
                debug!(
                    "entry at depth {} rejected, max depth {}",
                    frame.depth(),
                    self.config.max_depth
                );
                self.fail_entry(
                    entry.action.source().clone(),
                    frame,
                    ExecError::DepthExceeded {
                        depth: frame.depth(),
                        max: self.config.max_depth,
                    },
                );
                continue;
            }

            self.dispatch(entry);
        }

        self.state
    }

    /// Run passes of `budget_per_pass` entries until the queue drains or
    /// the context aborts.
    ///
    /// A zero budget is treated as one entry per pass.
    pub fn run_to_completion(&mut self, budget_per_pass: u32) -> RunState {
        let budget = budget_per_pass.max(1);
        loop {
            match self.run(budget) {
                RunState::Suspended => continue,
                state => return state,
            }
        }
    }

    /// Execute one dequeued entry under its control facade.
    fn dispatch(&mut self, entry: QueueEntry<S>) {
        let frame = entry.frame;
        // Snapshot so a swap from inside the action is not retroactive.
        let tracer = self.tracer.clone();

        if let Some(ref t) = tracer {
            tracer::guard_before_execute(t.as_ref(), &frame);
        }

        let result = {
            let mut ctl = ExecutionControl::new(self, frame, entry.action.source());
            entry.action.run(&mut ctl)
        };

        if let Err(err) = result {
            warn!("action failed at depth {}: {}", frame.depth(), err);
            let error = ExecError::Action(err);
            if let Some(ref t) = tracer {
                tracer::guard_on_error(t.as_ref(), &frame, &error);
            }
            self.failures.push(EntryFailure::new(
                entry.action.source().clone(),
                frame.depth(),
                error,
            ));
        }
    }

    /// Record a failure for an entry that never executed.
    fn fail_entry(&mut self, source: S, frame: Frame, error: ExecError) {
        let tracer = self.tracer.clone();
        if let Some(ref t) = tracer {
            tracer::guard_on_error(t.as_ref(), &frame, &error);
        }
        self.failures.push(EntryFailure::new(source, frame.depth(), error));
    }
}

impl<S: Clone> Default for ExecutionContext<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: fmt::Debug> fmt::Debug for ExecutionContext<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("pending", &self.queue.len())
            .field("total_processed", &self.total_processed)
            .field("max_depth_seen", &self.max_depth_seen)
            .field("failures", &self.failures.len())
            .finish()
    }
}
