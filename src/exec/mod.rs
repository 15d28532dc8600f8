//! Command-chain execution engine
//!
//! This module contains the stackless trampoline that drains nested
//! command calls from an explicit queue.

pub use action::{action_fn, bind, BoundAction, UnboundAction};
pub use context::{AbortReason, EngineConfig, ExecutionContext, RunState};
pub use control::ExecutionControl;
pub use errors::{ActionError, ActionResult, EntryFailure, ExecError, ExecResult};
pub use frame::{ContextId, Frame};
pub use queue::QueueEntry;
pub use tracer::Tracer;

mod action;
mod context;
mod control;
mod errors;
mod frame;
mod queue;
mod tracer;
