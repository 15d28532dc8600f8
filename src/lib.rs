//! cmdchain
//!
//! Stackless execution engine for nested game command chains.
//!
//! Commands that call other commands are realized on an explicit work
//! queue instead of the native call stack: an [`ExecutionContext`] drains
//! queue entries depth-first under a per-run entry budget and a per-chain
//! depth limit, with hot-swappable [`Tracer`]s for diagnostics. A context
//! whose budget runs out suspends with its queue intact and resumes on
//! the next call, so one server tick can cap how much command work it
//! performs.
//!
//! # Example
//!
//! ```rust
//! use cmdchain::{action_fn, BoundAction, ExecutionContext, QueueEntry, RunState};
//!
//! let mut ctx: ExecutionContext<String> = ExecutionContext::new();
//!
//! let greet = action_fn(|source: &String, _ctl| {
//!     println!("hello from {source}");
//!     Ok(())
//! });
//!
//! let entry = QueueEntry::new(
//!     ctx.root_frame(),
//!     BoundAction::new("server".to_string(), greet),
//! );
//! ctx.queue_next(entry);
//!
//! assert_eq!(ctx.run(16), RunState::Completed);
//! ```

#![doc(html_root_url = "https://docs.rs/cmdchain")]
#![warn(rust_2018_idioms)]

// Public modules
pub mod exec;

// Utility modules
pub mod util;

// Re-exports
pub use anyhow::{Context, Result};
pub use thiserror::Error;

pub use exec::{
    action_fn, bind, AbortReason, ActionError, ActionResult, BoundAction, ContextId, EngineConfig,
    EntryFailure, ExecError, ExecResult, ExecutionContext, ExecutionControl, Frame, QueueEntry,
    RunState, Tracer, UnboundAction,
};

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name
pub const NAME: &str = "cmdchain";
