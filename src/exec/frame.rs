//! Frames and context identity
//!
//! A frame records where one queued action sits in its context's call
//! tree. Frames are minted by the owning context and derived with
//! [`Frame::child`] at every nesting boundary.

use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide counter backing [`ContextId::next`].
static NEXT_CONTEXT_ID: AtomicU64 = AtomicU64::new(0);

/// Unique identifier for an execution context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextId(u64);

impl ContextId {
    /// Allocate the next process-wide id.
    #[inline]
    pub(crate) fn next() -> Self {
        Self(NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the inner value.
    #[inline]
    pub fn inner(&self) -> u64 {
        self.0
    }
}

impl From<ContextId> for u64 {
    fn from(val: ContextId) -> Self {
        val.0
    }
}

impl std::fmt::Display for ContextId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Context({})", self.0)
    }
}

/// Position of one queued action within a context's call tree.
///
/// A frame never changes once attached to a queue entry; nested work gets
/// a fresh frame via [`Frame::child`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    /// Nesting depth, 0 for the root frame.
    depth: u32,
    /// Context this frame belongs to.
    context: ContextId,
}

impl Frame {
    /// Create the depth-0 frame for `context`.
    #[inline]
    pub(crate) fn root(context: ContextId) -> Self {
        Self { depth: 0, context }
    }

    /// Nesting depth of this frame.
    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Id of the context this frame belongs to.
    #[inline]
    pub fn context(&self) -> ContextId {
        self.context
    }

    /// Derive the frame for work nested one level below this one.
    #[inline]
    pub fn child(&self) -> Frame {
        Frame {
            depth: self.depth + 1,
            context: self.context,
        }
    }
}
