//! Engine errors

use thiserror::Error;

/// Engine result
pub type ExecResult<T> = Result<T, ExecError>;

/// Outcome of a single action body.
pub type ActionResult = Result<(), ActionError>;

/// Failure raised by an action body.
///
/// Opaque wrapper over [`anyhow::Error`] so action code can bubble up any
/// std error with `?`. A bare `anyhow::Error` is wrapped explicitly via
/// [`ActionError::new`]. Like `anyhow::Error` itself, this type does not
/// implement `std::error::Error`; the engine treats it as a leaf.
#[derive(Debug)]
pub struct ActionError(anyhow::Error);

impl ActionError {
    /// Create from any error type.
    pub fn new(error: impl Into<anyhow::Error>) -> Self {
        Self(error.into())
    }

    /// Create from a plain message.
    pub fn msg<M>(msg: M) -> Self
    where
        M: std::fmt::Display + std::fmt::Debug + Send + Sync + 'static,
    {
        Self(anyhow::Error::msg(msg))
    }

    /// Borrow the underlying error.
    #[inline]
    pub fn inner(&self) -> &anyhow::Error {
        &self.0
    }
}

impl std::fmt::Display for ActionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl<E> From<E> for ActionError
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn from(error: E) -> Self {
        Self(anyhow::Error::new(error))
    }
}

/// Errors surfaced while draining a context.
#[derive(Debug, Error)]
pub enum ExecError {
    /// The entry's action body returned an error.
    #[error("Action failed: {0}")]
    Action(ActionError),

    /// The entry sat deeper than the configured limit and was dropped
    /// without executing.
    #[error("Depth limit exceeded: depth {depth} > max {max}")]
    DepthExceeded {
        /// Depth of the rejected entry.
        depth: u32,
        /// Limit in effect.
        max: u32,
    },

    /// The pending queue outgrew its capacity; the whole drain was aborted.
    #[error("Pending queue overflow: capacity {capacity}")]
    QueueOverflow {
        /// Capacity in effect.
        capacity: usize,
    },
}

impl From<ActionError> for ExecError {
    fn from(error: ActionError) -> Self {
        Self::Action(error)
    }
}

/// Record of one failed entry, kept on the context for the host to report
/// back to whoever the source identifies.
#[derive(Debug)]
pub struct EntryFailure<S> {
    /// Source the failed entry was bound to.
    source: S,
    /// Depth the entry sat at.
    depth: u32,
    /// What went wrong.
    error: ExecError,
}

impl<S> EntryFailure<S> {
    pub(crate) fn new(source: S, depth: u32, error: ExecError) -> Self {
        Self {
            source,
            depth,
            error,
        }
    }

    /// Source the failed entry was bound to.
    #[inline]
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Depth the entry sat at.
    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// What went wrong.
    #[inline]
    pub fn error(&self) -> &ExecError {
        &self.error
    }
}
