//! Pending work queue
//!
//! Holds queue entries in depth-first call/return order. All enqueues land
//! on a staged list first; after each executed entry the staged entries
//! are spliced to the front of the deque, so work queued by an action runs
//! before anything that was already waiting.

use std::collections::VecDeque;

use crate::exec::action::BoundAction;
use crate::exec::frame::Frame;

/// One unit of pending work: a bound action tagged with its frame.
#[derive(Debug, Clone)]
pub struct QueueEntry<S> {
    /// Position in the call tree.
    pub frame: Frame,
    /// Action plus the source it runs against.
    pub action: BoundAction<S>,
}

impl<S> QueueEntry<S> {
    /// Create a new queue entry.
    pub fn new(frame: Frame, action: BoundAction<S>) -> Self {
        Self { frame, action }
    }
}

/// Two-part pending queue: the drain deque plus the staged list that new
/// enqueues collect in until the current entry finishes.
#[derive(Debug)]
pub(crate) struct PendingQueue<S> {
    /// Entries in drain order.
    entries: VecDeque<QueueEntry<S>>,
    /// Entries queued since the last splice, in enqueue order.
    staged: Vec<QueueEntry<S>>,
    /// Maximum total entries held across both parts.
    capacity: usize,
    /// Set once an enqueue would have exceeded `capacity`.
    overflowed: bool,
}

impl<S> PendingQueue<S> {
    /// Create an empty queue capped at `capacity` entries.
    pub(crate) fn with_capacity_limit(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            staged: Vec::new(),
            capacity,
            overflowed: false,
        }
    }

    /// Stage an entry for the next splice.
    ///
    /// An entry that would push the queue past its capacity is handed
    /// back instead; the queue empties itself and refuses everything
    /// further.
    pub(crate) fn push(&mut self, entry: QueueEntry<S>) -> Option<QueueEntry<S>> {
        if self.overflowed {
            return Some(entry);
        }
        if self.len() >= self.capacity {
            self.overflowed = true;
            self.entries.clear();
            self.staged.clear();
            return Some(entry);
        }
        self.staged.push(entry);
        None
    }

    /// Splice staged entries to the front of the deque, keeping their
    /// relative order.
    pub(crate) fn commit_staged(&mut self) {
        for entry in self.staged.drain(..).rev() {
            self.entries.push_front(entry);
        }
    }

    /// Pop the next entry in drain order.
    #[inline]
    pub(crate) fn pop_front(&mut self) -> Option<QueueEntry<S>> {
        self.entries.pop_front()
    }

    /// Total entries held, staged included.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.entries.len() + self.staged.len()
    }

    /// Check if nothing is held, staged included.
    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.staged.is_empty()
    }

    /// Whether an enqueue ever exceeded the capacity.
    #[inline]
    pub(crate) fn overflowed(&self) -> bool {
        self.overflowed
    }
}
