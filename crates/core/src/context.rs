//! Bounded execution context
//!
//! An [`ExecContext`] carries a cancellation signal and an optional deadline
//! through long-running operations such as external command execution.
//! Contexts form a tree: a child derived with [`ExecContext::with_timeout`]
//! never outlives its parent, and cancelling a parent cancels every child.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Why a context stopped accepting work
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoneReason {
    /// The context (or one of its ancestors) was cancelled
    Cancelled,
    /// The context deadline has passed
    DeadlineExceeded,
}

impl std::fmt::Display for DoneReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DoneReason::Cancelled => f.write_str("context canceled"),
            DoneReason::DeadlineExceeded => f.write_str("context deadline exceeded"),
        }
    }
}

/// Cancellation and deadline scope for an operation
///
/// Cloning shares the cancellation signal, so a clone handed to another
/// thread can be used to cancel the original.
///
/// # Examples
///
/// ```
/// use devhook_core::ExecContext;
/// use std::time::Duration;
///
/// let parent = ExecContext::background();
/// let child = parent.with_timeout(Duration::from_secs(10));
///
/// parent.cancel();
/// assert!(child.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExecContext {
    cancelled: Arc<AtomicBool>,
    deadline: Option<Instant>,
    parent: Option<Arc<ExecContext>>,
}

impl ExecContext {
    /// Create a root context that never expires on its own
    pub fn background() -> Self {
        Self::default()
    }

    /// Derive a child context bounded by `timeout`
    ///
    /// The child's deadline is the earlier of the parent's deadline and
    /// `now + timeout`.
    #[must_use]
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        let requested = Instant::now().checked_add(timeout);
        let deadline = match (self.deadline, requested) {
            (Some(parent), Some(child)) => Some(parent.min(child)),
            (Some(parent), None) => Some(parent),
            (None, child) => child,
        };

        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            deadline,
            parent: Some(Arc::new(self.clone())),
        }
    }

    /// Cancel this context and every context derived from it
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Check whether this context or any ancestor was cancelled
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
            || self.parent.as_ref().is_some_and(|p| p.is_cancelled())
    }

    /// The instant after which work under this context must stop
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before the deadline (`None` when unbounded)
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }

    /// Report why the context is done, or `None` while it is still live
    pub fn done(&self) -> Option<DoneReason> {
        if self.is_cancelled() {
            return Some(DoneReason::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(DoneReason::DeadlineExceeded),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_background_never_done() {
        let ctx = ExecContext::background();
        assert!(ctx.done().is_none());
        assert!(ctx.deadline().is_none());
        assert!(ctx.remaining().is_none());
    }

    #[test]
    fn test_parent_cancel_propagates_to_child() {
        let parent = ExecContext::background();
        let child = parent.with_timeout(Duration::from_secs(60));
        let grandchild = child.with_timeout(Duration::from_secs(60));

        parent.cancel();
        assert_eq!(child.done(), Some(DoneReason::Cancelled));
        assert_eq!(grandchild.done(), Some(DoneReason::Cancelled));
    }

    #[test]
    fn test_child_cancel_does_not_reach_parent() {
        let parent = ExecContext::background();
        let child = parent.with_timeout(Duration::from_secs(60));

        child.cancel();
        assert!(child.is_cancelled());
        assert!(!parent.is_cancelled());
    }

    #[test]
    fn test_child_deadline_is_bounded_by_parent() {
        let parent = ExecContext::background().with_timeout(Duration::from_secs(1));
        let child = parent.with_timeout(Duration::from_secs(3600));

        assert_eq!(child.deadline(), parent.deadline());
    }

    #[test]
    fn test_zero_timeout_is_immediately_exceeded() {
        let ctx = ExecContext::background().with_timeout(Duration::ZERO);
        assert_eq!(ctx.done(), Some(DoneReason::DeadlineExceeded));
    }

    #[test]
    fn test_clone_shares_cancellation() {
        let ctx = ExecContext::background();
        let handle = ctx.clone();
        handle.cancel();
        assert!(ctx.is_cancelled());
    }
}
