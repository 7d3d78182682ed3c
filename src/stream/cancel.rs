//! One-at-a-time ownership of in-flight attempts.
//!
//! The controller holds a single slot. Installing a new attempt signals the
//! previous one; every attempt is tagged with a generation so late work from
//! a superseded attempt can be told apart from the current one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio_util::sync::CancellationToken;

/// Cancellation handle of one attempt.
#[derive(Debug, Clone)]
pub struct AttemptHandle {
    token: CancellationToken,
    generation: u64,
}

impl AttemptHandle {
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Monotonic attempt number, unique per controller
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Owns the current attempt's cancellation handle.
///
/// All closures passed to the `*_and` / `*_if_current` methods run while the
/// slot lock is held. They must not call back into the controller.
#[derive(Debug, Default)]
pub struct CancellationController {
    slot: Mutex<Option<AttemptHandle>>,
    generations: AtomicU64,
}

impl CancellationController {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Option<AttemptHandle>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Signal the present attempt, if any, and install a fresh one.
    pub fn supersede(&self) -> AttemptHandle {
        let mut slot = self.lock();
        let generation = self.generations.fetch_add(1, Ordering::SeqCst) + 1;

        if let Some(previous) = slot.take() {
            tracing::info!(
                superseded = previous.generation,
                attempt = generation,
                "Superseding live attempt"
            );
            previous.token.cancel();
        }

        let handle = AttemptHandle {
            token: CancellationToken::new(),
            generation,
        };
        *slot = Some(handle.clone());
        handle
    }

    /// Signal and clear the current attempt. Returns false when nothing was live.
    pub fn cancel_current(&self) -> bool {
        self.cancel_current_and(|| ()).is_some()
    }

    /// Like [`cancel_current`](Self::cancel_current), running `f` under the
    /// slot lock when an attempt was actually cancelled.
    pub fn cancel_current_and<R>(&self, f: impl FnOnce() -> R) -> Option<R> {
        let mut slot = self.lock();
        let handle = slot.take()?;
        tracing::info!(attempt = handle.generation, "Cancelling live attempt");
        handle.token.cancel();
        Some(f())
    }

    /// Signal and clear the current attempt because the owner is going away.
    pub fn dispose_on_teardown(&self) -> bool {
        self.dispose_on_teardown_and(|| ()).is_some()
    }

    /// Like [`dispose_on_teardown`](Self::dispose_on_teardown), running `f`
    /// under the slot lock when an attempt was disposed.
    pub fn dispose_on_teardown_and<R>(&self, f: impl FnOnce() -> R) -> Option<R> {
        let mut slot = self.lock();
        let handle = slot.take()?;
        tracing::debug!(attempt = handle.generation, "Disposing attempt on teardown");
        handle.token.cancel();
        Some(f())
    }

    /// Whether `handle` is the installed, unsignalled attempt.
    pub fn is_current(&self, handle: &AttemptHandle) -> bool {
        Self::matches(&self.lock(), handle)
    }

    /// Run `f` only if `handle` is still current, holding the slot lock so
    /// no other attempt can be installed meanwhile.
    pub fn if_current<R>(&self, handle: &AttemptHandle, f: impl FnOnce() -> R) -> Option<R> {
        let slot = self.lock();
        Self::matches(&slot, handle).then(f)
    }

    /// Like [`if_current`](Self::if_current), then clears the slot without
    /// signalling. Used when the current attempt reaches a terminal state.
    pub fn retire_if_current<R>(
        &self,
        handle: &AttemptHandle,
        f: impl FnOnce() -> R,
    ) -> Option<R> {
        let mut slot = self.lock();
        if !Self::matches(&slot, handle) {
            return None;
        }
        let result = f();
        *slot = None;
        Some(result)
    }

    /// Whether any attempt is installed
    pub fn has_live(&self) -> bool {
        self.lock().is_some()
    }

    fn matches(slot: &Option<AttemptHandle>, handle: &AttemptHandle) -> bool {
        !handle.is_cancelled()
            && slot
                .as_ref()
                .is_some_and(|current| current.generation == handle.generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supersede_signals_previous() {
        let controller = CancellationController::new();
        let first = controller.supersede();
        let second = controller.supersede();

        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());
        assert!(second.generation() > first.generation());
        assert!(!controller.is_current(&first));
        assert!(controller.is_current(&second));
    }

    #[test]
    fn test_cancel_current_clears_slot() {
        let controller = CancellationController::new();
        let handle = controller.supersede();

        assert!(controller.cancel_current());
        assert!(handle.is_cancelled());
        assert!(!controller.has_live());
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let controller = CancellationController::new();
        assert!(!controller.cancel_current());

        controller.supersede();
        assert!(controller.cancel_current());
        assert!(!controller.cancel_current());
        assert!(!controller.dispose_on_teardown());
    }

    #[test]
    fn test_cancel_current_and_runs_only_when_live() {
        let controller = CancellationController::new();
        assert_eq!(controller.cancel_current_and(|| 1), None);

        controller.supersede();
        assert_eq!(controller.cancel_current_and(|| 2), Some(2));
    }

    #[test]
    fn test_dispose_on_teardown() {
        let controller = CancellationController::new();
        let handle = controller.supersede();

        assert!(controller.dispose_on_teardown());
        assert!(handle.is_cancelled());
        assert!(!controller.has_live());
    }

    #[test]
    fn test_if_current_skips_stale_handle() {
        let controller = CancellationController::new();
        let old = controller.supersede();
        let new = controller.supersede();

        assert_eq!(controller.if_current(&old, || "old"), None);
        assert_eq!(controller.if_current(&new, || "new"), Some("new"));
        assert!(controller.has_live());
    }

    #[test]
    fn test_retire_if_current_clears_without_signal() {
        let controller = CancellationController::new();
        let handle = controller.supersede();

        assert_eq!(controller.retire_if_current(&handle, || 7), Some(7));
        assert!(!handle.is_cancelled());
        assert!(!controller.has_live());
        assert_eq!(controller.retire_if_current(&handle, || 8), None);
    }

    #[tokio::test]
    async fn test_pending_wait_resolves_on_supersede() {
        let controller = CancellationController::new();
        let first = controller.supersede();
        let token = first.token().clone();

        let waiter = tokio::spawn(async move { token.cancelled().await });
        controller.supersede();

        waiter.await.unwrap();
        assert!(first.is_cancelled());
    }
}
