//! Pause gate of the crawl loop
//!
//! A one-permit semaphore. The loop holds the permit for the duration of each
//! phase. `hold` takes the permit away from the loop and forgets it, so the
//! loop blocks on its next `pass`; `release` hands it back from whichever task
//! calls it. Closing the gate wakes every waiter for good.

use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{Semaphore, SemaphorePermit};

#[derive(Debug)]
pub struct Gate {
    permits: Semaphore,
    held: AtomicBool,
}

impl Gate {
    pub fn new() -> Self {
        Self {
            permits: Semaphore::new(1),
            held: AtomicBool::new(false),
        }
    }

    /// Waits for the permit
    ///
    /// Returns None once the gate is closed.
    pub async fn pass(&self) -> Option<SemaphorePermit<'_>> {
        self.permits.acquire().await.ok()
    }

    /// Takes the permit and keeps it until `release`
    ///
    /// Returns false without waiting if the gate is already held, and false
    /// if the gate was closed while waiting.
    pub async fn hold(&self) -> bool {
        if self
            .held
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return false;
        }

        match self.permits.acquire().await {
            Ok(permit) => {
                permit.forget();
                true
            }
            Err(_) => {
                self.held.store(false, Ordering::Release);
                false
            }
        }
    }

    /// Gives back a permit taken by `hold`
    ///
    /// Returns false if the gate was not held.
    pub fn release(&self) -> bool {
        if self.held.swap(false, Ordering::AcqRel) {
            self.permits.add_permits(1);
            true
        } else {
            false
        }
    }

    pub fn is_held(&self) -> bool {
        self.held.load(Ordering::Acquire)
    }

    /// Closes the gate; pending and future `pass`/`hold` calls fail
    pub fn close(&self) {
        self.permits.close();
    }

    pub fn is_closed(&self) -> bool {
        self.permits.is_closed()
    }
}

impl Default for Gate {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::timeout;

    const SHORT: Duration = Duration::from_millis(50);

    #[tokio::test]
    async fn test_pass_when_open() {
        let gate = Gate::new();
        assert!(gate.pass().await.is_some());
        // The permit went back when dropped
        assert!(gate.pass().await.is_some());
    }

    #[tokio::test]
    async fn test_hold_blocks_pass_until_release() {
        let gate = Arc::new(Gate::new());
        assert!(gate.hold().await);
        assert!(gate.is_held());

        assert!(timeout(SHORT, gate.pass()).await.is_err());

        let releaser = Arc::clone(&gate);
        tokio::spawn(async move {
            assert!(releaser.release());
        })
        .await
        .unwrap();

        assert!(timeout(SHORT, gate.pass()).await.unwrap().is_some());
        assert!(!gate.is_held());
    }

    #[tokio::test]
    async fn test_hold_waits_for_running_phase() {
        let gate = Arc::new(Gate::new());
        let permit = gate.pass().await.unwrap();

        let holder = Arc::clone(&gate);
        let hold = tokio::spawn(async move { holder.hold().await });

        tokio::time::sleep(SHORT).await;
        assert!(!hold.is_finished());

        drop(permit);
        assert!(hold.await.unwrap());
        assert!(timeout(SHORT, gate.pass()).await.is_err());
    }

    #[tokio::test]
    async fn test_second_hold_is_rejected() {
        let gate = Gate::new();
        assert!(gate.hold().await);
        assert!(!gate.hold().await);
        assert!(gate.release());
        assert!(!gate.release());
    }

    #[tokio::test]
    async fn test_close_wakes_waiters() {
        let gate = Arc::new(Gate::new());
        assert!(gate.hold().await);

        let waiter = Arc::clone(&gate);
        let pass = tokio::spawn(async move { waiter.pass().await.is_some() });

        tokio::time::sleep(SHORT).await;
        gate.close();

        assert!(!pass.await.unwrap());
        assert!(gate.is_closed());
    }

    #[tokio::test]
    async fn test_hold_on_closed_gate_fails() {
        let gate = Gate::new();
        gate.close();
        assert!(!gate.hold().await);
        assert!(!gate.is_held());
    }
}
