//! The patch queue: a strict-FIFO single-slot turn primitive.
//!
//! Exactly one patch may be in flight per party at a time. Waiters acquire
//! their turn in submission order (`tokio::sync::Semaphore` acquisition is
//! fair), and the turn is an RAII guard so it is released exactly once on
//! every exit path — success, every error kind, and panic.

use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// A single-slot FIFO queue gating patch transmission.
#[derive(Debug, Clone)]
pub struct PatchQueue {
    turn: Arc<Semaphore>,
}

impl PatchQueue {
    /// Creates a queue with one turn slot.
    #[must_use]
    pub fn new() -> Self {
        Self {
            turn: Arc::new(Semaphore::new(1)),
        }
    }

    /// Waits for this caller's turn. Resolves in strict submission order.
    pub async fn acquire(&self) -> TurnGuard {
        // The semaphore is owned by this queue and never closed.
        let permit = Arc::clone(&self.turn)
            .acquire_owned()
            .await
            .expect("patch queue semaphore is never closed");
        TurnGuard { _permit: permit }
    }
}

impl Default for PatchQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// The held turn. Dropping it releases the slot to the next waiter.
#[derive(Debug)]
pub struct TurnGuard {
    _permit: OwnedSemaphorePermit,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
