//! The patch pipeline: revision counter plus the submit/retry loop.
//!
//! One pipeline exists per revisioned endpoint — the party itself, and the
//! client's own member meta. `submit` serializes attempts through the
//! [`PatchQueue`], captures the revision per attempt, and recovers
//! stale-revision conflicts by overwriting the local revision with the
//! authoritative one and re-entering the back of the queue with the same
//! logical patch. One resubmission per stale signal; sequential stale
//! corrections retry again. Every other outcome releases the turn and
//! resolves the caller.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures_util::future::BoxFuture;
use tracing::{debug, warn};

use crate::error::{PartyError, ServiceError};
use crate::queue::PatchQueue;

/// Serializes patch submissions against one revisioned remote document.
#[derive(Debug)]
pub struct PatchPipeline {
    queue: PatchQueue,
    revision: Arc<AtomicU64>,
}

impl PatchPipeline {
    /// Creates a pipeline owning its revision counter.
    #[must_use]
    pub fn new(revision: u64) -> Self {
        Self::with_counter(Arc::new(AtomicU64::new(revision)))
    }

    /// Creates a pipeline sharing an externally owned revision counter.
    ///
    /// Used by the client's own member, whose revision is also advanced by
    /// remote member updates.
    #[must_use]
    pub fn with_counter(revision: Arc<AtomicU64>) -> Self {
        Self {
            queue: PatchQueue::new(),
            revision,
        }
    }

    /// The locally held revision.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::SeqCst)
    }

    /// Records a revision observed in an authoritative remote update.
    /// Only moves forward; a lagging echo never regresses the counter.
    pub fn observe_remote(&self, revision: u64) {
        self.revision.fetch_max(revision, Ordering::SeqCst);
    }

    /// Submits one logical patch.
    ///
    /// `attempt` is invoked once per transmission with the revision captured
    /// for that attempt; it must build and send the request and surface the
    /// outcome as a [`ServiceError`]. The queue turn is held for exactly the
    /// duration of one attempt and released before the caller observes the
    /// outcome.
    ///
    /// # Errors
    ///
    /// Change-forbidden service codes map to [`PartyError::Forbidden`]; a
    /// stale-revision payload without a parsable authoritative revision, and
    /// every other service or transport error, propagate verbatim. The
    /// revision only advances on success or a stale correction.
    pub async fn submit<F>(&self, mut attempt: F) -> Result<(), PartyError>
    where
        F: FnMut(u64) -> BoxFuture<'static, Result<(), ServiceError>> + Send,
    {
        loop {
            let turn = self.queue.acquire().await;
            let revision = self.revision.load(Ordering::SeqCst);
            debug!(revision, "transmitting patch");

            match attempt(revision).await {
                Ok(()) => {
                    self.revision.store(revision + 1, Ordering::SeqCst);
                    debug!(revision = revision + 1, "patch acknowledged");
                    drop(turn);
                    return Ok(());
                }
                Err(ServiceError::Api(api)) if api.is_stale_revision() => {
                    let Some(remote) = api.authoritative_revision() else {
                        drop(turn);
                        return Err(PartyError::Api(api));
                    };
                    warn!(local = revision, remote, "stale revision, resubmitting");
                    self.revision.store(remote, Ordering::SeqCst);
                    // Release the turn before re-entering, so the retry joins
                    // the back of the queue behind patches submitted since.
                    drop(turn);
                }
                Err(err) => {
                    drop(turn);
                    return Err(err.into());
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use futures_util::FutureExt;
    use parking_lot::Mutex;
    use partyline_core::messages::{ApiError, CHANGE_FORBIDDEN, STALE_REVISION};

    use super::*;

    fn stale_citing(revision: u64) -> ServiceError {
        ServiceError::Api(ApiError {
            error_code: STALE_REVISION.to_string(),
            error_message: None,
            message_vars: vec!["party-1".to_string(), revision.to_string()],
            numeric_error_code: None,
        })
    }

    /// Scripted transport: pops one result per attempt, records the revision
    /// each attempt carried.
    struct ScriptedTransport {
        results: Mutex<VecDeque<Result<(), ServiceError>>>,
        seen: Mutex<Vec<u64>>,
    }

    impl ScriptedTransport {
        fn new(results: Vec<Result<(), ServiceError>>) -> Arc<Self> {
            Arc::new(Self {
                results: Mutex::new(results.into()),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn attempt(self: &Arc<Self>, revision: u64) -> Result<(), ServiceError> {
            self.seen.lock().push(revision);
            self.results.lock().pop_front().unwrap_or(Ok(()))
        }
    }

    async fn run(pipeline: &PatchPipeline, transport: &Arc<ScriptedTransport>) -> Result<(), PartyError> {
        let transport = Arc::clone(transport);
        pipeline
            .submit(move |revision| {
                let transport = Arc::clone(&transport);
                async move { transport.attempt(revision) }.boxed()
            })
            .await
    }

    // ---- Success ----

    #[tokio::test]
    async fn success_advances_revision_by_one() {
        let pipeline = PatchPipeline::new(4);
        let transport = ScriptedTransport::new(vec![Ok(())]);
        run(&pipeline, &transport).await.unwrap();
        assert_eq!(pipeline.revision(), 5);
        assert_eq!(*transport.seen.lock(), vec![4]);
    }

    // ---- Stale revision ----

    #[tokio::test]
    async fn stale_revision_convergence() {
        // Submitted at 5, conflict cites 8, resubmit at 8, success lands 9.
        let pipeline = PatchPipeline::new(5);
        let transport = ScriptedTransport::new(vec![Err(stale_citing(8)), Ok(())]);
        run(&pipeline, &transport).await.unwrap();
        assert_eq!(*transport.seen.lock(), vec![5, 8]);
        assert_eq!(pipeline.revision(), 9);
    }

    #[tokio::test]
    async fn sequential_stale_corrections_each_retry() {
        let pipeline = PatchPipeline::new(1);
        let transport =
            ScriptedTransport::new(vec![Err(stale_citing(4)), Err(stale_citing(7)), Ok(())]);
        run(&pipeline, &transport).await.unwrap();
        assert_eq!(*transport.seen.lock(), vec![1, 4, 7]);
        assert_eq!(pipeline.revision(), 8);
    }

    #[tokio::test]
    async fn unparsable_stale_payload_propagates_verbatim() {
        let pipeline = PatchPipeline::new(5);
        let transport = ScriptedTransport::new(vec![Err(ServiceError::Api(ApiError::from_code(
            STALE_REVISION,
        )))]);
        let err = run(&pipeline, &transport).await.unwrap_err();
        assert!(matches!(err, PartyError::Api(api) if api.is_stale_revision()));
        // No blind retry, no revision mutation.
        assert_eq!(*transport.seen.lock(), vec![5]);
        assert_eq!(pipeline.revision(), 5);
    }

    // ---- Terminal errors ----

    #[tokio::test]
    async fn change_forbidden_maps_to_permission_error() {
        let pipeline = PatchPipeline::new(2);
        let transport = ScriptedTransport::new(vec![Err(ServiceError::Api(ApiError::from_code(
            CHANGE_FORBIDDEN,
        )))]);
        let err = run(&pipeline, &transport).await.unwrap_err();
        assert!(matches!(err, PartyError::Forbidden));
        assert_eq!(pipeline.revision(), 2);
    }

    #[tokio::test]
    async fn opaque_errors_propagate_and_leave_revision_untouched() {
        let pipeline = PatchPipeline::new(2);
        let transport = ScriptedTransport::new(vec![Err(ServiceError::Transport(
            anyhow::anyhow!("connection reset"),
        ))]);
        let err = run(&pipeline, &transport).await.unwrap_err();
        assert!(matches!(err, PartyError::Transport(_)));
        assert_eq!(pipeline.revision(), 2);
    }

    #[tokio::test]
    async fn failed_patch_releases_the_turn() {
        let pipeline = PatchPipeline::new(0);
        let failing = ScriptedTransport::new(vec![Err(ServiceError::Transport(anyhow::anyhow!(
            "boom"
        )))]);
        let _ = run(&pipeline, &failing).await;
        // A held turn would deadlock this second submission.
        let ok = ScriptedTransport::new(vec![Ok(())]);
        run(&pipeline, &ok).await.unwrap();
    }

    // ---- Ordering ----

    #[tokio::test]
    async fn concurrent_submissions_resolve_in_order() {
        let pipeline = Arc::new(PatchPipeline::new(0));
        let transport = ScriptedTransport::new(vec![]);

        let mut handles = Vec::new();
        for _ in 0..4 {
            let pipeline = Arc::clone(&pipeline);
            let transport = Arc::clone(&transport);
            handles.push(tokio::spawn(async move {
                run(&pipeline, &transport).await.unwrap();
            }));
            tokio::task::yield_now().await;
        }
        for handle in handles {
            handle.await.unwrap();
        }

        // Each patch observed the revision committed by its predecessor.
        assert_eq!(*transport.seen.lock(), vec![0, 1, 2, 3]);
        assert_eq!(pipeline.revision(), 4);
    }

    #[tokio::test]
    async fn shared_counter_reflects_remote_observations() {
        let counter = Arc::new(AtomicU64::new(3));
        let pipeline = PatchPipeline::with_counter(Arc::clone(&counter));
        pipeline.observe_remote(10);
        assert_eq!(counter.load(Ordering::SeqCst), 10);
        // Regression attempt is ignored.
        pipeline.observe_remote(6);
        assert_eq!(pipeline.revision(), 10);
    }
}
