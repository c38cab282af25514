//! Bulk-commit coordination over the external persistence collaborator.
//!
//! The coordinator owns none of the persistence semantics: it hands the
//! approved rows to a [`BulkUploader`], classifies whatever counts come
//! back, and keeps an advisory eye on the clock. Partial row failure is a
//! normal result, never an error; only a collaborator that fails to respond
//! at all surfaces as [`CommitError`].

use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use fleet_model::{BulkCommitOptions, BulkCommitResult, RowFix};
use thiserror::Error;
use tracing::{info, warn};

use crate::CommitOutcome;

/// How long a commit may stay in flight before the advisory signal fires.
pub const DEFAULT_STALL_AFTER: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum CommitError {
    /// The collaborator call itself failed. Says nothing about rows that may
    /// have partially persisted; callers re-run the same approved set and
    /// lean on the collaborator's upsert keys for idempotency.
    #[error("upload transport failed: {0}")]
    Transport(String),
}

/// Result alias for commit operations.
pub type Result<T> = std::result::Result<T, CommitError>;

/// The external persistence collaborator. Implementations must tolerate
/// partial row failure and honor `options.dry_run` by validating without
/// persisting.
pub trait BulkUploader {
    fn upload(&self, rows: &[RowFix], options: &BulkCommitOptions) -> Result<BulkCommitResult>;
}

/// Drives one commit: delegate, watch the clock, classify.
pub struct BulkCommitCoordinator<U> {
    uploader: U,
    stall_after: Option<Duration>,
}

impl<U: BulkUploader> BulkCommitCoordinator<U> {
    pub fn new(uploader: U) -> Self {
        Self {
            uploader,
            stall_after: Some(DEFAULT_STALL_AFTER),
        }
    }

    /// Overrides the advisory delay. `None` disables the signal entirely.
    pub fn with_stall_after(mut self, stall_after: Option<Duration>) -> Self {
        self.stall_after = stall_after;
        self
    }

    /// Commits the approved rows, logging a warning if the collaborator is
    /// slow to respond.
    pub fn commit(
        &self,
        rows: &[RowFix],
        options: &BulkCommitOptions,
    ) -> Result<(BulkCommitResult, CommitOutcome)> {
        self.commit_with_advisory(rows, options, || {
            warn!("bulk commit still in flight, continuing to wait");
        })
    }

    /// Like [`Self::commit`] but with a caller-supplied advisory callback.
    ///
    /// The callback runs at most once, on a background thread, if the upload
    /// has not resolved within the configured delay. It is a "still waiting"
    /// signal only: the in-flight call is never cancelled, retried, or
    /// duplicated.
    pub fn commit_with_advisory<F>(
        &self,
        rows: &[RowFix],
        options: &BulkCommitOptions,
        on_stall: F,
    ) -> Result<(BulkCommitResult, CommitOutcome)>
    where
        F: FnOnce() + Send + 'static,
    {
        if rows.is_empty() {
            info!("no approved rows, skipping upload");
            return Ok((BulkCommitResult::default(), CommitOutcome::NoneProcessed));
        }

        let timer = self
            .stall_after
            .map(|delay| AdvisoryTimer::start(delay, on_stall));

        let outcome = self.uploader.upload(rows, options);

        if let Some(timer) = timer {
            timer.finish();
        }

        let result = outcome?;
        if !result.counts_consistent() {
            warn!(
                total = result.total,
                successful = result.successful,
                failed = result.failed,
                skipped = result.skipped,
                "collaborator returned inconsistent counts"
            );
        }

        let outcome = CommitOutcome::of(&result);
        info!(
            total = result.total,
            successful = result.successful,
            failed = result.failed,
            skipped = result.skipped,
            dry_run = options.dry_run,
            outcome = ?outcome,
            "bulk commit finished"
        );
        Ok((result, outcome))
    }
}

/// One-shot advisory deadline, parked on a condvar so completion wakes it
/// immediately instead of waiting out the delay.
struct AdvisoryTimer {
    shared: Arc<(Mutex<bool>, Condvar)>,
    handle: Option<thread::JoinHandle<()>>,
}

impl AdvisoryTimer {
    fn start<F>(delay: Duration, on_stall: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let shared = Arc::new((Mutex::new(false), Condvar::new()));
        let for_thread = Arc::clone(&shared);
        let spawned = thread::Builder::new()
            .name("commit-advisory".to_string())
            .spawn(move || {
                let (lock, cvar) = &*for_thread;
                let deadline = Instant::now() + delay;
                let mut finished = lock.lock().unwrap_or_else(PoisonError::into_inner);
                loop {
                    if *finished {
                        return;
                    }
                    let now = Instant::now();
                    if now >= deadline {
                        break;
                    }
                    finished = cvar
                        .wait_timeout(finished, deadline - now)
                        .unwrap_or_else(PoisonError::into_inner)
                        .0;
                }
                drop(finished);
                on_stall();
            });

        let handle = match spawned {
            Ok(handle) => Some(handle),
            Err(err) => {
                // Advisory only, so a failed spawn costs nothing but the signal.
                warn!(error = %err, "could not start advisory timer");
                None
            }
        };
        Self { shared, handle }
    }

    /// Marks the commit as resolved and reaps the timer thread.
    fn finish(mut self) {
        let (lock, cvar) = &*self.shared;
        *lock.lock().unwrap_or_else(PoisonError::into_inner) = true;
        cvar.notify_all();
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            warn!("advisory timer thread panicked");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use fleet_model::Row;

    use super::*;

    struct FixedUploader {
        result: BulkCommitResult,
        delay: Duration,
        calls: AtomicUsize,
    }

    impl FixedUploader {
        fn new(result: BulkCommitResult) -> Self {
            Self {
                result,
                delay: Duration::ZERO,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl BulkUploader for FixedUploader {
        fn upload(
            &self,
            _rows: &[RowFix],
            _options: &BulkCommitOptions,
        ) -> Result<BulkCommitResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                thread::sleep(self.delay);
            }
            Ok(self.result.clone())
        }
    }

    struct FailingUploader;

    impl BulkUploader for FailingUploader {
        fn upload(
            &self,
            _rows: &[RowFix],
            _options: &BulkCommitOptions,
        ) -> Result<BulkCommitResult> {
            Err(CommitError::Transport("connection reset".to_string()))
        }
    }

    fn rows(n: u32) -> Vec<RowFix> {
        (2..2 + n)
            .map(|i| RowFix {
                row_number: i,
                fixes: vec![],
                validation_errors: vec![],
                fixed_data: Row::new(i),
            })
            .collect()
    }

    #[test]
    fn classifies_collaborator_counts() {
        let uploader = FixedUploader::new(BulkCommitResult {
            total: 5,
            successful: 3,
            failed: 1,
            skipped: 1,
            errors: vec![],
        });
        let coordinator = BulkCommitCoordinator::new(uploader).with_stall_after(None);
        let (result, outcome) = coordinator
            .commit(&rows(5), &BulkCommitOptions::default())
            .unwrap();
        assert_eq!(outcome, CommitOutcome::PartialSuccess);
        assert_eq!(result.successful, 3);
    }

    #[test]
    fn empty_approved_set_skips_the_collaborator() {
        let uploader = FixedUploader::new(BulkCommitResult {
            total: 1,
            successful: 1,
            ..Default::default()
        });
        let coordinator = BulkCommitCoordinator::new(uploader).with_stall_after(None);
        let (result, outcome) = coordinator
            .commit(&[], &BulkCommitOptions::default())
            .unwrap();
        assert_eq!(outcome, CommitOutcome::NoneProcessed);
        assert_eq!(result.total, 0);
        assert_eq!(coordinator.uploader.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn transport_failure_is_a_single_top_level_error() {
        let coordinator = BulkCommitCoordinator::new(FailingUploader).with_stall_after(None);
        let err = coordinator
            .commit(&rows(2), &BulkCommitOptions::default())
            .unwrap_err();
        assert!(matches!(err, CommitError::Transport(_)));
    }

    #[test]
    fn advisory_fires_once_without_cancelling() {
        let mut uploader = FixedUploader::new(BulkCommitResult {
            total: 2,
            successful: 2,
            ..Default::default()
        });
        uploader.delay = Duration::from_millis(60);
        let coordinator =
            BulkCommitCoordinator::new(uploader).with_stall_after(Some(Duration::from_millis(10)));

        let fired = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&fired);
        let (result, outcome) = coordinator
            .commit_with_advisory(&rows(2), &BulkCommitOptions::default(), move || {
                seen.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();

        // Signal fired, upload still completed exactly once.
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(coordinator.uploader.calls.load(Ordering::SeqCst), 1);
        assert_eq!(outcome, CommitOutcome::FullSuccess);
        assert_eq!(result.successful, 2);
    }

    #[test]
    fn fast_commit_never_signals() {
        let uploader = FixedUploader::new(BulkCommitResult {
            total: 1,
            successful: 1,
            ..Default::default()
        });
        let coordinator =
            BulkCommitCoordinator::new(uploader).with_stall_after(Some(Duration::from_secs(5)));

        let fired = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&fired);
        coordinator
            .commit_with_advisory(&rows(1), &BulkCommitOptions::default(), move || {
                seen.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }
}
