//! Submission of one graph run per job.
//!
//! The driver awaits [`Submitter::submit`] before moving to the next job, so
//! the returned future must not resolve until the run has *finished* in the
//! host, not merely been accepted. Hosts whose submit call returns on
//! acceptance should be wrapped in a [`QueueDrainSubmitter`].

use crate::error::SubmitError;
use crate::generator::Job;
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

/// Triggers one execution of the current graph state.
#[async_trait]
pub trait Submitter: Send + Sync {
    async fn submit(&self, job: &Job) -> Result<(), SubmitError>;
}

#[async_trait]
impl<S: Submitter + ?Sized> Submitter for Arc<S> {
    async fn submit(&self, job: &Job) -> Result<(), SubmitError> {
        (**self).submit(job).await
    }
}

/// Adapts an async closure into a `Submitter`.
pub struct FnSubmitter<F> {
    f: F,
}

impl<F, Fut> FnSubmitter<F>
where
    F: Fn(Job) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), SubmitError>> + Send,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<F, Fut> Submitter for FnSubmitter<F>
where
    F: Fn(Job) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), SubmitError>> + Send,
{
    async fn submit(&self, job: &Job) -> Result<(), SubmitError> {
        (self.f)(job.clone()).await
    }
}

/// Turns an accept-only host queue into a completion-awaiting `Submitter`.
///
/// `enqueue` hands the run to the host and returns as soon as it is accepted.
/// `remaining` is the host's status feed carrying the number of runs still
/// queued or executing. Only updates published after the enqueue count: the
/// submitter resolves at the first such update reporting an empty queue.
pub struct QueueDrainSubmitter<E> {
    enqueue: E,
    remaining: watch::Receiver<usize>,
}

impl<E> QueueDrainSubmitter<E>
where
    E: Fn(&Job) -> Result<(), SubmitError> + Send + Sync,
{
    pub fn new(enqueue: E, remaining: watch::Receiver<usize>) -> Self {
        Self { enqueue, remaining }
    }
}

#[async_trait]
impl<E> Submitter for QueueDrainSubmitter<E>
where
    E: Fn(&Job) -> Result<(), SubmitError> + Send + Sync,
{
    async fn submit(&self, job: &Job) -> Result<(), SubmitError> {
        let mut remaining = self.remaining.clone();
        remaining.mark_unchanged();

        (self.enqueue)(job)?;
        debug!(job = %job.id, "Run accepted, waiting for the queue to drain");

        loop {
            remaining
                .changed()
                .await
                .map_err(|_| SubmitError::StatusFeedClosed)?;
            if *remaining.borrow_and_update() == 0 {
                break;
            }
        }

        debug!(job = %job.id, "Queue drained");
        Ok(())
    }
}
