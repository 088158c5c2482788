//! Caller-supplied cancellation and deadline signal.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::RepoError;

/// Cancellation token plus optional deadline, passed to every repository call.
///
/// A scope is cheap to clone; clones share the same token.
#[derive(Debug, Clone, Default)]
pub struct RequestScope {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl RequestScope {
    /// A scope that is never cancelled and has no deadline.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, token: CancellationToken) -> Self {
        self.token = token;
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Deadline relative to now.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Whether the deadline, if any, has been reached.
    pub fn is_expired(&self) -> bool {
        self.deadline
            .is_some_and(|deadline| deadline <= Instant::now())
    }

    /// Drive `operation` to completion unless the scope ends first.
    ///
    /// An already-cancelled or already-expired scope returns before
    /// `operation` is polled.  Dropping the operation aborts any in-flight
    /// statement.
    pub async fn run<T, F>(&self, operation: F) -> Result<T, RepoError>
    where
        F: Future<Output = Result<T, RepoError>>,
    {
        // The timer rounds deadlines up to its next tick, so one that is due
        // now would still be pending on the first poll.
        if self.token.is_cancelled() {
            return Err(RepoError::Cancelled);
        }
        if self.is_expired() {
            return Err(RepoError::DeadlineExceeded);
        }

        tokio::select! {
            biased;
            () = self.token.cancelled() => Err(RepoError::Cancelled),
            () = sleep_until(self.deadline) => Err(RepoError::DeadlineExceeded),
            result = operation => result,
        }
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
