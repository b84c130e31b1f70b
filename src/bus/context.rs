//! Call context threaded from the transport through handler execution.
//!
//! A `CallContext` carries:
//! - an optional deadline
//! - zero or more cancellation signals (one per `with_cancel` call)
//! - the caller's identity, if the transport established one
//! - a correlation ID for log stitching
//!
//! Contexts are built once by the caller and then only cloned. Handlers
//! receive their own clone and can observe, but never alter, the call's
//! cancellation state.

use futures::future::{self, BoxFuture, FutureExt};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use tokio::time::{self, Instant};
use uuid::Uuid;

use crate::domain::foundation::Identity;

/// Why a call context is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CancellationError {
    #[error("deadline exceeded")]
    DeadlineExceeded,

    #[error("call cancelled")]
    Cancelled,
}

/// Read-only context shared by every participant of one call chain.
#[derive(Debug, Clone)]
pub struct CallContext {
    deadline: Option<Instant>,
    cancel_signals: Vec<watch::Receiver<bool>>,
    identity: Option<Identity>,
    correlation_id: String,
}

/// Owner side of a cancellation signal created by [`CallContext::with_cancel`].
///
/// Dropping the handle without calling [`cancel`](Self::cancel) leaves the
/// context uncancelled.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    /// Signal cancellation to every clone of the context.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

impl CallContext {
    /// A context with no deadline, no cancellation and no identity.
    pub fn background() -> Self {
        Self {
            deadline: None,
            cancel_signals: Vec::new(),
            identity: None,
            correlation_id: Uuid::new_v4().to_string(),
        }
    }

    /// Builder: bound the call by a timeout from now.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Builder: bound the call by an absolute deadline.
    ///
    /// An earlier existing deadline wins.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(existing) => existing.min(deadline),
            None => deadline,
        });
        self
    }

    /// Builder: add a cancellation signal and return its handle.
    ///
    /// Signals accumulate, so a context derived from a cancellable parent
    /// is cancelled by either handle.
    pub fn with_cancel(mut self) -> (Self, CancelHandle) {
        let (tx, rx) = watch::channel(false);
        self.cancel_signals.push(rx);
        (self, CancelHandle { tx })
    }

    /// Builder: attach the caller's identity.
    pub fn with_identity(mut self, identity: Identity) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Builder: replace the generated correlation ID.
    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = id.into();
        self
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn correlation_id(&self) -> &str {
        &self.correlation_id
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before the deadline, zero once it has passed.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// The reason this context is done, if it already is.
    pub fn err(&self) -> Option<CancellationError> {
        if self.cancel_signals.iter().any(|rx| *rx.borrow()) {
            return Some(CancellationError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if deadline <= Instant::now() => {
                Some(CancellationError::DeadlineExceeded)
            }
            _ => None,
        }
    }

    pub fn is_done(&self) -> bool {
        self.err().is_some()
    }

    /// Resolves once the deadline passes or any signal is cancelled.
    ///
    /// Never resolves for a background context.
    pub async fn done(&self) -> CancellationError {
        let deadline = async {
            match self.deadline {
                Some(deadline) => time::sleep_until(deadline).await,
                None => future::pending::<()>().await,
            }
        };

        let cancelled = async {
            if self.cancel_signals.is_empty() {
                return future::pending::<()>().await;
            }
            let waits: Vec<BoxFuture<'static, ()>> = self
                .cancel_signals
                .iter()
                .cloned()
                .map(|rx| wait_cancelled(rx).boxed())
                .collect();
            future::select_all(waits).await;
        };

        tokio::select! {
            _ = cancelled => CancellationError::Cancelled,
            _ = deadline => CancellationError::DeadlineExceeded,
        }
    }
}

impl Default for CallContext {
    fn default() -> Self {
        Self::background()
    }
}

async fn wait_cancelled(mut rx: watch::Receiver<bool>) {
    // A dropped handle can no longer cancel.
    if rx.wait_for(|cancelled| *cancelled).await.is_err() {
        future::pending::<()>().await;
    }
}
