//! Stale-response-guarded fetch state
//!
//! A [`Resource`] tracks one logical fetch target (a table page, the
//! dashboard overview). Every request takes a ticket carrying a monotonically
//! increasing sequence number; a completion is applied only if its ticket is
//! still the latest and the resource has not been closed.
//!
//! ```text
//!  Idle ──begin──▶ Loading ──ok──▶ Ready
//!                    │  ▲            │
//!                    │  └──begin─────┤
//!                    └──err─▶ Failed ┘
//!  any ──close──▶ Closed
//! ```

use crate::error::ClientError;
use parking_lot::Mutex;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;

/// Lifecycle phase of a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchPhase {
    /// Nothing requested yet
    Idle,
    /// A request is in flight
    Loading,
    /// Last applied request succeeded
    Ready,
    /// Last applied request failed
    Failed,
    /// Torn down; late responses are dropped
    Closed,
}

/// Phases reachable from `from`
#[must_use]
pub fn allowed_transitions(from: FetchPhase) -> &'static [FetchPhase] {
    use FetchPhase::{Closed, Failed, Idle, Loading, Ready};
    match from {
        Idle => &[Loading, Closed],
        Loading => &[Loading, Ready, Failed, Closed],
        Ready | Failed => &[Loading, Closed],
        Closed => &[],
    }
}

/// Check a transition against [`allowed_transitions`]
#[must_use]
pub fn is_valid_transition(from: FetchPhase, to: FetchPhase) -> bool {
    allowed_transitions(from).contains(&to)
}

/// Proof that a request was started; redeemed by [`Resource::complete`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "a ticket must be completed for its response to be applied"]
pub struct RequestTicket {
    seq: u64,
}

impl RequestTicket {
    /// Sequence number
    #[must_use]
    pub fn seq(self) -> u64 {
        self.seq
    }
}

/// What happened to a completed response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The response became the visible state
    Applied,
    /// A newer request had been issued; the response was dropped
    Stale,
    /// The resource was closed; the response was dropped
    Closed,
}

/// Visible state of a resource at one instant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceSnapshot<T> {
    /// Phase
    pub phase: FetchPhase,
    /// Last successfully applied data; kept while a refetch is in flight
    pub data: Option<T>,
    /// Message of the last applied failure
    pub error: Option<String>,
}

impl<T> ResourceSnapshot<T> {
    /// True while a request is in flight
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.phase == FetchPhase::Loading
    }
}

#[derive(Debug)]
struct Inner<T> {
    latest: u64,
    phase: FetchPhase,
    data: Option<T>,
    error: Option<String>,
}

impl<T> Inner<T> {
    fn transition(&mut self, to: FetchPhase) -> bool {
        if is_valid_transition(self.phase, to) {
            self.phase = to;
            true
        } else {
            false
        }
    }
}

/// One fetch target with a stale-response guard
///
/// Clones share state, so a clone can be moved into a spawned task to
/// complete the request.
#[derive(Debug)]
pub struct Resource<T> {
    name: Arc<str>,
    inner: Arc<Mutex<Inner<T>>>,
}

impl<T> Clone for Resource<T> {
    fn clone(&self) -> Self {
        Self {
            name: Arc::clone(&self.name),
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Resource<T> {
    /// Create an idle resource; `name` is used in logs
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            inner: Arc::new(Mutex::new(Inner {
                latest: 0,
                phase: FetchPhase::Idle,
                data: None,
                error: None,
            })),
        }
    }

    /// Resource name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current phase
    #[must_use]
    pub fn phase(&self) -> FetchPhase {
        self.inner.lock().phase
    }

    /// Sequence number of the latest request, 0 if none
    #[must_use]
    pub fn latest_seq(&self) -> u64 {
        self.inner.lock().latest
    }

    /// Start a request, superseding any in flight; `None` once closed
    pub fn begin(&self) -> Option<RequestTicket> {
        let mut inner = self.inner.lock();
        if !inner.transition(FetchPhase::Loading) {
            return None;
        }
        inner.latest += 1;
        inner.error = None;
        tracing::debug!("{}: request #{} started", self.name, inner.latest);
        Some(RequestTicket { seq: inner.latest })
    }

    /// Apply a response if its ticket is still the latest
    pub fn complete(&self, ticket: RequestTicket, result: Result<T, ClientError>) -> Completion {
        let mut inner = self.inner.lock();
        if inner.phase == FetchPhase::Closed {
            tracing::debug!("{}: dropping response #{} after close", self.name, ticket.seq);
            return Completion::Closed;
        }
        if ticket.seq != inner.latest {
            tracing::debug!(
                "{}: dropping stale response #{} (latest #{})",
                self.name,
                ticket.seq,
                inner.latest
            );
            return Completion::Stale;
        }
        match result {
            Ok(data) => {
                inner.transition(FetchPhase::Ready);
                inner.data = Some(data);
                inner.error = None;
            }
            Err(err) => {
                tracing::warn!("{}: request #{} failed: {}", self.name, ticket.seq, err);
                inner.transition(FetchPhase::Failed);
                inner.error = Some(err.to_string());
            }
        }
        Completion::Applied
    }

    /// Begin, await `fut`, complete
    ///
    /// Returns [`Completion::Closed`] without polling `fut` if the resource is
    /// already closed.
    pub async fn run<F>(&self, fut: F) -> Completion
    where
        F: Future<Output = Result<T, ClientError>>,
    {
        let Some(ticket) = self.begin() else {
            return Completion::Closed;
        };
        let result = fut.await;
        self.complete(ticket, result)
    }

    /// Tear down; every later completion is dropped
    pub fn close(&self) {
        let mut inner = self.inner.lock();
        if inner.transition(FetchPhase::Closed) {
            tracing::debug!("{}: closed", self.name);
        }
    }

    /// True once closed
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.phase() == FetchPhase::Closed
    }

    /// Apply `f` to the current data without cloning it
    pub fn with_data<R>(&self, f: impl FnOnce(Option<&T>) -> R) -> R {
        f(self.inner.lock().data.as_ref())
    }
}

impl<T: Clone> Resource<T> {
    /// Copy of the visible state
    #[must_use]
    pub fn snapshot(&self) -> ResourceSnapshot<T> {
        let inner = self.inner.lock();
        ResourceSnapshot {
            phase: inner.phase,
            data: inner.data.clone(),
            error: inner.error.clone(),
        }
    }

    /// Copy of the current data
    #[must_use]
    pub fn data(&self) -> Option<T> {
        self.inner.lock().data.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transitions() {
        assert!(is_valid_transition(FetchPhase::Idle, FetchPhase::Loading));
        assert!(is_valid_transition(FetchPhase::Loading, FetchPhase::Loading));
        assert!(!is_valid_transition(FetchPhase::Idle, FetchPhase::Ready));
        assert!(!is_valid_transition(FetchPhase::Closed, FetchPhase::Loading));
        assert!(allowed_transitions(FetchPhase::Closed).is_empty());
    }

    #[test]
    fn latest_response_wins() {
        let res: Resource<u32> = Resource::new("test");
        let first = res.begin().unwrap();
        let second = res.begin().unwrap();
        assert!(second.seq() > first.seq());

        assert_eq!(res.complete(second, Ok(2)), Completion::Applied);
        assert_eq!(res.complete(first, Ok(1)), Completion::Stale);
        assert_eq!(res.data(), Some(2));
        assert_eq!(res.phase(), FetchPhase::Ready);
    }

    #[test]
    fn stale_error_does_not_clobber() {
        let res: Resource<u32> = Resource::new("test");
        let old = res.begin().unwrap();
        let new = res.begin().unwrap();
        assert_eq!(res.complete(new, Ok(7)), Completion::Applied);
        assert_eq!(
            res.complete(old, Err(ClientError::Http { status: 500 })),
            Completion::Stale
        );
        let snap = res.snapshot();
        assert_eq!(snap.error, None);
        assert_eq!(snap.data, Some(7));
    }

    #[test]
    fn failure_keeps_previous_data() {
        let res: Resource<u32> = Resource::new("test");
        let t = res.begin().unwrap();
        let _ = res.complete(t, Ok(1));
        let t = res.begin().unwrap();
        assert!(res.snapshot().is_loading());
        assert_eq!(res.data(), Some(1));

        let _ = res.complete(t, Err(ClientError::Http { status: 502 }));
        let snap = res.snapshot();
        assert_eq!(snap.phase, FetchPhase::Failed);
        assert_eq!(snap.error.as_deref(), Some("HTTP 502"));
        assert_eq!(snap.data, Some(1));
    }

    #[test]
    fn closed_drops_everything() {
        let res: Resource<u32> = Resource::new("test");
        let t = res.begin().unwrap();
        res.close();
        assert_eq!(res.complete(t, Ok(1)), Completion::Closed);
        assert!(res.begin().is_none());
        assert!(res.is_closed());
        assert_eq!(res.data(), None);
    }

    #[tokio::test]
    async fn run_applies_result() {
        let res: Resource<&'static str> = Resource::new("test");
        assert_eq!(res.run(async { Ok("ok") }).await, Completion::Applied);
        assert_eq!(res.data(), Some("ok"));

        res.close();
        assert_eq!(res.run(async { Ok("late") }).await, Completion::Closed);
    }
}
