use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

/// Sequence number handed out by [`RequestGate::begin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// Drops results of lookups that were superseded by a newer one.
#[derive(Debug, Default)]
pub struct RequestGate {
    latest: AtomicU64,
}

impl RequestGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request. Every earlier ticket becomes stale.
    pub fn begin(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// Await `fut` and return its output only if no newer request began meanwhile.
    pub async fn run<F: Future>(&self, fut: F) -> Option<F::Output> {
        let ticket = self.begin();
        let output = fut.await;
        if self.is_current(ticket) {
            Some(output)
        } else {
            tracing::debug!(?ticket, "Discarding stale result");
            None
        }
    }
}
