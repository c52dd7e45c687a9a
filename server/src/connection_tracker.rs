use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use common::ConnectionId;

/// Hands out connection ids and counts live sockets. Shared by every
/// WebSocket upgrade.
#[derive(Debug, Clone, Default)]
pub struct ConnectionTracker {
    next_id: Arc<AtomicU64>,
    live: Arc<AtomicUsize>,
}

impl ConnectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&self) -> ConnectionId {
        self.live.fetch_add(1, Ordering::Relaxed);
        ConnectionId::new(self.next_id.fetch_add(1, Ordering::Relaxed) + 1)
    }

    pub fn close(&self) {
        self.live.fetch_sub(1, Ordering::Relaxed);
    }

    pub fn live_connections(&self) -> usize {
        self.live.load(Ordering::Relaxed)
    }
}

/// Per-connection inbound allowance. A connection may send `budget`
/// messages over its lifetime; the next one gets it closed.
#[derive(Debug, Clone)]
pub struct MessageBudget {
    budget: u64,
    received: u64,
}

impl MessageBudget {
    pub fn new(budget: u64) -> Self {
        Self { budget, received: 0 }
    }

    /// Counts one inbound message and reports whether it may be processed.
    pub fn admit(&mut self) -> bool {
        if self.received >= self.budget {
            return false;
        }
        self.received += 1;
        true
    }

    pub fn received(&self) -> u64 {
        self.received
    }
}
