//! Transport Metrics
//!
//! Lock-free request counters for the HTTP transport. Cloning a tracker
//! shares its counters.

use parking_lot::RwLock;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Request/byte/error counters with latency totals
#[derive(Clone, Default)]
pub struct MetricsTracker {
    requests: Arc<AtomicU64>,
    bytes_sent: Arc<AtomicU64>,
    bytes_received: Arc<AtomicU64>,
    errors: Arc<AtomicU64>,
    total_latency_ns: Arc<AtomicU64>,
    last_latency_ns: Arc<AtomicU64>,
    last_activity: Arc<RwLock<Option<Instant>>>,
}

impl fmt::Debug for MetricsTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetricsTracker")
            .field("requests", &self.requests.load(Ordering::Relaxed))
            .field("errors", &self.errors.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl MetricsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed round trip (any status)
    pub fn record_request(&self, bytes_sent: usize, bytes_received: usize, latency: Duration) {
        let latency_ns = latency.as_nanos().min(u64::MAX as u128) as u64;
        self.requests.fetch_add(1, Ordering::Release);
        self.bytes_sent.fetch_add(bytes_sent as u64, Ordering::Release);
        self.bytes_received.fetch_add(bytes_received as u64, Ordering::Release);
        self.total_latency_ns.fetch_add(latency_ns, Ordering::Release);
        self.last_latency_ns.store(latency_ns, Ordering::Release);
        *self.last_activity.write() = Some(Instant::now());
    }

    /// Record a request that failed before a response arrived
    pub fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Release);
        *self.last_activity.write() = Some(Instant::now());
    }

    /// Get current metrics snapshot
    pub fn get_snapshot(&self) -> super::TransportMetrics {
        let requests = self.requests.load(Ordering::Acquire);
        let total = self.total_latency_ns.load(Ordering::Acquire);

        super::TransportMetrics {
            requests,
            bytes_sent: self.bytes_sent.load(Ordering::Acquire),
            bytes_received: self.bytes_received.load(Ordering::Acquire),
            errors: self.errors.load(Ordering::Acquire),
            last_latency_ns: self.last_latency_ns.load(Ordering::Acquire),
            avg_latency_ns: if requests == 0 { 0 } else { total / requests },
            last_activity: *self.last_activity.read(),
        }
    }
}
