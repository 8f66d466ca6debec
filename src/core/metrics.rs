//! Logger and buffer-pool metrics for observability
//!
//! Plain relaxed atomic counters. They never influence control flow; they
//! exist so operators can see write failures (which are otherwise swallowed)
//! and how well the buffer pool is recycling.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters shared by a root logger and every logger derived from it.
///
/// # Example
///
/// ```
/// use rust_json_logger::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
/// metrics.record_written();
/// metrics.record_write_failure();
///
/// assert_eq!(metrics.records_written(), 1);
/// assert_eq!(metrics.write_failures(), 1);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Records handed to the sink successfully
    records_written: AtomicU64,

    /// Records the sink refused; the error itself is discarded
    write_failures: AtomicU64,
}

impl LoggerMetrics {
    pub const fn new() -> Self {
        Self {
            records_written: AtomicU64::new(0),
            write_failures: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn records_written(&self) -> u64 {
        self.records_written.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn write_failures(&self) -> u64 {
        self.write_failures.load(Ordering::Relaxed)
    }

    /// Returns the previous value.
    #[inline]
    pub fn record_written(&self) -> u64 {
        self.records_written.fetch_add(1, Ordering::Relaxed)
    }

    /// Returns the previous value.
    #[inline]
    pub fn record_write_failure(&self) -> u64 {
        self.write_failures.fetch_add(1, Ordering::Relaxed)
    }

    /// Failure rate as a percentage (0.0 - 100.0); 0.0 before any write.
    pub fn failure_rate(&self) -> f64 {
        let failed = self.write_failures() as f64;
        let total = self.records_written() as f64 + failed;
        if total == 0.0 {
            0.0
        } else {
            (failed / total) * 100.0
        }
    }

    pub fn reset(&self) {
        self.records_written.store(0, Ordering::Relaxed);
        self.write_failures.store(0, Ordering::Relaxed);
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            records_written: AtomicU64::new(self.records_written()),
            write_failures: AtomicU64::new(self.write_failures()),
        }
    }
}

/// Counters kept by [`ShardedBufferPool`](crate::core::ShardedBufferPool).
#[derive(Debug, Default)]
pub struct PoolMetrics {
    /// Acquisitions served by a fresh allocation
    allocations: AtomicU64,

    /// Acquisitions served from a shard's free list
    reuses: AtomicU64,

    /// Buffers taken back into a free list
    recycled: AtomicU64,

    /// Buffers dropped on release (shard full or buffer oversized)
    discards: AtomicU64,
}

impl PoolMetrics {
    pub const fn new() -> Self {
        Self {
            allocations: AtomicU64::new(0),
            reuses: AtomicU64::new(0),
            recycled: AtomicU64::new(0),
            discards: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn allocations(&self) -> u64 {
        self.allocations.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn reuses(&self) -> u64 {
        self.reuses.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn recycled(&self) -> u64 {
        self.recycled.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn discards(&self) -> u64 {
        self.discards.load(Ordering::Relaxed)
    }

    /// Total buffers handed out.
    pub fn acquisitions(&self) -> u64 {
        self.allocations() + self.reuses()
    }

    /// Total buffers handed back.
    pub fn releases(&self) -> u64 {
        self.recycled() + self.discards()
    }

    #[inline]
    pub(crate) fn record_allocation(&self) {
        self.allocations.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_reuse(&self) {
        self.reuses.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_recycled(&self) {
        self.recycled.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_discard(&self) {
        self.discards.fetch_add(1, Ordering::Relaxed);
    }

    /// Share of acquisitions served from the pool (0.0 - 100.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.acquisitions() as f64;
        if total == 0.0 {
            0.0
        } else {
            (self.reuses() as f64 / total) * 100.0
        }
    }
}
