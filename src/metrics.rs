use std::sync::atomic::{AtomicU64, Ordering};

/// Opt-in per-inbox counters for hit-ratio observability.
///
/// Uses atomic counters with `Relaxed` ordering since these are purely
/// statistical - no control flow depends on exact values, and eventual
/// visibility is acceptable for observability.
#[derive(Debug)]
pub struct Metrics {
    write_attempts: AtomicU64,
    writes: AtomicU64,
    read_attempts: AtomicU64,
    reads: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            write_attempts: AtomicU64::new(0),
            writes: AtomicU64::new(0),
            read_attempts: AtomicU64::new(0),
            reads: AtomicU64::new(0),
        }
    }

    /// Record one write attempt (completed or not).
    #[inline]
    pub fn record_write_attempt(&self) {
        self.write_attempts.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one completed write.
    #[inline]
    pub fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one read attempt (completed or not).
    #[inline]
    pub fn record_read_attempt(&self) {
        self.read_attempts.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one completed read.
    #[inline]
    pub fn record_read(&self) {
        self.reads.fetch_add(1, Ordering::Relaxed);
    }

    /// Take a snapshot of current counter values.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            write_attempts: self.write_attempts.load(Ordering::Relaxed),
            writes: self.writes.load(Ordering::Relaxed),
            read_attempts: self.read_attempts.load(Ordering::Relaxed),
            reads: self.reads.load(Ordering::Relaxed),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// A point-in-time snapshot of metrics values.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsSnapshot {
    pub write_attempts: u64,
    pub writes: u64,
    pub read_attempts: u64,
    pub reads: u64,
}

impl MetricsSnapshot {
    /// Completed writes over attempted writes; 1.0 when nothing was
    /// attempted.
    pub fn write_hit_ratio(&self) -> f64 {
        if self.write_attempts == 0 {
            1.0
        } else {
            self.writes as f64 / self.write_attempts as f64
        }
    }

    /// Completed reads over attempted reads; 1.0 when nothing was
    /// attempted.
    pub fn read_hit_ratio(&self) -> f64 {
        if self.read_attempts == 0 {
            1.0
        } else {
            self.reads as f64 / self.read_attempts as f64
        }
    }
}
