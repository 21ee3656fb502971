/// Tunables for an [`Inbox`](crate::Inbox).
#[derive(Debug, Clone, Copy)]
pub struct Config {
    /// Number of slots. Must be non-zero and even, at most 2^32.
    /// Validated at inbox construction, not here.
    pub capacity: usize,
    /// Enable hit-ratio counters (one relaxed atomic increment or two per
    /// operation).
    pub enable_metrics: bool,
}

impl Config {
    /// Creates a configuration with the given capacity and metrics off.
    pub const fn new(capacity: usize) -> Self {
        Self {
            capacity,
            enable_metrics: false,
        }
    }

    /// Same configuration with metrics collection enabled.
    pub const fn with_metrics(mut self) -> Self {
        self.enable_metrics = true;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: 1024,
            enable_metrics: false,
        }
    }
}

/// Tight ring: fits in L1 and keeps back-pressure latency minimal.
pub const LOW_LATENCY_CONFIG: Config = Config::new(64);

/// Deep ring: absorbs long producer bursts before writers spin.
pub const HIGH_THROUGHPUT_CONFIG: Config = Config::new(65_536);
