//! Environment-driven configuration.
//!
//! Every knob has a default matching the reference cadence (10-second
//! ticks, decrement of 2, seeds between 1000 and 2000, 10-minute holds) and
//! can be overridden through `FILA_*` environment variables. Malformed
//! values fall back to the default rather than failing startup.

use std::env;
use std::net::SocketAddr;
use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::time::Duration;

/// What happens to a held slot when its hold window lapses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HoldPolicy {
    /// Grant the turn as soon as the hold is purchased
    ///
    /// This mirrors the reference storefront's paid fast-pass behavior:
    /// paying skips the rest of the wait.
    NotifyImmediately,
    /// Return the slot to `Waiting` when the hold lapses; the countdown
    /// resumes from the frozen position
    ResumeCountdown,
    /// Expire the slot when the hold lapses without the turn being used
    #[default]
    ExpireOnLapse,
}

impl HoldPolicy {
    /// Parse the `FILA_HOLD_POLICY` wire form
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "notify" => Some(Self::NotifyImmediately),
            "resume" => Some(Self::ResumeCountdown),
            "expire" => Some(Self::ExpireOnLapse),
            _ => None,
        }
    }
}

/// Tunables for the queue engine, checkout and boundary mock
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Time between queue decay ticks
    pub tick_interval: Duration,
    /// Positions consumed per tick
    pub decrement_per_tick: u32,
    /// Lowest position a join can seed
    pub seed_min: u32,
    /// Highest position a join can seed
    pub seed_max: u32,
    /// Hold window length granted by the box office
    pub hold_minutes: u64,
    /// What a lapsed hold does to the slot
    pub hold_policy: HoldPolicy,
    /// Durable snapshot location
    pub snapshot_path: PathBuf,
    /// Simulated payment settlement time
    pub settle_delay: Duration,
    /// Artificial latency applied to every mock boundary call
    pub mock_latency: Duration,
    /// Prometheus exporter bind address, disabled when unset
    pub metrics_addr: Option<SocketAddr>,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(10),
            decrement_per_tick: 2,
            seed_min: 1000,
            seed_max: 2000,
            hold_minutes: 10,
            hold_policy: HoldPolicy::default(),
            snapshot_path: PathBuf::from("fila-storage.json"),
            settle_delay: Duration::from_secs(2),
            mock_latency: Duration::from_millis(300),
            metrics_addr: None,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset or unparseable
    ///
    /// Recognized variables: `FILA_TICK_SECONDS`, `FILA_TICK_DECREMENT`,
    /// `FILA_SEED_MIN`, `FILA_SEED_MAX`, `FILA_HOLD_MINUTES`,
    /// `FILA_HOLD_POLICY` (`notify|resume|expire`), `FILA_SNAPSHOT_PATH`,
    /// `FILA_SETTLE_MS`, `FILA_MOCK_LATENCY_MS`, `FILA_METRICS_ADDR`.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let tick_seconds: u64 = env::var("FILA_TICK_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(|| defaults.tick_interval.as_secs());

        let seed_min = env::var("FILA_SEED_MIN")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.seed_min);
        let seed_max = env::var("FILA_SEED_MAX")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.seed_max)
            .max(seed_min);

        Self {
            tick_interval: Duration::from_secs(tick_seconds),
            decrement_per_tick: env::var("FILA_TICK_DECREMENT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.decrement_per_tick),
            seed_min,
            seed_max,
            hold_minutes: env::var("FILA_HOLD_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.hold_minutes),
            hold_policy: env::var("FILA_HOLD_POLICY")
                .ok()
                .and_then(|s| HoldPolicy::parse(&s))
                .unwrap_or_default(),
            snapshot_path: env::var("FILA_SNAPSHOT_PATH")
                .ok()
                .map_or(defaults.snapshot_path, PathBuf::from),
            settle_delay: env::var("FILA_SETTLE_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map_or(defaults.settle_delay, Duration::from_millis),
            mock_latency: env::var("FILA_MOCK_LATENCY_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map_or(defaults.mock_latency, Duration::from_millis),
            metrics_addr: env::var("FILA_METRICS_ADDR")
                .ok()
                .and_then(|s| s.parse().ok()),
        }
    }

    /// The join seeding range
    #[must_use]
    pub const fn seed_range(&self) -> RangeInclusive<u32> {
        self.seed_min..=self.seed_max
    }

    /// Tick length in whole seconds, as used by the ETA formula
    #[must_use]
    pub fn tick_seconds(&self) -> u32 {
        u32::try_from(self.tick_interval.as_secs()).unwrap_or(u32::MAX)
    }

    /// Override the tick interval
    #[must_use]
    pub const fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    /// Override the seeding range
    #[must_use]
    pub const fn with_seed_range(mut self, range: RangeInclusive<u32>) -> Self {
        self.seed_min = *range.start();
        self.seed_max = *range.end();
        self
    }

    /// Override the hold policy
    #[must_use]
    pub const fn with_hold_policy(mut self, policy: HoldPolicy) -> Self {
        self.hold_policy = policy;
        self
    }

    /// Override the settlement delay
    #[must_use]
    pub const fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Override the mock boundary latency
    #[must_use]
    pub const fn with_mock_latency(mut self, latency: Duration) -> Self {
        self.mock_latency = latency;
        self
    }

    /// Override the snapshot path
    #[must_use]
    pub fn with_snapshot_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.snapshot_path = path.into();
        self
    }
}
