//! Dependency container handed to the reducer.
//!
//! Wires the clock, id and number sources, the box-office client and the
//! turn notifier behind trait objects so tests can swap any of them.

use std::sync::Arc;

use fila_core::environment::{
    Clock, IdSource, NumberSource, RandomIds, SystemClock, ThreadRngNumbers,
};

use crate::config::StorefrontConfig;
use crate::services::{BoxOffice, LogNotifier, MockBoxOffice, TurnNotifier};

/// Everything the reducer reaches for besides state
#[derive(Clone)]
pub struct StorefrontEnv {
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdSource>,
    numbers: Arc<dyn NumberSource>,
    box_office: Arc<dyn BoxOffice>,
    notifier: Arc<dyn TurnNotifier>,
    config: StorefrontConfig,
}

impl std::fmt::Debug for StorefrontEnv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontEnv")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl StorefrontEnv {
    /// Production wiring: system clock, random ids and numbers, the mock
    /// box office tuned from `config`, and a logging notifier
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let numbers: Arc<dyn NumberSource> = Arc::new(ThreadRngNumbers);
        let box_office = MockBoxOffice::new(Arc::clone(&clock), Arc::clone(&numbers))
            .with_latency(config.mock_latency)
            .with_hold_minutes(config.hold_minutes)
            .with_seed_range(config.seed_range());
        Self {
            clock,
            ids: Arc::new(RandomIds),
            numbers,
            box_office: Arc::new(box_office),
            notifier: Arc::new(LogNotifier),
            config,
        }
    }

    /// Substitute the clock
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Substitute the id source
    #[must_use]
    pub fn with_ids(mut self, ids: Arc<dyn IdSource>) -> Self {
        self.ids = ids;
        self
    }

    /// Substitute the number source
    #[must_use]
    pub fn with_numbers(mut self, numbers: Arc<dyn NumberSource>) -> Self {
        self.numbers = numbers;
        self
    }

    /// Substitute the box-office client
    #[must_use]
    pub fn with_box_office(mut self, box_office: Arc<dyn BoxOffice>) -> Self {
        self.box_office = box_office;
        self
    }

    /// Substitute the turn notifier
    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn TurnNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Wall-clock source
    #[must_use]
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Identifier source
    #[must_use]
    pub fn ids(&self) -> &dyn IdSource {
        self.ids.as_ref()
    }

    /// Uniform number source
    #[must_use]
    pub fn numbers(&self) -> &dyn NumberSource {
        self.numbers.as_ref()
    }

    /// Shared handle to the box-office client, for effect futures
    #[must_use]
    pub fn box_office(&self) -> Arc<dyn BoxOffice> {
        Arc::clone(&self.box_office)
    }

    /// Shared handle to the turn notifier, for effect futures
    #[must_use]
    pub fn notifier(&self) -> Arc<dyn TurnNotifier> {
        Arc::clone(&self.notifier)
    }

    /// The configuration the environment was built from
    #[must_use]
    pub const fn config(&self) -> &StorefrontConfig {
        &self.config
    }
}
