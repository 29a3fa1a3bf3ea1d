//! # Fila Testing
//!
//! Testing utilities and helpers for the fila storefront architecture.
//!
//! This crate provides:
//! - Mock implementations of environment traits (clock, ids, numbers)
//! - A fluent Given-When-Then builder for reducer tests
//! - Assertion helpers for effects
//!
//! ## Example
//!
//! ```ignore
//! use fila_testing::{ReducerTest, test_clock};
//!
//! ReducerTest::new(StorefrontReducer)
//!     .with_env(test_environment())
//!     .given_state(StorefrontState::default())
//!     .when_action(Action::ClearCart)
//!     .then_state(|s| assert!(s.cart.is_empty()))
//!     .run();
//! ```

use chrono::{DateTime, Utc};
use fila_core::environment::{Clock, IdSource, NumberSource};

/// Mock implementations of environment traits.
pub mod mocks {
    use super::{Clock, DateTime, IdSource, NumberSource, Utc};
    use std::collections::VecDeque;
    use std::ops::RangeInclusive;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::{Mutex, PoisonError};
    use uuid::Uuid;

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same instant.
    #[derive(Debug, Clone, Copy)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a clock frozen at the given instant
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Id source yielding deterministic sequential UUIDs
    ///
    /// The first id is `00000000-0000-0000-0000-000000000001`, then counts
    /// up. Useful when a test needs to predict the id a reducer will mint.
    #[derive(Debug)]
    pub struct SequenceIds {
        counter: AtomicU64,
    }

    impl SequenceIds {
        /// Start the sequence at 1
        #[must_use]
        pub const fn new() -> Self {
            Self::starting_at(1)
        }

        /// Start the sequence at an arbitrary value
        #[must_use]
        pub const fn starting_at(first: u64) -> Self {
            Self {
                counter: AtomicU64::new(first),
            }
        }

        /// The UUID the sequence produces for a given counter value
        #[must_use]
        pub const fn id_for(n: u64) -> Uuid {
            Uuid::from_u128(n as u128)
        }
    }

    impl Default for SequenceIds {
        fn default() -> Self {
            Self::new()
        }
    }

    impl IdSource for SequenceIds {
        fn next_id(&self) -> Uuid {
            let n = self.counter.fetch_add(1, Ordering::SeqCst);
            Uuid::from_u128(u128::from(n))
        }
    }

    /// Number source replaying a scripted list of values
    ///
    /// Each call pops the next scripted value, clamped into the requested
    /// range. Once the script is exhausted, the range start is returned.
    #[derive(Debug)]
    pub struct FixedNumbers {
        values: Mutex<VecDeque<u32>>,
    }

    impl FixedNumbers {
        /// Script the values returned by successive calls
        #[must_use]
        pub fn new(values: impl IntoIterator<Item = u32>) -> Self {
            Self {
                values: Mutex::new(values.into_iter().collect()),
            }
        }
    }

    impl NumberSource for FixedNumbers {
        fn in_range(&self, range: RangeInclusive<u32>) -> u32 {
            let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
            values
                .pop_front()
                .map_or(*range.start(), |v| v.clamp(*range.start(), *range.end()))
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn fixed_clock_returns_same_time() {
            let clock = crate::test_clock();
            assert_eq!(clock.now(), clock.now());
        }

        #[test]
        fn sequence_ids_count_up() {
            let ids = SequenceIds::new();
            assert_eq!(ids.next_id(), SequenceIds::id_for(1));
            assert_eq!(ids.next_id(), SequenceIds::id_for(2));
        }

        #[test]
        fn fixed_numbers_replay_then_fall_back() {
            let numbers = FixedNumbers::new([1500, 9999]);
            assert_eq!(numbers.in_range(1000..=2000), 1500);
            // Out-of-range scripted values clamp
            assert_eq!(numbers.in_range(1000..=2000), 2000);
            // Exhausted script falls back to the range start
            assert_eq!(numbers.in_range(1000..=2000), 1000);
        }
    }
}

/// Ergonomic reducer test builder and effect assertions.
pub mod reducer_test;

pub use mocks::{FixedClock, FixedNumbers, SequenceIds};
pub use reducer_test::ReducerTest;

/// Standard test clock: 2025-01-01T00:00:00Z
///
/// Use this for deterministic time in tests.
#[must_use]
#[allow(clippy::expect_used)] // Test helper; the literal is a valid timestamp
pub fn test_clock() -> FixedClock {
    FixedClock::new(
        "2025-01-01T00:00:00Z"
            .parse()
            .expect("valid RFC 3339 timestamp"),
    )
}
