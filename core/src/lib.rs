//! # Fila Core
//!
//! Core traits and types for the fila storefront architecture.
//!
//! This crate provides the fundamental abstractions for building the
//! storefront's state machines using the Reducer pattern:
//!
//! - **State**: Domain state for a feature
//! - **Action**: All possible inputs to a reducer (user intents and
//!   effect-produced events)
//! - **Reducer**: Pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Descriptions of side effects, interpreted by the runtime store
//! - **Environment**: Dependencies (clock, ids, numbers, boundaries) behind traits
//!
//! ## Architecture Principles
//!
//! - Functional Core, Imperative Shell
//! - Unidirectional Data Flow
//! - Explicit Effects (no hidden I/O)
//! - Dependency Injection via Environment
//!
//! ## Example
//!
//! ```ignore
//! use fila_core::{Effect, Reducer, SmallVec, smallvec};
//!
//! struct CartReducer;
//!
//! impl Reducer for CartReducer {
//!     type State = CartState;
//!     type Action = CartAction;
//!     type Environment = CartEnvironment;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut CartState,
//!         action: CartAction,
//!         env: &CartEnvironment,
//!     ) -> SmallVec<[Effect<CartAction>; 4]> {
//!         // Business logic goes here
//!         smallvec![Effect::None]
//!     }
//! }
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};
pub use smallvec::{SmallVec, smallvec};

pub use effect::Effect;
pub use reducer::Reducer;

/// Reducer module - The core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`.
/// They contain all business logic and are deterministic and testable.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    ///
    /// # Example
    ///
    /// ```ignore
    /// impl Reducer for QueueReducer {
    ///     type State = QueueState;
    ///     type Action = QueueAction;
    ///     type Environment = QueueEnvironment;
    ///
    ///     fn reduce(
    ///         &self,
    ///         state: &mut QueueState,
    ///         action: QueueAction,
    ///         env: &QueueEnvironment,
    ///     ) -> SmallVec<[Effect<QueueAction>; 4]> {
    ///         match action {
    ///             QueueAction::Tick { .. } => {
    ///                 // Business logic here
    ///                 smallvec![Effect::None]
    ///             }
    ///             _ => smallvec![Effect::None],
    ///         }
    ///     }
    /// }
    /// ```
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This is a pure function that:
        /// 1. Validates the action
        /// 2. Updates state in place
        /// 3. Returns effect descriptions to be executed
        ///
        /// Reducers must be total: any action against any state produces a
        /// new state, never a panic or an error. Invalid inputs are clamped
        /// or ignored.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects are plain values describing work for the runtime to carry
/// out; reducers stay synchronous and the store interprets the effects
/// they return.
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;
    use std::time::Duration;

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed immediately. They are descriptions of what
    /// should happen, returned from reducers and executed by the Store
    /// runtime.
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    #[allow(missing_docs)]
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects in parallel
        Parallel(Vec<Effect<Action>>),

        /// Run effects sequentially
        Sequential(Vec<Effect<Action>>),

        /// Delayed action (for timers, hold expiry)
        Delay {
            /// How long to wait
            duration: Duration,
            /// Action to dispatch after delay
            action: Box<Action>,
        },

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into
        /// the reducer
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Parallel(effects) => {
                    f.debug_tuple("Effect::Parallel").field(effects).finish()
                },
                Effect::Sequential(effects) => {
                    f.debug_tuple("Effect::Sequential").field(effects).finish()
                },
                Effect::Delay { duration, action } => f
                    .debug_struct("Effect::Delay")
                    .field("duration", duration)
                    .field("action", action)
                    .finish(),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Combine effects to run in parallel
        #[must_use]
        pub const fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Parallel(effects)
        }

        /// Chain effects to run sequentially
        #[must_use]
        pub const fn chain(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Sequential(effects)
        }
    }
}

/// Environment module - Dependency injection traits
///
/// All external dependencies a reducer touches are abstracted behind traits
/// and injected via the Environment parameter, so tests can substitute
/// deterministic implementations.
pub mod environment {
    use chrono::{DateTime, Utc};
    use std::ops::RangeInclusive;
    use uuid::Uuid;

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```
    /// use fila_core::environment::{Clock, SystemClock};
    ///
    /// let clock = SystemClock;
    /// let now = clock.now();
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }

    /// Identifier source - abstracts id allocation for testability
    ///
    /// Slot and order identifiers are allocated through this trait so tests
    /// can supply predictable sequences.
    pub trait IdSource: Send + Sync {
        /// Allocate a fresh unique identifier
        fn next_id(&self) -> Uuid;
    }

    /// Production id source backed by random v4 UUIDs
    #[derive(Debug, Clone, Copy, Default)]
    pub struct RandomIds;

    impl IdSource for RandomIds {
        fn next_id(&self) -> Uuid {
            Uuid::new_v4()
        }
    }

    /// Number source - abstracts uniform sampling for testability
    ///
    /// Queue position seeding and mock boundary values draw from this trait
    /// so tests can script exact numbers.
    pub trait NumberSource: Send + Sync {
        /// Uniformly sample an integer from the inclusive range
        fn in_range(&self, range: RangeInclusive<u32>) -> u32;
    }

    /// Production number source backed by the thread-local RNG
    #[derive(Debug, Clone, Copy, Default)]
    pub struct ThreadRngNumbers;

    impl NumberSource for ThreadRngNumbers {
        fn in_range(&self, range: RangeInclusive<u32>) -> u32 {
            use rand::Rng;
            rand::thread_rng().gen_range(range)
        }
    }
}
