//! Ergonomic testing utilities for reducers
//!
//! This module provides a fluent API for testing reducers with readable Given-When-Then syntax.

#![allow(clippy::module_name_repetitions)] // ReducerTest is the natural name

use fila_core::{effect::Effect, reducer::Reducer};

/// Type alias for state assertion functions
type StateAssertion<S> = Box<dyn FnOnce(&S)>;

/// Type alias for effect assertion functions
type EffectAssertion<A> = Box<dyn FnOnce(&[Effect<A>])>;

/// Fluent API for testing reducers with Given-When-Then syntax
///
/// # Example
///
/// ```ignore
/// use fila_testing::ReducerTest;
///
/// ReducerTest::new(CartReducer)
///     .with_env(env)
///     .given_state(CartState::default())
///     .when_action(CartAction::Add { item })
///     .then_state(|s| assert_eq!(s.items.len(), 1))
///     .then_effects(|effects| assert!(effects.is_empty()))
///     .run();
/// ```
pub struct ReducerTest<R, S, A, E>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    reducer: R,
    environment: Option<E>,
    initial_state: Option<S>,
    action: Option<A>,
    state_assertions: Vec<StateAssertion<S>>,
    effect_assertions: Vec<EffectAssertion<A>>,
}

impl<R, S, A, E> ReducerTest<R, S, A, E>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    /// Start building a test for the given reducer
    #[must_use]
    pub const fn new(reducer: R) -> Self {
        Self {
            reducer,
            environment: None,
            initial_state: None,
            action: None,
            state_assertions: Vec::new(),
            effect_assertions: Vec::new(),
        }
    }

    /// Provide the environment the reducer runs against
    #[must_use]
    pub fn with_env(mut self, environment: E) -> Self {
        self.environment = Some(environment);
        self
    }

    /// Set the state the reducer starts from
    #[must_use]
    pub fn given_state(mut self, state: S) -> Self {
        self.initial_state = Some(state);
        self
    }

    /// Set the action under test
    #[must_use]
    pub fn when_action(mut self, action: A) -> Self {
        self.action = Some(action);
        self
    }

    /// Assert on the state after reduction (chainable)
    #[must_use]
    pub fn then_state(mut self, assertion: impl FnOnce(&S) + 'static) -> Self {
        self.state_assertions.push(Box::new(assertion));
        self
    }

    /// Assert on the returned effects (chainable)
    #[must_use]
    pub fn then_effects(mut self, assertion: impl FnOnce(&[Effect<A>]) + 'static) -> Self {
        self.effect_assertions.push(Box::new(assertion));
        self
    }

    /// Execute the reducer and run all assertions
    ///
    /// # Panics
    ///
    /// Panics if environment, initial state or action were not provided, or
    /// if any assertion fails.
    #[allow(clippy::expect_used, clippy::panic)] // Test builder; loud failures wanted
    pub fn run(self) {
        let env = self
            .environment
            .expect("Environment required: call with_env()");
        let mut state = self
            .initial_state
            .expect("Initial state required: call given_state()");
        let action = self.action.expect("Action required: call when_action()");

        let effects = self.reducer.reduce(&mut state, action, &env);

        for assertion in self.state_assertions {
            assertion(&state);
        }
        for assertion in self.effect_assertions {
            assertion(&effects);
        }
    }
}

/// Assertion helpers for effect slices.
#[allow(clippy::panic)] // Assertion helpers panic on failure by design of assert!
pub mod assertions {
    use fila_core::effect::Effect;

    /// Assert the reducer returned no work
    ///
    /// Accepts both an empty slice and a lone [`Effect::None`].
    pub fn assert_no_effects<A>(effects: &[Effect<A>]) {
        assert!(
            effects.is_empty() || matches!(effects, [Effect::None]),
            "Expected no effects, got {}",
            effects.len()
        );
    }

    /// Assert an exact number of effects
    pub fn assert_effects_count<A>(effects: &[Effect<A>], expected: usize) {
        assert_eq!(
            effects.len(),
            expected,
            "Expected {} effects, got {}",
            expected,
            effects.len()
        );
    }

    /// Assert at least one [`Effect::Future`] is present
    pub fn assert_has_future_effect<A>(effects: &[Effect<A>]) {
        assert!(
            effects.iter().any(|e| matches!(e, Effect::Future(_))),
            "Expected a Future effect"
        );
    }

    /// Assert at least one [`Effect::Delay`] is present
    pub fn assert_has_delay_effect<A>(effects: &[Effect<A>]) {
        assert!(
            effects.iter().any(|e| matches!(e, Effect::Delay { .. })),
            "Expected a Delay effect"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fila_core::{SmallVec, smallvec};

    #[derive(Debug, Default, PartialEq)]
    struct CounterState {
        value: i64,
    }

    #[derive(Debug)]
    enum CounterAction {
        Add(i64),
        Reset,
    }

    struct CounterReducer;

    impl Reducer for CounterReducer {
        type State = CounterState;
        type Action = CounterAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            (): &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            match action {
                CounterAction::Add(n) => state.value += n,
                CounterAction::Reset => state.value = 0,
            }
            smallvec![Effect::None]
        }
    }

    #[test]
    fn given_when_then_runs_assertions() {
        ReducerTest::new(CounterReducer)
            .with_env(())
            .given_state(CounterState { value: 40 })
            .when_action(CounterAction::Add(2))
            .then_state(|s| assert_eq!(s.value, 42))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn reset_clears_value() {
        ReducerTest::new(CounterReducer)
            .with_env(())
            .given_state(CounterState { value: 17 })
            .when_action(CounterAction::Reset)
            .then_state(|s| assert_eq!(s.value, 0))
            .run();
    }

    #[test]
    #[should_panic(expected = "Environment required")]
    fn run_without_env_panics() {
        ReducerTest::new(CounterReducer)
            .given_state(CounterState::default())
            .when_action(CounterAction::Reset)
            .run();
    }
}
