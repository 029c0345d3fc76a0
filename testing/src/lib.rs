//! # Todo Sync Testing
//!
//! Testing utilities and helpers for the todo sync reducer architecture.
//!
//! This crate provides:
//! - Mock implementations of Environment traits
//! - A Given-When-Then harness for reducers
//! - Helpers for inspecting and resolving effect descriptions
//! - Assertion helpers for effects
//!
//! ## Example
//!
//! ```ignore
//! use todo_sync_testing::{ReducerTest, assertions};
//!
//! ReducerTest::new(TodoReducer::new())
//!     .with_env(test_environment())
//!     .given_state(TodoState::new(owner))
//!     .when_action(TodoAction::Create { title: "  ".into() })
//!     .then_state(|s| assert!(s.notification.message().is_some()))
//!     .then_effects(assertions::assert_has_cancellable_effect)
//!     .run();
//! ```

use chrono::{DateTime, Utc};
use todo_sync_core::environment::Clock;


pub use reducer_test::{ReducerTest, assertions};

/// Mock implementations for testing.
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use todo_sync_testing::mocks::FixedClock;
    /// use todo_sync_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
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

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

/// Helpers for looking inside effect descriptions without a Store
pub mod helpers {
    use todo_sync_core::effect::Effect;

    /// Flatten composite effects into their leaves
    ///
    /// `Parallel`, `Sequential` and `Cancellable` wrappers are unwrapped and
    /// `Effect::None` is dropped, leaving `Future`, `Delay` and `Cancel` effects
    /// in declaration order.
    #[must_use]
    pub fn flatten<A>(effects: impl IntoIterator<Item = Effect<A>>) -> Vec<Effect<A>> {
        let mut leaves = Vec::new();
        for effect in effects {
            match effect {
                Effect::None => {},
                Effect::Parallel(inner) | Effect::Sequential(inner) => {
                    leaves.extend(flatten(inner));
                },
                Effect::Cancellable { effect, .. } => leaves.extend(flatten([*effect])),
                leaf => leaves.push(leaf),
            }
        }
        leaves
    }

    /// Await every `Future` effect and collect the actions they produce
    ///
    /// Delays are not waited on; their actions are returned immediately, after
    /// the future results. Cancel effects are ignored.
    pub async fn resolve<A>(effects: impl IntoIterator<Item = Effect<A>>) -> Vec<A> {
        let mut produced = Vec::new();
        let mut delayed = Vec::new();

        for effect in flatten(effects) {
            match effect {
                Effect::Future(fut) => produced.extend(fut.await),
                Effect::Delay { action, .. } => delayed.push(*action),
                _ => {},
            }
        }

        produced.extend(delayed);
        produced
    }

    /// Blocking variant of [`resolve`] for synchronous tests
    pub fn resolve_blocking<A>(effects: impl IntoIterator<Item = Effect<A>>) -> Vec<A> {
        futures::executor::block_on(resolve(effects))
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, test_clock};
