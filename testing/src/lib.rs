//! # Tasklist Testing
//!
//! Testing utilities and helpers for the tasklist reducer architecture.
//!
//! This crate provides:
//! - [`ReducerTest`]: Given-When-Then harness for reducers, with a `settle`
//!   mode that feeds effect results back
//! - [`helpers`]: Drive effect descriptions without a Store
//!
//! ## Example
//!
//! ```ignore
//! use tasklist_testing::ReducerTest;
//!
//! let settled = ReducerTest::new(TodoReducer::new(), environment)
//!     .given(TodoState::new())
//!     .when(TodoAction::Load)
//!     .then(|state| assert!(!state.is_loading))
//!     .settle()
//!     .await;
//! ```


/// Test helpers and utilities
pub mod helpers {
    use std::time::Duration;
    use tasklist_core::effect::Effect;

    /// Resolve effect descriptions into the actions they produce.
    ///
    /// Futures are awaited in order, so the result is deterministic. Delays
    /// are skipped: timers belong to the runtime, not to the reducer under
    /// test.
    pub async fn collect_actions<A, I>(effects: I) -> Vec<A>
    where
        I: IntoIterator<Item = Effect<A>>,
    {
        let mut actions = Vec::new();
        for effect in effects {
            if let Effect::Future(fut) = effect {
                if let Some(action) = fut.await {
                    actions.push(action);
                }
            }
        }
        actions
    }

    /// Actions carried by `Effect::Delay` descriptions, with their
    /// durations, without waiting for them.
    #[must_use]
    pub fn delayed_actions<A: Clone>(effects: &[Effect<A>]) -> Vec<(Duration, A)> {
        effects
            .iter()
            .filter_map(|effect| match effect {
                Effect::Delay { duration, action } => Some((*duration, (**action).clone())),
                Effect::None | Effect::Future(_) => None,
            })
            .collect()
    }
}

// Re-export commonly used items
pub use reducer_test::{ReducerTest, Settled};
