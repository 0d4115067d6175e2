//! Test utilities for forkful stores
//!
//! - [`TestHarness`]: action channel plus state, for testing effect handlers
//!   and orchestrators without a running runtime
//! - Assertion macros for verifying emitted actions
//!
//! # Example
//!
//! ```ignore
//! use forkful::testing::TestHarness;
//!
//! let mut harness = TestHarness::<AppState, Action>::new(AppState::default());
//!
//! harness.emit(CartAction::Fetch.into());
//! let emitted = harness.drain_emitted();
//! assert_emitted!(emitted, Action::Cart(CartAction::Fetch));
//! ```

use tokio::sync::mpsc;

use crate::Action;

/// Generic test harness with an action channel and state.
///
/// Pass [`TestHarness::sender`] wherever production code expects the
/// runtime's action sender, then drain what was sent.
pub struct TestHarness<S, A: Action> {
    /// The application state under test
    pub state: S,
    tx: mpsc::UnboundedSender<A>,
    rx: mpsc::UnboundedReceiver<A>,
}

impl<S, A: Action> TestHarness<S, A> {
    /// Create a new test harness with the given initial state.
    pub fn new(state: S) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { state, tx, rx }
    }

    /// Get a clone of the action sender for passing to handlers.
    pub fn sender(&self) -> mpsc::UnboundedSender<A> {
        self.tx.clone()
    }

    /// Emit an action (simulates what a handler would do).
    pub fn emit(&self, action: A) {
        let _ = self.tx.send(action);
    }

    /// Drain all emitted actions from the channel.
    pub fn drain_emitted(&mut self) -> Vec<A> {
        let mut actions = Vec::new();
        while let Ok(action) = self.rx.try_recv() {
            actions.push(action);
        }
        actions
    }

    /// Wait for the next emitted action.
    ///
    /// Returns `None` if nothing arrives within `timeout`.
    pub async fn next_emitted(&mut self, timeout: std::time::Duration) -> Option<A> {
        tokio::time::timeout(timeout, self.rx.recv())
            .await
            .ok()
            .flatten()
    }

    /// Check if any actions were emitted.
    pub fn has_emitted(&mut self) -> bool {
        !self.drain_emitted().is_empty()
    }

    /// Drain emitted actions whose name is qualified by `slice`
    /// (`cart` matches `cart/add`).
    ///
    /// Actions of other slices remain in the channel for later draining.
    pub fn drain_slice(&mut self, slice: &str) -> Vec<A> {
        let (matching, rest): (Vec<A>, Vec<A>) = self
            .drain_emitted()
            .into_iter()
            .partition(|action| in_slice(action.name(), slice));

        for action in rest {
            let _ = self.tx.send(action);
        }
        matching
    }
}

impl<S: Default, A: Action> Default for TestHarness<S, A> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

fn in_slice(name: &str, slice: &str) -> bool {
    name.strip_prefix(slice)
        .is_some_and(|rest| rest.starts_with('/'))
}

/// Assert that a specific action was emitted.
///
/// ```ignore
/// let actions = harness.drain_emitted();
/// assert_emitted!(actions, Action::User(UserAction::Logout));
/// ```
#[macro_export]
macro_rules! assert_emitted {
    ($actions:expr, $pattern:pat $(if $guard:expr)?) => {
        assert!(
            $actions.iter().any(|a| matches!(a, $pattern $(if $guard)?)),
            "Expected action matching `{}` to be emitted, but got: {:?}",
            stringify!($pattern),
            $actions
        );
    };
}

/// Assert that a specific action was NOT emitted.
#[macro_export]
macro_rules! assert_not_emitted {
    ($actions:expr, $pattern:pat $(if $guard:expr)?) => {
        assert!(
            !$actions.iter().any(|a| matches!(a, $pattern $(if $guard)?)),
            "Expected action matching `{}` NOT to be emitted, but it was: {:?}",
            stringify!($pattern),
            $actions
        );
    };
}

/// Find and return the first action matching a pattern.
#[macro_export]
macro_rules! find_emitted {
    ($actions:expr, $pattern:pat $(if $guard:expr)?) => {
        $actions.iter().find(|a| matches!(a, $pattern $(if $guard)?))
    };
}

/// Count how many actions match a pattern.
#[macro_export]
macro_rules! count_emitted {
    ($actions:expr, $pattern:pat $(if $guard:expr)?) => {
        $actions.iter().filter(|a| matches!(a, $pattern $(if $guard)?)).count()
    };
}
