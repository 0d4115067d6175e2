//! Centralized state store with reducer pattern

use std::marker::PhantomData;

use crate::effect::DispatchResult;
use crate::middleware::{DispatchQueue, Middleware};
use crate::Action;

/// A reducer function that handles actions, mutates state and declares effects.
pub type Reducer<S, A, E> = fn(&mut S, A) -> DispatchResult<E>;

/// Centralized state store with Redux-like reducer pattern
///
/// The store holds the application state and provides a single point
/// for state mutations through the `dispatch` method. It is constructed
/// explicitly and owned by its runtime; there is no global instance.
///
/// # Example
/// ```ignore
/// let mut store = Store::new(AppState::default(), reducer);
/// let result = store.dispatch(CartAction::Fetch.into());
/// assert!(result.changed);
/// ```
pub struct Store<S, A, E> {
    state: S,
    reducer: Reducer<S, A, E>,
    _marker: PhantomData<(A, E)>,
}

impl<S, A: Action, E> Store<S, A, E> {
    /// Create a new store with initial state and reducer
    pub fn new(state: S, reducer: Reducer<S, A, E>) -> Self {
        Self {
            state,
            reducer,
            _marker: PhantomData,
        }
    }

    /// Dispatch an action straight to the reducer
    pub fn dispatch(&mut self, action: A) -> DispatchResult<E> {
        (self.reducer)(&mut self.state, action)
    }

    /// Get a reference to the current state
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Get a mutable reference to the state
    ///
    /// Use this sparingly - prefer dispatching actions for state changes.
    /// Intended for seeding state in tests and at startup.
    pub fn state_mut(&mut self) -> &mut S {
        &mut self.state
    }
}

/// Store with middleware support
///
/// Wraps a `Store` and runs every action through the middleware chain.
/// Actions enqueued by middleware are processed after the current one,
/// each through the full chain, so one dispatch may run several reducers.
pub struct StoreWithMiddleware<S, A: Action, E, M: Middleware<S, A>> {
    store: Store<S, A, E>,
    middleware: M,
}

impl<S, A: Action, E, M: Middleware<S, A>> StoreWithMiddleware<S, A, E, M> {
    /// Create a new store with middleware
    pub fn new(state: S, reducer: Reducer<S, A, E>, middleware: M) -> Self {
        Self {
            store: Store::new(state, reducer),
            middleware,
        }
    }

    /// Dispatch an action through middleware and store
    ///
    /// Returns the merged result of every reducer that ran, including the
    /// ones for follow-up actions.
    pub fn dispatch(&mut self, action: A) -> DispatchResult<E> {
        let mut queue = DispatchQueue::new();
        queue.dispatch(action);

        let mut result = DispatchResult::unchanged();
        while let Some(action) = queue.pop() {
            if self
                .middleware
                .before(&action, self.store.state(), &mut queue)
                .is_stop()
            {
                tracing::debug!(action = %action.name(), "Action stopped by middleware");
                continue;
            }

            let step = self.store.dispatch(action.clone());
            self.middleware
                .after(&action, self.store.state(), step.changed, &mut queue);
            result.merge(step);
        }
        result
    }

    /// Get a reference to the current state
    pub fn state(&self) -> &S {
        self.store.state()
    }

    /// Get a mutable reference to the state
    pub fn state_mut(&mut self) -> &mut S {
        self.store.state_mut()
    }

    /// Get a reference to the middleware
    pub fn middleware(&self) -> &M {
        &self.middleware
    }

    /// Get a mutable reference to the middleware
    pub fn middleware_mut(&mut self) -> &mut M {
        &mut self.middleware
    }
}
