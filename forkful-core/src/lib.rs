//! Core traits and types for forkful
//!
//! This crate provides the foundational abstractions for client-side state
//! synchronization, following a Redux/Elm-inspired architecture.
//!
//! # Core Concepts
//!
//! - **Action**: Events that describe state changes
//! - **Store**: Centralized state container with reducer pattern
//! - **Middleware**: Ordered interceptors that can stop actions or enqueue follow-ups
//! - **Effects**: Declarative side effects returned by reducers
//! - **AsyncResource**: Uniform `{ data, loading, error, status }` lifecycle
//!
//! # Basic Example
//!
//! ```ignore
//! use forkful_core::prelude::*;
//!
//! #[derive(Action, Clone, Debug)]
//! #[action(slice = "counter")]
//! enum CounterAction {
//!     Increment,
//!     Decrement,
//! }
//!
//! #[derive(Default)]
//! struct AppState {
//!     counter: i32,
//! }
//!
//! fn reducer(state: &mut AppState, action: CounterAction) -> DispatchResult<()> {
//!     match action {
//!         CounterAction::Increment => state.counter += 1,
//!         CounterAction::Decrement => state.counter -= 1,
//!     }
//!     DispatchResult::changed()
//! }
//!
//! let mut store = Store::new(AppState::default(), reducer);
//! store.dispatch(CounterAction::Increment);
//! ```
//!
//! # Async Pattern
//!
//! Async work uses a two-phase action pattern:
//!
//! 1. **Intent actions** make the reducer mark a resource as loading and
//!    return an effect (e.g. `listing/fetch`)
//! 2. **Result actions** carry the outcome back through the action channel
//!    (e.g. `listing/didLoad`, `listing/didFail`)
//!
//! The `did*` naming convention identifies result actions. Results carry the
//! [`Generation`] they were started with, so stale responses are dropped.

pub mod action;
pub mod effect;
pub mod log;
pub mod middleware;
pub mod resource;
pub mod runtime;
pub mod store;
pub mod tasks;
pub mod testing;

// Core trait exports
pub use action::{Action, ActionSummary};

// Store exports
pub use middleware::{DispatchQueue, Flow, Middleware, NoopMiddleware};
pub use store::{Reducer, Store, StoreWithMiddleware};

// Effect exports
pub use effect::DispatchResult;
pub use runtime::{EffectContext, EffectRuntime};
pub use tasks::{TaskKey, TaskManager};

// Resource exports
pub use resource::{AsyncResource, Generation, Status};

// Logging exports
pub use log::{
    glob_match, ActionLog, ActionLogConfig, ActionLogEntry, ActionLoggerConfig,
    ActionLoggerMiddleware,
};

// Testing exports
pub use testing::TestHarness;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::action::{Action, ActionSummary};
    pub use crate::effect::DispatchResult;
    pub use crate::log::{ActionLogConfig, ActionLoggerConfig, ActionLoggerMiddleware};
    pub use crate::middleware::{DispatchQueue, Flow, Middleware, NoopMiddleware};
    pub use crate::resource::{AsyncResource, Generation, Status};
    pub use crate::runtime::{EffectContext, EffectRuntime};
    pub use crate::store::{Reducer, Store, StoreWithMiddleware};
    pub use crate::tasks::{TaskKey, TaskManager};
}
