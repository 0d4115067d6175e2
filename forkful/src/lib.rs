//! forkful: reactive client-side state synchronization
//!
//! Like Redux/Elm, but headless. State lives in one store, every mutation
//! goes through a dispatched action, and async work reports back through
//! result actions.
//!
//! # Example
//! ```ignore
//! use forkful::prelude::*;
//!
//! #[derive(Action, Clone, Debug)]
//! #[action(slice = "cart")]
//! enum CartAction {
//!     Fetch,
//!     DidLoad { generation: Generation, items: Vec<CartItem> },
//! }
//!
//! assert_eq!(CartAction::Fetch.name(), "cart/fetch");
//! ```

// Re-export everything from core
pub use forkful_core::*;

// Re-export derive macros
pub use forkful_macros::Action;

/// Prelude for convenient imports
pub mod prelude {
    // Traits
    pub use forkful_core::{Action, ActionSummary, Middleware};

    // Store
    pub use forkful_core::{
        DispatchQueue, DispatchResult, Flow, NoopMiddleware, Reducer, Store, StoreWithMiddleware,
    };

    // Runtime
    pub use forkful_core::{EffectContext, EffectRuntime, TaskKey, TaskManager};

    // Resources
    pub use forkful_core::{AsyncResource, Generation, Status};

    // Logging
    pub use forkful_core::{ActionLogConfig, ActionLoggerConfig, ActionLoggerMiddleware};

    // Derive macros
    pub use forkful_macros::Action;
}
