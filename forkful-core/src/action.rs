//! Action trait for type-safe state mutations

use std::fmt::Debug;

/// Marker trait for actions that can be dispatched to the store
///
/// Actions represent intents to change state. They should be:
/// - Clone: Actions may be logged, replayed, or sent to multiple handlers
/// - Debug: For debugging and logging
/// - Send + 'static: For async dispatch across tasks
///
/// Use `#[derive(Action)]` from `forkful-macros` to auto-implement this trait.
/// With `#[action(slice = "cart")]` the generated names are slice-qualified,
/// e.g. `cart/add`.
pub trait Action: Clone + Debug + Send + 'static {
    /// Get the action name for logging and filtering
    fn name(&self) -> &'static str;
}

/// Short, human-readable description of an action for logs.
///
/// The default uses the `Debug` representation. Override it for actions
/// that carry large payloads or secrets.
pub trait ActionSummary: Action {
    fn summary(&self) -> String {
        format!("{:?}", self)
    }
}
