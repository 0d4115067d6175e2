//! Middleware pipeline for the marketplace store.
//!
//! Order matters: the auth gate runs first so nothing reaches a reducer
//! without a session, and the logger runs last so its log holds exactly the
//! events that reached reducers.

mod auth_gate;
mod derived_fetch;

pub use auth_gate::AuthGate;
pub use derived_fetch::DerivedFetch;

use forkful::ActionLoggerMiddleware;

/// The pipeline every [`crate::MarketClient`] dispatch runs through.
pub type Pipeline = (AuthGate, DerivedFetch, ActionLoggerMiddleware);
