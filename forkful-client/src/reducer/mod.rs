//! Reducers: one module per slice, routed by the root [`reducer`].
//!
//! Reducers are the only code that mutates [`AppState`]. Async work is
//! requested by returning an [`Effect`].

mod address;
mod auth;
mod cart;
mod listing;
mod notification;
mod recommendation;
mod restaurant;
mod search;

use forkful::DispatchResult;

use crate::action::Action;
use crate::effect::Effect;
use crate::state::AppState;

/// Root reducer.
pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        Action::User(action) => auth::reduce(state, action),
        Action::Address(action) => address::reduce(&mut state.address, action),
        Action::Restaurant(action) => restaurant::reduce(&mut state.restaurant, action),
        Action::Listing(action) => listing::reduce(&mut state.listing, action),
        Action::Cart(action) => cart::reduce(&mut state.cart, action),
        Action::Search(action) => search::reduce(&mut state.search, action),
        Action::Recommendation(action) => {
            recommendation::reduce(&mut state.recommendation, action)
        }
        Action::Notification(action) => notification::reduce(&mut state.notification, action),
    }
}

/// Result of applying an async outcome that may have gone stale.
pub(crate) fn resolved(applied: bool, action: &'static str) -> DispatchResult<Effect> {
    if !applied {
        tracing::debug!(action, "Discarding stale result");
    }
    DispatchResult::from_changed(applied)
}
