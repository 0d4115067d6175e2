use std::sync::Arc;

use forkful::{Action as _, DispatchQueue, Flow, Middleware};

use crate::action::{Action, UserAction};
use crate::navigation::{Navigator, Route};
use crate::state::AppState;

/// Drops every non-session event while no token is cached.
///
/// A dropped intent is replaced by `user/logout` and the navigator is sent
/// back to the login route. A dropped `did*` result is discarded quietly:
/// it answers work from a session that has already been reset. The token is
/// read from the session slice, which the credential store rehydrates at
/// startup.
pub struct AuthGate {
    navigator: Arc<dyn Navigator>,
}

impl AuthGate {
    pub fn new(navigator: Arc<dyn Navigator>) -> Self {
        Self { navigator }
    }
}

impl Middleware<AppState, Action> for AuthGate {
    fn before(&mut self, action: &Action, state: &AppState, queue: &mut DispatchQueue<Action>) -> Flow {
        if action.is_session_event() || state.auth.session.is_authenticated() {
            return Flow::Continue;
        }

        if action.is_result() {
            tracing::debug!(action = action.name(), "Discarding result without a session");
            return Flow::Stop;
        }

        tracing::warn!(action = action.name(), "No session token; logging out");
        self.navigator.reset(Route::Login);
        queue.dispatch(UserAction::Logout.into());
        Flow::Stop
    }
}
