//! Handle to the app's navigation stack.

use std::sync::{Mutex, PoisonError};

/// Top-level routes the state layer can send the user to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    VerifyEmail,
    Home,
}

impl Route {
    pub fn name(self) -> &'static str {
        match self {
            Route::Login => "Login",
            Route::VerifyEmail => "VerifyEmail",
            Route::Home => "Home",
        }
    }
}

/// Navigation collaborator, injected into the middleware that needs it.
pub trait Navigator: Send + Sync {
    /// Replace the navigation stack with `route`.
    fn reset(&self, route: Route);
}

/// Navigator for headless use. Ignores every request.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn reset(&self, _route: Route) {}
}

/// Navigator that remembers every reset, for tests and diagnostics.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    resets: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resets(&self) -> Vec<Route> {
        self.resets
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last(&self) -> Option<Route> {
        self.resets().last().copied()
    }
}

impl Navigator for RecordingNavigator {
    fn reset(&self, route: Route) {
        tracing::debug!(route = route.name(), "Navigation reset");
        self.resets
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(route);
    }
}
