//! The assembled state layer: store, middleware pipeline and orchestrators.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use forkful::{ActionLog, ActionLogConfig, ActionLoggerMiddleware, EffectRuntime};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::action::{Action, AddressAction, RestaurantAction, SearchAction, UserAction};
use crate::api::{ApiGateway, HttpGateway};
use crate::config::ClientConfig;
use crate::credentials::{CredentialStore, FileCredentialStore};
use crate::effect::Effect;
use crate::error::ClientError;
use crate::middleware::{AuthGate, DerivedFetch, Pipeline};
use crate::model::{Credentials, NewAddress, Password, RestaurantId};
use crate::navigation::Navigator;
use crate::orchestrator::Orchestrator;
use crate::reducer::reducer;
use crate::state::AppState;

const SETTLE_POLL: Duration = Duration::from_millis(10);

/// Explicitly constructed store for one app session.
///
/// Every state change goes through [`MarketClient::dispatch`] or through
/// events that orchestrator tasks send back. Nothing else mutates state.
pub struct MarketClient {
    runtime: EffectRuntime<AppState, Action, Effect, Pipeline>,
    orchestrator: Orchestrator,
    config: ClientConfig,
    temp_seq: AtomicU64,
}

impl MarketClient {
    pub fn new(
        config: ClientConfig,
        api: Arc<dyn ApiGateway>,
        credentials: Arc<dyn CredentialStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let pipeline = (
            AuthGate::new(navigator),
            DerivedFetch::new(config.listing_page_size),
            ActionLoggerMiddleware::with_log(ActionLogConfig::with_capacity(
                config.action_log_capacity,
            )),
        );
        let orchestrator = Orchestrator::new(api, credentials, config.search_debounce());

        Self {
            runtime: EffectRuntime::new(AppState::default(), reducer, pipeline),
            orchestrator,
            config,
            temp_seq: AtomicU64::new(0),
        }
    }

    /// Client over HTTP with the token kept on disk.
    pub fn from_config(config: ClientConfig, navigator: Arc<dyn Navigator>) -> Result<Self, ClientError> {
        config.validate()?;
        let api = Arc::new(HttpGateway::new(&config)?);
        let credentials = Arc::new(FileCredentialStore::new(config.credentials_path()?));
        Ok(Self::new(config, api, credentials, navigator))
    }

    /// Dispatch an event through the pipeline. Returns whether state changed.
    pub fn dispatch(&mut self, action: impl Into<Action>) -> bool {
        let orchestrator = &self.orchestrator;
        self.runtime
            .dispatch(action.into(), &mut |effect, ctx| orchestrator.handle(effect, ctx))
    }

    /// Wait for the next event from an orchestrator task and dispatch it.
    pub async fn next(&mut self) -> Option<bool> {
        let orchestrator = &self.orchestrator;
        self.runtime
            .next(&mut |effect, ctx| orchestrator.handle(effect, ctx))
            .await
    }

    /// Dispatch every event already waiting, without blocking.
    pub fn drain(&mut self) -> usize {
        let orchestrator = &self.orchestrator;
        self.runtime
            .drain(&mut |effect, ctx| orchestrator.handle(effect, ctx))
    }

    /// Process events until no orchestrator task is left running.
    pub async fn settle(&mut self) {
        loop {
            self.drain();
            if !self.runtime.tasks().has_running() {
                // A task may have reported between the drain and the check.
                if self.drain() == 0 {
                    break;
                }
                continue;
            }
            let orchestrator = &self.orchestrator;
            let _ = tokio::time::timeout(
                SETTLE_POLL,
                self.runtime
                    .next(&mut |effect, ctx| orchestrator.handle(effect, ctx)),
            )
            .await;
        }
    }

    /// Run the event loop until `cancel` fires.
    pub async fn run(&mut self, cancel: CancellationToken) {
        let orchestrator = self.orchestrator.clone();
        self.runtime
            .run(cancel, move |effect, ctx| orchestrator.handle(effect, ctx))
            .await;
    }

    pub fn state(&self) -> &AppState {
        self.runtime.state()
    }

    /// Mutable state, bypassing reducers. For seeding fixtures only.
    #[doc(hidden)]
    pub fn state_mut(&mut self) -> &mut AppState {
        self.runtime.store_mut().state_mut()
    }

    /// Revision counter bumped on every state change.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.runtime.subscribe()
    }

    /// Events that reached the reducers, oldest first.
    pub fn event_log(&self) -> Option<&ActionLog> {
        self.runtime.store().middleware().2.log()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Temporary id for an optimistic insert.
    pub fn next_temp_id(&self) -> String {
        let seq = self.temp_seq.fetch_add(1, Ordering::Relaxed);
        format!("tmp-{}-{seq}", Utc::now().timestamp_millis())
    }

    /// Rehydrate the session from the credential store.
    pub fn restore_session(&mut self) -> bool {
        self.dispatch(UserAction::RestoreSession)
    }

    pub fn login(&mut self, email: impl Into<String>, password: impl Into<String>) -> bool {
        self.dispatch(UserAction::Login {
            credentials: Credentials {
                email: email.into(),
                password: Password::new(password),
            },
        })
    }

    pub fn logout(&mut self) -> bool {
        self.dispatch(UserAction::Logout)
    }

    /// Optimistically add `address`. Returns the temporary id it is shown under.
    pub fn add_address(&mut self, address: NewAddress) -> String {
        let temp_id = self.next_temp_id();
        self.dispatch(AddressAction::Add {
            temp_id: temp_id.clone(),
            address,
        });
        temp_id
    }

    pub fn select_restaurant(&mut self, id: RestaurantId) -> bool {
        self.dispatch(RestaurantAction::SetSelected { id })
    }

    pub fn search(&mut self, query: impl Into<String>) -> bool {
        self.dispatch(SearchAction::QueryChange {
            query: query.into(),
        })
    }
}
