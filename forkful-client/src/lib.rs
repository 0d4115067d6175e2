//! Client-side state layer for the forkful food marketplace.
//!
//! One [`MarketClient`] owns the state tree. Events flow through a fixed
//! middleware pipeline (auth gate, derived listing fetch, event log) into
//! per-slice reducers; reducers describe async work as [`Effect`]s, which
//! the [`orchestrator`] runs as keyed tasks that report back with `Did*`
//! events.
//!
//! ```ignore
//! use std::sync::Arc;
//! use forkful_client::{ClientConfig, MarketClient, NoopNavigator};
//!
//! let config = ClientConfig::load()?;
//! let mut client = MarketClient::from_config(config, Arc::new(NoopNavigator))?;
//! client.restore_session();
//! client.select_restaurant(7);
//! client.settle().await;
//! ```

pub mod action;
pub mod api;
pub mod client;
pub mod config;
pub mod credentials;
pub mod effect;
pub mod error;
pub mod geo;
pub mod middleware;
pub mod model;
pub mod navigation;
pub mod orchestrator;
pub mod reducer;
pub mod selectors;
pub mod state;

pub use action::{
    Action, AddressAction, CartAction, ListingAction, NotificationAction, RecommendationAction,
    RestaurantAction, SearchAction, UserAction,
};
pub use api::{ApiGateway, ApiRequest, HttpGateway, Method};
pub use client::MarketClient;
pub use config::ClientConfig;
pub use credentials::{CredentialStore, FileCredentialStore, MemoryCredentialStore};
pub use effect::{CartMutation, Effect};
pub use error::{ApiError, ClientError, ConfigError, CredentialError, ThunkError};
pub use geo::{distance_km, is_open_now, EARTH_RADIUS_KM};
pub use middleware::{AuthGate, DerivedFetch, Pipeline};
pub use navigation::{Navigator, NoopNavigator, RecordingNavigator, Route};
pub use orchestrator::Orchestrator;
pub use reducer::reducer;
pub use state::AppState;
