mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{harness, names, signed_in};
use forkful::Status;
use forkful_client::model::{AuthToken, Listing, Profile, Restaurant};
use forkful_client::{
    ClientConfig, CredentialStore, FileCredentialStore, MarketClient, Method, NoopNavigator,
    UserAction,
};
use pretty_assertions::assert_eq;
use serde_json::json;

#[tokio::test]
async fn test_restore_reads_stored_token() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileCredentialStore::new(dir.path().join("token")));
    store.set_token(&AuthToken::new("stored")).await.unwrap();

    let mut client = MarketClient::new(
        ClientConfig::default(),
        common::ScriptedGateway::new(),
        store,
        Arc::new(NoopNavigator),
    );
    client.restore_session();
    client.settle().await;

    let session = &client.state().auth.session;
    assert!(session.is_initialized);
    assert_eq!(session.token(), Some(&AuthToken::new("stored")));
}

#[tokio::test]
async fn test_logout_resets_user_data_and_forgets_token() {
    let mut h = signed_in();
    h.credentials.set_token(&AuthToken::new("abc")).await.unwrap();
    {
        let state = h.client.state_mut();
        state.listing.items.data = vec![Listing::default()];
        state.listing.restaurant_id = Some(7);
        state.search.query = "pide".into();
        state.restaurant.nearby.data = vec![Restaurant {
            id: 7,
            ..Default::default()
        }];
        state.address.items.data = vec![common::new_address("Home", true).with_id("1")];
        state.address.selected_id = Some("1".into());
    }

    h.client.logout();
    h.client.settle().await;

    let state = h.client.state();
    assert!(!state.auth.session.is_authenticated());
    assert!(state.listing.items.data.is_empty());
    assert_eq!(state.listing.restaurant_id, None);
    assert!(state.search.query.is_empty());
    assert!(state.address.items.data.is_empty());
    assert_eq!(state.address.selected_id, None);
    assert_eq!(state.cart.items.status, Status::Idle);
    // Restaurants are public and survive.
    assert_eq!(state.restaurant.nearby.data.len(), 1);
    assert_eq!(h.credentials.get_token().await.unwrap(), None);
}

#[tokio::test]
async fn test_request_started_before_logout_never_lands() {
    let mut h = signed_in();
    h.api.respond_after(
        Method::Get,
        "/user",
        Duration::from_millis(50),
        json!({ "name": "Ada", "addresses": [
            { "id": "1", "latitude": 1.0, "longitude": 2.0, "is_primary": true }
        ]}),
    );

    h.client.dispatch(UserAction::FetchProfile);
    h.client.logout();
    h.client.settle().await;

    assert_eq!(h.client.state().auth.profile.data, None);
    assert!(h.client.state().address.items.data.is_empty());
}

#[tokio::test]
async fn test_login_answered_after_logout_stays_signed_out() {
    let mut h = harness();
    h.api.respond(Method::Post, "/login", json!({ "token": "abc" }));

    h.client.login("ada@example.com", "pw");
    tokio::time::sleep(Duration::from_millis(50)).await;
    h.client.logout();
    h.client.settle().await;

    assert!(!h.client.state().auth.session.is_authenticated());
    assert_eq!(h.client.state().auth.request.status, Status::Idle);
    assert_eq!(h.credentials.get_token().await.unwrap(), None);
    assert!(names(&h.client).contains(&"user/didLogin"));
}

#[tokio::test]
async fn test_result_from_previous_session_is_discarded_after_relogin() {
    let mut h = signed_in();
    h.api.respond(Method::Post, "/login", json!({ "token": "next" }));

    let generation = h.client.state_mut().auth.profile.start();
    h.client.logout();
    h.client.login("ada@example.com", "pw");
    h.client.settle().await;
    assert!(h.client.state().auth.session.is_authenticated());

    let changed = h.client.dispatch(UserAction::DidLoadProfile {
        generation,
        profile: Profile {
            name: "Stale".into(),
            ..Default::default()
        },
    });

    assert!(!changed);
    assert_eq!(h.client.state().auth.profile.data, None);
}

#[tokio::test]
async fn test_memory_store_starts_signed_out() {
    let mut h = harness();
    h.client.restore_session();
    h.client.settle().await;

    assert!(h.client.state().auth.session.is_initialized);
    assert_eq!(h.client.state().auth.session.token(), None);
}
