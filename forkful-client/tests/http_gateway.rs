use std::sync::Arc;

use forkful::Status;
use forkful_client::api::endpoints;
use forkful_client::model::AuthToken;
use forkful_client::{
    ApiError, ApiGateway, CartAction, ClientConfig, HttpGateway, MarketClient,
    MemoryCredentialStore, RecordingNavigator,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn gateway(server: &MockServer) -> HttpGateway {
    HttpGateway::new(&ClientConfig {
        base_url: server.uri(),
        ..Default::default()
    })
    .unwrap()
}

#[tokio::test]
async fn test_sends_bearer_and_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/7/listings"))
        .and(query_param("page", "1"))
        .and(query_param("limit", "10"))
        .and(header("authorization", "Bearer abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": 1 }])))
        .expect(1)
        .mount(&server)
        .await;

    let body = gateway(&server)
        .request(endpoints::listings(7, 1, 10).bearer(&AuthToken::new("abc")))
        .await
        .unwrap();

    assert_eq!(body, json!([{ "id": 1 }]));
}

#[tokio::test]
async fn test_error_body_message_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Invalid credentials" })),
        )
        .mount(&server)
        .await;

    let err = gateway(&server)
        .request(endpoints::login(json!({ "email": "a@b.c", "password": "x" })))
        .await
        .unwrap_err();

    assert!(matches!(
        &err,
        ApiError::Server { status: 401, message } if message == "Invalid credentials"
    ));
    assert_eq!(err.to_string(), "Invalid credentials");
}

#[tokio::test]
async fn test_error_without_message_uses_status_reason() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cart"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = gateway(&server)
        .request(endpoints::cart().bearer(&AuthToken::new("abc")))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Internal Server Error");
    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn test_empty_body_is_null() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/cart/5"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let body = gateway(&server)
        .request(endpoints::remove_from_cart(5))
        .await
        .unwrap();

    assert_eq!(body, Value::Null);
}

#[tokio::test]
async fn test_malformed_body_keeps_raw_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = gateway(&server).request(endpoints::profile()).await.unwrap_err();

    assert!(matches!(err, ApiError::Decode { body, .. } if body == "<html>oops</html>"));
}

#[tokio::test]
async fn test_client_round_trip_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_json(json!({ "email": "ada@example.com", "password": "pw" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "abc" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/cart"))
        .and(header("authorization", "Bearer abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [
            { "id": 1, "listing_id": 5, "restaurant_id": 3, "count": 2 }
        ]})))
        .mount(&server)
        .await;

    let mut client = MarketClient::new(
        ClientConfig {
            base_url: server.uri(),
            ..Default::default()
        },
        Arc::new(gateway(&server)),
        Arc::new(MemoryCredentialStore::new()),
        Arc::new(RecordingNavigator::new()),
    );

    client.login("ada@example.com", "pw");
    client.settle().await;
    client.dispatch(CartAction::Fetch);
    client.settle().await;

    let cart = &client.state().cart;
    assert_eq!(cart.items.status, Status::Succeeded);
    assert_eq!(cart.total_count(), 2);
    assert_eq!(cart.restaurant_id(), Some(3));
}
