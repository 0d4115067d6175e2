mod common;

use common::{harness, names, new_address, signed_in, Harness};
use forkful::Status;
use forkful_client::{AddressAction, ApiError, Method};
use pretty_assertions::assert_eq;
use serde_json::json;

fn seeded() -> Harness {
    let mut h = signed_in();
    let state = h.client.state_mut();
    state.address.items.data = vec![
        new_address("Home", true).with_id("1"),
        new_address("Work", false).with_id("2"),
    ];
    state.address.selected_id = Some("1".into());
    h
}

fn ids(h: &Harness) -> Vec<String> {
    h.client
        .state()
        .address
        .items
        .data
        .iter()
        .map(|a| a.id.clone())
        .collect()
}

#[tokio::test]
async fn test_rejected_create_restores_collection_byte_for_byte() {
    let mut h = seeded();
    h.api.fail(Method::Post, "/user/addresses", 500, "Network Error");
    let before = serde_json::to_vec(&h.client.state().address.items.data).unwrap();

    let temp_id = h.client.add_address(new_address("Office", true));

    // Visible before any network round trip.
    assert_eq!(h.client.state().address.selected_id.as_deref(), Some(temp_id.as_str()));
    assert!(ids(&h).contains(&temp_id));

    h.client.settle().await;

    let address = &h.client.state().address;
    assert_eq!(serde_json::to_vec(&address.items.data).unwrap(), before);
    assert_eq!(address.selected_id.as_deref(), Some("1"));
    assert_eq!(address.items.status, Status::Failed);
    assert_eq!(address.items.error.as_deref(), Some("Network Error"));
    assert!(names(&h.client).contains(&"address/didFailCreate"));
}

#[tokio::test]
async fn test_confirmed_create_replaces_temporary_entry() {
    let mut h = seeded();
    h.api.respond(
        Method::Post,
        "/user/addresses",
        json!({
            "id": "42", "street": "Office", "latitude": 40.98, "longitude": 29.02,
            "is_primary": true
        }),
    );

    let temp_id = h.client.add_address(new_address("Office", true));
    h.client.settle().await;

    assert_eq!(ids(&h), vec!["1", "2", "42"]);
    assert!(!ids(&h).contains(&temp_id));
    let address = &h.client.state().address;
    assert_eq!(address.selected_id.as_deref(), Some("42"));
    assert_eq!(address.primary().map(|a| a.id.as_str()), Some("42"));
    assert_eq!(address.items.data.iter().filter(|a| a.is_primary).count(), 1);
    assert_eq!(address.items.status, Status::Succeeded);

    let request = h.api.requests().pop().unwrap();
    assert_eq!(request.body.unwrap()["street"], "Office");
}

#[tokio::test]
async fn test_failure_leaves_concurrent_addition_untouched() {
    let mut h = seeded();
    h.api.route(Method::Post, "/user/addresses", None, |request| {
        let street = request.body.as_ref().and_then(|b| b["street"].as_str()).unwrap_or_default();
        if street == "Doomed" {
            Err(ApiError::Server {
                status: 422,
                message: "Invalid address".into(),
            })
        } else {
            Ok(json!({ "id": "43", "street": street, "latitude": 40.98, "longitude": 29.02 }))
        }
    });

    h.client.add_address(new_address("Doomed", false));
    h.client.add_address(new_address("Kept", false));
    h.client.settle().await;

    assert_eq!(ids(&h), vec!["1", "2", "43"]);
    assert_eq!(h.client.state().address.selected_id.as_deref(), Some("1"));
}

#[tokio::test]
async fn test_removing_selected_address_clears_selection() {
    let mut h = seeded();
    h.api.respond(
        Method::Post,
        "/user/addresses",
        json!({ "id": "42", "latitude": 40.98, "longitude": 29.02, "is_primary": true }),
    );

    let temp_id = h.client.add_address(new_address("Office", true));
    h.client.dispatch(AddressAction::Remove { id: temp_id.clone() });

    assert_eq!(h.client.state().address.selected_id, None);

    // The late confirmation has nothing to replace.
    h.client.settle().await;
    assert_eq!(ids(&h), vec!["1", "2"]);
}

#[tokio::test]
async fn test_invalid_address_is_rolled_back_without_request() {
    let mut h = seeded();

    h.client.add_address(new_address("   ", false));
    h.client.settle().await;

    assert_eq!(ids(&h), vec!["1", "2"]);
    assert_eq!(h.client.state().address.items.status, Status::Failed);
    assert!(h.api.requests().is_empty());
}

#[tokio::test]
async fn test_signed_out_add_never_shows_entry() {
    let mut h = harness();

    h.client.add_address(new_address("Office", true));
    h.client.settle().await;

    assert!(h.client.state().address.items.data.is_empty());
    assert_eq!(
        names(&h.client).iter().filter(|name| **name == "user/logout").count(),
        1
    );
    assert!(h.api.requests().is_empty());
}
