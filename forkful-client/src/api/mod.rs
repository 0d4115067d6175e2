//! API gateway: the seam between orchestrators and the network.

mod http;

pub use http::HttpGateway;

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ApiError;
use crate::model::AuthToken;

/// Performs requests against the marketplace API.
///
/// Answers with the decoded JSON body; an empty body is `Value::Null`.
#[async_trait]
pub trait ApiGateway: Send + Sync {
    async fn request(&self, request: ApiRequest) -> Result<Value, ApiError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        })
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// A request relative to the configured base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub token: Option<AuthToken>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            token: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn bearer(mut self, token: &AuthToken) -> Self {
        self.token = Some(token.clone());
        self
    }
}

/// Named endpoints of the marketplace API.
pub mod endpoints {
    use serde_json::Value;

    use super::ApiRequest;
    use crate::model::{ListingId, RestaurantId};

    pub fn login(body: Value) -> ApiRequest {
        ApiRequest::post("/login").json(body)
    }

    pub fn register(body: Value) -> ApiRequest {
        ApiRequest::post("/register").json(body)
    }

    pub fn verify_email(body: Value) -> ApiRequest {
        ApiRequest::post("/verify_email").json(body)
    }

    pub fn profile() -> ApiRequest {
        ApiRequest::get("/user")
    }

    pub fn favorites() -> ApiRequest {
        ApiRequest::get("/user/favorites")
    }

    pub fn achievements() -> ApiRequest {
        ApiRequest::get("/user/achievements")
    }

    pub fn achievement_catalog() -> ApiRequest {
        ApiRequest::get("/achievements")
    }

    pub fn create_address(body: Value) -> ApiRequest {
        ApiRequest::post("/user/addresses").json(body)
    }

    pub fn cart() -> ApiRequest {
        ApiRequest::get("/cart")
    }

    pub fn add_to_cart(listing_id: ListingId, count: u32) -> ApiRequest {
        ApiRequest::post(format!("/cart/{listing_id}")).json(serde_json::json!({ "count": count }))
    }

    pub fn update_cart(listing_id: ListingId, count: u32) -> ApiRequest {
        ApiRequest::put(format!("/cart/{listing_id}")).json(serde_json::json!({ "count": count }))
    }

    pub fn remove_from_cart(listing_id: ListingId) -> ApiRequest {
        ApiRequest::delete(format!("/cart/{listing_id}"))
    }

    pub fn clear_cart() -> ApiRequest {
        ApiRequest::delete("/cart")
    }

    pub fn search(query: &str) -> ApiRequest {
        ApiRequest::get("/search").query("query", query)
    }

    pub fn nearby(latitude: f64, longitude: f64) -> ApiRequest {
        ApiRequest::get("/restaurants/by-proximity")
            .query("latitude", latitude)
            .query("longitude", longitude)
    }

    pub fn restaurant(id: RestaurantId) -> ApiRequest {
        ApiRequest::get(format!("/restaurants/{id}"))
    }

    pub fn punishments(id: RestaurantId) -> ApiRequest {
        ApiRequest::get(format!("/restaurants/{id}/punishment-history"))
    }

    pub fn listings(restaurant_id: RestaurantId, page: u32, limit: u32) -> ApiRequest {
        ApiRequest::get(format!("/{restaurant_id}/listings"))
            .query("page", page)
            .query("limit", limit)
    }

    pub fn contributions() -> ApiRequest {
        ApiRequest::get("/environmental/contributions")
    }

    pub fn recommendations() -> ApiRequest {
        ApiRequest::get("/api/recommendations/users")
    }
}
