//! Domain records exchanged with the marketplace API.
//!
//! Server payloads are decoded leniently: unknown fields are kept in `extra`
//! so they survive a round trip through the state tree.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub type RestaurantId = u64;
pub type ListingId = u64;

/// Opaque bearer token. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(***)")
    }
}

/// User password. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Password(String);

impl Password {
    pub fn new(password: impl Into<String>) -> Self {
        Self(password.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Authentication state owned by the auth slice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: Option<AuthToken>,
    #[serde(rename = "isInitialized")]
    pub is_initialized: bool,
}

impl Session {
    pub fn authenticated(token: AuthToken) -> Self {
        Self {
            token: Some(token),
            is_initialized: true,
        }
    }

    /// Whether a usable token is cached.
    pub fn is_authenticated(&self) -> bool {
        self.token.as_ref().is_some_and(|token| !token.is_empty())
    }

    pub fn token(&self) -> Option<&AuthToken> {
        self.token.as_ref().filter(|token| !token.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: Password,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: Password,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailVerification {
    pub email: String,
    pub code: String,
}

/// Body returned by `/login`, `/register` and `/verify_email`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AuthResponse {
    pub token: Option<AuthToken>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub id: String,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub district: String,
    #[serde(default)]
    pub province: String,
    #[serde(default)]
    pub country: String,
    #[serde(rename = "postalCode", default)]
    pub postal_code: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub is_primary: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Address as entered by the user, before the server assigns an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAddress {
    pub street: String,
    pub district: String,
    pub province: String,
    pub country: String,
    #[serde(rename = "postalCode")]
    pub postal_code: String,
    pub latitude: f64,
    pub longitude: f64,
    pub is_primary: bool,
}

impl NewAddress {
    pub fn with_id(self, id: impl Into<String>) -> Address {
        Address {
            id: id.into(),
            street: self.street,
            district: self.district,
            province: self.province,
            country: self.country,
            postal_code: self.postal_code,
            latitude: self.latitude,
            longitude: self.longitude,
            is_primary: self.is_primary,
            extra: Map::new(),
        }
    }

    /// Reject entries the server could never accept.
    pub fn validate(&self) -> Result<(), String> {
        if self.street.trim().is_empty() {
            return Err("street is required".into());
        }
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(format!("latitude {} out of range", self.latitude));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(format!("longitude {} out of range", self.longitude));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Restaurant {
    pub id: RestaurantId,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(rename = "workingDays")]
    pub working_days: Vec<String>,
    #[serde(rename = "workingHoursStart")]
    pub working_hours_start: String,
    #[serde(rename = "workingHoursEnd")]
    pub working_hours_end: String,
    pub rating: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Restaurant {
    pub fn distance_km(&self, latitude: f64, longitude: f64) -> f64 {
        crate::geo::distance_km(self.latitude, self.longitude, latitude, longitude)
    }

    pub fn is_open_at(&self, now: DateTime<Utc>) -> bool {
        crate::geo::is_open_now(
            &self.working_days,
            &self.working_hours_start,
            &self.working_hours_end,
            now,
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Punishment {
    pub id: u64,
    pub reason: Option<String>,
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Listing {
    pub id: ListingId,
    pub restaurant_id: RestaurantId,
    pub name: String,
    pub price: Option<f64>,
    pub count: Option<u32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CartItem {
    pub id: u64,
    pub listing_id: ListingId,
    pub restaurant_id: RestaurantId,
    pub count: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The `/user` profile. Also carries the user's address book.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub id: Option<u64>,
    pub name: String,
    pub email: String,
    pub addresses: Vec<Address>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Achievement {
    pub id: u64,
    pub name: String,
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Recommendation {
    pub restaurant_id: Option<RestaurantId>,
    pub listing_id: Option<ListingId>,
    pub score: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchResults {
    pub restaurants: Vec<Restaurant>,
    pub listings: Vec<Listing>,
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        self.restaurants.is_empty() && self.listings.is_empty()
    }
}

/// Locally received in-app notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub body: String,
    pub received_at: DateTime<Utc>,
    #[serde(default)]
    pub read: bool,
}

/// Collection endpoints answer either with a bare array or with `{ data: [...] }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListPayload<T> {
    Bare(Vec<T>),
    Wrapped { data: Vec<T> },
}

impl<T> ListPayload<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            ListPayload::Bare(items) | ListPayload::Wrapped { data: items } => items,
        }
    }
}
