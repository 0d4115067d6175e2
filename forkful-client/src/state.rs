//! The state tree: one struct per slice.

use std::collections::BTreeMap;

use forkful::AsyncResource;
use serde::{Deserialize, Serialize};

use crate::model::{
    Achievement, Address, CartItem, Listing, Notification, Profile, Punishment, Recommendation,
    Restaurant, RestaurantId, SearchResults, Session,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    pub auth: AuthState,
    pub address: AddressState,
    pub restaurant: RestaurantState,
    pub listing: ListingState,
    pub cart: CartState,
    pub search: SearchState,
    pub recommendation: RecommendationState,
    pub notification: NotificationState,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthState {
    pub session: Session,
    /// Lifecycle of the last login, register or verify request.
    pub request: AsyncResource<()>,
    /// Email awaiting verification after a successful registration.
    pub pending_verification: Option<String>,
    pub profile: AsyncResource<Option<Profile>>,
    pub favorites: AsyncResource<Vec<Restaurant>>,
    pub achievements: AsyncResource<Vec<Achievement>>,
    pub achievement_catalog: AsyncResource<Vec<Achievement>>,
    pub contributions: AsyncResource<serde_json::Value>,
}

/// Snapshot taken before an optimistic insert, used to roll it back.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingAddress {
    pub previous_primary: Option<String>,
    pub previous_selected: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddressState {
    pub items: AsyncResource<Vec<Address>>,
    #[serde(rename = "selectedAddressId")]
    pub selected_id: Option<String>,
    #[serde(skip)]
    pub pending: BTreeMap<String, PendingAddress>,
}

impl AddressState {
    pub fn get(&self, id: &str) -> Option<&Address> {
        self.items.data.iter().find(|address| address.id == id)
    }

    pub fn selected(&self) -> Option<&Address> {
        self.selected_id.as_deref().and_then(|id| self.get(id))
    }

    pub fn primary(&self) -> Option<&Address> {
        self.items.data.iter().find(|address| address.is_primary)
    }

    /// Whether `id` is a temporary entry still waiting for the server.
    pub fn is_pending(&self, id: &str) -> bool {
        self.pending.contains_key(id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RestaurantState {
    pub nearby: AsyncResource<Vec<Restaurant>>,
    pub detail: AsyncResource<Option<Restaurant>>,
    pub punishments: AsyncResource<Vec<Punishment>>,
    pub selected_id: Option<RestaurantId>,
}

impl RestaurantState {
    /// The selected restaurant, from the detail view or the nearby list.
    pub fn selected(&self) -> Option<&Restaurant> {
        let id = self.selected_id?;
        self.detail
            .data
            .as_ref()
            .filter(|restaurant| restaurant.id == id)
            .or_else(|| self.nearby.data.iter().find(|restaurant| restaurant.id == id))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListingState {
    pub items: AsyncResource<Vec<Listing>>,
    pub restaurant_id: Option<RestaurantId>,
    pub page: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartState {
    pub items: AsyncResource<Vec<CartItem>>,
}

impl CartState {
    /// Restaurant every item in the cart belongs to.
    pub fn restaurant_id(&self) -> Option<RestaurantId> {
        self.items.data.first().map(|item| item.restaurant_id)
    }

    /// Whether an item from `restaurant_id` may join the cart.
    pub fn accepts(&self, restaurant_id: RestaurantId) -> bool {
        self.restaurant_id().is_none_or(|id| id == restaurant_id)
    }

    pub fn total_count(&self) -> u32 {
        self.items.data.iter().map(|item| item.count).sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchState {
    pub query: String,
    pub results: AsyncResource<SearchResults>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendationState {
    pub items: AsyncResource<Vec<Recommendation>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotificationState {
    pub items: Vec<Notification>,
}

impl NotificationState {
    pub fn unread_count(&self) -> usize {
        self.items.iter().filter(|n| !n.read).count()
    }
}
