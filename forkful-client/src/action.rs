//! Every event the store understands, as a closed tagged union.
//!
//! Names are slice-qualified (`user/logout`, `listing/didLoad`). Intent
//! events start work; `Did*` events carry results back and echo the
//! [`Generation`] of the request they answer.

use forkful::{Action as _, ActionSummary, Generation};

use crate::model::{
    Achievement, Address, AuthToken, CartItem, Credentials, EmailVerification, Listing, ListingId,
    NewAddress, Notification, Profile, Punishment, Recommendation, Registration, Restaurant,
    RestaurantId, SearchResults,
};

#[derive(forkful::Action, Clone, Debug, PartialEq)]
pub enum Action {
    #[action(nested)]
    User(UserAction),
    #[action(nested)]
    Address(AddressAction),
    #[action(nested)]
    Restaurant(RestaurantAction),
    #[action(nested)]
    Listing(ListingAction),
    #[action(nested)]
    Cart(CartAction),
    #[action(nested)]
    Search(SearchAction),
    #[action(nested)]
    Recommendation(RecommendationAction),
    #[action(nested)]
    Notification(NotificationAction),
}

impl Action {
    /// Events allowed through without a session token.
    pub fn is_session_event(&self) -> bool {
        matches!(self, Action::User(action) if action.is_session_event())
    }

    /// Whether this event carries the outcome of earlier async work.
    pub fn is_result(&self) -> bool {
        self.name()
            .rsplit('/')
            .next()
            .is_some_and(|event| event.starts_with("did"))
    }
}

impl ActionSummary for Action {
    fn summary(&self) -> String {
        match self {
            // Result payloads can be large; the name and generation are enough.
            Action::Listing(ListingAction::DidLoad {
                generation,
                restaurant_id,
                listings,
                ..
            }) => format!(
                "{} {{ generation: {generation}, restaurant_id: {restaurant_id}, listings: {} }}",
                self.name(),
                listings.len()
            ),
            Action::Restaurant(RestaurantAction::DidLoadNearby {
                generation,
                restaurants,
            }) => format!(
                "{} {{ generation: {generation}, restaurants: {} }}",
                self.name(),
                restaurants.len()
            ),
            _ => format!("{:?}", self),
        }
    }
}

/// Session, account and profile events.
#[derive(forkful::Action, Clone, Debug, PartialEq)]
#[action(slice = "user")]
pub enum UserAction {
    Login { credentials: Credentials },
    DidLogin { generation: Generation, token: AuthToken },
    DidFailLogin { generation: Generation, reason: String },

    Register { registration: Registration },
    DidRegister { generation: Generation, email: String },
    DidFailRegister { generation: Generation, reason: String },

    VerifyEmail { verification: EmailVerification },
    DidVerifyEmail { generation: Generation, token: Option<AuthToken> },
    DidFailVerifyEmail { generation: Generation, reason: String },

    /// Rehydrate the session from the credential store at startup.
    RestoreSession,
    DidRestoreSession { token: Option<AuthToken> },

    Logout,
    DidClearSession,

    FetchProfile,
    DidLoadProfile { generation: Generation, profile: Profile },
    DidFailProfile { generation: Generation, reason: String },

    FetchFavorites,
    DidLoadFavorites { generation: Generation, favorites: Vec<Restaurant> },
    DidFailFavorites { generation: Generation, reason: String },

    FetchAchievements,
    DidLoadAchievements { generation: Generation, achievements: Vec<Achievement> },
    DidFailAchievements { generation: Generation, reason: String },

    FetchAchievementCatalog,
    DidLoadAchievementCatalog { generation: Generation, achievements: Vec<Achievement> },
    DidFailAchievementCatalog { generation: Generation, reason: String },

    FetchContributions,
    DidLoadContributions { generation: Generation, contributions: serde_json::Value },
    DidFailContributions { generation: Generation, reason: String },
}

impl UserAction {
    pub fn is_session_event(&self) -> bool {
        matches!(
            self,
            UserAction::Login { .. }
                | UserAction::DidLogin { .. }
                | UserAction::DidFailLogin { .. }
                | UserAction::Register { .. }
                | UserAction::DidRegister { .. }
                | UserAction::DidFailRegister { .. }
                | UserAction::VerifyEmail { .. }
                | UserAction::DidVerifyEmail { .. }
                | UserAction::DidFailVerifyEmail { .. }
                | UserAction::RestoreSession
                | UserAction::DidRestoreSession { .. }
                | UserAction::Logout
                | UserAction::DidClearSession
        )
    }
}

#[derive(forkful::Action, Clone, Debug, PartialEq)]
#[action(slice = "address")]
pub enum AddressAction {
    /// Optimistically insert `address` under `temp_id` and ask the server to create it.
    Add { temp_id: String, address: NewAddress },
    DidCreate { temp_id: String, address: Address },
    DidFailCreate { temp_id: String, reason: String },
    Remove { id: String },
    Select { id: Option<String> },
}

#[derive(forkful::Action, Clone, Debug, PartialEq)]
#[action(slice = "restaurant")]
pub enum RestaurantAction {
    FetchNearby { latitude: f64, longitude: f64 },
    DidLoadNearby { generation: Generation, restaurants: Vec<Restaurant> },
    DidFailNearby { generation: Generation, reason: String },

    FetchDetail { id: RestaurantId },
    DidLoadDetail { generation: Generation, restaurant: Restaurant },
    DidFailDetail { generation: Generation, reason: String },

    FetchPunishments { id: RestaurantId },
    DidLoadPunishments { generation: Generation, punishments: Vec<Punishment> },
    DidFailPunishments { generation: Generation, reason: String },

    SetSelected { id: RestaurantId },
    ClearSelected,
}

#[derive(forkful::Action, Clone, Debug, PartialEq)]
#[action(slice = "listing")]
pub enum ListingAction {
    Fetch { restaurant_id: RestaurantId, page: u32, limit: u32 },
    DidLoad {
        generation: Generation,
        restaurant_id: RestaurantId,
        page: u32,
        listings: Vec<Listing>,
    },
    DidFail { generation: Generation, reason: String },
}

#[derive(forkful::Action, Clone, Debug, PartialEq)]
#[action(slice = "cart")]
pub enum CartAction {
    Fetch,
    DidLoad { generation: Generation, items: Vec<CartItem> },
    DidFail { generation: Generation, reason: String },

    Add { listing_id: ListingId, count: u32 },
    UpdateCount { listing_id: ListingId, count: u32 },
    Remove { listing_id: ListingId },
    Clear,
    /// A mutation went through; `items` is the cart as the server now has it.
    DidUpdate { generation: Generation, items: Vec<CartItem> },
    DidFailUpdate { generation: Generation, reason: String },
}

#[derive(forkful::Action, Clone, Debug, PartialEq)]
#[action(slice = "search")]
pub enum SearchAction {
    QueryChange { query: String },
    DidLoad { generation: Generation, query: String, results: SearchResults },
    DidFail { generation: Generation, reason: String },
    Clear,
}

#[derive(forkful::Action, Clone, Debug, PartialEq)]
#[action(slice = "recommendation")]
pub enum RecommendationAction {
    Fetch,
    DidLoad { generation: Generation, recommendations: Vec<Recommendation> },
    DidFail { generation: Generation, reason: String },
}

#[derive(forkful::Action, Clone, Debug, PartialEq)]
#[action(slice = "notification")]
pub enum NotificationAction {
    Receive { notification: Notification },
    MarkRead { id: String },
    MarkAllRead,
    Clear,
}
