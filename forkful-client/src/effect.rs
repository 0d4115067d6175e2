//! Side effects declared by reducers and carried out by the orchestrator.

use forkful::Generation;

use crate::model::{
    Credentials, EmailVerification, ListingId, NewAddress, Registration, RestaurantId,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Login { generation: Generation, credentials: Credentials },
    Register { generation: Generation, registration: Registration },
    VerifyEmail { generation: Generation, verification: EmailVerification },
    /// Read the persisted token.
    RestoreSession,
    /// Cancel in-flight work and forget the persisted token.
    ClearSession,

    FetchProfile { generation: Generation },
    FetchFavorites { generation: Generation },
    FetchAchievements { generation: Generation },
    FetchAchievementCatalog { generation: Generation },
    FetchContributions { generation: Generation },

    CreateAddress { temp_id: String, address: NewAddress },

    FetchNearby { generation: Generation, latitude: f64, longitude: f64 },
    FetchRestaurant { generation: Generation, id: RestaurantId },
    FetchPunishments { generation: Generation, id: RestaurantId },

    FetchListings {
        generation: Generation,
        restaurant_id: RestaurantId,
        page: u32,
        limit: u32,
    },

    FetchCart { generation: Generation },
    MutateCart { generation: Generation, mutation: CartMutation },

    Search { generation: Generation, query: String },
    FetchRecommendations { generation: Generation },
}

/// Server-side cart change. Followed by a cart re-read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartMutation {
    Add { listing_id: ListingId, count: u32 },
    UpdateCount { listing_id: ListingId, count: u32 },
    Remove { listing_id: ListingId },
    Clear,
}

impl CartMutation {
    /// Task key; mutations of different listings run side by side.
    pub fn task_key(&self) -> String {
        match self {
            CartMutation::Add { listing_id, .. }
            | CartMutation::UpdateCount { listing_id, .. }
            | CartMutation::Remove { listing_id } => format!("cart/{listing_id}"),
            CartMutation::Clear => "cart/clear".to_string(),
        }
    }
}
