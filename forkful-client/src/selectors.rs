//! Read-side views derived from [`AppState`].
//!
//! Distance and opening status are computed on read and never stored.

use chrono::{DateTime, Utc};

use crate::model::{Address, Restaurant};
use crate::state::AppState;

/// A restaurant annotated relative to a reference point.
#[derive(Debug, Clone, PartialEq)]
pub struct RestaurantView<'a> {
    pub restaurant: &'a Restaurant,
    pub distance_km: f64,
    pub is_open_now: bool,
}

/// Optional gating applied by [`nearby_restaurants`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProximityFilter {
    pub max_distance_km: Option<f64>,
    pub open_only: bool,
}

impl ProximityFilter {
    fn admits(&self, view: &RestaurantView<'_>) -> bool {
        let in_range = self.max_distance_km.is_none_or(|max| view.distance_km <= max);
        in_range && (!self.open_only || view.is_open_now)
    }
}

pub fn selected_address(state: &AppState) -> Option<&Address> {
    state.address.selected()
}

pub fn selected_restaurant(state: &AppState) -> Option<&Restaurant> {
    state.restaurant.selected()
}

/// Annotate `restaurants` relative to `origin`, nearest first.
pub fn proximity_view<'a>(
    restaurants: &'a [Restaurant],
    origin: &Address,
    now: DateTime<Utc>,
) -> Vec<RestaurantView<'a>> {
    let mut views: Vec<_> = restaurants
        .iter()
        .map(|restaurant| RestaurantView {
            restaurant,
            distance_km: restaurant.distance_km(origin.latitude, origin.longitude),
            is_open_now: restaurant.is_open_at(now),
        })
        .collect();
    views.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    views
}

/// Nearby restaurants relative to the selected address.
///
/// Empty when no address is selected.
pub fn nearby_restaurants(
    state: &AppState,
    now: DateTime<Utc>,
    filter: ProximityFilter,
) -> Vec<RestaurantView<'_>> {
    let Some(origin) = selected_address(state) else {
        return Vec::new();
    };
    proximity_view(&state.restaurant.nearby.data, origin, now)
        .into_iter()
        .filter(|view| filter.admits(view))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NewAddress;
    use chrono::TimeZone;

    fn restaurant(id: u64, latitude: f64, start: &str, end: &str) -> Restaurant {
        Restaurant {
            id,
            latitude,
            longitude: 0.0,
            working_days: vec!["Monday".into()],
            working_hours_start: start.into(),
            working_hours_end: end.into(),
            ..Default::default()
        }
    }

    fn state() -> AppState {
        let mut state = AppState::default();
        state.address.items.data = vec![NewAddress {
            street: "Origin".into(),
            district: String::new(),
            province: String::new(),
            country: String::new(),
            postal_code: String::new(),
            latitude: 0.0,
            longitude: 0.0,
            is_primary: true,
        }
        .with_id("home")];
        state.address.selected_id = Some("home".into());
        state.restaurant.nearby.data = vec![
            restaurant(1, 2.0, "09:00", "18:00"),
            restaurant(2, 0.5, "11:00", "18:00"),
            restaurant(3, 1.0, "09:00", "18:00"),
        ];
        state
    }

    fn monday_ten() -> DateTime<Utc> {
        // 2024-01-01 was a Monday.
        Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap()
    }

    #[test]
    fn test_sorted_nearest_first() {
        let state = state();
        let views = nearby_restaurants(&state, monday_ten(), ProximityFilter::default());

        let ids: Vec<_> = views.iter().map(|v| v.restaurant.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
        assert!((views[1].distance_km - 111.19).abs() < 0.01);
        assert!(!views[0].is_open_now);
        assert!(views[1].is_open_now);
    }

    #[test]
    fn test_filter_by_radius_and_open() {
        let state = state();
        let filter = ProximityFilter {
            max_distance_km: Some(150.0),
            open_only: true,
        };
        let ids: Vec<_> = nearby_restaurants(&state, monday_ten(), filter)
            .iter()
            .map(|v| v.restaurant.id)
            .collect();
        assert_eq!(ids, vec![3]);
    }

    #[test]
    fn test_no_selected_address_means_empty() {
        let mut state = state();
        state.address.selected_id = None;
        assert!(nearby_restaurants(&state, monday_ten(), ProximityFilter::default()).is_empty());
    }

    #[test]
    fn test_selected_restaurant_falls_back_to_nearby() {
        let mut state = state();
        state.restaurant.selected_id = Some(3);
        assert_eq!(selected_restaurant(&state).map(|r| r.id), Some(3));

        state.restaurant.selected_id = Some(99);
        assert!(selected_restaurant(&state).is_none());
    }
}
