use forkful::{DispatchQueue, Middleware};

use crate::action::{Action, ListingAction, RestaurantAction};
use crate::state::AppState;

/// Fetches the first listing page whenever a restaurant is selected.
///
/// Runs in `after`, so the selection is already in state when the fetch is
/// dispatched. This is the only trigger for a listing refresh.
#[derive(Debug, Clone, Copy)]
pub struct DerivedFetch {
    page_size: u32,
}

impl DerivedFetch {
    pub fn new(page_size: u32) -> Self {
        Self { page_size }
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }
}

impl Middleware<AppState, Action> for DerivedFetch {
    fn after(&mut self, action: &Action, _state: &AppState, _changed: bool, queue: &mut DispatchQueue<Action>) {
        if let Action::Restaurant(RestaurantAction::SetSelected { id }) = action {
            queue.dispatch(
                ListingAction::Fetch {
                    restaurant_id: *id,
                    page: 1,
                    limit: self.page_size,
                }
                .into(),
            );
        }
    }
}
