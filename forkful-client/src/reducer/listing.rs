use forkful::{Action as _, DispatchResult};

use super::resolved;
use crate::action::ListingAction;
use crate::effect::Effect;
use crate::state::ListingState;

pub(super) fn reduce(state: &mut ListingState, action: ListingAction) -> DispatchResult<Effect> {
    let name = action.name();

    match action {
        ListingAction::Fetch {
            restaurant_id,
            page,
            limit,
        } => {
            // Another restaurant's listings must never show under this one.
            if state.restaurant_id != Some(restaurant_id) {
                state.items.data.clear();
            }
            state.restaurant_id = Some(restaurant_id);
            state.page = page;

            let generation = state.items.start();
            DispatchResult::changed_with(Effect::FetchListings {
                generation,
                restaurant_id,
                page,
                limit,
            })
        }
        ListingAction::DidLoad {
            generation,
            restaurant_id,
            listings,
            ..
        } => {
            if state.restaurant_id != Some(restaurant_id) {
                return resolved(false, name);
            }
            resolved(state.items.succeed(generation, listings), name)
        }
        ListingAction::DidFail { generation, reason } => {
            resolved(state.items.fail(generation, reason), name)
        }
    }
}
