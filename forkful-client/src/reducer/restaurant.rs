use forkful::{Action as _, DispatchResult};

use super::resolved;
use crate::action::RestaurantAction;
use crate::effect::Effect;
use crate::state::RestaurantState;

pub(super) fn reduce(
    state: &mut RestaurantState,
    action: RestaurantAction,
) -> DispatchResult<Effect> {
    let name = action.name();

    match action {
        RestaurantAction::FetchNearby {
            latitude,
            longitude,
        } => {
            let generation = state.nearby.start();
            DispatchResult::changed_with(Effect::FetchNearby {
                generation,
                latitude,
                longitude,
            })
        }
        RestaurantAction::DidLoadNearby {
            generation,
            restaurants,
        } => resolved(state.nearby.succeed(generation, restaurants), name),
        RestaurantAction::DidFailNearby { generation, reason } => {
            resolved(state.nearby.fail(generation, reason), name)
        }

        RestaurantAction::FetchDetail { id } => {
            let generation = state.detail.start();
            DispatchResult::changed_with(Effect::FetchRestaurant { generation, id })
        }
        RestaurantAction::DidLoadDetail {
            generation,
            restaurant,
        } => resolved(state.detail.succeed(generation, Some(restaurant)), name),
        RestaurantAction::DidFailDetail { generation, reason } => {
            resolved(state.detail.fail(generation, reason), name)
        }

        RestaurantAction::FetchPunishments { id } => {
            let generation = state.punishments.start();
            DispatchResult::changed_with(Effect::FetchPunishments { generation, id })
        }
        RestaurantAction::DidLoadPunishments {
            generation,
            punishments,
        } => resolved(state.punishments.succeed(generation, punishments), name),
        RestaurantAction::DidFailPunishments { generation, reason } => {
            resolved(state.punishments.fail(generation, reason), name)
        }

        // Listings for the new selection are requested by middleware.
        RestaurantAction::SetSelected { id } => {
            let changed = state.selected_id != Some(id);
            state.selected_id = Some(id);
            DispatchResult::from_changed(changed)
        }
        RestaurantAction::ClearSelected => {
            DispatchResult::from_changed(state.selected_id.take().is_some())
        }
    }
}
