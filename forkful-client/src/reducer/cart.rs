use forkful::{Action as _, DispatchResult};

use super::resolved;
use crate::action::CartAction;
use crate::effect::{CartMutation, Effect};
use crate::state::CartState;

pub(super) fn reduce(state: &mut CartState, action: CartAction) -> DispatchResult<Effect> {
    let name = action.name();

    let mutation = match action {
        CartAction::Fetch => {
            let generation = state.items.start();
            return DispatchResult::changed_with(Effect::FetchCart { generation });
        }
        CartAction::DidLoad { generation, items } | CartAction::DidUpdate { generation, items } => {
            return resolved(state.items.succeed(generation, items), name);
        }
        CartAction::DidFail { generation, reason }
        | CartAction::DidFailUpdate { generation, reason } => {
            return resolved(state.items.fail(generation, reason), name);
        }

        CartAction::Add { listing_id, count } => CartMutation::Add { listing_id, count },
        CartAction::UpdateCount { listing_id, count } => {
            CartMutation::UpdateCount { listing_id, count }
        }
        CartAction::Remove { listing_id } => CartMutation::Remove { listing_id },
        CartAction::Clear => CartMutation::Clear,
    };

    let generation = state.items.start_mutation();
    DispatchResult::changed_with(Effect::MutateCart {
        generation,
        mutation,
    })
}
