use forkful::{Action as _, DispatchResult};

use super::resolved;
use crate::action::RecommendationAction;
use crate::effect::Effect;
use crate::state::RecommendationState;

pub(super) fn reduce(
    state: &mut RecommendationState,
    action: RecommendationAction,
) -> DispatchResult<Effect> {
    let name = action.name();

    match action {
        RecommendationAction::Fetch => {
            let generation = state.items.start();
            DispatchResult::changed_with(Effect::FetchRecommendations { generation })
        }
        RecommendationAction::DidLoad {
            generation,
            recommendations,
        } => resolved(state.items.succeed(generation, recommendations), name),
        RecommendationAction::DidFail { generation, reason } => {
            resolved(state.items.fail(generation, reason), name)
        }
    }
}
