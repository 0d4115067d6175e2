use forkful::{Action as _, DispatchResult};

use super::resolved;
use crate::action::SearchAction;
use crate::effect::Effect;
use crate::state::SearchState;

pub(super) fn reduce(state: &mut SearchState, action: SearchAction) -> DispatchResult<Effect> {
    let name = action.name();

    match action {
        SearchAction::QueryChange { query } => {
            let trimmed = query.trim().to_string();
            state.query = query;

            if trimmed.is_empty() {
                state.results.reset();
                return DispatchResult::changed();
            }
            let generation = state.results.start();
            DispatchResult::changed_with(Effect::Search {
                generation,
                query: trimmed,
            })
        }
        SearchAction::DidLoad {
            generation,
            query,
            results,
        } => {
            if query != state.query.trim() {
                return resolved(false, name);
            }
            resolved(state.results.succeed(generation, results), name)
        }
        SearchAction::DidFail { generation, reason } => {
            resolved(state.results.fail(generation, reason), name)
        }
        SearchAction::Clear => {
            state.query.clear();
            state.results.reset();
            DispatchResult::changed()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Restaurant, SearchResults};

    fn query(state: &mut SearchState, text: &str) -> Option<u64> {
        let result = reduce(
            state,
            SearchAction::QueryChange {
                query: text.to_string(),
            },
        );
        result.effects.first().map(|effect| match effect {
            Effect::Search { generation, .. } => *generation,
            _ => panic!("expected search"),
        })
    }

    fn results(id: u64) -> SearchResults {
        SearchResults {
            restaurants: vec![Restaurant {
                id,
                ..Default::default()
            }],
            listings: vec![],
        }
    }

    #[test]
    fn test_query_is_trimmed_for_request() {
        let mut state = SearchState::default();
        let result = reduce(
            &mut state,
            SearchAction::QueryChange {
                query: "  pide ".into(),
            },
        );

        assert_eq!(state.query, "  pide ");
        assert!(matches!(&result.effects[0], Effect::Search { query, .. } if query == "pide"));
    }

    #[test]
    fn test_blank_query_clears_without_request() {
        let mut state = SearchState::default();
        let generation = query(&mut state, "pide").unwrap();
        assert!(query(&mut state, "   ").is_none());

        let late = reduce(
            &mut state,
            SearchAction::DidLoad {
                generation,
                query: "pide".into(),
                results: results(1),
            },
        );
        assert!(!late.changed);
        assert!(state.results.data.is_empty());
    }

    #[test]
    fn test_only_latest_query_lands() {
        let mut state = SearchState::default();
        let old = query(&mut state, "pi").unwrap();
        let new = query(&mut state, "pide").unwrap();

        reduce(
            &mut state,
            SearchAction::DidLoad {
                generation: old,
                query: "pi".into(),
                results: results(1),
            },
        );
        reduce(
            &mut state,
            SearchAction::DidLoad {
                generation: new,
                query: "pide".into(),
                results: results(2),
            },
        );

        assert_eq!(state.results.data, results(2));
    }
}
