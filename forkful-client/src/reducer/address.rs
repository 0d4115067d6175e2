//! Address book with optimistic inserts.
//!
//! `Add` shows the new entry under a temporary id at once. The server's
//! answer either swaps in the confirmed entry (`DidCreate`) or removes the
//! temporary one and restores the primary flag and selection it displaced
//! (`DidFailCreate`). Both are keyed strictly by the temporary id.
//!
//! Invariants: at most one entry is primary, and `selected_id` always names
//! an entry in the collection or is `None`.

use forkful::DispatchResult;

use crate::action::AddressAction;
use crate::effect::Effect;
use crate::model::Address;
use crate::state::{AddressState, PendingAddress};

pub(super) fn reduce(state: &mut AddressState, action: AddressAction) -> DispatchResult<Effect> {
    match action {
        AddressAction::Add { temp_id, address } => {
            if state.get(&temp_id).is_some() {
                tracing::warn!(%temp_id, "Temporary address id already in use");
                return DispatchResult::unchanged();
            }

            let snapshot = PendingAddress {
                previous_primary: state.primary().map(|a| a.id.clone()),
                previous_selected: state.selected_id.clone(),
            };

            if address.is_primary {
                clear_primary(&mut state.items.data);
                state.selected_id = Some(temp_id.clone());
            }
            state
                .items
                .data
                .push(address.clone().with_id(temp_id.clone()));
            state.pending.insert(temp_id.clone(), snapshot);
            state.items.start_mutation();

            DispatchResult::changed_with(Effect::CreateAddress { temp_id, address })
        }

        AddressAction::DidCreate { temp_id, address } => {
            if state.pending.remove(&temp_id).is_none() {
                tracing::debug!(%temp_id, "Discarding confirmation for unknown address");
                return DispatchResult::unchanged();
            }

            if address.is_primary {
                clear_primary(&mut state.items.data);
            }
            if state.selected_id.as_deref() == Some(temp_id.as_str()) {
                state.selected_id = Some(address.id.clone());
            }
            // A profile load may already have brought in the created entry.
            if address.id != temp_id {
                take(&mut state.items.data, &address.id);
            }
            match state.items.data.iter_mut().find(|a| a.id == temp_id) {
                Some(slot) => *slot = address,
                None => state.items.data.push(address),
            }

            settle(state);
            DispatchResult::changed()
        }

        AddressAction::DidFailCreate { temp_id, reason } => {
            let Some(snapshot) = state.pending.remove(&temp_id) else {
                tracing::debug!(%temp_id, "Discarding failure for unknown address");
                return DispatchResult::unchanged();
            };

            let removed = take(&mut state.items.data, &temp_id);
            if removed.is_some_and(|a| a.is_primary) && state.primary().is_none() {
                if let Some(previous) = snapshot.previous_primary {
                    set_primary(&mut state.items.data, &previous);
                }
            }
            if state.selected_id.as_deref() == Some(temp_id.as_str()) {
                state.selected_id = snapshot
                    .previous_selected
                    .filter(|id| state.get(id).is_some());
            }

            tracing::warn!(%temp_id, %reason, "Address creation failed; rolled back");
            let generation = state.items.generation();
            state.items.fail(generation, reason);
            DispatchResult::changed()
        }

        AddressAction::Remove { id } => {
            if take(&mut state.items.data, &id).is_none() {
                return DispatchResult::unchanged();
            }
            state.pending.remove(&id);
            if state.selected_id.as_deref() == Some(id.as_str()) {
                state.selected_id = None;
            }
            if state.items.is_loading() {
                settle(state);
            }
            DispatchResult::changed()
        }

        AddressAction::Select { id } => match id {
            Some(id) if state.get(&id).is_none() => {
                tracing::warn!(%id, "Cannot select unknown address");
                DispatchResult::unchanged()
            }
            id => {
                let changed = state.selected_id != id;
                state.selected_id = id;
                DispatchResult::from_changed(changed)
            }
        },
    }
}

/// Replace the collection with the server's address book.
///
/// Temporary entries still waiting for the server stay visible.
pub(super) fn load_from_profile(state: &mut AddressState, addresses: Vec<Address>) {
    let pending: Vec<Address> = state
        .items
        .data
        .iter()
        .filter(|a| state.pending.contains_key(&a.id))
        .cloned()
        .collect();

    let mut items = addresses;
    items.extend(pending);
    state.items.data = items;

    let selection_valid = state
        .selected_id
        .as_deref()
        .is_some_and(|id| state.get(id).is_some());
    if !selection_valid {
        state.selected_id = state.primary().map(|a| a.id.clone());
    }
    settle(state);
}

/// Mark the collection as succeeded once no insert is in flight.
fn settle(state: &mut AddressState) {
    if state.pending.is_empty() {
        let generation = state.items.generation();
        state.items.apply(generation, |_| {});
    }
}

fn take(items: &mut Vec<Address>, id: &str) -> Option<Address> {
    let index = items.iter().position(|a| a.id == id)?;
    Some(items.remove(index))
}

fn clear_primary(items: &mut [Address]) {
    for address in items {
        address.is_primary = false;
    }
}

fn set_primary(items: &mut [Address], id: &str) {
    for address in items {
        address.is_primary = address.id == id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NewAddress;
    use forkful::Status;
    use pretty_assertions::assert_eq;

    fn new_address(street: &str, primary: bool) -> NewAddress {
        NewAddress {
            street: street.into(),
            district: "Moda".into(),
            province: "Istanbul".into(),
            country: "TR".into(),
            postal_code: "34710".into(),
            latitude: 40.98,
            longitude: 29.02,
            is_primary: primary,
        }
    }

    fn seeded() -> AddressState {
        let mut state = AddressState::default();
        state.items.data = vec![
            new_address("Home", true).with_id("1"),
            new_address("Work", false).with_id("2"),
        ];
        state.selected_id = Some("1".into());
        state
    }

    fn add(state: &mut AddressState, temp_id: &str, primary: bool) {
        reduce(
            state,
            AddressAction::Add {
                temp_id: temp_id.into(),
                address: new_address("New", primary),
            },
        );
    }

    #[test]
    fn test_add_primary_selects_it() {
        let mut state = seeded();
        add(&mut state, "tmp-1", true);

        assert_eq!(state.selected_id.as_deref(), Some("tmp-1"));
        assert_eq!(state.primary().map(|a| a.id.as_str()), Some("tmp-1"));
        assert_eq!(state.items.data.iter().filter(|a| a.is_primary).count(), 1);
        assert!(state.items.loading);
        assert!(state.is_pending("tmp-1"));
    }

    #[test]
    fn test_add_emits_create_effect() {
        let mut state = AddressState::default();
        let result = reduce(
            &mut state,
            AddressAction::Add {
                temp_id: "tmp-1".into(),
                address: new_address("New", false),
            },
        );

        assert_eq!(
            result.effects,
            vec![Effect::CreateAddress {
                temp_id: "tmp-1".into(),
                address: new_address("New", false),
            }]
        );
        assert_eq!(state.selected_id, None);
    }

    #[test]
    fn test_remove_selected_clears_selection() {
        let mut state = seeded();
        add(&mut state, "tmp-1", true);

        reduce(&mut state, AddressAction::Remove { id: "tmp-1".into() });

        assert_eq!(state.selected_id, None);
        assert!(state.get("tmp-1").is_none());
    }

    #[test]
    fn test_failure_restores_collection_exactly() {
        let mut state = seeded();
        let before = serde_json::to_vec(&state.items.data).unwrap();

        add(&mut state, "tmp-1", true);
        reduce(
            &mut state,
            AddressAction::DidFailCreate {
                temp_id: "tmp-1".into(),
                reason: "Network Error".into(),
            },
        );

        assert_eq!(serde_json::to_vec(&state.items.data).unwrap(), before);
        assert_eq!(state.selected_id.as_deref(), Some("1"));
        assert_eq!(state.items.status, Status::Failed);
        assert_eq!(state.items.error.as_deref(), Some("Network Error"));
        assert!(state.pending.is_empty());
    }

    #[test]
    fn test_failure_leaves_concurrent_additions_alone() {
        let mut state = seeded();
        add(&mut state, "tmp-1", false);
        add(&mut state, "tmp-2", true);

        reduce(
            &mut state,
            AddressAction::DidFailCreate {
                temp_id: "tmp-1".into(),
                reason: "boom".into(),
            },
        );

        assert!(state.get("tmp-1").is_none());
        assert!(state.get("tmp-2").is_some());
        assert_eq!(state.primary().map(|a| a.id.as_str()), Some("tmp-2"));
        assert_eq!(state.selected_id.as_deref(), Some("tmp-2"));
    }

    #[test]
    fn test_success_replaces_temporary_entry_in_place() {
        let mut state = seeded();
        add(&mut state, "tmp-1", true);

        reduce(
            &mut state,
            AddressAction::DidCreate {
                temp_id: "tmp-1".into(),
                address: new_address("New", true).with_id("42"),
            },
        );

        let ids: Vec<_> = state.items.data.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "42"]);
        assert_eq!(state.selected_id.as_deref(), Some("42"));
        assert_eq!(state.items.status, Status::Succeeded);
        assert!(!state.items.loading);
    }

    #[test]
    fn test_confirmation_after_profile_load_keeps_ids_unique() {
        let mut state = seeded();
        add(&mut state, "tmp-1", false);
        load_from_profile(
            &mut state,
            vec![
                new_address("Home", true).with_id("1"),
                new_address("New", false).with_id("42"),
            ],
        );

        reduce(
            &mut state,
            AddressAction::DidCreate {
                temp_id: "tmp-1".into(),
                address: new_address("New", false).with_id("42"),
            },
        );

        let ids: Vec<_> = state.items.data.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "42"]);
        assert_eq!(state.items.status, Status::Succeeded);
    }

    #[test]
    fn test_late_answer_for_removed_entry_is_ignored() {
        let mut state = seeded();
        add(&mut state, "tmp-1", false);
        reduce(&mut state, AddressAction::Remove { id: "tmp-1".into() });

        let result = reduce(
            &mut state,
            AddressAction::DidCreate {
                temp_id: "tmp-1".into(),
                address: new_address("New", false).with_id("42"),
            },
        );

        assert!(!result.changed);
        assert!(state.get("42").is_none());
    }

    #[test]
    fn test_select_unknown_is_rejected() {
        let mut state = seeded();
        let result = reduce(&mut state, AddressAction::Select { id: Some("nope".into()) });
        assert!(!result.changed);
        assert_eq!(state.selected_id.as_deref(), Some("1"));

        assert!(reduce(&mut state, AddressAction::Select { id: None }).changed);
        assert_eq!(state.selected_id, None);
    }

    #[test]
    fn test_profile_load_keeps_pending_entries() {
        let mut state = seeded();
        add(&mut state, "tmp-1", false);

        load_from_profile(&mut state, vec![new_address("Home", true).with_id("1")]);

        let ids: Vec<_> = state.items.data.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "tmp-1"]);
        assert_eq!(state.selected_id.as_deref(), Some("1"));
    }
}
