use forkful::{Action as _, DispatchResult};

use super::{address, resolved};
use crate::action::UserAction;
use crate::effect::Effect;
use crate::model::Session;
use crate::state::AppState;

pub(super) fn reduce(state: &mut AppState, action: UserAction) -> DispatchResult<Effect> {
    let name = action.name();
    let auth = &mut state.auth;

    match action {
        UserAction::Login { credentials } => {
            let generation = auth.request.start();
            DispatchResult::changed_with(Effect::Login {
                generation,
                credentials,
            })
        }
        UserAction::DidLogin { generation, token } => {
            if !auth.request.succeed(generation, ()) {
                return resolved(false, name);
            }
            auth.session = Session::authenticated(token);
            DispatchResult::changed()
        }
        UserAction::DidFailLogin { generation, reason }
        | UserAction::DidFailRegister { generation, reason }
        | UserAction::DidFailVerifyEmail { generation, reason } => {
            resolved(auth.request.fail(generation, reason), name)
        }

        UserAction::Register { registration } => {
            let generation = auth.request.start();
            DispatchResult::changed_with(Effect::Register {
                generation,
                registration,
            })
        }
        UserAction::DidRegister { generation, email } => {
            if !auth.request.succeed(generation, ()) {
                return resolved(false, name);
            }
            auth.pending_verification = Some(email);
            DispatchResult::changed()
        }

        UserAction::VerifyEmail { verification } => {
            let generation = auth.request.start();
            DispatchResult::changed_with(Effect::VerifyEmail {
                generation,
                verification,
            })
        }
        UserAction::DidVerifyEmail { generation, token } => {
            if !auth.request.succeed(generation, ()) {
                return resolved(false, name);
            }
            auth.pending_verification = None;
            if let Some(token) = token {
                auth.session = Session::authenticated(token);
            }
            DispatchResult::changed()
        }

        UserAction::RestoreSession => DispatchResult::effect(Effect::RestoreSession),
        UserAction::DidRestoreSession { token } => {
            auth.session = Session {
                token,
                is_initialized: true,
            };
            DispatchResult::changed()
        }

        UserAction::Logout => {
            reset_user_data(state);
            DispatchResult::changed_with(Effect::ClearSession)
        }
        UserAction::DidClearSession => DispatchResult::unchanged(),

        UserAction::FetchProfile => {
            let generation = auth.profile.start();
            DispatchResult::changed_with(Effect::FetchProfile { generation })
        }
        UserAction::DidLoadProfile {
            generation,
            profile,
        } => {
            let addresses = profile.addresses.clone();
            if !auth.profile.succeed(generation, Some(profile)) {
                return resolved(false, name);
            }
            address::load_from_profile(&mut state.address, addresses);
            DispatchResult::changed()
        }
        UserAction::DidFailProfile { generation, reason } => {
            resolved(auth.profile.fail(generation, reason), name)
        }

        UserAction::FetchFavorites => {
            let generation = auth.favorites.start();
            DispatchResult::changed_with(Effect::FetchFavorites { generation })
        }
        UserAction::DidLoadFavorites {
            generation,
            favorites,
        } => resolved(auth.favorites.succeed(generation, favorites), name),
        UserAction::DidFailFavorites { generation, reason } => {
            resolved(auth.favorites.fail(generation, reason), name)
        }

        UserAction::FetchAchievements => {
            let generation = auth.achievements.start();
            DispatchResult::changed_with(Effect::FetchAchievements { generation })
        }
        UserAction::DidLoadAchievements {
            generation,
            achievements,
        } => resolved(auth.achievements.succeed(generation, achievements), name),
        UserAction::DidFailAchievements { generation, reason } => {
            resolved(auth.achievements.fail(generation, reason), name)
        }

        UserAction::FetchAchievementCatalog => {
            let generation = auth.achievement_catalog.start();
            DispatchResult::changed_with(Effect::FetchAchievementCatalog { generation })
        }
        UserAction::DidLoadAchievementCatalog {
            generation,
            achievements,
        } => resolved(
            auth.achievement_catalog.succeed(generation, achievements),
            name,
        ),
        UserAction::DidFailAchievementCatalog { generation, reason } => {
            resolved(auth.achievement_catalog.fail(generation, reason), name)
        }

        UserAction::FetchContributions => {
            let generation = auth.contributions.start();
            DispatchResult::changed_with(Effect::FetchContributions { generation })
        }
        UserAction::DidLoadContributions {
            generation,
            contributions,
        } => resolved(auth.contributions.succeed(generation, contributions), name),
        UserAction::DidFailContributions { generation, reason } => {
            resolved(auth.contributions.fail(generation, reason), name)
        }
    }
}

/// Drop everything that belongs to the signed-in user.
///
/// Resets bump resource generations, so requests still in flight resolve
/// as stale. Restaurant data is public and survives.
fn reset_user_data(state: &mut AppState) {
    let auth = &mut state.auth;
    auth.session.token = None;
    auth.session.is_initialized = true;
    auth.request.reset();
    auth.pending_verification = None;
    auth.profile.reset();
    auth.favorites.reset();
    auth.achievements.reset();
    auth.achievement_catalog.reset();
    auth.contributions.reset();

    state.address.items.reset();
    state.address.selected_id = None;
    state.address.pending.clear();

    state.listing.items.reset();
    state.listing.restaurant_id = None;
    state.listing.page = 0;

    state.cart.items.reset();

    state.search.query.clear();
    state.search.results.reset();

    state.recommendation.items.reset();

    state.notification.items.clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Address, AuthToken, Credentials, Listing, Password, Profile};
    use forkful::Generation;
    use crate::reducer::reducer;
    use forkful::Status;

    fn signed_in() -> AppState {
        let mut state = AppState::default();
        state.auth.session = Session::authenticated(AuthToken::new("t"));
        state
    }

    fn address(id: &str, primary: bool) -> Address {
        serde_json::from_value(serde_json::json!({
            "id": id, "latitude": 1.0, "longitude": 2.0, "is_primary": primary
        }))
        .unwrap()
    }

    #[test]
    fn test_logout_resets_user_scoped_slices() {
        let mut state = signed_in();
        state.listing.items.data = vec![Listing::default()];
        state.listing.restaurant_id = Some(7);
        state.address.items.data = vec![address("a", true)];
        state.address.selected_id = Some("a".into());
        state.search.query = "pide".into();
        state.restaurant.selected_id = Some(7);

        let result = reducer(&mut state, UserAction::Logout.into());

        assert!(result.changed);
        assert_eq!(result.effects, vec![Effect::ClearSession]);
        assert!(!state.auth.session.is_authenticated());
        assert!(state.auth.session.is_initialized);
        assert!(state.listing.items.data.is_empty());
        assert_eq!(state.listing.restaurant_id, None);
        assert!(state.address.items.data.is_empty());
        assert_eq!(state.address.selected_id, None);
        assert!(state.search.query.is_empty());
        assert_eq!(state.restaurant.selected_id, Some(7));
    }

    #[test]
    fn test_result_started_before_logout_is_discarded() {
        let mut state = signed_in();
        let result = reducer(&mut state, UserAction::FetchProfile.into());
        let Effect::FetchProfile { generation } = result.effects[0] else {
            panic!("expected profile fetch");
        };

        reducer(&mut state, UserAction::Logout.into());
        let late = reducer(
            &mut state,
            UserAction::DidLoadProfile {
                generation,
                profile: Profile {
                    addresses: vec![address("a", true)],
                    ..Default::default()
                },
            }
            .into(),
        );

        assert!(!late.changed);
        assert_eq!(state.auth.profile.data, None);
        assert!(state.address.items.data.is_empty());
    }

    #[test]
    fn test_profile_load_fills_address_book_and_selects_primary() {
        let mut state = signed_in();
        let result = reducer(&mut state, UserAction::FetchProfile.into());
        let Effect::FetchProfile { generation } = result.effects[0] else {
            panic!("expected profile fetch");
        };

        reducer(
            &mut state,
            UserAction::DidLoadProfile {
                generation,
                profile: Profile {
                    addresses: vec![address("a", false), address("b", true)],
                    ..Default::default()
                },
            }
            .into(),
        );

        assert_eq!(state.address.items.data.len(), 2);
        assert_eq!(state.address.selected_id.as_deref(), Some("b"));
        assert_eq!(state.address.items.status, Status::Succeeded);
    }

    fn start_login(state: &mut AppState) -> Generation {
        let result = reducer(
            state,
            UserAction::Login {
                credentials: Credentials {
                    email: "ada@example.com".into(),
                    password: Password::new("secret"),
                },
            }
            .into(),
        );
        let Effect::Login { generation, .. } = result.effects[0] else {
            panic!("expected login effect");
        };
        generation
    }

    #[test]
    fn test_login_lifecycle() {
        let mut state = AppState::default();

        let generation = start_login(&mut state);
        reducer(
            &mut state,
            UserAction::DidFailLogin {
                generation,
                reason: "Invalid credentials".into(),
            }
            .into(),
        );
        assert_eq!(state.auth.request.error.as_deref(), Some("Invalid credentials"));
        assert!(!state.auth.session.is_authenticated());

        let generation = start_login(&mut state);
        reducer(
            &mut state,
            UserAction::DidLogin {
                generation,
                token: AuthToken::new("abc"),
            }
            .into(),
        );
        assert!(state.auth.session.is_authenticated());
        assert_eq!(state.auth.request.status, Status::Succeeded);
    }

    #[test]
    fn test_login_answered_after_logout_is_discarded() {
        let mut state = AppState::default();
        let generation = start_login(&mut state);

        reducer(&mut state, UserAction::Logout.into());
        let late = reducer(
            &mut state,
            UserAction::DidLogin {
                generation,
                token: AuthToken::new("abc"),
            }
            .into(),
        );

        assert!(!late.changed);
        assert!(!state.auth.session.is_authenticated());
        assert_eq!(state.auth.request.status, Status::Idle);
    }

    #[test]
    fn test_profile_failure_keeps_previous_profile() {
        let mut state = signed_in();
        state.auth.profile.data = Some(Profile {
            name: "Ada".into(),
            ..Default::default()
        });

        let generation = state.auth.profile.start();
        reducer(
            &mut state,
            UserAction::DidFailProfile {
                generation,
                reason: "offline".into(),
            }
            .into(),
        );

        assert_eq!(state.auth.profile.status, Status::Failed);
        assert_eq!(state.auth.profile.data.as_ref().map(|p| p.name.as_str()), Some("Ada"));
    }
}
