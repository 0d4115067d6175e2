//! Async orchestrators: the work behind every [`Effect`].
//!
//! Each effect is spawned as a keyed task on the runtime's task manager. A
//! task reads nothing from the store once started; it receives the token
//! cached in the session slice at spawn time and reports back with exactly
//! one `Did*` event. Errors never escape a task: they become the failure
//! event of the operation, and a missing token additionally logs out.

use std::sync::Arc;
use std::time::Duration;

use forkful::EffectContext;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::mpsc;

use crate::action::{
    Action, AddressAction, CartAction, ListingAction, RecommendationAction, RestaurantAction,
    SearchAction, UserAction,
};
use crate::api::{endpoints, ApiGateway, ApiRequest};
use crate::credentials::CredentialStore;
use crate::effect::{CartMutation, Effect};
use crate::error::{ApiError, ThunkError};
use crate::model::{
    Address, AuthResponse, AuthToken, CartItem, Credentials, EmailVerification, ListPayload,
    NewAddress, Registration,
};
use crate::state::AppState;

type Ctx<'a> = EffectContext<'a, AppState, Action>;

/// Runs effects against the API gateway and credential store.
#[derive(Clone)]
pub struct Orchestrator {
    api: Arc<dyn ApiGateway>,
    credentials: Arc<dyn CredentialStore>,
    search_debounce: Duration,
}

impl Orchestrator {
    pub fn new(
        api: Arc<dyn ApiGateway>,
        credentials: Arc<dyn CredentialStore>,
        search_debounce: Duration,
    ) -> Self {
        Self {
            api,
            credentials,
            search_debounce,
        }
    }

    pub fn credentials(&self) -> &Arc<dyn CredentialStore> {
        &self.credentials
    }

    /// Start the async work described by `effect`.
    pub fn handle(&self, effect: Effect, ctx: &mut Ctx<'_>) {
        let token = ctx.state().auth.session.token().cloned();
        let tx = ctx.action_tx().clone();
        let api = self.api.clone();
        let credentials = self.credentials.clone();

        match effect {
            Effect::Login {
                generation,
                credentials: form,
            } => {
                ctx.tasks().spawn("auth", async move {
                    let result = login(api.as_ref(), credentials.as_ref(), form).await;
                    settle(
                        &tx,
                        result,
                        |token| UserAction::DidLogin { generation, token },
                        |reason| UserAction::DidFailLogin { generation, reason },
                    )
                });
            }
            Effect::Register {
                generation,
                registration,
            } => {
                ctx.tasks().spawn("auth", async move {
                    let result = register(api.as_ref(), registration).await;
                    settle(
                        &tx,
                        result,
                        |email| UserAction::DidRegister { generation, email },
                        |reason| UserAction::DidFailRegister { generation, reason },
                    )
                });
            }
            Effect::VerifyEmail {
                generation,
                verification,
            } => {
                ctx.tasks().spawn("auth", async move {
                    let result = verify_email(api.as_ref(), credentials.as_ref(), verification).await;
                    settle(
                        &tx,
                        result,
                        |token| UserAction::DidVerifyEmail { generation, token },
                        |reason| UserAction::DidFailVerifyEmail { generation, reason },
                    )
                });
            }
            Effect::RestoreSession => {
                ctx.tasks().spawn("session", async move {
                    let token = match credentials.get_token().await {
                        Ok(token) => token.filter(|token| !token.is_empty()),
                        Err(error) => {
                            tracing::warn!(%error, "Could not read stored token");
                            None
                        }
                    };
                    UserAction::DidRestoreSession { token }.into()
                });
            }
            Effect::ClearSession => {
                ctx.tasks().cancel_all();
                ctx.tasks().spawn("session", async move {
                    if let Err(error) = credentials.remove_token().await {
                        tracing::warn!(%error, "Could not remove stored token");
                    }
                    UserAction::DidClearSession.into()
                });
            }

            Effect::FetchProfile { generation } => {
                ctx.tasks().spawn("user/profile", async move {
                    let result = fetch(api.as_ref(), token, endpoints::profile()).await;
                    settle(
                        &tx,
                        result,
                        |profile| UserAction::DidLoadProfile { generation, profile },
                        |reason| UserAction::DidFailProfile { generation, reason },
                    )
                });
            }
            Effect::FetchFavorites { generation } => {
                ctx.tasks().spawn("user/favorites", async move {
                    let result = fetch_list(api.as_ref(), token, endpoints::favorites()).await;
                    settle(
                        &tx,
                        result,
                        |favorites| UserAction::DidLoadFavorites { generation, favorites },
                        |reason| UserAction::DidFailFavorites { generation, reason },
                    )
                });
            }
            Effect::FetchAchievements { generation } => {
                ctx.tasks().spawn("user/achievements", async move {
                    let result = fetch_list(api.as_ref(), token, endpoints::achievements()).await;
                    settle(
                        &tx,
                        result,
                        |achievements| UserAction::DidLoadAchievements {
                            generation,
                            achievements,
                        },
                        |reason| UserAction::DidFailAchievements { generation, reason },
                    )
                });
            }
            Effect::FetchAchievementCatalog { generation } => {
                ctx.tasks().spawn("achievements", async move {
                    let result =
                        fetch_list(api.as_ref(), token, endpoints::achievement_catalog()).await;
                    settle(
                        &tx,
                        result,
                        |achievements| UserAction::DidLoadAchievementCatalog {
                            generation,
                            achievements,
                        },
                        |reason| UserAction::DidFailAchievementCatalog { generation, reason },
                    )
                });
            }
            Effect::FetchContributions { generation } => {
                ctx.tasks().spawn("user/contributions", async move {
                    let result: Result<Value, _> =
                        fetch(api.as_ref(), token, endpoints::contributions()).await;
                    settle(
                        &tx,
                        result,
                        |contributions| UserAction::DidLoadContributions {
                            generation,
                            contributions,
                        },
                        |reason| UserAction::DidFailContributions { generation, reason },
                    )
                });
            }

            Effect::CreateAddress { temp_id, address } => {
                let key = format!("address/{temp_id}");
                ctx.tasks().spawn(key, async move {
                    let result = create_address(api.as_ref(), token, address).await;
                    let failed_id = temp_id.clone();
                    settle(
                        &tx,
                        result,
                        |address| AddressAction::DidCreate { temp_id, address },
                        |reason| AddressAction::DidFailCreate {
                            temp_id: failed_id,
                            reason,
                        },
                    )
                });
            }

            Effect::FetchNearby {
                generation,
                latitude,
                longitude,
            } => {
                ctx.tasks().spawn("restaurants/nearby", async move {
                    let request = endpoints::nearby(latitude, longitude);
                    let result = fetch_list(api.as_ref(), token, request).await;
                    settle(
                        &tx,
                        result,
                        |restaurants| RestaurantAction::DidLoadNearby {
                            generation,
                            restaurants,
                        },
                        |reason| RestaurantAction::DidFailNearby { generation, reason },
                    )
                });
            }
            Effect::FetchRestaurant { generation, id } => {
                ctx.tasks().spawn("restaurants/detail", async move {
                    let result = fetch(api.as_ref(), token, endpoints::restaurant(id)).await;
                    settle(
                        &tx,
                        result,
                        |restaurant| RestaurantAction::DidLoadDetail {
                            generation,
                            restaurant,
                        },
                        |reason| RestaurantAction::DidFailDetail { generation, reason },
                    )
                });
            }
            Effect::FetchPunishments { generation, id } => {
                ctx.tasks().spawn("restaurants/punishments", async move {
                    let result = fetch_list(api.as_ref(), token, endpoints::punishments(id)).await;
                    settle(
                        &tx,
                        result,
                        |punishments| RestaurantAction::DidLoadPunishments {
                            generation,
                            punishments,
                        },
                        |reason| RestaurantAction::DidFailPunishments { generation, reason },
                    )
                });
            }

            Effect::FetchListings {
                generation,
                restaurant_id,
                page,
                limit,
            } => {
                ctx.tasks().spawn("listings", async move {
                    let request = endpoints::listings(restaurant_id, page, limit);
                    let result = fetch_list(api.as_ref(), token, request).await;
                    settle(
                        &tx,
                        result,
                        |listings| ListingAction::DidLoad {
                            generation,
                            restaurant_id,
                            page,
                            listings,
                        },
                        |reason| ListingAction::DidFail { generation, reason },
                    )
                });
            }

            Effect::FetchCart { generation } => {
                ctx.tasks().spawn("cart", async move {
                    let result = fetch_list(api.as_ref(), token, endpoints::cart()).await;
                    settle(
                        &tx,
                        result,
                        |items| CartAction::DidLoad { generation, items },
                        |reason| CartAction::DidFail { generation, reason },
                    )
                });
            }
            Effect::MutateCart {
                generation,
                mutation,
            } => {
                ctx.tasks().spawn(mutation.task_key(), async move {
                    let result = mutate_cart(api.as_ref(), token, mutation).await;
                    settle(
                        &tx,
                        result,
                        |items| CartAction::DidUpdate { generation, items },
                        |reason| CartAction::DidFailUpdate { generation, reason },
                    )
                });
            }

            Effect::Search { generation, query } => {
                let debounce = self.search_debounce;
                ctx.tasks().debounce("search", debounce, async move {
                    let result = fetch(api.as_ref(), token, endpoints::search(&query)).await;
                    settle(
                        &tx,
                        result,
                        |results| SearchAction::DidLoad {
                            generation,
                            query,
                            results,
                        },
                        |reason| SearchAction::DidFail { generation, reason },
                    )
                });
            }
            Effect::FetchRecommendations { generation } => {
                ctx.tasks().spawn("recommendations", async move {
                    let result =
                        fetch_list(api.as_ref(), token, endpoints::recommendations()).await;
                    settle(
                        &tx,
                        result,
                        |recommendations| RecommendationAction::DidLoad {
                            generation,
                            recommendations,
                        },
                        |reason| RecommendationAction::DidFail { generation, reason },
                    )
                });
            }
        }
    }
}

/// Turn an orchestrator outcome into the event that reports it.
///
/// A missing token sends the failure event first and answers with
/// `user/logout`.
fn settle<T, S, F>(
    tx: &mpsc::UnboundedSender<Action>,
    result: Result<T, ThunkError>,
    on_success: impl FnOnce(T) -> S,
    on_failure: impl FnOnce(String) -> F,
) -> Action
where
    S: Into<Action>,
    F: Into<Action>,
{
    match result {
        Ok(value) => on_success(value).into(),
        Err(error) if error.is_auth_missing() => {
            let _ = tx.send(on_failure(error.to_string()).into());
            UserAction::Logout.into()
        }
        Err(error) => {
            tracing::warn!(%error, "Request failed");
            on_failure(error.to_string()).into()
        }
    }
}

fn require(token: Option<AuthToken>) -> Result<AuthToken, ThunkError> {
    token
        .filter(|token| !token.is_empty())
        .ok_or(ThunkError::AuthMissing)
}

async fn fetch<T: DeserializeOwned>(
    api: &dyn ApiGateway,
    token: Option<AuthToken>,
    request: ApiRequest,
) -> Result<T, ThunkError> {
    let token = require(token)?;
    let body = api.request(request.bearer(&token)).await?;
    Ok(serde_json::from_value(body)?)
}

async fn fetch_list<T: DeserializeOwned>(
    api: &dyn ApiGateway,
    token: Option<AuthToken>,
    request: ApiRequest,
) -> Result<Vec<T>, ThunkError> {
    let payload: ListPayload<T> = fetch(api, token, request).await?;
    Ok(payload.into_vec())
}

fn token_from(response: AuthResponse, body: &Value) -> Result<AuthToken, ThunkError> {
    response
        .token
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            ThunkError::Api(ApiError::Decode {
                message: "response carried no token".into(),
                body: body.to_string(),
            })
        })
}

/// Exchange credentials for a token and persist it.
pub async fn login(
    api: &dyn ApiGateway,
    store: &dyn CredentialStore,
    credentials: Credentials,
) -> Result<AuthToken, ThunkError> {
    if credentials.email.trim().is_empty() || credentials.password.expose().is_empty() {
        return Err(ThunkError::Validation("email and password are required".into()));
    }
    let body = api
        .request(endpoints::login(serde_json::json!({
            "email": credentials.email.trim(),
            "password": credentials.password.expose(),
        })))
        .await?;
    let token = token_from(serde_json::from_value(body.clone())?, &body)?;
    store.set_token(&token).await?;
    Ok(token)
}

/// Create an account. Answers with the email awaiting verification.
pub async fn register(api: &dyn ApiGateway, registration: Registration) -> Result<String, ThunkError> {
    if registration.email.trim().is_empty() || registration.password.expose().is_empty() {
        return Err(ThunkError::Validation("email and password are required".into()));
    }
    let email = registration.email.trim().to_string();
    api.request(endpoints::register(serde_json::to_value(&registration)?))
        .await?;
    Ok(email)
}

/// Confirm an email address. Persists the token if the server issues one.
pub async fn verify_email(
    api: &dyn ApiGateway,
    store: &dyn CredentialStore,
    verification: EmailVerification,
) -> Result<Option<AuthToken>, ThunkError> {
    if verification.code.trim().is_empty() {
        return Err(ThunkError::Validation("verification code is required".into()));
    }
    let body = api
        .request(endpoints::verify_email(serde_json::to_value(&verification)?))
        .await?;
    let response: AuthResponse = match body {
        Value::Null => AuthResponse::default(),
        body => serde_json::from_value(body)?,
    };
    let token = response.token.filter(|token| !token.is_empty());
    if let Some(token) = &token {
        store.set_token(token).await?;
    }
    Ok(token)
}

/// Create an address on the server.
///
/// The token is checked before the address, so a signed-out user is
/// logged out even when the input is also invalid.
pub async fn create_address(
    api: &dyn ApiGateway,
    token: Option<AuthToken>,
    address: NewAddress,
) -> Result<Address, ThunkError> {
    let token = require(token)?;
    address.validate().map_err(ThunkError::Validation)?;
    let body = api
        .request(endpoints::create_address(serde_json::to_value(&address)?).bearer(&token))
        .await?;
    Ok(serde_json::from_value(body)?)
}

/// Apply a cart change, then read the cart back.
pub async fn mutate_cart(
    api: &dyn ApiGateway,
    token: Option<AuthToken>,
    mutation: CartMutation,
) -> Result<Vec<CartItem>, ThunkError> {
    let token = require(token)?;
    let request = match mutation {
        CartMutation::Add { listing_id, count } => endpoints::add_to_cart(listing_id, count),
        CartMutation::UpdateCount { listing_id, count } => {
            endpoints::update_cart(listing_id, count)
        }
        CartMutation::Remove { listing_id } => endpoints::remove_from_cart(listing_id),
        CartMutation::Clear => endpoints::clear_cart(),
    };
    api.request(request.bearer(&token)).await?;
    fetch_list(api, Some(token), endpoints::cart()).await
}
