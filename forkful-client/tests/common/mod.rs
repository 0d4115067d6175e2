#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use forkful_client::model::{AuthToken, NewAddress, Session};
use forkful_client::{
    ApiError, ApiGateway, ApiRequest, ClientConfig, CredentialStore, MarketClient,
    MemoryCredentialStore, Method, RecordingNavigator,
};
use serde_json::Value;

type Handler = Box<dyn Fn(&ApiRequest) -> Result<Value, ApiError> + Send + Sync>;

struct Route {
    handler: Handler,
    delay: Option<Duration>,
}

/// In-process gateway with scripted answers per `(method, path)`.
#[derive(Default)]
pub struct ScriptedGateway {
    routes: Mutex<HashMap<(Method, String), Arc<Route>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl ScriptedGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn route<F>(&self, method: Method, path: &str, delay: Option<Duration>, handler: F)
    where
        F: Fn(&ApiRequest) -> Result<Value, ApiError> + Send + Sync + 'static,
    {
        self.routes.lock().unwrap().insert(
            (method, path.to_string()),
            Arc::new(Route {
                handler: Box::new(handler),
                delay,
            }),
        );
    }

    pub fn respond(&self, method: Method, path: &str, body: Value) {
        self.route(method, path, None, move |_| Ok(body.clone()));
    }

    pub fn respond_after(&self, method: Method, path: &str, delay: Duration, body: Value) {
        self.route(method, path, Some(delay), move |_| Ok(body.clone()));
    }

    pub fn fail(&self, method: Method, path: &str, status: u16, message: &str) {
        let message = message.to_string();
        self.route(method, path, None, move |_| {
            Err(ApiError::Server {
                status,
                message: message.clone(),
            })
        });
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.path).collect()
    }
}

#[async_trait]
impl ApiGateway for ScriptedGateway {
    async fn request(&self, request: ApiRequest) -> Result<Value, ApiError> {
        self.requests.lock().unwrap().push(request.clone());
        let route = self
            .routes
            .lock()
            .unwrap()
            .get(&(request.method, request.path.clone()))
            .cloned();

        let Some(route) = route else {
            return Err(ApiError::Server {
                status: 404,
                message: format!("no route for {} {}", request.method, request.path),
            });
        };
        if let Some(delay) = route.delay {
            tokio::time::sleep(delay).await;
        }
        (route.handler)(&request)
    }
}

pub struct Harness {
    pub client: MarketClient,
    pub api: Arc<ScriptedGateway>,
    pub credentials: Arc<MemoryCredentialStore>,
    pub navigator: Arc<RecordingNavigator>,
}

pub fn harness() -> Harness {
    let api = ScriptedGateway::new();
    let credentials = Arc::new(MemoryCredentialStore::new());
    let navigator = Arc::new(RecordingNavigator::new());
    let client = MarketClient::new(
        ClientConfig::default(),
        api.clone(),
        credentials.clone() as Arc<dyn CredentialStore>,
        navigator.clone(),
    );
    Harness {
        client,
        api,
        credentials,
        navigator,
    }
}

/// Harness with a session token already in state.
pub fn signed_in() -> Harness {
    let mut harness = harness();
    harness.client.state_mut().auth.session = Session::authenticated(AuthToken::new("abc"));
    harness
}

pub fn new_address(street: &str, primary: bool) -> NewAddress {
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

pub fn names(client: &MarketClient) -> Vec<&'static str> {
    client.event_log().map(|log| log.names()).unwrap_or_default()
}
