use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use super::{ApiGateway, ApiRequest};
use crate::config::ClientConfig;
use crate::error::ApiError;

/// [`ApiGateway`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    http: reqwest::Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Self::from_reqwest(&config.base_url, http)
    }

    /// Wrap an existing client, e.g. one with custom TLS or proxy settings.
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, ApiError> {
        Url::parse(base_url)?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, request: &ApiRequest) -> Result<Url, ApiError> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, request.path))?;
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&request.query);
        }
        Ok(url)
    }
}

#[async_trait]
impl ApiGateway for HttpGateway {
    async fn request(&self, request: ApiRequest) -> Result<Value, ApiError> {
        let url = self.url(&request)?;
        tracing::debug!(method = %request.method, %url, "API request");

        let mut builder = self.http.request(request.method.into(), url);
        if let Some(token) = &request.token {
            builder = builder.bearer_auth(token.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let resp = builder.send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            let message = error_message(&body)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
            tracing::debug!(status = status.as_u16(), %message, "API error response");
            return Err(ApiError::Server {
                status: status.as_u16(),
                message,
            });
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body).map_err(|err| ApiError::Decode {
            message: err.to_string(),
            body,
        })
    }
}

/// The `message` field of an error body, if it has one.
fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .and_then(Value::as_str)
        .filter(|message| !message.is_empty())
        .map(str::to_string)
}
