//! reqwest-backed space handle.
//!
//! Transport concerns (TLS, pooling, timeouts) stay inside reqwest. Non-2xx
//! responses are turned into a [`RemoteError`] whose message is the JSON
//! document the error classifier expects.

use std::time::Duration;

use opentelemetry::KeyValue;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Map, Value, json};
use tracing::{Instrument, debug};

use super::{ApiRequest, SpaceApi, SpaceConnector};
use crate::config::Config;
use crate::error::Result;
use crate::model::RemoteError;
use crate::telemetry::{job, metrics};

const MANAGEMENT_MEDIA_TYPE: &str = "application/vnd.contentful.management.v1+json";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Connects to one space environment over HTTP.
#[derive(Clone)]
pub struct HttpConnector {
    client: Client,
    api_url: String,
    space_id: String,
    environment: String,
    access_token: SecretString,
}

impl HttpConnector {
    /// Build a connector from process configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("spaceq/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self::with_client(
            client,
            &config.api_url,
            &config.space_id,
            &config.environment,
            config.access_token.clone(),
        ))
    }

    /// Build a connector around an existing reqwest client.
    pub fn with_client(
        client: Client,
        api_url: &str,
        space_id: &str,
        environment: &str,
        access_token: SecretString,
    ) -> Self {
        Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            space_id: space_id.to_string(),
            environment: environment.to_string(),
            access_token,
        }
    }
}

impl SpaceConnector for HttpConnector {
    type Api = HttpSpaceApi;

    /// Fetch the space once to check it exists and the token can see it.
    async fn connect(&self) -> std::result::Result<HttpSpaceApi, RemoteError> {
        let space_url = format!("{}/spaces/{}", self.api_url, self.space_id);
        let response = self
            .client
            .get(&space_url)
            .bearer_auth(self.access_token.expose_secret())
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let text = response.text().await.map_err(transport_error)?;
        if !status.is_success() {
            return Err(api_error(status, "GET", &space_url, &text));
        }
        debug!(space = %self.space_id, environment = %self.environment, "connected to space");

        Ok(HttpSpaceApi {
            client: self.client.clone(),
            base_url: format!("{space_url}/environments/{}", self.environment),
            access_token: self.access_token.clone(),
        })
    }
}

/// A connected space environment.
#[derive(Clone)]
pub struct HttpSpaceApi {
    client: Client,
    base_url: String,
    access_token: SecretString,
}

impl HttpSpaceApi {
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl SpaceApi for HttpSpaceApi {
    async fn send(&self, request: ApiRequest) -> std::result::Result<Value, RemoteError> {
        let url = format!("{}/{}", self.base_url, request.path);
        let method = request.method.as_str().to_string();
        let span = job::start_request_span(&method, &request.path);

        async {
            let mut builder = self
                .client
                .request(request.method.clone(), &url)
                .bearer_auth(self.access_token.expose_secret());
            if let Some(version) = request.version {
                builder = builder.header("X-Contentful-Version", version);
            }
            if let Some(ref content_type) = request.content_type {
                builder = builder.header("X-Contentful-Content-Type", content_type);
            }
            if let Some(ref body) = request.body {
                let bytes = serde_json::to_vec(body)
                    .map_err(|e| RemoteError::new("InvalidItem", e.to_string()))?;
                builder = builder.header(CONTENT_TYPE, MANAGEMENT_MEDIA_TYPE).body(bytes);
            }

            let response = builder.send().await.map_err(transport_error)?;
            let status = response.status();
            job::record_response_status(&tracing::Span::current(), status.as_u16());
            metrics::remote_requests().add(
                1,
                &[
                    KeyValue::new("method", method.clone()),
                    KeyValue::new("status", i64::from(status.as_u16())),
                ],
            );

            let text = response.text().await.map_err(transport_error)?;
            if !status.is_success() {
                return Err(api_error(status, &method, &url, &text));
            }
            if text.trim().is_empty() {
                return Ok(Value::Null);
            }
            serde_json::from_str::<Value>(&text)
                .map_err(|e| RemoteError::new("InvalidResponse", format!("bad response body: {e}")))
        }
        .instrument(span)
        .await
    }
}

fn transport_error(err: reqwest::Error) -> RemoteError {
    RemoteError::new("HttpError", err.to_string())
}

/// Shape an error response the way the classifier reads it:
/// `{status, statusText, message, details, requestId, request}`. Keys the
/// response body does not carry are left out.
fn api_error(status: StatusCode, method: &str, url: &str, body: &str) -> RemoteError {
    let parsed: Value = serde_json::from_str(body).unwrap_or(Value::Null);
    let status_text = status.canonical_reason().unwrap_or("Unknown");

    let name = parsed
        .pointer("/sys/id")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| status_text.replace(' ', ""));

    let mut payload = Map::new();
    payload.insert("status".into(), json!(status.as_u16()));
    payload.insert("statusText".into(), json!(status_text));
    match parsed.get("message") {
        Some(message) => {
            payload.insert("message".into(), message.clone());
        }
        None if !body.trim().is_empty() && parsed.is_null() => {
            payload.insert("message".into(), json!(body));
        }
        None => {}
    }
    if let Some(details) = parsed.get("details") {
        payload.insert("details".into(), details.clone());
    }
    payload.insert("request".into(), json!({ "url": url, "method": method }));
    if let Some(request_id) = parsed.get("requestId") {
        payload.insert("requestId".into(), request_id.clone());
    }

    RemoteError::from_payload(name, &Value::Object(payload))
}
