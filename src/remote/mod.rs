//! Remote space handle.
//!
//! The queue never talks HTTP itself. It sees a [`SpaceApi`] that turns an
//! [`ApiRequest`] into JSON or a [`RemoteError`], obtained once per session
//! from a [`SpaceConnector`]. Command tables in [`command`] map the named
//! remote operations onto requests.

pub mod command;
pub mod http;

pub use command::{EntityAction, Listing, SpaceCommand};
pub use http::{HttpConnector, HttpSpaceApi};

use std::future::Future;

use reqwest::Method;
use serde_json::Value;

use crate::model::RemoteError;

/// One request against the current space environment.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the environment, e.g. `entries/abc/published`.
    pub path: String,
    /// Sent as `X-Contentful-Version`.
    pub version: Option<u64>,
    /// Sent as `X-Contentful-Content-Type`.
    pub content_type: Option<String>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            version: None,
            content_type: None,
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::POST, path).body(body)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn version(mut self, version: Option<u64>) -> Self {
        self.version = version;
        self
    }

    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// A connected space. Shared read-only by all in-flight operations.
pub trait SpaceApi {
    fn send(
        &self,
        request: ApiRequest,
    ) -> impl Future<Output = Result<Value, RemoteError>> + Send;
}

/// Produces a [`SpaceApi`]; called once per client session.
pub trait SpaceConnector {
    type Api: SpaceApi;

    fn connect(&self) -> impl Future<Output = Result<Self::Api, RemoteError>> + Send;
}
