//! In-memory space used by the client tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::{Value, json};
use spaceq::model::RemoteError;
use spaceq::remote::{ApiRequest, SpaceApi, SpaceConnector};

type Responder = Arc<dyn Fn(&ApiRequest, usize) -> Result<Value, RemoteError> + Send + Sync>;

/// Records every request and answers through a scripted responder.
///
/// The responder also receives how many times the same method + path has
/// been requested before, so tests can fail the first attempt only.
#[derive(Clone)]
pub struct FakeApi {
    calls: Arc<Mutex<Vec<ApiRequest>>>,
    seen: Arc<Mutex<HashMap<String, usize>>>,
    responder: Responder,
}

impl FakeApi {
    pub fn new(
        responder: impl Fn(&ApiRequest, usize) -> Result<Value, RemoteError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            seen: Arc::new(Mutex::new(HashMap::new())),
            responder: Arc::new(responder),
        }
    }

    /// Echo the request back as `{method, path, body}`.
    pub fn echo() -> Self {
        Self::new(|request, _| {
            Ok(json!({
                "method": request.method.as_str(),
                "path": request.path,
                "body": request.body,
            }))
        })
    }

    pub fn calls(&self) -> Vec<ApiRequest> {
        self.calls.lock().unwrap().clone()
    }
}

impl SpaceApi for FakeApi {
    async fn send(&self, request: ApiRequest) -> Result<Value, RemoteError> {
        let previous = {
            let key = format!("{} {}", request.method, request.path);
            let mut seen = self.seen.lock().unwrap();
            let count = seen.entry(key).or_insert(0);
            let previous = *count;
            *count += 1;
            previous
        };
        self.calls.lock().unwrap().push(request.clone());
        tokio::task::yield_now().await;
        (self.responder)(&request, previous)
    }
}

/// Hands out clones of one [`FakeApi`] and counts connections.
pub struct FakeConnector {
    pub api: FakeApi,
    pub connects: Arc<AtomicUsize>,
    pub fail_with: Option<RemoteError>,
}

impl FakeConnector {
    pub fn new(api: FakeApi) -> Self {
        Self {
            api,
            connects: Arc::new(AtomicUsize::new(0)),
            fail_with: None,
        }
    }

    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }
}

impl SpaceConnector for FakeConnector {
    type Api = FakeApi;

    async fn connect(&self) -> Result<FakeApi, RemoteError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        match self.fail_with {
            Some(ref err) => Err(err.clone()),
            None => Ok(self.api.clone()),
        }
    }
}

/// A raw error shaped like the remote API's JSON failures.
pub fn api_error(status: u16, status_text: &str) -> RemoteError {
    RemoteError::new(
        status_text.replace(' ', ""),
        json!({
            "status": status,
            "statusText": status_text,
            "message": format!("{status_text} from fake space"),
            "request": {"url": "/fake", "method": "GET"},
        })
        .to_string(),
    )
}

pub fn entry(id: &str, version: u64) -> Value {
    json!({
        "sys": {"type": "Entry", "id": id, "version": version},
        "fields": {"title": {"en-US": id}},
    })
}
