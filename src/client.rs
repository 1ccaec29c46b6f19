//! Client facade.
//!
//! Owns the options, the retry policy and the connector. A session
//! connects once and hands a [`Space`] to the caller, which queues remote
//! commands through the shared [`QueueEngine`].

use std::future::Future;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::collection::Collection;
use crate::config::ClientOptions;
use crate::engine::{QueueEngine, retry};
use crate::error::Result;
use crate::localize::{self, FieldMap, LocalizedFields, OneOrMany};
use crate::model::RemoteError;
use crate::remote::{EntityAction, Listing, SpaceApi, SpaceCommand, SpaceConnector};

/// Entry point: localization plus queued access to a remote space.
pub struct Client<C> {
    connector: C,
    options: ClientOptions,
    engine: QueueEngine,
}

impl<C: SpaceConnector> Client<C> {
    pub fn new(connector: C, options: ClientOptions) -> Self {
        let engine = QueueEngine::new(
            options.retry.policy(),
            options.queue.clone(),
            options.progress,
        );
        Self {
            connector,
            options,
            engine,
        }
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    pub fn engine(&self) -> &QueueEngine {
        &self.engine
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// Wrap flat field maps in the localization envelope for the
    /// configured locale.
    pub fn localize(&self, items: OneOrMany<FieldMap>) -> OneOrMany<LocalizedFields> {
        localize::localize(items, &self.options.locale)
    }

    /// Connect to the space and run `f` with it.
    pub async fn with_space<T, F, Fut>(&self, f: F) -> Result<T>
    where
        F: FnOnce(Space<C::Api>) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let api = self.connector.connect().await?;
        debug!("space session opened");
        f(Space::new(api, self.engine.clone())).await
    }

    /// Run an entity action over every item of an array or paged collection.
    pub async fn queue_over_collection(
        &self,
        action: EntityAction,
        collection: Collection<Value>,
    ) -> Result<Vec<Value>> {
        self.with_space(|space| async move { space.queue_entities(action, collection).await })
            .await
    }

    /// The raw queue primitive: run `op` over `items` with the configured
    /// concurrency and retry policy.
    pub async fn queue<'a, T, R, F, Fut>(&self, label: &str, items: &'a [T], op: F) -> Result<Vec<R>>
    where
        F: Fn(&'a T) -> Fut,
        Fut: Future<Output = std::result::Result<R, RemoteError>> + 'a,
    {
        self.engine.run(label, items, op).await
    }
}

/// A connected space. Cheap to clone; clones share the handle.
pub struct Space<A> {
    api: Arc<A>,
    engine: QueueEngine,
}

impl<A> Clone for Space<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            engine: self.engine.clone(),
        }
    }
}

impl<A: SpaceApi> Space<A> {
    pub fn new(api: A, engine: QueueEngine) -> Self {
        Self {
            api: Arc::new(api),
            engine,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn engine(&self) -> &QueueEngine {
        &self.engine
    }

    /// Run a space command once per item, in order.
    pub async fn queue(&self, command: &SpaceCommand, items: &[Value]) -> Result<Vec<Value>> {
        let label = format!("<Space.{command}>");
        let api = self.api.as_ref();
        self.engine
            .run(&label, items, |item| async move {
                let request = command.request(item)?;
                api.send(request).await
            })
            .await
    }

    /// Run an entity action on every item of an array or paged collection.
    pub async fn queue_entities(
        &self,
        action: EntityAction,
        collection: impl Into<Collection<Value>>,
    ) -> Result<Vec<Value>> {
        let items = collection.into().into_items();
        let label = format!("<Entry.{action}>");
        let api = self.api.as_ref();
        self.engine
            .run(&label, &items, |entity| async move {
                let request = action.request(entity)?;
                api.send(request).await
            })
            .await
    }

    /// Fetch a listing, retrying transient failures like any queued item.
    pub async fn list(&self, listing: Listing) -> Result<Collection<Value>> {
        let api = self.api.as_ref();
        let value = retry::attempt(|| api.send(listing.request()), self.engine.policy()).await?;
        Collection::from_value(value)
    }
}
