//! Collection adapter.
//!
//! Remote listings come back either as a bare array or as a paged
//! collection with an `items` field. The shape is decided once, here, and
//! everything downstream works on [`Collection`].

use crate::error::{Error, Result};
use crate::localize::type_name;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One page of a remote listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            total: None,
            skip: None,
            limit: None,
        }
    }
}

/// A plain array of items or a paged collection.
#[derive(Debug, Clone, PartialEq)]
pub enum Collection<T> {
    Array(Vec<T>),
    Page(Page<T>),
}

impl<T> Collection<T> {
    /// The items, in order.
    pub fn items(&self) -> &[T] {
        match self {
            Collection::Array(items) => items,
            Collection::Page(page) => &page.items,
        }
    }

    pub fn into_items(self) -> Vec<T> {
        match self {
            Collection::Array(items) => items,
            Collection::Page(page) => page.items,
        }
    }

    pub fn len(&self) -> usize {
        self.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }
}

impl Collection<Value> {
    /// Decide the shape of a JSON value.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Array(items) => Ok(Collection::Array(items)),
            Value::Object(mut map) => match map.remove("items") {
                Some(Value::Array(items)) => Ok(Collection::Page(Page {
                    items,
                    total: map.get("total").and_then(Value::as_u64),
                    skip: map.get("skip").and_then(Value::as_u64),
                    limit: map.get("limit").and_then(Value::as_u64),
                })),
                _ => Err(invalid_shape("an object without an items array")),
            },
            other => Err(invalid_shape(type_name(&other))),
        }
    }
}

fn invalid_shape(got: &str) -> Error {
    Error::InvalidInput(format!(
        "expects either an array of items or a paged collection, got {got}"
    ))
}

impl<T> From<Vec<T>> for Collection<T> {
    fn from(items: Vec<T>) -> Self {
        Collection::Array(items)
    }
}

impl<T> From<Page<T>> for Collection<T> {
    fn from(page: Page<T>) -> Self {
        Collection::Page(page)
    }
}

impl TryFrom<Value> for Collection<Value> {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        Collection::from_value(value)
    }
}

/// Normalize a JSON value into its ordered items.
pub fn to_item_sequence(value: Value) -> Result<Vec<Value>> {
    Collection::from_value(value).map(Collection::into_items)
}
