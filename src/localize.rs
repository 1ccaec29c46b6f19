//! Field localization.
//!
//! The remote API stores every field value under a locale key inside a
//! `fields` envelope:
//!
//! ```text
//! {"title": "Hi"}  ->  {"fields": {"title": {"en-US": "Hi"}}}
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A flat field map, as supplied by callers.
pub type FieldMap = Map<String, Value>;

/// A field map wrapped in the localization envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalizedFields {
    pub fields: Map<String, Value>,
}

/// Either a single value or a sequence of them.
///
/// Localizing keeps the shape: one in, one out; many in, many out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> OneOrMany<U> {
        match self {
            OneOrMany::One(item) => OneOrMany::One(f(item)),
            OneOrMany::Many(items) => OneOrMany::Many(items.into_iter().map(f).collect()),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            OneOrMany::One(_) => 1,
            OneOrMany::Many(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(item) => vec![item],
            OneOrMany::Many(items) => items,
        }
    }
}

impl<T> From<Vec<T>> for OneOrMany<T> {
    fn from(items: Vec<T>) -> Self {
        OneOrMany::Many(items)
    }
}

/// Localize one field map.
pub fn localize_fields(item: &FieldMap, locale: &str) -> LocalizedFields {
    let fields = item
        .iter()
        .map(|(key, value)| {
            let mut localized = Map::new();
            localized.insert(locale.to_string(), value.clone());
            (key.clone(), Value::Object(localized))
        })
        .collect();
    LocalizedFields { fields }
}

/// Localize one or many field maps, preserving the input shape and order.
pub fn localize(items: OneOrMany<FieldMap>, locale: &str) -> OneOrMany<LocalizedFields> {
    items.map(|item| localize_fields(&item, locale))
}

/// JSON boundary version of [`localize`]: an object yields an object, an
/// array of objects yields an array. Anything else is rejected.
pub fn localize_value(value: Value, locale: &str) -> Result<Value> {
    let input = match value {
        Value::Object(map) => OneOrMany::One(map),
        Value::Array(values) => OneOrMany::Many(
            values
                .into_iter()
                .enumerate()
                .map(|(index, v)| match v {
                    Value::Object(map) => Ok(map),
                    other => Err(Error::InvalidInput(format!(
                        "localize expects objects, item {index} is {}",
                        type_name(&other)
                    ))),
                })
                .collect::<Result<Vec<_>>>()?,
        ),
        other => {
            return Err(Error::InvalidInput(format!(
                "localize expects an object or an array of objects, got {}",
                type_name(&other)
            )));
        }
    };

    Ok(serde_json::to_value(localize(input, locale))?)
}

pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
