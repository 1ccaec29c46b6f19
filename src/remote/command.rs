//! Command tables.
//!
//! Each remote operation the queue can drive is an enum variant that knows
//! how to build its [`ApiRequest`] from one work item.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use super::ApiRequest;
use crate::error::{Error, Result};
use crate::model::RemoteError;

// ---------------------------------------------------------------------------
// Space-level commands
// ---------------------------------------------------------------------------

/// Operations called on the space with the work item as the last argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpaceCommand {
    /// Item: localized fields.
    CreateEntry { content_type_id: String },
    /// Item: localized fields plus `sys.id`.
    CreateEntryWithId { content_type_id: String },
    /// Item: localized asset fields.
    CreateAsset,
    /// Item: content type definition.
    CreateContentType,
    /// Item: an entry with `sys.id` and `sys.version`.
    UpdateEntry,
    /// Item: an id string or an object with `sys.id`.
    GetEntry,
    GetAsset,
    GetContentType,
}

impl SpaceCommand {
    /// Parse a command name. Entry creation needs a content type.
    pub fn parse(name: &str, content_type_id: Option<&str>) -> Result<Self> {
        let needs_content_type = || {
            content_type_id.map(str::to_string).ok_or_else(|| {
                Error::InvalidInput(format!("{name} requires a content type id"))
            })
        };
        match name {
            "createEntry" => Ok(SpaceCommand::CreateEntry {
                content_type_id: needs_content_type()?,
            }),
            "createEntryWithId" => Ok(SpaceCommand::CreateEntryWithId {
                content_type_id: needs_content_type()?,
            }),
            "createAsset" => Ok(SpaceCommand::CreateAsset),
            "createContentType" => Ok(SpaceCommand::CreateContentType),
            "updateEntry" => Ok(SpaceCommand::UpdateEntry),
            "getEntry" => Ok(SpaceCommand::GetEntry),
            "getAsset" => Ok(SpaceCommand::GetAsset),
            "getContentType" => Ok(SpaceCommand::GetContentType),
            other => Err(Error::InvalidInput(format!("unknown space command: {other}"))),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SpaceCommand::CreateEntry { .. } => "createEntry",
            SpaceCommand::CreateEntryWithId { .. } => "createEntryWithId",
            SpaceCommand::CreateAsset => "createAsset",
            SpaceCommand::CreateContentType => "createContentType",
            SpaceCommand::UpdateEntry => "updateEntry",
            SpaceCommand::GetEntry => "getEntry",
            SpaceCommand::GetAsset => "getAsset",
            SpaceCommand::GetContentType => "getContentType",
        }
    }

    /// Build the request for one item.
    pub fn request(&self, item: &Value) -> std::result::Result<ApiRequest, RemoteError> {
        Ok(match self {
            SpaceCommand::CreateEntry { content_type_id } => {
                ApiRequest::post("entries", item.clone()).content_type(content_type_id)
            }
            SpaceCommand::CreateEntryWithId { content_type_id } => {
                let id = sys_id(item)?;
                ApiRequest::put(format!("entries/{id}"))
                    .content_type(content_type_id)
                    .body(without_sys(item))
            }
            SpaceCommand::CreateAsset => ApiRequest::post("assets", item.clone()),
            SpaceCommand::CreateContentType => ApiRequest::post("content_types", item.clone()),
            SpaceCommand::UpdateEntry => {
                let id = sys_id(item)?;
                ApiRequest::put(format!("entries/{id}"))
                    .version(sys_version(item))
                    .body(without_sys(item))
            }
            SpaceCommand::GetEntry => ApiRequest::get(format!("entries/{}", item_id(item)?)),
            SpaceCommand::GetAsset => ApiRequest::get(format!("assets/{}", item_id(item)?)),
            SpaceCommand::GetContentType => {
                ApiRequest::get(format!("content_types/{}", item_id(item)?))
            }
        })
    }
}

impl fmt::Display for SpaceCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Entity actions
// ---------------------------------------------------------------------------

/// Operations called on an entity (entry, asset or content type) itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityAction {
    Publish,
    Unpublish,
    Archive,
    Unarchive,
    Update,
    Delete,
}

impl EntityAction {
    pub fn name(self) -> &'static str {
        match self {
            EntityAction::Publish => "publish",
            EntityAction::Unpublish => "unpublish",
            EntityAction::Archive => "archive",
            EntityAction::Unarchive => "unarchive",
            EntityAction::Update => "update",
            EntityAction::Delete => "delete",
        }
    }

    /// Build the request acting on `entity`, which must carry `sys.type`
    /// and `sys.id`.
    pub fn request(self, entity: &Value) -> std::result::Result<ApiRequest, RemoteError> {
        let collection = collection_path(entity)?;
        let id = sys_id(entity)?;
        let version = sys_version(entity);
        let base = format!("{collection}/{id}");

        Ok(match self {
            EntityAction::Publish => ApiRequest::put(format!("{base}/published")).version(version),
            EntityAction::Unpublish => ApiRequest::delete(format!("{base}/published")),
            EntityAction::Archive => ApiRequest::put(format!("{base}/archived")).version(version),
            EntityAction::Unarchive => ApiRequest::delete(format!("{base}/archived")),
            EntityAction::Update => ApiRequest::put(base)
                .version(version)
                .body(without_sys(entity)),
            EntityAction::Delete => ApiRequest::delete(base),
        })
    }
}

impl FromStr for EntityAction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "publish" => Ok(EntityAction::Publish),
            "unpublish" => Ok(EntityAction::Unpublish),
            "archive" => Ok(EntityAction::Archive),
            "unarchive" => Ok(EntityAction::Unarchive),
            "update" => Ok(EntityAction::Update),
            "delete" => Ok(EntityAction::Delete),
            other => Err(Error::InvalidInput(format!("unknown entity action: {other}"))),
        }
    }
}

impl fmt::Display for EntityAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Listings
// ---------------------------------------------------------------------------

/// Paged collections that can be fetched from the space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Listing {
    Entries,
    Assets,
    ContentTypes,
}

impl Listing {
    pub fn path(self) -> &'static str {
        match self {
            Listing::Entries => "entries",
            Listing::Assets => "assets",
            Listing::ContentTypes => "content_types",
        }
    }

    pub fn request(self) -> ApiRequest {
        ApiRequest::get(self.path())
    }
}

impl FromStr for Listing {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "entries" | "getEntries" => Ok(Listing::Entries),
            "assets" | "getAssets" => Ok(Listing::Assets),
            "contentTypes" | "content_types" | "getContentTypes" => Ok(Listing::ContentTypes),
            other => Err(Error::InvalidInput(format!("unknown listing: {other}"))),
        }
    }
}

// ---------------------------------------------------------------------------
// Item helpers
// ---------------------------------------------------------------------------

fn invalid_item(message: impl Into<String>) -> RemoteError {
    RemoteError::new("InvalidItem", message)
}

fn sys_id(item: &Value) -> std::result::Result<&str, RemoteError> {
    item.pointer("/sys/id")
        .and_then(Value::as_str)
        .ok_or_else(|| invalid_item("item has no sys.id"))
}

fn sys_version(item: &Value) -> Option<u64> {
    item.pointer("/sys/version").and_then(Value::as_u64)
}

/// An id given directly as a string, or via `sys.id`.
fn item_id(item: &Value) -> std::result::Result<&str, RemoteError> {
    match item {
        Value::String(id) => Ok(id.as_str()),
        other => sys_id(other),
    }
}

fn collection_path(entity: &Value) -> std::result::Result<&'static str, RemoteError> {
    match entity.pointer("/sys/type").and_then(Value::as_str) {
        Some("Entry") => Ok("entries"),
        Some("Asset") => Ok("assets"),
        Some("ContentType") => Ok("content_types"),
        Some(other) => Err(invalid_item(format!("unsupported entity type: {other}"))),
        None => Err(invalid_item("item has no sys.type")),
    }
}

fn without_sys(item: &Value) -> Value {
    match item {
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(key, _)| key.as_str() != "sys")
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        ),
        other => other.clone(),
    }
}
