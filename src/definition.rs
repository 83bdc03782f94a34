//! Take definition (mTake) adapter.
//!
//! The mTake document is JSON describing the recording and the nodes in it.
//! Only its node list matters for channel addressing, so this module reduces
//! the document to a [`TakeDefinition`]: each item's name and the channel
//! names listed for it.

use serde_json::Value;
use shadowtake_stream::{DefinitionNode, TakeDefinition};
use std::path::Path;

/// Errors reading a take definition.
#[derive(Debug, thiserror::Error)]
pub enum DefinitionError {
    /// The file could not be read.
    #[error("failed to read take definition {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid JSON.
    #[error("take definition is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The document is JSON but not shaped like a take definition.
    #[error("invalid take definition: {0}")]
    Invalid(String),
}

/// Keys naming a node, in order of preference.
const NAME_KEYS: &[&str] = &["id", "name"];

/// Keys holding a node's channel list.
const CHANNEL_KEYS: &[&str] = &["channel", "channels"];

/// Parse mTake JSON text into a [`TakeDefinition`].
///
/// The document's `items` array lists the nodes. Each item is named by its
/// `id` (or `name`) and may carry its channels under `channel` or
/// `channels`, either as an array of strings or as an object keyed by
/// channel name, and carries the node `key` of keyed streams. Items without
/// a usable name stay in the list with an empty name, since keyed streams
/// match nodes to items by position. A document with no `items` yields an
/// empty definition.
pub fn parse_definition(text: &str) -> Result<TakeDefinition, DefinitionError> {
    let document: Value = serde_json::from_str(text)?;
    from_value(&document)
}

/// Read and parse an mTake file.
pub fn load_definition(path: &Path) -> Result<TakeDefinition, DefinitionError> {
    let text = std::fs::read_to_string(path).map_err(|source| DefinitionError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_definition(&text)
}

/// Convert an already-parsed document.
pub fn from_value(document: &Value) -> Result<TakeDefinition, DefinitionError> {
    let root = document
        .as_object()
        .ok_or_else(|| DefinitionError::Invalid("document root is not an object".to_string()))?;

    let items = match root.get("items") {
        None | Some(Value::Null) => return Ok(TakeDefinition::default()),
        Some(Value::Array(items)) => items,
        Some(_) => return Err(DefinitionError::Invalid("`items` is not an array".to_string())),
    };

    let mut nodes = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        // Unnamed items keep their slot: keyed streams name nodes by position.
        let name = node_name(item).unwrap_or_default();
        if name.is_empty() {
            tracing::debug!(item = i, "Take definition item has no name");
        }
        nodes.push(DefinitionNode {
            name: name.to_string(),
            key: node_key(item),
            channels: channel_names(item),
        });
    }

    Ok(TakeDefinition::new(nodes))
}

fn node_name(item: &Value) -> Option<&str> {
    NAME_KEYS
        .iter()
        .filter_map(|key| item.get(key)?.as_str())
        .find(|name| !name.is_empty())
}

fn node_key(item: &Value) -> Option<u32> {
    item.get("key")?.as_u64()?.try_into().ok()
}

fn channel_names(item: &Value) -> Vec<String> {
    let Some(list) = CHANNEL_KEYS.iter().find_map(|key| item.get(key)) else {
        return Vec::new();
    };

    match list {
        Value::Array(values) => values
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        Value::Object(map) => map.keys().cloned().collect(),
        _ => Vec::new(),
    }
}
