use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Client-supplied version key, also the store property holding the explicit key.
pub const VERSION_KEY: &str = "versionKey";
/// Store property holding the last-modified timestamp.
pub const LAST_UPDATED_ON: &str = "lastUpdatedOn";
/// Marker stamped when an update was authorized by a passport key.
pub const SYS_INTERNAL_LAST_UPDATED_ON: &str = "SYS_INTERNAL_LAST_UPDATED_ON";
pub const NODE_UPDATE_STATUS: &str = "NODE_UPDATE_STATUS";
pub const STALE_DATA_UPDATED: &str = "STALE_DATA_UPDATED";
/// Definition-node config key naming the check mode of an object type.
pub const VERSION_CHECK_MODE: &str = "versionCheckMode";

const DATA_NODE_TAG: &str = "DATA_NODE";
const DEFINITION_NODE_TAG: &str = "DEFINITION_NODE";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeType {
    DataNode,
    DefinitionNode,
    Other(String),
}

impl NodeType {
    pub fn is_definition(&self) -> bool {
        matches!(self, Self::DefinitionNode)
    }

    pub fn as_tag(&self) -> &str {
        match self {
            Self::DataNode => DATA_NODE_TAG,
            Self::DefinitionNode => DEFINITION_NODE_TAG,
            Self::Other(tag) => tag,
        }
    }
}

impl From<String> for NodeType {
    fn from(tag: String) -> Self {
        let trimmed = tag.trim();
        if trimmed.eq_ignore_ascii_case(DATA_NODE_TAG) {
            Self::DataNode
        } else if trimmed.eq_ignore_ascii_case(DEFINITION_NODE_TAG) {
            Self::DefinitionNode
        } else {
            Self::Other(tag)
        }
    }
}

impl From<&str> for NodeType {
    fn from(tag: &str) -> Self {
        Self::from(tag.to_string())
    }
}

impl From<NodeType> for String {
    fn from(node_type: NodeType) -> Self {
        match node_type {
            NodeType::Other(tag) => tag,
            known => known.as_tag().to_string(),
        }
    }
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// A record submitted for update. Owned by the caller; the gate only
/// touches the marker and stale-status metadata keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub identifier: String,
    pub object_type: String,
    pub node_type: NodeType,
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
}

impl Record {
    pub fn new(
        identifier: impl Into<String>,
        object_type: impl Into<String>,
        node_type: NodeType,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            object_type: object_type.into(),
            node_type,
            metadata: HashMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// The client-supplied version key, or `None` when blank.
    ///
    /// Numeric keys are accepted in their decimal form.
    pub fn client_version_key(&self) -> Option<String> {
        let key = match self.metadata.get(VERSION_KEY)? {
            Value::String(key) => key.clone(),
            Value::Number(number) => number.to_string(),
            _ => return None,
        };
        if key.trim().is_empty() {
            None
        } else {
            Some(key)
        }
    }

    pub fn fallback_marker(&self) -> Option<&str> {
        self.metadata
            .get(SYS_INTERNAL_LAST_UPDATED_ON)
            .and_then(Value::as_str)
    }

    pub fn is_flagged_stale(&self) -> bool {
        self.metadata.get(NODE_UPDATE_STATUS).and_then(Value::as_str) == Some(STALE_DATA_UPDATED)
    }

    pub(crate) fn clear_fallback_marker(&mut self) {
        self.metadata.remove(SYS_INTERNAL_LAST_UPDATED_ON);
    }

    pub(crate) fn stamp_fallback_marker(&mut self, timestamp: String) {
        self.metadata
            .insert(SYS_INTERNAL_LAST_UPDATED_ON.to_string(), Value::String(timestamp));
    }

    pub(crate) fn flag_stale_update(&mut self) {
        self.metadata.insert(
            NODE_UPDATE_STATUS.to_string(),
            Value::String(STALE_DATA_UPDATED.to_string()),
        );
    }
}

/// The store's view of a record at validation time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    #[serde(default, rename = "lastUpdatedOn")]
    pub last_updated_on: Option<String>,
    #[serde(default, rename = "versionKey")]
    pub version_key: Option<String>,
}

impl StoreSnapshot {
    pub fn new(last_updated_on: impl Into<String>) -> Self {
        Self {
            last_updated_on: Some(last_updated_on.into()),
            version_key: None,
        }
    }

    pub fn with_version_key(mut self, version_key: impl Into<String>) -> Self {
        self.version_key = Some(version_key.into());
        self
    }
}

/// Outcome of a successful gate check. Rejections travel as errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Decision {
    ProceedNormally,
    /// Lenient mode mismatch: persist the update together with the stale flag.
    ProceedWithStaleFlag,
}

impl Decision {
    pub fn requires_stale_handling(self) -> bool {
        matches!(self, Self::ProceedWithStaleFlag)
    }
}
