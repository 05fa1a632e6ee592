use super::types::{NodeType, VERSION_CHECK_MODE};
use crate::error::StoreError;
use crate::store::DefinitionStore;
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum CheckMode {
    #[default]
    #[serde(rename = "OFF", alias = "DISABLED")]
    #[strum(serialize = "OFF")]
    Disabled,
    #[strum(serialize = "STRICT")]
    Strict,
    #[strum(serialize = "LENIENT")]
    Lenient,
}

impl CheckMode {
    /// Case-insensitive parse of a configured mode. `None` for blank or
    /// unrecognized values.
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_uppercase();
        match normalized.as_str() {
            "OFF" | "DISABLED" => Some(Self::Disabled),
            "STRICT" => Some(Self::Strict),
            "LENIENT" => Some(Self::Lenient),
            _ => None,
        }
    }
}

/// Resolve the check mode for `object_type`.
///
/// Definition nodes are never version-checked. Blank and unrecognized
/// configured values both resolve to [`CheckMode::Disabled`].
pub async fn resolve_check_mode(
    definitions: &dyn DefinitionStore,
    object_type: &str,
    node_type: &NodeType,
) -> Result<CheckMode, StoreError> {
    if node_type.is_definition() {
        tracing::debug!(object_type, "definition node: version check disabled");
        return Ok(CheckMode::Disabled);
    }

    let configured = definitions
        .config_value(object_type, VERSION_CHECK_MODE)
        .await?;
    let Some(raw) = configured.filter(|v| !v.trim().is_empty()) else {
        return Ok(CheckMode::Disabled);
    };

    let mode = CheckMode::parse(&raw).unwrap_or_else(|| {
        tracing::warn!(
            object_type,
            configured = %raw,
            "unrecognized versionCheckMode, treating as OFF"
        );
        CheckMode::Disabled
    });
    tracing::debug!(object_type, %mode, "resolved version check mode");
    Ok(mode)
}
