use super::timestamp::parse_millis;
use super::types::StoreSnapshot;
use crate::error::VersionError;

/// Derive the store's authoritative version key for `snapshot`.
///
/// A missing `lastUpdatedOn` is a store integrity failure and is reported
/// even when an explicit version key is present.
pub fn canonical_version_key(
    record_id: &str,
    snapshot: &StoreSnapshot,
) -> Result<String, VersionError> {
    let Some(last_updated_on) = non_blank(snapshot.last_updated_on.as_deref()) else {
        return Err(VersionError::MissingTimestamp {
            record_id: record_id.to_string(),
        });
    };

    if let Some(stored) = non_blank(snapshot.version_key.as_deref()) {
        return Ok(stored.to_string());
    }

    parse_millis(last_updated_on).map(|millis| millis.to_string())
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
