use super::mode::{CheckMode, resolve_check_mode};
use super::passport::{ConfiguredPassport, PassportVerifier};
use super::resolver::canonical_version_key;
use super::timestamp::now_timestamp;
use super::types::{Decision, Record, StoreSnapshot};
use crate::config::ConfigHandle;
use crate::error::{GateError, StoreError, VersionError};
use crate::store::{DefinitionStore, RecordStore};
use std::sync::Arc;

/// Optimistic-concurrency gate for node updates.
///
/// Decides whether an update may proceed by comparing the client's version
/// key with the store's canonical key under the object type's check mode.
/// The gate never writes to the store; its only side effects are metadata
/// changes on the caller's [`Record`], which must be persisted with the
/// update.
#[derive(Clone)]
pub struct UpdateGate {
    records: Arc<dyn RecordStore>,
    definitions: Arc<dyn DefinitionStore>,
    passport: Arc<dyn PassportVerifier>,
    config: ConfigHandle,
}

/// How a version key was accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyCheck {
    Matched,
    PassportAccepted,
    Mismatched,
}

/// What an enforcing mode does with a stale key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OnMismatch {
    Reject,
    FlagStale,
}

impl UpdateGate {
    pub fn new(
        records: Arc<dyn RecordStore>,
        definitions: Arc<dyn DefinitionStore>,
        passport: Arc<dyn PassportVerifier>,
        config: ConfigHandle,
    ) -> Self {
        Self {
            records,
            definitions,
            passport,
            config,
        }
    }

    /// Gate whose passport keys come from `config`, re-read on every check.
    pub fn from_config(
        records: Arc<dyn RecordStore>,
        definitions: Arc<dyn DefinitionStore>,
        config: ConfigHandle,
    ) -> Self {
        let passport = Arc::new(ConfiguredPassport::new(config.clone()));
        Self::new(records, definitions, passport, config)
    }

    /// Validate an update to `record`.
    ///
    /// When the caller already holds the node's snapshot it is passed as
    /// `prefetched` and the store read is skipped.
    ///
    /// On success the fallback marker is present only if a passport key
    /// authorized this update; [`Decision::ProceedWithStaleFlag`] also sets
    /// the stale-status flag.
    pub async fn validate(
        &self,
        record: &mut Record,
        prefetched: Option<&StoreSnapshot>,
    ) -> Result<Decision, GateError> {
        record.clear_fallback_marker();

        let mode =
            resolve_check_mode(self.definitions.as_ref(), &record.object_type, &record.node_type)
                .await?;
        tracing::debug!(
            record_id = %record.identifier,
            object_type = %record.object_type,
            %mode,
            "validating update"
        );

        let on_mismatch = match mode {
            CheckMode::Disabled => return Ok(Decision::ProceedNormally),
            CheckMode::Strict => OnMismatch::Reject,
            CheckMode::Lenient => OnMismatch::FlagStale,
        };

        let Some(client_key) = record.client_version_key() else {
            tracing::info!(record_id = %record.identifier, %mode, "blank version key rejected");
            return Err(VersionError::BlankVersionKey {
                record_id: record.identifier.clone(),
            }
            .into());
        };

        let fetched;
        let snapshot = if let Some(snapshot) = prefetched {
            snapshot
        } else {
            fetched = self.fetch_snapshot(&record.identifier).await?;
            &fetched
        };

        let check = self.check_version_key(record, &client_key, snapshot)?;
        tracing::debug!(record_id = %record.identifier, ?check, "version key checked");

        match (check, on_mismatch) {
            (KeyCheck::Matched | KeyCheck::PassportAccepted, _) => Ok(Decision::ProceedNormally),
            (KeyCheck::Mismatched, OnMismatch::Reject) => {
                tracing::info!(record_id = %record.identifier, "stale version key rejected");
                Err(VersionError::StaleVersionKey {
                    record_id: record.identifier.clone(),
                }
                .into())
            }
            (KeyCheck::Mismatched, OnMismatch::FlagStale) => {
                tracing::info!(
                    record_id = %record.identifier,
                    "stale version key accepted in lenient mode"
                );
                record.flag_stale_update();
                Ok(Decision::ProceedWithStaleFlag)
            }
        }
    }

    async fn fetch_snapshot(&self, id: &str) -> Result<StoreSnapshot, GateError> {
        let snapshot = self.records.fetch_snapshot(id).await?;
        snapshot.ok_or_else(|| StoreError::NotFound { id: id.to_string() }.into())
    }

    fn check_version_key(
        &self,
        record: &mut Record,
        client_key: &str,
        snapshot: &StoreSnapshot,
    ) -> Result<KeyCheck, VersionError> {
        let canonical = canonical_version_key(&record.identifier, snapshot)?;
        if client_key == canonical {
            return Ok(KeyCheck::Matched);
        }

        if !self.config.load().gate.passport_fallback_enabled {
            return Ok(KeyCheck::Mismatched);
        }

        if self.passport.is_valid_token(client_key) {
            tracing::info!(record_id = %record.identifier, "update authorized by passport key");
            record.stamp_fallback_marker(now_timestamp());
            Ok(KeyCheck::PassportAccepted)
        } else {
            Ok(KeyCheck::Mismatched)
        }
    }
}

impl std::fmt::Debug for UpdateGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateGate")
            .field("records", &self.records.name())
            .field("config", &self.config.path())
            .finish_non_exhaustive()
    }
}
