use super::gate_harness::{
    LAST_UPDATED_MILLIS, LAST_UPDATED_ON, NODE_ID, OBJECT_TYPE, memory_gate, update_with_key,
};

use versiongate::error::{GateError, VersionError};
use versiongate::versioning::{
    Decision, NODE_UPDATE_STATUS, NodeType, Record, STALE_DATA_UPDATED, StoreSnapshot,
    SYS_INTERNAL_LAST_UPDATED_ON,
};

#[tokio::test]
async fn strict_matching_millis_proceeds() {
    let (_store, gate) = memory_gate(Some("STRICT"), false);
    let mut record = update_with_key(LAST_UPDATED_MILLIS);

    let decision = gate.validate(&mut record, None).await.expect("valid update");
    assert_eq!(decision, Decision::ProceedNormally);
}

#[tokio::test]
async fn strict_stale_key_rejected() {
    let (_store, gate) = memory_gate(Some("STRICT"), false);
    let mut record = update_with_key("999");

    let err = gate.validate(&mut record, None).await.unwrap_err();
    assert!(matches!(
        err,
        GateError::Version(VersionError::StaleVersionKey { ref record_id }) if record_id == NODE_ID
    ));
}

#[tokio::test]
async fn lenient_stale_key_flags_update() {
    let (_store, gate) = memory_gate(Some("LENIENT"), false);
    let mut record = update_with_key("999");

    let decision = gate.validate(&mut record, None).await.expect("lenient proceeds");
    assert_eq!(decision, Decision::ProceedWithStaleFlag);
    assert_eq!(
        record.metadata.get(NODE_UPDATE_STATUS).and_then(|v| v.as_str()),
        Some(STALE_DATA_UPDATED)
    );
    assert!(!record.metadata.contains_key(SYS_INTERNAL_LAST_UPDATED_ON));
}

#[tokio::test]
async fn blank_key_rejected_in_every_enabled_mode() {
    for mode in ["STRICT", "LENIENT"] {
        let (_store, gate) = memory_gate(Some(mode), false);
        let mut record = update_with_key("");
        let err = gate.validate(&mut record, None).await.unwrap_err();
        assert_eq!(err.code(), "BLANK_VERSION", "mode {mode}");
    }
}

#[tokio::test]
async fn disabled_mode_ignores_blank_key() {
    let (store, gate) = memory_gate(None, false);
    let mut record = update_with_key("");

    let decision = gate.validate(&mut record, None).await.expect("disabled proceeds");
    assert_eq!(decision, Decision::ProceedNormally);
    assert_eq!(store.snapshot_reads(), 0);
}

#[tokio::test]
async fn explicit_off_mode_is_disabled() {
    let (store, gate) = memory_gate(Some("OFF"), false);
    let mut record = update_with_key("anything");

    let decision = gate.validate(&mut record, None).await.expect("off proceeds");
    assert_eq!(decision, Decision::ProceedNormally);
    assert_eq!(store.snapshot_reads(), 0);
}

#[tokio::test]
async fn typo_in_mode_behaves_as_disabled() {
    let (store, gate) = memory_gate(Some("LINIENT"), false);
    let mut record = update_with_key("999");

    let decision = gate.validate(&mut record, None).await.expect("typo proceeds");
    assert_eq!(decision, Decision::ProceedNormally);
    assert!(!record.is_flagged_stale());
    assert_eq!(store.snapshot_reads(), 0);
}

#[tokio::test]
async fn definition_node_skips_check_under_strict_config() {
    let (store, gate) = memory_gate(Some("STRICT"), false);
    let mut record = Record::new(NODE_ID, OBJECT_TYPE, NodeType::DefinitionNode);

    let decision = gate.validate(&mut record, None).await.expect("definition proceeds");
    assert_eq!(decision, Decision::ProceedNormally);
    assert_eq!(store.snapshot_reads(), 0);
}

#[tokio::test]
async fn stored_version_key_takes_precedence_over_timestamp() {
    let (store, gate) = memory_gate(Some("STRICT"), false);
    store.put_snapshot(
        NODE_ID,
        StoreSnapshot::new(LAST_UPDATED_ON).with_version_key("1700000000000"),
    );

    let mut stale = update_with_key(LAST_UPDATED_MILLIS);
    assert!(gate.validate(&mut stale, None).await.is_err());

    let mut fresh = update_with_key("1700000000000");
    assert_eq!(
        gate.validate(&mut fresh, None).await.unwrap(),
        Decision::ProceedNormally
    );
}

#[tokio::test]
async fn other_object_types_keep_their_own_mode() {
    let (store, gate) = memory_gate(Some("STRICT"), false);
    store.put_snapshot("asset_1", StoreSnapshot::new(LAST_UPDATED_ON));
    let mut record = Record::new("asset_1", "Asset", NodeType::DataNode)
        .with_metadata("versionKey", "999");

    let decision = gate.validate(&mut record, None).await.unwrap();
    assert_eq!(decision, Decision::ProceedNormally);
}

#[tokio::test]
async fn repeated_validation_is_stable() {
    let (_store, gate) = memory_gate(Some("LENIENT"), false);
    let mut record = update_with_key("999");

    let first = gate.validate(&mut record, None).await.unwrap();
    let second = gate.validate(&mut record, None).await.unwrap();
    assert_eq!(first, second);
    assert!(record.is_flagged_stale());
    assert!(record.fallback_marker().is_none());
}
