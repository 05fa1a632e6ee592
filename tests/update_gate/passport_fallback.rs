use super::gate_harness::{PASSPORT_KEY, memory_gate, update_with_key};

use versiongate::versioning::{Decision, SYS_INTERNAL_LAST_UPDATED_ON, timestamp};

#[tokio::test]
async fn passport_key_authorizes_strict_update() {
    let (_store, gate) = memory_gate(Some("STRICT"), true);
    let mut record = update_with_key(PASSPORT_KEY);

    let decision = gate.validate(&mut record, None).await.expect("passport accepted");
    assert_eq!(decision, Decision::ProceedNormally);

    let marker = record
        .metadata
        .get(SYS_INTERNAL_LAST_UPDATED_ON)
        .and_then(|v| v.as_str())
        .expect("marker stamped");
    assert!(timestamp::parse_millis(marker).is_ok());
    assert!(!record.is_flagged_stale());
}

#[tokio::test]
async fn passport_key_avoids_lenient_stale_flag() {
    let (_store, gate) = memory_gate(Some("LENIENT"), true);
    let mut record = update_with_key(PASSPORT_KEY);

    let decision = gate.validate(&mut record, None).await.unwrap();
    assert_eq!(decision, Decision::ProceedNormally);
    assert!(!record.is_flagged_stale());
}

#[tokio::test]
async fn wrong_passport_key_still_stale() {
    let (_store, gate) = memory_gate(Some("STRICT"), true);
    let mut record = update_with_key("passport-guess");

    let err = gate.validate(&mut record, None).await.unwrap_err();
    assert_eq!(err.code(), "ERR_STALE_VERSION_KEY");
    assert!(record.fallback_marker().is_none());
}

#[tokio::test]
async fn marker_removed_on_next_genuine_validation() {
    let (_store, gate) = memory_gate(Some("STRICT"), true);
    let mut record = update_with_key(PASSPORT_KEY);
    gate.validate(&mut record, None).await.unwrap();
    assert!(record.fallback_marker().is_some());

    record
        .metadata
        .insert("versionKey".into(), super::gate_harness::LAST_UPDATED_MILLIS.into());
    gate.validate(&mut record, None).await.unwrap();
    assert!(record.fallback_marker().is_none());
}
