use super::gate_harness::{
    LAST_UPDATED_ON, NODE_ID, OBJECT_TYPE, PASSPORT_KEY, gate_over, update_with_key,
};

use std::sync::Arc;

use tempfile::TempDir;
use versiongate::config::{Config, ConfigHandle};
use versiongate::store::InMemoryGraphStore;
use versiongate::versioning::{Decision, StoreSnapshot, VERSION_CHECK_MODE, hash_passport_key};

#[tokio::test]
async fn reloaded_config_toggles_passport_fallback() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("config.toml");
    let hash = hash_passport_key(PASSPORT_KEY);
    let write_config = |enabled: bool| {
        std::fs::write(
            &path,
            format!(
                "[gate]\npassport_fallback_enabled = {enabled}\n\n[passport]\nkey_hashes = [\"{hash}\"]\n"
            ),
        )
        .unwrap();
    };

    write_config(false);
    let handle = ConfigHandle::new(Config::load_from_path(&path).unwrap());

    let store = Arc::new(InMemoryGraphStore::new());
    store.set_config_value(OBJECT_TYPE, VERSION_CHECK_MODE, "STRICT");
    store.put_snapshot(NODE_ID, StoreSnapshot::new(LAST_UPDATED_ON));
    let gate = gate_over(store, handle.clone());

    let mut record = update_with_key(PASSPORT_KEY);
    assert!(gate.validate(&mut record, None).await.is_err());

    write_config(true);
    handle.reload().unwrap();

    let mut record = update_with_key(PASSPORT_KEY);
    assert_eq!(
        gate.validate(&mut record, None).await.unwrap(),
        Decision::ProceedNormally
    );
}

#[tokio::test]
async fn reloaded_key_list_revokes_and_admits_passports() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("config.toml");
    let write_keys = |key: &str| {
        std::fs::write(
            &path,
            format!(
                "[gate]\npassport_fallback_enabled = true\n\n[passport]\nkey_hashes = [\"{}\"]\n",
                hash_passport_key(key)
            ),
        )
        .unwrap();
    };

    write_keys("old-key");
    let handle = ConfigHandle::new(Config::load_from_path(&path).unwrap());

    let store = Arc::new(InMemoryGraphStore::new());
    store.set_config_value(OBJECT_TYPE, VERSION_CHECK_MODE, "STRICT");
    store.put_snapshot(NODE_ID, StoreSnapshot::new(LAST_UPDATED_ON));
    let gate = gate_over(store, handle.clone());

    let mut record = update_with_key("old-key");
    assert_eq!(
        gate.validate(&mut record, None).await.unwrap(),
        Decision::ProceedNormally
    );

    write_keys("new-key");
    handle.reload().unwrap();

    let mut revoked = update_with_key("old-key");
    let err = gate.validate(&mut revoked, None).await.unwrap_err();
    assert_eq!(err.code(), "ERR_STALE_VERSION_KEY");

    let mut admitted = update_with_key("new-key");
    assert_eq!(
        gate.validate(&mut admitted, None).await.unwrap(),
        Decision::ProceedNormally
    );
}
