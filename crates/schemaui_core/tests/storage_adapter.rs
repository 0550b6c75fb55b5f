use schemaui_core::db::open_db_in_memory;
use schemaui_core::{
    AppState, FailurePolicy, KeyValueStore, ModelDraft, SqliteKeyValueStore, Storage,
    StorageError, StorageResult,
};
use serde_json::json;

fn store() -> SqliteKeyValueStore {
    SqliteKeyValueStore::new(open_db_in_memory().unwrap())
}

/// Non-SQLite store on an unavailable device; every call fails.
struct BrokenStore;

impl KeyValueStore for BrokenStore {
    fn read(&self, _key: &str) -> StorageResult<Option<String>> {
        Err(StorageError::Backend("disk unavailable".to_string()))
    }

    fn write(&self, _key: &str, _value: &str) -> StorageResult<()> {
        Err(StorageError::Backend("disk full".to_string()))
    }

    fn remove(&self, _key: &str) -> StorageResult<()> {
        Err(StorageError::Backend("disk unavailable".to_string()))
    }
}

#[test]
fn load_returns_empty_map_when_nothing_is_stored() {
    let store = store();
    let storage = Storage::new(&store, "SUI_STATE", FailurePolicy::Log);
    assert!(storage.load().is_empty());
}

#[test]
fn load_returns_empty_map_for_corrupted_json() {
    let store = store();
    store.write("SUI_STATE", "{not json").unwrap();
    let storage = Storage::new(&store, "SUI_STATE", FailurePolicy::Log);
    assert!(storage.load().is_empty());
}

#[test]
fn snapshot_round_trip_reproduces_persisted_values() {
    let store = store();
    let storage = Storage::new(&store, "SUI_STATE", FailurePolicy::Log);

    let mut state = AppState::default();
    state.models.push(schemaui_core::reducer::build_model(
        1,
        &ModelDraft::named("User"),
    ));
    state.next_model_id = 2;
    state.current_model_id = Some(1);
    state.config.snake = true;

    let snapshot = state.persisted_snapshot();
    storage.save(&snapshot);
    let loaded = storage.load();
    assert_eq!(loaded, snapshot);

    let mut restored = AppState::default();
    restored.merge_persisted(&loaded);
    assert_eq!(restored.models, state.models);
    assert_eq!(restored.next_model_id, 2);
    assert_eq!(restored.current_model_id, Some(1));
    assert_eq!(restored.config, state.config);
}

#[test]
fn latest_save_wins() {
    let store = store();
    let storage = Storage::new(&store, "SUI_STATE", FailurePolicy::Log);
    storage.save(&json!({ "nextModelId": 2 }));
    storage.save(&json!({ "nextModelId": 3 }));
    assert_eq!(storage.get("nextModelId"), Some(json!(3)));
}

#[test]
fn flags_put_and_get() {
    let store = store();
    let flags = Storage::new(&store, "SUI_FLAGS", FailurePolicy::Log);

    assert_eq!(flags.get("hasLeftHome"), None);
    flags.put("hasLeftHome", true);
    assert_eq!(flags.get("hasLeftHome"), Some(json!(true)));
}

#[test]
fn reset_clears_only_its_own_key() {
    let store = store();
    let state = Storage::new(&store, "SUI_STATE", FailurePolicy::Log);
    let flags = Storage::new(&store, "SUI_FLAGS", FailurePolicy::Log);
    state.save(&json!({ "pageState": "PROJECT" }));
    flags.put("hasLeftHome", true);

    state.reset();

    assert!(state.load().is_empty());
    assert_eq!(flags.get("hasLeftHome"), Some(json!(true)));
}

#[test]
fn backend_failures_are_absorbed_under_both_policies() {
    for policy in [FailurePolicy::Log, FailurePolicy::Silent] {
        let storage = Storage::new(&BrokenStore, "SUI_STATE", policy);
        storage.save(&json!({ "pageState": "HOME" }));
        storage.put("hasLeftHome", true);
        storage.reset();
        assert!(storage.load().is_empty());
        assert_eq!(storage.get("hasLeftHome"), None);
    }
}
