//! Storage failures reach the log only when the policy allows it.
//!
//! Runs as its own test binary so it can install a capturing `log::Log`
//! without competing with the crate's flexi_logger setup.

use log::{Level, LevelFilter, Log, Metadata, Record};
use schemaui_core::db::open_db_in_memory;
use schemaui_core::{
    FailurePolicy, KeyValueStore, SqliteKeyValueStore, Storage, StorageError, StorageResult,
};
use std::cell::RefCell;
use std::sync::Once;

thread_local! {
    static LINES: RefCell<Vec<(Level, String)>> = const { RefCell::new(Vec::new()) };
}

/// Records lines per test thread so parallel tests do not see each other.
struct CapturingLogger;

impl Log for CapturingLogger {
    fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &Record<'_>) {
        LINES.with(|lines| {
            lines
                .borrow_mut()
                .push((record.level(), record.args().to_string()));
        });
    }

    fn flush(&self) {}
}

static LOGGER: CapturingLogger = CapturingLogger;
static INSTALL: Once = Once::new();

fn capture<F: FnOnce()>(run: F) -> Vec<(Level, String)> {
    INSTALL.call_once(|| {
        log::set_logger(&LOGGER).unwrap();
        log::set_max_level(LevelFilter::Trace);
    });
    LINES.with(|lines| lines.borrow_mut().clear());
    run();
    LINES.with(|lines| lines.borrow_mut().drain(..).collect())
}

fn storage_lines(lines: &[(Level, String)]) -> Vec<&(Level, String)> {
    lines
        .iter()
        .filter(|(_, line)| line.contains("module=storage"))
        .collect()
}

struct UnreachableStore;

impl KeyValueStore for UnreachableStore {
    fn read(&self, _key: &str) -> StorageResult<Option<String>> {
        Err(StorageError::Backend("preferences unavailable".to_string()))
    }

    fn write(&self, _key: &str, _value: &str) -> StorageResult<()> {
        Err(StorageError::Backend("preferences unavailable".to_string()))
    }

    fn remove(&self, _key: &str) -> StorageResult<()> {
        Err(StorageError::Backend("preferences unavailable".to_string()))
    }
}

fn exercise(storage: &Storage<'_, impl KeyValueStore>) {
    assert!(storage.load().is_empty());
    assert_eq!(storage.get("hasLeftHome"), None);
    storage.save(&serde_json::json!({ "pageState": "HOME" }));
    storage.put("hasLeftHome", true);
    storage.reset();
}

#[test]
fn silent_policy_keeps_every_storage_failure_out_of_the_log() {
    let lines = capture(|| {
        exercise(&Storage::new(&UnreachableStore, "SUI_FLAGS", FailurePolicy::Silent));
    });

    assert!(storage_lines(&lines).is_empty(), "{lines:?}");
}

#[test]
fn log_policy_warns_on_read_and_write_failures() {
    let lines = capture(|| {
        exercise(&Storage::new(&UnreachableStore, "SUI_FLAGS", FailurePolicy::Log));
    });
    let storage = storage_lines(&lines);

    assert!(storage.iter().all(|(level, _)| *level == Level::Warn));
    for event in ["event=storage_load", "event=storage_save", "event=storage_reset"] {
        assert!(
            storage.iter().any(|(_, line)| line.contains(event)),
            "missing {event} in {lines:?}"
        );
    }
}

#[test]
fn silent_policy_hides_corrupted_documents() {
    let store = SqliteKeyValueStore::new(open_db_in_memory().unwrap());
    store.write("SUI_STATE", "{not json").unwrap();
    store.write("SUI_FLAGS", "[true]").unwrap();

    let lines = capture(|| {
        assert!(Storage::new(&store, "SUI_STATE", FailurePolicy::Silent)
            .load()
            .is_empty());
        assert!(Storage::new(&store, "SUI_FLAGS", FailurePolicy::Silent)
            .load()
            .is_empty());
    });
    assert!(storage_lines(&lines).is_empty(), "{lines:?}");

    let lines = capture(|| {
        Storage::new(&store, "SUI_STATE", FailurePolicy::Log).load();
        Storage::new(&store, "SUI_FLAGS", FailurePolicy::Log).load();
    });
    assert_eq!(storage_lines(&lines).len(), 2, "{lines:?}");
}
