//! Core state logic for the schema designer.
//! This crate owns the project state tree, its reducers, and its persistence.

pub mod controller;
pub mod db;
pub mod logging;
pub mod model;
pub mod reducer;
pub mod settings;
pub mod state;
pub mod storage;

pub use controller::{
    landing_page, reduce, Action, AppController, AppView, Clock, PageView, SystemClock,
    HAS_LEFT_HOME_FLAG,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::message::{Message, MessageId, MessageKind};
pub use model::page::PageState;
pub use model::project::{Dialect, ProjectConfig};
pub use model::schema::{Field, FieldDraft, FieldId, FieldType, Model, ModelDraft, ModelId};
pub use settings::{ControllerSettings, FailurePolicy, MessageExpiry};
pub use state::{extract, AppState, PERSISTED_KEYS};
pub use storage::{KeyValueStore, SqliteKeyValueStore, Storage, StorageError, StorageResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
