//! FFI use-case API for the Flutter view layer.
//!
//! # Responsibility
//! - Expose controller callbacks (navigation, config toggles, model/field
//!   CRUD, messages, reset) as sync functions.
//! - Return the render contract as JSON after every call.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - One process-wide controller serves every call, guarded by a mutex.
//! - Until `app_bootstrap` returns, navigation, config and CRUD calls are
//!   ignored and return the `LOADING` view (creates report `ok: false`);
//!   only messages apply.

use log::warn;
use schemaui_core::db::open_db;
use schemaui_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    AppController, ControllerSettings, Dialect, Field, FieldDraft, FieldType, MessageKind,
    ModelDraft, SqliteKeyValueStore,
};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

const STATE_DB_FILE_NAME: &str = "schemaui_state.sqlite3";
static STATE_DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static CONTROLLER: Mutex<Option<AppController<SqliteKeyValueStore>>> = Mutex::new(None);

/// Envelope returned by every controller call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppResponse {
    /// Whether the call reached the controller.
    pub ok: bool,
    /// Human-readable diagnostics; empty on success.
    pub message: String,
    /// Render contract (`page`, page data, `messages`, `messageTtlMs`) as
    /// JSON. Empty when `ok` is false.
    pub view_json: String,
}

impl AppResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
            view_json: String::new(),
        }
    }
}

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Returns an empty string on success and the error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Opens the state database (first call only), bootstraps, and returns the
/// current view.
///
/// Call this before any other controller function; earlier edits are
/// dropped so they cannot overwrite the stored snapshot or flags.
#[flutter_rust_bridge::frb(sync)]
pub fn app_bootstrap() -> AppResponse {
    with_controller(|controller| {
        controller.bootstrap();
        Ok(())
    })
}

/// Current view without changing state.
#[flutter_rust_bridge::frb(sync)]
pub fn app_view() -> AppResponse {
    with_controller(|_| Ok(()))
}

#[flutter_rust_bridge::frb(sync)]
pub fn go_home() -> AppResponse {
    with_controller(|controller| {
        controller.go_home();
        Ok(())
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn go_to_project() -> AppResponse {
    with_controller(|controller| {
        controller.go_to_project();
        Ok(())
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn go_to_model(model_id: u64) -> AppResponse {
    with_controller(|controller| {
        controller.go_to_model(model_id);
        Ok(())
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn toggle_timestamps() -> AppResponse {
    with_controller(|controller| {
        controller.toggle_timestamps();
        Ok(())
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn toggle_snake() -> AppResponse {
    with_controller(|controller| {
        controller.toggle_snake();
        Ok(())
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn toggle_singular_table_names() -> AppResponse {
    with_controller(|controller| {
        controller.toggle_singular_table_names();
        Ok(())
    })
}

/// `dialect`: one of `sqlite|postgres|mysql|mssql`.
#[flutter_rust_bridge::frb(sync)]
pub fn set_dialect(dialect: String) -> AppResponse {
    with_controller(|controller| {
        let dialect: Dialect = parse_label("dialect", &dialect)?;
        controller.set_dialect(dialect);
        Ok(())
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn rename_project(name: String) -> AppResponse {
    with_controller(|controller| {
        controller.rename_project(name.trim());
        Ok(())
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn create_model(name: String) -> AppResponse {
    with_controller(
        |controller| match controller.create_model(ModelDraft::named(name.trim())) {
            Some(_) => Ok(()),
            None => Err("create_model failed: not bootstrapped or model ids exhausted".to_string()),
        },
    )
}

#[flutter_rust_bridge::frb(sync)]
pub fn delete_model(model_id: u64) -> AppResponse {
    with_controller(|controller| {
        controller.delete_model(model_id);
        Ok(())
    })
}

/// Renames the model shown on the model page.
#[flutter_rust_bridge::frb(sync)]
pub fn update_model_name(name: String) -> AppResponse {
    with_controller(|controller| {
        controller.update_model_name(name.trim());
        Ok(())
    })
}

/// Adds a field to the model shown on the model page.
///
/// `field_type` uses the upper-case data type names (`STRING`, `INTEGER`, ...).
#[flutter_rust_bridge::frb(sync)]
pub fn create_field(
    name: String,
    field_type: String,
    primary_key: bool,
    required: bool,
    unique: bool,
) -> AppResponse {
    with_controller(|controller| {
        let draft = FieldDraft {
            name: name.trim().to_string(),
            field_type: parse_label::<FieldType>("field type", &field_type)?,
            primary_key,
            required,
            unique,
        };
        match controller.create_field(draft) {
            Some(_) => Ok(()),
            None => Err("create_field failed: no model selected or field ids exhausted".to_string()),
        }
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn update_field(
    field_id: u64,
    name: String,
    field_type: String,
    primary_key: bool,
    required: bool,
    unique: bool,
) -> AppResponse {
    with_controller(|controller| {
        controller.update_field(Field {
            id: field_id,
            name: name.trim().to_string(),
            field_type: parse_label("field type", &field_type)?,
            primary_key,
            required,
            unique,
        });
        Ok(())
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn delete_field(field_id: u64) -> AppResponse {
    with_controller(|controller| {
        controller.delete_field(field_id);
        Ok(())
    })
}

/// `kind`: one of `info|success|warn|error`.
#[flutter_rust_bridge::frb(sync)]
pub fn new_message(text: String, kind: String) -> AppResponse {
    with_controller(|controller| {
        let kind: MessageKind = parse_label("message kind", &kind)?;
        controller.new_message(text, kind);
        Ok(())
    })
}

/// Drops expired messages. Called from the UI frame loop.
#[flutter_rust_bridge::frb(sync)]
pub fn expire_messages() -> AppResponse {
    with_controller(|controller| {
        controller.expire_messages();
        Ok(())
    })
}

/// Clears all persisted state and bootstraps again.
#[flutter_rust_bridge::frb(sync)]
pub fn app_reset() -> AppResponse {
    with_controller(|controller| {
        controller.reset();
        Ok(())
    })
}

fn with_controller(
    f: impl FnOnce(&mut AppController<SqliteKeyValueStore>) -> Result<(), String>,
) -> AppResponse {
    let mut guard = match CONTROLLER.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            warn!("event=ffi_call module=ffi status=recovered reason=poisoned_lock");
            poisoned.into_inner()
        }
    };

    if guard.is_none() {
        match open_controller() {
            Ok(controller) => *guard = Some(controller),
            Err(err) => return AppResponse::failure(err),
        }
    }
    let Some(controller) = guard.as_mut() else {
        return AppResponse::failure("controller unavailable");
    };

    if let Err(err) = f(controller) {
        return AppResponse::failure(err);
    }
    match serde_json::to_string(&controller.render()) {
        Ok(view_json) => AppResponse {
            ok: true,
            message: String::new(),
            view_json,
        },
        Err(err) => AppResponse::failure(format!("view encoding failed: {err}")),
    }
}

fn open_controller() -> Result<AppController<SqliteKeyValueStore>, String> {
    let conn =
        open_db(resolve_state_db_path()).map_err(|err| format!("state DB open failed: {err}"))?;
    Ok(AppController::new(
        SqliteKeyValueStore::new(conn),
        ControllerSettings::default(),
    ))
}

fn resolve_state_db_path() -> PathBuf {
    STATE_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("SCHEMAUI_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(STATE_DB_FILE_NAME)
        })
        .clone()
}

fn parse_label<T: serde::de::DeserializeOwned>(what: &str, raw: &str) -> Result<T, String> {
    serde_json::from_value(Value::String(raw.trim().to_string()))
        .map_err(|_| format!("unsupported {what} `{}`", raw.trim()))
}
