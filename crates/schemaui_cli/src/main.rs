//! CLI smoke entry point.
//!
//! Bootstraps a controller over the given state database (in-memory when no
//! path is passed) and prints what the UI would land on.

use schemaui_core::db::{open_db, open_db_in_memory};
use schemaui_core::{AppController, ControllerSettings, SqliteKeyValueStore};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("schemaui_core ping={}", schemaui_core::ping());
    println!("schemaui_core version={}", schemaui_core::core_version());

    let opened = match std::env::args().nth(1) {
        Some(path) => open_db(path),
        None => open_db_in_memory(),
    };
    let conn = match opened {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("schemaui_cli failed to open state database: {err}");
            return ExitCode::FAILURE;
        }
    };

    let mut controller =
        AppController::new(SqliteKeyValueStore::new(conn), ControllerSettings::default());
    let page = controller.bootstrap();
    let state = controller.state();
    println!("landing_page={}", page.label());
    println!("project={}", state.config.name);
    println!("models={}", state.models.len());
    ExitCode::SUCCESS
}
