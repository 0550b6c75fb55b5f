//! Application state tree and its durable projection.
//!
//! # Invariants
//! - `next_model_id` / `next_field_id` are strictly greater than every id in
//!   use and never decrease.
//! - Only `PERSISTED_KEYS` reach storage; `loaded` and `messages` are
//!   session-local.

use crate::model::message::Message;
use crate::model::page::PageState;
use crate::model::project::ProjectConfig;
use crate::model::schema::{FieldId, Model, ModelId};
use log::warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Snapshot keys written to the state store.
pub const PERSISTED_KEYS: [&str; 6] = [
    "pageState",
    "nextModelId",
    "nextFieldId",
    "config",
    "models",
    "currentModelId",
];

/// Full live state owned by the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub loaded: bool,
    pub page_state: PageState,
    pub next_model_id: ModelId,
    pub next_field_id: FieldId,
    pub config: ProjectConfig,
    pub models: Vec<Model>,
    pub current_model_id: Option<ModelId>,
    /// Newest first.
    pub messages: Vec<Message>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            loaded: false,
            page_state: PageState::Loading,
            next_model_id: 1,
            next_field_id: 1,
            config: ProjectConfig::default(),
            models: Vec::new(),
            current_model_id: None,
            messages: Vec::new(),
        }
    }
}

impl AppState {
    pub fn model(&self, id: ModelId) -> Option<&Model> {
        self.models.iter().find(|model| model.id == id)
    }

    /// The model selected by `current_model_id`, if it still exists.
    pub fn current_model(&self) -> Option<&Model> {
        self.current_model_id.and_then(|id| self.model(id))
    }

    /// Durable subset of this state as a JSON object.
    pub fn persisted_snapshot(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => extract(&map, &PERSISTED_KEYS),
            _ => Map::new(),
        }
    }

    /// Merges a loaded snapshot into this state key by key.
    ///
    /// Keys outside `PERSISTED_KEYS` are ignored. A key whose value has the
    /// wrong shape is skipped and the current value kept. Id counters are
    /// then raised past every id in `models`, so a skipped or stale counter
    /// never hands out an id that is already in use.
    pub fn merge_persisted(&mut self, snapshot: &Map<String, Value>) {
        for (key, value) in snapshot {
            match key.as_str() {
                "pageState" => merge_key(key, value, &mut self.page_state),
                "nextModelId" => merge_key(key, value, &mut self.next_model_id),
                "nextFieldId" => merge_key(key, value, &mut self.next_field_id),
                "config" => merge_key(key, value, &mut self.config),
                "models" => merge_key(key, value, &mut self.models),
                "currentModelId" => merge_key(key, value, &mut self.current_model_id),
                _ => {}
            }
        }
        self.repair_id_counters();
    }

    fn repair_id_counters(&mut self) {
        let min_model_id = self
            .models
            .iter()
            .map(|model| model.id.saturating_add(1))
            .max()
            .unwrap_or(1);
        let min_field_id = self
            .models
            .iter()
            .flat_map(|model| &model.fields)
            .map(|field| field.id.saturating_add(1))
            .max()
            .unwrap_or(1);

        if self.next_model_id < min_model_id || self.next_field_id < min_field_id {
            warn!(
                "event=snapshot_merge module=state status=repaired next_model_id={} next_field_id={}",
                self.next_model_id.max(min_model_id),
                self.next_field_id.max(min_field_id)
            );
        }
        self.next_model_id = self.next_model_id.max(min_model_id);
        self.next_field_id = self.next_field_id.max(min_field_id);
    }
}

/// Returns a new map holding only `keys` that are present in `state`.
pub fn extract(state: &Map<String, Value>, keys: &[&str]) -> Map<String, Value> {
    keys.iter()
        .filter_map(|key| {
            state
                .get(*key)
                .map(|value| ((*key).to_string(), value.clone()))
        })
        .collect()
}

fn merge_key<T: DeserializeOwned>(key: &str, value: &Value, slot: &mut T) {
    match T::deserialize(value) {
        Ok(parsed) => *slot = parsed,
        Err(err) => warn!(
            "event=snapshot_merge module=state status=error key={key} error_code=invalid_shape error={err}"
        ),
    }
}
