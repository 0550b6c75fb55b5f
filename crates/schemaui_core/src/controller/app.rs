//! Application controller: owns the state tree and its side effects.
//!
//! # Responsibility
//! - Bootstrap live state from the snapshot and flag stores.
//! - Apply actions through `reduce` and run the post-update hook
//!   (flag write on leaving HOME, snapshot persistence).
//! - Arm and fire message deadlines.
//! - Hand views a read-only `AppView`.
//!
//! # Invariants
//! - Nothing is persisted before bootstrap completes.
//! - No method returns a storage error; see `Storage`.

use super::action::{landing_page, reduce, Action};
use super::clock::{Clock, SystemClock};
use super::expiry::MessageTimers;
use crate::model::message::{Message, MessageId, MessageKind};
use crate::model::page::PageState;
use crate::model::project::{Dialect, ProjectConfig};
use crate::model::schema::{Field, FieldDraft, FieldId, Model, ModelDraft, ModelId};
use crate::settings::ControllerSettings;
use crate::state::AppState;
use crate::storage::{KeyValueStore, Storage};
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Flag recording that the user has navigated away from the landing page.
pub const HAS_LEFT_HOME_FLAG: &str = "hasLeftHome";

/// The page-specific part of the render contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "page", rename_all = "UPPERCASE")]
pub enum PageView<'a> {
    Loading,
    Home,
    Project {
        config: &'a ProjectConfig,
        models: &'a [Model],
    },
    /// `model` is `None` when the selected id no longer exists.
    Model {
        model: Option<&'a Model>,
        models: &'a [Model],
        config: &'a ProjectConfig,
    },
}

/// Everything a view layer needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppView<'a> {
    #[serde(flatten)]
    pub page: PageView<'a>,
    pub messages: &'a [Message],
    pub message_ttl_ms: u64,
}

/// Single owner of the live application state.
pub struct AppController<S: KeyValueStore, C: Clock = SystemClock> {
    store: S,
    clock: C,
    settings: ControllerSettings,
    state: AppState,
    timers: MessageTimers,
}

impl<S: KeyValueStore> AppController<S> {
    /// Creates a controller in the `Loading` state using wall-clock time.
    pub fn new(store: S, settings: ControllerSettings) -> Self {
        Self::with_clock(store, SystemClock::new(), settings)
    }
}

impl<S: KeyValueStore, C: Clock> AppController<S, C> {
    pub fn with_clock(store: S, clock: C, settings: ControllerSettings) -> Self {
        Self {
            store,
            clock,
            settings,
            state: AppState::default(),
            timers: MessageTimers::default(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Loads persisted state and flags, then merges them in one update.
    ///
    /// Runs once; later calls return the current page unchanged.
    pub fn bootstrap(&mut self) -> PageState {
        if self.state.loaded {
            debug!("event=bootstrap module=controller status=skipped reason=already_loaded");
            return self.state.page_state;
        }

        let snapshot = self.state_storage().load();
        let has_left_home = self
            .flags_storage()
            .get(HAS_LEFT_HOME_FLAG)
            .and_then(|value| value.as_bool())
            .unwrap_or(false);
        let persisted_page = snapshot
            .get("pageState")
            .and_then(|value| PageState::deserialize(value).ok());
        let page = landing_page(persisted_page, has_left_home);

        let mut next = self.state.clone();
        next.merge_persisted(&snapshot);
        next.page_state = page;
        next.loaded = true;
        self.commit(next);

        info!(
            "event=bootstrap module=controller status=ok landing_page={} models={} has_left_home={}",
            page.label(),
            self.state.models.len(),
            has_left_home
        );
        page
    }

    /// Applies one action and runs the post-update hook.
    ///
    /// Until bootstrap completes only message actions apply; anything else
    /// would race the persisted state and flags that bootstrap reads.
    pub fn dispatch(&mut self, action: Action) {
        if !self.state.loaded
            && !matches!(action, Action::PushMessage(_) | Action::ClearMessage(_))
        {
            debug!(
                "event=dispatch module=controller action={} status=skipped reason=not_loaded",
                action.label()
            );
            return;
        }
        debug!(
            "event=dispatch module=controller action={} page={}",
            action.label(),
            self.state.page_state.label()
        );
        let next = reduce(&self.state, &action);
        self.commit(next);
    }

    /// Shows a message and arms its deadline.
    pub fn new_message(&mut self, text: impl Into<String>, kind: MessageKind) -> MessageId {
        let message = Message::new(text, kind);
        let id = message.id;
        let deadline = self
            .clock
            .now_ms()
            .saturating_add(self.settings.message_ttl_ms);
        self.timers.arm(id, deadline, self.settings.message_expiry);
        self.dispatch(Action::PushMessage(message));
        id
    }

    /// Removes every message whose deadline has passed. Returns how many
    /// were removed.
    pub fn expire_messages(&mut self) -> usize {
        let due = self.timers.take_due(self.clock.now_ms());
        if due.is_empty() {
            return 0;
        }

        let next = due.iter().fold(self.state.clone(), |state, id| {
            reduce(&state, &Action::ClearMessage(*id))
        });
        self.commit(next);
        due.len()
    }

    /// Clears both durable stores and bootstraps again from scratch.
    pub fn reset(&mut self) -> PageState {
        self.flags_storage().reset();
        self.state_storage().reset();
        self.timers.clear();
        self.state = AppState::default();
        info!("event=reset module=controller status=ok");
        self.bootstrap()
    }

    /// Read-only projection for the view layer.
    pub fn render(&self) -> AppView<'_> {
        let state = &self.state;
        let page = match state.page_state {
            PageState::Loading => PageView::Loading,
            PageState::Home => PageView::Home,
            PageState::Project => PageView::Project {
                config: &state.config,
                models: &state.models,
            },
            PageState::Model => PageView::Model {
                model: state.current_model(),
                models: &state.models,
                config: &state.config,
            },
        };
        AppView {
            page,
            messages: &state.messages,
            message_ttl_ms: self.settings.message_ttl_ms,
        }
    }

    pub fn go_home(&mut self) {
        self.dispatch(Action::GoHome);
    }

    pub fn go_to_project(&mut self) {
        self.dispatch(Action::GoToProject);
    }

    pub fn go_to_model(&mut self, id: ModelId) {
        self.dispatch(Action::GoToModel(id));
    }

    pub fn toggle_timestamps(&mut self) {
        self.dispatch(Action::ToggleTimestamps);
    }

    pub fn toggle_snake(&mut self) {
        self.dispatch(Action::ToggleSnake);
    }

    pub fn toggle_singular_table_names(&mut self) {
        self.dispatch(Action::ToggleSingularTableNames);
    }

    pub fn set_dialect(&mut self, dialect: Dialect) {
        self.dispatch(Action::SetDialect(dialect));
    }

    pub fn rename_project(&mut self, name: impl Into<String>) {
        self.dispatch(Action::RenameProject(name.into()));
    }

    /// Creates a model and returns its id, or `None` when nothing was
    /// created (not loaded yet, or the id counter is exhausted).
    pub fn create_model(&mut self, draft: ModelDraft) -> Option<ModelId> {
        let id = self.state.next_model_id;
        self.dispatch(Action::CreateModel(draft));
        (self.state.next_model_id != id).then_some(id)
    }

    pub fn delete_model(&mut self, id: ModelId) {
        self.dispatch(Action::DeleteModel(id));
    }

    /// Renames the currently selected model.
    pub fn update_model_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.with_current_model("update_model_name", |model_id| Action::UpdateModelName {
            model_id,
            name,
        });
    }

    /// Adds a field to the currently selected model and returns its id.
    ///
    /// Returns `None` without consuming an id when no model is selected.
    pub fn create_field(&mut self, draft: FieldDraft) -> Option<FieldId> {
        let id = self.state.next_field_id;
        self.with_current_model("create_field", |model_id| Action::CreateField {
            model_id,
            draft,
        });
        (self.state.next_field_id != id).then_some(id)
    }

    pub fn update_field(&mut self, field: Field) {
        self.with_current_model("update_field", |model_id| Action::UpdateField {
            model_id,
            field,
        });
    }

    pub fn delete_field(&mut self, field_id: FieldId) {
        self.with_current_model("delete_field", |model_id| Action::DeleteField {
            model_id,
            field_id,
        });
    }

    fn with_current_model(
        &mut self,
        operation: &'static str,
        build: impl FnOnce(ModelId) -> Action,
    ) -> bool {
        match self.state.current_model_id {
            Some(model_id) => {
                self.dispatch(build(model_id));
                true
            }
            None => {
                debug!(
                    "event=dispatch module=controller action={operation} status=skipped reason=no_current_model"
                );
                false
            }
        }
    }

    /// Swaps in `next` and runs the write-after-mutation hook.
    fn commit(&mut self, next: AppState) {
        let previous_page = self.state.page_state;
        self.state = next;

        if previous_page == PageState::Home && self.state.page_state != PageState::Home {
            self.flags_storage().put(HAS_LEFT_HOME_FLAG, true);
        }
        if self.state.loaded {
            self.state_storage().save(&self.state.persisted_snapshot());
        }
    }

    fn state_storage(&self) -> Storage<'_, S> {
        Storage::new(
            &self.store,
            &self.settings.state_key,
            self.settings.storage_failures,
        )
    }

    fn flags_storage(&self) -> Storage<'_, S> {
        Storage::new(
            &self.store,
            &self.settings.flags_key,
            self.settings.storage_failures,
        )
    }
}
