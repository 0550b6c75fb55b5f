//! User intents and the pure state transition function.
//!
//! # Invariants
//! - `reduce` never mutates its input and performs no I/O.
//! - Navigation does not check that a target model exists.
//! - `CreateModel` always consumes `next_model_id`; `CreateField` always
//!   consumes `next_field_id`, even when the target model id matches nothing.
//! - A create whose counter cannot advance (`u64::MAX`) is a no-op, so an id
//!   is never handed out twice.

use crate::model::message::{Message, MessageId};
use crate::model::page::PageState;
use crate::model::project::Dialect;
use crate::model::schema::{Field, FieldDraft, FieldId, Model, ModelDraft, ModelId};
use crate::reducer;
use crate::state::AppState;

/// One discrete state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    GoHome,
    /// Returns to the project view and clears the model selection.
    GoToProject,
    GoToModel(ModelId),
    ToggleTimestamps,
    ToggleSnake,
    ToggleSingularTableNames,
    SetDialect(Dialect),
    RenameProject(String),
    CreateModel(ModelDraft),
    DeleteModel(ModelId),
    UpdateModelName {
        model_id: ModelId,
        name: String,
    },
    CreateField {
        model_id: ModelId,
        draft: FieldDraft,
    },
    UpdateField {
        model_id: ModelId,
        field: Field,
    },
    DeleteField {
        model_id: ModelId,
        field_id: FieldId,
    },
    /// Prepends a message (newest first).
    PushMessage(Message),
    ClearMessage(MessageId),
}

impl Action {
    /// Stable label used in log lines. Carries no user text.
    pub fn label(&self) -> &'static str {
        match self {
            Self::GoHome => "go_home",
            Self::GoToProject => "go_to_project",
            Self::GoToModel(_) => "go_to_model",
            Self::ToggleTimestamps => "toggle_timestamps",
            Self::ToggleSnake => "toggle_snake",
            Self::ToggleSingularTableNames => "toggle_singular_table_names",
            Self::SetDialect(_) => "set_dialect",
            Self::RenameProject(_) => "rename_project",
            Self::CreateModel(_) => "create_model",
            Self::DeleteModel(_) => "delete_model",
            Self::UpdateModelName { .. } => "update_model_name",
            Self::CreateField { .. } => "create_field",
            Self::UpdateField { .. } => "update_field",
            Self::DeleteField { .. } => "delete_field",
            Self::PushMessage(_) => "push_message",
            Self::ClearMessage(_) => "clear_message",
        }
    }
}

/// Computes the state that follows `action`.
pub fn reduce(state: &AppState, action: &Action) -> AppState {
    let mut next = state.clone();
    match action {
        Action::GoHome => next.page_state = PageState::Home,
        Action::GoToProject => {
            next.page_state = PageState::Project;
            next.current_model_id = None;
        }
        Action::GoToModel(id) => {
            next.page_state = PageState::Model;
            next.current_model_id = Some(*id);
        }
        Action::ToggleTimestamps => next.config.timestamps = !state.config.timestamps,
        Action::ToggleSnake => next.config.snake = !state.config.snake,
        Action::ToggleSingularTableNames => {
            next.config.singular_table_names = !state.config.singular_table_names;
        }
        Action::SetDialect(dialect) => next.config.dialect = *dialect,
        Action::RenameProject(name) => next.config.name.clone_from(name),
        Action::CreateModel(draft) => {
            let Some(following) = state.next_model_id.checked_add(1) else {
                return next;
            };
            next.models.push(reducer::build_model(state.next_model_id, draft));
            next.next_model_id = following;
        }
        Action::DeleteModel(id) => next.models.retain(|model| model.id != *id),
        Action::UpdateModelName { model_id, name } => {
            next.models = map_model(&state.models, *model_id, |model| {
                reducer::update_model_name(model, name)
            });
        }
        Action::CreateField { model_id, draft } => {
            let Some(following) = state.next_field_id.checked_add(1) else {
                return next;
            };
            next.models = map_model(&state.models, *model_id, |model| {
                reducer::add_field(model, state.next_field_id, draft)
            });
            next.next_field_id = following;
        }
        Action::UpdateField { model_id, field } => {
            next.models = map_model(&state.models, *model_id, |model| {
                reducer::update_field(model, field)
            });
        }
        Action::DeleteField { model_id, field_id } => {
            next.models = map_model(&state.models, *model_id, |model| {
                reducer::remove_field(model, *field_id)
            });
        }
        Action::PushMessage(message) => next.messages.insert(0, message.clone()),
        Action::ClearMessage(id) => next.messages.retain(|message| message.id != *id),
    }
    next
}

/// Chooses the page shown once bootstrap completes.
///
/// A persisted page other than `Loading` wins; otherwise users who have left
/// the landing page before go straight to the project.
pub fn landing_page(persisted: Option<PageState>, has_left_home: bool) -> PageState {
    match persisted {
        Some(page) if page != PageState::Loading => page,
        _ if has_left_home => PageState::Project,
        _ => PageState::Home,
    }
}

fn map_model(models: &[Model], id: ModelId, f: impl Fn(&Model) -> Model) -> Vec<Model> {
    models
        .iter()
        .map(|model| if model.id == id { f(model) } else { model.clone() })
        .collect()
}
