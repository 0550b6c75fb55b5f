//! Pure model and field transformations.
//!
//! # Invariants
//! - Inputs are borrowed and never mutated; every function returns a new value.
//! - Field order is insertion order; updates keep a field in place.
//! - Operations on an unknown field id leave the field list unchanged.

use crate::model::schema::{Field, FieldDraft, FieldId, Model, ModelDraft, ModelId};

/// Builds a model with the given id and an empty field list.
pub fn build_model(id: ModelId, draft: &ModelDraft) -> Model {
    Model {
        id,
        name: draft.name.clone(),
        fields: Vec::new(),
    }
}

/// Builds a field with the given id from draft attributes.
pub fn build_field(id: FieldId, draft: &FieldDraft) -> Field {
    Field {
        id,
        name: draft.name.clone(),
        field_type: draft.field_type,
        primary_key: draft.primary_key,
        required: draft.required,
        unique: draft.unique,
    }
}

pub fn update_model_name(model: &Model, name: &str) -> Model {
    Model {
        name: name.to_string(),
        ..model.clone()
    }
}

/// Appends a new field built with `next_field_id`.
pub fn add_field(model: &Model, next_field_id: FieldId, draft: &FieldDraft) -> Model {
    let mut fields = model.fields.clone();
    fields.push(build_field(next_field_id, draft));
    Model {
        fields,
        ..model.clone()
    }
}

/// Replaces the field whose id matches `field.id`.
pub fn update_field(model: &Model, field: &Field) -> Model {
    let fields = model
        .fields
        .iter()
        .map(|existing| {
            if existing.id == field.id {
                field.clone()
            } else {
                existing.clone()
            }
        })
        .collect();
    Model {
        fields,
        ..model.clone()
    }
}

pub fn remove_field(model: &Model, field_id: FieldId) -> Model {
    let fields = model
        .fields
        .iter()
        .filter(|field| field.id != field_id)
        .cloned()
        .collect();
    Model {
        fields,
        ..model.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::{add_field, build_model, remove_field, update_field, update_model_name};
    use crate::model::schema::{FieldDraft, FieldType, ModelDraft};

    #[test]
    fn build_model_starts_without_fields() {
        let model = build_model(7, &ModelDraft::named("User"));
        assert_eq!(model.id, 7);
        assert_eq!(model.name, "User");
        assert!(model.fields.is_empty());
    }

    #[test]
    fn add_field_appends_in_insertion_order_without_touching_input() {
        let model = build_model(1, &ModelDraft::named("User"));
        let with_email = add_field(&model, 1, &FieldDraft::named("email"));
        let with_age = add_field(
            &with_email,
            2,
            &FieldDraft::named("age").with_type(FieldType::Integer),
        );

        assert!(model.fields.is_empty());
        assert_eq!(with_email.fields.len(), 1);
        let names: Vec<&str> = with_age.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["email", "age"]);
        assert_eq!(with_age.fields[1].field_type, FieldType::Integer);
    }

    #[test]
    fn update_field_replaces_matching_field_in_place() {
        let model = build_model(1, &ModelDraft::named("User"));
        let model = add_field(&model, 1, &FieldDraft::named("email"));
        let model = add_field(&model, 2, &FieldDraft::named("age"));

        let mut edited = model.fields[0].clone();
        edited.name = "mail".to_string();
        edited.unique = true;
        let updated = update_field(&model, &edited);

        assert_eq!(updated.fields[0], edited);
        assert_eq!(updated.fields[1], model.fields[1]);
    }

    #[test]
    fn update_field_with_unknown_id_is_noop() {
        let model = add_field(
            &build_model(1, &ModelDraft::named("User")),
            1,
            &FieldDraft::named("email"),
        );
        let mut stray = model.fields[0].clone();
        stray.id = 99;
        stray.name = "ghost".to_string();

        assert_eq!(update_field(&model, &stray), model);
    }

    #[test]
    fn remove_field_drops_only_the_matching_id() {
        let model = build_model(1, &ModelDraft::named("User"));
        let model = add_field(&model, 3, &FieldDraft::named("email"));
        let model = add_field(&model, 4, &FieldDraft::named("age"));

        let removed = remove_field(&model, 3);
        assert_eq!(removed.fields.len(), 1);
        assert_eq!(removed.fields[0].id, 4);
        assert_eq!(remove_field(&removed, 3), removed);
    }

    #[test]
    fn update_model_name_keeps_fields() {
        let model = add_field(
            &build_model(1, &ModelDraft::named("User")),
            1,
            &FieldDraft::named("email"),
        );
        let renamed = update_model_name(&model, "Account");
        assert_eq!(renamed.name, "Account");
        assert_eq!(renamed.fields, model.fields);
        assert_eq!(model.name, "User");
    }
}
