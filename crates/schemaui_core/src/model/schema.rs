//! Data-model records: models (tables) and their fields (columns).
//!
//! # Invariants
//! - Model ids are unique within a project and never reused.
//! - Field ids are unique within their model; they come from one
//!   project-wide counter, so they are also unique across models.

use serde::{Deserialize, Serialize};

pub type ModelId = u64;
pub type FieldId = u64;

/// Column data type, named after the Sequelize `DataTypes` members.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FieldType {
    #[default]
    String,
    Text,
    Integer,
    Bigint,
    Float,
    Real,
    Double,
    Decimal,
    Date,
    Dateonly,
    Boolean,
    Enum,
    Array,
    Json,
    Jsonb,
    Blob,
    Uuid,
}

/// One column of a model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub id: FieldId,
    pub name: String,
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    #[serde(default)]
    pub primary_key: bool,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub unique: bool,
}

/// One table of the project. `fields` keeps insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    pub id: ModelId,
    pub name: String,
    #[serde(default)]
    pub fields: Vec<Field>,
}

impl Model {
    pub fn field(&self, id: FieldId) -> Option<&Field> {
        self.fields.iter().find(|field| field.id == id)
    }
}

/// Model attributes submitted by a view before an id is assigned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDraft {
    pub name: String,
}

impl ModelDraft {
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Field attributes submitted by a view before an id is assigned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDraft {
    pub name: String,
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    #[serde(default)]
    pub primary_key: bool,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub unique: bool,
}

impl FieldDraft {
    /// Draft with the default `STRING` type and no constraints.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_type(mut self, field_type: FieldType) -> Self {
        self.field_type = field_type;
        self
    }
}
