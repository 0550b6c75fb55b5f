//! Domain model for the schema designer.
//!
//! # Responsibility
//! - Define the records the controller owns: project config, models, fields,
//!   messages and page selection.
//! - Fix the serialized shape used by the persisted snapshot.
//!
//! # Invariants
//! - Wire names are camelCase (`singularTableNames`, `primaryKey`), enum tags
//!   follow the casing documented on each type.

pub mod message;
pub mod page;
pub mod project;
pub mod schema;
