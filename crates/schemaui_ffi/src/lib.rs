//! Flutter bridge for the schema designer core.

pub mod api;
