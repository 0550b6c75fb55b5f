//! Top-level page selection.

use serde::{Deserialize, Serialize};

/// Which top-level view is active.
///
/// `Loading` is the only initial state and is never re-entered except by
/// a reset. Serialized in uppercase to keep the persisted snapshot stable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PageState {
    #[default]
    Loading,
    Home,
    Project,
    Model,
}

impl PageState {
    /// Stable label used in log lines.
    pub fn label(self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Home => "home",
            Self::Project => "project",
            Self::Model => "model",
        }
    }
}
