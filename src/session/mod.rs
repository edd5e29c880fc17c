pub mod execute;
pub mod inventory;
pub mod saved;
pub mod selection;

use crate::model::{AntibodyRecord, ModelError};
use crate::panels::{SavedPanel, Template};

pub use execute::HistoryEntry;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("{0}")]
    Validation(&'static str),
    #[error("not logged in")]
    NotLoggedIn,
    #[error("no antibody with id {0} in inventory")]
    UnknownAntibody(u32),
    #[error("no saved panel {0}")]
    UnknownSavedPanel(String),
    #[error("no template {0}")]
    UnknownTemplate(String),
    #[error(transparent)]
    Model(#[from] ModelError),
}

impl SessionError {
    pub fn is_warning(&self) -> bool {
        matches!(self, SessionError::Validation(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum StockPolicy {
    /// Deduct in full; stock may go negative.
    #[default]
    Allow,
    /// Deduct in full but floor the remaining stock at zero.
    Clamp,
}

#[derive(Debug, Clone)]
pub struct Session {
    user: Option<String>,
    inventory: Vec<AntibodyRecord>,
    selection: Vec<u32>,
    saved_panels: Vec<SavedPanel>,
    history: Vec<HistoryEntry>,
    templates: Vec<Template>,
    next_panel_id: u32,
    stock_policy: StockPolicy,
}

impl Session {
    pub fn new(inventory: Vec<AntibodyRecord>, stock_policy: StockPolicy) -> Self {
        Self {
            user: None,
            inventory,
            selection: Vec::new(),
            saved_panels: Vec::new(),
            history: Vec::new(),
            templates: Vec::new(),
            next_panel_id: 1,
            stock_policy,
        }
    }

    pub fn login(&mut self, name: &str) -> Result<&str, SessionError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SessionError::Validation("name required"));
        }
        tracing::info!(user = name, "logged in");
        Ok(self.user.insert(name.to_string()).as_str())
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn inventory(&self) -> &[AntibodyRecord] {
        &self.inventory
    }

    pub fn selection(&self) -> &[u32] {
        &self.selection
    }

    pub fn saved_panels(&self) -> &[SavedPanel] {
        &self.saved_panels
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    fn require_user(&self) -> Result<String, SessionError> {
        self.user.clone().ok_or(SessionError::NotLoggedIn)
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/session/tests.rs"]
mod tests;
