use crate::model::AntibodyRecord;
use crate::session::{Session, SessionError};

impl Session {
    pub fn is_selected(&self, id: u32) -> bool {
        self.selection.contains(&id)
    }

    pub fn toggle(&mut self, id: u32) -> Result<bool, SessionError> {
        if self.is_selected(id) {
            self.deselect(id);
            Ok(false)
        } else {
            self.select(id)?;
            Ok(true)
        }
    }

    pub fn select(&mut self, id: u32) -> Result<(), SessionError> {
        if self.antibody(id).is_none() {
            return Err(SessionError::UnknownAntibody(id));
        }
        if !self.is_selected(id) {
            self.selection.push(id);
            tracing::debug!(id, "selected");
        }
        Ok(())
    }

    pub fn deselect(&mut self, id: u32) {
        if let Some(pos) = self.selection.iter().position(|&s| s == id) {
            self.selection.remove(pos);
            tracing::debug!(id, "deselected");
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn selected_records(&self) -> Vec<&AntibodyRecord> {
        self.selection
            .iter()
            .filter_map(|&id| self.antibody(id))
            .collect()
    }

    pub fn search(&self, query: &str) -> Vec<&AntibodyRecord> {
        self.inventory
            .iter()
            .filter(|ab| ab.matches_search(query))
            .collect()
    }
}
