use std::collections::BTreeSet;

use chrono::Utc;

use crate::panels::loader::resolve_selection;
use crate::panels::{LoadAudit, SavedPanel, Template};
use crate::session::{Session, SessionError};

impl Session {
    pub fn save_panel(&mut self, name: &str) -> Result<&SavedPanel, SessionError> {
        let created_by = self.require_user()?;
        let name = name.trim();
        if name.is_empty() {
            return Err(SessionError::Validation("panel name required"));
        }
        if self.saved_panels.iter().any(|p| p.name == name) {
            tracing::debug!(panel = name, "saved panel name already in use");
        }

        let panel = SavedPanel {
            id: self.next_panel_id,
            name: name.to_string(),
            antibody_ids: self.selection.iter().copied().collect(),
            created_by,
            created_at: Utc::now(),
        };
        self.next_panel_id += 1;
        tracing::info!(
            id = panel.id,
            panel = name,
            antibodies = panel.antibody_ids.len(),
            "panel saved"
        );

        self.saved_panels.push(panel);
        Ok(&self.saved_panels[self.saved_panels.len() - 1])
    }

    pub fn load_saved_panel(&mut self, id: u32) -> Result<LoadAudit, SessionError> {
        let panel = self
            .saved_panels
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| SessionError::UnknownSavedPanel(format!("#{id}")))?;
        let (source, ids) = (panel.name.clone(), panel.antibody_ids.clone());
        Ok(self.load_ids(source, &ids))
    }

    pub fn load_saved_panel_by_name(&mut self, name: &str) -> Result<LoadAudit, SessionError> {
        let panel = self
            .saved_panels
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| SessionError::UnknownSavedPanel(format!("{name:?}")))?;
        let (source, ids) = (panel.name.clone(), panel.antibody_ids.clone());
        Ok(self.load_ids(source, &ids))
    }

    pub fn save_template(&mut self) -> &Template {
        let ids = self.selection.iter().copied().collect();
        let template = Template::numbered(self.templates.len() + 1, ids);
        tracing::info!(
            template = %template.name,
            antibodies = template.antibody_ids.len(),
            "template saved"
        );
        self.templates.push(template);
        &self.templates[self.templates.len() - 1]
    }

    pub fn load_template(&mut self, key: &str) -> Result<LoadAudit, SessionError> {
        let key = key.trim();
        let by_number = key
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|idx| self.templates.get(idx));
        let template = by_number
            .or_else(|| self.templates.iter().find(|t| t.name == key))
            .ok_or_else(|| SessionError::UnknownTemplate(format!("{key:?}")))?;
        let (source, ids) = (template.name.clone(), template.antibody_ids.clone());
        Ok(self.load_ids(source, &ids))
    }

    fn load_ids(&mut self, source: String, ids: &BTreeSet<u32>) -> LoadAudit {
        let (selection, missing) = resolve_selection(ids, &self.inventory);
        if !missing.is_empty() {
            tracing::debug!(source = %source, ?missing, "ids not in inventory were dropped");
        }
        let audit = LoadAudit {
            source,
            requested: ids.len(),
            resolved: selection.len(),
            missing,
        };
        self.selection = selection;
        tracing::info!(source = %audit.source, resolved = audit.resolved, "selection loaded");
        audit
    }
}
