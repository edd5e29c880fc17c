use crate::model::{AntibodyField, AntibodyRecord};
use crate::session::{Session, SessionError};

#[derive(Debug, Clone, PartialEq)]
pub struct StockAlert {
    pub id: u32,
    pub label: String,
    pub stock_volume: f64,
    pub alert_threshold: f64,
}

impl Session {
    pub fn antibody(&self, id: u32) -> Option<&AntibodyRecord> {
        self.inventory.iter().find(|ab| ab.id == id)
    }

    fn antibody_mut(&mut self, id: u32) -> Result<&mut AntibodyRecord, SessionError> {
        self.inventory
            .iter_mut()
            .find(|ab| ab.id == id)
            .ok_or(SessionError::UnknownAntibody(id))
    }

    pub fn next_free_id(&self) -> u32 {
        let Some(max) = self.inventory.iter().map(|ab| ab.id).max() else {
            return 1;
        };
        max.checked_add(1).unwrap_or_else(|| {
            (1..u32::MAX)
                .find(|id| self.antibody(*id).is_none())
                .unwrap_or(0)
        })
    }

    pub fn add_antibody(&mut self, record: AntibodyRecord) {
        if self.antibody(record.id).is_some() {
            tracing::warn!(id = record.id, "inventory now holds a duplicate id");
        }
        tracing::info!(id = record.id, antigen = %record.antigen, "antibody added");
        self.inventory.push(record);
    }

    pub fn update_antibody(
        &mut self,
        id: u32,
        record: AntibodyRecord,
    ) -> Result<(), SessionError> {
        let new_id = record.id;
        let slot = self.antibody_mut(id)?;
        *slot = record;
        self.follow_id_change(id, new_id);
        tracing::info!(id, new_id, "antibody replaced");
        Ok(())
    }

    pub fn set_field(
        &mut self,
        id: u32,
        field: AntibodyField,
        raw: &str,
    ) -> Result<(), SessionError> {
        let ab = self.antibody_mut(id)?;
        ab.set_field(field, raw)?;
        let new_id = ab.id;
        self.follow_id_change(id, new_id);
        tracing::info!(id = new_id, field = field.name(), value = raw, "antibody edited");
        Ok(())
    }

    // A selected record stays selected when its id is edited.
    fn follow_id_change(&mut self, old_id: u32, new_id: u32) {
        if old_id == new_id {
            return;
        }
        if self.antibody(old_id).is_none() && self.is_selected(old_id) {
            if self.is_selected(new_id) {
                self.deselect(old_id);
            } else if let Some(sel) = self.selection.iter_mut().find(|s| **s == old_id) {
                *sel = new_id;
            }
        }
        if self.inventory.iter().filter(|ab| ab.id == new_id).count() > 1 {
            tracing::warn!(id = new_id, "inventory now holds a duplicate id");
        }
    }

    pub fn delete_antibody(&mut self, id: u32) -> Result<AntibodyRecord, SessionError> {
        let pos = self
            .inventory
            .iter()
            .position(|ab| ab.id == id)
            .ok_or(SessionError::UnknownAntibody(id))?;
        let removed = self.inventory.remove(pos);
        if self.antibody(id).is_none() {
            self.deselect(id);
        }
        tracing::info!(id, antigen = %removed.antigen, "antibody deleted");
        Ok(removed)
    }

    pub fn replace_inventory(&mut self, records: Vec<AntibodyRecord>) {
        self.inventory = records;
        let inventory = &self.inventory;
        self.selection
            .retain(|id| inventory.iter().any(|ab| ab.id == *id));
        tracing::info!(records = self.inventory.len(), "inventory replaced");
    }

    pub fn low_stock_alerts(&self) -> Vec<StockAlert> {
        self.inventory
            .iter()
            .filter(|ab| ab.is_below_alert())
            .map(|ab| StockAlert {
                id: ab.id,
                label: ab.label(),
                stock_volume: ab.stock_volume,
                alert_threshold: ab.alert_threshold,
            })
            .collect()
    }
}
