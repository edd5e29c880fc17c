use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::volume::calculate_volume;
use crate::session::{Session, SessionError, StockPolicy};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryAntibody {
    pub antigen: String,
    pub metal: String,
    pub volume_used: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub panel_name: String,
    pub user: String,
    pub cell_count: f64,
    pub timestamp: DateTime<Utc>,
    pub antibodies: Vec<HistoryAntibody>,
}

impl HistoryEntry {
    pub fn total_volume(&self) -> f64 {
        self.antibodies.iter().map(|a| a.volume_used).sum()
    }
}

impl Session {
    pub fn execute_panel(
        &mut self,
        name: &str,
        cell_count: f64,
    ) -> Result<HistoryEntry, SessionError> {
        let user = self.require_user()?;
        let name = name.trim();
        if name.is_empty() {
            return Err(SessionError::Validation("panel name required"));
        }
        if !cell_count.is_finite() || cell_count <= 0.0 {
            return Err(SessionError::Validation("cell count must be positive"));
        }
        if self.selection.is_empty() {
            tracing::warn!(panel = name, "executing panel with no antibodies selected");
        }

        let policy = self.stock_policy;
        let mut antibodies = Vec::with_capacity(self.selection.len());
        for &id in &self.selection {
            let Some(ab) = self.inventory.iter_mut().find(|ab| ab.id == id) else {
                tracing::debug!(id, "selected antibody no longer in inventory; skipped");
                continue;
            };

            let volume = calculate_volume(ab, cell_count);
            let was_below = ab.is_below_alert();
            ab.stock_volume -= volume;
            if ab.stock_volume < 0.0 {
                match policy {
                    StockPolicy::Allow => tracing::warn!(
                        id,
                        antigen = %ab.antigen,
                        stock = ab.stock_volume,
                        "stock overdrawn"
                    ),
                    StockPolicy::Clamp => {
                        tracing::warn!(
                            id,
                            antigen = %ab.antigen,
                            shortfall = -ab.stock_volume,
                            "stock exhausted; clamped to zero"
                        );
                        ab.stock_volume = 0.0;
                    }
                }
            }
            if !was_below && ab.is_below_alert() {
                tracing::warn!(
                    id,
                    antigen = %ab.antigen,
                    stock = ab.stock_volume,
                    threshold = ab.alert_threshold,
                    "stock below alert threshold"
                );
            }

            antibodies.push(HistoryAntibody {
                antigen: ab.antigen.clone(),
                metal: ab.metal.clone(),
                volume_used: volume,
            });
        }

        let entry = HistoryEntry {
            panel_name: name.to_string(),
            user,
            cell_count,
            timestamp: Utc::now(),
            antibodies,
        };
        self.history.insert(0, entry.clone());
        self.selection.clear();

        tracing::info!(
            panel = name,
            antibodies = entry.antibodies.len(),
            cell_count,
            "panel executed"
        );
        Ok(entry)
    }
}
