pub mod loader;

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub struct SavedPanel {
    pub id: u32,
    pub name: String,
    pub antibody_ids: BTreeSet<u32>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub name: String,
    pub antibody_ids: BTreeSet<u32>,
}

impl Template {
    pub fn numbered(n: usize, antibody_ids: BTreeSet<u32>) -> Self {
        Self {
            name: format!("Template {n}"),
            antibody_ids,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadAudit {
    pub source: String,
    pub requested: usize,
    pub resolved: usize,
    pub missing: Vec<u32>,
}

#[cfg(test)]
#[path = "../../tests/src_inline/panels/tests.rs"]
mod tests;
