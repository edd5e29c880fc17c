use std::collections::BTreeSet;

use crate::model::AntibodyRecord;

pub fn resolve_selection(
    ids: &BTreeSet<u32>,
    inventory: &[AntibodyRecord],
) -> (Vec<u32>, Vec<u32>) {
    let mut selection = Vec::with_capacity(ids.len());
    for ab in inventory {
        if ids.contains(&ab.id) && !selection.contains(&ab.id) {
            selection.push(ab.id);
        }
    }

    let missing = ids
        .iter()
        .copied()
        .filter(|id| !selection.contains(id))
        .collect();

    (selection, missing)
}
