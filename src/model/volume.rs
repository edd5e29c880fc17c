use crate::model::antibody::{AntibodyRecord, StainType};

pub const REFERENCE_CELLS_MILLIONS: f64 = 4.0;

pub const INTRACELLULAR_FACTOR: f64 = 0.2;

pub const MIN_CELL_COUNT_MILLIONS: f64 = 0.1;

pub const DEFAULT_CELL_COUNT_MILLIONS: f64 = 4.0;

pub fn calculate_volume(antibody: &AntibodyRecord, cell_count_millions: f64) -> f64 {
    let mut base = antibody.volume_per_test;
    if antibody.stain_type == StainType::Intracellular {
        base *= INTRACELLULAR_FACTOR;
    }
    base * (cell_count_millions / REFERENCE_CELLS_MILLIONS)
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/volume.rs"]
mod tests;
