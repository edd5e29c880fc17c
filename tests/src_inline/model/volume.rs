use super::*;
use crate::model::seed::seed_inventory;

fn antibody(volume_per_test: f64, stain_type: StainType) -> AntibodyRecord {
    let mut ab = seed_inventory()[0].clone();
    ab.volume_per_test = volume_per_test;
    ab.stain_type = stain_type;
    ab
}

#[test]
fn test_extracellular_scales_linearly() {
    for &(vpt, cells) in &[(2.0, 4.0), (2.0, 8.0), (1.5, 1.0), (3.0, 0.1)] {
        let ab = antibody(vpt, StainType::Extracellular);
        let expected = vpt * cells / 4.0;
        assert!((calculate_volume(&ab, cells) - expected).abs() < 1e-12);
    }
}

#[test]
fn test_intracellular_applies_dilution() {
    for &(vpt, cells) in &[(2.0, 4.0), (2.0, 8.0), (5.0, 2.0)] {
        let ab = antibody(vpt, StainType::Intracellular);
        let expected = vpt * 0.2 * cells / 4.0;
        assert!((calculate_volume(&ab, cells) - expected).abs() < 1e-12);
    }
}

#[test]
fn test_reference_cell_count_returns_volume_per_test() {
    let ab = antibody(2.0, StainType::Extracellular);
    assert_eq!(calculate_volume(&ab, REFERENCE_CELLS_MILLIONS), 2.0);
}

#[test]
fn test_non_positive_cell_count_is_not_rejected() {
    let ab = antibody(2.0, StainType::Extracellular);
    assert_eq!(calculate_volume(&ab, 0.0), 0.0);
    assert!(calculate_volume(&ab, -4.0) < 0.0);
}
