use crate::model::antibody::{AntibodyRecord, StainType};

#[derive(Debug, Clone, Copy)]
struct SeedDef {
    id: u32,
    antigen: &'static str,
    clone: &'static str,
    metal: &'static str,
    concentration: f64,
    volume_per_test: f64,
    stock_volume: f64,
    alert_threshold: f64,
    stain_type: StainType,
}

const SEED_ANTIBODIES: &[SeedDef] = &[
    SeedDef {
        id: 1,
        antigen: "CD3",
        clone: "UCHT1",
        metal: "170Er",
        concentration: 0.5,
        volume_per_test: 2.0,
        stock_volume: 500.0,
        alert_threshold: 50.0,
        stain_type: StainType::Extracellular,
    },
    SeedDef {
        id: 2,
        antigen: "CD4",
        clone: "RPA-T4",
        metal: "145Nd",
        concentration: 0.5,
        volume_per_test: 2.0,
        stock_volume: 450.0,
        alert_threshold: 50.0,
        stain_type: StainType::Extracellular,
    },
    SeedDef {
        id: 3,
        antigen: "CD8",
        clone: "SK1",
        metal: "146Nd",
        concentration: 0.5,
        volume_per_test: 2.0,
        stock_volume: 35.0,
        alert_threshold: 50.0,
        stain_type: StainType::Intracellular,
    },
];

pub fn seed_inventory() -> Vec<AntibodyRecord> {
    SEED_ANTIBODIES
        .iter()
        .map(|def| AntibodyRecord {
            id: def.id,
            antigen: def.antigen.to_string(),
            clone: def.clone.to_string(),
            metal: def.metal.to_string(),
            concentration: def.concentration,
            volume_per_test: def.volume_per_test,
            stock_volume: def.stock_volume,
            alert_threshold: def.alert_threshold,
            stain_type: def.stain_type,
        })
        .collect()
}
