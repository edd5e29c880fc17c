use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::model::ModelError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum StainType {
    Extracellular,
    Intracellular,
}

impl StainType {
    pub fn as_str(self) -> &'static str {
        match self {
            StainType::Extracellular => "Extracellular",
            StainType::Intracellular => "Intracellular",
        }
    }
}

impl fmt::Display for StainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StainType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "extracellular" | "ec" => Ok(StainType::Extracellular),
            "intracellular" | "ic" => Ok(StainType::Intracellular),
            _ => Err(ModelError::InvalidValue {
                field: AntibodyField::StainType.name(),
                value: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for StainType {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AntibodyRecord {
    pub id: u32,
    pub antigen: String,
    pub clone: String,
    pub metal: String,
    pub concentration: f64,
    pub volume_per_test: f64,
    pub stock_volume: f64,
    pub alert_threshold: f64,
    pub stain_type: StainType,
}

impl AntibodyRecord {
    pub fn label(&self) -> String {
        format!("{} ({})", self.antigen, self.metal)
    }

    pub fn matches_search(&self, query: &str) -> bool {
        let q = query.trim().to_lowercase();
        self.antigen.to_lowercase().contains(&q) || self.metal.to_lowercase().contains(&q)
    }

    pub fn is_below_alert(&self) -> bool {
        self.stock_volume < self.alert_threshold
    }

    pub fn set_field(&mut self, field: AntibodyField, raw: &str) -> Result<(), ModelError> {
        match field {
            AntibodyField::Id => self.id = parse_id(raw)?,
            AntibodyField::Antigen => self.antigen = raw.to_string(),
            AntibodyField::Clone => self.clone = raw.to_string(),
            AntibodyField::Metal => self.metal = raw.to_string(),
            AntibodyField::Concentration => self.concentration = parse_float(field, raw)?,
            AntibodyField::VolumePerTest => self.volume_per_test = parse_float(field, raw)?,
            AntibodyField::StockVolume => self.stock_volume = parse_float(field, raw)?,
            AntibodyField::AlertThreshold => self.alert_threshold = parse_float(field, raw)?,
            AntibodyField::StainType => self.stain_type = raw.parse()?,
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AntibodyField {
    Id,
    Antigen,
    Clone,
    Metal,
    Concentration,
    VolumePerTest,
    StockVolume,
    AlertThreshold,
    StainType,
}

const FIELD_ORDER: &[AntibodyField] = &[
    AntibodyField::Id,
    AntibodyField::Antigen,
    AntibodyField::Clone,
    AntibodyField::Metal,
    AntibodyField::Concentration,
    AntibodyField::VolumePerTest,
    AntibodyField::StockVolume,
    AntibodyField::AlertThreshold,
    AntibodyField::StainType,
];

impl AntibodyField {
    pub fn all() -> &'static [AntibodyField] {
        FIELD_ORDER
    }

    pub fn name(self) -> &'static str {
        match self {
            AntibodyField::Id => "id",
            AntibodyField::Antigen => "antigen",
            AntibodyField::Clone => "clone",
            AntibodyField::Metal => "metal",
            AntibodyField::Concentration => "concentration",
            AntibodyField::VolumePerTest => "volumePerTest",
            AntibodyField::StockVolume => "stockVolume",
            AntibodyField::AlertThreshold => "alertThreshold",
            AntibodyField::StainType => "stainType",
        }
    }
}

impl FromStr for AntibodyField {
    type Err = ModelError;

    // Accepts the camelCase column name as well as snake_case / lowercase spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();
        FIELD_ORDER
            .iter()
            .copied()
            .find(|f| f.name().to_ascii_lowercase() == key)
            .ok_or_else(|| ModelError::UnknownField(s.to_string()))
    }
}

fn parse_id(raw: &str) -> Result<u32, ModelError> {
    raw.trim().parse().map_err(|_| ModelError::InvalidValue {
        field: AntibodyField::Id.name(),
        value: raw.to_string(),
    })
}

fn parse_float(field: AntibodyField, raw: &str) -> Result<f64, ModelError> {
    raw.trim().parse().map_err(|_| ModelError::InvalidValue {
        field: field.name(),
        value: raw.to_string(),
    })
}
