pub mod antibody;
pub mod seed;
pub mod volume;

pub use antibody::{AntibodyField, AntibodyRecord, StainType};

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("unknown inventory column: {0}")]
    UnknownField(String),
    #[error("invalid value for {field}: {value:?}")]
    InvalidValue { field: &'static str, value: String },
}
