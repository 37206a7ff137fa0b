//! `heartrisk-core`: domain foundation for heart-disease risk inference.
//!
//! This crate contains **pure domain** primitives (no IO, no model execution):
//! patient records, the feature schema, risk tiers and field validation.

pub mod error;
pub mod record;
pub mod risk;
pub mod schema;
pub mod validation;

pub use error::{DomainError, DomainResult};
pub use record::PatientRecord;
pub use risk::RiskLevel;
pub use schema::{CANONICAL_FEATURES, FeatureSchema};
pub use validation::{
    RequiredFieldsError, ValidationReport, check_required_fields, validate_patient_record,
};
