//! Data preprocessing module
//!
//! Provides the record model and the two artifacts learned from the
//! training table:
//! - Missing value imputation (median / mode)
//! - Categorical label encoding with first-class fallback

mod encoder;
mod imputer;
mod record;

pub use encoder::{CategoryEncoderSet, LabelEncoder};
pub use imputer::ImputationTable;
pub use record::{FieldValue, RawRecord};
