//! Feature engineering module
//!
//! Derived episode features and the transformer shared by the training
//! pipeline and the inference service.

pub mod derived;
mod transformer;

pub use derived::DerivedFeatures;
pub use transformer::{
    EngineeredRecord, FeatureMatrix, FeatureTransformer, TransformMode, TransformReport,
};
