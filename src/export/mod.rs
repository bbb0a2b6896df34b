//! Artifact persistence
//!
//! - [`serializer`]: checksummed bincode envelope
//! - [`artifacts`]: model artifact, bundle and directory layout

pub mod artifacts;
pub mod serializer;

pub use artifacts::{ArtifactBundle, ArtifactPaths, ModelArtifact, ModelMetadata};
pub use serializer::{load_artifact, save_artifact, ArtifactEnvelope, ArtifactKind};
