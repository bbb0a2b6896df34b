//! Binary artifact envelope
//!
//! Every persisted artifact is a bincode payload wrapped with magic bytes,
//! a format version, its kind and an FNV-1a checksum. Loading checks all
//! four before decoding the payload.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::error::{PodcastError, Result};

/// What an envelope carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArtifactKind {
    Model,
    Imputation,
    Encoders,
}

/// Serialized artifact wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactEnvelope {
    /// Magic bytes for format detection
    pub magic: [u8; 4],
    /// Format version
    pub format_version: u32,
    pub kind: ArtifactKind,
    /// Creation time (RFC 3339)
    pub created_at: String,
    pub payload: Vec<u8>,
    /// Checksum of `payload`
    pub checksum: u64,
}

impl ArtifactEnvelope {
    pub const MAGIC: [u8; 4] = *b"PLTM";
    pub const VERSION: u32 = 1;

    /// Wrap an encoded payload
    pub fn new(kind: ArtifactKind, payload: Vec<u8>) -> Self {
        let checksum = compute_checksum(&payload);
        Self {
            magic: Self::MAGIC,
            format_version: Self::VERSION,
            kind,
            created_at: chrono::Utc::now().to_rfc3339(),
            payload,
            checksum,
        }
    }

    pub fn verify_checksum(&self) -> bool {
        compute_checksum(&self.payload) == self.checksum
    }

    /// Check magic, version, kind and checksum; returns the failure reason
    fn validate(&self, expected: ArtifactKind) -> std::result::Result<(), String> {
        if self.magic != Self::MAGIC {
            return Err("not an artifact file (bad magic bytes)".to_string());
        }
        if self.format_version != Self::VERSION {
            return Err(format!(
                "unsupported format version {} (expected {})",
                self.format_version,
                Self::VERSION
            ));
        }
        if self.kind != expected {
            return Err(format!("expected a {:?} artifact, found {:?}", expected, self.kind));
        }
        if !self.verify_checksum() {
            return Err("checksum verification failed, file may be corrupted".to_string());
        }
        Ok(())
    }
}

/// FNV-1a hash
fn compute_checksum(data: &[u8]) -> u64 {
    const FNV_OFFSET: u64 = 14695981039346656037;
    const FNV_PRIME: u64 = 1099511628211;

    let mut hash = FNV_OFFSET;
    for byte in data {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Encode `value` into an envelope and write it to `path`
pub fn save_artifact<T: Serialize>(value: &T, kind: ArtifactKind, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let payload = bincode::serialize(value)?;
    let envelope = ArtifactEnvelope::new(kind, payload);

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(path)?);
    let bytes = bincode::serialize(&envelope)?;
    writer.write_all(&bytes)?;
    writer.flush()?;

    tracing::debug!(path = %path.display(), kind = ?kind, bytes = bytes.len(), "Saved artifact");
    Ok(())
}

/// Read and validate an envelope, then decode its payload.
///
/// Every failure is reported as [`PodcastError::ArtifactLoad`] naming `path`.
pub fn load_artifact<T: DeserializeOwned>(kind: ArtifactKind, path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| PodcastError::artifact(path, e.to_string()))?;

    let mut bytes = Vec::new();
    BufReader::new(file)
        .read_to_end(&mut bytes)
        .map_err(|e| PodcastError::artifact(path, e.to_string()))?;

    let envelope: ArtifactEnvelope = bincode::deserialize(&bytes)
        .map_err(|e| PodcastError::artifact(path, format!("undecodable envelope: {}", e)))?;
    envelope
        .validate(kind)
        .map_err(|reason| PodcastError::artifact(path, reason))?;

    bincode::deserialize(&envelope.payload)
        .map_err(|e| PodcastError::artifact(path, format!("undecodable payload: {}", e)))
}
