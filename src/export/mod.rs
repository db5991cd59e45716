// Artifact persistence
// Serializes extracted batches as .npy tensors and records a JSON manifest
// with shapes, checksums, and per-piece frame spans for the whole run

use chrono::Utc;
use ndarray_npy::WriteNpyExt;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::feature::FeatureBatch;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Tensor serialization error: {0}")]
    Npy(#[from] ndarray_npy::WriteNpyError),

    #[error("Manifest serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Which frame rows of an artifact came from which input pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PieceRecord {
    pub wav: String,
    pub label: String,
    pub frame_start: usize,
    pub frame_end: usize,
}

/// One persisted chunk: tensor files, shapes, and content checksums
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactRecord {
    pub name: String,
    pub features_file: String,
    pub labels_file: String,
    pub feature_shape: Vec<usize>,
    pub label_shape: Vec<usize>,
    pub features_sha256: String,
    pub labels_sha256: String,
    pub pieces: Vec<PieceRecord>,
}

/// Summary of a completed run, written alongside the artifacts.
///
/// The manifest is only written after the last chunk succeeds, so an aborted
/// run is recognizable by its absence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    pub file_prefix: String,
    pub piece_per_file: usize,
    pub harmonic: bool,
    pub created_at: String,
    pub artifacts: Vec<ArtifactRecord>,
}

impl RunManifest {
    pub fn new(file_prefix: &str, piece_per_file: usize, harmonic: bool) -> Self {
        RunManifest {
            file_prefix: file_prefix.to_string(),
            piece_per_file,
            harmonic,
            created_at: Utc::now().to_rfc3339(),
            artifacts: Vec::new(),
        }
    }
}

/// Writes artifacts under one output directory
pub struct ArtifactWriter {
    save_path: PathBuf,
}

impl ArtifactWriter {
    /// Create a writer, creating the output directory if absent
    pub fn new(save_path: &Path) -> Result<Self, ExportError> {
        fs::create_dir_all(save_path)?;
        Ok(ArtifactWriter {
            save_path: save_path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.save_path
    }

    /// Persist one chunk's batch as `{name}_features.npy` and
    /// `{name}_labels.npy`, overwriting colliding files.
    ///
    /// Both tensors are serialized to memory first; the files are the only
    /// filesystem mutation, so a failed serialization leaves no partial
    /// artifact behind.
    pub fn write_artifact(
        &self,
        name: &str,
        batch: &FeatureBatch,
    ) -> Result<ArtifactRecord, ExportError> {
        let mut feature_bytes = Vec::new();
        batch.features.write_npy(&mut feature_bytes)?;
        let mut label_bytes = Vec::new();
        batch.labels.write_npy(&mut label_bytes)?;

        let features_file = format!("{name}_features.npy");
        let labels_file = format!("{name}_labels.npy");
        fs::write(self.save_path.join(&features_file), &feature_bytes)?;
        fs::write(self.save_path.join(&labels_file), &label_bytes)?;

        Ok(ArtifactRecord {
            name: name.to_string(),
            features_file,
            labels_file,
            feature_shape: batch.features.shape().to_vec(),
            label_shape: batch.labels.shape().to_vec(),
            features_sha256: sha256_hex(&feature_bytes),
            labels_sha256: sha256_hex(&label_bytes),
            pieces: batch
                .pieces
                .iter()
                .map(|piece| PieceRecord {
                    wav: piece.wav.display().to_string(),
                    label: piece.label.display().to_string(),
                    frame_start: piece.frames.start,
                    frame_end: piece.frames.end,
                })
                .collect(),
        })
    }

    /// Write the run manifest as `{prefix}_manifest.json`
    pub fn write_manifest(&self, manifest: &RunManifest) -> Result<PathBuf, ExportError> {
        let path = self
            .save_path
            .join(format!("{}_manifest.json", manifest.file_prefix));
        let json = serde_json::to_string_pretty(manifest)?;
        fs::write(&path, json)?;
        Ok(path)
    }
}

/// SHA-256 of a byte buffer as lowercase hex
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}
