// Dataset catalogue module
// Maps a dataset identifier and a user-supplied root to the concrete lists of
// audio/label files per split

pub mod ensemble;
pub mod maestro;
pub mod maps;
pub mod musicnet;
pub mod registry;
pub mod rhythm;

use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

pub use registry::{resolve, DatasetKind, RegistryEntry};

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Unknown dataset '{0}' (expected one of Maps, Maestro, MusicNet, Su, Su-10, URMP, Bach, Rhythm)")]
    UnknownDataset(String),

    #[error("Invalid dataset path {path}: {reason}")]
    InvalidDatasetPath { path: PathBuf, reason: String },

    #[error("Failed to scan {path}: {source}")]
    Scan {
        path: PathBuf,
        source: walkdir::Error,
    },
}

/// Which split of a dataset to extract
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Train,
    Test,
}

impl Phase {
    /// Name used for the output artifact prefix
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Train => "train",
            Phase::Test => "test",
        }
    }
}

/// Catalogue of one dataset rooted at a user-supplied path.
///
/// All file lists are relative to `base_path` and ordered; the i-th label of
/// a split annotates the i-th audio file (positional pairing by
/// construction).
#[derive(Debug, Clone)]
pub struct DatasetInfo {
    pub base_path: PathBuf,
    pub train_wavs: Vec<PathBuf>,
    pub train_labels: Vec<PathBuf>,
    pub test_wavs: Vec<PathBuf>,
    pub test_labels: Vec<PathBuf>,

    /// Extension tag identifying the label format ("txt", "csv", "mid")
    pub label_ext: &'static str,
}

impl DatasetInfo {
    /// Relative audio paths for a split
    pub fn wavs(&self, phase: Phase) -> &[PathBuf] {
        match phase {
            Phase::Train => &self.train_wavs,
            Phase::Test => &self.test_wavs,
        }
    }

    /// Relative label paths for a split
    pub fn labels(&self, phase: Phase) -> &[PathBuf] {
        match phase {
            Phase::Train => &self.train_labels,
            Phase::Test => &self.test_labels,
        }
    }
}

/// Validate that a dataset root exists and is a readable directory
pub(crate) fn validate_root(root: &Path) -> Result<(), DatasetError> {
    let meta = std::fs::metadata(root).map_err(|e| DatasetError::InvalidDatasetPath {
        path: root.to_path_buf(),
        reason: e.to_string(),
    })?;

    if !meta.is_dir() {
        return Err(DatasetError::InvalidDatasetPath {
            path: root.to_path_buf(),
            reason: "not a directory".to_string(),
        });
    }

    Ok(())
}

/// Require a layout-defining subdirectory of the dataset root
pub(crate) fn require_dir(root: &Path, name: &str) -> Result<PathBuf, DatasetError> {
    let dir = root.join(name);
    if !dir.is_dir() {
        return Err(DatasetError::InvalidDatasetPath {
            path: root.to_path_buf(),
            reason: format!("missing expected directory '{name}'"),
        });
    }
    Ok(dir)
}

/// Scan a directory for `.wav` files and derive sibling label paths.
///
/// Returns (wavs, labels) relative to `base`, sorted lexicographically so
/// repeated runs enumerate identically. Labels are the wav paths with the
/// extension replaced; existence is not checked here (extraction reports
/// missing labels per pair).
pub(crate) fn scan_wav_pairs(
    dir: &Path,
    base: &Path,
    label_ext: &str,
) -> Result<(Vec<PathBuf>, Vec<PathBuf>), DatasetError> {
    let mut wavs = Vec::new();
    let mut labels = Vec::new();

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| DatasetError::Scan {
            path: dir.to_path_buf(),
            source: e,
        })?;

        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("wav") {
            continue;
        }

        let rel = path.strip_prefix(base).unwrap_or(path).to_path_buf();
        let label = rel.with_extension(label_ext);
        wavs.push(rel);
        labels.push(label);
    }

    Ok((wavs, labels))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_validate_root_missing() {
        let result = validate_root(Path::new("/no/such/dataset"));
        assert!(matches!(
            result,
            Err(DatasetError::InvalidDatasetPath { .. })
        ));
    }

    #[test]
    fn test_validate_root_file_not_dir() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("data");
        fs::write(&file, "x").unwrap();

        let result = validate_root(&file);
        assert!(matches!(
            result,
            Err(DatasetError::InvalidDatasetPath { .. })
        ));
    }

    #[test]
    fn test_scan_wav_pairs_sorted_and_relative() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path();
        let dir = base.join("MUS");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("b.wav"), "").unwrap();
        fs::write(dir.join("a.wav"), "").unwrap();
        fs::write(dir.join("notes.txt"), "").unwrap();

        let (wavs, labels) = scan_wav_pairs(&dir, base, "txt").unwrap();

        assert_eq!(wavs, vec![PathBuf::from("MUS/a.wav"), PathBuf::from("MUS/b.wav")]);
        assert_eq!(
            labels,
            vec![PathBuf::from("MUS/a.txt"), PathBuf::from("MUS/b.txt")]
        );
    }

    #[test]
    fn test_phase_prefix_names() {
        assert_eq!(Phase::Train.as_str(), "train");
        assert_eq!(Phase::Test.as_str(), "test");
    }
}
