// MAESTRO catalogue
// Piano recordings with MIDI annotations. Which performance belongs to which
// split is defined by the maestro-v*.json metadata file shipped at the
// dataset root, not re-derived from the directory layout.

use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use super::{validate_root, DatasetError, DatasetInfo};

#[derive(Debug, Deserialize)]
struct MaestroRecord {
    split: String,
    audio_filename: String,
    midi_filename: String,
}

pub fn build_info(root: &Path) -> Result<DatasetInfo, DatasetError> {
    validate_root(root)?;

    let metadata_path = find_metadata(root)?;
    let file = File::open(&metadata_path).map_err(|e| DatasetError::InvalidDatasetPath {
        path: metadata_path.clone(),
        reason: e.to_string(),
    })?;

    let records: Vec<MaestroRecord> =
        serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            DatasetError::InvalidDatasetPath {
                path: metadata_path.clone(),
                reason: format!("malformed metadata: {e}"),
            }
        })?;

    let mut info = DatasetInfo {
        base_path: root.to_path_buf(),
        train_wavs: Vec::new(),
        train_labels: Vec::new(),
        test_wavs: Vec::new(),
        test_labels: Vec::new(),
        label_ext: "mid",
    };

    // Metadata order is kept as-is; it is stable across reads of one file
    for record in records {
        match record.split.as_str() {
            "train" => {
                info.train_wavs.push(PathBuf::from(record.audio_filename));
                info.train_labels.push(PathBuf::from(record.midi_filename));
            }
            "test" => {
                info.test_wavs.push(PathBuf::from(record.audio_filename));
                info.test_labels.push(PathBuf::from(record.midi_filename));
            }
            // The validation split is not consumed by this pipeline
            _ => {}
        }
    }

    Ok(info)
}

/// Locate the `maestro-v*.json` metadata file at the dataset root
fn find_metadata(root: &Path) -> Result<PathBuf, DatasetError> {
    let mut candidates: Vec<PathBuf> = std::fs::read_dir(root)
        .map_err(|e| DatasetError::InvalidDatasetPath {
            path: root.to_path_buf(),
            reason: e.to_string(),
        })?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("maestro-v") && n.ends_with(".json"))
        })
        .collect();

    candidates.sort();

    candidates
        .into_iter()
        .next()
        .ok_or_else(|| DatasetError::InvalidDatasetPath {
            path: root.to_path_buf(),
            reason: "no maestro-v*.json metadata file found".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const METADATA: &str = r#"[
        {"split": "train", "audio_filename": "2017/a.wav", "midi_filename": "2017/a.midi",
         "canonical_composer": "x", "duration": 1.0},
        {"split": "validation", "audio_filename": "2017/b.wav", "midi_filename": "2017/b.midi",
         "canonical_composer": "x", "duration": 1.0},
        {"split": "test", "audio_filename": "2018/c.wav", "midi_filename": "2018/c.midi",
         "canonical_composer": "x", "duration": 1.0}
    ]"#;

    #[test]
    fn test_build_info_from_metadata() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("maestro-v2.0.0.json"), METADATA).unwrap();

        let info = build_info(temp_dir.path()).unwrap();

        assert_eq!(info.train_wavs, vec![PathBuf::from("2017/a.wav")]);
        assert_eq!(info.train_labels, vec![PathBuf::from("2017/a.midi")]);
        assert_eq!(info.test_wavs, vec![PathBuf::from("2018/c.wav")]);
        assert_eq!(info.test_labels, vec![PathBuf::from("2018/c.midi")]);
        assert_eq!(info.label_ext, "mid");
    }

    #[test]
    fn test_build_info_validation_split_excluded() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("maestro-v1.0.0.json"), METADATA).unwrap();

        let info = build_info(temp_dir.path()).unwrap();
        let all: Vec<_> = info.train_wavs.iter().chain(&info.test_wavs).collect();
        assert!(!all.iter().any(|p| p.ends_with("b.wav")));
    }

    #[test]
    fn test_build_info_missing_metadata() {
        let temp_dir = TempDir::new().unwrap();

        let result = build_info(temp_dir.path());
        assert!(matches!(
            result,
            Err(DatasetError::InvalidDatasetPath { .. })
        ));
    }

    #[test]
    fn test_build_info_malformed_metadata() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("maestro-v3.0.0.json"), "{not json").unwrap();

        let result = build_info(temp_dir.path());
        assert!(matches!(
            result,
            Err(DatasetError::InvalidDatasetPath { .. })
        ));
    }
}
