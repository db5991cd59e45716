// Ensemble-family catalogue (Su, Su-10, URMP, Bach10)
// Small evaluation corpora: one directory per piece holding a mixture wav and
// a MIDI ground truth. These datasets carry no train split; everything goes
// to the test split.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{validate_root, DatasetError, DatasetInfo};

pub fn build_info(root: &Path) -> Result<DatasetInfo, DatasetError> {
    validate_root(root)?;

    // Group files by their containing directory, sorted for determinism
    let mut dirs: BTreeMap<PathBuf, (Vec<PathBuf>, Vec<PathBuf>)> = BTreeMap::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| DatasetError::Scan {
            path: root.to_path_buf(),
            source: e,
        })?;

        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let Some(parent) = path.parent() else {
            continue;
        };
        let slot = dirs.entry(parent.to_path_buf()).or_default();

        match path.extension().and_then(|e| e.to_str()) {
            Some("wav") => slot.0.push(path.to_path_buf()),
            Some("mid") | Some("midi") => slot.1.push(path.to_path_buf()),
            _ => {}
        }
    }

    let mut test_wavs = Vec::new();
    let mut test_labels = Vec::new();

    for (_, (wavs, mids)) in dirs {
        let Some(wav) = pick_mixture(&wavs) else {
            continue;
        };
        let Some(mid) = mids.first() else {
            continue;
        };

        let rel_wav = wav.strip_prefix(root).unwrap_or(wav).to_path_buf();
        let rel_mid = mid.strip_prefix(root).unwrap_or(mid).to_path_buf();
        test_wavs.push(rel_wav);
        test_labels.push(rel_mid);
    }

    Ok(DatasetInfo {
        base_path: root.to_path_buf(),
        train_wavs: Vec::new(),
        train_labels: Vec::new(),
        test_wavs,
        test_labels,
        label_ext: "mid",
    })
}

/// Prefer the URMP-style `AuMix` mixture when a piece directory also contains
/// per-instrument stems; otherwise take the first wav in sorted order.
fn pick_mixture(wavs: &[PathBuf]) -> Option<&PathBuf> {
    wavs.iter()
        .find(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("AuMix"))
        })
        .or_else(|| wavs.first())
}
