// Rhythm catalogue
// Percussive recordings split into train/ and test/ directories, each wav
// paired with a sibling MIDI ground truth.

use std::path::Path;

use super::{require_dir, scan_wav_pairs, validate_root, DatasetError, DatasetInfo};

pub fn build_info(root: &Path) -> Result<DatasetInfo, DatasetError> {
    validate_root(root)?;

    let train_dir = require_dir(root, "train")?;
    let test_dir = require_dir(root, "test")?;

    let (train_wavs, train_labels) = scan_wav_pairs(&train_dir, root, "mid")?;
    let (test_wavs, test_labels) = scan_wav_pairs(&test_dir, root, "mid")?;

    Ok(DatasetInfo {
        base_path: root.to_path_buf(),
        train_wavs,
        train_labels,
        test_wavs,
        test_labels,
        label_ext: "mid",
    })
}
