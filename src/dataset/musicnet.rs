// MusicNet catalogue
// Ensemble recordings with CSV annotations, shipped as four sibling
// directories: train_data / train_labels and test_data / test_labels,
// with matching file stems across the data/label pair.

use std::path::{Path, PathBuf};

use super::{require_dir, scan_wav_pairs, validate_root, DatasetError, DatasetInfo};

pub fn build_info(root: &Path) -> Result<DatasetInfo, DatasetError> {
    validate_root(root)?;

    let (train_wavs, train_labels) = split_lists(root, "train")?;
    let (test_wavs, test_labels) = split_lists(root, "test")?;

    Ok(DatasetInfo {
        base_path: root.to_path_buf(),
        train_wavs,
        train_labels,
        test_wavs,
        test_labels,
        label_ext: "csv",
    })
}

fn split_lists(root: &Path, split: &str) -> Result<(Vec<PathBuf>, Vec<PathBuf>), DatasetError> {
    let data_dir = require_dir(root, &format!("{split}_data"))?;
    require_dir(root, &format!("{split}_labels"))?;

    let (wavs, siblings) = scan_wav_pairs(&data_dir, root, "csv")?;

    // Labels live in the parallel {split}_labels directory, same stems
    let labels = siblings
        .into_iter()
        .map(|p| redirect_to_labels(&p, split))
        .collect();

    Ok((wavs, labels))
}

fn redirect_to_labels(path: &Path, split: &str) -> PathBuf {
    let file_name = path.file_name().unwrap_or_default();
    PathBuf::from(format!("{split}_labels")).join(file_name)
}
