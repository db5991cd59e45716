// MAPS catalogue
// Piano recordings: nine instrument/condition sets, each with a MUS directory
// of wav recordings and sibling text annotations. The seven synthesized sets
// form the train split; the two Disklavier sets are held out for testing.

use std::path::Path;

use super::{require_dir, scan_wav_pairs, validate_root, DatasetError, DatasetInfo};

const TRAIN_SETS: [&str; 7] = [
    "AkPnBcht", "AkPnBsdf", "AkPnCGdD", "AkPnStgb", "SptkBGAm", "SptkBGCl", "StbgTGd2",
];

const TEST_SETS: [&str; 2] = ["ENSTDkAm", "ENSTDkCl"];

pub fn build_info(root: &Path) -> Result<DatasetInfo, DatasetError> {
    validate_root(root)?;

    let mut train_wavs = Vec::new();
    let mut train_labels = Vec::new();
    for set in TRAIN_SETS {
        let mus = require_dir(root, set)?.join("MUS");
        let (mut wavs, mut labels) = scan_wav_pairs(&mus, root, "txt")?;
        train_wavs.append(&mut wavs);
        train_labels.append(&mut labels);
    }

    let mut test_wavs = Vec::new();
    let mut test_labels = Vec::new();
    for set in TEST_SETS {
        let mus = require_dir(root, set)?.join("MUS");
        let (mut wavs, mut labels) = scan_wav_pairs(&mus, root, "txt")?;
        test_wavs.append(&mut wavs);
        test_labels.append(&mut labels);
    }

    Ok(DatasetInfo {
        base_path: root.to_path_buf(),
        train_wavs,
        train_labels,
        test_wavs,
        test_labels,
        label_ext: "txt",
    })
}
