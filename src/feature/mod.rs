// Feature extraction module
// Turns one chunk of (audio, label) pairs into an in-memory batch of aligned
// feature and label tensors, ready for serialization

pub mod extractors;
pub mod spectrum;

use ndarray::{Array2, Array3};
use std::ops::Range;
use std::path::PathBuf;
use thiserror::Error;

use crate::audio::AudioError;
use crate::chunk::Chunk;
use crate::label::LabelError;

pub use extractors::{
    EnsembleExtractor, MaestroExtractor, MapsExtractor, MusicNetExtractor, RhythmExtractor,
};

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("pair {pair_index} ({wav}): {source}")]
    Audio {
        pair_index: usize,
        wav: PathBuf,
        source: AudioError,
    },

    #[error("pair {pair_index} ({label}): {source}")]
    Label {
        pair_index: usize,
        label: PathBuf,
        source: LabelError,
    },
}

impl ExtractError {
    /// Index of the failing pair within its chunk
    pub fn pair_index(&self) -> usize {
        match self {
            ExtractError::Audio { pair_index, .. } => *pair_index,
            ExtractError::Label { pair_index, .. } => *pair_index,
        }
    }
}

/// Which frame rows of a batch came from which input pair
#[derive(Debug, Clone)]
pub struct PieceSpan {
    pub wav: PathBuf,
    pub label: PathBuf,
    pub frames: Range<usize>,
}

/// One chunk's extracted tensors.
///
/// Features are `[frames, bins, channels]` (one channel without harmonic
/// stacking, one per harmonic multiple with it); labels are `[frames, 88]`.
/// Rows of both tensors correspond one-to-one, pieces concatenated in chunk
/// order along the frame axis.
#[derive(Debug)]
pub struct FeatureBatch {
    pub features: Array3<f32>,
    pub labels: Array2<f32>,
    pub pieces: Vec<PieceSpan>,
}

impl FeatureBatch {
    pub fn frame_count(&self) -> usize {
        self.features.shape()[0]
    }
}

/// Dataset-family feature extraction strategy.
///
/// Implementations read every pair in the chunk, compute spectral features,
/// parse and rasterize labels, and return the assembled batch. A failure on
/// any single pair aborts the whole chunk; no partial batch is returned.
pub trait FeatureExtractor {
    fn extract(
        &self,
        chunk: &Chunk<'_>,
        label_ext: &str,
        harmonic: bool,
    ) -> Result<FeatureBatch, ExtractError>;
}
