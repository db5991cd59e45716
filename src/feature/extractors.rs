// Concrete feature extractors per dataset family
// All families share the spectral transform; they differ in label format and
// in how note events are rasterized onto the frame grid

use ndarray::{Array2, Array3, Axis};

use super::spectrum;
use super::{ExtractError, FeatureBatch, FeatureExtractor, PieceSpan};
use crate::audio;
use crate::chunk::Chunk;
use crate::label;

/// How long a percussive hit stays active on the label grid
const RHYTHM_HIT_SECS: f64 = 0.05;

/// How label intervals map onto frames
#[derive(Debug, Clone, Copy)]
enum RasterStyle {
    /// Mark every frame from onset to offset (pitched material)
    Sustain,

    /// Mark a short fixed window after each onset (percussive material,
    /// where annotated offsets carry no information)
    OnsetWindow,
}

/// Piano recordings with MAPS-style text annotations
pub struct MapsExtractor;

/// Piano recordings with MIDI annotations
pub struct MaestroExtractor;

/// Ensemble recordings with MusicNet CSV annotations
pub struct MusicNetExtractor;

/// Ensemble mixtures with MIDI ground truth (Su, Su-10, URMP, Bach10)
pub struct EnsembleExtractor;

/// Percussive recordings with MIDI ground truth
pub struct RhythmExtractor;

impl FeatureExtractor for MapsExtractor {
    fn extract(
        &self,
        chunk: &Chunk<'_>,
        label_ext: &str,
        harmonic: bool,
    ) -> Result<FeatureBatch, ExtractError> {
        extract_pairs(chunk, label_ext, harmonic, RasterStyle::Sustain)
    }
}

impl FeatureExtractor for MaestroExtractor {
    fn extract(
        &self,
        chunk: &Chunk<'_>,
        label_ext: &str,
        harmonic: bool,
    ) -> Result<FeatureBatch, ExtractError> {
        extract_pairs(chunk, label_ext, harmonic, RasterStyle::Sustain)
    }
}

impl FeatureExtractor for MusicNetExtractor {
    fn extract(
        &self,
        chunk: &Chunk<'_>,
        label_ext: &str,
        harmonic: bool,
    ) -> Result<FeatureBatch, ExtractError> {
        extract_pairs(chunk, label_ext, harmonic, RasterStyle::Sustain)
    }
}

impl FeatureExtractor for EnsembleExtractor {
    fn extract(
        &self,
        chunk: &Chunk<'_>,
        label_ext: &str,
        harmonic: bool,
    ) -> Result<FeatureBatch, ExtractError> {
        extract_pairs(chunk, label_ext, harmonic, RasterStyle::Sustain)
    }
}

impl FeatureExtractor for RhythmExtractor {
    fn extract(
        &self,
        chunk: &Chunk<'_>,
        label_ext: &str,
        harmonic: bool,
    ) -> Result<FeatureBatch, ExtractError> {
        extract_pairs(chunk, label_ext, harmonic, RasterStyle::OnsetWindow)
    }
}

/// Shared per-chunk extraction: read, transform, rasterize, concatenate.
fn extract_pairs(
    chunk: &Chunk<'_>,
    label_ext: &str,
    harmonic: bool,
    style: RasterStyle,
) -> Result<FeatureBatch, ExtractError> {
    let channels = if harmonic {
        spectrum::HARMONICS.len()
    } else {
        1
    };

    let mut piece_features: Vec<Array3<f32>> = Vec::with_capacity(chunk.len());
    let mut piece_labels: Vec<Array2<f32>> = Vec::with_capacity(chunk.len());
    let mut pieces: Vec<PieceSpan> = Vec::with_capacity(chunk.len());
    let mut frame_cursor = 0usize;

    for (pair_index, (wav_path, label_path)) in chunk.pairs.iter().enumerate() {
        let audio = audio::load_wav(wav_path).map_err(|source| ExtractError::Audio {
            pair_index,
            wav: wav_path.clone(),
            source,
        })?;

        let mono = audio.to_mono();
        let spec = spectrum::log_spectrogram(&mono);
        let n_frames = spec.shape()[0];

        let features = if harmonic {
            spectrum::harmonic_stack(&spec)
        } else {
            spectrum::single_channel(spec)
        };

        let mut events =
            label::parse_label_file(label_path, label_ext).map_err(|source| {
                ExtractError::Label {
                    pair_index,
                    label: label_path.clone(),
                    source,
                }
            })?;

        if let RasterStyle::OnsetWindow = style {
            for event in &mut events {
                event.offset_sec = event.onset_sec + RHYTHM_HIT_SECS;
            }
        }

        let fps = spectrum::frames_per_second(audio.sample_rate);
        let labels = label::rasterize(&events, n_frames, fps);

        pieces.push(PieceSpan {
            wav: wav_path.clone(),
            label: label_path.clone(),
            frames: frame_cursor..frame_cursor + n_frames,
        });
        frame_cursor += n_frames;

        piece_features.push(features);
        piece_labels.push(labels);
    }

    let features = concat_or_empty3(&piece_features, channels);
    let labels = concat_or_empty2(&piece_labels);

    Ok(FeatureBatch {
        features,
        labels,
        pieces,
    })
}

fn concat_or_empty3(pieces: &[Array3<f32>], channels: usize) -> Array3<f32> {
    let views: Vec<_> = pieces.iter().map(|a| a.view()).collect();
    ndarray::concatenate(Axis(0), &views)
        .unwrap_or_else(|_| Array3::zeros((0, spectrum::SPECTRUM_BINS, channels)))
}

fn concat_or_empty2(pieces: &[Array2<f32>]) -> Array2<f32> {
    let views: Vec<_> = pieces.iter().map(|a| a.view()).collect();
    ndarray::concatenate(Axis(0), &views)
        .unwrap_or_else(|_| Array2::zeros((0, label::PITCH_COUNT)))
}
