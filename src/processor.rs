// Run orchestration
// Drives the chunk planner and feature extractor across one split and owns
// every side effect: directory creation, artifact writes, the run manifest

use std::path::PathBuf;
use thiserror::Error;

use crate::chunk::{self, ChunkError, PairedPaths};
use crate::export::{ArtifactWriter, ExportError, RunManifest};
use crate::feature::{ExtractError, FeatureExtractor};

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("chunk {chunk_index} failed: {source}")]
    ChunkExtraction {
        chunk_index: usize,
        source: ExtractError,
    },

    #[error(transparent)]
    Chunk(#[from] ChunkError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Configuration for one extraction run, immutable once constructed
#[derive(Debug, Clone)]
pub struct ExtractionConfig {
    /// Directory the artifacts land in, created if absent
    pub save_path: PathBuf,

    /// Artifact name prefix, conventionally the phase name
    pub file_prefix: String,

    /// Number of (audio, label) pairs held in memory per chunk
    pub piece_per_file: usize,

    /// Compute harmonic-stacked feature channels
    pub harmonic: bool,
}

/// Result of a completed run
#[derive(Debug)]
pub struct ProcessSummary {
    pub artifacts_written: usize,
    pub frames_written: usize,
}

/// Drives extraction for one dataset split.
///
/// Processing is synchronous and strictly ordered: one chunk is read,
/// extracted, and committed before the next begins, so memory stays bounded
/// by `piece_per_file` regardless of dataset size.
pub struct Processor {
    pairs: Vec<PairedPaths>,
    label_ext: String,
    extractor: Box<dyn FeatureExtractor>,
    config: ExtractionConfig,
}

impl Processor {
    /// Build a processor from resolved absolute paths.
    ///
    /// `wav_paths` and `label_paths` must be equal-length and positionally
    /// paired; catalogues construct them that way.
    pub fn new(
        wav_paths: Vec<PathBuf>,
        label_paths: Vec<PathBuf>,
        label_ext: String,
        extractor: Box<dyn FeatureExtractor>,
        config: ExtractionConfig,
    ) -> Self {
        assert_eq!(
            wav_paths.len(),
            label_paths.len(),
            "audio and label lists must pair positionally"
        );

        let pairs = wav_paths.into_iter().zip(label_paths).collect();

        Processor {
            pairs,
            label_ext,
            extractor,
            config,
        }
    }

    /// Extract and persist every chunk of the split, in order.
    ///
    /// The first failing chunk aborts the run; artifacts from earlier chunks
    /// stay on disk, and the manifest is only written after the final chunk
    /// succeeds.
    pub fn process(&self) -> Result<ProcessSummary, ProcessError> {
        // Chunk-size validation precedes any filesystem mutation
        let chunks = chunk::plan(&self.pairs, self.config.piece_per_file)?;
        let writer = ArtifactWriter::new(&self.config.save_path)?;

        let total_chunks = self.pairs.len().div_ceil(self.config.piece_per_file);
        let mut manifest = RunManifest::new(
            &self.config.file_prefix,
            self.config.piece_per_file,
            self.config.harmonic,
        );
        let mut frames_written = 0usize;

        for chunk in chunks {
            log::info!(
                "Extracting chunk {}/{} ({} pairs)",
                chunk.index + 1,
                total_chunks,
                chunk.len()
            );

            // Build the whole batch in memory before any file is touched
            let batch = self
                .extractor
                .extract(&chunk, &self.label_ext, self.config.harmonic)
                .map_err(|source| ProcessError::ChunkExtraction {
                    chunk_index: chunk.index,
                    source,
                })?;

            let name = format!("{}_{}", self.config.file_prefix, chunk.index);
            let record = writer.write_artifact(&name, &batch)?;

            log::info!(
                "Wrote {} ({} frames from {} pairs)",
                record.name,
                batch.frame_count(),
                chunk.len()
            );

            frames_written += batch.frame_count();
            manifest.artifacts.push(record);
        }

        let artifacts_written = manifest.artifacts.len();
        writer.write_manifest(&manifest)?;

        Ok(ProcessSummary {
            artifacts_written,
            frames_written,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::AudioError;
    use crate::chunk::Chunk;
    use crate::export::sha256_hex;
    use crate::feature::{FeatureBatch, PieceSpan};
    use ndarray::{Array2, Array3};
    use std::fs;
    use tempfile::TempDir;

    /// Produces one frame per pair without touching the filesystem
    struct CountingExtractor;

    impl FeatureExtractor for CountingExtractor {
        fn extract(
            &self,
            chunk: &Chunk<'_>,
            _label_ext: &str,
            harmonic: bool,
        ) -> Result<FeatureBatch, ExtractError> {
            let n = chunk.len();
            let channels = if harmonic { 6 } else { 1 };
            let pieces = chunk
                .pairs
                .iter()
                .enumerate()
                .map(|(i, (wav, label))| PieceSpan {
                    wav: wav.clone(),
                    label: label.clone(),
                    frames: i..i + 1,
                })
                .collect();

            Ok(FeatureBatch {
                features: Array3::from_elem((n, 8, channels), chunk.index as f32),
                labels: Array2::zeros((n, 88)),
                pieces,
            })
        }
    }

    /// Fails whenever the chunk contains the pair with the given stem
    struct FailingExtractor {
        fail_stem: String,
    }

    impl FeatureExtractor for FailingExtractor {
        fn extract(
            &self,
            chunk: &Chunk<'_>,
            _label_ext: &str,
            _harmonic: bool,
        ) -> Result<FeatureBatch, ExtractError> {
            for (pair_index, (wav, _)) in chunk.pairs.iter().enumerate() {
                if wav.file_stem().and_then(|s| s.to_str()) == Some(self.fail_stem.as_str()) {
                    return Err(ExtractError::Audio {
                        pair_index,
                        wav: wav.clone(),
                        source: AudioError::Open {
                            path: wav.clone(),
                            source: std::io::Error::new(
                                std::io::ErrorKind::NotFound,
                                "unreadable audio",
                            ),
                        },
                    });
                }
            }
            CountingExtractor.extract(chunk, _label_ext, _harmonic)
        }
    }

    fn make_paths(n: usize) -> (Vec<PathBuf>, Vec<PathBuf>) {
        let wavs = (0..n).map(|i| PathBuf::from(format!("wav_{i}.wav"))).collect();
        let labels = (0..n).map(|i| PathBuf::from(format!("wav_{i}.txt"))).collect();
        (wavs, labels)
    }

    fn make_processor(
        n: usize,
        save_path: PathBuf,
        extractor: Box<dyn FeatureExtractor>,
    ) -> Processor {
        let (wavs, labels) = make_paths(n);
        Processor::new(
            wavs,
            labels,
            "txt".to_string(),
            extractor,
            ExtractionConfig {
                save_path,
                file_prefix: "train".to_string(),
                piece_per_file: 40,
                harmonic: false,
            },
        )
    }

    #[test]
    fn test_process_85_pairs_yields_three_artifacts() {
        let temp_dir = TempDir::new().unwrap();
        let processor = make_processor(85, temp_dir.path().into(), Box::new(CountingExtractor));

        let summary = processor.process().unwrap();

        assert_eq!(summary.artifacts_written, 3);
        for name in ["train_0", "train_1", "train_2"] {
            assert!(temp_dir.path().join(format!("{name}_features.npy")).exists());
            assert!(temp_dir.path().join(format!("{name}_labels.npy")).exists());
        }

        // Chunk sizes: 40, 40, 5 pairs (one frame per pair in the mock)
        let manifest: crate::export::RunManifest = serde_json::from_str(
            &fs::read_to_string(temp_dir.path().join("train_manifest.json")).unwrap(),
        )
        .unwrap();
        let sizes: Vec<usize> = manifest
            .artifacts
            .iter()
            .map(|a| a.feature_shape[0])
            .collect();
        assert_eq!(sizes, vec![40, 40, 5]);
    }

    #[test]
    fn test_process_empty_split() {
        let temp_dir = TempDir::new().unwrap();
        let processor = make_processor(0, temp_dir.path().into(), Box::new(CountingExtractor));

        let summary = processor.process().unwrap();

        assert_eq!(summary.artifacts_written, 0);
        assert!(!temp_dir.path().join("train_0_features.npy").exists());
    }

    #[test]
    fn test_process_halts_on_first_failing_chunk() {
        let temp_dir = TempDir::new().unwrap();
        let processor = make_processor(
            85,
            temp_dir.path().into(),
            Box::new(FailingExtractor {
                fail_stem: "wav_17".to_string(),
            }),
        );

        let err = processor.process().unwrap_err();

        match err {
            ProcessError::ChunkExtraction {
                chunk_index,
                source,
            } => {
                assert_eq!(chunk_index, 0);
                assert_eq!(source.pair_index(), 17);
            }
            other => panic!("expected ChunkExtraction, got {other:?}"),
        }

        // No artifact for the failed chunk, no later chunks attempted,
        // no manifest for the aborted run
        assert!(!temp_dir.path().join("train_0_features.npy").exists());
        assert!(!temp_dir.path().join("train_1_features.npy").exists());
        assert!(!temp_dir.path().join("train_manifest.json").exists());
    }

    #[test]
    fn test_process_failure_keeps_earlier_artifacts() {
        let temp_dir = TempDir::new().unwrap();
        // Pair 47 lives in chunk 1; chunk 0 completes first
        let processor = make_processor(
            85,
            temp_dir.path().into(),
            Box::new(FailingExtractor {
                fail_stem: "wav_47".to_string(),
            }),
        );

        let err = processor.process().unwrap_err();
        assert!(matches!(
            err,
            ProcessError::ChunkExtraction { chunk_index: 1, .. }
        ));

        assert!(temp_dir.path().join("train_0_features.npy").exists());
        assert!(!temp_dir.path().join("train_1_features.npy").exists());
        assert!(!temp_dir.path().join("train_manifest.json").exists());
    }

    #[test]
    fn test_process_invalid_chunk_size() {
        let temp_dir = TempDir::new().unwrap();
        let (wavs, labels) = make_paths(5);
        let processor = Processor::new(
            wavs,
            labels,
            "txt".to_string(),
            Box::new(CountingExtractor),
            ExtractionConfig {
                save_path: temp_dir.path().into(),
                file_prefix: "train".to_string(),
                piece_per_file: 0,
                harmonic: false,
            },
        );

        let result = processor.process();
        assert!(matches!(result, Err(ProcessError::Chunk(_))));
        assert!(!temp_dir.path().join("train_0_features.npy").exists());
    }

    #[test]
    fn test_process_is_deterministic() {
        let dir_a = TempDir::new().unwrap();
        let dir_b = TempDir::new().unwrap();

        for dir in [&dir_a, &dir_b] {
            let processor = make_processor(10, dir.path().into(), Box::new(CountingExtractor));
            processor.process().unwrap();
        }

        let bytes_a = fs::read(dir_a.path().join("train_0_features.npy")).unwrap();
        let bytes_b = fs::read(dir_b.path().join("train_0_features.npy")).unwrap();
        assert_eq!(sha256_hex(&bytes_a), sha256_hex(&bytes_b));
    }

    #[test]
    fn test_process_with_real_extractor() {
        use hound::{SampleFormat, WavSpec, WavWriter};

        let data_dir = TempDir::new().unwrap();
        let out_dir = TempDir::new().unwrap();

        let mut wavs = Vec::new();
        let mut labels = Vec::new();
        for i in 0..3 {
            let wav = data_dir.path().join(format!("piece_{i}.wav"));
            let txt = data_dir.path().join(format!("piece_{i}.txt"));

            let spec = WavSpec {
                channels: 1,
                sample_rate: 44100,
                bits_per_sample: 16,
                sample_format: SampleFormat::Int,
            };
            let mut writer = WavWriter::create(&wav, spec).unwrap();
            for t in 0..22050 {
                let v = (2.0 * std::f64::consts::PI * 261.6 * t as f64 / 44100.0).sin();
                writer.write_sample((v * 12000.0) as i16).unwrap();
            }
            writer.finalize().unwrap();
            fs::write(&txt, "OnsetTime OffsetTime MidiPitch\n0.0 0.5 60\n").unwrap();

            wavs.push(wav);
            labels.push(txt);
        }

        let processor = Processor::new(
            wavs,
            labels,
            "txt".to_string(),
            Box::new(crate::feature::MapsExtractor),
            ExtractionConfig {
                save_path: out_dir.path().into(),
                file_prefix: "train".to_string(),
                piece_per_file: 2,
                harmonic: false,
            },
        );

        let summary = processor.process().unwrap();

        assert_eq!(summary.artifacts_written, 2);
        assert!(summary.frames_written > 0);
        assert!(out_dir.path().join("train_0_features.npy").exists());
        assert!(out_dir.path().join("train_1_features.npy").exists());
        assert!(out_dir.path().join("train_manifest.json").exists());
    }

    #[test]
    #[should_panic(expected = "pair positionally")]
    fn test_new_rejects_mismatched_lists() {
        let (wavs, _) = make_paths(3);
        let (_, labels) = make_paths(2);
        Processor::new(
            wavs,
            labels,
            "txt".to_string(),
            Box::new(CountingExtractor),
            ExtractionConfig {
                save_path: PathBuf::from("/tmp/unused"),
                file_prefix: "train".to_string(),
                piece_per_file: 40,
                harmonic: false,
            },
        );
    }
}
