// Audio ingestion module
// Reads WAV files from disk and normalizes samples for feature extraction

use hound::{SampleFormat, WavReader};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("Failed to open audio file {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read WAV data from {path}: {source}")]
    Wav { path: PathBuf, source: hound::Error },

    #[error("Unsupported audio format in {path}: {detail}")]
    UnsupportedFormat { path: PathBuf, detail: String },
}

#[derive(Debug, Clone)]
pub struct AudioData {
    /// Audio samples normalized to f32 in range [-1.0, 1.0], interleaved
    pub samples: Vec<f32>,

    /// Sample rate in Hz (e.g., 44100, 48000)
    pub sample_rate: u32,

    /// Number of channels (1 = mono, 2 = stereo)
    pub channels: u16,

    /// Total number of frames (samples / channels)
    pub frame_count: usize,
}

impl AudioData {
    /// Duration of the recording in seconds
    pub fn duration_secs(&self) -> f64 {
        self.frame_count as f64 / self.sample_rate as f64
    }

    /// Convert to mono by averaging channels
    pub fn to_mono(&self) -> Vec<f32> {
        if self.channels == 1 {
            return self.samples.clone();
        }

        let channels = self.channels as usize;
        let mut mono = Vec::with_capacity(self.frame_count);

        for frame_idx in 0..self.frame_count {
            let mut sum = 0.0;
            for ch in 0..channels {
                sum += self.samples[frame_idx * channels + ch];
            }
            mono.push(sum / channels as f32);
        }

        mono
    }
}

/// Load a WAV file from disk
/// Returns AudioData with samples normalized to f32 [-1.0, 1.0]
pub fn load_wav(path: &Path) -> Result<AudioData, AudioError> {
    let mut reader = WavReader::open(path).map_err(|e| match e {
        hound::Error::IoError(io) => AudioError::Open {
            path: path.to_path_buf(),
            source: io,
        },
        other => AudioError::Wav {
            path: path.to_path_buf(),
            source: other,
        },
    })?;

    let spec = reader.spec();
    let sample_rate = spec.sample_rate;
    let channels = spec.channels;
    let bit_depth = spec.bits_per_sample;

    let wav_err = |e: hound::Error| AudioError::Wav {
        path: path.to_path_buf(),
        source: e,
    };

    // Normalize samples to f32 [-1.0, 1.0] by bit depth
    let samples: Vec<f32> = match (spec.sample_format, bit_depth) {
        (SampleFormat::Int, 8) => {
            // 8-bit PCM: unsigned, range [0, 255] -> [-1.0, 1.0]
            reader
                .samples::<i32>()
                .collect::<Result<Vec<_>, _>>()
                .map_err(wav_err)?
                .into_iter()
                .map(|s| (s as f32 - 128.0) / 128.0)
                .collect()
        }
        (SampleFormat::Int, 16) => {
            // 16-bit PCM: signed, range [-32768, 32767] -> [-1.0, 1.0]
            reader
                .samples::<i16>()
                .collect::<Result<Vec<_>, _>>()
                .map_err(wav_err)?
                .into_iter()
                .map(|s| s as f32 / 32768.0)
                .collect()
        }
        (SampleFormat::Int, 24) => {
            // 24-bit PCM: signed, range [-8388608, 8388607] -> [-1.0, 1.0]
            reader
                .samples::<i32>()
                .collect::<Result<Vec<_>, _>>()
                .map_err(wav_err)?
                .into_iter()
                .map(|s| s as f32 / 8388608.0)
                .collect()
        }
        (SampleFormat::Int, 32) => {
            // 32-bit PCM: signed, range [-2147483648, 2147483647] -> [-1.0, 1.0]
            reader
                .samples::<i32>()
                .collect::<Result<Vec<_>, _>>()
                .map_err(wav_err)?
                .into_iter()
                .map(|s| s as f32 / 2147483648.0)
                .collect()
        }
        (SampleFormat::Float, 32) => reader
            .samples::<f32>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(wav_err)?,
        (format, depth) => {
            return Err(AudioError::UnsupportedFormat {
                path: path.to_path_buf(),
                detail: format!("{:?} {}-bit audio", format, depth),
            });
        }
    };

    let frame_count = samples.len() / channels as usize;

    Ok(AudioData {
        samples,
        sample_rate,
        channels,
        frame_count,
    })
}
