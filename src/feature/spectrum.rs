// Spectral transform
// Hann-windowed STFT magnitude spectrogram with log compression, plus the
// optional harmonic-stacked representation used for transcription features

use ndarray::{Array2, Array3};
use realfft::RealFftPlanner;

/// FFT window size in samples (power of 2)
pub const WINDOW_SIZE: usize = 2048;

/// Hop size in samples (advance between frames)
pub const HOP_SIZE: usize = 512;

/// Number of frequency bins in the one-sided spectrum
pub const SPECTRUM_BINS: usize = WINDOW_SIZE / 2 + 1;

/// Harmonic multiples stacked as channels when harmonic features are enabled.
/// The sub-harmonic 0.5 comes first, then the fundamental and its overtones.
pub const HARMONICS: [f32; 6] = [0.5, 1.0, 2.0, 3.0, 4.0, 5.0];

/// Label frames per second for audio at the given sample rate
pub fn frames_per_second(sample_rate: u32) -> f64 {
    sample_rate as f64 / HOP_SIZE as f64
}

/// Number of STFT frames produced for a signal of `len` samples
pub fn frame_count(len: usize) -> usize {
    if len < WINDOW_SIZE {
        return 0;
    }
    (len - WINDOW_SIZE) / HOP_SIZE + 1
}

/// Compute a log-compressed magnitude spectrogram.
///
/// Returns `[frames, SPECTRUM_BINS]` with entries `ln(1 + |X|)`.
pub fn log_spectrogram(samples: &[f32]) -> Array2<f32> {
    let num_frames = frame_count(samples.len());
    let mut spec = Array2::<f32>::zeros((num_frames, SPECTRUM_BINS));

    if num_frames == 0 {
        return spec;
    }

    let mut planner = RealFftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(WINDOW_SIZE);
    let mut input = fft.make_input_vec();
    let mut output = fft.make_output_vec();

    let window = hann_window(WINDOW_SIZE);

    for frame_idx in 0..num_frames {
        let start = frame_idx * HOP_SIZE;
        let frame = &samples[start..start + WINDOW_SIZE];

        for (dst, (&sample, &w)) in input.iter_mut().zip(frame.iter().zip(window.iter())) {
            *dst = sample * w;
        }

        // realfft only fails on length mismatches, which the plan rules out
        fft.process(&mut input, &mut output)
            .expect("FFT length mismatch");

        for (bin, value) in output.iter().enumerate() {
            spec[[frame_idx, bin]] = (1.0 + value.norm()).ln();
        }
    }

    spec
}

/// Stack harmonically shifted copies of a spectrogram as channels.
///
/// Channel `c` holds the energy at `HARMONICS[c]` times each bin's frequency,
/// so a pitched note lines up across channels at its fundamental bin.
/// Returns `[frames, SPECTRUM_BINS, HARMONICS.len()]`.
pub fn harmonic_stack(spec: &Array2<f32>) -> Array3<f32> {
    let frames = spec.shape()[0];
    let bins = spec.shape()[1];
    let mut stacked = Array3::<f32>::zeros((frames, bins, HARMONICS.len()));

    for (channel, &harmonic) in HARMONICS.iter().enumerate() {
        for frame in 0..frames {
            for bin in 0..bins {
                let src = (bin as f32 * harmonic).round() as usize;
                if src < bins {
                    stacked[[frame, bin, channel]] = spec[[frame, src]];
                }
            }
        }
    }

    stacked
}

/// Wrap a plain spectrogram as a single-channel tensor `[frames, bins, 1]`
pub fn single_channel(spec: Array2<f32>) -> Array3<f32> {
    let frames = spec.shape()[0];
    let bins = spec.shape()[1];
    spec.into_shape_with_order((frames, bins, 1))
        .expect("reshape preserves element count")
}

/// Hann window to reduce spectral leakage
fn hann_window(n: usize) -> Vec<f32> {
    (0..n)
        .map(|i| 0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / n as f32).cos()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f32, sample_rate: u32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| (2.0 * std::f32::consts::PI * freq * i as f32 / sample_rate as f32).sin())
            .collect()
    }

    #[test]
    fn test_frame_count() {
        assert_eq!(frame_count(0), 0);
        assert_eq!(frame_count(WINDOW_SIZE - 1), 0);
        assert_eq!(frame_count(WINDOW_SIZE), 1);
        assert_eq!(frame_count(WINDOW_SIZE + HOP_SIZE), 2);
    }

    #[test]
    fn test_hann_window_tapers_at_edges() {
        let window = hann_window(100);
        assert!(window[0] < 0.1);
        assert!(window[99] < 0.1);
        assert!(window[50] > 0.9);
    }

    #[test]
    fn test_log_spectrogram_shape() {
        let samples = vec![0.0; WINDOW_SIZE + 3 * HOP_SIZE];
        let spec = log_spectrogram(&samples);
        assert_eq!(spec.shape(), &[4, SPECTRUM_BINS]);
    }

    #[test]
    fn test_log_spectrogram_peak_at_tone_frequency() {
        let sample_rate = 44100;
        let freq = 440.0;
        let samples = sine(freq, sample_rate, WINDOW_SIZE * 2);
        let spec = log_spectrogram(&samples);

        // Strongest bin of the first frame should sit near 440 Hz
        let bin_width = sample_rate as f32 / WINDOW_SIZE as f32;
        let expected_bin = (freq / bin_width).round() as usize;

        let mut max_bin = 0;
        let mut max_value = f32::MIN;
        for bin in 0..SPECTRUM_BINS {
            if spec[[0, bin]] > max_value {
                max_value = spec[[0, bin]];
                max_bin = bin;
            }
        }

        assert!((max_bin as i64 - expected_bin as i64).unsigned_abs() <= 1);
    }

    #[test]
    fn test_log_spectrogram_silence_is_zero() {
        let samples = vec![0.0; WINDOW_SIZE];
        let spec = log_spectrogram(&samples);
        assert!(spec.iter().all(|&v| v.abs() < 1e-6));
    }

    #[test]
    fn test_harmonic_stack_shape_and_fundamental() {
        let samples = sine(440.0, 44100, WINDOW_SIZE * 2);
        let spec = log_spectrogram(&samples);
        let stacked = harmonic_stack(&spec);

        assert_eq!(
            stacked.shape(),
            &[spec.shape()[0], SPECTRUM_BINS, HARMONICS.len()]
        );

        // Channel 1 is the unshifted fundamental
        for bin in (0..SPECTRUM_BINS).step_by(97) {
            assert_eq!(stacked[[0, bin, 1]], spec[[0, bin]]);
        }
    }

    #[test]
    fn test_single_channel_shape() {
        let spec = Array2::<f32>::zeros((7, SPECTRUM_BINS));
        let tensor = single_channel(spec);
        assert_eq!(tensor.shape(), &[7, SPECTRUM_BINS, 1]);
    }
}
