// Ground-truth label handling
// Parses per-dataset note annotations and rasterizes them onto the feature
// frame grid as an 88-key piano roll

pub mod midi;
pub mod text;

use ndarray::Array2;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Lowest pitch of the 88-key piano range (A0)
pub const PITCH_MIN: u8 = 21;

/// Number of pitch classes in the label matrix
pub const PITCH_COUNT: usize = 88;

#[derive(Debug, Error)]
pub enum LabelError {
    #[error("Failed to read label file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse MIDI file {path}: {detail}")]
    Midi { path: PathBuf, detail: String },

    #[error("Malformed label in {path} at line {line}: {detail}")]
    Parse {
        path: PathBuf,
        line: usize,
        detail: String,
    },

    #[error("Unknown label format '{0}'")]
    UnknownFormat(String),
}

/// One annotated note: a pitch sounding over a time interval
#[derive(Debug, Clone, PartialEq)]
pub struct NoteEvent {
    /// Note start in seconds from the beginning of the recording
    pub onset_sec: f64,

    /// Note end in seconds
    pub offset_sec: f64,

    /// MIDI pitch number (21..=108 covers the piano range)
    pub pitch: u8,
}

/// Label file format, keyed by the catalogue's extension tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelFormat {
    /// MAPS-style text: header line, then `OnsetTime OffsetTime MidiPitch` rows
    MapsText,

    /// MusicNet-style CSV with sample-clock timestamps
    MusicNetCsv,

    /// Standard MIDI file
    Midi,
}

impl LabelFormat {
    pub fn from_ext(ext: &str) -> Result<Self, LabelError> {
        match ext.trim_start_matches('.') {
            "txt" => Ok(LabelFormat::MapsText),
            "csv" => Ok(LabelFormat::MusicNetCsv),
            "mid" | "midi" => Ok(LabelFormat::Midi),
            other => Err(LabelError::UnknownFormat(other.to_string())),
        }
    }
}

/// Parse a label file into note events according to the format tag
pub fn parse_label_file(path: &Path, ext: &str) -> Result<Vec<NoteEvent>, LabelError> {
    match LabelFormat::from_ext(ext)? {
        LabelFormat::MapsText => text::parse_maps_text(path),
        LabelFormat::MusicNetCsv => text::parse_musicnet_csv(path),
        LabelFormat::Midi => midi::parse_midi(path),
    }
}

/// Rasterize note events onto a frame grid.
///
/// Returns an `[n_frames, 88]` matrix where entry `[f, p]` is 1.0 when pitch
/// `PITCH_MIN + p` sounds at frame time `f / fps` (onset inclusive, offset
/// exclusive). Pitches outside the 88-key range are skipped.
pub fn rasterize(events: &[NoteEvent], n_frames: usize, fps: f64) -> Array2<f32> {
    let mut roll = Array2::<f32>::zeros((n_frames, PITCH_COUNT));

    for event in events {
        if event.pitch < PITCH_MIN || (event.pitch - PITCH_MIN) as usize >= PITCH_COUNT {
            continue;
        }
        let col = (event.pitch - PITCH_MIN) as usize;

        // First frame at or after the onset, first frame at or after the offset
        let start = (event.onset_sec * fps).ceil() as usize;
        let end = ((event.offset_sec * fps).ceil() as usize).min(n_frames);

        for frame in start..end {
            roll[[frame, col]] = 1.0;
        }
    }

    roll
}
