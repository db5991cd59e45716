// Text-based label parsing
// MAPS ground-truth text files and MusicNet CSV annotations

use std::fs;
use std::path::Path;

use super::{LabelError, NoteEvent};

/// MusicNet annotations give times as sample counts at this rate
const MUSICNET_SAMPLE_RATE: f64 = 44_100.0;

/// Parse a MAPS ground-truth text file.
///
/// Format: one header line, then whitespace-separated rows of
/// `OnsetTime OffsetTime MidiPitch` with times in seconds.
pub fn parse_maps_text(path: &Path) -> Result<Vec<NoteEvent>, LabelError> {
    let contents = fs::read_to_string(path).map_err(|e| LabelError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut events = Vec::new();

    for (line_no, line) in contents.lines().enumerate().skip(1) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let parse_err = |detail: String| LabelError::Parse {
            path: path.to_path_buf(),
            line: line_no + 1,
            detail,
        };

        let mut fields = line.split_whitespace();
        let onset: f64 = next_field(&mut fields, "OnsetTime")
            .and_then(|f| f.parse().map_err(|_| format!("bad onset '{f}'")))
            .map_err(&parse_err)?;
        let offset: f64 = next_field(&mut fields, "OffsetTime")
            .and_then(|f| f.parse().map_err(|_| format!("bad offset '{f}'")))
            .map_err(&parse_err)?;
        let pitch: u8 = next_field(&mut fields, "MidiPitch")
            .and_then(|f| f.parse().map_err(|_| format!("bad pitch '{f}'")))
            .map_err(&parse_err)?;

        events.push(NoteEvent {
            onset_sec: onset,
            offset_sec: offset,
            pitch,
        });
    }

    Ok(events)
}

/// Parse a MusicNet CSV annotation file.
///
/// Columns: `start_time,end_time,instrument,note,...` with times in samples
/// at 44.1 kHz. One header line.
pub fn parse_musicnet_csv(path: &Path) -> Result<Vec<NoteEvent>, LabelError> {
    let contents = fs::read_to_string(path).map_err(|e| LabelError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut events = Vec::new();

    for (line_no, line) in contents.lines().enumerate().skip(1) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let parse_err = |detail: String| LabelError::Parse {
            path: path.to_path_buf(),
            line: line_no + 1,
            detail,
        };

        let mut fields = line.split(',').map(str::trim);
        let start: f64 = next_field(&mut fields, "start_time")
            .and_then(|f| f.parse().map_err(|_| format!("bad start_time '{f}'")))
            .map_err(&parse_err)?;
        let end: f64 = next_field(&mut fields, "end_time")
            .and_then(|f| f.parse().map_err(|_| format!("bad end_time '{f}'")))
            .map_err(&parse_err)?;
        let _instrument = next_field(&mut fields, "instrument").map_err(&parse_err)?;
        let pitch: u8 = next_field(&mut fields, "note")
            .and_then(|f| f.parse().map_err(|_| format!("bad note '{f}'")))
            .map_err(&parse_err)?;

        events.push(NoteEvent {
            onset_sec: start / MUSICNET_SAMPLE_RATE,
            offset_sec: end / MUSICNET_SAMPLE_RATE,
            pitch,
        });
    }

    Ok(events)
}

fn next_field<'a, I: Iterator<Item = &'a str>>(
    fields: &mut I,
    name: &str,
) -> Result<&'a str, String> {
    fields.next().ok_or_else(|| format!("missing {name} column"))
}
