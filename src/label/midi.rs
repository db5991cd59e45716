// MIDI label parsing using the midly crate
// Converts note on/off pairs to timed note events, honoring every tempo
// change in the file

use midly::{MetaMessage, MidiMessage, Smf, Timing, TrackEventKind};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::{LabelError, NoteEvent};

/// Default MIDI tempo: 120 BPM expressed as microseconds per quarter note
const DEFAULT_US_PER_QUARTER: f64 = 500_000.0;

/// Parse a standard MIDI file into note events.
///
/// Tempo events from all tracks are merged into one tempo map before tick
/// times are converted to seconds, so format 1 files with a dedicated tempo
/// track are handled correctly.
pub fn parse_midi(path: &Path) -> Result<Vec<NoteEvent>, LabelError> {
    let bytes = fs::read(path).map_err(|e| LabelError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;

    let smf = Smf::parse(&bytes).map_err(|e| LabelError::Midi {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;

    let clock = TickClock::new(&smf);

    // Pair note-ons with their matching note-offs per (channel, key).
    // A NoteOn with velocity 0 counts as a NoteOff.
    let mut events = Vec::new();

    for track in &smf.tracks {
        let mut open_notes: HashMap<(u8, u8), Vec<u64>> = HashMap::new();
        let mut tick = 0u64;

        for event in track {
            tick += u64::from(event.delta.as_int());

            let TrackEventKind::Midi { channel, message } = event.kind else {
                continue;
            };

            match message {
                MidiMessage::NoteOn { key, vel } if vel.as_int() > 0 => {
                    open_notes
                        .entry((channel.as_int(), key.as_int()))
                        .or_default()
                        .push(tick);
                }
                MidiMessage::NoteOn { key, .. } | MidiMessage::NoteOff { key, .. } => {
                    let stack = open_notes
                        .entry((channel.as_int(), key.as_int()))
                        .or_default();
                    if let Some(onset_tick) = stack.pop() {
                        events.push(NoteEvent {
                            onset_sec: clock.tick_to_secs(onset_tick),
                            offset_sec: clock.tick_to_secs(tick),
                            pitch: key.as_int(),
                        });
                    }
                }
                _ => {}
            }
        }
    }

    // Catalogue order is positional, so keep label order deterministic too
    events.sort_by(|a, b| {
        a.onset_sec
            .total_cmp(&b.onset_sec)
            .then(a.pitch.cmp(&b.pitch))
    });

    Ok(events)
}

/// Tick-to-seconds conversion built from the file's merged tempo map
struct TickClock {
    /// Segments of (start_tick, seconds_at_start, seconds_per_tick), sorted
    segments: Vec<(u64, f64, f64)>,
}

impl TickClock {
    fn new(smf: &Smf) -> Self {
        match smf.header.timing {
            Timing::Metrical(ppq) => {
                let ticks_per_quarter = f64::from(ppq.as_int());

                // Collect tempo changes from every track
                let mut tempo_changes: Vec<(u64, f64)> = Vec::new();
                for track in &smf.tracks {
                    let mut tick = 0u64;
                    for event in track {
                        tick += u64::from(event.delta.as_int());
                        if let TrackEventKind::Meta(MetaMessage::Tempo(us)) = event.kind {
                            tempo_changes.push((tick, f64::from(us.as_int())));
                        }
                    }
                }
                tempo_changes.sort_by_key(|(tick, _)| *tick);

                // Fold into cumulative segments
                let mut segments = Vec::with_capacity(tempo_changes.len() + 1);
                let mut secs = 0.0;
                let mut last_tick = 0u64;
                let mut secs_per_tick = DEFAULT_US_PER_QUARTER / ticks_per_quarter / 1e6;
                segments.push((0, 0.0, secs_per_tick));

                for (tick, us_per_quarter) in tempo_changes {
                    secs += (tick - last_tick) as f64 * secs_per_tick;
                    secs_per_tick = us_per_quarter / ticks_per_quarter / 1e6;
                    segments.push((tick, secs, secs_per_tick));
                    last_tick = tick;
                }

                TickClock { segments }
            }
            Timing::Timecode(fps, subframe) => {
                let ticks_per_sec = fps.as_f32() as f64 * f64::from(subframe);
                TickClock {
                    segments: vec![(0, 0.0, 1.0 / ticks_per_sec)],
                }
            }
        }
    }

    fn tick_to_secs(&self, tick: u64) -> f64 {
        let idx = self
            .segments
            .partition_point(|(start, _, _)| *start <= tick)
            .saturating_sub(1);
        let (start, secs_at_start, secs_per_tick) = self.segments[idx];
        secs_at_start + (tick - start) as f64 * secs_per_tick
    }
}
