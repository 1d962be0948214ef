//! Schedule computation
//!
//! Converts a note sequence and a tempo into absolute attack/release offsets
//! with the cursor algorithm described in the module docs.

use crate::score::NoteEvent;

use super::types::{PlaybackSchedule, ScheduledNote, Tempo};

/// Fraction of each note's length that actually sounds. The remaining 10%
/// is a gap before the next note; the cursor still advances by the full
/// length so the sequence stays contiguous.
pub const AUDIBLE_RATIO: f64 = 0.9;

/// Concrete length in seconds of one note at the given tempo.
pub(crate) fn note_seconds(note: &NoteEvent, tempo: Tempo) -> f64 {
    let beats = note.duration.as_beats();
    let base = beats * tempo.seconds_per_beat();
    if note.dotted {
        base * 1.5
    } else {
        base
    }
}

/// Compute a playback schedule for a note sequence at the given tempo.
///
/// Maintains a running cursor from zero. Each note attacks at the cursor and
/// releases after the audible portion of its length; the cursor then advances
/// by the full (untrimmed) length. Attack offsets are therefore monotonically
/// non-decreasing in sequence order.
pub fn build_schedule(notes: &[NoteEvent], tempo: Tempo) -> PlaybackSchedule {
    let mut cursor = 0.0;
    let mut scheduled = Vec::with_capacity(notes.len());

    for note in notes {
        let length = note_seconds(note, tempo);
        scheduled.push(ScheduledNote {
            pitch: note.pitch.clone(),
            attack_offset: cursor,
            release_offset: cursor + length * AUDIBLE_RATIO,
        });
        cursor += length;
    }

    PlaybackSchedule {
        notes: scheduled,
        length: cursor,
    }
}
