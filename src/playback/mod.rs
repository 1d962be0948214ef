//! # Playback Module
//!
//! Turn a parsed note sequence into timed audio and highlight events and
//! drive them against a transport clock.
//!
//! ## Purpose
//! This module converts [`NoteEvent`](crate::NoteEvent)s into a
//! [`PlaybackSchedule`] that is used for:
//! 1. **Audio playback** - attack/release times fed to the synth voice engine
//! 2. **Visual highlighting** - on-screen key highlight on/off timing,
//!    delivered independently of the audio path
//!
//! ## Sub-modules
//! - `types` - Tempo, ScheduledNote, PlaybackSchedule, PlayerState
//! - `engine` - schedule computation (the cursor algorithm)
//! - `player` - the Player state machine, Synth collaborator trait, metronome
//!
//! ## Timing Model
//! A running cursor starts at zero. Each note's length is its duration class
//! at the current tempo (whole = 4 beats .. sixteenth = 0.25, dotted x1.5).
//! Only 90% of that length is audible, leaving a perceptible gap before the
//! next note, but the cursor always advances by the full length so notes
//! stay contiguous.
//!
//! ## Cancellation
//! The player owns its pending event queue. A new play or an explicit stop
//! discards the queue before anything new is registered, so a stale callback
//! can never fire after cancellation. This is a correctness invariant, not a
//! best-effort cleanup.
//!
//! ## Example
//! ```rust
//! use clavier::{NoteEvent, DurationClass, Tempo, build_schedule};
//!
//! let notes = vec![
//!     NoteEvent { pitch: "C4".into(), duration: DurationClass::Quarter, dotted: false },
//!     NoteEvent { pitch: "D4".into(), duration: DurationClass::Quarter, dotted: false },
//! ];
//!
//! let schedule = build_schedule(&notes, Tempo::new(120));
//! // 0.5 s per quarter note at 120 BPM, regardless of the audible trim
//! assert_eq!(schedule.notes[1].attack_offset, 0.5);
//! ```

mod engine;
mod player;
mod types;

#[cfg(test)]
mod tests;

pub use engine::{build_schedule, AUDIBLE_RATIO};
pub use player::{Player, Synth};
pub use types::{PlaybackSchedule, PlayerState, ScheduledNote, Tempo};
