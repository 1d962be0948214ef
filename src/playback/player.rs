//! Player state machine
//!
//! Drives a computed schedule against the audio clock. All scheduling is
//! expressed as deferred events in a queue the player owns; firing them is
//! cooperative via [`Player::tick`], and discarding the queue is what makes
//! cancellation airtight.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::warn;

use crate::error::ClavierError;
use crate::score::{DurationClass, NoteEvent};

use super::engine::build_schedule;
use super::types::{PlaybackSchedule, PlayerState, Tempo};

/// Highlight auto-clear delay for a single tapped key, in seconds.
const NOTE_HIGHLIGHT_SECS: f64 = 0.2;
/// Highlight auto-clear delay for a chord, in seconds.
const CHORD_HIGHLIGHT_SECS: f64 = 1.0;
/// Trailing margin after the last note before the final highlight reset.
const FINAL_CLEAR_MARGIN_SECS: f64 = 0.2;

/// The audio voice engine collaborator.
///
/// A single process-wide instance sits behind this trait; only one schedule
/// is ever active against it, enforced by the player's stop-before-play
/// rule. `start` is called lazily before the first user-triggered sound and
/// may fail, in which case the triggering request is dropped.
pub trait Synth {
    fn start(&mut self) -> Result<(), ClavierError>;
    fn note_on(&mut self, pitch: &str);
    fn note_off(&mut self, pitch: &str);
    /// Immediately silence every active voice.
    fn release_all(&mut self);
    /// One metronome click.
    fn click(&mut self);
}

#[derive(Debug, Clone, PartialEq)]
enum Action {
    Attack(String),
    Release(String),
    HighlightOn(String),
    HighlightOff(String),
    ClearHighlights,
}

/// A deferred callback: an action at an absolute time. `seq` preserves
/// submission order for equal-time entries.
#[derive(Debug, Clone)]
struct TimedEvent {
    at: f64,
    seq: u64,
    action: Action,
}

impl PartialEq for TimedEvent {
    fn eq(&self, other: &Self) -> bool {
        self.at.total_cmp(&other.at) == Ordering::Equal && self.seq == other.seq
    }
}

impl Eq for TimedEvent {}

impl Ord for TimedEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap and we want the earliest event
        // (then lowest sequence number) on top.
        other
            .at
            .total_cmp(&self.at)
            .then(other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for TimedEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Single-threaded, event-driven playback driver.
///
/// Owns the synth collaborator, the pending event queue, the highlight
/// state, and the metronome. The host loop calls [`Player::tick`] with the
/// current audio-clock time; everything else is a request that registers or
/// discards deferred events.
///
/// # Example
/// ```
/// use clavier::{ClavierError, NoteEvent, DurationClass, Player, PlayerState, Synth};
///
/// struct NullSynth;
/// impl Synth for NullSynth {
///     fn start(&mut self) -> Result<(), ClavierError> { Ok(()) }
///     fn note_on(&mut self, _: &str) {}
///     fn note_off(&mut self, _: &str) {}
///     fn release_all(&mut self) {}
///     fn click(&mut self) {}
/// }
///
/// let mut player = Player::new(NullSynth);
/// let notes = vec![NoteEvent {
///     pitch: "C4".into(),
///     duration: DurationClass::Quarter,
///     dotted: false,
/// }];
/// player.play(&notes, 0.0);
/// player.tick(0.0);
/// assert_eq!(player.state(), PlayerState::Playing);
/// assert_eq!(player.active_keys(), ["C4"]);
/// ```
pub struct Player<S: Synth> {
    synth: S,
    audio_ready: bool,
    state: PlayerState,
    tempo: Tempo,
    queue: BinaryHeap<TimedEvent>,
    next_seq: u64,
    active: Vec<String>,
    schedule: Option<PlaybackSchedule>,
    metronome_on: bool,
    last_click: f64,
}

impl<S: Synth> Player<S> {
    pub fn new(synth: S) -> Self {
        Player {
            synth,
            audio_ready: false,
            state: PlayerState::Idle,
            tempo: Tempo::default(),
            queue: BinaryHeap::new(),
            next_seq: 0,
            active: Vec::new(),
            schedule: None,
            metronome_on: false,
            last_click: 0.0,
        }
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    /// Access the synth collaborator.
    pub fn synth(&self) -> &S {
        &self.synth
    }

    pub fn tempo(&self) -> Tempo {
        self.tempo
    }

    /// Pitches whose on-screen keys are currently highlighted.
    pub fn active_keys(&self) -> &[String] {
        &self.active
    }

    /// The schedule backing the current play invocation, if one is active.
    pub fn schedule(&self) -> Option<&PlaybackSchedule> {
        self.schedule.as_ref()
    }

    /// Update the tempo. Applies to the next play invocation and rescales
    /// the pending metronome click; an in-flight schedule keeps its timing.
    pub fn set_tempo(&mut self, bpm: u16) {
        self.tempo = Tempo::new(bpm);
    }

    /// Lazily start the audio engine before the first user-triggered sound.
    /// On failure the request is dropped and surfaced as a warning.
    fn ensure_audio(&mut self) -> bool {
        if self.audio_ready {
            return true;
        }
        match self.synth.start() {
            Ok(()) => {
                self.audio_ready = true;
                true
            }
            Err(e) => {
                warn!(error = %e, "audio engine failed to start; request dropped");
                false
            }
        }
    }

    fn defer(&mut self, at: f64, action: Action) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(TimedEvent { at, seq, action });
    }

    /// Schedule the note sequence for playback starting at `now`.
    ///
    /// Any prior schedule is discarded and in-flight voices are released
    /// first (an implicit stop-before-play). Does nothing for an empty
    /// sequence or when the audio engine cannot start.
    pub fn play(&mut self, notes: &[NoteEvent], now: f64) {
        self.cancel_pending();
        self.state = PlayerState::Idle;
        if notes.is_empty() || !self.ensure_audio() {
            return;
        }

        let schedule = build_schedule(notes, self.tempo);
        for note in &schedule.notes {
            self.defer(now + note.attack_offset, Action::Attack(note.pitch.clone()));
            self.defer(now + note.attack_offset, Action::HighlightOn(note.pitch.clone()));
            self.defer(now + note.release_offset, Action::Release(note.pitch.clone()));
            self.defer(now + note.release_offset, Action::HighlightOff(note.pitch.clone()));
        }
        self.defer(now + schedule.length + FINAL_CLEAR_MARGIN_SECS, Action::ClearHighlights);

        self.schedule = Some(schedule);
        self.state = PlayerState::Scheduled;
    }

    /// Stop playback: cancel all pending events and silence active voices.
    ///
    /// Safe to call when nothing is playing; highlight state always resets
    /// to empty.
    pub fn stop(&mut self) {
        let was_active = self.cancel_pending();
        if was_active {
            self.state = PlayerState::Stopped;
        }
    }

    /// Discard every pending deferred event and reset transient state.
    /// Returns whether a schedule was actually cancelled.
    fn cancel_pending(&mut self) -> bool {
        self.queue.clear();
        self.active.clear();
        if self.audio_ready {
            self.synth.release_all();
        }
        self.schedule.take().is_some()
    }

    /// Trigger one key immediately, with a short fixed highlight.
    ///
    /// Bypasses the cursor/sequence logic entirely: the note sounds for an
    /// eighth note at the current tempo and its highlight auto-clears after
    /// a fixed short delay.
    pub fn play_note(&mut self, pitch: &str, now: f64) {
        if !self.ensure_audio() {
            return;
        }
        self.synth.note_on(pitch);
        self.active.push(pitch.to_string());

        let sounding = DurationClass::Eighth.as_beats() * self.tempo.seconds_per_beat();
        self.defer(now + sounding, Action::Release(pitch.to_string()));
        self.defer(now + NOTE_HIGHLIGHT_SECS, Action::HighlightOff(pitch.to_string()));
    }

    /// Trigger several notes simultaneously, with a longer fixed highlight.
    pub fn play_chord(&mut self, pitches: &[String], now: f64) {
        if pitches.is_empty() || !self.ensure_audio() {
            return;
        }
        self.active = pitches.to_vec();
        let sounding = DurationClass::Whole.as_beats() * self.tempo.seconds_per_beat();
        for pitch in pitches {
            self.synth.note_on(pitch);
            self.defer(now + sounding, Action::Release(pitch.clone()));
            self.defer(now + CHORD_HIGHLIGHT_SECS, Action::HighlightOff(pitch.clone()));
        }
    }

    /// Toggle the metronome. Turning it on clicks immediately at `now`;
    /// turning it off cancels the repeating click without touching any
    /// note schedule.
    pub fn toggle_metronome(&mut self, now: f64) {
        if self.metronome_on {
            self.metronome_on = false;
            return;
        }
        if !self.ensure_audio() {
            return;
        }
        self.metronome_on = true;
        // Anchor one beat back so the first click fires at `now`
        self.last_click = now - self.tempo.seconds_per_beat();
    }

    pub fn metronome_on(&self) -> bool {
        self.metronome_on
    }

    /// Advance the transport to `now`, firing every due deferred event in
    /// (time, submission) order.
    pub fn tick(&mut self, now: f64) {
        // Metronome clicks are decoupled from note playback. The next click
        // is one beat after the last at the tempo current right now, so a
        // tempo change rescales the pending click immediately.
        while self.metronome_on {
            let next_click = self.last_click + self.tempo.seconds_per_beat();
            if next_click > now {
                break;
            }
            self.synth.click();
            self.last_click = next_click;
        }

        while let Some(front) = self.queue.peek() {
            if front.at > now {
                break;
            }
            // peek() succeeded, so pop() cannot return None
            let Some(event) = self.queue.pop() else { break };
            if self.state == PlayerState::Scheduled {
                self.state = PlayerState::Playing;
            }
            match event.action {
                Action::Attack(pitch) => self.synth.note_on(&pitch),
                Action::Release(pitch) => self.synth.note_off(&pitch),
                Action::HighlightOn(pitch) => self.active.push(pitch),
                Action::HighlightOff(pitch) => self.active.retain(|k| *k != pitch),
                Action::ClearHighlights => self.active.clear(),
            }
        }

        // Natural completion: the last release has elapsed
        if self.queue.is_empty() && self.state == PlayerState::Playing {
            self.schedule = None;
            self.state = PlayerState::Idle;
        }
    }
}
