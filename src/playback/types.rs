//! Playback type definitions

use serde::Serialize;

/// Tempo in quarter-note beats per minute, clamped to the metronome's
/// usable range.
///
/// # Example
/// ```
/// use clavier::Tempo;
///
/// assert_eq!(Tempo::new(120).bpm(), 120);
/// assert_eq!(Tempo::new(10).bpm(), 40);
/// assert_eq!(Tempo::new(500).bpm(), 208);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Tempo(u16);

impl Tempo {
    pub const MIN_BPM: u16 = 40;
    pub const MAX_BPM: u16 = 208;

    pub fn new(bpm: u16) -> Self {
        Tempo(bpm.clamp(Self::MIN_BPM, Self::MAX_BPM))
    }

    pub fn bpm(self) -> u16 {
        self.0
    }

    /// Seconds per quarter-note beat.
    pub fn seconds_per_beat(self) -> f64 {
        60.0 / self.0 as f64
    }
}

impl Default for Tempo {
    fn default() -> Self {
        Tempo(120)
    }
}

/// Timing for one note within a schedule, as offsets in seconds from the
/// start of the playback invocation.
///
/// `release_offset` covers only the audible 90% of the note's length; the
/// next note's attack lands at the full length.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledNote {
    pub pitch: String,
    pub attack_offset: f64,
    pub release_offset: f64,
}

/// A computed playback schedule.
///
/// Derived and ephemeral: recomputed on every play request and discarded
/// once playback completes or is cancelled. Attack offsets are monotonically
/// non-decreasing and every release is at or after its attack.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackSchedule {
    pub notes: Vec<ScheduledNote>,
    /// Total contiguous length in seconds (sum of full note lengths).
    pub length: f64,
}

/// Player lifecycle.
///
/// `Idle` means no schedule exists. A play request computes a schedule
/// (`Scheduled`), which becomes `Playing` once events start firing, then
/// returns to `Idle` on natural completion or `Stopped` on an explicit stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerState {
    Idle,
    Scheduled,
    Playing,
    Stopped,
}
