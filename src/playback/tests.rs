use super::*;
use crate::error::ClavierError;
use crate::score::{DurationClass, NoteEvent};

fn quarter(pitch: &str) -> NoteEvent {
    NoteEvent {
        pitch: pitch.to_string(),
        duration: DurationClass::Quarter,
        dotted: false,
    }
}

/// Records every synth call so tests can assert on ordering and cancellation.
#[derive(Default)]
struct FakeSynth {
    calls: Vec<String>,
    fail_start: bool,
}

impl Synth for FakeSynth {
    fn start(&mut self) -> Result<(), ClavierError> {
        if self.fail_start {
            return Err(ClavierError::AudioInitError("no output device".to_string()));
        }
        self.calls.push("start".to_string());
        Ok(())
    }
    fn note_on(&mut self, pitch: &str) {
        self.calls.push(format!("on {}", pitch));
    }
    fn note_off(&mut self, pitch: &str) {
        self.calls.push(format!("off {}", pitch));
    }
    fn release_all(&mut self) {
        self.calls.push("release_all".to_string());
    }
    fn click(&mut self) {
        self.calls.push("click".to_string());
    }
}

#[test]
fn test_schedule_basic_timing() {
    let notes = vec![quarter("C4"), quarter("D4")];
    let schedule = build_schedule(&notes, Tempo::new(120));

    // At 120 BPM a quarter note is 0.5 s. The second attack lands exactly
    // one quarter note after the first, regardless of the audible trim.
    assert_eq!(schedule.notes[0].attack_offset, 0.0);
    assert_eq!(schedule.notes[1].attack_offset, 0.5);
    assert_eq!(schedule.length, 1.0);
}

#[test]
fn test_schedule_audible_trim() {
    let notes = vec![quarter("C4")];
    let schedule = build_schedule(&notes, Tempo::new(120));

    // Audible portion is 90% of the 0.5 s length
    assert!((schedule.notes[0].release_offset - 0.45).abs() < 1e-9);
}

#[test]
fn test_schedule_dotted_lengthens_by_half() {
    let notes = vec![
        NoteEvent {
            pitch: "C4".to_string(),
            duration: DurationClass::Half,
            dotted: true,
        },
        quarter("D4"),
    ];
    let schedule = build_schedule(&notes, Tempo::new(120));

    // Dotted half at 120 BPM: 2 beats * 0.5 s * 1.5 = 1.5 s
    assert_eq!(schedule.notes[1].attack_offset, 1.5);
}

#[test]
fn test_schedule_mixed_durations() {
    let notes = vec![
        NoteEvent {
            pitch: "C4".to_string(),
            duration: DurationClass::Half,
            dotted: false,
        },
        NoteEvent {
            pitch: "D4".to_string(),
            duration: DurationClass::Eighth,
            dotted: false,
        },
        NoteEvent {
            pitch: "E4".to_string(),
            duration: DurationClass::Eighth,
            dotted: false,
        },
        quarter("F4"),
    ];
    let schedule = build_schedule(&notes, Tempo::new(120));

    assert_eq!(schedule.notes[0].attack_offset, 0.0);
    assert_eq!(schedule.notes[1].attack_offset, 1.0);
    assert_eq!(schedule.notes[2].attack_offset, 1.25);
    assert_eq!(schedule.notes[3].attack_offset, 1.5);
    assert_eq!(schedule.length, 2.0);
}

#[test]
fn test_schedule_invariants_hold_across_tempi() {
    let notes = vec![
        quarter("C4"),
        NoteEvent {
            pitch: "D4".to_string(),
            duration: DurationClass::Sixteenth,
            dotted: true,
        },
        NoteEvent {
            pitch: "E4".to_string(),
            duration: DurationClass::Whole,
            dotted: false,
        },
    ];
    for bpm in [40u16, 97, 120, 208] {
        let schedule = build_schedule(&notes, Tempo::new(bpm));
        let mut last_attack = 0.0;
        for entry in &schedule.notes {
            assert!(entry.attack_offset >= last_attack);
            assert!(entry.release_offset >= entry.attack_offset);
            last_attack = entry.attack_offset;
        }
    }
}

#[test]
fn test_tempo_clamps_to_range() {
    assert_eq!(Tempo::new(39).bpm(), 40);
    assert_eq!(Tempo::new(40).bpm(), 40);
    assert_eq!(Tempo::new(208).bpm(), 208);
    assert_eq!(Tempo::new(209).bpm(), 208);
}

#[test]
fn test_player_walks_the_state_machine() {
    let mut player = Player::new(FakeSynth::default());
    assert_eq!(player.state(), PlayerState::Idle);

    player.play(&[quarter("C4"), quarter("D4")], 0.0);
    assert_eq!(player.state(), PlayerState::Scheduled);
    assert!(player.schedule().is_some());

    player.tick(0.0);
    assert_eq!(player.state(), PlayerState::Playing);
    assert_eq!(player.active_keys(), ["C4"]);

    // Past the final clear-all margin: natural completion
    player.tick(10.0);
    assert_eq!(player.state(), PlayerState::Idle);
    assert!(player.schedule().is_none());
    assert!(player.active_keys().is_empty());
}

#[test]
fn test_player_fires_attacks_in_sequence_order() {
    let mut player = Player::new(FakeSynth::default());
    player.play(&[quarter("C4"), quarter("D4"), quarter("E4")], 0.0);
    player.tick(10.0);

    // All events fired in one tick; attack order must follow the sequence
    let on_order: Vec<&str> = player
        .synth()
        .calls
        .iter()
        .filter(|c| c.starts_with("on "))
        .map(String::as_str)
        .collect();
    assert_eq!(on_order, ["on C4", "on D4", "on E4"]);
}

#[test]
fn test_stop_when_idle_is_a_no_op() {
    let mut player = Player::new(FakeSynth::default());
    player.stop();
    assert_eq!(player.state(), PlayerState::Idle);
    assert!(player.active_keys().is_empty());

    // And stop twice in a row is still fine
    player.stop();
    assert!(player.active_keys().is_empty());
}

#[test]
fn test_stop_cancels_pending_events() {
    let mut player = Player::new(FakeSynth::default());
    player.play(&[quarter("C4"), quarter("D4")], 0.0);
    player.tick(0.0);
    assert_eq!(player.active_keys(), ["C4"]);

    player.stop();
    assert_eq!(player.state(), PlayerState::Stopped);
    assert!(player.active_keys().is_empty());
    assert!(player.schedule().is_none());

    // Stale callbacks must never fire after cancellation
    player.tick(10.0);
    let on_count = player.synth().calls.iter().filter(|c| *c == "on D4").count();
    assert_eq!(on_count, 0);
}

#[test]
fn test_replay_discards_prior_schedule_first() {
    let mut player = Player::new(FakeSynth::default());
    player.play(&[quarter("C4"), quarter("D4")], 0.0);
    player.tick(0.0);

    // New play at t=0.1: implicit stop-before-play
    player.play(&[quarter("E4")], 0.1);
    assert_eq!(player.state(), PlayerState::Scheduled);
    player.tick(10.0);

    // The old schedule's second note never sounds
    assert_eq!(player.synth().calls.iter().filter(|c| *c == "on D4").count(), 0);
    assert_eq!(player.synth().calls.iter().filter(|c| *c == "on E4").count(), 1);
    assert_eq!(player.state(), PlayerState::Idle);
}

#[test]
fn test_failed_audio_init_drops_the_request() {
    let mut player = Player::new(FakeSynth {
        fail_start: true,
        ..FakeSynth::default()
    });
    player.play(&[quarter("C4")], 0.0);
    assert_eq!(player.state(), PlayerState::Idle);
    assert!(player.schedule().is_none());

    player.play_note("C4", 0.0);
    assert!(player.active_keys().is_empty());
}

#[test]
fn test_single_note_highlight_auto_clears() {
    let mut player = Player::new(FakeSynth::default());
    player.play_note("E4", 0.0);
    assert_eq!(player.active_keys(), ["E4"]);

    // Before the fixed 0.2 s clear delay
    player.tick(0.1);
    assert_eq!(player.active_keys(), ["E4"]);

    player.tick(0.3);
    assert!(player.active_keys().is_empty());
}

#[test]
fn test_chord_highlight_clears_after_longer_delay() {
    let mut player = Player::new(FakeSynth::default());
    let chord = vec!["C4".to_string(), "E4".to_string(), "G4".to_string()];
    player.play_chord(&chord, 0.0);
    assert_eq!(player.active_keys(), ["C4", "E4", "G4"]);

    // Still held past the single-note delay
    player.tick(0.5);
    assert_eq!(player.active_keys(), ["C4", "E4", "G4"]);

    player.tick(1.1);
    assert!(player.active_keys().is_empty());
}

#[test]
fn test_metronome_clicks_at_quarter_note_intervals() {
    let mut player = Player::new(FakeSynth::default());
    player.set_tempo(120);
    player.toggle_metronome(0.0);

    // Clicks at 0.0, 0.5, 1.0
    player.tick(1.0);
    assert_eq!(player.synth().calls.iter().filter(|c| *c == "click").count(), 3);

    player.toggle_metronome(1.0);
    player.tick(5.0);
    assert_eq!(player.synth().calls.iter().filter(|c| *c == "click").count(), 3);
}

#[test]
fn test_metronome_tempo_change_rescales_pending_click() {
    let mut player = Player::new(FakeSynth::default());
    player.set_tempo(120);
    player.toggle_metronome(0.0);
    player.tick(0.0); // click at 0.0

    // Halving the tempo moves the pending click from 0.5 to 1.0
    player.set_tempo(60);
    player.tick(0.5);
    assert_eq!(player.synth().calls.iter().filter(|c| *c == "click").count(), 1);
    player.tick(0.9);
    assert_eq!(player.synth().calls.iter().filter(|c| *c == "click").count(), 1);
    player.tick(1.0);
    assert_eq!(player.synth().calls.iter().filter(|c| *c == "click").count(), 2);
}

#[test]
fn test_metronome_is_decoupled_from_playback() {
    let mut player = Player::new(FakeSynth::default());
    player.set_tempo(120);
    player.toggle_metronome(0.0);
    player.play(&[quarter("C4")], 0.0);

    player.stop();
    // Stopping playback does not silence the metronome
    assert!(player.metronome_on());
    player.tick(0.5);
    assert_eq!(player.synth().calls.iter().filter(|c| *c == "click").count(), 2);
}
