//! # Score Data Model
//!
//! Types produced by the score parser and consumed by the playback engine.
//!
//! ## Type Hierarchy
//! ```text
//! ParsedScore
//!   ├── Vec<NoteEvent>
//!   │     ├── pitch: String ("C#4")
//!   │     ├── duration: DurationClass (whole..sixteenth)
//!   │     └── dotted: bool
//!   └── chords: Vec<String>  (unique symbols, first-seen order)
//! ```
//!
//! ## Key Concepts
//!
//! ### Duration Classes
//! Every written note type resolves to one of five canonical classes; an
//! unrecognized or missing type defaults to `Quarter`. Duration in beats is
//! fixed per class (whole = 4 beats .. sixteenth = 0.25) and a dotted note
//! is worth 1.5x its base class.
//!
//! ### Sequential Reading
//! The parser flattens all parts and measures into one monophonic timeline
//! in part-then-measure order. No per-voice separation is modeled, and rests
//! never appear as `NoteEvent`s.
//!
//! ## Related Modules
//! - `musicxml` - produces these types from a MusicXML document
//! - `playback` - turns them into a timed schedule

use serde::Serialize;

/// Canonical note duration classes.
///
/// Any written type outside this set (breve, 32nd, grace, missing) maps to
/// `Quarter`, keeping the mapping total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationClass {
    Whole,
    Half,
    Quarter,
    Eighth,
    Sixteenth,
}

impl DurationClass {
    /// Duration in quarter-note beats.
    pub fn as_beats(self) -> f64 {
        match self {
            DurationClass::Whole => 4.0,
            DurationClass::Half => 2.0,
            DurationClass::Quarter => 1.0,
            DurationClass::Eighth => 0.5,
            DurationClass::Sixteenth => 0.25,
        }
    }

    /// Map a MusicXML `<type>` value to a duration class.
    ///
    /// Total: unrecognized values fall back to `Quarter`.
    ///
    /// # Example
    /// ```
    /// use clavier::DurationClass;
    ///
    /// assert_eq!(DurationClass::from_musicxml_type("16th"), DurationClass::Sixteenth);
    /// assert_eq!(DurationClass::from_musicxml_type("breve"), DurationClass::Quarter);
    /// ```
    pub fn from_musicxml_type(value: &str) -> Self {
        match value {
            "whole" => DurationClass::Whole,
            "half" => DurationClass::Half,
            "quarter" => DurationClass::Quarter,
            "eighth" => DurationClass::Eighth,
            "16th" => DurationClass::Sixteenth,
            _ => DurationClass::Quarter,
        }
    }
}

/// A single playable note in score order.
///
/// Immutable once created. `pitch` is spelled `step + accidental + octave`
/// (e.g. `"C#4"`, `"Bb3"`); `dotted` lengthens the duration class by half.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NoteEvent {
    pub pitch: String,
    pub duration: DurationClass,
    pub dotted: bool,
}

/// Result of parsing a MusicXML document.
///
/// `notes` is the linear monophonic reading of the score; `chords` is the
/// duplicate-free set of chord symbols in first-appearance order, gathered
/// from literal pitch spellings and `<harmony>` annotations.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ParsedScore {
    pub notes: Vec<NoteEvent>,
    pub chords: Vec<String>,
}

/// A raw document plus its parsed form, as handed to the UI after upload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadedScore {
    /// The decompressed MusicXML text, kept for the notation renderer and
    /// as chat context.
    pub xml: String,
    pub score: ParsedScore,
}
