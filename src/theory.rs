//! Chord theory lookup
//!
//! Resolves chord symbols (C, Am, G7, Ebmaj7, ...) into their constituent
//! pitch classes at a fixed reference octave, for on-screen key highlighting
//! and chord playback.

use serde::Serialize;

/// The 12-tone pitch-class cycle using sharp spellings as canonical names.
const PITCH_CLASSES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// All chord notes are rendered in this octave.
const REFERENCE_OCTAVE: u8 = 4;

/// Chord quality derived from the symbol's modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Major,
    Minor,
}

/// Result of resolving a chord symbol.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChordTheory {
    /// Canonical (sharp-spelled) root pitch class, e.g. `"A#"` for a `Bb` root.
    pub root: String,
    pub quality: Quality,
    /// Constituent notes at the reference octave: root, third, fifth, and a
    /// seventh when the modifier asks for one.
    pub notes: Vec<String>,
}

fn pitch_class_index(name: &str) -> Option<usize> {
    PITCH_CLASSES.iter().position(|pc| *pc == name)
}

fn pitch_at(index: usize) -> String {
    format!("{}{}", PITCH_CLASSES[index % 12], REFERENCE_OCTAVE)
}

/// Resolve a chord symbol into its root, quality, and constituent notes.
///
/// The symbol splits into a root letter (plus a second `#`/`b` character when
/// present) and a modifier substring. The quality is minor iff the modifier
/// starts with `m` but not `maj`; a flat root normalizes to its sharp-spelled
/// equivalent. Returns `None` when the root cannot be resolved.
///
/// Deliberately total over this grammar: modifiers it does not understand
/// (`sus4`, `dim`, `add9`, ...) degrade to a triad or seventh approximation
/// rather than failing.
///
/// # Supported Modifiers
/// - `` (empty), anything non-minor → major triad
/// - `m`, `min`, `m7`, ... (not `maj`) → minor triad
/// - contains `7` → adds a minor seventh (+10 semitones)
/// - contains `maj7` → adds a major seventh (+11 semitones)
///
/// # Example
/// ```
/// use clavier::{analyze_chord, Quality};
///
/// let dm7 = analyze_chord("Dm7").unwrap();
/// assert_eq!(dm7.quality, Quality::Minor);
/// assert_eq!(dm7.notes, vec!["D4", "F4", "A4", "C4"]);
///
/// let eb = analyze_chord("Eb").unwrap();
/// assert_eq!(eb.root, "D#");
/// ```
pub fn analyze_chord(symbol: &str) -> Option<ChordTheory> {
    let symbol = symbol.trim();
    if symbol.is_empty() {
        return None;
    }

    let chars: Vec<char> = symbol.chars().collect();
    let (root_len, has_accidental) = if chars.len() > 1 && (chars[1] == '#' || chars[1] == 'b') {
        (2, true)
    } else {
        (1, false)
    };
    let modifier: String = chars[root_len..].iter().collect();

    let modifier_lower = modifier.to_ascii_lowercase();
    let quality = if modifier_lower.starts_with('m') && !modifier_lower.starts_with("maj") {
        Quality::Minor
    } else {
        Quality::Major
    };

    // Normalize the root into the sharp-spelled pitch-class cycle. A flat
    // root drops one semitone from its natural letter. Splitting on chars
    // keeps a non-ASCII first character unresolvable instead of a slice
    // panic.
    let letter = chars[0].to_ascii_uppercase().to_string();
    let root_index = if has_accidental && chars[1] == 'b' {
        let natural = pitch_class_index(&letter)?;
        (natural + 11) % 12
    } else if has_accidental {
        pitch_class_index(&format!("{}#", letter))?
    } else {
        pitch_class_index(&letter)?
    };

    let third_interval = match quality {
        Quality::Major => 4,
        Quality::Minor => 3,
    };

    let mut notes = vec![
        pitch_at(root_index),
        pitch_at(root_index + third_interval),
        pitch_at(root_index + 7),
    ];

    if modifier_lower.contains("maj7") {
        notes.push(pitch_at(root_index + 11));
    } else if modifier_lower.contains('7') {
        notes.push(pitch_at(root_index + 10));
    }

    Some(ChordTheory {
        root: PITCH_CLASSES[root_index].to_string(),
        quality,
        notes,
    })
}

/// Constituent notes for a chord symbol, or an empty list when the root
/// cannot be resolved. Convenience wrapper over [`analyze_chord`].
///
/// # Example
/// ```
/// use clavier::chord_notes;
///
/// assert_eq!(chord_notes("C"), vec!["C4", "E4", "G4"]);
/// assert_eq!(chord_notes("Cm"), vec!["C4", "D#4", "G4"]);
/// assert!(chord_notes("H").is_empty());
/// ```
pub fn chord_notes(symbol: &str) -> Vec<String> {
    analyze_chord(symbol).map(|c| c.notes).unwrap_or_default()
}
