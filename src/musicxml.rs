//! # MusicXML Score Parser
//!
//! Converts a raw MusicXML document into an ordered sequence of playable
//! note events plus the set of chord symbols encountered.
//!
//! ## Reading Model
//! The walk goes parts → measures → notes in document order and flattens
//! everything into one sequential, monophonic stream. Multi-part scores
//! collapse into a single timeline in part-then-measure order; no
//! time-aligned voice merging is attempted. This is a deliberate
//! simplification for the single-keyboard playback the app drives.
//!
//! ## Per-note Rules
//! - Rests are skipped and never produce a [`NoteEvent`].
//! - Notes without `<pitch>` are skipped.
//! - Pitch spelling is `step + accidental + octave`; `<alter>` of `1` maps
//!   to `#`, `-1` to `b`. Other alteration values are flagged and carry no
//!   accidental (only single-step alterations are recognized).
//! - `<type>` maps to a duration class via a fixed table; missing or
//!   unrecognized types default to quarter.
//! - `<dot/>` presence sets the dotted flag.
//!
//! ## Chord Symbols
//! Every emitted pitch name joins the chord-symbol set, as does every
//! `<harmony>` annotation (rendered from its root and kind). The set is
//! duplicate-free and preserves first-appearance order.

use std::collections::HashSet;

use roxmltree::{Document, Node};
use tracing::warn;

use crate::error::ClavierError;
use crate::score::{DurationClass, NoteEvent, ParsedScore};

/// Parse a MusicXML document into a linear note sequence and chord set.
///
/// Fails with [`ClavierError::ParseError`] when the XML is malformed or the
/// document has no `score-partwise`/`score-timewise` root. A `score-timewise`
/// document is accepted but carries no top-level `<part>` children, so it
/// parses to an empty sequence.
///
/// # Example
/// ```
/// use clavier::parse_score;
///
/// let xml = r#"<score-partwise><part id="P1"><measure number="1">
///   <note><pitch><step>C</step><octave>4</octave></pitch><type>quarter</type></note>
///   <note><rest/><type>quarter</type></note>
/// </measure></part></score-partwise>"#;
///
/// let score = parse_score(xml).unwrap();
/// assert_eq!(score.notes.len(), 1);
/// assert_eq!(score.notes[0].pitch, "C4");
/// assert_eq!(score.chords, vec!["C4"]);
/// ```
pub fn parse_score(xml: &str) -> Result<ParsedScore, ClavierError> {
    let doc = Document::parse(xml).map_err(|e| ClavierError::ParseError {
        message: e.to_string(),
    })?;

    let root = doc.root_element();
    if !root.has_tag_name("score-partwise") && !root.has_tag_name("score-timewise") {
        return Err(ClavierError::ParseError {
            message: "missing score-partwise or score-timewise root".to_string(),
        });
    }

    let mut notes = Vec::new();
    let mut chords = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for part in root
        .children()
        .filter(|n| n.is_element() && n.has_tag_name("part"))
    {
        for measure in part
            .children()
            .filter(|n| n.is_element() && n.has_tag_name("measure"))
        {
            for element in measure.children().filter(|n| n.is_element()) {
                if element.has_tag_name("harmony") {
                    if let Some(symbol) = harmony_symbol(&element) {
                        add_chord(&mut chords, &mut seen, symbol);
                    }
                } else if element.has_tag_name("note") {
                    if let Some(event) = parse_note(&element) {
                        add_chord(&mut chords, &mut seen, event.pitch.clone());
                        notes.push(event);
                    }
                }
            }
        }
    }

    if notes.is_empty() && root.has_tag_name("score-timewise") {
        warn!("score-timewise document parsed to an empty sequence");
    }

    Ok(ParsedScore { notes, chords })
}

fn add_chord(chords: &mut Vec<String>, seen: &mut HashSet<String>, symbol: String) {
    if seen.insert(symbol.clone()) {
        chords.push(symbol);
    }
}

fn child<'a, 'input>(node: &Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|n| n.is_element() && n.has_tag_name(name))
}

fn child_text<'a, 'input>(node: &Node<'a, 'input>, name: &str) -> Option<&'a str> {
    child(node, name).and_then(|n| n.text()).map(str::trim)
}

/// Parse one `<note>` element. Returns `None` for rests and pitchless notes.
fn parse_note(note: &Node<'_, '_>) -> Option<NoteEvent> {
    if child(note, "rest").is_some() {
        return None;
    }
    let pitch = child(note, "pitch")?;

    let step = child_text(&pitch, "step")?;
    let octave = child_text(&pitch, "octave")?;

    let accidental = match child_text(&pitch, "alter").map(str::parse::<i32>) {
        Some(Ok(1)) => "#",
        Some(Ok(-1)) => "b",
        Some(Ok(other)) => {
            // Only single-step alterations are recognized
            warn!(alter = other, step, octave, "unsupported alteration dropped");
            ""
        }
        Some(Err(_)) | None => "",
    };

    let duration = child_text(note, "type")
        .map(DurationClass::from_musicxml_type)
        .unwrap_or(DurationClass::Quarter);

    Some(NoteEvent {
        pitch: format!("{}{}{}", step, accidental, octave),
        duration,
        dotted: child(note, "dot").is_some(),
    })
}

/// Render a `<harmony>` annotation as a chord symbol string.
///
/// Prefers the `<kind text="...">` spelling when present, otherwise maps the
/// common kind names to their conventional suffixes. Unknown kinds keep the
/// bare root.
fn harmony_symbol(harmony: &Node<'_, '_>) -> Option<String> {
    let root = child(harmony, "root")?;
    let step = child_text(&root, "root-step")?;
    let accidental = match child_text(&root, "root-alter").map(str::parse::<i32>) {
        Some(Ok(1)) => "#",
        Some(Ok(-1)) => "b",
        _ => "",
    };

    let kind = child(harmony, "kind");
    let suffix = match kind {
        Some(k) => {
            if let Some(text) = k.attribute("text") {
                text.to_string()
            } else {
                match k.text().map(str::trim).unwrap_or("") {
                    "major" | "" => "",
                    "minor" => "m",
                    "dominant" => "7",
                    "major-seventh" => "maj7",
                    "minor-seventh" => "m7",
                    _ => "",
                }
                .to_string()
            }
        }
        None => String::new(),
    };

    Some(format!("{}{}{}", step, accidental, suffix))
}
