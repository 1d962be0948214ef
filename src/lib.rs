//! # clavier
//!
//! The core of a piano-learning app: parse MusicXML/MXL sheet music into a
//! playable note sequence, resolve chord symbols through interval rules, and
//! schedule synchronized audio playback and on-screen key highlighting.
//!
//! ## Pipeline
//! 1. [`load_score`] - decompress (if MXL) and parse an uploaded document
//! 2. [`build_schedule`] / [`Player`] - timed playback with highlight sync
//! 3. [`chord_notes`] - chord theory lookup for the extracted symbol set
//!
//! The notation renderer, the audio voice engine, and the chat endpoint are
//! external collaborators behind narrow interfaces (`notation`, `playback`,
//! and `chat` modules respectively).

pub mod archive;
pub mod chat;
pub mod error;
pub mod musicxml;
pub mod notation;
pub mod playback;
pub mod score;
pub mod theory;

pub use error::ClavierError;
pub use musicxml::parse_score;
pub use notation::{NotationRenderer, SheetView};
pub use playback::{
    build_schedule, PlaybackSchedule, Player, PlayerState, ScheduledNote, Synth, Tempo,
};
pub use score::{DurationClass, LoadedScore, NoteEvent, ParsedScore};
pub use theory::{analyze_chord, chord_notes, ChordTheory, Quality};

/// Load an uploaded score file into its raw XML and parsed form.
///
/// Dispatches on the file extension: `.mxl` goes through the archive loader,
/// `.xml`/`.musicxml` are read as text, anything else is rejected. The raw
/// XML is kept alongside the parsed score for the notation renderer and as
/// chat context.
///
/// On any failure the caller gets an error and no partial state; previously
/// displayed notation and playback data must be cleared by the caller.
///
/// # Example
/// ```
/// use clavier::load_score;
///
/// let xml = br#"<score-partwise><part id="P1"><measure number="1">
///   <note><pitch><step>A</step><octave>4</octave></pitch><type>half</type></note>
/// </measure></part></score-partwise>"#;
///
/// let loaded = load_score("piece.xml", xml).unwrap();
/// assert_eq!(loaded.score.notes[0].pitch, "A4");
/// ```
pub fn load_score(file_name: &str, bytes: &[u8]) -> Result<LoadedScore, ClavierError> {
    let extension = std::path::Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let xml = match extension.as_str() {
        "mxl" => archive::read_root_document(bytes)?,
        "xml" | "musicxml" => String::from_utf8(bytes.to_vec()).map_err(|_| {
            ClavierError::ParseError {
                message: "document is not valid UTF-8".to_string(),
            }
        })?,
        _ => {
            return Err(ClavierError::ParseError {
                message: "Unsupported file type. Please upload .mxl, .xml, or .musicxml"
                    .to_string(),
            })
        }
    };

    let score = parse_score(&xml)?;
    Ok(LoadedScore { xml, score })
}
