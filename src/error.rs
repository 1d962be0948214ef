//! # Error Types
//!
//! This module defines all error types for the clavier core.
//!
//! Every failure is caught at the boundary where it occurs and converted into
//! a user-visible status message; none of these should ever escape as an
//! unhandled fault that crashes the interaction.
//!
//! ## Error Kinds
//! - `ParseError` - malformed or unsupported score document
//! - `ArchiveError` - no usable document inside a compressed container
//! - `RenderError` - the notation renderer rejected the document
//! - `AudioInitError` - the sound engine failed to start
//! - `UpstreamError` - the chat/analysis call failed or returned malformed data
//!
//! ## Usage
//! ```rust
//! use clavier::{parse_score, ClavierError};
//!
//! match parse_score("<bogus/>") {
//!     Ok(score) => println!("{} notes", score.notes.len()),
//!     Err(ClavierError::ParseError { message }) => {
//!         eprintln!("Parse error: {}", message);
//!     }
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClavierError {
    /// Malformed or unsupported score document.
    ///
    /// Occurs when the XML is not well formed, when the document lacks a
    /// `score-partwise`/`score-timewise` root, or when an uploaded file has
    /// an extension the loader does not recognize.
    ///
    /// # Example
    /// ```
    /// # use clavier::ClavierError;
    /// let err = ClavierError::ParseError {
    ///     message: "missing score-partwise or score-timewise root".to_string(),
    /// };
    /// assert_eq!(
    ///     err.to_string(),
    ///     "Parse error: missing score-partwise or score-timewise root"
    /// );
    /// ```
    #[error("Parse error: {message}")]
    ParseError { message: String },

    /// A compressed score container held no usable MusicXML entry.
    ///
    /// Raised when neither the `META-INF/container.xml` manifest nor the
    /// fallback scan for `.xml`/`.musicxml` entries resolves a root document.
    #[error("Archive error: {0}")]
    ArchiveError(String),

    /// The notation renderer rejected the document.
    ///
    /// Surfaced to the user as inline error text; any previously rendered
    /// notation is cleared first.
    #[error("Render error: {0}")]
    RenderError(String),

    /// The sound engine failed to start.
    ///
    /// The triggering request is dropped and logged as a warning; it never
    /// crashes the interaction.
    #[error("Audio init error: {0}")]
    AudioInitError(String),

    /// The chat/analysis call failed or returned malformed data.
    ///
    /// Covers a missing API credential, a non-2xx upstream status, and
    /// responses without the expected fields.
    #[error("Upstream error: {0}")]
    UpstreamError(String),
}
