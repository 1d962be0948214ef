//! # MXL Archive Loader
//!
//! A compressed MusicXML score (`.mxl`) is a zip container. The root
//! document is located in two steps:
//!
//! 1. Prefer the path declared by the `META-INF/container.xml` manifest
//!    (`<rootfile full-path="...">`), when that entry actually exists.
//! 2. Fall back to the first entry whose name ends in `.xml` or
//!    `.musicxml` and is not under the reserved `META-INF/` directory.
//!
//! If neither resolves, the container is unusable and the loader fails with
//! an [`ClavierError::ArchiveError`].

use std::io::{Cursor, Read};

use roxmltree::Document;
use zip::ZipArchive;

use crate::error::ClavierError;

type Mxl<'a> = ZipArchive<Cursor<&'a [u8]>>;

fn open(bytes: &[u8]) -> Result<Mxl<'_>, ClavierError> {
    ZipArchive::new(Cursor::new(bytes)).map_err(|e| ClavierError::ArchiveError(e.to_string()))
}

/// Path declared by the manifest, if it names an existing entry.
fn manifest_root(archive: &mut Mxl<'_>) -> Option<String> {
    let container_xml = {
        let mut entry = archive.by_name("META-INF/container.xml").ok()?;
        let mut xml = String::new();
        entry.read_to_string(&mut xml).ok()?;
        xml
    };

    let doc = Document::parse(&container_xml).ok()?;
    let full_path = doc
        .descendants()
        .find(|n| n.has_tag_name("rootfile"))
        .and_then(|n| n.attribute("full-path"))?
        .to_string();

    if archive.by_name(&full_path).is_ok() {
        Some(full_path)
    } else {
        None
    }
}

/// First non-metadata entry that looks like a MusicXML document.
fn first_xml_entry(archive: &Mxl<'_>) -> Option<String> {
    archive.file_names().map(str::to_string).find(|name| {
        let lower = name.to_ascii_lowercase();
        (lower.ends_with(".xml") || lower.ends_with(".musicxml"))
            && !lower.starts_with("meta-inf/")
    })
}

fn locate(archive: &mut Mxl<'_>) -> Result<String, ClavierError> {
    if let Some(path) = manifest_root(archive) {
        return Ok(path);
    }
    first_xml_entry(archive).ok_or_else(|| {
        ClavierError::ArchiveError("no root MusicXML document found in container".to_string())
    })
}

/// Locate the root MusicXML entry inside an MXL container.
///
/// Prefers the manifest-declared path, then falls back to the first
/// top-level `.xml`/`.musicxml` entry outside `META-INF/`.
pub fn locate_root_document(bytes: &[u8]) -> Result<String, ClavierError> {
    let mut archive = open(bytes)?;
    locate(&mut archive)
}

/// Decompress the root MusicXML document out of an MXL container.
pub fn read_root_document(bytes: &[u8]) -> Result<String, ClavierError> {
    let mut archive = open(bytes)?;
    let path = locate(&mut archive)?;

    let mut entry = archive
        .by_name(&path)
        .map_err(|e| ClavierError::ArchiveError(e.to_string()))?;
    let mut xml = String::new();
    entry
        .read_to_string(&mut xml)
        .map_err(|e| ClavierError::ArchiveError(e.to_string()))?;
    Ok(xml)
}
