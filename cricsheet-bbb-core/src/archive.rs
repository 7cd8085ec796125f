//! Iterates the `.json` entries of an in-memory zip archive and decodes each
//! one into a [`MatchDocument`].
//!
//! A broken archive is fatal. A broken entry is not: it is handed to the
//! visitor as an `Err` so the caller can record it and move on.

use std::io::{Cursor, Read};
use std::ops::ControlFlow;

use tracing::{debug, warn};
use zip::ZipArchive;

use crate::document::{parse_document, DocumentError, MatchDocument};

#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("not a readable zip archive: {0}")]
    Zip(#[from] zip::result::ZipError),
}

#[derive(Debug, thiserror::Error)]
pub enum EntryError {
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error("unreadable archive entry: {0}")]
    Io(#[from] std::io::Error),
    #[error("unreadable archive entry: {0}")]
    Zip(#[from] zip::result::ZipError),
}

#[derive(Debug)]
pub struct ArchiveEntry {
    pub name: String,
    pub document: Result<MatchDocument, EntryError>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// `.json` entries handed to the visitor.
    pub entries: usize,
    pub stopped_early: bool,
}

/// Calls `visit` for every `.json` entry, in archive order, until it returns
/// `ControlFlow::Break`.
pub fn scan_archive<F>(bytes: &[u8], mut visit: F) -> Result<ScanSummary, ArchiveError>
where
    F: FnMut(ArchiveEntry) -> ControlFlow<()>,
{
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    debug!(entries = archive.len(), "Opened match archive");

    let mut summary = ScanSummary::default();
    for index in 0..archive.len() {
        let entry = match archive.by_index(index) {
            Ok(mut file) => {
                let name = file.name().to_string();
                if !name.ends_with(".json") {
                    debug!(entry = %name, "Skipping non-JSON archive entry");
                    continue;
                }
                let document = read_entry(&mut file);
                ArchiveEntry { name, document }
            }
            Err(e) => {
                warn!(index, error = %e, "Failed to open archive entry");
                ArchiveEntry {
                    name: format!("entry #{index}"),
                    document: Err(EntryError::Zip(e)),
                }
            }
        };

        summary.entries += 1;
        if visit(entry).is_break() {
            summary.stopped_early = true;
            break;
        }
    }
    Ok(summary)
}

fn read_entry<R: Read>(file: &mut R) -> Result<MatchDocument, EntryError> {
    let mut buf = Vec::new();
    file.read_to_end(&mut buf)?;
    Ok(parse_document(&buf)?)
}
