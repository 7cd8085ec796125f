//! Writes flattened deliveries as a UTF-8 CSV table.
//!
//! The header row is always written, even for an empty slice. Integer columns
//! (`over`, `runs_total`, ...) are already typed on [`FlatDeliveryRecord`], so
//! no coercion pass is needed here; absent values become empty cells.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{error, info};

use crate::flatten::{FlatDeliveryRecord, COLUMNS};

#[derive(Debug, thiserror::Error)]
pub enum AssembleError {
    #[error("failed to prepare {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush CSV output: {0}")]
    Flush(#[source] std::io::Error),
    #[error("failed to move finished CSV into {}: {source}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: tempfile::PersistError,
    },
}

/// Streams the header and every record into `out`, returning the writer.
pub fn write_csv<W: Write>(records: &[FlatDeliveryRecord], out: W) -> Result<W, AssembleError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(out);
    writer.write_record(COLUMNS)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer
        .into_inner()
        .map_err(|e| AssembleError::Flush(e.into_error()))
}

/// Writes `records` to `path` through a temporary file in the same directory,
/// so a failed run leaves no partial output behind. Returns the row count.
pub fn write_dataset(records: &[FlatDeliveryRecord], path: &Path) -> Result<usize, AssembleError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let io_err = |source: std::io::Error| AssembleError::Io {
        path: dir.clone(),
        source,
    };

    fs::create_dir_all(&dir).map_err(io_err)?;
    let tmp = NamedTempFile::new_in(&dir).map_err(io_err)?;
    let tmp = write_csv(records, tmp)?;

    tmp.persist(path).map_err(|e| {
        error!(error = %e, path = %path.display(), "Failed to persist CSV output");
        AssembleError::Persist {
            path: path.to_path_buf(),
            source: e,
        }
    })?;

    info!(path = %path.display(), rows = records.len(), "Wrote ball-by-ball CSV");
    Ok(records.len())
}
