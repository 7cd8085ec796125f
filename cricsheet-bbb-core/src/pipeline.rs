//! High-level pipeline: fetch → scan → filter → flatten → write.
//!
//! This module provides the top-level orchestration for one extraction run:
//!   - Fetches the archive through an [`ArchiveFetcher`]
//!   - Scans every match document on a blocking worker thread
//!   - Keeps the documents accepted by the [`MatchFilter`] and flattens them
//!   - Writes the dataset through [`crate::assemble::write_dataset`], also on a
//!     blocking worker thread
//!   - Returns a [`PipelineReport`] describing what was kept and what was skipped
//!
//! # Error Handling
//! Per-document problems (malformed JSON, unreadable dates) are recorded in the
//! report and never abort the run. Fetch, archive and write failures do. A run
//! that accepts no match at all fails with [`PipelineError::NoMatchingMatches`]
//! and writes nothing.

use std::collections::BTreeMap;
use std::ops::ControlFlow;
use std::path::PathBuf;

use chrono::NaiveDate;
use sha2::{Digest, Sha256};
use tracing::{debug, error, info, warn};

use crate::archive::{scan_archive, ArchiveEntry, ArchiveError};
use crate::assemble::{write_dataset, AssembleError};
use crate::config::{PipelineConfig, SeriesConfig};
use crate::contract::{ArchiveFetcher, FetchError};
use crate::filter::{unparseable_dates, FilterVerdict, MatchFilter, RejectReason};
use crate::flatten::{flatten, FlatDeliveryRecord};

const PROGRESS_EVERY: usize = 1000;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Archive(#[from] ArchiveError),
    #[error(
        "no {match_type} matches between {teams} found in {start}..={end} \
         ({scanned} archive entries scanned); widen the date window or check the team names"
    )]
    NoMatchingMatches {
        teams: String,
        match_type: String,
        start: NaiveDate,
        end: NaiveDate,
        scanned: usize,
    },
    #[error(transparent)]
    Assemble(#[from] AssembleError),
    #[error("archive scan task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    pub entry: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateWarning {
    pub entry: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineReport {
    pub archive_origin: String,
    pub archive_bytes: usize,
    pub archive_sha256: String,
    pub entries_scanned: usize,
    pub stopped_early: bool,
    pub accepted_entries: Vec<String>,
    pub rejected: BTreeMap<RejectReason, usize>,
    pub malformed: Vec<SkippedEntry>,
    pub date_warnings: Vec<DateWarning>,
    pub deliveries: usize,
    pub output_path: Option<PathBuf>,
}

impl PipelineReport {
    pub fn matches_accepted(&self) -> usize {
        self.accepted_entries.len()
    }

    pub fn rejected_for(&self, reason: RejectReason) -> usize {
        self.rejected.get(&reason).copied().unwrap_or(0)
    }
}

/// Flattened records of every accepted match, in archive order.
#[derive(Debug)]
pub struct Dataset {
    pub records: Vec<FlatDeliveryRecord>,
    pub report: PipelineReport,
}

/// Filters and flattens every document of an in-memory archive.
pub fn scan_and_flatten(
    bytes: &[u8],
    filter: &MatchFilter,
) -> Result<Dataset, ArchiveError> {
    let mut records = Vec::new();
    let mut report = PipelineReport::default();
    let expected = filter.series().expected_matches();
    let mut seen = 0usize;

    let summary = scan_archive(bytes, |entry: ArchiveEntry| {
        seen += 1;
        if seen % PROGRESS_EVERY == 0 {
            info!(scanned = seen, accepted = report.accepted_entries.len(), "Scanning matches");
        }

        let ArchiveEntry { name, document } = entry;
        let document = match document {
            Ok(doc) => doc,
            Err(e) => {
                warn!(entry = %name, error = %e, "Skipping malformed match document");
                report.malformed.push(SkippedEntry {
                    entry: name,
                    reason: e.to_string(),
                });
                return ControlFlow::Continue(());
            }
        };

        match filter.evaluate(&document.info) {
            FilterVerdict::Accepted => {
                let batch = flatten(&document);
                debug!(entry = %name, deliveries = batch.len(), "Accepted match");
                records.extend(batch);
                report.accepted_entries.push(name.clone());
            }
            FilterVerdict::Rejected(reason) => {
                debug!(entry = %name, %reason, "Rejected match");
                *report.rejected.entry(reason).or_insert(0) += 1;
            }
        }

        // Only dates of otherwise matching documents are worth a warning.
        if filter.accepts(&document.info) {
            for value in unparseable_dates(&document.info) {
                warn!(entry = %name, value = %value, "Ignoring unparseable match date");
                report.date_warnings.push(DateWarning {
                    entry: name.clone(),
                    value,
                });
            }
        }

        match expected {
            Some(n) if report.accepted_entries.len() >= n => {
                info!(accepted = n, "All expected matches found, stopping scan");
                ControlFlow::Break(())
            }
            _ => ControlFlow::Continue(()),
        }
    })?;

    report.entries_scanned = summary.entries;
    report.stopped_early = summary.stopped_early;
    report.deliveries = records.len();
    Ok(Dataset { records, report })
}

/// Fetches the archive and builds the dataset without writing it.
pub async fn build_dataset<F>(
    series: &SeriesConfig,
    fetcher: &F,
) -> Result<Dataset, PipelineError>
where
    F: ArchiveFetcher + ?Sized,
{
    info!("[PIPELINE] Starting ball-by-ball extraction");
    series.trace_loaded();

    let archive = fetcher.fetch().await.map_err(|e| {
        error!(error = %e, "[PIPELINE][ERROR] Failed to fetch match archive");
        e
    })?;
    let archive_sha256 = format!("{:x}", Sha256::digest(&archive.bytes));
    let archive_bytes = archive.bytes.len();
    info!(origin = %archive.origin, size = archive_bytes, sha256 = %archive_sha256, "[PIPELINE] Archive fetched");

    let filter = MatchFilter::new(series.clone());
    let bytes = archive.bytes;
    let mut dataset =
        tokio::task::spawn_blocking(move || scan_and_flatten(&bytes, &filter)).await??;

    dataset.report.archive_origin = archive.origin;
    dataset.report.archive_bytes = archive_bytes;
    dataset.report.archive_sha256 = archive_sha256;

    let report = &dataset.report;
    info!(
        scanned = report.entries_scanned,
        accepted = report.matches_accepted(),
        malformed = report.malformed.len(),
        deliveries = report.deliveries,
        "[PIPELINE] Archive scan complete"
    );

    if report.accepted_entries.is_empty() {
        let [a, b] = series.teams();
        error!(
            scanned = report.entries_scanned,
            "[PIPELINE][ERROR] No match passed the series filter"
        );
        return Err(PipelineError::NoMatchingMatches {
            teams: format!("{a} and {b}"),
            match_type: series.match_type().to_string(),
            start: series.window().start(),
            end: series.window().end(),
            scanned: report.entries_scanned,
        });
    }

    Ok(dataset)
}

/// Entrypoint: build the dataset and write it to `config.output_path`.
pub async fn run<F>(config: &PipelineConfig, fetcher: &F) -> Result<PipelineReport, PipelineError>
where
    F: ArchiveFetcher + ?Sized,
{
    let Dataset { records, mut report } = build_dataset(&config.series, fetcher).await?;

    let path = config.output_path.clone();
    let rows = tokio::task::spawn_blocking(move || write_dataset(&records, &path))
        .await?
        .map_err(|e| {
            error!(error = %e, "[PIPELINE][ERROR] Failed to write dataset");
            e
        })?;
    info!(rows, path = %config.output_path.display(), "[PIPELINE] Dataset written");

    report.output_path = Some(config.output_path.clone());
    Ok(report)
}
