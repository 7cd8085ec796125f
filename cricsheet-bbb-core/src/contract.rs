//! # contract: seams between the pipeline and the outside world
//!
//! The pipeline never talks to the network or the filesystem directly to get
//! its input. It asks an [`ArchiveFetcher`] for the raw zip bytes, which lets
//! the CLI choose between downloading and reading a local copy, and lets tests
//! substitute a `mockall` mock.
//!
//! ## Mocking & Testing
//! - The trait is annotated for `mockall`; `MockArchiveFetcher` is exported
//!   when the `test-export-mocks` feature is on (the default) so integration
//!   tests outside this crate can use it.

use async_trait::async_trait;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered with HTTP status {status}")]
    Status { url: String, status: u16 },
    #[error("failed to read archive {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Raw archive bytes plus a human-readable origin (URL or path) for reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedArchive {
    pub origin: String,
    pub bytes: Vec<u8>,
}

/// Retrieves the match archive as one in-memory blob.
#[cfg_attr(any(test, feature = "test-export-mocks"), mockall::automock)]
#[async_trait]
pub trait ArchiveFetcher: Send + Sync {
    async fn fetch(&self) -> Result<FetchedArchive, FetchError>;
}
