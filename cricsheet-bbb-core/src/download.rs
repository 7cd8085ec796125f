use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, error, info};

use crate::contract::{ArchiveFetcher, FetchError, FetchedArchive};

pub const DEFAULT_ARCHIVE_URL: &str = "https://cricsheet.org/downloads/tests_json.zip";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Download configuration - where the archive lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadConfig {
    pub archive_url: String,
    pub timeout: Duration,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            archive_url: DEFAULT_ARCHIVE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Fetches the archive over HTTP(S) in a single GET.
pub struct HttpArchiveFetcher {
    config: DownloadConfig,
}

impl HttpArchiveFetcher {
    pub fn new(config: DownloadConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl ArchiveFetcher for HttpArchiveFetcher {
    async fn fetch(&self) -> Result<FetchedArchive, FetchError> {
        let url = self.config.archive_url.clone();
        let http_err = |source: reqwest::Error| FetchError::Http {
            url: url.clone(),
            source,
        };

        let client = reqwest::Client::builder()
            .timeout(self.config.timeout)
            .build()
            .map_err(http_err)?;

        info!(url = %url, timeout_secs = self.config.timeout.as_secs(), "Downloading match archive");
        let response = client.get(&url).send().await.map_err(|e| {
            error!(error = ?e, url = %url, "Failed to reach archive host");
            http_err(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            error!(status = %status, url = %url, "Archive host returned error status");
            return Err(FetchError::Status {
                url: url.clone(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await.map_err(|e| {
            error!(error = ?e, url = %url, "Failed to read archive body");
            http_err(e)
        })?;
        info!(url = %url, size = bytes.len(), "Downloaded match archive");

        Ok(FetchedArchive {
            origin: url,
            bytes: bytes.to_vec(),
        })
    }
}

/// Reads an archive that was downloaded earlier.
pub struct LocalArchiveFetcher {
    path: PathBuf,
}

impl LocalArchiveFetcher {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ArchiveFetcher for LocalArchiveFetcher {
    async fn fetch(&self) -> Result<FetchedArchive, FetchError> {
        debug!(path = %self.path.display(), "Reading local match archive");
        let bytes = tokio::fs::read(&self.path).await.map_err(|e| {
            error!(error = ?e, path = %self.path.display(), "Failed to read local archive");
            FetchError::Io {
                path: self.path.clone(),
                source: e,
            }
        })?;
        info!(path = %self.path.display(), size = bytes.len(), "Loaded local match archive");
        Ok(FetchedArchive {
            origin: self.path.display().to_string(),
            bytes,
        })
    }
}
