//! Byte sources for the raw tabular text.

use std::path::PathBuf;
use std::time::Duration;

use rankboard_engine::LeaderboardError;

use crate::csv::{decode_utf8_lossless, read_file_as_utf8};

/// Anything that can hand over the current dataset as text.
pub trait DataSource: Send + Sync {
    /// Short provenance label surfaced in the query response.
    fn label(&self) -> &str;

    /// Fetch the full tabular text. Failures are `SourceUnavailable`.
    fn fetch(&self) -> Result<String, LeaderboardError>;
}

// ---------------------------------------------------------------------------
// Local file
// ---------------------------------------------------------------------------

pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DataSource for FileSource {
    fn label(&self) -> &str {
        "local-csv"
    }

    fn fetch(&self) -> Result<String, LeaderboardError> {
        read_file_as_utf8(&self.path).map_err(|e| {
            LeaderboardError::source_unavailable(self.path.display().to_string(), e.to_string())
        })
    }
}

// ---------------------------------------------------------------------------
// Remote object (HTTP GET)
// ---------------------------------------------------------------------------

pub struct HttpSource {
    url: String,
    http: reqwest::blocking::Client,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Result<Self, LeaderboardError> {
        Self::with_timeout(url, Duration::from_secs(30))
    }

    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self, LeaderboardError> {
        let url = url.into();
        let http = reqwest::blocking::Client::builder()
            .user_agent(format!("rankboard/{}", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| LeaderboardError::source_unavailable(&url, e.to_string()))?;
        Ok(Self { url, http })
    }
}

impl DataSource for HttpSource {
    fn label(&self) -> &str {
        "remote"
    }

    fn fetch(&self) -> Result<String, LeaderboardError> {
        let response = self
            .http
            .get(&self.url)
            .send()
            .map_err(|e| LeaderboardError::source_unavailable(&self.url, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LeaderboardError::source_unavailable(
                &self.url,
                format!("HTTP {}", status.as_u16()),
            ));
        }

        let bytes = response
            .bytes()
            .map_err(|e| LeaderboardError::source_unavailable(&self.url, e.to_string()))?;
        Ok(decode_utf8_lossless(bytes.to_vec()))
    }
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

/// Fixed text; used for stdin input and tests.
pub struct StaticSource {
    label: String,
    text: String,
}

impl StaticSource {
    pub fn new(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            text: text.into(),
        }
    }
}

impl DataSource for StaticSource {
    fn label(&self) -> &str {
        &self.label
    }

    fn fetch(&self) -> Result<String, LeaderboardError> {
        Ok(self.text.clone())
    }
}
