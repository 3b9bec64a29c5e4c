use std::fmt;

#[derive(Debug)]
pub enum LeaderboardError {
    /// Raw tabular text could not be obtained (file missing, HTTP failure).
    SourceUnavailable { source: String, reason: String },
    /// Header/row column-set mismatch or structurally unparseable text.
    MalformedInput(String),
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (empty counter list, blank sentinel, etc.).
    ConfigValidation(String),
    /// Workbook could not be built or written.
    Export(String),
    /// IO error outside of source fetching (output directory, etc.).
    Io(String),
}

impl LeaderboardError {
    pub fn source_unavailable(source: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SourceUnavailable {
            source: source.into(),
            reason: reason.into(),
        }
    }

    /// True for failures that abort an ingestion cycle.
    pub fn is_ingestion_failure(&self) -> bool {
        matches!(self, Self::SourceUnavailable { .. } | Self::MalformedInput(_))
    }
}

impl fmt::Display for LeaderboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SourceUnavailable { source, reason } => {
                write!(f, "source '{source}' unavailable: {reason}")
            }
            Self::MalformedInput(msg) => write!(f, "malformed input: {msg}"),
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::Export(msg) => write!(f, "export error: {msg}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for LeaderboardError {}
