//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract: scripts rely on them.
//!
//! # Exit Codes
//!
//! | Code | Meaning                                             |
//! |------|-----------------------------------------------------|
//! | 0    | Success (an empty view or export is still success)  |
//! | 1    | General error (unspecified)                         |
//! | 2    | Usage error (bad args, no data source given)        |
//! | 3    | Data source unavailable                             |
//! | 4    | Malformed input (ragged rows, duplicate headers)    |
//! | 5    | Configuration error                                 |
//! | 6    | Export failed                                       |
//! | 7    | Participant not found                               |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into `CliError` or the relevant command

use rankboard_engine::LeaderboardError;

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Ingestion (3-4)
// =============================================================================

/// The local file or remote object could not be read.
pub const EXIT_SOURCE_UNAVAILABLE: u8 = 3;

/// The dataset was read but does not form a consistent table.
pub const EXIT_MALFORMED: u8 = 4;

// =============================================================================
// Config / export / lookup (5-7)
// =============================================================================

/// Config file unreadable, unparseable or invalid.
pub const EXIT_CONFIG: u8 = 5;

/// Workbook could not be built or written.
pub const EXIT_EXPORT: u8 = 6;

/// `participant --email` matched nobody.
pub const EXIT_NOT_FOUND: u8 = 7;

/// Map a library error to its exit code.
pub fn leaderboard_exit_code(err: &LeaderboardError) -> u8 {
    match err {
        LeaderboardError::SourceUnavailable { .. } => EXIT_SOURCE_UNAVAILABLE,
        LeaderboardError::MalformedInput(_) => EXIT_MALFORMED,
        LeaderboardError::ConfigParse(_) | LeaderboardError::ConfigValidation(_) => EXIT_CONFIG,
        LeaderboardError::Export(_) => EXIT_EXPORT,
        LeaderboardError::Io(_) => EXIT_ERROR,
    }
}
