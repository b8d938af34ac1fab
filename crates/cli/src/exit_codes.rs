//! CLI Exit Code Registry
//!
//! Single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract — scripts rely on them.
//!
//! | Code | Meaning                                         |
//! |------|-------------------------------------------------|
//! | 0    | Success                                         |
//! | 1    | General error (unspecified)                     |
//! | 2    | Usage error (bad args)                          |
//! | 3    | Schema error (missing column, empty report)     |
//! | 4    | Timestamp parse error                           |
//! | 5    | File I/O or file-format error                   |
//! | 6    | Config file error                               |

use resift_recon::ReconError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// Required column missing, or the report is empty (no horizon).
pub const EXIT_SCHEMA: u8 = 3;

/// A `Created On` value did not match the configured format.
pub const EXIT_PARSE: u8 = 4;

/// Cannot read/write a file, or the file is not valid CSV/XLSX.
pub const EXIT_IO: u8 = 5;

/// Config file unreadable, unparseable, or invalid.
pub const EXIT_CONFIG: u8 = 6;

/// Map an engine error to its exit code.
pub fn recon_exit_code(err: &ReconError) -> u8 {
    match err {
        ReconError::ConfigParse(_) | ReconError::ConfigValidation(_) => EXIT_CONFIG,
        ReconError::MissingColumns { .. } | ReconError::EmptyReport => EXIT_SCHEMA,
        ReconError::TimestampParse { .. } => EXIT_PARSE,
    }
}
