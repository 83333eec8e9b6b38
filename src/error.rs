//! Custom error types for the reduction-file subsystem.
//!
//! This module defines `RdxError`, the single error type returned by every parsing,
//! validation and writing routine in the crate. Using the `thiserror` crate, it gives
//! each failure mode of a reduction file its own variant so callers can match on the
//! kind of problem instead of inspecting message strings.
//!
//! ## Error Hierarchy
//!
//! - **`FileNotFound`**: the reduction file (or tool config file) itself does not exist.
//! - **`MissingBlockMarker`**: a `<name> read` marker without the matching `<name> end`.
//! - **`MissingData`**: no data block at all, or the data block resolved to zero files.
//! - **`Schema`**: an inline frame table lacks a mandatory column.
//! - **`ColumnMismatch`**: a table row has a different cell count than the header.
//! - **`MissingFile`**: a data file referenced by the block is absent on disk.
//! - **`Type`**: the writer was handed arguments of the wrong shape.
//! - **`Eval`**: a value written in explicit tuple syntax could not be evaluated.
//! - **`SetupCount`**, **`ConfigSyntax`**, **`ParameterSeries`**: setup uniqueness,
//!   configuration grammar and indexed key family violations.
//! - **`Io`**, **`Yaml`**, **`Pattern`**: wrapped errors from `std::io`, `serde_yaml`
//!   and `glob`.
//!
//! Every structural error is fatal: a malformed reduction file cannot be reduced, so
//! nothing here is recoverable with partial results. Soft problems (duplicate entries,
//! a missing setup block) never become errors; they go to the message sink instead.

use std::path::PathBuf;
use thiserror::Error;

/// Convenience alias for results using the crate error type.
pub type RdxResult<T> = std::result::Result<T, RdxError>;

/// Errors raised while reading, interpreting or writing reduction files.
#[derive(Error, Debug)]
pub enum RdxError {
    #[error("The filename does not exist: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Missing '{block} end' in {source_name}")]
    MissingBlockMarker { block: String, source_name: String },

    #[error("{0}")]
    MissingData(String),

    #[error("Table format failure: {0}")]
    Schema(String),

    #[error("Data and header lines have mismatched columns: row {row} has {found} cells, header has {expected}")]
    ColumnMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("File does not exist: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("Invalid argument: {0}")]
    Type(String),

    #[error("Cannot evaluate {0} into a valid tuple")]
    Eval(String),

    #[error("Expected exactly one setup, found {found}: {names:?}")]
    SetupCount { found: usize, names: Vec<String> },

    #[error("Configuration syntax error on line {line}: {message}")]
    ConfigSyntax { line: usize, message: String },

    #[error("Parameter set series '{root}' must be sequential and 1-indexed, found {indices:?}")]
    ParameterSeries { root: String, indices: Vec<usize> },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Setup block is not valid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid file pattern: {0}")]
    Pattern(#[from] glob::PatternError),
}

impl RdxError {
    /// Short name of the error kind, used in log fields and CLI exit messages.
    pub fn kind(&self) -> &'static str {
        match self {
            RdxError::FileNotFound(_) => "file_not_found",
            RdxError::MissingBlockMarker { .. } => "missing_block_marker",
            RdxError::MissingData(_) => "missing_data",
            RdxError::Schema(_) => "schema",
            RdxError::ColumnMismatch { .. } => "column_mismatch",
            RdxError::MissingFile(_) => "missing_file",
            RdxError::Type(_) => "type",
            RdxError::Eval(_) => "eval",
            RdxError::SetupCount { .. } => "setup_count",
            RdxError::ConfigSyntax { .. } => "config_syntax",
            RdxError::ParameterSeries { .. } => "parameter_series",
            RdxError::Io(_) => "io",
            RdxError::Yaml(_) => "yaml",
            RdxError::Pattern(_) => "pattern",
        }
    }
}
