//! # Reduction files
//!
//! A reduction file describes one run of the pipeline. It has three regions that may
//! appear in any order:
//!
//! ```text
//! # User-defined execution parameters
//! [rdx]
//!     spectrograph = shane_kast_blue
//!
//! setup read
//! Setup A:
//! setup end
//!
//! data read
//!  path /data/kast/raw
//! | filename    | frametype | dispname |
//! | b1.fits.gz  | arc       | 600/4310 |
//! | b27.fits.gz | science   | 600/4310 |
//! data end
//! ```
//!
//! - free-form configuration lines (`[section]` / `key = value`),
//! - an optional `setup` block (YAML),
//! - a mandatory `data` block (raw file list or inline table).
//!
//! [`parse_reduction_file`] splits a file into these parts, [`write_reduction_file`]
//! builds one, and [`ReductionFile::parameters`] turns the configuration lines into a
//! typed parameter tree.

pub mod block;
pub mod data;
pub mod lines;
pub mod partition;
pub mod setup;
pub mod table;
pub mod tool;
pub mod writer;

pub use block::{find_block, Block, BlockBounds, DATA_BLOCK, SETUP_BLOCK};
pub use data::{interpret_data_block, DataBlock, DataFormat, TableBlock};
pub use lines::read_lines;
pub use partition::extract_config_lines;
pub use setup::{interpret_setup_block, SetupBlock, SetupPolicy};
pub use table::{FrameTable, FILENAME_COLUMN, FRAMETYPE_COLUMN};
pub use tool::{parse_tool_config, ToolConfig};
pub use writer::{write_reduction_file, ReductionFileContents};

use crate::error::{RdxError, RdxResult};
use crate::messages::{fail, MessageSink};
use crate::params::{evaluate, parse_config_lines, ParSection};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Options for [`parse_reduction_file`].
#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    /// Require every data file to exist on disk.
    pub file_check: bool,
    /// Apply the checks needed before actually running a reduction.
    pub runtime: bool,
    pub setup_policy: SetupPolicy,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            file_check: true,
            runtime: false,
            setup_policy: SetupPolicy::default(),
        }
    }
}

impl ParseOptions {
    pub fn with_file_check(mut self, enabled: bool) -> Self {
        self.file_check = enabled;
        self
    }

    pub fn with_runtime(mut self, enabled: bool) -> Self {
        self.runtime = enabled;
        self
    }

    pub fn with_setup_policy(mut self, policy: SetupPolicy) -> Self {
        self.setup_policy = policy;
        self
    }
}

/// A parsed reduction file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReductionFile {
    /// Lines outside the data and setup blocks.
    pub config_lines: Vec<String>,
    /// Resolved data files.
    pub data_files: Vec<PathBuf>,
    /// Frame type per file name; only for table-formatted data blocks.
    pub frametypes: Option<BTreeMap<String, String>>,
    /// The inline table; only for table-formatted data blocks.
    pub table: Option<FrameTable>,
    pub setup: SetupBlock,
}

impl ReductionFile {
    pub fn setup_names(&self) -> &[String] {
        &self.setup.names
    }

    /// Checks required before running a reduction: the data block must be a table with
    /// `filename` and `frametype` columns and exactly one setup must be defined.
    pub fn check_runtime(&self) -> RdxResult<()> {
        for column in [FILENAME_COLUMN, FRAMETYPE_COLUMN] {
            if !self.table.as_ref().is_some_and(|t| t.has_column(column)) {
                return Err(RdxError::Schema(format!(
                    "Add {column} to your reduction file before running a reduction"
                )));
            }
        }
        if self.setup.names.len() != 1 {
            return Err(RdxError::SetupCount {
                found: self.setup.names.len(),
                names: self.setup.names.clone(),
            });
        }
        Ok(())
    }

    /// Parse and evaluate the configuration lines.
    pub fn parameters(&self) -> RdxResult<ParSection> {
        evaluate(parse_config_lines(&self.config_lines)?)
    }
}

/// Parse a reduction file.
#[instrument(skip_all, fields(file = %path.as_ref().display()))]
pub fn parse_reduction_file(
    path: impl AsRef<Path>,
    options: &ParseOptions,
    sink: &dyn MessageSink,
) -> RdxResult<ReductionFile> {
    let path = path.as_ref();
    let source_name = path.display().to_string();

    sink.info("Loading the reduction file");
    let lines = read_lines(path).map_err(|e| fail(sink, e))?;
    debug!(lines = lines.len(), "Read reduction file");

    let data_block = find_block(&lines, DATA_BLOCK)
        .require(DATA_BLOCK, &source_name)
        .map_err(|e| fail(sink, e))?;
    let data = interpret_data_block(data_block.lines(&lines), options.file_check, sink)?;
    debug!(format = ?data.format(), "Interpreted data block");

    if data.files().is_empty() && options.file_check {
        return Err(fail(
            sink,
            RdxError::MissingData(format!(
                "There are no raw data frames in {source_name}{}Perhaps the path to the data is incorrect?",
                sink.newline()
            )),
        ));
    }
    sink.info(&format!("Found {} raw data frames", data.files().len()));

    let setup_bounds = find_block(&lines, SETUP_BLOCK);
    let setup = match setup_bounds.block() {
        Some(block) => interpret_setup_block(block.lines(&lines), options.setup_policy)
            .map_err(|e| fail(sink, e))?,
        None => SetupBlock::default(),
    };

    let mut spans = vec![data_block.span()];
    spans.extend(partition::setup_span(&setup_bounds, &source_name, sink));
    let config_lines = partition::strip_spans(&lines, &spans);

    let (data_files, frametypes, table) = data.into_parts();
    let parsed = ReductionFile {
        config_lines,
        data_files,
        frametypes,
        table,
        setup,
    };

    if options.runtime {
        parsed.check_runtime().map_err(|e| fail(sink, e))?;
    }

    sink.info("Input file loaded successfully");
    Ok(parsed)
}

/// Configuration lines of a reduction file on disk.
pub fn config_lines_from_file(
    path: impl AsRef<Path>,
    sink: &dyn MessageSink,
) -> RdxResult<Vec<String>> {
    let path = path.as_ref();
    let lines = read_lines(path).map_err(|e| fail(sink, e))?;
    partition::extract_config_lines_from(&lines, &path.display().to_string(), sink)
}
