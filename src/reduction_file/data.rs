//! Interpretation of the `data` block.
//!
//! The block comes in two flavours:
//!
//! - **raw**: one file or glob pattern per line, with `path <dir>` setting the base
//!   directory for the entries that follow and `skip <pattern>` removing entries;
//! - **table**: optional leading `path <dir>` lines followed by a `|`-delimited table
//!   whose header must name the `filename` and `frametype` columns.
//!
//! The table flavour is chosen as soon as any line starts with `|`.

use super::table::{is_table_line, FrameTable, FILENAME_COLUMN, FRAMETYPE_COLUMN};
use crate::error::{RdxError, RdxResult};
use crate::messages::{fail, MessageSink};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::debug;

const PATH_DIRECTIVE: &str = "path";
const SKIP_DIRECTIVE: &str = "skip";

/// Syntax of a data block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DataFormat {
    Raw,
    Table,
}

/// Result of interpreting a table-formatted data block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableBlock {
    /// Resolved path of every row, in row order.
    pub files: Vec<PathBuf>,
    /// Frame type of every row keyed by the unresolved file name.
    pub frametypes: BTreeMap<String, String>,
    pub table: FrameTable,
}

/// Interpreted data block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DataBlock {
    Raw(Vec<PathBuf>),
    Table(TableBlock),
}

impl DataBlock {
    pub fn format(&self) -> DataFormat {
        match self {
            DataBlock::Raw(_) => DataFormat::Raw,
            DataBlock::Table(_) => DataFormat::Table,
        }
    }

    pub fn files(&self) -> &[PathBuf] {
        match self {
            DataBlock::Raw(files) => files,
            DataBlock::Table(t) => &t.files,
        }
    }

    pub fn into_parts(
        self,
    ) -> (
        Vec<PathBuf>,
        Option<BTreeMap<String, String>>,
        Option<FrameTable>,
    ) {
        match self {
            DataBlock::Raw(files) => (files, None, None),
            DataBlock::Table(t) => (t.files, Some(t.frametypes), Some(t.table)),
        }
    }
}

/// Decide the syntax of the lines inside a data block.
pub fn determine_data_format(lines: &[String]) -> DataFormat {
    if lines.iter().any(|l| is_table_line(l)) {
        DataFormat::Table
    } else {
        DataFormat::Raw
    }
}

/// Interpret the content lines of a data block.
pub fn interpret_data_block(
    lines: &[String],
    file_check: bool,
    sink: &dyn MessageSink,
) -> RdxResult<DataBlock> {
    match determine_data_format(lines) {
        DataFormat::Raw => read_data_file_names(lines, file_check, sink).map(DataBlock::Raw),
        DataFormat::Table => read_data_file_table(lines, file_check, sink).map(DataBlock::Table),
    }
}

/// Split `<directive> <rest>` and return `rest` verbatim when the first token matches.
fn directive<'a>(line: &'a str, name: &str) -> Option<&'a str> {
    let (head, rest) = line.split_once(char::is_whitespace)?;
    (head == name).then(|| rest.trim_start())
}

fn has_glob_magic(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}

/// Expand `~`, join onto the current base directory and glob.
///
/// Entries without wildcard characters that match nothing are kept as they are, so a
/// later existence check can name them.
pub fn expand_data_file_name(entry: &str, current_path: Option<&Path>) -> RdxResult<Vec<PathBuf>> {
    let mut path = expand_user(entry);
    if let Some(base) = current_path {
        path = base.join(path);
    }

    let pattern = path.to_string_lossy();
    if !has_glob_magic(&pattern) {
        return Ok(vec![path]);
    }

    let mut matches = Vec::new();
    for found in glob::glob(&pattern)? {
        match found {
            Ok(p) => matches.push(p),
            Err(e) => debug!("Skipping unreadable glob match: {}", e),
        }
    }
    Ok(matches)
}

fn expand_user(entry: &str) -> PathBuf {
    if entry == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    if let Some(rest) = entry.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(entry)
}

/// Keep the first occurrence of every path. Returns `true` if anything was dropped.
fn dedup_in_order(paths: &mut Vec<PathBuf>) -> bool {
    let before = paths.len();
    let mut seen = HashSet::new();
    paths.retain(|p| seen.insert(p.clone()));
    paths.len() != before
}

/// Read the raw data-file format.
pub fn read_data_file_names(
    lines: &[String],
    file_check: bool,
    sink: &dyn MessageSink,
) -> RdxResult<Vec<PathBuf>> {
    let mut current_path: Option<PathBuf> = None;
    let mut skip = Vec::new();
    let mut read = Vec::new();

    for line in lines {
        if let Some(pattern) = directive(line, SKIP_DIRECTIVE) {
            skip.extend(
                expand_data_file_name(pattern, current_path.as_deref())
                    .map_err(|e| fail(sink, e))?,
            );
            continue;
        }
        if let Some(dir) = directive(line, PATH_DIRECTIVE) {
            current_path = Some(PathBuf::from(dir));
            continue;
        }
        read.extend(
            expand_data_file_name(line, current_path.as_deref()).map_err(|e| fail(sink, e))?,
        );
    }

    if dedup_in_order(&mut skip) {
        sink.warn("There are duplicated files to skip.");
    }
    if dedup_in_order(&mut read) {
        sink.warn("There are duplicated files to read.");
    }

    let skip: HashSet<PathBuf> = skip.into_iter().collect();
    read.retain(|p| !skip.contains(p));

    if file_check {
        if let Some(missing) = read.iter().find(|p| !p.is_file()) {
            return Err(fail(sink, RdxError::MissingFile(missing.clone())));
        }
    }

    Ok(read)
}

/// Read the table data-file format.
///
/// Returned file paths are resolved against the declared `path` lines; the frame type
/// map and the table keep the file names exactly as written.
pub fn read_data_file_table(
    lines: &[String],
    file_check: bool,
    sink: &dyn MessageSink,
) -> RdxResult<TableBlock> {
    let paths: Vec<PathBuf> = lines
        .iter()
        .map_while(|l| directive(l, PATH_DIRECTIVE))
        .map(PathBuf::from)
        .collect();

    let rest = &lines[paths.len()..];
    let header_idx = rest.iter().position(|l| is_table_line(l)).ok_or_else(|| {
        fail(
            sink,
            RdxError::Schema("No '|'-delimited header line in the data block.".to_string()),
        )
    })?;
    if header_idx != 0 {
        return Err(fail(
            sink,
            RdxError::Schema(format!(
                "Unexpected line before the table header: {}",
                rest[0]
            )),
        ));
    }

    let table =
        FrameTable::from_lines(&rest[0], &rest[1..]).map_err(|e| fail(sink, e))?;

    let mut frametypes = BTreeMap::new();
    let mut files = Vec::with_capacity(table.len());
    for row in 0..table.len() {
        let (Some(name), Some(frametype)) = (
            table.cell(row, FILENAME_COLUMN),
            table.cell(row, FRAMETYPE_COLUMN),
        ) else {
            continue;
        };
        frametypes.insert(name.to_string(), frametype.to_string());

        let resolved = resolve_table_file(name, &paths);
        if file_check && !resolved.is_file() {
            return Err(fail(sink, RdxError::MissingFile(resolved)));
        }
        files.push(resolved);
    }

    Ok(TableBlock {
        files,
        frametypes,
        table,
    })
}

/// First declared path under which `name` exists; otherwise the join with the last path.
fn resolve_table_file(name: &str, paths: &[PathBuf]) -> PathBuf {
    paths
        .iter()
        .map(|p| p.join(name))
        .find(|candidate| candidate.is_file())
        .unwrap_or_else(|| match paths.last() {
            Some(last) => last.join(name),
            None => PathBuf::from(name),
        })
}
