//! Line reader shared by the reduction-file and tool-config parsers.

use crate::error::{RdxError, RdxResult};
use std::path::Path;

/// Comment character of the reduction-file format.
pub const COMMENT: char = '#';

/// Read the meaningful lines of a reduction file.
///
/// Tabs become spaces, every line is trimmed, empty and fully commented lines are
/// dropped and trailing `# ...` comments are cut off. Order is preserved.
pub fn read_lines(path: impl AsRef<Path>) -> RdxResult<Vec<String>> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(RdxError::FileNotFound(path.to_path_buf()));
    }
    let text = std::fs::read_to_string(path)?;
    Ok(clean_lines(&text))
}

/// Apply the reader's cleaning rules to text that is already in memory.
pub fn clean_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| line.replace('\t', " "))
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty() && !line.starts_with(COMMENT))
        .map(|line| match line.split_once(COMMENT) {
            Some((content, _)) => content.trim_end().to_string(),
            None => line,
        })
        .collect()
}
