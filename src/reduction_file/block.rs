//! Locating `<name> read ... <name> end` blocks.

use crate::error::{RdxError, RdxResult};
use std::ops::{Range, RangeInclusive};

/// Name of the mandatory block listing the input frames.
pub const DATA_BLOCK: &str = "data";
/// Name of the optional block describing instrument setups.
pub const SETUP_BLOCK: &str = "setup";

/// Raw result of a block scan.
///
/// `start` is the index of the first content line (marker + 1) and `end` the index of
/// the end marker, so `start..end` is the block content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BlockBounds {
    pub start: Option<usize>,
    pub end: Option<usize>,
}

/// A block whose start and end markers were both found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub start: usize,
    pub end: usize,
}

impl Block {
    /// Indices of the content lines.
    pub fn content(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Indices covered by the block including both marker lines.
    pub fn span(&self) -> RangeInclusive<usize> {
        (self.start - 1)..=self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn lines<'a>(&self, lines: &'a [String]) -> &'a [String] {
        &lines[self.content()]
    }
}

impl BlockBounds {
    /// The block was never opened.
    pub fn is_absent(&self) -> bool {
        self.start.is_none()
    }

    /// The block was opened but never closed.
    pub fn is_unterminated(&self) -> bool {
        self.start.is_some() && self.end.is_none()
    }

    /// Both markers, if present.
    pub fn block(&self) -> Option<Block> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => Some(Block { start, end }),
            _ => None,
        }
    }

    /// Resolve an optional block: absent is `Ok(None)`, unterminated is an error.
    pub fn optional(&self, name: &str, source_name: &str) -> RdxResult<Option<Block>> {
        if self.is_unterminated() {
            return Err(RdxError::MissingBlockMarker {
                block: name.to_string(),
                source_name: source_name.to_string(),
            });
        }
        Ok(self.block())
    }

    /// Resolve a mandatory block: both absent and unterminated are errors.
    pub fn require(&self, name: &str, source_name: &str) -> RdxResult<Block> {
        self.optional(name, source_name)?.ok_or_else(|| {
            RdxError::MissingData(format!(
                "No '{name} read' block in {source_name}; you haven't specified any data!"
            ))
        })
    }
}

/// Find the first `<name> read` / `<name> end` pair.
///
/// A marker is recognised only when it forms the first two whitespace tokens of a line.
/// An end marker seen before the block is opened is ignored.
pub fn find_block(lines: &[String], name: &str) -> BlockBounds {
    let mut bounds = BlockBounds::default();
    for (i, line) in lines.iter().enumerate() {
        let mut tokens = line.split_whitespace();
        let (Some(first), Some(second)) = (tokens.next(), tokens.next()) else {
            continue;
        };
        if first != name {
            continue;
        }
        match second {
            "read" if bounds.start.is_none() => bounds.start = Some(i + 1),
            "end" if bounds.start.is_some() => {
                bounds.end = Some(i);
                break;
            }
            _ => {}
        }
    }
    bounds
}
