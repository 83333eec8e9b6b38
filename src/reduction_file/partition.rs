//! Separating configuration lines from the data and setup blocks.

use super::block::{find_block, BlockBounds, DATA_BLOCK, SETUP_BLOCK};
use crate::error::RdxResult;
use crate::messages::{fail, MessageSink};
use std::ops::RangeInclusive;

/// Return `lines` without the indices covered by any of `spans`.
pub fn strip_spans(lines: &[String], spans: &[RangeInclusive<usize>]) -> Vec<String> {
    lines
        .iter()
        .enumerate()
        .filter(|(i, _)| !spans.iter().any(|span| span.contains(i)))
        .map(|(_, line)| line.clone())
        .collect()
}

/// Span to remove for an optional setup block.
///
/// A missing block is only worth a warning. An unterminated one is reported too, and
/// only its `setup read` marker is removed so nothing after it is swallowed.
pub(crate) fn setup_span(
    bounds: &BlockBounds,
    source_name: &str,
    sink: &dyn MessageSink,
) -> Option<RangeInclusive<usize>> {
    if let Some(block) = bounds.block() {
        return Some(block.span());
    }
    match bounds.start {
        Some(start) => {
            sink.warn(&format!(
                "Missing '{SETUP_BLOCK} end' in {source_name}; ignoring the setup block."
            ));
            Some((start - 1)..=(start - 1))
        }
        None => {
            sink.warn("Missing setup block! This may be a problem");
            None
        }
    }
}

/// Configuration lines of a reduction file: everything outside the data and setup blocks.
pub fn extract_config_lines(lines: &[String], sink: &dyn MessageSink) -> RdxResult<Vec<String>> {
    extract_config_lines_from(lines, "the reduction file", sink)
}

pub(crate) fn extract_config_lines_from(
    lines: &[String],
    source_name: &str,
    sink: &dyn MessageSink,
) -> RdxResult<Vec<String>> {
    let data = find_block(lines, DATA_BLOCK)
        .require(DATA_BLOCK, source_name)
        .map_err(|e| fail(sink, e))?;

    let mut spans = vec![data.span()];
    spans.extend(setup_span(&find_block(lines, SETUP_BLOCK), source_name, sink));

    Ok(strip_spans(lines, &spans))
}
