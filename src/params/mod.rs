//! Configuration lines to typed parameter trees.
//!
//! - [`cfg_text`]: parses `[section]` / `key = value` text into a raw [`ConfigSection`].
//! - [`evaluate`](mod@evaluate): coerces raw strings into [`ParValue`]s.
//! - [`literal`]: the literal grammar used by the evaluator.
//! - [`family`]: validation of indexed section families (`detector1`, `detector2`, ...).

pub mod cfg_text;
pub mod evaluate;
pub mod family;
pub mod literal;
pub mod value;

pub use cfg_text::parse_config_lines;
pub use evaluate::{evaluate, evaluate_str, PROTECTED_LITERALS};
pub use family::indexed_family;
pub use literal::{parse_literal, LiteralError};
pub use value::{ConfigSection, ParSection, ParValue, RawValue};

use crate::error::RdxResult;

/// Parse and evaluate configuration text in one step.
pub fn evaluate_config_text(text: &str) -> RdxResult<ParSection> {
    let lines: Vec<String> = text.lines().map(str::to_string).collect();
    evaluate(parse_config_lines(&lines)?)
}
