//! Type coercion of raw configuration trees.
//!
//! Every string leaf is turned into its natural value (int, float, bool, tuple, list)
//! when it parses as a literal. Strings that do not parse, and the protected words in
//! [`PROTECTED_LITERALS`], stay strings. Lists written in tuple syntax are the one
//! strict case: they were meant to be tuples, so failing to parse them is an error.

use super::literal::parse_literal;
use super::value::{ConfigSection, ParSection, ParValue, RawValue};
use crate::error::{RdxError, RdxResult};
use tracing::trace;

/// Words that are never evaluated.
pub const PROTECTED_LITERALS: [&str; 5] = ["open", "file", "dict", "list", "tuple"];

fn is_protected(value: &str) -> bool {
    PROTECTED_LITERALS.contains(&value)
}

/// Evaluate a single string, falling back to the string itself.
pub fn evaluate_str(value: &str) -> ParValue {
    if is_protected(value) {
        return ParValue::Str(value.to_string());
    }
    match parse_literal(value) {
        Ok(parsed) => parsed,
        Err(e) => {
            trace!(value, error = %e, "Keeping value as a string");
            ParValue::Str(value.to_string())
        }
    }
}

/// Whether a list of items was written in tuple syntax, e.g. `(1,2), (3,4)`.
pub fn is_tuple_syntax(items: &[String]) -> bool {
    items.iter().any(|item| item.trim_start().starts_with('('))
}

/// Evaluate comma-split items as one or more tuples.
///
/// The items are re-joined with commas and parsed. A result whose elements include a
/// tuple is taken as a sequence of tuples; anything else is a single value.
pub fn evaluate_tuple(items: &[String]) -> RdxResult<Vec<ParValue>> {
    let joined = items.join(",");
    let value = parse_literal(&joined).map_err(|_| RdxError::Eval(joined.clone()))?;
    match value {
        ParValue::Tuple(elements) if elements.iter().any(|e| matches!(e, ParValue::Tuple(_))) => {
            Ok(elements)
        }
        single => Ok(vec![single]),
    }
}

/// Evaluate a list element-wise; failures keep the original string.
pub fn evaluate_list(items: &[String]) -> Vec<ParValue> {
    items.iter().map(|item| evaluate_str(item)).collect()
}

/// Recursively evaluate every value of a raw configuration tree.
pub fn evaluate(section: ConfigSection) -> RdxResult<ParSection> {
    let mut out = ParSection::new();
    for (key, value) in section {
        let evaluated = match value {
            RawValue::Section(inner) => ParValue::Section(evaluate(inner)?),
            RawValue::List(items) if is_tuple_syntax(&items) => {
                ParValue::List(evaluate_tuple(&items)?)
            }
            RawValue::List(items) => ParValue::List(evaluate_list(&items)),
            RawValue::Scalar(s) => evaluate_str(&s),
        };
        out.push(key, evaluated);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn protected_words_stay_strings() {
        for word in PROTECTED_LITERALS {
            assert_eq!(evaluate_str(word), ParValue::Str(word.to_string()));
        }
    }

    #[test]
    fn scalar_fallback() {
        assert_eq!(evaluate_str("3"), ParValue::Int(3));
        assert_eq!(
            evaluate_str("shane_kast_blue"),
            ParValue::Str("shane_kast_blue".into())
        );
    }

    #[test]
    fn single_tuple_is_wrapped() {
        assert_eq!(
            evaluate_tuple(&strings(&["(1", "2)"])).unwrap(),
            vec![ParValue::Tuple(vec![ParValue::Int(1), ParValue::Int(2)])]
        );
    }

    #[test]
    fn several_tuples_are_flattened_once() {
        assert_eq!(
            evaluate_tuple(&strings(&["(1", "2)", "(3", "4)"])).unwrap(),
            vec![
                ParValue::Tuple(vec![ParValue::Int(1), ParValue::Int(2)]),
                ParValue::Tuple(vec![ParValue::Int(3), ParValue::Int(4)]),
            ]
        );
    }

    #[test]
    fn bad_tuple_is_fatal() {
        let err = evaluate_tuple(&strings(&["(1", "x)"])).unwrap_err();
        assert!(matches!(err, RdxError::Eval(ref text) if text == "(1,x)"));
    }

    #[test]
    fn deeply_nested_value_stays_a_string() {
        let deep = "[".repeat(20_000);
        assert_eq!(evaluate_str(&deep), ParValue::Str(deep.clone()));
    }

    #[test]
    fn list_context_falls_back() {
        assert_eq!(
            evaluate_list(&strings(&["open", "3", "bogus("])),
            vec![
                ParValue::Str("open".into()),
                ParValue::Int(3),
                ParValue::Str("bogus(".into()),
            ]
        );
        assert!(!is_tuple_syntax(&strings(&["open", "3", "bogus("])));
    }
}
