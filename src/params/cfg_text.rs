//! Parser for the `[section]` / `key = value` configuration grammar.
//!
//! ```text
//! [rdx]
//!     spectrograph = shane_kast_blue
//! [calibrations]
//!     [[wavelengths]]
//!         lamps = NeI, HgI, HeI
//!         sigdetect = 5.
//! ```
//!
//! The number of brackets gives the nesting depth of a section header; a header may
//! be at most one level deeper than the section it follows. Values containing an
//! unquoted comma become lists. Nothing is evaluated here; see
//! [`evaluate`](super::evaluate::evaluate).

use super::value::{ConfigSection, RawValue};
use crate::error::{RdxError, RdxResult};

/// Parse configuration lines into a raw, order-preserving tree.
pub fn parse_config_lines(lines: &[String]) -> RdxResult<ConfigSection> {
    let mut root = ConfigSection::new();
    // Names of the currently open sections, outermost first.
    let mut stack: Vec<String> = Vec::new();

    for (idx, raw) in lines.iter().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let syntax_err = |message: String| RdxError::ConfigSyntax {
            line: line_no,
            message,
        };

        if line.starts_with('[') {
            let (depth, name) = parse_header(line).map_err(syntax_err)?;
            if depth > stack.len() + 1 {
                return Err(syntax_err(format!(
                    "section '{name}' is nested too deeply (depth {depth} after depth {})",
                    stack.len()
                )));
            }
            stack.truncate(depth - 1);
            let parent = section_at(&mut root, &stack)
                .ok_or_else(|| syntax_err(format!("no open section for '{name}'")))?;
            if !parent.insert(name.clone(), RawValue::Section(ConfigSection::new())) {
                return Err(syntax_err(format!("duplicate section '{name}'")));
            }
            stack.push(name);
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            return Err(syntax_err(format!("expected 'key = value', found '{line}'")));
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(syntax_err("empty key".to_string()));
        }
        let value = parse_value(value.trim()).map_err(syntax_err)?;
        let section = section_at(&mut root, &stack)
            .ok_or_else(|| syntax_err(format!("no open section for '{key}'")))?;
        if !section.insert(key, value) {
            return Err(syntax_err(format!("duplicate keyword '{key}'")));
        }
    }

    Ok(root)
}

fn parse_header(line: &str) -> Result<(usize, String), String> {
    let depth = line.chars().take_while(|&c| c == '[').count();
    let closing = line.chars().rev().take_while(|&c| c == ']').count();
    if depth != closing {
        return Err(format!("unbalanced brackets in section header '{line}'"));
    }
    let name = line[depth..line.len() - closing].trim();
    if name.is_empty() || name.contains(['[', ']']) {
        return Err(format!("invalid section header '{line}'"));
    }
    Ok((depth, name.to_string()))
}

/// Walk from the root through the open sections. `None` if a name on the path is
/// not a section.
fn section_at<'a>(
    root: &'a mut ConfigSection,
    path: &[String],
) -> Option<&'a mut ConfigSection> {
    let mut current = root;
    for name in path {
        current = match current.get_mut(name) {
            Some(RawValue::Section(s)) => s,
            _ => return None,
        };
    }
    Some(current)
}

/// Split a value on unquoted commas and strip quotes.
fn parse_value(value: &str) -> Result<RawValue, String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut saw_comma = false;

    for c in value.chars() {
        match (quote, c) {
            (Some(q), c) if c == q => {
                quote = None;
                current.push(c);
            }
            (Some(_), c) => current.push(c),
            (None, '\'' | '"') => {
                quote = Some(c);
                current.push(c);
            }
            (None, ',') => {
                saw_comma = true;
                items.push(unquote(current.trim()));
                current.clear();
            }
            (None, c) => current.push(c),
        }
    }
    if quote.is_some() {
        return Err(format!("unterminated quote in value '{value}'"));
    }

    if !saw_comma {
        return Ok(RawValue::Scalar(unquote(current.trim())));
    }
    let last = current.trim();
    if !last.is_empty() {
        items.push(unquote(last));
    }
    Ok(RawValue::List(items))
}

fn unquote(item: &str) -> String {
    for q in ['"', '\''] {
        if item.len() >= 2 && item.starts_with(q) && item.ends_with(q) {
            return item[1..item.len() - 1].to_string();
        }
    }
    item.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<String> {
        text.lines().map(str::to_string).collect()
    }

    #[test]
    fn nested_sections() {
        let cfg = parse_config_lines(&lines(
            "[rdx]\nspectrograph = shane_kast_blue\n[calibrations]\n[[wavelengths]]\nlamps = NeI, HgI\nsigdetect = 5.\n[scienceframe]\nexprng = None, 600",
        ))
        .unwrap();
        let keys: Vec<_> = cfg.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["rdx", "calibrations", "scienceframe"]);
        assert_eq!(
            cfg.section("rdx").unwrap().get("spectrograph"),
            Some(&RawValue::Scalar("shane_kast_blue".into()))
        );
        let wv = cfg
            .section("calibrations")
            .and_then(|c| c.section("wavelengths"))
            .unwrap();
        assert_eq!(
            wv.get("lamps"),
            Some(&RawValue::List(vec!["NeI".into(), "HgI".into()]))
        );
        assert_eq!(wv.get("sigdetect"), Some(&RawValue::Scalar("5.".into())));
    }

    #[test]
    fn tuple_text_is_split_on_commas() {
        let cfg = parse_config_lines(&lines("bar = (1,2)")).unwrap();
        assert_eq!(
            cfg.get("bar"),
            Some(&RawValue::List(vec!["(1".into(), "2)".into()]))
        );
    }

    #[test]
    fn quotes_protect_commas() {
        let cfg = parse_config_lines(&lines("a = \"x, y\"\nb = 'p', q,")).unwrap();
        assert_eq!(cfg.get("a"), Some(&RawValue::Scalar("x, y".into())));
        assert_eq!(
            cfg.get("b"),
            Some(&RawValue::List(vec!["p".into(), "q".into()]))
        );
    }

    #[test]
    fn single_trailing_comma_makes_one_element_list() {
        let cfg = parse_config_lines(&lines("a = 1,")).unwrap();
        assert_eq!(cfg.get("a"), Some(&RawValue::List(vec!["1".into()])));
    }

    #[test]
    fn sibling_subsections() {
        let cfg = parse_config_lines(&lines(
            "[detector1]\n[[a]]\nx = 1\n[[b]]\ny = 2\n[detector2]\nz = 3",
        ))
        .unwrap();
        let d1 = cfg.section("detector1").unwrap();
        assert!(d1.section("a").unwrap().contains_key("x"));
        assert!(d1.section("b").unwrap().contains_key("y"));
        assert!(cfg.section("detector2").unwrap().contains_key("z"));
    }

    #[test]
    fn path_through_a_value_finds_no_section() {
        let mut root = parse_config_lines(&lines("a = 1\n[b]\nc = 2")).unwrap();
        assert!(section_at(&mut root, &["b".to_string()]).is_some());
        assert!(section_at(&mut root, &["a".to_string()]).is_none());
        assert!(section_at(&mut root, &["missing".to_string()]).is_none());
    }

    #[test]
    fn key_then_section_of_same_name_is_an_error() {
        let err = parse_config_lines(&lines("[rdx]\nb = 1\n[[b]]\nc = 2")).unwrap_err();
        assert!(matches!(err, RdxError::ConfigSyntax { line: 3, .. }));
    }

    #[test]
    fn syntax_errors_carry_line_numbers() {
        let err = parse_config_lines(&lines("[rdx]\nspectrograph")).unwrap_err();
        assert!(matches!(err, RdxError::ConfigSyntax { line: 2, .. }));

        let err = parse_config_lines(&lines("[rdx]\n[[[deep]]]")).unwrap_err();
        assert!(matches!(err, RdxError::ConfigSyntax { line: 2, .. }));

        let err = parse_config_lines(&lines("[rdx\n")).unwrap_err();
        assert!(matches!(err, RdxError::ConfigSyntax { line: 1, .. }));

        let err = parse_config_lines(&lines("a = 1\na = 2")).unwrap_err();
        assert!(matches!(err, RdxError::ConfigSyntax { line: 2, .. }));

        let err = parse_config_lines(&lines("a = 'open")).unwrap_err();
        assert!(matches!(err, RdxError::ConfigSyntax { line: 1, .. }));
    }
}
