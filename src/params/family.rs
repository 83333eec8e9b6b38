//! Indexed key families such as `detector1`, `detector2`, ...

use super::value::{ParSection, ParValue};
use crate::error::{RdxError, RdxResult};
use crate::validation::is_sequential_from_one;

/// Numeric suffix of `key` after `root`: plain ASCII digits without a leading zero.
fn family_index(key: &str, root: &str) -> Option<usize> {
    let suffix = key.strip_prefix(root)?;
    if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if suffix.len() > 1 && suffix.starts_with('0') {
        return None;
    }
    suffix.parse().ok()
}

/// Members of the family `root<N>` in `section`, sorted by `N`.
///
/// The bare `root` key and keys whose suffix is not an integer are ignored. The
/// suffixes must run exactly `1..=count`. Returns `None` when no member exists.
pub fn indexed_family<'a>(
    section: &'a ParSection,
    root: &str,
) -> RdxResult<Option<Vec<(usize, &'a ParValue)>>> {
    let mut members: Vec<(usize, &ParValue)> = section
        .iter()
        .filter_map(|(key, value)| Some((family_index(key, root)?, value)))
        .collect();

    if members.is_empty() {
        return Ok(None);
    }

    members.sort_by_key(|(index, _)| *index);
    let indices: Vec<usize> = members.iter().map(|(index, _)| *index).collect();
    is_sequential_from_one(&indices).map_err(|_| RdxError::ParameterSeries {
        root: root.to_string(),
        indices,
    })?;

    Ok(Some(members))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{evaluate, parse_config_lines};

    fn section(text: &str) -> ParSection {
        let lines: Vec<String> = text.lines().map(str::to_string).collect();
        evaluate(parse_config_lines(&lines).unwrap()).unwrap()
    }

    #[test]
    fn sorts_members() {
        let s = section("detector = None\n[detector2]\ngain = 1.2\n[detector1]\ngain = 1.1");
        let family = indexed_family(&s, "detector").unwrap().unwrap();
        let indices: Vec<_> = family.iter().map(|(i, _)| *i).collect();
        assert_eq!(indices, vec![1, 2]);
        let gain = family[0].1.as_section().unwrap().get("gain").unwrap();
        assert_eq!(gain.as_float(), Some(1.1));
    }

    #[test]
    fn gap_is_rejected() {
        let s = section("[detector1]\ngain = 1\n[detector3]\ngain = 2");
        let err = indexed_family(&s, "detector").unwrap_err();
        assert!(matches!(err, RdxError::ParameterSeries { ref indices, .. } if indices == &[1, 3]));
    }

    #[test]
    fn zero_based_is_rejected() {
        let s = section("[detector0]\ngain = 1");
        assert!(indexed_family(&s, "detector").is_err());
    }

    #[test]
    fn absent_family() {
        let s = section("[rdx]\nspectrograph = keck_lris_blue\ndetector = 1");
        assert!(indexed_family(&s, "detector").unwrap().is_none());
    }

    #[test]
    fn signed_or_padded_suffix_is_ignored() {
        let s = section("[detector1]\ngain = 1\n[detector+2]\ngain = 2\n[detector02]\ngain = 3");
        let family = indexed_family(&s, "detector").unwrap().unwrap();
        assert_eq!(family.len(), 1);
        assert_eq!(family_index("detector+1", "detector"), None);
        assert_eq!(family_index("detector01", "detector"), None);
        assert_eq!(family_index("detector10", "detector"), Some(10));
    }

    #[test]
    fn non_numeric_suffix_is_ignored() {
        let s = section("[detector1]\ngain = 1\n[detectorx]\ngain = 2");
        assert_eq!(indexed_family(&s, "detector").unwrap().unwrap().len(), 1);
    }
}
