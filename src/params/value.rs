//! Raw and evaluated configuration trees.

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;

/// A value as read from configuration text, before evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Scalar(String),
    List(Vec<String>),
    Section(ConfigSection),
}

/// An ordered section of raw values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigSection {
    entries: Vec<(String, RawValue)>,
}

impl ConfigSection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut RawValue> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Append an entry. Returns `false` (and changes nothing) if the key exists.
    pub fn insert(&mut self, key: impl Into<String>, value: RawValue) -> bool {
        let key = key.into();
        if self.contains_key(&key) {
            return false;
        }
        self.entries.push((key, value));
        true
    }

    pub fn section(&self, key: &str) -> Option<&ConfigSection> {
        match self.get(key) {
            Some(RawValue::Section(s)) => Some(s),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for ConfigSection {
    type Item = (String, RawValue);
    type IntoIter = std::vec::IntoIter<(String, RawValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// An evaluated configuration value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParValue {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Tuple(Vec<ParValue>),
    List(Vec<ParValue>),
    Section(ParSection),
}

impl ParValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            ParValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            ParValue::Float(f) => Some(*f),
            ParValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_section(&self) -> Option<&ParSection> {
        match self {
            ParValue::Section(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for ParValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join(f: &mut fmt::Formatter<'_>, items: &[ParValue]) -> fmt::Result {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{item}")?;
            }
            Ok(())
        }
        match self {
            ParValue::None => write!(f, "None"),
            ParValue::Bool(true) => write!(f, "True"),
            ParValue::Bool(false) => write!(f, "False"),
            ParValue::Int(i) => write!(f, "{i}"),
            ParValue::Float(x) => write!(f, "{x:?}"),
            ParValue::Str(s) => write!(f, "{s}"),
            ParValue::Tuple(items) => {
                write!(f, "(")?;
                join(f, items)?;
                if items.len() == 1 {
                    write!(f, ",")?;
                }
                write!(f, ")")
            }
            ParValue::List(items) => {
                write!(f, "[")?;
                join(f, items)?;
                write!(f, "]")
            }
            ParValue::Section(_) => write!(f, "<section>"),
        }
    }
}

impl Serialize for ParValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ParValue::None => serializer.serialize_none(),
            ParValue::Bool(b) => serializer.serialize_bool(*b),
            ParValue::Int(i) => serializer.serialize_i64(*i),
            ParValue::Float(x) => serializer.serialize_f64(*x),
            ParValue::Str(s) => serializer.serialize_str(s),
            ParValue::Tuple(items) | ParValue::List(items) => items.serialize(serializer),
            ParValue::Section(section) => section.serialize(serializer),
        }
    }
}

/// An ordered section of evaluated values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParSection {
    entries: Vec<(String, ParValue)>,
}

impl ParSection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&ParValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn section(&self, key: &str) -> Option<&ParSection> {
        self.get(key).and_then(ParValue::as_section)
    }

    pub(crate) fn push(&mut self, key: String, value: ParValue) {
        self.entries.push((key, value));
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for ParSection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_keeps_insertion_order_and_rejects_duplicates() {
        let mut s = ConfigSection::new();
        assert!(s.insert("b", RawValue::Scalar("1".into())));
        assert!(s.insert("a", RawValue::Scalar("2".into())));
        assert!(!s.insert("b", RawValue::Scalar("3".into())));
        let keys: Vec<_> = s.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(s.get("b"), Some(&RawValue::Scalar("1".into())));
    }

    #[test]
    fn display_matches_literal_syntax() {
        let v = ParValue::List(vec![
            ParValue::Tuple(vec![ParValue::Int(1), ParValue::Float(2.0)]),
            ParValue::Tuple(vec![ParValue::Bool(true)]),
        ]);
        assert_eq!(v.to_string(), "[(1, 2.0), (True,)]");
    }

    #[test]
    fn serializes_sections_as_ordered_maps() {
        let mut inner = ParSection::new();
        inner.push("spectrograph".into(), ParValue::Str("shane_kast_blue".into()));
        let mut root = ParSection::new();
        root.push("rdx".into(), ParValue::Section(inner));
        root.push("sigrej".into(), ParValue::Float(3.0));
        let json = serde_json::to_string(&root).unwrap();
        assert_eq!(json, r#"{"rdx":{"spectrograph":"shane_kast_blue"},"sigrej":3.0}"#);
    }
}
