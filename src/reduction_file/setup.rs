//! Interpretation of the `setup` block.
//!
//! The block is YAML with one legacy shorthand: older files wrote `Setup A` without the
//! trailing colon, which is added back before the text is handed to `serde_yaml`.

use crate::error::{RdxError, RdxResult};
use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::fmt;

const SETUP_KEY: &str = "Setup";

/// How many setups a setup block may define.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetupPolicy {
    /// At most one setup; a second one is an error.
    #[default]
    SingleSetup,
    /// Collect every setup key, as older files may contain several.
    Permissive,
}

/// Parsed setup block.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SetupBlock {
    /// Setup names (`A`, `B`, ...) in the order they appear.
    pub names: Vec<String>,
    pub mapping: Mapping,
}

impl SetupBlock {
    /// Description of a setup by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.mapping.iter().find_map(|(key, value)| {
            let key = key.as_str()?;
            (setup_name(key)? == name).then_some(value)
        })
    }
}

/// Second whitespace token of a `Setup <name>` key.
fn setup_name(key: &str) -> Option<&str> {
    if !key.contains(SETUP_KEY) {
        return None;
    }
    key.split_whitespace().nth(1)
}

/// Add the colon older files omitted after `Setup <name>`.
pub fn normalize_setup_lines(lines: &[String]) -> Vec<String> {
    lines
        .iter()
        .map(|line| {
            if line.contains(SETUP_KEY) && !line.contains(':') {
                format!("{line}:")
            } else {
                line.clone()
            }
        })
        .collect()
}

/// A YAML value whose mappings keep the last of repeated keys.
///
/// The line reader strips indentation, so the sub-keys of every setup (`--`,
/// `dichroic`, ...) land at the top level and repeat once per setup.
struct LastWins(Value);

impl<'de> Deserialize<'de> for LastWins {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(LastWinsVisitor).map(LastWins)
    }
}

struct LastWinsVisitor;

impl<'de> Visitor<'de> for LastWinsVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any YAML value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
        Ok(Value::Number(v.into()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
        Ok(Value::Number(v.into()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Value, E> {
        Ok(Value::Number(v.into()))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Value, E> {
        Ok(Value::String(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Value, E> {
        Ok(Value::String(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        LastWins::deserialize(deserializer).map(|v| v.0)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let mut items = Vec::new();
        while let Some(LastWins(item)) = seq.next_element()? {
            items.push(item);
        }
        Ok(Value::Sequence(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Value, A::Error> {
        let mut mapping = Mapping::new();
        while let Some((LastWins(key), LastWins(value))) = map.next_entry()? {
            mapping.insert(key, value);
        }
        Ok(Value::Mapping(mapping))
    }
}

/// Parse the content lines of a setup block.
///
/// Repeated keys keep their last value.
pub fn interpret_setup_block(lines: &[String], policy: SetupPolicy) -> RdxResult<SetupBlock> {
    let text = normalize_setup_lines(lines).join("\n");
    let LastWins(value) = serde_yaml::from_str(&text)?;
    let mapping = match value {
        Value::Mapping(m) => m,
        Value::Null => Mapping::new(),
        other => {
            return Err(RdxError::Schema(format!(
                "Setup block must be a mapping, found {}",
                serde_yaml::to_string(&other)?.trim()
            )))
        }
    };

    let names: Vec<String> = mapping
        .keys()
        .filter_map(Value::as_str)
        .filter_map(setup_name)
        .map(str::to_string)
        .collect();

    if policy == SetupPolicy::SingleSetup && names.len() > 1 {
        return Err(RdxError::SetupCount {
            found: names.len(),
            names,
        });
    }

    Ok(SetupBlock { names, mapping })
}
