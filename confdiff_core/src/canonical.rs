use confdiff_common::{ConfDiffError, FormatKind, Result};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value as JsonValue;
use serde_yml::Value as YamlValue;
use std::collections::BTreeMap;
use tracing::debug;

/// Numeric scalar as it was parsed
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Integer(i64),
    Unsigned(u64),
    Float(f64),
}

/// Format-independent document tree.
///
/// Mapping keys are always strings; entries keep the order in which they were
/// parsed until [`CanonicalValue::sort_keys`] is applied.
#[derive(Debug, Clone, PartialEq)]
pub enum CanonicalValue {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Sequence(Vec<CanonicalValue>),
    Mapping(Vec<(String, CanonicalValue)>),
}

impl CanonicalValue {
    /// Rebuild every mapping, at any depth, in ascending key order.
    ///
    /// Sequences keep their element order. When stringified keys collide the
    /// last entry wins.
    pub fn sort_keys(self) -> Self {
        match self {
            CanonicalValue::Mapping(entries) => {
                let sorted: BTreeMap<String, CanonicalValue> = entries
                    .into_iter()
                    .map(|(key, value)| (key, value.sort_keys()))
                    .collect();
                CanonicalValue::Mapping(sorted.into_iter().collect())
            }
            CanonicalValue::Sequence(items) => {
                CanonicalValue::Sequence(items.into_iter().map(Self::sort_keys).collect())
            }
            scalar @ (CanonicalValue::Null
            | CanonicalValue::Bool(_)
            | CanonicalValue::Number(_)
            | CanonicalValue::String(_)) => scalar,
        }
    }
}

impl Serialize for CanonicalValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            CanonicalValue::Null => serializer.serialize_unit(),
            CanonicalValue::Bool(b) => serializer.serialize_bool(*b),
            CanonicalValue::Number(Number::Integer(i)) => serializer.serialize_i64(*i),
            CanonicalValue::Number(Number::Unsigned(u)) => serializer.serialize_u64(*u),
            CanonicalValue::Number(Number::Float(f)) => serializer.serialize_f64(*f),
            CanonicalValue::String(s) => serializer.serialize_str(s),
            CanonicalValue::Sequence(items) => serializer.collect_seq(items),
            CanonicalValue::Mapping(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

impl From<JsonValue> for CanonicalValue {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => CanonicalValue::Null,
            JsonValue::Bool(b) => CanonicalValue::Bool(b),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    CanonicalValue::Number(Number::Integer(i))
                } else if let Some(u) = n.as_u64() {
                    CanonicalValue::Number(Number::Unsigned(u))
                } else {
                    CanonicalValue::Number(Number::Float(n.as_f64().unwrap_or(f64::NAN)))
                }
            }
            JsonValue::String(s) => CanonicalValue::String(s),
            JsonValue::Array(items) => {
                CanonicalValue::Sequence(items.into_iter().map(Self::from).collect())
            }
            JsonValue::Object(map) => CanonicalValue::Mapping(
                map.into_iter()
                    .map(|(key, value)| (key, Self::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<YamlValue> for CanonicalValue {
    fn from(value: YamlValue) -> Self {
        match value {
            YamlValue::Null => CanonicalValue::Null,
            YamlValue::Bool(b) => CanonicalValue::Bool(b),
            YamlValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    CanonicalValue::Number(Number::Integer(i))
                } else if let Some(u) = n.as_u64() {
                    CanonicalValue::Number(Number::Unsigned(u))
                } else {
                    CanonicalValue::Number(Number::Float(n.as_f64().unwrap_or(f64::NAN)))
                }
            }
            YamlValue::String(s) => CanonicalValue::String(s),
            YamlValue::Sequence(items) => {
                CanonicalValue::Sequence(items.into_iter().map(Self::from).collect())
            }
            YamlValue::Mapping(map) => CanonicalValue::Mapping(
                map.into_iter()
                    .map(|(key, value)| (yaml_key_to_string(key), Self::from(value)))
                    .collect(),
            ),
            // Tags carry no meaning for comparison; keep the tagged value
            YamlValue::Tagged(tagged) => Self::from(tagged.value),
        }
    }
}

/// Stringify a YAML mapping key using its literal representation
fn yaml_key_to_string(key: YamlValue) -> String {
    match key {
        YamlValue::String(s) => s,
        YamlValue::Null => String::from("null"),
        YamlValue::Bool(b) => b.to_string(),
        YamlValue::Number(n) => n.to_string(),
        YamlValue::Tagged(tagged) => yaml_key_to_string(tagged.value),
        complex @ (YamlValue::Sequence(_) | YamlValue::Mapping(_)) => {
            serde_json::to_string(&CanonicalValue::from(complex)).unwrap_or_default()
        }
    }
}

/// Parse a YAML or JSON document into a [`CanonicalValue`].
///
/// YAML merge keys (`<<`) are resolved before conversion. Plain text has no
/// tree form and is reported as a parse error.
pub fn parse_document(content: &str, format: FormatKind) -> Result<CanonicalValue> {
    let parse_error = |message: String| ConfDiffError::Parse { format, message };

    match format {
        FormatKind::Json => serde_json::from_str::<JsonValue>(content)
            .map(CanonicalValue::from)
            .map_err(|e| parse_error(e.to_string())),
        FormatKind::Yaml => {
            let mut value: YamlValue =
                serde_yml::from_str(content).map_err(|e| parse_error(e.to_string()))?;
            value
                .apply_merge()
                .map_err(|e| parse_error(e.to_string()))?;
            Ok(CanonicalValue::from(value))
        }
        FormatKind::Text => Err(parse_error(String::from(
            "plain text has no structured form",
        ))),
    }
}

/// Serialize a tree back to the notation it came from.
///
/// JSON is pretty-printed with two-space indentation; YAML uses block style.
pub fn render_document(value: &CanonicalValue, format: FormatKind) -> Result<String> {
    let render_error = |message: String| ConfDiffError::Parse { format, message };

    match format {
        FormatKind::Json => {
            serde_json::to_string_pretty(value).map_err(|e| render_error(e.to_string()))
        }
        FormatKind::Yaml => serde_yml::to_string(value).map_err(|e| render_error(e.to_string())),
        FormatKind::Text => Err(render_error(String::from(
            "plain text has no structured form",
        ))),
    }
}

/// Parse, optionally sort keys, and re-serialize a structured document.
///
/// Two documents that differ only in key order (with `ignore_order`),
/// indentation or flow/block style produce byte-identical output.
pub fn canonicalize(
    content: &str,
    format: FormatKind,
    ignore_order: bool,
) -> Result<String> {
    let mut value = parse_document(content, format)?;
    if ignore_order {
        value = value.sort_keys();
    }
    debug!("Canonicalized {} document (ignore_order={})", format, ignore_order);
    render_document(&value, format)
}
