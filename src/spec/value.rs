//! A YAML value type for extra feature-class attributes.
//!
//! `serde-saphyr` does not provide a generic `Value` type. `SpecValue`
//! carries the values of auxiliary document keys (such as fixtures) into
//! generated class attributes, rejecting null at deserialization time and
//! preserving map insertion order via `IndexMap`.

use indexmap::IndexMap;
use serde::Deserialize;
use serde::de::{self, MapAccess, SeqAccess, Visitor};
use std::fmt;

/// A value assigned to an extra class attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum SpecValue {
    /// A boolean scalar (`true` / `false`).
    Bool(bool),
    /// A signed 64-bit integer scalar.
    Integer(i64),
    /// A floating-point scalar.
    Float(f64),
    /// A string scalar.
    String(String),
    /// An ordered sequence of values.
    Sequence(Vec<Self>),
    /// An ordered mapping of string keys to values.
    Mapping(IndexMap<String, Self>),
    /// A Python expression recovered verbatim from generated source.
    Python(String),
}

impl SpecValue {
    /// Renders the value as a Python literal expression.
    #[must_use]
    pub fn to_python(&self) -> String {
        match self {
            Self::Bool(true) => "True".to_owned(),
            Self::Bool(false) => "False".to_owned(),
            Self::Integer(value) => value.to_string(),
            Self::Float(value) => format!("{value:?}"),
            Self::String(value) => quote_single(value),
            Self::Sequence(items) => {
                let rendered: Vec<String> = items.iter().map(Self::to_python).collect();
                format!("[{}]", rendered.join(", "))
            }
            Self::Mapping(entries) => {
                let rendered: Vec<String> = entries
                    .iter()
                    .map(|(key, value)| format!("{}: {}", quote_single(key), value.to_python()))
                    .collect();
                format!("{{{}}}", rendered.join(", "))
            }
            Self::Python(expression) => expression.clone(),
        }
    }

    /// Renders the value as a YAML flow scalar, sequence or mapping.
    #[must_use]
    pub fn to_yaml_flow(&self) -> String {
        match self {
            Self::Bool(value) => value.to_string(),
            Self::Integer(value) => value.to_string(),
            Self::Float(value) => format!("{value:?}"),
            Self::String(value) | Self::Python(value) => quote_yaml(value),
            Self::Sequence(items) => {
                let rendered: Vec<String> = items.iter().map(Self::to_yaml_flow).collect();
                format!("[{}]", rendered.join(", "))
            }
            Self::Mapping(entries) => {
                let rendered: Vec<String> = entries
                    .iter()
                    .map(|(key, value)| format!("{}: {}", quote_yaml(key), value.to_yaml_flow()))
                    .collect();
                format!("{{{}}}", rendered.join(", "))
            }
        }
    }
}

/// Quotes a string as a single-quoted Python literal.
pub(crate) fn quote_single(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{escaped}'")
}

/// Quotes a string as a single-quoted YAML scalar.
pub(crate) fn quote_yaml(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

impl<'de> Deserialize<'de> for SpecValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        deserializer.deserialize_any(SpecValueVisitor)
    }
}

/// Visitor implementation for deserializing arbitrary YAML values into
/// `SpecValue`, rejecting null.
struct SpecValueVisitor;

impl<'de> Visitor<'de> for SpecValueVisitor {
    type Value = SpecValue;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(
            "a non-null YAML value (bool, integer, float, string, \
             sequence, or mapping)",
        )
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(SpecValue::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(SpecValue::Integer(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        i64::try_from(v)
            .map(SpecValue::Integer)
            .map_err(|_| de::Error::custom(format!("integer {v} is out of range for i64")))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(SpecValue::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(SpecValue::String(v.to_owned()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(SpecValue::String(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Err(de::Error::custom(
            "null values are not permitted as class attributes",
        ))
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Err(de::Error::custom(
            "null values are not permitted as class attributes",
        ))
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(SpecValue::Sequence(items))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut entries = IndexMap::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((key, val)) = map.next_entry()? {
            entries.insert(key, val);
        }
        Ok(SpecValue::Mapping(entries))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::bool(SpecValue::Bool(true), "True")]
    #[case::integer(SpecValue::Integer(12), "12")]
    #[case::float(SpecValue::Float(1.0), "1.0")]
    #[case::string(SpecValue::String("it's".to_owned()), r"'it\'s'")]
    #[case::verbatim(SpecValue::Python("['a']".to_owned()), "['a']")]
    fn renders_python_literals(#[case] value: SpecValue, #[case] expected: &str) {
        assert_eq!(value.to_python(), expected);
    }

    #[test]
    fn renders_nested_collections_in_order() {
        let mut mapping = IndexMap::new();
        mapping.insert("z".to_owned(), SpecValue::Integer(1));
        mapping.insert("a".to_owned(), SpecValue::Bool(false));
        let value = SpecValue::Sequence(vec![
            SpecValue::String("player-alice".to_owned()),
            SpecValue::Mapping(mapping),
        ]);
        assert_eq!(value.to_python(), "['player-alice', {'z': 1, 'a': False}]");
        assert_eq!(value.to_yaml_flow(), "['player-alice', {'z': 1, 'a': false}]");
    }

    #[test]
    fn yaml_quoting_doubles_single_quotes() {
        assert_eq!(
            SpecValue::String("it's".to_owned()).to_yaml_flow(),
            "'it''s'"
        );
    }
}
