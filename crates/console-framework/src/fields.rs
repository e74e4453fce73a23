//! # Field Values
//!
//! Form inputs reach a draft as a [`FieldValue`]. List-valued fields are kept
//! as ordered `Vec<String>` inside drafts and records; the comma-joined form
//! only exists at the edges: text inputs (see [`FieldValue::into_list`]) and
//! the transport (see [`comma_list`]).

use crate::error::FieldError;
use std::fmt::Display;
use std::str::FromStr;

/// Separator used when a list field is flattened into a single string.
pub const LIST_SEPARATOR: char = ',';

/// A value bound to a named draft field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Flag(bool),
    List(Vec<String>),
    Empty,
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    /// Returns true when the value carries nothing a user would call "filled in".
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::List(items) => items.is_empty(),
            FieldValue::Number(n) => n.is_nan(),
            FieldValue::Flag(_) => false,
            FieldValue::Empty => true,
        }
    }

    /// Display form used by text inputs and by comparisons in validation.
    pub fn display(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Number(n) => format_number(*n),
            FieldValue::Flag(b) => b.to_string(),
            FieldValue::List(items) => join_list(items),
            FieldValue::Empty => String::new(),
        }
    }

    /// Numeric view of the value; text is parsed after trimming.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            FieldValue::Text(s) => s,
            other => other.display(),
        }
    }

    /// Converts into a list, splitting text on the list separator.
    pub fn into_list(self) -> Vec<String> {
        match self {
            FieldValue::List(items) => items,
            FieldValue::Empty => Vec::new(),
            other => split_list(&other.into_text()),
        }
    }

    /// Parses into an optional number; blank input clears the field.
    pub fn into_number<T>(self, field: &str) -> Result<Option<T>, FieldError>
    where
        T: FromStr + 'static,
        T::Err: Display,
    {
        if self.is_blank() {
            return Ok(None);
        }
        let raw = match self {
            FieldValue::Number(n) => format_number(n),
            FieldValue::Text(s) => s.trim().to_string(),
            other => return Err(FieldError::invalid(field, format!("expected a number, got {other:?}"))),
        };
        raw.parse::<T>()
            .map(Some)
            .map_err(|e| FieldError::invalid(field, e.to_string()))
    }

    pub fn into_flag(self, field: &str) -> Result<bool, FieldError> {
        match self {
            FieldValue::Flag(b) => Ok(b),
            FieldValue::Empty => Ok(false),
            FieldValue::Text(s) => match s.trim() {
                "true" | "1" | "yes" | "on" => Ok(true),
                "false" | "0" | "no" | "off" | "" => Ok(false),
                other => Err(FieldError::invalid(field, format!("not a boolean: {other}"))),
            },
            other => Err(FieldError::invalid(field, format!("not a boolean: {other:?}"))),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Flag(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        FieldValue::List(value)
    }
}

impl<T: Into<f64>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(n) => FieldValue::Number(n.into()),
            None => FieldValue::Empty,
        }
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// Splits a delimited string into trimmed, non-empty items, preserving order.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(LIST_SEPARATOR)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn join_list(items: &[String]) -> String {
    items.join(",")
}

/// A single binary attachment carried by file-bearing forms.
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    /// Multipart part name expected by the backend.
    pub field: &'static str,
    pub file_name: String,
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Serde adapter that carries a `Vec<String>` as one comma-joined string.
///
/// Deserialization also accepts a JSON array, which some endpoints return.
pub mod comma_list {
    use super::{join_list, split_list};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(items: &[String], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&join_list(items))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Joined(String),
            Items(Vec<String>),
            Missing(()),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Joined(s) => split_list(&s),
            Raw::Items(items) => items,
            Raw::Missing(()) => Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list_trims_and_drops_empty_items() {
        assert_eq!(
            split_list(" remember, recall ,, list "),
            vec!["remember", "recall", "list"]
        );
        assert!(split_list("").is_empty());
    }

    #[test]
    fn test_text_into_list_resplits_display_string() {
        let value = FieldValue::text("define, describe");
        assert_eq!(value.into_list(), vec!["define", "describe"]);
    }

    #[test]
    fn test_into_number_rejects_garbage_and_clears_on_blank() {
        assert_eq!(FieldValue::text(" 4 ").into_number::<u32>("level").unwrap(), Some(4));
        assert_eq!(FieldValue::text("").into_number::<u32>("level").unwrap(), None);
        assert!(matches!(
            FieldValue::text("four").into_number::<u32>("level"),
            Err(FieldError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_number_display_drops_trailing_fraction() {
        assert_eq!(FieldValue::Number(3.0).display(), "3");
        assert_eq!(FieldValue::Number(2.5).display(), "2.5");
    }

    #[derive(serde::Serialize, serde::Deserialize)]
    struct Tagged {
        #[serde(with = "comma_list", default)]
        tags: Vec<String>,
    }

    #[test]
    fn test_comma_list_accepts_string_and_array() {
        let joined: Tagged = serde_json::from_str(r#"{"tags":"a, b"}"#).unwrap();
        assert_eq!(joined.tags, vec!["a", "b"]);
        let array: Tagged = serde_json::from_str(r#"{"tags":["x","y"]}"#).unwrap();
        assert_eq!(array.tags, vec!["x", "y"]);
        let encoded = serde_json::to_string(&array).unwrap();
        assert_eq!(encoded, r#"{"tags":"x,y"}"#);
    }
}
