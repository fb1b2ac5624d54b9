//! Typed parameter values produced by validation and handed to functions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Value of a category parameter after label -> code resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "codes", rename_all = "lowercase")]
pub enum Selection {
    /// Every code of the table.
    All,
    /// Nothing selected (only when the parameter allows null).
    None,
    Codes(Vec<String>),
}

impl Selection {
    /// The single selected code, if exactly one was chosen.
    pub fn single(&self) -> Option<&str> {
        match self {
            Selection::Codes(codes) if codes.len() == 1 => Some(codes[0].as_str()),
            _ => None,
        }
    }
}

/// A validated parameter value.
///
/// Dates use the warehouse column formats: `YYYYMMDD` for days, `YYYYMM` for
/// months and `YYYY` for years.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ParamValue {
    Int(i64),
    Float(f64),
    Text(String),
    Date(String),
    DateRange(String, String),
    Month(String),
    MonthRange(String, String),
    Year(String),
    YearRange(String, String),
    Category(Selection),
}

impl ParamValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ParamValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            ParamValue::Float(v) => Some(*v),
            ParamValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Text-like payload: text, single date, month or year.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Text(s) | ParamValue::Date(s) | ParamValue::Month(s) | ParamValue::Year(s) => {
                Some(s)
            }
            _ => None,
        }
    }

    pub fn as_range(&self) -> Option<(&str, &str)> {
        match self {
            ParamValue::DateRange(a, b)
            | ParamValue::MonthRange(a, b)
            | ParamValue::YearRange(a, b) => Some((a, b)),
            _ => None,
        }
    }

    pub fn as_selection(&self) -> Option<&Selection> {
        match self {
            ParamValue::Category(s) => Some(s),
            _ => None,
        }
    }
}

/// Validated parameters of one function invocation, keyed by parameter id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterValues(BTreeMap<String, ParamValue>);

impl ParameterValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, value: ParamValue) -> Option<ParamValue> {
        self.0.insert(id.into(), value)
    }

    pub fn get(&self, id: &str) -> Option<&ParamValue> {
        self.0.get(id)
    }

    pub fn int(&self, id: &str) -> Option<i64> {
        self.get(id).and_then(ParamValue::as_int)
    }

    /// Code of a single-valued category parameter.
    pub fn code(&self, id: &str) -> Option<&str> {
        self.get(id)
            .and_then(ParamValue::as_selection)
            .and_then(Selection::single)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ParamValue)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, ParamValue)> for ParameterValues {
    fn from_iter<I: IntoIterator<Item = (String, ParamValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_code_requires_single_selection() {
        let mut values = ParameterValues::new();
        values.insert("one", ParamValue::Category(Selection::Codes(vec!["US".into()])));
        values.insert(
            "two",
            ParamValue::Category(Selection::Codes(vec!["US".into(), "PL".into()])),
        );
        values.insert("all", ParamValue::Category(Selection::All));
        assert_eq!(values.code("one"), Some("US"));
        assert_eq!(values.code("two"), None);
        assert_eq!(values.code("all"), None);
        assert_eq!(values.code("missing"), None);
    }

    #[test]
    fn serializes_with_type_tags() {
        let v = serde_json::to_value(ParamValue::MonthRange("201301".into(), "201906".into()))
            .unwrap();
        assert_eq!(
            v,
            serde_json::json!({ "type": "month_range", "value": ["201301", "201906"] })
        );
        let v = serde_json::to_value(ParamValue::Category(Selection::All)).unwrap();
        assert_eq!(
            v,
            serde_json::json!({ "type": "category", "value": { "kind": "all" } })
        );
    }
}
