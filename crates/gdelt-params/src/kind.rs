//! The single tagged parameter kind and its conversions.

use crate::category::CategoryParameter;
use crate::date;
use gdelt_types::ParamValue;
use serde_json::Value;
use std::borrow::Cow;

/// How one parameter is entered, checked, and converted.
#[derive(Debug, Clone)]
pub enum ParameterKind {
    Int,
    Float,
    Text,
    Date,
    DateRange,
    Month,
    MonthRange,
    Year,
    YearRange,
    Category(CategoryParameter),
}

fn text(raw: &Value) -> Option<Cow<'_, str>> {
    match raw {
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        _ => None,
    }
}

fn number(raw: &Value) -> Result<Cow<'_, str>, &'static str> {
    text(raw).ok_or("Wrong number format")
}

fn scalar(raw: &Value) -> Result<Cow<'_, str>, &'static str> {
    text(raw).ok_or("Wrong value")
}

impl ParameterKind {
    pub fn name(&self) -> &'static str {
        match self {
            ParameterKind::Int => "int",
            ParameterKind::Float => "float",
            ParameterKind::Text => "text",
            ParameterKind::Date => "date",
            ParameterKind::DateRange => "date_range",
            ParameterKind::Month => "month",
            ParameterKind::MonthRange => "month_range",
            ParameterKind::Year => "year",
            ParameterKind::YearRange => "year_range",
            ParameterKind::Category(_) => "category",
        }
    }

    /// Check a raw form value and convert it to its typed form.
    pub fn parse(&self, raw: &Value) -> Result<ParamValue, &'static str> {
        let value = match self {
            ParameterKind::Int => ParamValue::Int(
                number(raw)?
                    .trim()
                    .parse()
                    .map_err(|_| "Wrong number format")?,
            ),
            ParameterKind::Float => {
                let v: f64 = number(raw)?
                    .trim()
                    .parse()
                    .map_err(|_| "Wrong number format")?;
                if !v.is_finite() {
                    return Err("Wrong number format");
                }
                ParamValue::Float(v)
            }
            ParameterKind::Text => ParamValue::Text(scalar(raw)?.trim().to_string()),
            ParameterKind::Date => ParamValue::Date(date::parse_date(scalar(raw)?.trim())?),
            ParameterKind::DateRange => {
                let (a, b) = date::parse_date_range(scalar(raw)?.trim())?;
                ParamValue::DateRange(a, b)
            }
            ParameterKind::Month => ParamValue::Month(date::parse_month(scalar(raw)?.trim())?),
            ParameterKind::MonthRange => {
                let (a, b) = date::parse_month_range(scalar(raw)?.trim())?;
                ParamValue::MonthRange(a, b)
            }
            ParameterKind::Year => ParamValue::Year(date::parse_year(scalar(raw)?.trim())?),
            ParameterKind::YearRange => {
                let (a, b) = date::parse_year_range(scalar(raw)?.trim())?;
                ParamValue::YearRange(a, b)
            }
            ParameterKind::Category(c) => ParamValue::Category(c.parse(raw)?),
        };
        Ok(value)
    }

    /// Format a typed value back into what the input field expects
    /// (e.g. `20190101` -> `01/01/2019`). `None` when the value does not fit
    /// this kind.
    pub fn display(&self, value: &ParamValue) -> Option<String> {
        match (self, value) {
            (ParameterKind::Int, ParamValue::Int(v)) => Some(v.to_string()),
            (ParameterKind::Float, ParamValue::Float(v)) => Some(v.to_string()),
            (ParameterKind::Text, ParamValue::Text(s)) => Some(s.clone()),
            (ParameterKind::Date, ParamValue::Date(d)) => date::format_date(d),
            (ParameterKind::DateRange, ParamValue::DateRange(a, b)) => {
                date::join_range(date::format_date(a), date::format_date(b))
            }
            (ParameterKind::Month, ParamValue::Month(m)) => date::format_month(m),
            (ParameterKind::MonthRange, ParamValue::MonthRange(a, b)) => {
                date::join_range(date::format_month(a), date::format_month(b))
            }
            (ParameterKind::Year, ParamValue::Year(y)) => Some(y.clone()),
            (ParameterKind::YearRange, ParamValue::YearRange(a, b)) => {
                date::join_range(Some(a.clone()), Some(b.clone()))
            }
            (ParameterKind::Category(c), ParamValue::Category(s)) => c.display(s),
            _ => None,
        }
    }
}
