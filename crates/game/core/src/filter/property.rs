use std::cmp::Ordering;
use std::str::FromStr;

use regex::Regex;

use super::FilterError;
use crate::property::{PropertySet, PropertyValue};

/// How the filter value (and the property) is interpreted.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ValueType {
    Int,
    Float,
    String,
    Regex,
}

/// Comparison applied between the property and the filter value.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum Comparison {
    Equal,
    NotEqual,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    ContainsWord,
    NotContainsWord,
    Match,
    NotMatch,
}

impl Comparison {
    fn accepts(self, value_type: ValueType) -> bool {
        use Comparison::*;
        match value_type {
            ValueType::Int | ValueType::Float => matches!(
                self,
                Equal | NotEqual | Less | Greater | LessEqual | GreaterEqual
            ),
            ValueType::String => matches!(self, Equal | NotEqual | ContainsWord | NotContainsWord),
            ValueType::Regex => matches!(self, Match | NotMatch),
        }
    }

    fn holds(self, ordering: Option<Ordering>) -> bool {
        let Some(ordering) = ordering else {
            return self == Comparison::NotEqual;
        };
        match self {
            Comparison::Equal => ordering == Ordering::Equal,
            Comparison::NotEqual => ordering != Ordering::Equal,
            Comparison::Less => ordering == Ordering::Less,
            Comparison::Greater => ordering == Ordering::Greater,
            Comparison::LessEqual => ordering != Ordering::Greater,
            Comparison::GreaterEqual => ordering != Ordering::Less,
            _ => false,
        }
    }
}

#[derive(Clone, Debug)]
enum FilterValue {
    Int(i64),
    Float(f64),
    Text(String),
    Pattern(Regex),
}

/// Compares one named property against a constant.
///
/// A subject lacking the property, or holding a value of the wrong shape,
/// never matches.
#[derive(Clone, Debug)]
pub struct PropertyFilter {
    property: String,
    comparison: Comparison,
    value: FilterValue,
}

impl PropertyFilter {
    pub fn new(
        property: impl Into<String>,
        value_type: ValueType,
        comparison: Comparison,
        value: &str,
    ) -> Result<Self, FilterError> {
        if !comparison.accepts(value_type) {
            return Err(FilterError::UnsupportedComparison {
                value_type,
                comparison,
            });
        }
        let invalid = || FilterError::InvalidValue {
            value_type,
            text: value.to_owned(),
        };
        let value = match value_type {
            ValueType::Int => FilterValue::Int(value.trim().parse().map_err(|_| invalid())?),
            ValueType::Float => FilterValue::Float(value.trim().parse().map_err(|_| invalid())?),
            ValueType::String => FilterValue::Text(value.to_owned()),
            ValueType::Regex => {
                let anchored = format!("^(?:{value})$");
                FilterValue::Pattern(Regex::new(&anchored).map_err(|err| {
                    FilterError::InvalidRegex {
                        pattern: value.to_owned(),
                        reason: err.to_string(),
                    }
                })?)
            }
        };
        Ok(Self {
            property: property.into(),
            comparison,
            value,
        })
    }

    /// Builds a filter from the textual names used in content files.
    pub fn parse(
        property: impl Into<String>,
        value_type: &str,
        comparison: &str,
        value: &str,
    ) -> Result<Self, FilterError> {
        let value_type = ValueType::from_str(value_type)
            .map_err(|_| FilterError::UnknownValueType(value_type.to_owned()))?;
        let comparison = Comparison::from_str(comparison)
            .map_err(|_| FilterError::UnknownComparison(comparison.to_owned()))?;
        Self::new(property, value_type, comparison, value)
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    pub fn comparison(&self) -> Comparison {
        self.comparison
    }

    pub fn check(&self, properties: &PropertySet) -> bool {
        let Some(actual) = properties.get(&self.property) else {
            return false;
        };
        match &self.value {
            FilterValue::Int(expected) => actual
                .as_int()
                .is_some_and(|v| self.comparison.holds(Some(v.cmp(expected)))),
            FilterValue::Float(expected) => actual
                .as_float()
                .is_some_and(|v| self.comparison.holds(v.partial_cmp(expected))),
            FilterValue::Text(expected) => self.check_text(actual, expected),
            FilterValue::Pattern(regex) => actual
                .as_text()
                .is_some_and(|v| regex.is_match(v) == (self.comparison == Comparison::Match)),
        }
    }

    fn check_text(&self, actual: &PropertyValue, expected: &str) -> bool {
        let contains_word = |actual: &PropertyValue| match actual {
            PropertyValue::Text(text) => text.split(' ').any(|word| word == expected),
            PropertyValue::List(items) => items.iter().any(|item| item == expected),
            _ => false,
        };
        match self.comparison {
            Comparison::ContainsWord => contains_word(actual),
            Comparison::NotContainsWord => {
                matches!(actual, PropertyValue::Text(_) | PropertyValue::List(_))
                    && !contains_word(actual)
            }
            Comparison::Equal => actual.as_text() == Some(expected),
            Comparison::NotEqual => actual.as_text().is_some_and(|v| v != expected),
            _ => false,
        }
    }
}
