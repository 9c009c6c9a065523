//! Filter operators and their evaluation against coerced cells.

use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TabulaError};
use crate::table::{parse_float, parse_integer, ColumnType, Value};

/// Comparison applied by a row filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOperator {
    Equals,
    NotEquals,
    GreaterThan,
    LessThan,
    GreaterOrEqual,
    LessOrEqual,
    /// Substring match; string columns only.
    Contains,
    StartsWith,
    EndsWith,
}

impl FilterOperator {
    pub const ALL: [FilterOperator; 9] = [
        FilterOperator::Equals,
        FilterOperator::NotEquals,
        FilterOperator::GreaterThan,
        FilterOperator::LessThan,
        FilterOperator::GreaterOrEqual,
        FilterOperator::LessOrEqual,
        FilterOperator::Contains,
        FilterOperator::StartsWith,
        FilterOperator::EndsWith,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOperator::Equals => "equals",
            FilterOperator::NotEquals => "not_equals",
            FilterOperator::GreaterThan => "greater_than",
            FilterOperator::LessThan => "less_than",
            FilterOperator::GreaterOrEqual => "greater_or_equal",
            FilterOperator::LessOrEqual => "less_or_equal",
            FilterOperator::Contains => "contains",
            FilterOperator::StartsWith => "starts_with",
            FilterOperator::EndsWith => "ends_with",
        }
    }

    /// Whether this operator only makes sense on text.
    pub fn is_textual(&self) -> bool {
        matches!(
            self,
            FilterOperator::Contains | FilterOperator::StartsWith | FilterOperator::EndsWith
        )
    }

    /// Reject operator/type pairings that cannot be evaluated.
    pub fn check_applicable(&self, column: &str, column_type: ColumnType) -> Result<()> {
        if self.is_textual() && column_type != ColumnType::String {
            return Err(TabulaError::UnsupportedOperator {
                operator: self.as_str().to_string(),
                reason: format!(
                    "requires a string column, '{}' is {}",
                    column, column_type
                ),
            });
        }
        Ok(())
    }

    /// Evaluate against a coerced cell and operand.
    pub fn evaluate(&self, cell: &Value, operand: &Value) -> bool {
        match self {
            FilterOperator::Contains => text_pair(cell, operand).is_some_and(|(c, o)| c.contains(o)),
            FilterOperator::StartsWith => {
                text_pair(cell, operand).is_some_and(|(c, o)| c.starts_with(o))
            }
            FilterOperator::EndsWith => text_pair(cell, operand).is_some_and(|(c, o)| c.ends_with(o)),
            _ => cell.compare(operand).is_some_and(|ord| self.accepts(ord)),
        }
    }

    fn accepts(&self, ordering: Ordering) -> bool {
        match self {
            FilterOperator::Equals => ordering == Ordering::Equal,
            FilterOperator::NotEquals => ordering != Ordering::Equal,
            FilterOperator::GreaterThan => ordering == Ordering::Greater,
            FilterOperator::LessThan => ordering == Ordering::Less,
            FilterOperator::GreaterOrEqual => ordering != Ordering::Less,
            FilterOperator::LessOrEqual => ordering != Ordering::Greater,
            _ => false,
        }
    }
}

impl FromStr for FilterOperator {
    type Err = TabulaError;

    fn from_str(s: &str) -> Result<Self> {
        let operator = match s.trim().to_ascii_lowercase().as_str() {
            "equals" | "eq" | "==" | "=" => FilterOperator::Equals,
            "not_equals" | "ne" | "!=" | "<>" => FilterOperator::NotEquals,
            "greater_than" | "gt" | ">" => FilterOperator::GreaterThan,
            "less_than" | "lt" | "<" => FilterOperator::LessThan,
            "greater_or_equal" | "gte" | ">=" => FilterOperator::GreaterOrEqual,
            "less_or_equal" | "lte" | "<=" => FilterOperator::LessOrEqual,
            "contains" => FilterOperator::Contains,
            "starts_with" => FilterOperator::StartsWith,
            "ends_with" => FilterOperator::EndsWith,
            _ => {
                return Err(TabulaError::UnsupportedOperator {
                    operator: s.to_string(),
                    reason: format!(
                        "expected one of {}",
                        FilterOperator::ALL.map(|o| o.as_str()).join(", ")
                    ),
                });
            }
        };
        Ok(operator)
    }
}

impl std::fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A filter as requested by a caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub column: String,
    pub operator: FilterOperator,
    /// Operand text, coerced to the column's type before comparing.
    pub operand: String,
}

impl FilterSpec {
    pub fn new(
        column: impl Into<String>,
        operator: FilterOperator,
        operand: impl Into<String>,
    ) -> Self {
        Self {
            column: column.into(),
            operator,
            operand: operand.into(),
        }
    }

    /// Coerce the operand to `column_type`.
    ///
    /// Numeric columns accept any numeric operand so integers can be
    /// compared against fractional thresholds.
    pub fn coerce_operand(&self, column_type: ColumnType) -> Result<Value> {
        let coerced = match column_type {
            ColumnType::Integer | ColumnType::Float => parse_integer(&self.operand)
                .map(Value::Integer)
                .or_else(|| parse_float(&self.operand).map(Value::Float)),
            ColumnType::String => Some(Value::String(self.operand.clone())),
            other => Value::parse_as(self.operand.trim(), other),
        };

        coerced.ok_or_else(|| {
            TabulaError::InvalidArgument(format!(
                "operand '{}' cannot be read as {} for column '{}'",
                self.operand, column_type, self.column
            ))
        })
    }
}

impl std::fmt::Display for FilterSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.column, self.operator, self.operand)
    }
}

fn text_pair<'a>(cell: &'a Value, operand: &'a Value) -> Option<(&'a str, &'a str)> {
    match (cell, operand) {
        (Value::String(c), Value::String(o)) => Some((c.as_str(), o.as_str())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_parse_names_and_aliases() {
        assert_eq!("greater_than".parse::<FilterOperator>().unwrap(), FilterOperator::GreaterThan);
        assert_eq!(">=".parse::<FilterOperator>().unwrap(), FilterOperator::GreaterOrEqual);
        assert_eq!("NE".parse::<FilterOperator>().unwrap(), FilterOperator::NotEquals);

        let err = "between".parse::<FilterOperator>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedOperator);
    }

    #[test]
    fn test_textual_operators_need_strings() {
        let err = FilterOperator::Contains
            .check_applicable("salary", ColumnType::Integer)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedOperator);
        assert!(FilterOperator::Contains
            .check_applicable("name", ColumnType::String)
            .is_ok());
        assert!(FilterOperator::GreaterThan
            .check_applicable("name", ColumnType::String)
            .is_ok());
    }

    #[test]
    fn test_evaluate_comparisons() {
        let threshold = Value::Integer(70000);
        assert!(FilterOperator::GreaterThan.evaluate(&Value::Integer(75000), &threshold));
        assert!(!FilterOperator::GreaterThan.evaluate(&Value::Integer(70000), &threshold));
        assert!(FilterOperator::GreaterOrEqual.evaluate(&Value::Integer(70000), &threshold));
        assert!(FilterOperator::NotEquals.evaluate(&Value::Float(1.5), &threshold));
    }

    #[test]
    fn test_evaluate_text() {
        let cell = Value::String("Engineering".into());
        assert!(FilterOperator::Contains.evaluate(&cell, &Value::String("gine".into())));
        assert!(FilterOperator::StartsWith.evaluate(&cell, &Value::String("Eng".into())));
        assert!(!FilterOperator::EndsWith.evaluate(&cell, &Value::String("ING".into())));
    }

    #[test]
    fn test_coerce_operand() {
        let spec = FilterSpec::new("salary", FilterOperator::GreaterThan, "70000.5");
        assert_eq!(
            spec.coerce_operand(ColumnType::Integer).unwrap(),
            Value::Float(70000.5)
        );

        let spec = FilterSpec::new("salary", FilterOperator::GreaterThan, "lots");
        let err = spec.coerce_operand(ColumnType::Integer).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        let spec = FilterSpec::new("active", FilterOperator::Equals, "Yes");
        assert_eq!(
            spec.coerce_operand(ColumnType::Boolean).unwrap(),
            Value::Boolean(true)
        );
    }

    #[test]
    fn test_filter_display() {
        let spec = FilterSpec::new("salary", FilterOperator::GreaterThan, "70000");
        assert_eq!(spec.to_string(), "salary greater_than 70000");
    }
}
