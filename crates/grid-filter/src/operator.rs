//! Maps a filter's `(type, operator)` pair to a SQL comparison and turns the
//! raw comparand into the literal(s) that comparison needs.

use crate::error::CompileError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use lazy_static::lazy_static;
use model::{
    core::value::Value,
    filter::{FilterOperator, FilterType, FilterValue},
};
use query::ast::expr::BinaryOperator;
use regex::Regex;
use std::{collections::HashSet, fmt};

/// Seconds added to the start of a day so `=` on a date covers the whole day.
pub const DAY_RANGE_SECONDS: i64 = 86_399;

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

lazy_static! {
    static ref NUMERIC_TOKEN: Regex =
        Regex::new(r"\d+(?:\.\d+)?").expect("numeric token pattern is valid");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlOperator {
    Like,
    Eq,
    Lt,
    Gt,
    In,
    Between,
}

impl SqlOperator {
    /// The binary operator for the plain comparisons; `IN` and `BETWEEN`
    /// have their own expression shapes.
    pub fn binary(self) -> Option<BinaryOperator> {
        match self {
            SqlOperator::Like => Some(BinaryOperator::Like),
            SqlOperator::Eq => Some(BinaryOperator::Eq),
            SqlOperator::Lt => Some(BinaryOperator::Lt),
            SqlOperator::Gt => Some(BinaryOperator::Gt),
            SqlOperator::In | SqlOperator::Between => None,
        }
    }
}

impl fmt::Display for SqlOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SqlOperator::Like => "LIKE",
            SqlOperator::Eq => "=",
            SqlOperator::Lt => "<",
            SqlOperator::Gt => ">",
            SqlOperator::In => "IN",
            SqlOperator::Between => "BETWEEN",
        };
        f.write_str(s)
    }
}

/// How the raw comparand is coerced before it is compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueTransform {
    /// `%value%`
    Wildcard,
    Identity,
    /// Date string to unix timestamp.
    Timestamp,
    /// Date string to `[ts, ts + 86399]`.
    DayRange,
    /// Truthy value to `0` / `1`.
    Boolean,
    /// Numeric tokens extracted from free text, deduplicated.
    NumericTokens,
}

/// The comparand after coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum Comparand {
    Single(Value),
    Range(Value, Value),
    List(Vec<Value>),
}

impl Comparand {
    pub fn values(&self) -> Vec<&Value> {
        match self {
            Comparand::Single(v) => vec![v],
            Comparand::Range(low, high) => vec![low, high],
            Comparand::List(values) => values.iter().collect(),
        }
    }

    /// Applies `f` to every literal, keeping the shape.
    pub fn map(&self, f: impl Fn(&Value) -> Value) -> Comparand {
        match self {
            Comparand::Single(v) => Comparand::Single(f(v)),
            Comparand::Range(low, high) => Comparand::Range(f(low), f(high)),
            Comparand::List(values) => Comparand::List(values.iter().map(f).collect()),
        }
    }
}

pub fn map_operator(
    filter_type: FilterType,
    operator: Option<FilterOperator>,
) -> (SqlOperator, ValueTransform) {
    if operator == Some(FilterOperator::In) {
        return (SqlOperator::In, ValueTransform::NumericTokens);
    }

    match filter_type {
        FilterType::String => (SqlOperator::Like, ValueTransform::Wildcard),
        FilterType::Numeric => (comparison(operator), ValueTransform::Identity),
        FilterType::Date => match comparison(operator) {
            SqlOperator::Eq => (SqlOperator::Between, ValueTransform::DayRange),
            op => (op, ValueTransform::Timestamp),
        },
        FilterType::List => (SqlOperator::Eq, ValueTransform::Identity),
        FilterType::Boolean => (SqlOperator::Eq, ValueTransform::Boolean),
    }
}

/// Same as [`map_operator`] for the raw tokens of a request.
pub fn map_operator_tokens(
    filter_type: &str,
    operator: Option<&str>,
) -> Result<(SqlOperator, ValueTransform), CompileError> {
    let filter_type = filter_type.parse::<FilterType>()?;
    let operator = match operator {
        Some(token) => FilterOperator::parse(token)?,
        None => None,
    };
    Ok(map_operator(filter_type, operator))
}

fn comparison(operator: Option<FilterOperator>) -> SqlOperator {
    match operator {
        Some(FilterOperator::Lt) => SqlOperator::Lt,
        Some(FilterOperator::Gt) => SqlOperator::Gt,
        _ => SqlOperator::Eq,
    }
}

/// Extracts every number in the given values, in order of appearance.
pub fn numeric_tokens(values: &[Value]) -> Vec<Value> {
    let mut seen = HashSet::new();
    let mut tokens = Vec::new();
    for text in values.iter().filter_map(Value::as_string) {
        for m in NUMERIC_TOKEN.find_iter(&text) {
            if seen.insert(m.as_str().to_string()) {
                tokens.push(Value::from(m.as_str()).to_numeric());
            }
        }
    }
    tokens
}

/// Applies a [`ValueTransform`] to request values.
#[derive(Debug, Clone, Copy)]
pub struct ValueCoercer {
    tz: Tz,
}

impl ValueCoercer {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// Coerces a whole filter value. `None` means there is nothing to compare
    /// against and the filter should not produce a condition.
    pub fn coerce(
        &self,
        transform: ValueTransform,
        value: &FilterValue,
    ) -> Result<Option<Comparand>, CompileError> {
        match (transform, value) {
            (_, FilterValue::Null) => Ok(None),
            (ValueTransform::NumericTokens, v) => Ok(token_list(&v.to_list())),
            (_, FilterValue::Scalar(v)) => self.coerce_one(transform, v),
            (_, FilterValue::List(values)) => match values.as_slice() {
                [] => Ok(None),
                [single] => self.coerce_one(transform, single),
                _ => self.coerce_many(transform, values),
            },
        }
    }

    pub fn coerce_one(
        &self,
        transform: ValueTransform,
        value: &Value,
    ) -> Result<Option<Comparand>, CompileError> {
        if value.is_null() {
            return Ok(None);
        }

        let comparand = match transform {
            ValueTransform::Wildcard => {
                let text = value.as_string().unwrap_or_default();
                Comparand::Single(Value::String(format!("%{text}%")))
            }
            ValueTransform::Identity => Comparand::Single(value.clone()),
            ValueTransform::Timestamp => Comparand::Single(Value::Int(self.timestamp(value)?)),
            ValueTransform::DayRange => {
                let start = self.timestamp(value)?;
                let end = start.checked_add(DAY_RANGE_SECONDS).ok_or_else(|| {
                    CompileError::configuration(format!("Date '{value}' is out of range"))
                })?;
                Comparand::Range(Value::Int(start), Value::Int(end))
            }
            ValueTransform::Boolean => Comparand::Single(Value::Int(i64::from(value.as_bool()))),
            ValueTransform::NumericTokens => return Ok(token_list(std::slice::from_ref(value))),
        };
        Ok(Some(comparand))
    }

    fn coerce_many(
        &self,
        transform: ValueTransform,
        values: &[Value],
    ) -> Result<Option<Comparand>, CompileError> {
        let mut out = Vec::with_capacity(values.len());
        for value in values {
            match self.coerce_one(transform, value)? {
                Some(Comparand::Single(v)) => out.push(v),
                Some(_) => {
                    return Err(CompileError::configuration(
                        "A date equality filter takes a single value",
                    ));
                }
                None => {}
            }
        }
        Ok((!out.is_empty()).then_some(Comparand::List(out)))
    }

    /// Unix timestamp of a grid date value, interpreted in the configured zone.
    pub fn timestamp(&self, value: &Value) -> Result<i64, CompileError> {
        match value {
            Value::Int(ts) => Ok(*ts),
            Value::Float(ts) if ts.is_finite() => Ok(ts.trunc() as i64),
            Value::String(s) => self.parse_date(s.trim()),
            other => Err(CompileError::configuration(format!(
                "Cannot interpret '{other}' as a date"
            ))),
        }
    }

    fn parse_date(&self, s: &str) -> Result<i64, CompileError> {
        if let Ok(ts) = s.parse::<i64>() {
            return Ok(ts);
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(dt.timestamp());
        }
        for format in DATETIME_FORMATS {
            if let Ok(ndt) = NaiveDateTime::parse_from_str(s, format) {
                return self.localize(ndt, s);
            }
        }
        for format in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(s, format)
                && let Some(ndt) = date.and_hms_opt(0, 0, 0)
            {
                return self.localize(ndt, s);
            }
        }
        Err(CompileError::configuration(format!(
            "Cannot interpret '{s}' as a date"
        )))
    }

    fn localize(&self, ndt: NaiveDateTime, raw: &str) -> Result<i64, CompileError> {
        self.tz
            .from_local_datetime(&ndt)
            .earliest()
            .map(|dt| dt.timestamp())
            .ok_or_else(|| {
                CompileError::configuration(format!(
                    "'{raw}' does not exist in time zone {}",
                    self.tz
                ))
            })
    }
}

impl Default for ValueCoercer {
    fn default() -> Self {
        Self::new(chrono_tz::UTC)
    }
}

fn token_list(values: &[Value]) -> Option<Comparand> {
    let tokens = numeric_tokens(values);
    (!tokens.is_empty()).then_some(Comparand::List(tokens))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_table() {
        use FilterOperator as Op;
        use FilterType as T;

        let cases = [
            (T::String, Some(Op::Eq), SqlOperator::Like, ValueTransform::Wildcard),
            (T::String, None, SqlOperator::Like, ValueTransform::Wildcard),
            (T::Numeric, Some(Op::Lt), SqlOperator::Lt, ValueTransform::Identity),
            (T::Numeric, None, SqlOperator::Eq, ValueTransform::Identity),
            (T::Date, Some(Op::Gt), SqlOperator::Gt, ValueTransform::Timestamp),
            (T::Date, Some(Op::Eq), SqlOperator::Between, ValueTransform::DayRange),
            (T::List, Some(Op::Gt), SqlOperator::Eq, ValueTransform::Identity),
            (T::Boolean, None, SqlOperator::Eq, ValueTransform::Boolean),
            (T::String, Some(Op::In), SqlOperator::In, ValueTransform::NumericTokens),
        ];
        for (filter_type, op, sql, transform) in cases {
            assert_eq!(map_operator(filter_type, op), (sql, transform), "{filter_type} {op:?}");
        }
    }

    #[test]
    fn test_unknown_type_token_is_configuration_error() {
        assert!(matches!(
            map_operator_tokens("fuzzy", None),
            Err(CompileError::Configuration(_))
        ));
        assert_eq!(
            map_operator_tokens("numeric", Some("gt")).unwrap(),
            (SqlOperator::Gt, ValueTransform::Identity)
        );
    }

    #[test]
    fn test_numeric_tokens_are_deduplicated() {
        let tokens = numeric_tokens(&[Value::from("12, 34 foo 56, 12"), Value::Int(34)]);
        assert_eq!(tokens, vec![Value::Int(12), Value::Int(34), Value::Int(56)]);
        assert!(numeric_tokens(&[Value::from("abc")]).is_empty());
    }

    #[test]
    fn test_day_range() {
        let coercer = ValueCoercer::default();
        let comparand = coercer
            .coerce(
                ValueTransform::DayRange,
                &FilterValue::Scalar(Value::from("2024-01-15")),
            )
            .unwrap();
        assert_eq!(
            comparand,
            Some(Comparand::Range(
                Value::Int(1_705_276_800),
                Value::Int(1_705_276_800 + 86_399)
            ))
        );
    }

    #[test]
    fn test_day_range_rejects_overflowing_timestamp() {
        let coercer = ValueCoercer::default();
        let result = coercer.coerce(
            ValueTransform::DayRange,
            &FilterValue::Scalar(Value::Int(i64::MAX)),
        );
        assert!(matches!(result, Err(CompileError::Configuration(_))));

        let result = coercer.coerce(
            ValueTransform::DayRange,
            &FilterValue::Scalar(Value::from(i64::MAX.to_string())),
        );
        assert!(matches!(result, Err(CompileError::Configuration(_))));
    }

    #[test]
    fn test_timestamp_respects_timezone() {
        let vienna = ValueCoercer::new(chrono_tz::Europe::Vienna);
        assert_eq!(
            vienna.timestamp(&Value::from("2024-01-15")).unwrap(),
            1_705_276_800 - 3600
        );
        assert_eq!(vienna.timestamp(&Value::from("01/15/2024")).unwrap(), 1_705_273_200);
        assert_eq!(vienna.timestamp(&Value::Int(42)).unwrap(), 42);
        assert!(vienna.timestamp(&Value::from("yesterday")).is_err());
    }

    #[test]
    fn test_wildcard_and_boolean() {
        let coercer = ValueCoercer::default();
        assert_eq!(
            coercer
                .coerce_one(ValueTransform::Wildcard, &Value::from("foo"))
                .unwrap(),
            Some(Comparand::Single(Value::from("%foo%")))
        );
        assert_eq!(
            coercer
                .coerce_one(ValueTransform::Boolean, &Value::from("1"))
                .unwrap(),
            Some(Comparand::Single(Value::Int(1)))
        );
        assert_eq!(
            coercer
                .coerce(ValueTransform::NumericTokens, &FilterValue::Scalar(Value::from("abc")))
                .unwrap(),
            None
        );
    }

    #[test]
    fn test_list_values() {
        let coercer = ValueCoercer::default();
        let list = FilterValue::List(vec![Value::from("a"), Value::from("b")]);
        assert_eq!(
            coercer.coerce(ValueTransform::Identity, &list).unwrap(),
            Some(Comparand::List(vec![Value::from("a"), Value::from("b")]))
        );

        let dates = FilterValue::List(vec![Value::from("2024-01-01"), Value::from("2024-01-02")]);
        assert!(coercer.coerce(ValueTransform::DayRange, &dates).is_err());
    }
}
