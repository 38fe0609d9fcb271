use crate::{
    core::value::Value,
    error::ModelError,
    filter::kind::{FilterOperator, FilterType},
};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// The comparand of a filter as the grid sent it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FilterValue {
    Null,
    Scalar(Value),
    List(Vec<Value>),
}

impl FilterValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FilterValue::Null)
    }

    /// Flattens the comparand into a list; a scalar becomes a one-element list.
    pub fn to_list(&self) -> Vec<Value> {
        match self {
            FilterValue::Null => Vec::new(),
            FilterValue::Scalar(v) => vec![v.clone()],
            FilterValue::List(values) => values.clone(),
        }
    }

    fn from_json(property: &str, json: JsonValue) -> Result<Self, ModelError> {
        match json {
            JsonValue::Null => Ok(FilterValue::Null),
            JsonValue::Array(items) => items
                .into_iter()
                .map(|item| scalar_from_json(property, item))
                .collect::<Result<Vec<_>, _>>()
                .map(FilterValue::List),
            other => scalar_from_json(property, other).map(FilterValue::Scalar),
        }
    }
}

fn scalar_from_json(property: &str, json: JsonValue) -> Result<Value, ModelError> {
    match json {
        JsonValue::Null => Ok(Value::Null),
        JsonValue::Bool(b) => Ok(Value::Boolean(b)),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => Ok(Value::Int(i)),
            None => n.as_f64().map(Value::Float).ok_or_else(|| ModelError::InvalidValue {
                property: property.to_string(),
                reason: format!("number {n} is out of range"),
            }),
        },
        JsonValue::String(s) => Ok(Value::String(s)),
        JsonValue::Array(_) | JsonValue::Object(_) => Err(ModelError::InvalidValue {
            property: property.to_string(),
            reason: "nested arrays and objects are not supported".to_string(),
        }),
    }
}

/// One filter rule sent by the grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterDescriptor {
    pub property: String,
    pub filter_type: FilterType,
    pub operator: Option<FilterOperator>,
    pub value: FilterValue,
}

/// Wire shape of a grid filter before validation.
#[derive(Debug, Deserialize)]
struct RawFilter {
    #[serde(alias = "field")]
    property: String,
    #[serde(rename = "type", default)]
    filter_type: Option<String>,
    #[serde(default)]
    operator: Option<String>,
    #[serde(default)]
    value: JsonValue,
}

impl TryFrom<RawFilter> for FilterDescriptor {
    type Error = ModelError;

    fn try_from(raw: RawFilter) -> Result<Self, Self::Error> {
        let filter_type = raw
            .filter_type
            .as_deref()
            .unwrap_or_default()
            .parse::<FilterType>()?;
        let operator = match raw.operator.as_deref() {
            Some(token) => FilterOperator::parse(token)?,
            None => None,
        };
        let value = FilterValue::from_json(&raw.property, raw.value)?;

        Ok(FilterDescriptor {
            property: raw.property,
            filter_type,
            operator,
            value,
        })
    }
}

impl FilterDescriptor {
    pub fn new(
        property: impl Into<String>,
        filter_type: FilterType,
        operator: Option<FilterOperator>,
        value: FilterValue,
    ) -> Self {
        Self {
            property: property.into(),
            filter_type,
            operator,
            value,
        }
    }

    /// Decodes a single filter object.
    pub fn from_json(json: JsonValue) -> Result<Self, ModelError> {
        let raw: RawFilter = serde_json::from_value(json)?;
        raw.try_into()
    }

    /// Decodes the JSON array the grid sends in its `filter` parameter.
    ///
    /// An empty string is treated as "no filters".
    pub fn parse_list(json: &str) -> Result<Vec<Self>, ModelError> {
        if json.trim().is_empty() {
            return Ok(Vec::new());
        }
        let raw: Vec<RawFilter> = serde_json::from_str(json)?;
        raw.into_iter().map(FilterDescriptor::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_list() {
        let filters = FilterDescriptor::parse_list(
            r#"[
                {"property":"name","type":"string","value":"foo"},
                {"property":"id","type":"numeric","operator":"in","value":[1,"2"]},
                {"field":"published","type":"boolean","value":true}
            ]"#,
        )
        .unwrap();

        assert_eq!(filters.len(), 3);
        assert_eq!(filters[0].operator, None);
        assert_eq!(filters[0].value, FilterValue::Scalar(Value::from("foo")));
        assert_eq!(filters[1].operator, Some(FilterOperator::In));
        assert_eq!(
            filters[1].value,
            FilterValue::List(vec![Value::Int(1), Value::from("2")])
        );
        assert_eq!(filters[2].property, "published");
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let err = FilterDescriptor::from_json(json!({
            "property": "name", "type": "fuzzy", "value": "x"
        }))
        .unwrap_err();
        assert!(matches!(err, ModelError::UnknownFilterType(t) if t == "fuzzy"));

        let err = FilterDescriptor::from_json(json!({"property": "name", "value": "x"}))
            .unwrap_err();
        assert!(matches!(err, ModelError::UnknownFilterType(_)));
    }

    #[test]
    fn test_nested_value_is_rejected() {
        let err = FilterDescriptor::from_json(json!({
            "property": "name", "type": "list", "value": [{"a": 1}]
        }))
        .unwrap_err();
        assert!(matches!(err, ModelError::InvalidValue { .. }));
    }

    #[test]
    fn test_missing_value_is_null() {
        let filter =
            FilterDescriptor::from_json(json!({"property": "name", "type": "string"})).unwrap();
        assert!(filter.value.is_null());
        assert!(FilterDescriptor::parse_list("  ").unwrap().is_empty());
    }
}
