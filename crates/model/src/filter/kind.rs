use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Declared value type of a grid filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterType {
    String,
    Numeric,
    Date,
    List,
    Boolean,
}

impl FromStr for FilterType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(FilterType::String),
            "numeric" => Ok(FilterType::Numeric),
            "date" => Ok(FilterType::Date),
            "list" => Ok(FilterType::List),
            "boolean" => Ok(FilterType::Boolean),
            other => Err(ModelError::UnknownFilterType(other.to_string())),
        }
    }
}

impl fmt::Display for FilterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterType::String => write!(f, "string"),
            FilterType::Numeric => write!(f, "numeric"),
            FilterType::Date => write!(f, "date"),
            FilterType::List => write!(f, "list"),
            FilterType::Boolean => write!(f, "boolean"),
        }
    }
}

/// Comparison requested by the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterOperator {
    Eq,
    Lt,
    Gt,
    In,
}

impl FilterOperator {
    /// Parses the operator token of a filter.
    ///
    /// `like` carries no information (string filters always match with `LIKE`)
    /// and maps to `None`, the same as an absent operator.
    pub fn parse(token: &str) -> Result<Option<Self>, ModelError> {
        match token.trim().to_ascii_lowercase().as_str() {
            "" | "like" => Ok(None),
            "eq" | "=" | "==" => Ok(Some(FilterOperator::Eq)),
            "lt" | "<" => Ok(Some(FilterOperator::Lt)),
            "gt" | ">" => Ok(Some(FilterOperator::Gt)),
            "in" => Ok(Some(FilterOperator::In)),
            _ => Err(ModelError::UnknownOperator(token.to_string())),
        }
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterOperator::Eq => write!(f, "eq"),
            FilterOperator::Lt => write!(f, "lt"),
            FilterOperator::Gt => write!(f, "gt"),
            FilterOperator::In => write!(f, "in"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_type_from_str() {
        assert_eq!("date".parse::<FilterType>().unwrap(), FilterType::Date);
        assert!(matches!(
            "datetime".parse::<FilterType>(),
            Err(ModelError::UnknownFilterType(t)) if t == "datetime"
        ));
    }

    #[test]
    fn test_operator_synonyms() {
        assert_eq!(FilterOperator::parse("==").unwrap(), Some(FilterOperator::Eq));
        assert_eq!(FilterOperator::parse("GT").unwrap(), Some(FilterOperator::Gt));
        assert_eq!(FilterOperator::parse("like").unwrap(), None);
        assert!(FilterOperator::parse("between").is_err());
    }
}
