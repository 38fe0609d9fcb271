use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Field types a class definition can carry.
///
/// Container types (`Localizedfields`, `Objectbricks`, `Classificationstore`)
/// hold further definitions and never produce a column of their own.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DataType {
    Input,
    Textarea,
    Wysiwyg,
    Numeric,
    Checkbox,
    BooleanSelect,
    Date,
    Datetime,
    Select,
    Multiselect,
    QuantityValue,
    Rgba,
    ManyToOneRelation,
    UrlSlug,
    Localizedfields {
        #[serde(default)]
        children: Vec<crate::schema::field::FieldDefinition>,
    },
    Objectbricks {
        #[serde(default)]
        allowed: Vec<String>,
    },
    Classificationstore {
        #[serde(default)]
        localized: bool,
        #[serde(default)]
        keys: Vec<crate::schema::classification::ClassificationKey>,
    },
}

impl DataType {
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            DataType::Localizedfields { .. }
                | DataType::Objectbricks { .. }
                | DataType::Classificationstore { .. }
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            DataType::Input => "input",
            DataType::Textarea => "textarea",
            DataType::Wysiwyg => "wysiwyg",
            DataType::Numeric => "numeric",
            DataType::Checkbox => "checkbox",
            DataType::BooleanSelect => "booleanSelect",
            DataType::Date => "date",
            DataType::Datetime => "datetime",
            DataType::Select => "select",
            DataType::Multiselect => "multiselect",
            DataType::QuantityValue => "quantityValue",
            DataType::Rgba => "rgba",
            DataType::ManyToOneRelation => "manyToOneRelation",
            DataType::UrlSlug => "urlSlug",
            DataType::Localizedfields { .. } => "localizedfields",
            DataType::Objectbricks { .. } => "objectbricks",
            DataType::Classificationstore { .. } => "classificationstore",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SqlDialect {
    #[default]
    MySql,
    Postgres,
}

impl FromStr for SqlDialect {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mysql" | "mariadb" => Ok(SqlDialect::MySql),
            "postgres" | "postgresql" | "pg" => Ok(SqlDialect::Postgres),
            other => Err(ModelError::UnknownDialect(other.to_string())),
        }
    }
}

impl fmt::Display for SqlDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlDialect::MySql => write!(f, "mysql"),
            SqlDialect::Postgres => write!(f, "postgres"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_tagged_types() {
        let dt: DataType = serde_json::from_str(r#"{"type":"checkbox"}"#).unwrap();
        assert_eq!(dt, DataType::Checkbox);

        let dt: DataType =
            serde_json::from_str(r#"{"type":"objectbricks","allowed":["Engine"]}"#).unwrap();
        assert_eq!(
            dt,
            DataType::Objectbricks {
                allowed: vec!["Engine".to_string()]
            }
        );
        assert!(dt.is_container());
    }

    #[test]
    fn test_dialect_from_str() {
        assert_eq!("MySQL".parse::<SqlDialect>().unwrap(), SqlDialect::MySql);
        assert_eq!("pg".parse::<SqlDialect>().unwrap(), SqlDialect::Postgres);
        assert!("oracle".parse::<SqlDialect>().is_err());
    }
}
