use crate::core::data_type::DataType;
use serde::{Deserialize, Serialize};

/// A single field of a class, brick or classification-store key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(flatten)]
    pub data_type: DataType,
}

impl FieldDefinition {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            title: None,
            data_type,
        }
    }

    /// Looks up a child definition of a `localizedfields` container.
    pub fn localized_child(&self, name: &str) -> Option<&FieldDefinition> {
        match &self.data_type {
            DataType::Localizedfields { children } => children.iter().find(|f| f.name == name),
            _ => None,
        }
    }

    pub fn is_url_slug(&self) -> bool {
        matches!(self.data_type, DataType::UrlSlug)
    }
}
