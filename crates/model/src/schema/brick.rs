use crate::{core::data_type::DataType, schema::field::FieldDefinition};
use serde::{Deserialize, Serialize};

/// An object brick: an optional typed sub-structure stored in its own table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BrickDefinition {
    /// The brick type key, e.g. `Engine`.
    pub key: String,
    /// Name of the class field (of type `objectbricks`) holding the brick.
    pub container_field: String,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

impl BrickDefinition {
    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn localized_field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields
            .iter()
            .find(|f| matches!(f.data_type, DataType::Localizedfields { .. }))
            .and_then(|container| container.localized_child(name))
    }
}
