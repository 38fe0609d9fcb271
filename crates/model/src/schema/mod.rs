//! Read-only class schema consumed by the filter compiler.

use crate::{
    core::data_type::DataType,
    error::ModelError,
    schema::{brick::BrickDefinition, classification::ClassificationKey, field::FieldDefinition},
};
use serde::{Deserialize, Serialize};

pub mod brick;
pub mod classification;
pub mod field;

/// Lookup surface over a class definition.
///
/// Implementations must be safe to share between concurrent compilations.
pub trait Schema: Send + Sync {
    /// A field defined directly on the class.
    fn field_definition(&self, name: &str) -> Option<&FieldDefinition>;

    /// A field defined inside the class's `localizedfields` container.
    fn localized_field(&self, name: &str) -> Option<&FieldDefinition>;

    /// An object brick by its type key.
    fn brick(&self, key: &str) -> Option<&BrickDefinition>;

    /// A key of the named classification store.
    fn classification_key(&self, store: &str, key_id: u32) -> Option<&ClassificationKey> {
        match &self.field_definition(store)?.data_type {
            DataType::Classificationstore { keys, .. } => keys.iter().find(|k| k.id == key_id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClassSchema {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
    #[serde(default)]
    pub bricks: Vec<BrickDefinition>,
}

impl ClassSchema {
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_field(mut self, field: FieldDefinition) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_brick(mut self, brick: BrickDefinition) -> Self {
        self.bricks.push(brick);
        self
    }
}

impl Schema for ClassSchema {
    fn field_definition(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }

    fn localized_field(&self, name: &str) -> Option<&FieldDefinition> {
        self.field_definition("localizedfields")
            .and_then(|container| container.localized_child(name))
    }

    fn brick(&self, key: &str) -> Option<&BrickDefinition> {
        self.bricks.iter().find(|b| b.key == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &str = r#"{
        "id": "CAR",
        "name": "Car",
        "fields": [
            { "name": "name", "type": "input" },
            { "name": "localizedfields", "type": "localizedfields",
              "children": [ { "name": "description", "type": "textarea" } ] },
            { "name": "attributes", "type": "classificationstore", "localized": true,
              "keys": [ { "id": 7, "groupIds": [3], "definition": { "name": "weight", "type": "numeric" } } ] }
        ],
        "bricks": [
            { "key": "Engine", "containerField": "bricks",
              "fields": [ { "name": "power", "type": "numeric" } ] }
        ]
    }"#;

    #[test]
    fn test_lookup_from_json() {
        let schema = ClassSchema::from_json(SCHEMA).unwrap();

        assert_eq!(schema.id, "CAR");
        assert!(schema.field_definition("name").is_some());
        assert!(schema.field_definition("description").is_none());
        assert_eq!(
            schema.localized_field("description").unwrap().data_type,
            DataType::Textarea
        );

        let key = schema.classification_key("attributes", 7).unwrap();
        assert!(key.belongs_to(3));
        assert!(!key.belongs_to(4));
        assert!(schema.classification_key("attributes", 8).is_none());
        assert!(schema.classification_key("name", 7).is_none());

        let brick = schema.brick("Engine").unwrap();
        assert_eq!(brick.container_field, "bricks");
        assert!(brick.field("power").is_some());
    }

    #[test]
    fn test_invalid_json() {
        assert!(ClassSchema::from_json("{").is_err());
    }
}
