//! Decides what a grid property refers to.

use crate::{error::CompileError, key::CompoundKey};
use model::{
    core::data_type::DataType,
    listing::{ListingTarget, SystemField},
    schema::{
        Schema, brick::BrickDefinition, classification::ClassificationKey,
        field::FieldDefinition,
    },
};
use tracing::debug;

/// Language recorded for classification-store values of non-localized stores.
pub const DEFAULT_STORE_LANGUAGE: &str = "default";

/// Owner of a URL slug row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SlugOwner {
    Object,
    Brick(String),
}

/// What a property resolved to.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind<'s> {
    System(SystemField),
    Scalar(&'s FieldDefinition),
    Localized(&'s FieldDefinition),
    Brick {
        brick: &'s BrickDefinition,
        field: &'s FieldDefinition,
        /// Set for fields of the brick's localized container.
        language: Option<&'s str>,
    },
    ClassificationStoreKey {
        fieldname: String,
        group_id: u32,
        key_id: u32,
        language: String,
        key: &'s ClassificationKey,
    },
    UrlSlug {
        fieldname: String,
        owner: SlugOwner,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<'s> {
    Field(FieldKind<'s>),
    /// A compound key of a type that is skipped on purpose.
    Ignored,
    /// Nothing in the schema or the listing matches.
    Unresolved,
}

/// Resolves properties against one schema and listing for one compilation.
#[derive(Clone, Copy)]
pub struct FieldResolver<'s> {
    schema: &'s dyn Schema,
    target: &'s ListingTarget,
    language: Option<&'s str>,
}

impl<'s> FieldResolver<'s> {
    pub fn new(
        schema: &'s dyn Schema,
        target: &'s ListingTarget,
        language: Option<&'s str>,
    ) -> Self {
        Self {
            schema,
            target,
            language,
        }
    }

    pub fn target(&self) -> &'s ListingTarget {
        self.target
    }

    pub fn language(&self) -> Option<&'s str> {
        self.language
    }

    pub fn resolve_property(&self, property: &str) -> Result<Resolution<'s>, CompileError> {
        let key = CompoundKey::parse(property)?;
        self.resolve(&key)
    }

    /// Localized fields, of the class or of a brick, fail to resolve when no
    /// language is known.
    pub fn resolve(&self, key: &CompoundKey) -> Result<Resolution<'s>, CompileError> {
        match key {
            CompoundKey::Ignored { key_type } => {
                debug!("Ignoring property of key type '{}'", key_type);
                Ok(Resolution::Ignored)
            }
            CompoundKey::Classification {
                store,
                group_id,
                key_id,
            } => Ok(self.resolve_classification(store, *group_id, *key_id)),
            CompoundKey::Brick {
                brick,
                field,
                localized,
                ..
            } => self.resolve_brick(brick, field, *localized),
            CompoundKey::Plain { name } => self.resolve_plain(name),
        }
    }

    fn resolve_classification(&self, store: &str, group_id: u32, key_id: u32) -> Resolution<'s> {
        let Some(definition) = self.schema.field_definition(store) else {
            return Resolution::Unresolved;
        };
        let DataType::Classificationstore { localized, .. } = &definition.data_type else {
            return Resolution::Unresolved;
        };
        let Some(key) = self.schema.classification_key(store, key_id) else {
            return Resolution::Unresolved;
        };
        if !key.belongs_to(group_id) {
            debug!(
                "Key {} of store '{}' is not assigned to group {}",
                key_id, store, group_id
            );
            return Resolution::Unresolved;
        }

        let language = match (*localized, self.language) {
            (true, Some(lang)) => lang.to_string(),
            _ => DEFAULT_STORE_LANGUAGE.to_string(),
        };

        Resolution::Field(FieldKind::ClassificationStoreKey {
            fieldname: store.to_string(),
            group_id,
            key_id,
            language,
            key,
        })
    }

    fn required_language(&self, field: &str) -> Result<&'s str, CompileError> {
        self.language.ok_or_else(|| {
            CompileError::configuration(format!(
                "Localized field '{field}' needs a language, none was requested or configured"
            ))
        })
    }

    fn resolve_brick(
        &self,
        brick_key: &str,
        field_name: &str,
        localized_hint: bool,
    ) -> Result<Resolution<'s>, CompileError> {
        let Some(brick) = self.schema.brick(brick_key) else {
            return Ok(Resolution::Unresolved);
        };

        let direct = if localized_hint {
            None
        } else {
            brick.field(field_name)
        };

        if let Some(field) = direct {
            if field.is_url_slug() {
                return Ok(Resolution::Field(FieldKind::UrlSlug {
                    fieldname: field.name.clone(),
                    owner: SlugOwner::Brick(brick.key.clone()),
                }));
            }
            return Ok(Resolution::Field(FieldKind::Brick {
                brick,
                field,
                language: None,
            }));
        }

        match brick.localized_field(field_name) {
            Some(field) => Ok(Resolution::Field(FieldKind::Brick {
                brick,
                field,
                language: Some(self.required_language(&format!("{brick_key}~{field_name}"))?),
            })),
            None => Ok(Resolution::Unresolved),
        }
    }

    fn resolve_plain(&self, name: &str) -> Result<Resolution<'s>, CompileError> {
        if let Some(field) = self.schema.field_definition(name) {
            if field.is_url_slug() {
                return Ok(Resolution::Field(FieldKind::UrlSlug {
                    fieldname: field.name.clone(),
                    owner: SlugOwner::Object,
                }));
            }
            return Ok(Resolution::Field(FieldKind::Scalar(field)));
        }

        if let Some(field) = self.schema.localized_field(name) {
            self.required_language(name)?;
            return Ok(Resolution::Field(FieldKind::Localized(field)));
        }

        Ok(match self.target.system_field(name) {
            Some(system) => Resolution::Field(FieldKind::System(system)),
            None => Resolution::Unresolved,
        })
    }
}
