//! Parser for the compound property keys a grid sends for nested fields.
//!
//! Grammar:
//!
//! ```text
//! key            := classification | brick | plain
//! classification := "~" type "~" field "~" group "-" keyid
//! brick          := container "~" field
//! container      := name | "?" json-descriptor
//! plain          := any string without "~"
//! ```
//!
//! Filters and sort keys go through the same parser so both paths agree on
//! how a key decomposes.

use crate::error::CompileError;
use serde::{Deserialize, Serialize};
use std::fmt;

const CLASSIFICATION_STORE: &str = "classificationstore";
const LOCALIZED_CONTAINER: &str = "localizedfields";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CompoundKey {
    /// A field, localized field or system column of the listing itself.
    Plain { name: String },

    /// `~classificationstore~<store>~<group>-<key>`
    #[serde(rename_all = "camelCase")]
    Classification {
        store: String,
        group_id: u32,
        key_id: u32,
    },

    /// `<brick>~<field>`, or the `?{...}~<field>` descriptor form.
    Brick {
        brick: String,
        field: String,
        /// Name of the class field holding the brick, when the descriptor
        /// carries it.
        container: Option<String>,
        /// The descriptor pointed into the brick's localized fields.
        localized: bool,
    },

    /// A `~<type>~...` key of a type the compiler does not handle.
    #[serde(rename_all = "camelCase")]
    Ignored { key_type: String },
}

/// The JSON blob of the `?{...}~field` form.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BrickDescriptor {
    container_key: String,
    #[serde(default)]
    fieldname: Option<String>,
    #[serde(default)]
    brickfield: Option<String>,
    #[serde(default)]
    inner_container: Option<String>,
}

impl CompoundKey {
    pub fn parse(key: &str) -> Result<Self, CompileError> {
        if let Some(rest) = key.strip_prefix('~') {
            return parse_typed(key, rest);
        }

        if let Some(descriptor) = key.strip_prefix('?')
            && let Some((json, field)) = descriptor.rsplit_once('~')
        {
            return parse_descriptor(key, json, field);
        }

        if let Some((brick, rest)) = key.split_once('~') {
            let field = rest.split('~').next().unwrap_or_default();
            if brick.is_empty() || field.is_empty() {
                return Err(CompileError::configuration(format!(
                    "Malformed brick key: {key}"
                )));
            }
            return Ok(CompoundKey::Brick {
                brick: brick.to_string(),
                field: field.to_string(),
                container: None,
                localized: false,
            });
        }

        Ok(CompoundKey::Plain {
            name: key.to_string(),
        })
    }
}

fn parse_typed(key: &str, rest: &str) -> Result<CompoundKey, CompileError> {
    let mut segments = rest.split('~');
    let key_type = segments.next().unwrap_or_default();
    if key_type != CLASSIFICATION_STORE {
        return Ok(CompoundKey::Ignored {
            key_type: key_type.to_string(),
        });
    }

    let store = segments
        .next()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| CompileError::configuration(format!("Missing store name in key: {key}")))?;
    let pair = segments.next().ok_or_else(|| {
        CompileError::configuration(format!("Missing group-key pair in key: {key}"))
    })?;

    let (group_id, key_id) = pair
        .split_once('-')
        .and_then(|(g, k)| Some((g.trim().parse::<u32>().ok()?, k.trim().parse::<u32>().ok()?)))
        .ok_or_else(|| {
            CompileError::configuration(format!(
                "Malformed group-key pair '{pair}' in key: {key}"
            ))
        })?;

    Ok(CompoundKey::Classification {
        store: store.to_string(),
        group_id,
        key_id,
    })
}

fn parse_descriptor(key: &str, json: &str, field: &str) -> Result<CompoundKey, CompileError> {
    let descriptor: BrickDescriptor = serde_json::from_str(json).map_err(|e| {
        CompileError::configuration(format!("Malformed brick descriptor in key {key}: {e}"))
    })?;

    let field = descriptor
        .brickfield
        .filter(|f| !f.is_empty())
        .unwrap_or_else(|| field.to_string());
    if descriptor.container_key.is_empty() || field.is_empty() {
        return Err(CompileError::configuration(format!(
            "Malformed brick key: {key}"
        )));
    }

    Ok(CompoundKey::Brick {
        brick: descriptor.container_key,
        field,
        container: descriptor.fieldname,
        localized: descriptor.inner_container.as_deref() == Some(LOCALIZED_CONTAINER),
    })
}

impl fmt::Display for CompoundKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompoundKey::Plain { name } => write!(f, "field {name}"),
            CompoundKey::Classification {
                store,
                group_id,
                key_id,
            } => write!(
                f,
                "classification store {store}, group {group_id}, key {key_id}"
            ),
            CompoundKey::Brick {
                brick,
                field,
                localized,
                ..
            } => {
                write!(f, "brick {brick}, field {field}")?;
                if *localized {
                    write!(f, " (localized)")?;
                }
                Ok(())
            }
            CompoundKey::Ignored { key_type } => write!(f, "ignored key type {key_type}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_key() {
        assert_eq!(
            CompoundKey::parse("fullpath").unwrap(),
            CompoundKey::Plain {
                name: "fullpath".into()
            }
        );
    }

    #[test]
    fn test_classification_key() {
        assert_eq!(
            CompoundKey::parse("~classificationstore~attributes~3-17").unwrap(),
            CompoundKey::Classification {
                store: "attributes".into(),
                group_id: 3,
                key_id: 17,
            }
        );
    }

    #[test]
    fn test_unknown_typed_key_is_ignored() {
        assert_eq!(
            CompoundKey::parse("~keyvalue~foo~1").unwrap(),
            CompoundKey::Ignored {
                key_type: "keyvalue".into()
            }
        );
    }

    #[test]
    fn test_malformed_classification_keys() {
        for key in [
            "~classificationstore~attributes~3",
            "~classificationstore~attributes~a-b",
            "~classificationstore~attributes",
            "~classificationstore~~1-2",
            "~classificationstore~attributes~-4",
        ] {
            assert!(
                matches!(CompoundKey::parse(key), Err(CompileError::Configuration(_))),
                "{key} should be rejected"
            );
        }
    }

    #[test]
    fn test_brick_key() {
        assert_eq!(
            CompoundKey::parse("Engine~power").unwrap(),
            CompoundKey::Brick {
                brick: "Engine".into(),
                field: "power".into(),
                container: None,
                localized: false,
            }
        );
        assert!(CompoundKey::parse("Engine~").is_err());
    }

    #[test]
    fn test_brick_descriptor_key() {
        let key = r#"?{"containerKey":"Engine","fieldname":"bricks","brickfield":"label","innerContainer":"localizedfields"}~label"#;
        assert_eq!(
            CompoundKey::parse(key).unwrap(),
            CompoundKey::Brick {
                brick: "Engine".into(),
                field: "label".into(),
                container: Some("bricks".into()),
                localized: true,
            }
        );

        assert!(CompoundKey::parse("?{not json}~label").is_err());
    }

    #[test]
    fn test_question_mark_without_field_is_plain() {
        assert_eq!(
            CompoundKey::parse("?stale").unwrap(),
            CompoundKey::Plain {
                name: "?stale".into()
            }
        );
        assert_eq!(
            CompoundKey::parse(r#"?{"containerKey":"Engine"}"#).unwrap(),
            CompoundKey::Plain {
                name: r#"?{"containerKey":"Engine"}"#.into()
            }
        );
    }
}
