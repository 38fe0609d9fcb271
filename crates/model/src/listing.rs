//! Which listing a grid queries and how its tables are named.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The element listing a grid request runs against.
///
/// Object and asset grids share the same filter semantics; they differ only in
/// table names and in which system columns exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ListingTarget {
    Object {
        #[serde(rename = "classId")]
        class_id: String,
    },
    Asset,
}

/// Columns every element of a listing carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemField {
    Id,
    FullPath,
    Key,
    Path,
    Published,
    CreationDate,
    ModificationDate,
    Type,
    Mimetype,
}

impl SystemField {
    /// Whether the column holds a unix timestamp.
    pub fn is_date(&self) -> bool {
        matches!(self, SystemField::CreationDate | SystemField::ModificationDate)
    }
}

impl fmt::Display for SystemField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SystemField::Id => "id",
            SystemField::FullPath => "fullpath",
            SystemField::Key => "key",
            SystemField::Path => "path",
            SystemField::Published => "published",
            SystemField::CreationDate => "creationDate",
            SystemField::ModificationDate => "modificationDate",
            SystemField::Type => "type",
            SystemField::Mimetype => "mimetype",
        };
        f.write_str(name)
    }
}

impl ListingTarget {
    pub fn object(class_id: impl Into<String>) -> Self {
        ListingTarget::Object {
            class_id: class_id.into(),
        }
    }

    pub fn primary_key(&self) -> &'static str {
        "id"
    }

    /// The table (or view) the listing selects from.
    ///
    /// Object listings read the per-language view when a language is active so
    /// localized fields are plain columns.
    pub fn base_table(&self, language: Option<&str>) -> String {
        match (self, language) {
            (ListingTarget::Object { class_id }, Some(lang)) => {
                format!("object_localized_{class_id}_{lang}")
            }
            (ListingTarget::Object { class_id }, None) => format!("object_{class_id}"),
            (ListingTarget::Asset, _) => "assets".to_string(),
        }
    }

    pub fn key_column(&self) -> &'static str {
        match self {
            ListingTarget::Object { .. } => "key",
            ListingTarget::Asset => "filename",
        }
    }

    /// Resolves a grid column name to a system field of this listing.
    pub fn system_field(&self, name: &str) -> Option<SystemField> {
        let field = match name {
            "id" => SystemField::Id,
            "fullpath" | "fullPath" => SystemField::FullPath,
            "key" | "filename" => SystemField::Key,
            "path" => SystemField::Path,
            "creationDate" | "creationdate" => SystemField::CreationDate,
            "modificationDate" | "modificationdate" => SystemField::ModificationDate,
            "published" => SystemField::Published,
            "type" => SystemField::Type,
            "mimetype" => SystemField::Mimetype,
            _ => return None,
        };

        match (self, field) {
            (ListingTarget::Asset, SystemField::Published) => None,
            (ListingTarget::Object { .. }, SystemField::Mimetype) => None,
            _ => Some(field),
        }
    }

    /// Physical column of a system field; `FullPath` has no single column.
    pub fn system_column(&self, field: SystemField) -> Option<&'static str> {
        match field {
            SystemField::Id => Some("id"),
            SystemField::FullPath => None,
            SystemField::Key => Some(self.key_column()),
            SystemField::Path => Some("path"),
            SystemField::Published => Some("published"),
            SystemField::CreationDate => Some("creationDate"),
            SystemField::ModificationDate => Some("modificationDate"),
            SystemField::Type => Some("type"),
            SystemField::Mimetype => Some("mimetype"),
        }
    }

    pub fn brick_table(&self, brick: &str) -> String {
        format!("object_brick_query_{brick}_{}", self.owner_id())
    }

    pub fn brick_localized_table(&self, brick: &str) -> String {
        format!("object_brick_localized_query_{brick}_{}", self.owner_id())
    }

    pub fn classification_table(&self) -> String {
        format!("object_classificationstore_data_{}", self.owner_id())
    }

    pub fn slug_table(&self) -> &'static str {
        "object_url_slugs"
    }

    fn owner_id(&self) -> &str {
        match self {
            ListingTarget::Object { class_id } => class_id,
            ListingTarget::Asset => "assets",
        }
    }
}

/// Optional folder restriction of a grid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingScope {
    pub folder: Option<String>,
    #[serde(default)]
    pub only_direct_children: bool,
}

impl ListingScope {
    /// The folder path with exactly one trailing slash, as stored in `path`.
    pub fn folder_prefix(&self) -> Option<String> {
        let folder = self.folder.as_deref()?.trim();
        if folder.is_empty() {
            return None;
        }
        Some(format!("{}/", folder.trim_end_matches('/')))
    }
}
