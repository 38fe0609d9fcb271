use crate::schema::field::FieldDefinition;
use serde::{Deserialize, Serialize};

/// A configured key of a classification store.
///
/// The key's own definition decides how its value is compared, the same way a
/// class field does.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationKey {
    pub id: u32,
    #[serde(default)]
    pub group_ids: Vec<u32>,
    pub definition: FieldDefinition,
}

impl ClassificationKey {
    /// Keys without group restrictions can be used in every group.
    pub fn belongs_to(&self, group_id: u32) -> bool {
        self.group_ids.is_empty() || self.group_ids.contains(&group_id)
    }
}
