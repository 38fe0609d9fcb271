use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Anything other than `desc` (any case) sorts ascending.
    pub fn parse_lenient(token: &str) -> Self {
        if token.trim().eq_ignore_ascii_case("desc") {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "ASC"),
            SortDirection::Desc => write!(f, "DESC"),
        }
    }
}

/// Requested grid ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortRequest {
    pub property: String,
    pub direction: SortDirection,
}

#[derive(Debug, Deserialize)]
struct RawSort {
    property: String,
    #[serde(default)]
    direction: Option<String>,
}

impl SortRequest {
    pub fn new(property: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            property: property.into(),
            direction,
        }
    }

    /// Reads the grid's `sort` parameter, `[{"property": .., "direction": ..}]`.
    ///
    /// Only the first entry is used; an empty array yields `None`.
    pub fn parse_json(json: &str) -> Result<Option<Self>, ModelError> {
        if json.trim().is_empty() {
            return Ok(None);
        }
        let raw: Vec<RawSort> = serde_json::from_str(json)?;
        Ok(raw.into_iter().next().map(|r| SortRequest {
            property: r.property,
            direction: r
                .direction
                .as_deref()
                .map(SortDirection::parse_lenient)
                .unwrap_or_default(),
        }))
    }

    /// Builds a request from the legacy `sort` / `dir` parameter pair.
    pub fn from_pair(property: &str, dir: Option<&str>) -> Option<Self> {
        let property = property.trim();
        if property.is_empty() {
            return None;
        }
        Some(SortRequest {
            property: property.to_string(),
            direction: dir.map(SortDirection::parse_lenient).unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_takes_first_entry() {
        let sort = SortRequest::parse_json(
            r#"[{"property":"fullpath","direction":"desc"},{"property":"id"}]"#,
        )
        .unwrap()
        .unwrap();

        assert_eq!(sort.property, "fullpath");
        assert_eq!(sort.direction, SortDirection::Desc);
        assert_eq!(SortRequest::parse_json("[]").unwrap(), None);
    }

    #[test]
    fn test_direction_is_lenient() {
        assert_eq!(SortDirection::parse_lenient("DESC"), SortDirection::Desc);
        assert_eq!(SortDirection::parse_lenient("sideways"), SortDirection::Asc);
        assert_eq!(SortRequest::from_pair(" ", Some("DESC")), None);
        assert_eq!(
            SortRequest::from_pair("key", None).unwrap().direction,
            SortDirection::Asc
        );
    }
}
