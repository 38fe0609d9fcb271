use crate::error::CompileError;
use model::core::data_type::SqlDialect;
use serde::{Deserialize, Serialize};

pub const DEFAULT_TIMEZONE: &str = "UTC";

/// Settings that shape the generated SQL but are not part of a grid request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompilerConfig {
    pub dialect: SqlDialect,

    /// Zone in which date filter strings are interpreted before they are
    /// turned into unix timestamps.
    pub timezone: String,

    /// Language used when a request does not name one.
    pub default_language: Option<String>,

    /// Collation applied when sorting by full path. Unset means the dialect's
    /// default, if it has one.
    pub collation: Option<String>,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            dialect: SqlDialect::default(),
            timezone: DEFAULT_TIMEZONE.to_string(),
            default_language: None,
            collation: None,
        }
    }
}

impl CompilerConfig {
    pub fn from_json(json: &str) -> Result<Self, CompileError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_dialect(mut self, dialect: SqlDialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = timezone.into();
        self
    }

    pub fn with_default_language(mut self, language: impl Into<String>) -> Self {
        self.default_language = Some(language.into());
        self
    }

    pub fn with_collation(mut self, collation: impl Into<String>) -> Self {
        self.collation = Some(collation.into());
        self
    }

    pub fn tz(&self) -> Result<chrono_tz::Tz, CompileError> {
        self.timezone
            .trim()
            .parse::<chrono_tz::Tz>()
            .map_err(|_| CompileError::configuration(format!("Unknown time zone: {}", self.timezone)))
    }
}
