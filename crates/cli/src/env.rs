use std::collections::HashMap;
use std::fs;
use std::path::Path;

use grid_filter::CompilerConfig;
use model::core::data_type::SqlDialect;

use crate::error::CliError;

pub const DIALECT_VAR: &str = "GRIDSQL_DIALECT";
pub const TIMEZONE_VAR: &str = "GRIDSQL_TIMEZONE";
pub const LANGUAGE_VAR: &str = "GRIDSQL_LANGUAGE";
pub const COLLATION_VAR: &str = "GRIDSQL_COLLATION";

/// Environment variable manager that loads from system and .env files
#[derive(Debug, Clone)]
pub struct EnvManager {
    vars: HashMap<String, String>,
}

impl EnvManager {
    pub fn new() -> Self {
        Self {
            vars: std::env::vars().collect(),
        }
    }

    /// Load variables from a .env file. File entries override the process
    /// environment.
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), CliError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("Failed to read env file {}: {}", path.display(), e))
        })?;

        self.parse_env_content(&content)?;
        Ok(())
    }

    /// Non-empty value of a variable.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Applies the `GRIDSQL_*` overrides to `config`.
    pub fn apply(&self, mut config: CompilerConfig) -> Result<CompilerConfig, CliError> {
        if let Some(dialect) = self.get(DIALECT_VAR) {
            config.dialect = dialect
                .parse::<SqlDialect>()
                .map_err(|e| CliError::Config(format!("{DIALECT_VAR}: {e}")))?;
        }
        if let Some(timezone) = self.get(TIMEZONE_VAR) {
            config.timezone = timezone.to_string();
        }
        if let Some(language) = self.get(LANGUAGE_VAR) {
            config.default_language = Some(language.to_string());
        }
        if let Some(collation) = self.get(COLLATION_VAR) {
            config.collation = Some(collation.to_string());
        }
        Ok(config)
    }

    fn parse_env_content(&mut self, content: &str) -> Result<(), CliError> {
        for (line_num, line) in content.lines().enumerate() {
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let line = line.strip_prefix("export ").unwrap_or(line);
            let Some((key, value)) = line.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid env file: malformed line {} (expected KEY=VALUE)",
                    line_num + 1
                )));
            };

            let key = key.trim();
            if key.is_empty() {
                return Err(CliError::Config(format!(
                    "Invalid env file: empty key at line {}",
                    line_num + 1
                )));
            }

            self.vars.insert(key.to_string(), Self::unquote_value(value));
        }

        Ok(())
    }

    fn unquote_value(value: &str) -> String {
        let value = value.trim();

        for quote in ['"', '\''] {
            if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
                return value[1..value.len() - 1].to_string();
            }
        }

        value.to_string()
    }
}

impl Default for EnvManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn empty() -> EnvManager {
        EnvManager {
            vars: HashMap::new(),
        }
    }

    #[test]
    fn test_parse_basic_env() {
        let mut env = empty();
        let content = r#"
# Comment
GRIDSQL_DIALECT=postgres
export GRIDSQL_LANGUAGE=de
        "#;

        env.parse_env_content(content).unwrap();
        assert_eq!(env.get(DIALECT_VAR), Some("postgres"));
        assert_eq!(env.get(LANGUAGE_VAR), Some("de"));
    }

    #[test]
    fn test_parse_quoted_values() {
        let mut env = empty();
        let content = r#"
QUOTED="value with spaces"
SINGLE='single quoted'
EMPTY=""
        "#;

        env.parse_env_content(content).unwrap();
        assert_eq!(env.get("QUOTED"), Some("value with spaces"));
        assert_eq!(env.get("SINGLE"), Some("single quoted"));
        assert_eq!(env.get("EMPTY"), None);
    }

    #[test]
    fn test_invalid_env_format() {
        let mut env = empty();
        assert!(env.parse_env_content("INVALID LINE WITHOUT EQUALS").is_err());
        assert!(env.parse_env_content("=value").is_err());
    }

    #[test]
    fn test_apply_overrides() {
        let mut env = empty();
        env.parse_env_content(
            "GRIDSQL_DIALECT=pg\nGRIDSQL_TIMEZONE=Europe/Vienna\nGRIDSQL_COLLATION=C",
        )
        .unwrap();

        let config = env.apply(CompilerConfig::default()).unwrap();
        assert_eq!(config.dialect, SqlDialect::Postgres);
        assert_eq!(config.timezone, "Europe/Vienna");
        assert_eq!(config.collation.as_deref(), Some("C"));
        assert_eq!(config.default_language, None);
    }

    #[test]
    fn test_apply_rejects_unknown_dialect() {
        let mut env = empty();
        env.parse_env_content("GRIDSQL_DIALECT=oracle").unwrap();
        assert!(matches!(
            env.apply(CompilerConfig::default()),
            Err(CliError::Config(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "GRIDSQL_LANGUAGE='fr'").unwrap();

        let mut env = empty();
        env.load_from_file(file.path()).unwrap();
        assert_eq!(env.get(LANGUAGE_VAR), Some("fr"));
        assert!(env.load_from_file("/nonexistent/.env").is_err());
    }
}
