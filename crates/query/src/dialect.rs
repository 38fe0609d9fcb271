//! Defines the `Dialect` trait for database-specific SQL syntax.

use model::core::{data_type::SqlDialect, value::Value};

pub trait Dialect: Send + Sync {
    /// Wraps an identifier (like a table or column name) in the correct
    /// quotation marks for the dialect, escaping embedded quote characters.
    ///
    /// - PostgreSQL uses double quotes: `"my_column"`
    /// - MySQL uses backticks: `` `my_column` ``
    fn quote_identifier(&self, ident: &str) -> String;

    /// Quotes a string literal. This is the only path user-supplied text
    /// takes into generated SQL.
    fn quote_string(&self, s: &str) -> String;

    /// Renders a literal value.
    fn quote_value(&self, value: &Value) -> String {
        match value {
            Value::Int(v) => v.to_string(),
            Value::Float(v) if v.is_finite() => v.to_string(),
            Value::Float(_) => "NULL".to_string(),
            Value::String(s) => self.quote_string(s),
            Value::Boolean(b) => if *b { "1" } else { "0" }.to_string(),
            Value::Null => "NULL".to_string(),
        }
    }

    /// The two-argument "value or fallback" function.
    fn null_fallback_function(&self) -> &'static str;

    /// Target type used when casting an expression to collatable text.
    fn text_type(&self) -> &'static str;

    /// Renders a collation name after `COLLATE`.
    fn collation(&self, name: &str) -> String;

    /// Collation for sorting cast text when none is configured. `None` leaves
    /// the expression uncollated.
    fn default_collation(&self) -> Option<&'static str>;

    /// Whether `HAVING` may name select-list aliases and the select list may
    /// hold columns outside `GROUP BY`.
    fn lenient_grouping(&self) -> bool;

    /// Returns the name of the dialect (e.g., "PostgreSQL", "MySQL").
    fn name(&self) -> String;
}

/// Picks the dialect implementation for a configured dialect tag.
pub fn for_kind(kind: SqlDialect) -> &'static dyn Dialect {
    match kind {
        SqlDialect::MySql => &MySql,
        SqlDialect::Postgres => &Postgres,
    }
}

#[derive(Debug, Clone)]
pub struct Postgres;

impl Dialect for Postgres {
    fn quote_identifier(&self, ident: &str) -> String {
        format!(r#""{}""#, ident.replace('"', r#""""#))
    }

    fn quote_string(&self, s: &str) -> String {
        // standard_conforming_strings: backslashes are literal
        format!("'{}'", s.replace('\'', "''"))
    }

    fn quote_value(&self, value: &Value) -> String {
        match value {
            Value::Boolean(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
            Value::Int(v) => v.to_string(),
            Value::Float(v) if v.is_finite() => v.to_string(),
            Value::Float(_) | Value::Null => "NULL".to_string(),
            Value::String(s) => self.quote_string(s),
        }
    }

    fn null_fallback_function(&self) -> &'static str {
        "COALESCE"
    }

    fn text_type(&self) -> &'static str {
        "TEXT"
    }

    fn collation(&self, name: &str) -> String {
        self.quote_identifier(name)
    }

    fn default_collation(&self) -> Option<&'static str> {
        None
    }

    fn lenient_grouping(&self) -> bool {
        false
    }

    fn name(&self) -> String {
        "PostgreSQL".into()
    }
}

#[derive(Debug, Clone)]
pub struct MySql;

impl Dialect for MySql {
    fn quote_identifier(&self, ident: &str) -> String {
        format!("`{}`", ident.replace('`', "``"))
    }

    fn quote_string(&self, s: &str) -> String {
        let mut out = String::with_capacity(s.len() + 2);
        out.push('\'');
        for ch in s.chars() {
            match ch {
                '\0' => out.push_str(r"\0"),
                '\n' => out.push_str(r"\n"),
                '\r' => out.push_str(r"\r"),
                '\\' => out.push_str(r"\\"),
                '\'' => out.push_str(r"\'"),
                '"' => out.push_str(r#"\""#),
                '\x1a' => out.push_str(r"\Z"),
                _ => out.push(ch),
            }
        }
        out.push('\'');
        out
    }

    fn null_fallback_function(&self) -> &'static str {
        "IFNULL"
    }

    fn text_type(&self) -> &'static str {
        "CHAR CHARACTER SET utf8mb4"
    }

    fn collation(&self, name: &str) -> String {
        // collation names are bare words in MySQL
        name.chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
            .collect()
    }

    fn default_collation(&self) -> Option<&'static str> {
        Some("utf8mb4_general_ci")
    }

    fn lenient_grouping(&self) -> bool {
        true
    }

    fn name(&self) -> String {
        "MySQL".into()
    }
}
