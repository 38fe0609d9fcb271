//! Compiles a complete grid request into the parts of a listing query.

use crate::{
    condition::{ConditionBuilder, ConditionSet},
    config::CompilerConfig,
    error::CompileError,
    operator::ValueCoercer,
    resolver::FieldResolver,
    scope::scope_condition,
    sort::{SortKey, SortKeyResolver},
};
use model::{
    core::{data_type::SqlDialect, value::Value},
    filter::{FilterDescriptor, SortRequest},
    listing::{ListingScope, ListingTarget},
    schema::Schema,
};
use query::{
    ast::{
        expr::Expr,
        select::{JoinClause, Select},
    },
    builder::select::SelectBuilder,
    dialect::{Dialect, for_kind},
    qualified,
    renderer::to_sql,
    table_ref, value,
};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::{debug, info};

/// Everything a grid sends to list elements.
#[derive(Debug, Clone, PartialEq)]
pub struct GridRequest {
    pub target: ListingTarget,
    pub filters: Vec<FilterDescriptor>,
    pub sort: Option<SortRequest>,
    pub language: Option<String>,
    pub scope: ListingScope,
    pub start: Option<u64>,
    pub limit: Option<u64>,
}

/// Wire shape of a grid request. `filter` and `sort` may arrive either as
/// JSON-encoded strings (form parameters) or as inline arrays.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawGridRequest {
    target: ListingTarget,
    #[serde(default)]
    filter: JsonValue,
    #[serde(default)]
    sort: JsonValue,
    #[serde(default)]
    dir: Option<String>,
    #[serde(default)]
    language: Option<String>,
    #[serde(flatten)]
    scope: ListingScope,
    #[serde(default)]
    start: Option<u64>,
    #[serde(default)]
    limit: Option<u64>,
}

impl GridRequest {
    pub fn new(target: ListingTarget) -> Self {
        Self {
            target,
            filters: Vec::new(),
            sort: None,
            language: None,
            scope: ListingScope::default(),
            start: None,
            limit: None,
        }
    }

    pub fn with_filters(mut self, filters: Vec<FilterDescriptor>) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_sort(mut self, sort: SortRequest) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_scope(mut self, scope: ListingScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_page(mut self, start: u64, limit: u64) -> Self {
        self.start = Some(start);
        self.limit = Some(limit);
        self
    }

    pub fn from_json(json: &str) -> Result<Self, CompileError> {
        let raw: RawGridRequest = serde_json::from_str(json)?;

        let filters = match raw.filter {
            JsonValue::Null => Vec::new(),
            JsonValue::String(s) => FilterDescriptor::parse_list(&s)?,
            JsonValue::Array(items) => items
                .into_iter()
                .map(FilterDescriptor::from_json)
                .collect::<Result<Vec<_>, _>>()?,
            other => {
                return Err(CompileError::configuration(format!(
                    "'filter' must be an array or a JSON string, got {other}"
                )));
            }
        };

        let sort = match raw.sort {
            JsonValue::Null => None,
            JsonValue::String(s) if s.trim_start().starts_with('[') => {
                SortRequest::parse_json(&s)?
            }
            JsonValue::String(s) => SortRequest::from_pair(&s, raw.dir.as_deref()),
            JsonValue::Array(items) => {
                SortRequest::parse_json(&JsonValue::Array(items).to_string())?
            }
            other => {
                return Err(CompileError::configuration(format!(
                    "'sort' must be an array or a string, got {other}"
                )));
            }
        };

        Ok(Self {
            target: raw.target,
            filters,
            sort,
            language: raw.language.filter(|l| !l.trim().is_empty()),
            scope: raw.scope,
            start: raw.start,
            limit: raw.limit,
        })
    }
}

/// The compiled parts of a listing query.
#[derive(Debug, Clone)]
pub struct CompiledQuery {
    pub dialect: SqlDialect,
    pub base_table: String,
    pub conditions: ConditionSet,
    pub joins: Vec<JoinClause>,
    pub columns: Vec<Expr>,
    pub group_by: Vec<Expr>,
    pub sort: Option<SortKey>,
    pub start: Option<u64>,
    pub limit: Option<u64>,
}

/// Rendered form of a [`CompiledQuery`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledSql {
    pub dialect: SqlDialect,
    pub from: String,
    pub where_sql: String,
    pub joins: Vec<String>,
    pub having_sql: Option<String>,
    pub group_by: Vec<String>,
    pub order_by: Option<String>,
    pub sort_quote_as_column: Option<bool>,
    pub sql: String,
}

impl CompiledQuery {
    fn dialect(&self) -> &'static dyn Dialect {
        for_kind(self.dialect)
    }

    /// The `WHERE` predicate; `1 = 1` when nothing filters.
    pub fn where_sql(&self) -> String {
        self.conditions.where_sql(self.dialect())
    }

    pub fn having_sql(&self) -> Option<String> {
        self.conditions.having_sql(self.dialect())
    }

    pub fn join_sql(&self) -> Vec<String> {
        self.joins
            .iter()
            .map(|join| to_sql(join, self.dialect()))
            .collect()
    }

    pub fn order_by_sql(&self) -> Option<String> {
        self.sort
            .as_ref()
            .map(|sort| to_sql(&sort.order_by(), self.dialect()))
    }

    /// Assembles the full listing `SELECT`.
    pub fn to_select(&self) -> Select {
        let mut builder = SelectBuilder::new()
            .select(self.columns.clone())
            .from(table_ref!(self.base_table), None);

        for join in &self.joins {
            builder = builder.join_clause(join.clone());
        }
        if let Some(condition) = self.conditions.where_expr() {
            builder = builder.where_clause(condition);
        }
        for expr in &self.group_by {
            builder = builder.group_by(expr.clone());
        }
        if let Some(condition) = self.conditions.having_expr() {
            builder = builder.having(condition);
        }
        if let Some(sort) = &self.sort {
            let order = sort.order_by();
            builder = builder.order_by(order.expr, order.direction);
        }
        if let Some(limit) = self.limit {
            builder = builder.limit(value(Value::Int(to_i64(limit))));
        }
        if let Some(start) = self.start.filter(|s| *s > 0) {
            builder = builder.offset(value(Value::Int(to_i64(start))));
        }

        builder.build()
    }

    pub fn to_sql(&self) -> String {
        to_sql(&self.to_select(), self.dialect())
    }

    pub fn summary(&self) -> CompiledSql {
        let dialect = self.dialect();
        CompiledSql {
            dialect: self.dialect,
            from: self.base_table.clone(),
            where_sql: self.where_sql(),
            joins: self.join_sql(),
            having_sql: self.having_sql(),
            group_by: self
                .group_by
                .iter()
                .map(|expr| to_sql(expr, dialect))
                .collect(),
            order_by: self.order_by_sql(),
            sort_quote_as_column: self.sort.as_ref().map(|s| s.quote_as_column),
            sql: self.to_sql(),
        }
    }
}

fn to_i64(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

/// Entry point: holds the configuration and compiles requests against a
/// schema. Compilation keeps all state local, so one compiler can serve
/// concurrent requests.
#[derive(Debug, Clone)]
pub struct GridQueryCompiler {
    config: CompilerConfig,
    coercer: ValueCoercer,
}

impl GridQueryCompiler {
    pub fn new(config: CompilerConfig) -> Result<Self, CompileError> {
        let coercer = ValueCoercer::new(config.tz()?);
        Ok(Self { config, coercer })
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    pub fn dialect(&self) -> &'static dyn Dialect {
        for_kind(self.config.dialect)
    }

    pub fn compile(
        &self,
        schema: &dyn Schema,
        request: &GridRequest,
    ) -> Result<CompiledQuery, CompileError> {
        let dialect = self.dialect();
        let language = request
            .language
            .as_deref()
            .or(self.config.default_language.as_deref());
        let base = request.target.base_table(language);
        info!(
            "Compiling grid request on '{}' ({} filters, {} dialect)",
            base,
            request.filters.len(),
            dialect.name()
        );

        let resolver = FieldResolver::new(schema, &request.target, language);

        let mut conditions = ConditionSet::default();
        if let Some(scope) = scope_condition(&request.scope, &base) {
            conditions.where_items.push(scope);
        }
        ConditionBuilder::new(resolver, self.coercer, dialect, base.as_str())
            .build_into(&request.filters, &mut conditions)?;

        let sort = match &request.sort {
            Some(sort) => SortKeyResolver::new(
                resolver,
                dialect,
                base.as_str(),
                self.config
                    .collation
                    .as_deref()
                    .or(dialect.default_collation()),
            )
            .resolve(sort)?,
            None => None,
        };

        let mut group_by = Vec::new();
        if let Some(key) = &sort {
            conditions.joins.extend(key.joins.iter().cloned());
            if key.group_by_primary_key {
                group_by.push(qualified(&base, request.target.primary_key()));
            }
        }

        let mut columns = vec![Expr::Wildcard {
            qualifier: Some(base.clone()),
        }];
        columns.extend(conditions.joins.select_columns());

        let joins = conditions.joins.plan(&request.target, &base);
        debug!(
            "Compiled {} where, {} having condition(s) and {} join(s)",
            conditions.where_items.len(),
            conditions.having_items.len(),
            joins.len()
        );

        Ok(CompiledQuery {
            dialect: self.config.dialect,
            base_table: base,
            conditions,
            joins,
            columns,
            group_by,
            sort,
            start: request.start,
            limit: request.limit,
        })
    }
}
