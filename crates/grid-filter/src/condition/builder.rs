use crate::{
    condition::{
        compare,
        field::{ConditionContext, FilterCondition},
        null_as_false,
    },
    error::CompileError,
    join::{JoinPlanner, JoinRequirement},
    operator::{Comparand, SqlOperator, ValueCoercer, ValueTransform, map_operator},
    resolver::{FieldKind, FieldResolver, Resolution},
};
use model::{
    core::value::Value,
    filter::FilterDescriptor,
    listing::SystemField,
    schema::{brick::BrickDefinition, field::FieldDefinition},
};
use query::{
    ast::expr::{BinaryOperator, Expr, LogicalOp},
    dialect::Dialect,
    ident, qualified,
    renderer::to_sql,
    value,
};
use tracing::{debug, warn};

/// Identity predicate used when no filter produced a condition.
pub const MATCH_ALL: &str = "1 = 1";

/// Output of the condition builder.
#[derive(Debug, Default, Clone)]
pub struct ConditionSet {
    /// Conditions on base-table and side-table columns.
    pub where_items: Vec<Expr>,
    /// Conditions on the select aliases of joined classification-store
    /// values. Dialects without lenient grouping get these in `where_items`,
    /// against the joined `value` column.
    pub having_items: Vec<Expr>,
    pub joins: JoinPlanner,
}

impl ConditionSet {
    pub fn where_expr(&self) -> Option<Expr> {
        Expr::and(self.where_items.clone())
    }

    pub fn having_expr(&self) -> Option<Expr> {
        Expr::and(self.having_items.clone())
    }

    /// The `WHERE` predicate, never empty.
    pub fn where_sql(&self, dialect: &dyn Dialect) -> String {
        self.where_expr()
            .map(|expr| to_sql(&expr, dialect))
            .unwrap_or_else(|| MATCH_ALL.to_string())
    }

    pub fn having_sql(&self, dialect: &dyn Dialect) -> Option<String> {
        self.having_expr().map(|expr| to_sql(&expr, dialect))
    }
}

/// Compiles grid filters into conditions against one listing.
pub struct ConditionBuilder<'s> {
    resolver: FieldResolver<'s>,
    coercer: ValueCoercer,
    dialect: &'s dyn Dialect,
    base: String,
}

impl<'s> ConditionBuilder<'s> {
    pub fn new(
        resolver: FieldResolver<'s>,
        coercer: ValueCoercer,
        dialect: &'s dyn Dialect,
        base: impl Into<String>,
    ) -> Self {
        Self {
            resolver,
            coercer,
            dialect,
            base: base.into(),
        }
    }

    pub fn build(&self, filters: &[FilterDescriptor]) -> Result<ConditionSet, CompileError> {
        let mut set = ConditionSet::default();
        self.build_into(filters, &mut set)?;
        Ok(set)
    }

    /// Adds the conditions of `filters` to an existing set, sharing its joins.
    pub fn build_into(
        &self,
        filters: &[FilterDescriptor],
        set: &mut ConditionSet,
    ) -> Result<(), CompileError> {
        for filter in filters {
            self.apply(filter, set)?;
        }
        Ok(())
    }

    fn apply(&self, filter: &FilterDescriptor, set: &mut ConditionSet) -> Result<(), CompileError> {
        if filter.value.is_null() {
            debug!("Skipping filter on '{}' without value", filter.property);
            return Ok(());
        }

        let (op, transform) = map_operator(filter.filter_type, filter.operator);
        let kind = match self.resolver.resolve_property(&filter.property)? {
            Resolution::Field(kind) => kind,
            Resolution::Ignored => return Ok(()),
            Resolution::Unresolved => {
                warn!(
                    "Unknown filter property '{}', matching empty values instead",
                    filter.property
                );
                set.where_items.push(empty_value_condition(&filter.property));
                return Ok(());
            }
        };

        match kind {
            FieldKind::System(field) => {
                let Some(comparand) = self.comparand(filter, transform)? else {
                    return Ok(());
                };
                if let Some(condition) = self.system_condition(field, op, transform, &comparand) {
                    set.where_items.push(condition);
                }
            }
            FieldKind::Scalar(definition) | FieldKind::Localized(definition) => {
                let Some(comparand) = self.comparand(filter, transform)? else {
                    return Ok(());
                };
                let ctx = ConditionContext::new(Some(self.base.as_str()), self.dialect);
                match definition.filter_condition(&comparand, op, &ctx) {
                    Some(condition) => set.where_items.push(condition),
                    None => debug!(
                        "Field '{}' of type {} produced no condition",
                        definition.name, definition.data_type
                    ),
                }
            }
            FieldKind::Brick {
                brick,
                field,
                language,
            } => self.brick_condition(filter, op, transform, brick, field, language, set)?,
            FieldKind::ClassificationStoreKey {
                fieldname,
                group_id,
                key_id,
                language,
                key,
            } => {
                let Some(comparand) = self.comparand(filter, transform)? else {
                    return Ok(());
                };
                let join = JoinRequirement::ClassificationStore {
                    fieldname,
                    group_id,
                    key_id,
                    language,
                };
                let alias = join.alias();
                let ctx = ConditionContext::new(None, self.dialect);
                let lenient = self.dialect.lenient_grouping();
                let column = if lenient {
                    ident(&alias)
                } else {
                    qualified(&alias, "value")
                };
                if let Some(condition) =
                    key.definition
                        .filter_condition_ext(&comparand, op, &column, &ctx)
                {
                    if lenient {
                        set.having_items.push(condition);
                    } else {
                        set.where_items.push(condition);
                    }
                    set.joins.add(join);
                }
            }
            FieldKind::UrlSlug { fieldname, owner } => {
                let Some(comparand) = self.comparand(filter, transform)? else {
                    return Ok(());
                };
                let join = JoinRequirement::UrlSlug { fieldname, owner };
                if let Some(condition) = compare(qualified(&join.alias(), "slug"), op, &comparand)
                {
                    set.where_items.push(condition);
                    set.joins.add(join);
                }
            }
        }

        Ok(())
    }

    fn comparand(
        &self,
        filter: &FilterDescriptor,
        transform: ValueTransform,
    ) -> Result<Option<Comparand>, CompileError> {
        let comparand = self.coercer.coerce(transform, &filter.value)?;
        if comparand.is_none() && transform == ValueTransform::NumericTokens {
            warn!(
                "Dropping 'in' filter on '{}': no numeric values in {:?}",
                filter.property, filter.value
            );
        }
        Ok(comparand)
    }

    fn system_condition(
        &self,
        field: SystemField,
        op: SqlOperator,
        transform: ValueTransform,
        comparand: &Comparand,
    ) -> Option<Expr> {
        let target = self.resolver.target();
        let col = match target.system_column(field) {
            Some(column) => qualified(&self.base, column),
            None => full_path(&self.base, target.key_column()),
        };

        if transform == ValueTransform::Boolean {
            return compare(null_as_false(self.dialect, col), op, comparand);
        }

        let numeric = matches!(
            field,
            SystemField::Id
                | SystemField::Published
                | SystemField::CreationDate
                | SystemField::ModificationDate
        );
        if numeric && op != SqlOperator::Like {
            compare(col, op, &comparand.map(Value::to_numeric))
        } else {
            compare(col, op, comparand)
        }
    }

    /// Each value of a brick filter becomes its own condition; the
    /// alternatives are OR-ed and tied to the brick's container field.
    #[allow(clippy::too_many_arguments)]
    fn brick_condition(
        &self,
        filter: &FilterDescriptor,
        op: SqlOperator,
        transform: ValueTransform,
        brick: &BrickDefinition,
        field: &FieldDefinition,
        language: Option<&str>,
        set: &mut ConditionSet,
    ) -> Result<(), CompileError> {
        let brick_join = JoinRequirement::Brick {
            brick: brick.key.clone(),
        };
        let localized_join = language.map(|language| JoinRequirement::BrickLocalized {
            brick: brick.key.clone(),
            container: brick.container_field.clone(),
            language: language.to_string(),
        });
        let qualifier = localized_join
            .as_ref()
            .map(JoinRequirement::alias)
            .unwrap_or_else(|| brick_join.alias());

        let comparands = if transform == ValueTransform::NumericTokens {
            self.comparand(filter, transform)?.into_iter().collect()
        } else {
            let mut out = Vec::new();
            for value in filter.value.to_list() {
                if let Some(comparand) = self.coercer.coerce_one(transform, &value)? {
                    out.push(comparand);
                }
            }
            out
        };

        let ctx = ConditionContext::new(Some(qualifier.as_str()), self.dialect);
        let alternatives: Vec<Expr> = comparands
            .iter()
            .filter_map(|comparand| field.filter_condition(comparand, op, &ctx))
            .collect();
        let Some(any) = Expr::or(alternatives) else {
            debug!(
                "Brick field '{}~{}' produced no condition",
                brick.key, field.name
            );
            return Ok(());
        };

        let guard = Expr::binary(
            qualified(&brick_join.alias(), "fieldname"),
            BinaryOperator::Eq,
            value(Value::from(brick.container_field.as_str())),
        );
        set.where_items.extend(Expr::and(vec![any, guard]));
        set.joins.add(brick_join);
        if let Some(join) = localized_join {
            set.joins.add(join);
        }
        Ok(())
    }
}

/// `CONCAT(path, key)`
pub(crate) fn full_path(base: &str, key_column: &str) -> Expr {
    Expr::function(
        "CONCAT",
        vec![qualified(base, "path"), qualified(base, key_column)],
    )
}

/// Fallback for properties nothing resolves: match rows where the column is
/// absent or empty.
fn empty_value_condition(property: &str) -> Expr {
    let col = ident(property);
    let items = vec![
        col.clone().is_null(),
        Expr::binary(col, BinaryOperator::Eq, value(Value::from(""))),
    ];
    Expr::Logical {
        op: LogicalOp::Or,
        items,
    }
}
