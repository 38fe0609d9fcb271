//! Maps a requested sort property to an orderable expression.

use crate::{
    condition::builder::full_path,
    error::CompileError,
    join::JoinRequirement,
    resolver::{FieldKind, FieldResolver, Resolution},
};
use model::{
    core::data_type::DataType,
    filter::{SortDirection, SortRequest},
    listing::SystemField,
    schema::field::FieldDefinition,
};
use query::{
    ast::{expr::Expr, select::OrderByExpr},
    dialect::Dialect,
    ident, qualified,
    renderer::to_sql,
};
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct SortKey {
    pub expr: Expr,
    /// `true` when `expr` is a single column reference; `false` for
    /// synthetic expressions and alias-qualified side-table columns.
    pub quote_as_column: bool,
    pub direction: SortDirection,
    /// Side tables the expression reads from.
    pub joins: Vec<JoinRequirement>,
    /// The listing is grouped by its primary key, which only dialects with
    /// lenient grouping accept next to the joined value.
    pub group_by_primary_key: bool,
}

impl SortKey {
    fn column(expr: Expr, direction: SortDirection) -> Self {
        Self {
            expr,
            quote_as_column: true,
            direction,
            joins: Vec::new(),
            group_by_primary_key: false,
        }
    }

    fn raw(expr: Expr, direction: SortDirection) -> Self {
        Self {
            quote_as_column: false,
            ..Self::column(expr, direction)
        }
    }

    pub fn to_sql(&self, dialect: &dyn Dialect) -> String {
        to_sql(&self.expr, dialect)
    }

    pub fn order_by(&self) -> OrderByExpr {
        OrderByExpr {
            expr: self.expr.clone(),
            direction: Some(self.direction.into()),
        }
    }
}

pub struct SortKeyResolver<'s> {
    resolver: FieldResolver<'s>,
    dialect: &'s dyn Dialect,
    base: String,
    collation: Option<String>,
}

impl<'s> SortKeyResolver<'s> {
    pub fn new(
        resolver: FieldResolver<'s>,
        dialect: &'s dyn Dialect,
        base: impl Into<String>,
        collation: Option<&str>,
    ) -> Self {
        Self {
            resolver,
            dialect,
            base: base.into(),
            collation: collation.map(str::to_string),
        }
    }

    /// `None` when the property names a key type that is never sortable.
    pub fn resolve(&self, request: &SortRequest) -> Result<Option<SortKey>, CompileError> {
        let direction = request.direction;
        let kind = match self.resolver.resolve_property(&request.property)? {
            Resolution::Field(kind) => kind,
            Resolution::Ignored => {
                debug!("Not sorting by ignored key '{}'", request.property);
                return Ok(None);
            }
            Resolution::Unresolved => {
                return Ok(Some(SortKey::column(
                    qualified(&self.base, &request.property),
                    direction,
                )));
            }
        };

        let key = match kind {
            FieldKind::System(SystemField::FullPath) => {
                let target = self.resolver.target();
                let text = Expr::Cast {
                    expr: Box::new(full_path(&self.base, target.key_column())),
                    data_type: self.dialect.text_type().to_string(),
                };
                let expr = match &self.collation {
                    Some(collation) => Expr::Collate {
                        expr: Box::new(text),
                        collation: collation.clone(),
                    },
                    None => text,
                };
                SortKey::raw(expr, direction)
            }
            FieldKind::System(field) => {
                let column = self
                    .resolver
                    .target()
                    .system_column(field)
                    .unwrap_or(self.resolver.target().primary_key());
                SortKey::column(qualified(&self.base, column), direction)
            }
            FieldKind::Scalar(definition) | FieldKind::Localized(definition) => {
                match composite_expr(definition, &self.base) {
                    Some(expr) => SortKey::raw(expr, direction),
                    None => SortKey::column(qualified(&self.base, &definition.name), direction),
                }
            }
            FieldKind::Brick {
                brick,
                field,
                language,
            } => {
                let mut joins = vec![JoinRequirement::Brick {
                    brick: brick.key.clone(),
                }];
                if let Some(language) = language {
                    joins.push(JoinRequirement::BrickLocalized {
                        brick: brick.key.clone(),
                        container: brick.container_field.clone(),
                        language: language.to_string(),
                    });
                }
                let alias = joins
                    .last()
                    .map(JoinRequirement::alias)
                    .unwrap_or_else(|| brick.key.clone());
                let expr = composite_expr(field, &alias)
                    .unwrap_or_else(|| qualified(&alias, &field.name));
                SortKey {
                    joins,
                    ..SortKey::raw(expr, direction)
                }
            }
            FieldKind::ClassificationStoreKey {
                fieldname,
                group_id,
                key_id,
                language,
                ..
            } => {
                let join = JoinRequirement::ClassificationStore {
                    fieldname,
                    group_id,
                    key_id,
                    language,
                };
                SortKey {
                    joins: vec![join.clone()],
                    group_by_primary_key: self.dialect.lenient_grouping(),
                    ..SortKey::column(ident(&join.alias()), direction)
                }
            }
            FieldKind::UrlSlug { fieldname, owner } => {
                let join = JoinRequirement::UrlSlug { fieldname, owner };
                SortKey {
                    joins: vec![join.clone()],
                    ..SortKey::raw(qualified(&join.alias(), "slug"), direction)
                }
            }
        };

        Ok(Some(key))
    }
}

/// Composite field types sort by a concatenation of their storage columns.
fn composite_expr(definition: &FieldDefinition, qualifier: &str) -> Option<Expr> {
    let parts = match definition.data_type {
        DataType::QuantityValue => ["unit", "value"],
        DataType::Rgba => ["rgb", "a"],
        _ => return None,
    };
    let args = parts
        .iter()
        .map(|part| qualified(qualifier, &format!("{}__{part}", definition.name)))
        .collect();
    Some(Expr::function("CONCAT", args))
}
