//! Side-table joins needed by brick, classification-store and slug fields.

use crate::resolver::SlugOwner;
use model::{core::value::Value, listing::ListingTarget};
use query::{
    ast::{
        common::JoinKind,
        expr::{BinaryOperator, Expr},
        select::JoinClause,
    },
    qualified, table_ref, value,
};
use std::collections::HashSet;
use tracing::debug;

/// One side table a compiled query has to join.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum JoinRequirement {
    Brick {
        brick: String,
    },
    BrickLocalized {
        brick: String,
        container: String,
        language: String,
    },
    ClassificationStore {
        fieldname: String,
        group_id: u32,
        key_id: u32,
        language: String,
    },
    UrlSlug {
        fieldname: String,
        owner: SlugOwner,
    },
}

impl JoinRequirement {
    /// Table alias of the join. Parts are joined with `~`, the compound key
    /// separator, so brick keys and field names taken from keys never contain
    /// it and distinct requirements of one compilation never share an alias.
    pub fn alias(&self) -> String {
        match self {
            JoinRequirement::Brick { brick } => brick.clone(),
            JoinRequirement::BrickLocalized { brick, .. } => format!("{brick}~localized"),
            JoinRequirement::ClassificationStore {
                fieldname,
                group_id,
                key_id,
                ..
            } => format!("cskey~{fieldname}~{group_id}~{key_id}"),
            JoinRequirement::UrlSlug {
                fieldname,
                owner: SlugOwner::Object,
            } => format!("slug~{fieldname}"),
            JoinRequirement::UrlSlug {
                fieldname,
                owner: SlugOwner::Brick(brick),
            } => format!("slug~{brick}~{fieldname}"),
        }
    }

    pub fn table(&self, target: &ListingTarget) -> String {
        match self {
            JoinRequirement::Brick { brick } => target.brick_table(brick),
            JoinRequirement::BrickLocalized { brick, .. } => target.brick_localized_table(brick),
            JoinRequirement::ClassificationStore { .. } => target.classification_table(),
            JoinRequirement::UrlSlug { .. } => target.slug_table().to_string(),
        }
    }

    /// The `ON` condition linking the side table to the listing's base table.
    pub fn on_condition(&self, base: &str, primary_key: &str) -> Expr {
        let alias = self.alias();
        let eq = |column: &str, literal: Value| {
            Expr::binary(qualified(&alias, column), BinaryOperator::Eq, value(literal))
        };
        let link = |column: &str| {
            Expr::binary(
                qualified(&alias, column),
                BinaryOperator::Eq,
                qualified(base, primary_key),
            )
        };

        let items = match self {
            JoinRequirement::Brick { .. } => vec![link("id")],
            JoinRequirement::BrickLocalized {
                container,
                language,
                ..
            } => vec![
                link("id"),
                eq("fieldname", Value::from(container.as_str())),
                eq("language", Value::from(language.as_str())),
            ],
            JoinRequirement::ClassificationStore {
                fieldname,
                group_id,
                key_id,
                language,
            } => vec![
                link("id"),
                eq("fieldname", Value::from(fieldname.as_str())),
                eq("groupId", Value::Int(i64::from(*group_id))),
                eq("keyId", Value::Int(i64::from(*key_id))),
                eq("language", Value::from(language.as_str())),
            ],
            JoinRequirement::UrlSlug { fieldname, owner } => {
                let mut items = vec![
                    link("objectId"),
                    eq("fieldname", Value::from(fieldname.as_str())),
                ];
                match owner {
                    SlugOwner::Object => items.push(eq("ownertype", Value::from("object"))),
                    SlugOwner::Brick(brick) => {
                        items.push(eq("ownertype", Value::from("objectbrick")));
                        items.push(eq("ownername", Value::from(brick.as_str())));
                    }
                }
                items
            }
        };

        // every arm yields at least the link condition
        Expr::and(items).unwrap_or_else(|| link("id"))
    }

    /// Extra select-list entry exposing the joined value under the alias, so
    /// `HAVING` and `ORDER BY` can refer to it.
    pub fn select_column(&self) -> Option<Expr> {
        match self {
            JoinRequirement::ClassificationStore { .. } => {
                let alias = self.alias();
                Some(qualified(&alias, "value").alias(&alias))
            }
            _ => None,
        }
    }

    pub fn to_clause(&self, target: &ListingTarget, base: &str) -> JoinClause {
        JoinClause {
            kind: JoinKind::Left,
            table: table_ref!(self.table(target)),
            alias: Some(self.alias()),
            on: self.on_condition(base, target.primary_key()),
        }
    }
}

/// Collects join requirements for one compilation, each distinct requirement
/// once, in the order they were first requested.
#[derive(Debug, Default, Clone)]
pub struct JoinPlanner {
    joins: Vec<JoinRequirement>,
    seen: HashSet<JoinRequirement>,
}

impl JoinPlanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a requirement. Returns `false` when an equal requirement is
    /// already planned.
    pub fn add(&mut self, requirement: JoinRequirement) -> bool {
        if self.seen.contains(&requirement) {
            debug!("Join '{}' already planned", requirement.alias());
            return false;
        }
        debug!("Planning join '{}'", requirement.alias());
        self.seen.insert(requirement.clone());
        self.joins.push(requirement);
        true
    }

    pub fn extend(&mut self, requirements: impl IntoIterator<Item = JoinRequirement>) {
        for requirement in requirements {
            self.add(requirement);
        }
    }

    pub fn requirements(&self) -> &[JoinRequirement] {
        &self.joins
    }

    pub fn len(&self) -> usize {
        self.joins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joins.is_empty()
    }

    /// The `LEFT JOIN` clauses against `base`.
    pub fn plan(&self, target: &ListingTarget, base: &str) -> Vec<JoinClause> {
        self.joins
            .iter()
            .map(|join| join.to_clause(target, base))
            .collect()
    }

    pub fn select_columns(&self) -> Vec<Expr> {
        self.joins
            .iter()
            .filter_map(JoinRequirement::select_column)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use query::{dialect::MySql, renderer::to_sql};

    fn classification() -> JoinRequirement {
        JoinRequirement::ClassificationStore {
            fieldname: "attributes".into(),
            group_id: 1,
            key_id: 2,
            language: "default".into(),
        }
    }

    #[test]
    fn test_planner_deduplicates_requirements() {
        let mut planner = JoinPlanner::new();
        assert!(planner.add(classification()));
        assert!(!planner.add(classification()));
        assert!(planner.add(JoinRequirement::Brick {
            brick: "Engine".into()
        }));
        planner.extend(vec![JoinRequirement::Brick {
            brick: "Engine".into(),
        }]);

        assert_eq!(planner.len(), 2);
        assert_eq!(planner.requirements()[0].alias(), "cskey~attributes~1~2");
        assert_eq!(planner.select_columns().len(), 1);
    }

    #[test]
    fn test_classification_join_clause() {
        let target = ListingTarget::object("CAR");
        let clause = classification().to_clause(&target, "object_CAR");

        assert_eq!(clause.kind, JoinKind::Left);
        assert_eq!(clause.table.name, "object_classificationstore_data_CAR");
        assert_eq!(
            to_sql(&clause.on, &MySql),
            "(`cskey~attributes~1~2`.`id` = `object_CAR`.`id` AND `cskey~attributes~1~2`.`fieldname` = 'attributes' AND `cskey~attributes~1~2`.`groupId` = 1 AND `cskey~attributes~1~2`.`keyId` = 2 AND `cskey~attributes~1~2`.`language` = 'default')"
        );
    }

    #[test]
    fn test_slug_join_clause() {
        let target = ListingTarget::object("CAR");
        let join = JoinRequirement::UrlSlug {
            fieldname: "slug".into(),
            owner: SlugOwner::Brick("Engine".into()),
        };
        assert_eq!(join.alias(), "slug~Engine~slug");
        let clause = join.to_clause(&target, "object_CAR");
        assert_eq!(clause.table.name, "object_url_slugs");
        assert_eq!(
            to_sql(&clause.on, &MySql),
            "(`slug~Engine~slug`.`objectId` = `object_CAR`.`id` AND `slug~Engine~slug`.`fieldname` = 'slug' AND `slug~Engine~slug`.`ownertype` = 'objectbrick' AND `slug~Engine~slug`.`ownername` = 'Engine')"
        );
    }

    #[test]
    fn test_object_and_brick_slugs_stay_apart() {
        let object_slug = JoinRequirement::UrlSlug {
            fieldname: "Engine_slug".into(),
            owner: SlugOwner::Object,
        };
        let brick_slug = JoinRequirement::UrlSlug {
            fieldname: "slug".into(),
            owner: SlugOwner::Brick("Engine".into()),
        };
        assert_ne!(object_slug.alias(), brick_slug.alias());

        let mut planner = JoinPlanner::new();
        assert!(planner.add(object_slug));
        assert!(planner.add(brick_slug));
        assert_eq!(planner.len(), 2);
    }

    #[test]
    fn test_localized_brick_alias_differs_from_brick_named_alike() {
        let localized = JoinRequirement::BrickLocalized {
            brick: "Engine".into(),
            container: "bricks".into(),
            language: "de".into(),
        };
        let brick = JoinRequirement::Brick {
            brick: "Engine_localized".into(),
        };
        assert_eq!(localized.alias(), "Engine~localized");
        assert_ne!(localized.alias(), brick.alias());
    }
}
