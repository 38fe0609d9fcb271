//! Per data type condition generators.

use crate::{
    condition::{compare, null_as_false},
    operator::{Comparand, SqlOperator},
};
use model::{
    core::{data_type::DataType, value::Value},
    schema::field::FieldDefinition,
};
use query::{
    ast::expr::{BinaryOperator, Expr},
    column,
    dialect::Dialect,
    value,
};

/// Where the field's column lives.
#[derive(Clone, Copy)]
pub struct ConditionContext<'a> {
    /// Table or join alias the column belongs to.
    pub qualifier: Option<&'a str>,
    pub dialect: &'a dyn Dialect,
}

impl<'a> ConditionContext<'a> {
    pub fn new(qualifier: Option<&'a str>, dialect: &'a dyn Dialect) -> Self {
        Self { qualifier, dialect }
    }
}

/// Builds the filter condition for values of one field.
pub trait FilterCondition {
    /// Condition against the field's own column(s) under `ctx.qualifier`.
    fn filter_condition(
        &self,
        comparand: &Comparand,
        op: SqlOperator,
        ctx: &ConditionContext,
    ) -> Option<Expr>;

    /// Condition against a single value column given as an expression, e.g.
    /// the select alias or the `value` column of a joined classification-store
    /// row.
    fn filter_condition_ext(
        &self,
        comparand: &Comparand,
        op: SqlOperator,
        column: &Expr,
        ctx: &ConditionContext,
    ) -> Option<Expr>;
}

impl FilterCondition for FieldDefinition {
    fn filter_condition(
        &self,
        comparand: &Comparand,
        op: SqlOperator,
        ctx: &ConditionContext,
    ) -> Option<Expr> {
        let target = ColumnTarget::Field {
            qualifier: ctx.qualifier,
            name: &self.name,
        };
        condition(&self.data_type, target, comparand, op, ctx.dialect)
    }

    fn filter_condition_ext(
        &self,
        comparand: &Comparand,
        op: SqlOperator,
        column: &Expr,
        ctx: &ConditionContext,
    ) -> Option<Expr> {
        condition(
            &self.data_type,
            ColumnTarget::Value(column),
            comparand,
            op,
            ctx.dialect,
        )
    }
}

#[derive(Clone, Copy)]
enum ColumnTarget<'a> {
    Field {
        qualifier: Option<&'a str>,
        name: &'a str,
    },
    /// A single value column; composite suffixes do not apply.
    Value(&'a Expr),
}

impl ColumnTarget<'_> {
    fn column(&self) -> Expr {
        match self {
            ColumnTarget::Field { qualifier, name } => column(*qualifier, name),
            ColumnTarget::Value(expr) => (*expr).clone(),
        }
    }

    /// `name__suffix`, the storage of composite field types.
    fn part(&self, suffix: &str) -> Expr {
        match self {
            ColumnTarget::Field { qualifier, name } => {
                column(*qualifier, &format!("{name}__{suffix}"))
            }
            ColumnTarget::Value(expr) => (*expr).clone(),
        }
    }
}

fn condition(
    data_type: &DataType,
    target: ColumnTarget,
    comparand: &Comparand,
    op: SqlOperator,
    dialect: &dyn Dialect,
) -> Option<Expr> {
    match data_type {
        DataType::Input | DataType::Textarea | DataType::Wysiwyg => {
            text_condition(target.column(), comparand, op)
        }
        DataType::Numeric => compare(target.column(), op, &comparand.map(Value::to_numeric)),
        DataType::Checkbox | DataType::BooleanSelect => {
            let op = if op == SqlOperator::Like {
                SqlOperator::Eq
            } else {
                op
            };
            let flag = comparand.map(|v| Value::Int(i64::from(v.as_bool())));
            compare(null_as_false(dialect, target.column()), op, &flag)
        }
        DataType::Date | DataType::Datetime => {
            compare(target.column(), op, &comparand.map(Value::to_numeric))
        }
        DataType::Select => compare(target.column(), op, comparand),
        DataType::Multiselect => multiselect_condition(target.column(), comparand),
        DataType::QuantityValue => {
            compare(target.part("value"), op, &comparand.map(Value::to_numeric))
        }
        DataType::Rgba => {
            let expr = match target {
                ColumnTarget::Field { .. } => {
                    Expr::function("CONCAT", vec![target.part("rgb"), target.part("a")])
                }
                ColumnTarget::Value(_) => target.column(),
            };
            let hex = comparand.map(|v| match v.as_string() {
                Some(s) => Value::String(s.replace('#', "").to_lowercase()),
                None => v.clone(),
            });
            compare(expr, op, &hex)
        }
        DataType::ManyToOneRelation => {
            compare(target.part("id"), op, &comparand.map(Value::to_numeric))
        }
        DataType::UrlSlug
        | DataType::Localizedfields { .. }
        | DataType::Objectbricks { .. }
        | DataType::Classificationstore { .. } => None,
    }
}

/// The grid sends the string `NULL` to ask for empty text columns.
fn text_condition(col: Expr, comparand: &Comparand, op: SqlOperator) -> Option<Expr> {
    if op == SqlOperator::Eq
        && let Comparand::Single(Value::String(s)) = comparand
        && s == "NULL"
    {
        return Some(col.is_null());
    }
    compare(col, op, comparand)
}

/// Multiselect values are stored as `,a,b,`; each requested option must
/// appear between commas.
fn multiselect_condition(col: Expr, comparand: &Comparand) -> Option<Expr> {
    let items = comparand
        .values()
        .into_iter()
        .filter_map(Value::as_string)
        .map(|option| {
            let option = option.trim_matches('%');
            Expr::binary(
                col.clone(),
                BinaryOperator::Like,
                value(Value::String(format!("%,{option},%"))),
            )
        })
        .collect();
    Expr::or(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use query::{
        dialect::{MySql, Postgres},
        ident, qualified,
        renderer::to_sql,
    };

    fn render(def: &FieldDefinition, comparand: Comparand, op: SqlOperator) -> Option<String> {
        let ctx = ConditionContext::new(Some("object_CAR"), &MySql);
        def.filter_condition(&comparand, op, &ctx)
            .map(|expr| to_sql(&expr, &MySql))
    }

    #[test]
    fn test_text_conditions() {
        let def = FieldDefinition::new("name", DataType::Input);
        assert_eq!(
            render(&def, Comparand::Single(Value::from("%foo%")), SqlOperator::Like).unwrap(),
            "`object_CAR`.`name` LIKE '%foo%'"
        );
        assert_eq!(
            render(&def, Comparand::Single(Value::from("NULL")), SqlOperator::Eq).unwrap(),
            "`object_CAR`.`name` IS NULL"
        );
    }

    #[test]
    fn test_numeric_and_boolean_conditions() {
        let def = FieldDefinition::new("price", DataType::Numeric);
        assert_eq!(
            render(&def, Comparand::Single(Value::from("100")), SqlOperator::Gt).unwrap(),
            "`object_CAR`.`price` > 100"
        );

        let def = FieldDefinition::new("sold", DataType::Checkbox);
        assert_eq!(
            render(&def, Comparand::Single(Value::Boolean(true)), SqlOperator::Eq).unwrap(),
            "IFNULL(`object_CAR`.`sold`, 0) = 1"
        );

        let ctx = ConditionContext::new(None, &Postgres);
        let expr = def
            .filter_condition(&Comparand::Single(Value::Int(0)), SqlOperator::Eq, &ctx)
            .unwrap();
        assert_eq!(to_sql(&expr, &Postgres), r#"COALESCE("sold", 0) = 0"#);
    }

    #[test]
    fn test_date_range_condition() {
        let def = FieldDefinition::new("builtAt", DataType::Date);
        assert_eq!(
            render(
                &def,
                Comparand::Range(Value::Int(100), Value::Int(86_499)),
                SqlOperator::Between
            )
            .unwrap(),
            "`object_CAR`.`builtAt` BETWEEN 100 AND 86499"
        );
    }

    #[test]
    fn test_select_and_multiselect() {
        let def = FieldDefinition::new("color", DataType::Select);
        assert_eq!(
            render(
                &def,
                Comparand::List(vec![Value::from("red"), Value::from("blue")]),
                SqlOperator::Eq
            )
            .unwrap(),
            "`object_CAR`.`color` IN ('red','blue')"
        );

        let def = FieldDefinition::new("extras", DataType::Multiselect);
        assert_eq!(
            render(
                &def,
                Comparand::List(vec![Value::from("abs"), Value::from("esp")]),
                SqlOperator::Eq
            )
            .unwrap(),
            "(`object_CAR`.`extras` LIKE '%,abs,%' OR `object_CAR`.`extras` LIKE '%,esp,%')"
        );
    }

    #[test]
    fn test_composite_columns() {
        let def = FieldDefinition::new("length", DataType::QuantityValue);
        assert_eq!(
            render(&def, Comparand::Single(Value::from("4.5")), SqlOperator::Lt).unwrap(),
            "`object_CAR`.`length__value` < 4.5"
        );

        let def = FieldDefinition::new("paint", DataType::Rgba);
        assert_eq!(
            render(&def, Comparand::Single(Value::from("#FF0000ff")), SqlOperator::Eq).unwrap(),
            "CONCAT(`object_CAR`.`paint__rgb`, `object_CAR`.`paint__a`) = 'ff0000ff'"
        );

        let def = FieldDefinition::new("manufacturer", DataType::ManyToOneRelation);
        assert_eq!(
            render(&def, Comparand::Single(Value::from("17")), SqlOperator::Eq).unwrap(),
            "`object_CAR`.`manufacturer__id` = 17"
        );
    }

    #[test]
    fn test_containers_produce_nothing() {
        let def = FieldDefinition::new("bricks", DataType::Objectbricks { allowed: vec![] });
        assert!(render(&def, Comparand::Single(Value::from("x")), SqlOperator::Eq).is_none());
    }

    #[test]
    fn test_ext_condition_uses_given_column() {
        let def = FieldDefinition::new("weight", DataType::Numeric);
        let ctx = ConditionContext::new(Some("ignored"), &MySql);
        let expr = def
            .filter_condition_ext(
                &Comparand::Single(Value::from("5")),
                SqlOperator::Gt,
                &ident("cskey~attributes~1~2"),
                &ctx,
            )
            .unwrap();
        assert_eq!(to_sql(&expr, &MySql), "`cskey~attributes~1~2` > 5");

        let def = FieldDefinition::new("size", DataType::QuantityValue);
        let expr = def
            .filter_condition_ext(
                &Comparand::Single(Value::from("5")),
                SqlOperator::Lt,
                &qualified("cskey~attributes~1~3", "value"),
                &ctx,
            )
            .unwrap();
        assert_eq!(to_sql(&expr, &MySql), "`cskey~attributes~1~3`.`value` < 5");
    }
}
