//! Turns resolved filters into SQL conditions.

use crate::operator::{Comparand, SqlOperator};
use model::core::value::Value;
use query::{ast::expr::Expr, dialect::Dialect, value};

pub mod builder;
pub mod field;

pub use builder::{ConditionBuilder, ConditionSet};
pub use field::{ConditionContext, FilterCondition};

/// Compares `col` with a coerced comparand.
///
/// A list compared with `=` becomes `IN`; a list under any other binary
/// operator becomes an `OR` of one comparison per element. Mismatched shapes
/// (a range without `BETWEEN`) produce nothing.
pub(crate) fn compare(col: Expr, op: SqlOperator, comparand: &Comparand) -> Option<Expr> {
    match (op, comparand) {
        (SqlOperator::Between, Comparand::Range(low, high)) => {
            Some(col.between(value(low.clone()), value(high.clone())))
        }
        (SqlOperator::In, Comparand::Single(v) | Comparand::Range(v, _)) => {
            Some(col.in_list(vec![value(v.clone())]))
        }
        (SqlOperator::In | SqlOperator::Eq, Comparand::List(values)) => {
            Some(col.in_list(values.iter().cloned().map(value).collect()))
        }
        (_, Comparand::Range(..)) => None,
        (op, Comparand::Single(v)) => Some(Expr::binary(col, op.binary()?, value(v.clone()))),
        (op, Comparand::List(values)) => {
            let bin = op.binary()?;
            Expr::or(
                values
                    .iter()
                    .map(|v| Expr::binary(col.clone(), bin, value(v.clone())))
                    .collect(),
            )
        }
    }
}

/// `IFNULL(col, 0)` / `COALESCE(col, 0)`, so NULL counts as false.
pub(crate) fn null_as_false(dialect: &dyn Dialect, col: Expr) -> Expr {
    Expr::function(
        dialect.null_fallback_function(),
        vec![col, value(Value::Int(0))],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use query::{dialect::MySql, ident, renderer::to_sql};

    #[test]
    fn test_compare_shapes() {
        let list = Comparand::List(vec![Value::Int(1), Value::Int(2)]);
        let eq = compare(ident("n"), SqlOperator::Eq, &list).unwrap();
        assert_eq!(to_sql(&eq, &MySql), "`n` IN (1,2)");

        let like = Comparand::List(vec![Value::from("%a%"), Value::from("%b%")]);
        let or = compare(ident("n"), SqlOperator::Like, &like).unwrap();
        assert_eq!(to_sql(&or, &MySql), "(`n` LIKE '%a%' OR `n` LIKE '%b%')");

        let range = Comparand::Range(Value::Int(1), Value::Int(2));
        assert!(compare(ident("n"), SqlOperator::Lt, &range).is_none());
    }

    #[test]
    fn test_null_as_false() {
        let expr = null_as_false(&MySql, ident("published"));
        assert_eq!(to_sql(&expr, &MySql), "IFNULL(`published`, 0)");
    }
}
