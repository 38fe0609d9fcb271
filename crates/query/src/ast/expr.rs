//! Defines the AST for SQL expressions.

use model::core::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A column or table identifier, e.g., `users` or `users.id`.
    Identifier(Ident),

    /// `*` or `alias.*` in a select list.
    Wildcard { qualifier: Option<String> },

    /// A literal value, such as a string, number, boolean, or NULL.
    Value(Value),

    /// A binary comparison, e.g. `column = 'value'` or `name LIKE '%a%'`.
    BinaryOp(Box<BinaryOp>),

    /// Two or more conditions joined by the same connective.
    Logical { op: LogicalOp, items: Vec<Expr> },

    /// A function call, e.g., `COUNT(*)` or `CONCAT(path, key)`.
    FunctionCall(FunctionCall),

    /// `expr BETWEEN low AND high`
    Between {
        expr: Box<Expr>,
        low: Box<Expr>,
        high: Box<Expr>,
    },

    /// `expr IN (a, b, c)`
    InList { expr: Box<Expr>, list: Vec<Expr> },

    /// `expr IS NULL` / `expr IS NOT NULL`
    IsNull { expr: Box<Expr>, negated: bool },

    /// `CAST(expr AS type)`
    Cast { expr: Box<Expr>, data_type: String },

    /// `expr COLLATE collation`
    Collate { expr: Box<Expr>, collation: String },

    /// An aliased expression, e.g. `cs.value AS cskey_attributes_1_2`
    Alias { expr: Box<Expr>, alias: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ident {
    pub qualifier: Option<String>, // e.g., the 'users' in 'users.id'
    pub name: String,              // e.g., the 'id' in 'users.id'
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryOp {
    pub left: Expr,
    pub op: BinaryOperator,
    pub right: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub name: String,
    pub args: Vec<Expr>,
    pub wildcard: bool, // represents the '*' in 'COUNT(*)'
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Eq, // =
    Lt, // <
    Gt, // >
    Like,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

impl Expr {
    pub fn binary(left: Expr, op: BinaryOperator, right: Expr) -> Expr {
        Expr::BinaryOp(Box::new(BinaryOp { left, op, right }))
    }

    pub fn function(name: &str, args: Vec<Expr>) -> Expr {
        Expr::FunctionCall(FunctionCall {
            name: name.to_string(),
            args,
            wildcard: false,
        })
    }

    pub fn between(self, low: Expr, high: Expr) -> Expr {
        Expr::Between {
            expr: Box::new(self),
            low: Box::new(low),
            high: Box::new(high),
        }
    }

    pub fn in_list(self, list: Vec<Expr>) -> Expr {
        Expr::InList {
            expr: Box::new(self),
            list,
        }
    }

    pub fn is_null(self) -> Expr {
        Expr::IsNull {
            expr: Box::new(self),
            negated: false,
        }
    }

    pub fn alias(self, alias: &str) -> Expr {
        Expr::Alias {
            expr: Box::new(self),
            alias: alias.to_string(),
        }
    }

    /// Combines conditions with `AND`; a single condition is returned as is
    /// and nested conjunctions are flattened.
    pub fn and(items: Vec<Expr>) -> Option<Expr> {
        Self::logical(LogicalOp::And, items)
    }

    /// Combines conditions with `OR`, flattening nested disjunctions.
    pub fn or(items: Vec<Expr>) -> Option<Expr> {
        Self::logical(LogicalOp::Or, items)
    }

    fn logical(op: LogicalOp, items: Vec<Expr>) -> Option<Expr> {
        let mut flat = Vec::with_capacity(items.len());
        for item in items {
            match item {
                Expr::Logical { op: inner, items } if inner == op => flat.extend(items),
                other => flat.push(other),
            }
        }

        match flat.len() {
            0 => None,
            1 => flat.pop(),
            _ => Some(Expr::Logical { op, items: flat }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ident, value};

    #[test]
    fn test_and_flattens_and_unwraps() {
        assert_eq!(Expr::and(vec![]), None);
        assert_eq!(Expr::and(vec![ident("a")]), Some(ident("a")));

        let nested = Expr::and(vec![ident("a"), ident("b")]).unwrap();
        let flat = Expr::and(vec![nested, ident("c")]).unwrap();
        match flat {
            Expr::Logical { op, items } => {
                assert_eq!(op, LogicalOp::And);
                assert_eq!(items.len(), 3);
            }
            other => panic!("expected conjunction, got {other:?}"),
        }
    }

    #[test]
    fn test_or_keeps_nested_and() {
        let and = Expr::and(vec![ident("a"), ident("b")]).unwrap();
        let or = Expr::or(vec![and.clone(), value(Value::Int(1))]).unwrap();
        match or {
            Expr::Logical { op, items } => {
                assert_eq!(op, LogicalOp::Or);
                assert_eq!(items[0], and);
            }
            other => panic!("expected disjunction, got {other:?}"),
        }
    }
}
