//! SQL AST, dialects and rendering used by the grid filter compiler.

use crate::ast::expr::{Expr, Ident};
use model::core::value::Value;

pub mod ast;
pub mod builder;
pub mod dialect;
pub mod macros;
pub mod renderer;

pub fn ident(name: &str) -> Expr {
    Expr::Identifier(Ident {
        qualifier: None,
        name: name.to_string(),
    })
}

/// A table- or alias-qualified column, e.g. `Engine.power`.
pub fn qualified(qualifier: &str, name: &str) -> Expr {
    Expr::Identifier(Ident {
        qualifier: Some(qualifier.to_string()),
        name: name.to_string(),
    })
}

/// A column, qualified only when a qualifier is given.
pub fn column(qualifier: Option<&str>, name: &str) -> Expr {
    Expr::Identifier(Ident {
        qualifier: qualifier.map(String::from),
        name: name.to_string(),
    })
}

pub fn value(val: Value) -> Expr {
    Expr::Value(val)
}
