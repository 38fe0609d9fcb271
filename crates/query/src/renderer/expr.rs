use crate::{
    ast::expr::{BinaryOp, BinaryOperator, Expr, FunctionCall, Ident, LogicalOp},
    renderer::{Render, Renderer},
};

impl Render for Expr {
    fn render(&self, r: &mut Renderer) {
        match self {
            Expr::Identifier(ident) => ident.render(r),
            Expr::Wildcard { qualifier } => {
                if let Some(qualifier) = qualifier {
                    r.push_identifier(qualifier);
                    r.sql.push('.');
                }
                r.sql.push('*');
            }
            Expr::Value(val) => r.add_literal(val),
            Expr::BinaryOp(op) => op.render(r),
            Expr::Logical { op, items } => render_logical(*op, items, r),
            Expr::FunctionCall(func) => func.render(r),
            Expr::Between { expr, low, high } => {
                expr.render(r);
                r.sql.push_str(" BETWEEN ");
                low.render(r);
                r.sql.push_str(" AND ");
                high.render(r);
            }
            Expr::InList { expr, list } => {
                expr.render(r);
                r.sql.push_str(" IN (");
                for (i, item) in list.iter().enumerate() {
                    if i > 0 {
                        r.sql.push(',');
                    }
                    item.render(r);
                }
                r.sql.push(')');
            }
            Expr::IsNull { expr, negated } => {
                expr.render(r);
                r.sql
                    .push_str(if *negated { " IS NOT NULL" } else { " IS NULL" });
            }
            Expr::Cast { expr, data_type } => {
                r.sql.push_str("CAST(");
                expr.render(r);
                r.sql.push_str(" AS ");
                r.sql.push_str(data_type);
                r.sql.push(')');
            }
            Expr::Collate { expr, collation } => {
                expr.render(r);
                r.sql.push_str(" COLLATE ");
                let collation = r.dialect.collation(collation);
                r.sql.push_str(&collation);
            }
            Expr::Alias { expr, alias } => {
                expr.render(r);
                r.sql.push_str(" AS ");
                r.push_identifier(alias);
            }
        }
    }
}

/// Renders `(a AND b AND c)`. Children that would bind ambiguously next to the
/// connective (`BETWEEN`) get their own parentheses.
fn render_logical(op: LogicalOp, items: &[Expr], r: &mut Renderer) {
    let connective = match op {
        LogicalOp::And => " AND ",
        LogicalOp::Or => " OR ",
    };

    if items.len() > 1 {
        r.sql.push('(');
    }
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            r.sql.push_str(connective);
        }
        if matches!(item, Expr::Between { .. }) && items.len() > 1 {
            r.sql.push('(');
            item.render(r);
            r.sql.push(')');
        } else {
            item.render(r);
        }
    }
    if items.len() > 1 {
        r.sql.push(')');
    }
}

impl Render for Ident {
    fn render(&self, r: &mut Renderer) {
        if let Some(qualifier) = &self.qualifier {
            r.push_identifier(qualifier);
            r.sql.push('.');
        }
        r.push_identifier(&self.name);
    }
}

impl Render for BinaryOp {
    fn render(&self, r: &mut Renderer) {
        self.left.render(r);

        let op_str = match self.op {
            BinaryOperator::Eq => " = ",
            BinaryOperator::Lt => " < ",
            BinaryOperator::Gt => " > ",
            BinaryOperator::Like => " LIKE ",
        };
        r.sql.push_str(op_str);

        self.right.render(r);
    }
}

impl Render for FunctionCall {
    fn render(&self, r: &mut Renderer) {
        r.sql.push_str(&self.name);
        r.sql.push('(');
        if self.wildcard {
            r.sql.push('*');
        } else {
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    r.sql.push_str(", ");
                }
                arg.render(r);
            }
        }
        r.sql.push(')');
    }
}
