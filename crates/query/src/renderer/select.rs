use crate::{
    ast::{
        common::{JoinKind, OrderDir},
        select::{FromClause, JoinClause, OrderByExpr, Select},
    },
    renderer::{Render, Renderer},
};

impl Render for Select {
    fn render(&self, r: &mut Renderer) {
        // 1. SELECT clause
        r.sql.push_str("SELECT ");
        if self.columns.is_empty() {
            r.sql.push('*');
        }
        for (i, col) in self.columns.iter().enumerate() {
            if i > 0 {
                r.sql.push_str(", ");
            }
            col.render(r);
        }

        // 2. FROM
        if let Some(from) = &self.from {
            r.sql.push(' ');
            from.render(r);
        }

        // 3. JOIN
        for join in &self.joins {
            r.sql.push(' ');
            join.render(r);
        }

        // 4. WHERE
        if let Some(where_clause) = &self.where_clause {
            r.sql.push_str(" WHERE ");
            where_clause.render(r);
        }

        // 5. GROUP BY
        if !self.group_by.is_empty() {
            r.sql.push_str(" GROUP BY ");
            for (i, expr) in self.group_by.iter().enumerate() {
                if i > 0 {
                    r.sql.push_str(", ");
                }
                expr.render(r);
            }
        }

        // 6. HAVING
        if let Some(having) = &self.having {
            r.sql.push_str(" HAVING ");
            having.render(r);
        }

        // 7. ORDER BY
        if !self.order_by.is_empty() {
            r.sql.push_str(" ORDER BY ");
            for (i, order) in self.order_by.iter().enumerate() {
                if i > 0 {
                    r.sql.push_str(", ");
                }
                order.render(r);
            }
        }

        // 8. LIMIT / OFFSET
        if let Some(limit) = &self.limit {
            r.sql.push_str(" LIMIT ");
            limit.render(r);
        }
        if let Some(offset) = &self.offset {
            r.sql.push_str(" OFFSET ");
            offset.render(r);
        }
    }
}

impl Render for FromClause {
    fn render(&self, r: &mut Renderer) {
        r.sql.push_str("FROM ");
        r.render_table_ref(&self.table);
        if let Some(alias) = &self.alias {
            r.sql.push_str(" AS ");
            r.push_identifier(alias);
        }
    }
}

impl Render for JoinClause {
    fn render(&self, r: &mut Renderer) {
        let join_str = match self.kind {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
        };
        r.sql.push_str(join_str);
        r.sql.push(' ');
        r.render_table_ref(&self.table);
        if let Some(alias) = &self.alias {
            r.sql.push_str(" AS ");
            r.push_identifier(alias);
        }
        r.sql.push_str(" ON ");
        self.on.render(r);
    }
}

impl Render for OrderByExpr {
    fn render(&self, r: &mut Renderer) {
        self.expr.render(r);
        if let Some(dir) = &self.direction {
            let dir_str = match dir {
                OrderDir::Asc => "ASC",
                OrderDir::Desc => "DESC",
            };
            r.sql.push(' ');
            r.sql.push_str(dir_str);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        ast::{
            common::{JoinKind, OrderDir},
            expr::{BinaryOperator, Expr},
        },
        builder::select::SelectBuilder,
        dialect::{MySql, Postgres},
        ident, qualified,
        renderer::to_sql,
        table_ref, value,
    };
    use model::core::value::Value;

    #[test]
    fn test_simple_select_mysql() {
        let ast = SelectBuilder::new()
            .select(vec![ident("id"), ident("key")])
            .from(table_ref!("object_CAR"), None)
            .where_clause(Expr::binary(
                ident("id"),
                BinaryOperator::Eq,
                value(Value::Int(123)),
            ))
            .build();

        assert_eq!(
            to_sql(&ast, &MySql),
            "SELECT `id`, `key` FROM `object_CAR` WHERE `id` = 123"
        );
    }

    #[test]
    fn test_complex_select_postgres() {
        let ast = SelectBuilder::new()
            .select(vec![
                Expr::Wildcard {
                    qualifier: Some("o".to_string()),
                },
                qualified("cs", "value").alias("cskey_attributes_1_2"),
            ])
            .from(table_ref!("object_CAR"), Some("o"))
            .join(
                JoinKind::Left,
                table_ref!("object_classificationstore_data_CAR"),
                Some("cs"),
                Expr::binary(qualified("cs", "id"), BinaryOperator::Eq, qualified("o", "id")),
            )
            .where_clause(Expr::binary(
                qualified("o", "published"),
                BinaryOperator::Eq,
                value(Value::Int(1)),
            ))
            .group_by(qualified("o", "id"))
            .having(Expr::binary(
                ident("cskey_attributes_1_2"),
                BinaryOperator::Gt,
                value(Value::Int(5)),
            ))
            .order_by(ident("cskey_attributes_1_2"), Some(OrderDir::Desc))
            .limit(value(Value::Int(10)))
            .offset(value(Value::Int(20)))
            .build();

        let expected_sql = concat!(
            r#"SELECT "o".*, "cs"."value" AS "cskey_attributes_1_2" FROM "object_CAR" AS "o" "#,
            r#"LEFT JOIN "object_classificationstore_data_CAR" AS "cs" ON "cs"."id" = "o"."id" "#,
            r#"WHERE "o"."published" = 1 GROUP BY "o"."id" HAVING "cskey_attributes_1_2" > 5 "#,
            r#"ORDER BY "cskey_attributes_1_2" DESC LIMIT 10 OFFSET 20"#
        );
        assert_eq!(to_sql(&ast, &Postgres), expected_sql);
    }
}
