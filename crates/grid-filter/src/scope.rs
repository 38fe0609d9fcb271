use model::{core::value::Value, listing::ListingScope};
use query::{
    ast::expr::{BinaryOperator, Expr},
    qualified, value,
};

/// Folder restriction placed in front of the user filters.
///
/// Direct children share the folder as their exact `path`; otherwise every
/// path below the folder matches. The root folder without the direct-children
/// restriction matches everything and adds no condition.
pub fn scope_condition(scope: &ListingScope, base: &str) -> Option<Expr> {
    let prefix = scope.folder_prefix()?;
    let path = qualified(base, "path");

    if scope.only_direct_children {
        return Some(Expr::binary(
            path,
            BinaryOperator::Eq,
            value(Value::String(prefix)),
        ));
    }
    if prefix == "/" {
        return None;
    }
    Some(Expr::binary(
        path,
        BinaryOperator::Like,
        value(Value::String(format!("{prefix}%"))),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use query::{dialect::MySql, renderer::to_sql};

    fn scope(folder: &str, only_direct_children: bool) -> ListingScope {
        ListingScope {
            folder: Some(folder.to_string()),
            only_direct_children,
        }
    }

    #[test]
    fn test_direct_children() {
        let expr = scope_condition(&scope("/cars", true), "object_CAR").unwrap();
        assert_eq!(to_sql(&expr, &MySql), "`object_CAR`.`path` = '/cars/'");
    }

    #[test]
    fn test_subtree() {
        let expr = scope_condition(&scope("/cars/", false), "assets").unwrap();
        assert_eq!(to_sql(&expr, &MySql), "`assets`.`path` LIKE '/cars/%'");
    }

    #[test]
    fn test_root_and_missing_folder() {
        assert!(scope_condition(&scope("/", false), "assets").is_none());
        assert!(scope_condition(&scope("/", true), "assets").is_some());
        assert!(scope_condition(&ListingScope::default(), "assets").is_none());
    }
}
