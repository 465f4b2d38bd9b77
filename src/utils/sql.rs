use sea_orm::{ColumnTrait, Condition, sea_query::LikeExpr};

/// 转义 LIKE 模式中的通配符
pub fn escape_like_pattern(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// `column LIKE '%term%' ESCAPE '\'`，term 中的通配符按字面匹配
pub fn like_contains<C: ColumnTrait>(column: C, term: &str) -> Condition {
    let pattern = LikeExpr::new(format!("%{}%", escape_like_pattern(term))).escape('\\');
    Condition::all().add(column.like(pattern))
}
