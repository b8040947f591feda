//! PostgreSQL SQL dialect implementation

use super::SqlDialect;

/// PostgreSQL SQL dialect (JSONB operators)
pub struct PostgresDialect;

impl SqlDialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn json_field(&self, expr: &str, key: &str) -> String {
        format!("{}->{}", expr, key)
    }

    fn json_field_text(&self, expr: &str, key: &str) -> String {
        format!("{}->>{}", expr, key)
    }

    fn cast_to_int(&self, expr: &str) -> String {
        format!("({})::int", expr)
    }

    fn json_contains(&self, col: &str, doc: &str) -> String {
        format!("{} @> {}", col, doc)
    }
}
