//! SQL dialect trait
//!
//! This trait defines the interface for generating database-specific JSON syntax.

/// SQL dialect trait for generating database-specific JSON expressions
///
/// Every method receives already-rendered SQL: `expr` is a column or a previously
/// built expression, `key` / `doc` are placeholders obtained from
/// [`SqlParams::bind`](crate::filters::SqlParams::bind). Dialects never see values.
pub trait SqlDialect: Send + Sync {
    /// Get the dialect name
    fn name(&self) -> &'static str;

    /// Get a JSON object field, keeping it as JSON
    ///
    /// - PostgreSQL: `expr->key`
    fn json_field(&self, expr: &str, key: &str) -> String;

    /// Get a JSON object field as text
    ///
    /// - PostgreSQL: `expr->>key`
    fn json_field_text(&self, expr: &str, key: &str) -> String;

    /// Cast a text expression to an integer
    ///
    /// - PostgreSQL: `(expr)::int`
    fn cast_to_int(&self, expr: &str) -> String;

    /// Test whether the JSON column contains the bound document
    ///
    /// Containment is anchored at the document root: the bound document mirrors
    /// the full path from the column root down to the candidate.
    ///
    /// - PostgreSQL: `col @> doc`
    fn json_contains(&self, col: &str, doc: &str) -> String;
}
