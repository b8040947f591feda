//! SQL abstraction layer
//!
//! The filter compiler only needs four JSON operations from the database: field
//! access, field access as text, an integer cast and document containment. They are
//! rendered through [`SqlDialect`]; PostgreSQL JSONB is the only implementation.
//! Placeholder syntax is chosen separately with [`PlaceholderStyle`] because it
//! depends on the driver, not the database.

mod dialect;
mod postgres_dialect;

pub use dialect::SqlDialect;
pub use postgres_dialect::PostgresDialect;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Positional placeholder syntax used in compiled SQL
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceholderStyle {
    /// `?` (DB-API `qmark` and JDBC-style drivers)
    #[default]
    Qmark,
    /// `$1`, `$2`, ... (PostgreSQL wire protocol, sqlx)
    Dollar,
    /// `%s` (psycopg and other DB-API `format` drivers)
    Format,
}

impl PlaceholderStyle {
    /// Render the placeholder for a 1-based parameter index
    pub fn render(&self, index: usize) -> String {
        match self {
            PlaceholderStyle::Qmark => "?".to_string(),
            PlaceholderStyle::Dollar => format!("${}", index),
            PlaceholderStyle::Format => "%s".to_string(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PlaceholderStyle::Qmark => "qmark",
            PlaceholderStyle::Dollar => "dollar",
            PlaceholderStyle::Format => "format",
        }
    }
}

impl fmt::Display for PlaceholderStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
