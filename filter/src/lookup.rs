//! `jsonb` lookup adapter
//!
//! Connects a host query builder to the filter compiler: the host supplies the
//! column expression (left-hand side) and the decoded filter value (right-hand
//! side) and receives SQL plus ordered bind values. [`bind_params`] applies those
//! values to a sqlx PostgreSQL query.

use sqlx::Postgres;
use sqlx::postgres::PgArguments;
use sqlx::query::Query;
use sqlx::types::Json;

use crate::core::config::CompilerConfig;
use crate::filters::{
    FilterNode, Result, SqlParam, compile_rules, extract_rules_with_limits, parse_filter,
};
use crate::sql::PlaceholderStyle;

/// Name under which hosts register the lookup (`data__jsonb=...`)
pub const LOOKUP_NAME: &str = "jsonb";

#[derive(Debug, Clone, Default)]
pub struct JsonbLookup {
    config: CompilerConfig,
}

impl JsonbLookup {
    pub fn new(config: CompilerConfig) -> Self {
        Self { config }
    }

    /// Lookup rendering `$n` placeholders, as expected by [`bind_params`]
    pub fn for_sqlx() -> Self {
        Self::new(CompilerConfig {
            placeholder: PlaceholderStyle::Dollar,
            ..CompilerConfig::default()
        })
    }

    pub fn name(&self) -> &'static str {
        LOOKUP_NAME
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Render `lhs` filtered by the filter tree `rhs`
    pub fn as_sql(&self, lhs: &str, rhs: &FilterNode) -> Result<(String, Vec<SqlParam>)> {
        let rules = extract_rules_with_limits(rhs, &self.config.limits)?;
        Ok(compile_rules(&rules, lhs, &self.config)?.into_parts())
    }

    /// Same as [`as_sql`](Self::as_sql) for a filter still in JSON text form
    pub fn as_sql_json(&self, lhs: &str, rhs: &str) -> Result<(String, Vec<SqlParam>)> {
        let tree = parse_filter(rhs, &self.config.limits)?;
        Ok(tree.compile(lhs, &self.config)?.into_parts())
    }
}

/// Bind compiled parameters onto a PostgreSQL query in order
///
/// Text binds as `text`, integers as `int8`, floats as `float8` and JSON documents
/// as `jsonb`, which is what `->`, `->>`, the integer comparison and `@>` expect.
pub fn bind_params<'q>(
    mut query: Query<'q, Postgres, PgArguments>,
    params: &'q [SqlParam],
) -> Query<'q, Postgres, PgArguments> {
    for param in params {
        query = match param {
            SqlParam::Text(s) => query.bind(s.as_str()),
            SqlParam::Int(i) => query.bind(*i),
            SqlParam::Float(x) => query.bind(*x),
            SqlParam::Json(v) => query.bind(Json(v)),
        };
    }
    query
}
