//! Compile nested JSON filter rules into parameterized SQL.
//!
//! A filter is a plain JSON tree. Any object carrying a `_rule_type` key is a rule
//! constraining the value found at the same path inside a JSON/JSONB column:
//!
//! ```
//! use jsonb_filter::{CompilerConfig, FilterTree};
//! use serde_json::json;
//!
//! let tree = FilterTree::new(json!({
//!     "a": {"b": {"c": {"_rule_type": "intrange", "min": 1, "max": 5}}}
//! }))
//! .unwrap();
//!
//! let compiled = tree.compile("data", &CompilerConfig::default()).unwrap();
//! assert_eq!(
//!     compiled.sql,
//!     "(data->?->?->>?)::int <= ? AND (data->?->?->>?)::int >= ?"
//! );
//! assert_eq!(compiled.params.len(), 8);
//! ```

pub mod app;
pub mod core;
pub mod filters;
pub mod lookup;
pub mod sql;

pub use crate::core::config::{CompilerConfig, FilterLimits};
pub use filters::{
    CompiledFilter, ExtractedRule, FilterError, FilterNode, FilterTree, Path, Rule, SqlParam,
    SqlParams,
};
pub use lookup::{JsonbLookup, LOOKUP_NAME};
pub use sql::{PlaceholderStyle, PostgresDialect, SqlDialect};
