//! JSON filter compiler
//!
//! Turns a nested filter document into a parameterized SQL condition over a JSON
//! column. Objects tagged with `_rule_type` are rules; everything else is path.
//!
//! ## Usage
//!
//! ```no_run
//! use jsonb_filter::filters::parse_filter;
//! use jsonb_filter::{CompilerConfig, FilterLimits};
//!
//! let json_str = r#"{"a": {"b": {"_rule_type": "containment", "contains": ["x"]}}}"#;
//! let tree = parse_filter(json_str, &FilterLimits::default()).unwrap();
//! let compiled = tree.compile("data", &CompilerConfig::default()).unwrap();
//! // compiled.sql == "data @> ?", compiled.params == [{"a":{"b":"x"}}]
//! ```

mod builder;
mod error;
mod extract;
mod parser;
mod tree;
mod types;

pub use builder::{
    build_containment_filter, build_int_traversal, build_range_filter, nest_under_path,
};
pub use error::{FilterError, Result};
pub use extract::{extract_rules, extract_rules_with_limits, is_rule};
pub use parser::parse_filter;
pub use tree::{CompiledFilter, FilterTree, compile_rules};
pub use types::{
    ContainmentRule, ExtractedRule, FilterNode, Path, RULE_CONTAINMENT, RULE_INTRANGE,
    RULE_TYPE_KEY, RangeRule, Rule, SqlParam, SqlParams,
};
