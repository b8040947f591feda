//! SQL fragment builders
//!
//! Each builder renders one rule against a JSON column. Values, including path
//! segments, only reach the SQL text as placeholders from [`SqlParams::bind`].

use serde_json::{Map, Value};

use super::error::{FilterError, Result};
use super::types::{
    ContainmentRule, Path, RULE_CONTAINMENT, RULE_INTRANGE, RangeRule, SqlParam, SqlParams,
};
use crate::sql::SqlDialect;

/// Build the integer traversal `(<field>->k1->...->>kN)::int`
///
/// Binds every path segment, so each use of the traversal consumes its own copy
/// of the path parameters.
pub fn build_int_traversal(
    field: &str,
    path: &Path,
    dialect: &dyn SqlDialect,
    params: &mut SqlParams,
) -> Result<String> {
    let Some((last, init)) = path.segments().split_last() else {
        return Err(FilterError::malformed(
            path,
            RULE_INTRANGE,
            "cannot constrain the whole document, nest it under a key",
        ));
    };

    let mut expr = field.to_string();
    for segment in init {
        let key = params.bind(segment.as_str());
        expr = dialect.json_field(&expr, &key);
    }
    let key = params.bind(last.as_str());
    expr = dialect.json_field_text(&expr, &key);

    Ok(dialect.cast_to_int(&expr))
}

/// Build an `intrange` fragment
///
/// The upper bound check comes first: `<trav> <= max AND <trav> >= min`.
pub fn build_range_filter(
    field: &str,
    path: &Path,
    rule: &RangeRule,
    dialect: &dyn SqlDialect,
    params: &mut SqlParams,
) -> Result<String> {
    let bounds = [(&rule.max, "<="), (&rule.min, ">=")];

    let mut conditions = Vec::with_capacity(bounds.len());
    for (bound, op) in bounds {
        let Some(bound) = bound else {
            continue;
        };
        let value = SqlParam::from_number(bound).ok_or_else(|| {
            FilterError::malformed(path, RULE_INTRANGE, format!("unusable bound {}", bound))
        })?;
        let traversal = build_int_traversal(field, path, dialect, params)?;
        let placeholder = params.bind(value);
        conditions.push(format!("{} {} {}", traversal, op, placeholder));
    }

    if conditions.is_empty() {
        return Err(FilterError::malformed(
            path,
            RULE_INTRANGE,
            "requires at least one of min or max",
        ));
    }

    Ok(conditions.join(" AND "))
}

/// Build a `containment` fragment: one containment test per candidate, ORed
///
/// Each candidate is wrapped in objects mirroring `path`, so `["a", "b"]` and
/// `"x"` test `<field> @> {"a": {"b": "x"}}`.
pub fn build_containment_filter(
    field: &str,
    path: &Path,
    rule: &ContainmentRule,
    stringify_candidates: bool,
    dialect: &dyn SqlDialect,
    params: &mut SqlParams,
) -> Result<String> {
    if rule.contains.is_empty() {
        return Err(FilterError::malformed(
            path,
            RULE_CONTAINMENT,
            "contains must list at least one candidate",
        ));
    }

    let conditions: Vec<String> = rule
        .contains
        .iter()
        .map(|candidate| {
            let leaf = if stringify_candidates {
                Value::String(candidate_string(candidate))
            } else {
                candidate.clone()
            };
            let placeholder = params.bind(SqlParam::Json(nest_under_path(path, leaf)));
            dialect.json_contains(field, &placeholder)
        })
        .collect();

    Ok(conditions.join(" OR "))
}

/// Wrap `leaf` in single-key objects, innermost key last
pub fn nest_under_path(path: &Path, leaf: Value) -> Value {
    path.segments().iter().rev().fold(leaf, |inner, key| {
        let mut map = Map::with_capacity(1);
        map.insert(key.clone(), inner);
        Value::Object(map)
    })
}

fn candidate_string(candidate: &Value) -> String {
    match candidate {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
