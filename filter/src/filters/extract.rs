//! Rule extraction
//!
//! Walks a filter tree depth-first and collects every tagged node with the path
//! leading to it.

use serde_json::Value;

use super::error::{FilterError, Result};
use super::types::{ExtractedRule, FilterNode, Path, RULE_TYPE_KEY, Rule};
use crate::core::config::FilterLimits;

/// Returns true if the node is an object carrying the rule tag
pub fn is_rule(node: &FilterNode) -> bool {
    node.as_object()
        .is_some_and(|map| map.contains_key(RULE_TYPE_KEY))
}

/// Extract all rules from `node` with default limits
pub fn extract_rules(node: &FilterNode) -> Result<Vec<ExtractedRule>> {
    extract_rules_with_limits(node, &FilterLimits::default())
}

/// Extract all rules from `node`
///
/// Tagged objects are terminal: their contents are never searched for further
/// rules. Arrays and scalars yield nothing. Order follows the object key order at
/// every level. `max_rules` bounds recognized rules only; unknown rule types are
/// kept but never counted.
pub fn extract_rules_with_limits(
    node: &FilterNode,
    limits: &FilterLimits,
) -> Result<Vec<ExtractedRule>> {
    let mut rules = Vec::new();
    let mut recognized = 0;
    walk(node, &Path::root(), limits, &mut rules, &mut recognized)?;
    Ok(rules)
}

fn walk(
    node: &FilterNode,
    path: &Path,
    limits: &FilterLimits,
    rules: &mut Vec<ExtractedRule>,
    recognized: &mut usize,
) -> Result<()> {
    if is_rule(node) {
        let rule = Rule::decode(path, node)?;
        if !matches!(rule, Rule::Unknown { .. }) {
            if *recognized >= limits.max_rules {
                return Err(FilterError::TooManyRules {
                    max: limits.max_rules,
                });
            }
            *recognized += 1;
        }
        rules.push(ExtractedRule {
            path: path.clone(),
            rule,
        });
        return Ok(());
    }

    let Value::Object(map) = node else {
        return Ok(());
    };

    if path.len() >= limits.max_depth {
        return Err(FilterError::TooDeep {
            max: limits.max_depth,
        });
    }

    for (key, value) in map {
        if key.is_empty() {
            return Err(FilterError::EmptyPathSegment { path: path.clone() });
        }
        walk(value, &path.child(key.as_str()), limits, rules, recognized)?;
    }
    Ok(())
}
