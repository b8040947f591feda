//! Filter tree compilation
//!
//! [`FilterTree`] extracts its rules once; [`FilterTree::compile`] renders them
//! into a single conjunction with ordered bind parameters.

use serde::Serialize;

use super::builder::{build_containment_filter, build_range_filter};
use super::error::{FilterError, Result};
use super::extract::extract_rules_with_limits;
use super::types::{ExtractedRule, FilterNode, Rule, SqlParam, SqlParams};
use crate::core::config::{CompilerConfig, FilterLimits};
use crate::sql::{PostgresDialect, SqlDialect};

/// Compiled WHERE-clause fragment and its bind parameters
///
/// An empty `sql` means no rule produced a condition. Whether that matches every
/// row or is an error is the caller's decision.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledFilter {
    pub sql: String,
    pub params: Vec<SqlParam>,
}

impl CompiledFilter {
    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }

    pub fn into_parts(self) -> (String, Vec<SqlParam>) {
        (self.sql, self.params)
    }
}

/// An immutable filter specification with its extracted rules
#[derive(Debug, Clone)]
pub struct FilterTree {
    tree: FilterNode,
    rules: Vec<ExtractedRule>,
}

impl FilterTree {
    pub fn new(tree: FilterNode) -> Result<Self> {
        Self::with_limits(tree, &FilterLimits::default())
    }

    pub fn with_limits(tree: FilterNode, limits: &FilterLimits) -> Result<Self> {
        let rules = extract_rules_with_limits(&tree, limits)?;
        tracing::trace!(rules = rules.len(), "Extracted filter rules");
        Ok(Self { tree, rules })
    }

    pub fn tree(&self) -> &FilterNode {
        &self.tree
    }

    pub fn rules(&self) -> &[ExtractedRule] {
        &self.rules
    }

    /// Compile the rules against the JSON column expression `field`
    pub fn compile(&self, field: &str, config: &CompilerConfig) -> Result<CompiledFilter> {
        compile_rules(&self.rules, field, config)
    }
}

/// Compile extracted rules into one ` AND `-joined fragment
///
/// Unknown rule types are skipped. A containment rule with several candidates is
/// parenthesized so its ` OR ` stays inside the conjunction.
pub fn compile_rules(
    rules: &[ExtractedRule],
    field: &str,
    config: &CompilerConfig,
) -> Result<CompiledFilter> {
    if field.trim().is_empty() {
        return Err(FilterError::EmptyField);
    }

    let dialect: &dyn SqlDialect = &PostgresDialect;
    let mut params = SqlParams::new(config.placeholder);
    let mut fragments = Vec::with_capacity(rules.len());

    for ExtractedRule { path, rule } in rules {
        let sql = match rule {
            Rule::IntRange(range) => {
                build_range_filter(field, path, range, dialect, &mut params)?
            }
            Rule::Containment(containment) => {
                let sql = build_containment_filter(
                    field,
                    path,
                    containment,
                    config.stringify_candidates,
                    dialect,
                    &mut params,
                )?;
                if containment.contains.len() > 1 {
                    format!("({})", sql)
                } else {
                    sql
                }
            }
            Rule::Unknown { rule_type } => {
                tracing::debug!(path = %path, rule_type = %rule_type, "Skipping unrecognized filter rule");
                continue;
            }
        };
        tracing::trace!(path = %path, sql = %sql, "Compiled filter rule");
        fragments.push(sql);
    }

    let compiled = CompiledFilter {
        sql: fragments.join(" AND "),
        params: params.into_values(),
    };
    tracing::trace!(
        dialect = dialect.name(),
        fragments = fragments.len(),
        params = compiled.params.len(),
        "Compiled filter"
    );
    Ok(compiled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::PlaceholderStyle;
    use serde_json::json;

    fn text(s: &str) -> SqlParam {
        SqlParam::Text(s.to_string())
    }

    fn compile(tree: FilterNode, config: &CompilerConfig) -> CompiledFilter {
        FilterTree::new(tree).unwrap().compile("data", config).unwrap()
    }

    fn count_placeholders(sql: &str, style: PlaceholderStyle) -> usize {
        match style {
            PlaceholderStyle::Qmark => sql.matches('?').count(),
            PlaceholderStyle::Dollar => sql.matches('$').count(),
            PlaceholderStyle::Format => sql.matches("%s").count(),
        }
    }

    #[test]
    fn round_trip_with_unknown_rule_and_distraction() {
        let tree = json!({
            "testing": {"_rule_type": "intrange", "min": 1, "max": 5},
            "alpha": {"beta": {"gamma": {"delta": {"_rule_type": "unknown"}}, "distraction": []}}
        });
        let compiled = compile(tree, &CompilerConfig::default());

        assert_eq!(compiled.sql, "(data->>?)::int <= ? AND (data->>?)::int >= ?");
        assert_eq!(
            compiled.params,
            vec![text("testing"), SqlParam::Int(5), text("testing"), SqlParam::Int(1)]
        );
    }

    #[test]
    fn only_unknown_rules_compile_to_empty() {
        let tree = json!({"alpha": {"beta": {"gamma": {"delta": {"_rule_type": "sort of a cheat"}}, "distraction": []}}});
        let compiled = compile(tree, &CompilerConfig::default());

        assert!(compiled.is_empty());
        assert!(compiled.params.is_empty());
    }

    #[test]
    fn empty_tree_compiles_to_empty() {
        let compiled = compile(json!({}), &CompilerConfig::default());
        assert_eq!(compiled.into_parts(), (String::new(), Vec::new()));
    }

    #[test]
    fn two_rules_are_conjoined_in_order() {
        let tree = json!({
            "age": {"_rule_type": "intrange", "min": 18},
            "profile": {"country": {"_rule_type": "containment", "contains": ["NZ"]}}
        });
        let compiled = compile(tree, &CompilerConfig::default());

        assert_eq!(compiled.sql, "(data->>?)::int >= ? AND data @> ?");
        assert_eq!(
            compiled.params,
            vec![
                text("age"),
                SqlParam::Int(18),
                SqlParam::Json(json!({"profile": {"country": "NZ"}})),
            ]
        );
    }

    #[test]
    fn multi_candidate_containment_is_parenthesized() {
        let tree = json!({
            "a": {"b": {"_rule_type": "containment", "contains": ["v1", "v2"]}},
            "n": {"_rule_type": "intrange", "max": 3}
        });
        let compiled = compile(tree, &CompilerConfig::default());

        assert_eq!(
            compiled.sql,
            "(data @> ? OR data @> ?) AND (data->>?)::int <= ?"
        );
        assert_eq!(compiled.params.len(), 4);
    }

    #[test]
    fn dollar_placeholders_continue_across_fragments() {
        let config = CompilerConfig {
            placeholder: PlaceholderStyle::Dollar,
            ..CompilerConfig::default()
        };
        let tree = json!({
            "a": {"_rule_type": "intrange", "min": 1, "max": 2},
            "b": {"_rule_type": "containment", "contains": [1]}
        });
        let compiled = compile(tree, &config);

        assert_eq!(
            compiled.sql,
            "(data->>$1)::int <= $2 AND (data->>$3)::int >= $4 AND data @> $5"
        );
    }

    #[test]
    fn format_placeholders() {
        let config = CompilerConfig {
            placeholder: PlaceholderStyle::Format,
            ..CompilerConfig::default()
        };
        let tree = json!({"a": {"_rule_type": "intrange", "min": 1}});
        let compiled = compile(tree, &config);

        assert_eq!(compiled.sql, "(data->>%s)::int >= %s");
    }

    #[test]
    fn nested_containment_binds_full_path_document() {
        let tree = json!({"a": {"b": {"_rule_type": "containment", "contains": ["v"]}}});
        let compiled = compile(tree, &CompilerConfig::default());

        assert_eq!(compiled.sql, "data @> ?");
        assert_eq!(
            compiled.params,
            vec![SqlParam::Json(json!({"a": {"b": "v"}}))]
        );
    }

    #[test]
    fn placeholder_count_matches_params() {
        let tree = json!({
            "a": {"b": {"c": {"_rule_type": "intrange", "min": 1, "max": 5}}},
            "d": {"_rule_type": "containment", "contains": ["x", 2, {"y": 1}]},
            "e": {"f": {"_rule_type": "intrange", "max": 0}},
            "g": {"_rule_type": "later"}
        });
        for placeholder in [
            PlaceholderStyle::Qmark,
            PlaceholderStyle::Dollar,
            PlaceholderStyle::Format,
        ] {
            let config = CompilerConfig {
                placeholder,
                ..CompilerConfig::default()
            };
            let compiled = compile(tree.clone(), &config);
            assert_eq!(
                count_placeholders(&compiled.sql, placeholder),
                compiled.params.len()
            );
        }
    }

    #[test]
    fn compile_is_idempotent() {
        let tree = FilterTree::new(json!({
            "a": {"_rule_type": "intrange", "min": 1, "max": 5},
            "b": {"_rule_type": "containment", "contains": ["x", "y"]}
        }))
        .unwrap();
        let config = CompilerConfig::default();

        let first = tree.compile("data", &config).unwrap();
        let second = tree.compile("data", &config).unwrap();
        assert_eq!(first, second);
        assert_eq!(tree.rules().len(), 2);
    }

    #[test]
    fn field_expression_is_used_verbatim() {
        let tree = FilterTree::new(json!({"a": {"_rule_type": "intrange", "min": 1}})).unwrap();
        let compiled = tree
            .compile(r#""app_model"."data""#, &CompilerConfig::default())
            .unwrap();

        assert_eq!(compiled.sql, r#"("app_model"."data"->>?)::int >= ?"#);
    }

    #[test]
    fn empty_field_is_rejected() {
        let tree = FilterTree::new(json!({"a": {"_rule_type": "intrange", "min": 1}})).unwrap();
        let err = tree.compile("  ", &CompilerConfig::default()).unwrap_err();
        assert!(matches!(err, FilterError::EmptyField));
    }

    #[test]
    fn malformed_rule_fails_tree_construction() {
        let result = FilterTree::new(json!({"a": {"_rule_type": "intrange"}}));
        assert!(matches!(result, Err(FilterError::MalformedRule { .. })));
    }
}
