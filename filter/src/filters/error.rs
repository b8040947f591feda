//! Filter compilation errors

use thiserror::Error;

use super::types::Path;

#[derive(Error, Debug)]
pub enum FilterError {
    /// A recognized rule whose payload cannot produce a correct clause
    #[error("Malformed {rule_type} rule at {path}: {reason}")]
    MalformedRule {
        path: Path,
        rule_type: &'static str,
        reason: String,
    },

    #[error("Empty key in filter below {path}")]
    EmptyPathSegment { path: Path },

    #[error("Field expression must not be empty")]
    EmptyField,

    #[error("Invalid filter JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Filter JSON exceeds maximum size of {max} bytes")]
    TooLarge { max: usize },

    #[error("Filter contains more than {max} rules")]
    TooManyRules { max: usize },

    #[error("Filter nesting exceeds maximum depth of {max}")]
    TooDeep { max: usize },
}

impl FilterError {
    pub fn malformed(path: &Path, rule_type: &'static str, reason: impl Into<String>) -> Self {
        Self::MalformedRule {
            path: path.clone(),
            rule_type,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FilterError>;
