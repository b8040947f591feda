//! Filter parsing
//!
//! Parses JSON filter documents into a [`FilterTree`] with size validation.

use super::error::{FilterError, Result};
use super::tree::FilterTree;
use super::types::FilterNode;
use crate::core::config::FilterLimits;

/// Parse a filter from JSON text
///
/// Validates JSON size, parses into a tree, then extracts and decodes its rules.
pub fn parse_filter(json_str: &str, limits: &FilterLimits) -> Result<FilterTree> {
    if json_str.len() > limits.max_filter_bytes {
        return Err(FilterError::TooLarge {
            max: limits.max_filter_bytes,
        });
    }

    let tree: FilterNode = serde_json::from_str(json_str)?;
    FilterTree::with_limits(tree, limits)
}
