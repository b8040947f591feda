//! Filter type definitions
//!
//! Defines the decoded rule types, JSON paths and the bind-parameter accumulator
//! shared by every fragment builder.

use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Number, Value};

use super::error::{FilterError, Result};
use crate::sql::PlaceholderStyle;

/// Reserved key marking an object as a rule
pub const RULE_TYPE_KEY: &str = "_rule_type";

/// Tag of the integer range rule
pub const RULE_INTRANGE: &str = "intrange";

/// Tag of the containment rule
pub const RULE_CONTAINMENT: &str = "containment";

/// A filter specification node: objects, arrays, strings and numbers
pub type FilterNode = Value;

/// Location of a rule inside the filter tree, and of the constrained value inside
/// the JSON column
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Path(Vec<String>);

impl Path {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Return a new path extended by one segment
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = Vec::with_capacity(self.0.len() + 1);
        segments.extend(self.0.iter().cloned());
        segments.push(segment.into());
        Self(segments)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for Path {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            write!(f, "<root>")
        } else {
            write!(f, "{}", self.0.join("."))
        }
    }
}

/// Payload of an `intrange` rule. `null` bounds count as absent.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RangeRule {
    #[serde(default)]
    pub min: Option<Number>,
    #[serde(default)]
    pub max: Option<Number>,
}

/// Payload of a `containment` rule
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ContainmentRule {
    pub contains: Vec<Value>,
}

/// A rule decoded from a tagged filter node
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    IntRange(RangeRule),
    Containment(ContainmentRule),
    /// Tag not handled by this compiler; compiles to nothing
    Unknown { rule_type: String },
}

impl Rule {
    /// Decode a tagged node found at `path`
    ///
    /// Unknown tags decode to [`Rule::Unknown`]. Recognized tags with an unusable
    /// payload fail with [`FilterError::MalformedRule`].
    pub fn decode(path: &Path, node: &FilterNode) -> Result<Self> {
        let tag = match node.get(RULE_TYPE_KEY) {
            Some(Value::String(tag)) => tag.as_str(),
            Some(other) => {
                return Ok(Rule::Unknown {
                    rule_type: other.to_string(),
                });
            }
            None => {
                return Ok(Rule::Unknown {
                    rule_type: String::new(),
                });
            }
        };

        match tag {
            RULE_INTRANGE => {
                let range = RangeRule::deserialize(node)
                    .map_err(|e| FilterError::malformed(path, RULE_INTRANGE, e.to_string()))?;
                if range.min.is_none() && range.max.is_none() {
                    return Err(FilterError::malformed(
                        path,
                        RULE_INTRANGE,
                        "requires at least one of min or max",
                    ));
                }
                if path.is_empty() {
                    return Err(FilterError::malformed(
                        path,
                        RULE_INTRANGE,
                        "cannot constrain the whole document, nest it under a key",
                    ));
                }
                Ok(Rule::IntRange(range))
            }
            RULE_CONTAINMENT => {
                let containment = ContainmentRule::deserialize(node).map_err(|e| {
                    FilterError::malformed(path, RULE_CONTAINMENT, e.to_string())
                })?;
                if containment.contains.is_empty() {
                    return Err(FilterError::malformed(
                        path,
                        RULE_CONTAINMENT,
                        "contains must list at least one candidate",
                    ));
                }
                Ok(Rule::Containment(containment))
            }
            other => Ok(Rule::Unknown {
                rule_type: other.to_string(),
            }),
        }
    }

    pub fn rule_type(&self) -> &str {
        match self {
            Rule::IntRange(_) => RULE_INTRANGE,
            Rule::Containment(_) => RULE_CONTAINMENT,
            Rule::Unknown { rule_type } => rule_type,
        }
    }
}

impl Serialize for Rule {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry(RULE_TYPE_KEY, self.rule_type())?;
        match self {
            Rule::IntRange(range) => {
                if let Some(min) = &range.min {
                    map.serialize_entry("min", min)?;
                }
                if let Some(max) = &range.max {
                    map.serialize_entry("max", max)?;
                }
            }
            Rule::Containment(containment) => {
                map.serialize_entry("contains", &containment.contains)?;
            }
            Rule::Unknown { .. } => {}
        }
        map.end()
    }
}

/// A rule together with its location in the tree
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractedRule {
    pub path: Path,
    pub rule: Rule,
}

/// A single bind value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SqlParam {
    Text(String),
    Int(i64),
    Float(f64),
    /// A JSON document, sent as JSON text or a native JSON/JSONB value
    Json(Value),
}

impl SqlParam {
    /// Convert a JSON number into an integer or float parameter
    pub fn from_number(n: &Number) -> Option<Self> {
        n.as_i64()
            .map(SqlParam::Int)
            .or_else(|| n.as_f64().map(SqlParam::Float))
    }
}

impl fmt::Display for SqlParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlParam::Text(s) => write!(f, "{}", s),
            SqlParam::Int(i) => write!(f, "{}", i),
            SqlParam::Float(x) => write!(f, "{}", x),
            SqlParam::Json(v) => write!(f, "{}", v),
        }
    }
}

impl From<&str> for SqlParam {
    fn from(s: &str) -> Self {
        SqlParam::Text(s.to_string())
    }
}

impl From<String> for SqlParam {
    fn from(s: String) -> Self {
        SqlParam::Text(s)
    }
}

impl From<i64> for SqlParam {
    fn from(i: i64) -> Self {
        SqlParam::Int(i)
    }
}

impl From<Value> for SqlParam {
    fn from(v: Value) -> Self {
        SqlParam::Json(v)
    }
}

/// Collects SQL parameters during query building (maintains insertion order)
///
/// [`bind`](Self::bind) is the only way builders obtain a placeholder, so the
/// placeholder count of the generated SQL always equals `values().len()`.
#[derive(Debug, Default)]
pub struct SqlParams {
    style: PlaceholderStyle,
    values: Vec<SqlParam>,
}

impl SqlParams {
    pub fn new(style: PlaceholderStyle) -> Self {
        Self {
            style,
            values: Vec::new(),
        }
    }

    /// Push a value and return the placeholder that refers to it
    pub fn bind(&mut self, value: impl Into<SqlParam>) -> String {
        self.values.push(value.into());
        self.style.render(self.values.len())
    }

    pub fn values(&self) -> &[SqlParam] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_values(self) -> Vec<SqlParam> {
        self.values
    }
}
