use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Separator between the two endpoint node ids of an edge id.
pub const EDGE_SEPARATOR: char = '$';

/// Substring that marks a node as a fog node for filter matching.
pub const FOG_MARKER: &str = "fog";

/// Filter type every fog node is matched under.
pub const FOG_NODE_TYPE: &str = "fognode";

const TYPED_PREFIXES: [&str; 2] = ["taxi", "traffic"];

/// Opaque identifier of a node or an edge.
///
/// Edge ids encode their endpoints as `<source>$<target>`.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the id carries the edge separator.
    pub fn is_edge(&self) -> bool {
        is_edge_id(&self.0)
    }

    pub fn kind(&self) -> ElementKind {
        if self.is_edge() {
            ElementKind::Edge
        } else {
            ElementKind::Node
        }
    }

    /// Endpoint node ids of a well-formed edge id.
    pub fn endpoints(&self) -> Option<(&str, &str)> {
        split_edge_id(&self.0)
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ElementId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Borrow<str> for ElementId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ElementId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

pub fn is_edge_id(id: &str) -> bool {
    id.contains(EDGE_SEPARATOR)
}

/// Split `<source>$<target>` into its endpoints.
///
/// Returns `None` when the separator is missing, repeated, or either half is empty.
pub fn split_edge_id(id: &str) -> Option<(&str, &str)> {
    let (source, target) = id.split_once(EDGE_SEPARATOR)?;
    if source.is_empty() || target.is_empty() || target.contains(EDGE_SEPARATOR) {
        return None;
    }
    Some((source, target))
}

/// Whether an element is a node or an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Node,
    Edge,
}

/// Type tag derived from an element id.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct ElementType(String);

impl ElementType {
    /// Classify an id (or a node class name) by its prefix.
    ///
    /// `taxi*` and `traffic*` collapse to their prefix; anything else is the
    /// whole id lowercased.
    pub fn of(id: &str) -> Self {
        for prefix in TYPED_PREFIXES {
            if id.starts_with(prefix) {
                return Self(prefix.to_string());
            }
        }
        Self(id.to_lowercase())
    }

    /// Type used when matching against the checkbox filter.
    pub fn for_filter(id: &str) -> Self {
        if id.contains(FOG_MARKER) {
            Self(FOG_NODE_TYPE.to_string())
        } else {
            Self::of(id)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Discrete key of a topology slice.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(transparent)]
pub struct TimeKey(pub u64);

impl fmt::Display for TimeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TimeKey {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u64>().map(TimeKey)
    }
}
