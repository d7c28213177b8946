use std::collections::BTreeMap;
use std::{io, path::PathBuf};

use ahash::AHashMap;
use serde::Serialize;
use thiserror::Error;

use crate::ids::{split_edge_id, ElementId, ElementType, TimeKey};

/// Stored layout coordinates of a node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopologyNode {
    pub id: ElementId,
    /// Class name as written in the infrastructure file.
    pub class: Option<String>,
    pub position: Option<Position>,
}

impl TopologyNode {
    pub fn new(id: impl Into<ElementId>) -> Self {
        Self {
            id: id.into(),
            class: None,
            position: None,
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.position = Some(Position { x, y });
        self
    }

    pub fn element_type(&self) -> ElementType {
        ElementType::of(self.id.as_str())
    }

    pub fn filter_type(&self) -> ElementType {
        ElementType::for_filter(self.id.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopologyEdge {
    pub id: ElementId,
    pub source: ElementId,
    pub target: ElementId,
    pub class: Option<String>,
}

/// Immutable graph snapshot for one time key.
#[derive(Debug, Clone)]
pub struct TopologySlice {
    time: TimeKey,
    nodes: Vec<TopologyNode>,
    edges: Vec<TopologyEdge>,
    node_index: AHashMap<ElementId, usize>,
}

impl TopologySlice {
    /// Build a slice, rejecting duplicate nodes and edges that do not resolve
    /// to two nodes of the same slice.
    pub fn new(
        time: TimeKey,
        nodes: Vec<TopologyNode>,
        edge_specs: Vec<(ElementId, Option<String>)>,
    ) -> Result<Self, TopologyError> {
        let mut node_index = AHashMap::with_capacity(nodes.len());
        for (idx, node) in nodes.iter().enumerate() {
            if node_index.insert(node.id.clone(), idx).is_some() {
                return Err(TopologyError::DuplicateNode {
                    time,
                    id: node.id.to_string(),
                });
            }
        }

        let mut edges = Vec::with_capacity(edge_specs.len());
        for (id, class) in edge_specs {
            let Some((source, target)) = split_edge_id(id.as_str()) else {
                return Err(TopologyError::MalformedEdgeId {
                    time,
                    id: id.to_string(),
                });
            };
            for endpoint in [source, target] {
                if !node_index.contains_key(endpoint) {
                    return Err(TopologyError::DanglingEdge {
                        time,
                        id: id.to_string(),
                        node: endpoint.to_string(),
                    });
                }
            }
            edges.push(TopologyEdge {
                source: ElementId::from(source),
                target: ElementId::from(target),
                id,
                class,
            });
        }

        Ok(Self {
            time,
            nodes,
            edges,
            node_index,
        })
    }

    pub fn time(&self) -> TimeKey {
        self.time
    }

    pub fn nodes(&self) -> &[TopologyNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[TopologyEdge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&TopologyNode> {
        self.node_index.get(id).map(|&idx| &self.nodes[idx])
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    pub fn element_count(&self) -> usize {
        self.nodes.len() + self.edges.len()
    }
}

/// Read-only access to the time-sliced topology.
pub trait TopologyStore {
    /// Slice keys in ascending order.
    fn time_keys(&self) -> &[TimeKey];

    fn slice(&self, key: TimeKey) -> Result<&TopologySlice, TopologyError>;

    fn first_slice(&self) -> Option<&TopologySlice> {
        let key = *self.time_keys().first()?;
        self.slice(key).ok()
    }
}

/// In-memory topology store keyed by time.
#[derive(Debug, Clone)]
pub struct InfrastructureTimeline {
    keys: Vec<TimeKey>,
    slices: BTreeMap<TimeKey, TopologySlice>,
}

impl InfrastructureTimeline {
    pub fn from_slices(slices: Vec<TopologySlice>) -> Result<Self, TopologyError> {
        if slices.is_empty() {
            return Err(TopologyError::Empty);
        }
        let mut by_key = BTreeMap::new();
        for slice in slices {
            let key = slice.time();
            if by_key.insert(key, slice).is_some() {
                return Err(TopologyError::DuplicateTimeKey(key));
            }
        }
        Ok(Self {
            keys: by_key.keys().copied().collect(),
            slices: by_key,
        })
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TopologySlice> {
        self.slices.values()
    }
}

impl TopologyStore for InfrastructureTimeline {
    fn time_keys(&self) -> &[TimeKey] {
        &self.keys
    }

    fn slice(&self, key: TimeKey) -> Result<&TopologySlice, TopologyError> {
        self.slices
            .get(&key)
            .ok_or(TopologyError::UnknownTimeKey(key))
    }
}

#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("failed to parse infrastructure: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read infrastructure from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid time key '{0}'")]
    InvalidTimeKey(String),
    #[error("duplicate time key {0}")]
    DuplicateTimeKey(TimeKey),
    #[error("infrastructure contains no time slices")]
    Empty,
    #[error("unknown time key {0}")]
    UnknownTimeKey(TimeKey),
    #[error("duplicate node id '{id}' in slice {time}")]
    DuplicateNode { time: TimeKey, id: String },
    #[error("edge id '{id}' in slice {time} is not of the form <source>$<target>")]
    MalformedEdgeId { time: TimeKey, id: String },
    #[error("edge '{id}' in slice {time} references missing node '{node}'")]
    DanglingEdge {
        time: TimeKey,
        id: String,
        node: String,
    },
}
