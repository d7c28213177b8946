//! Visible element derivation from the type filter and the time slice.

use leaf_runtime::LayoutMode;
use leaf_schema::{ElementId, ElementType, Position, TimeKey, TopologySlice, TopologyStore};
use serde::Serialize;

use crate::measurements::SelectableSet;

/// Active type checkboxes and the selected time slice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterState {
    /// Ordered set; empty means no filtering.
    pub active_types: Vec<ElementType>,
    pub time: TimeKey,
}

impl FilterState {
    pub fn new(time: TimeKey) -> Self {
        Self {
            active_types: Vec::new(),
            time,
        }
    }

    pub fn set_types(&mut self, types: &[ElementType]) {
        self.active_types.clear();
        for ty in types {
            if !self.active_types.contains(ty) {
                self.active_types.push(ty.clone());
            }
        }
    }

    pub fn accepts(&self, ty: &ElementType) -> bool {
        self.active_types.is_empty() || self.active_types.contains(ty)
    }
}

/// Resolve `requested` to a key present in `topology`, falling back to the
/// first slice.
pub fn resolve_time_key(topology: &dyn TopologyStore, requested: TimeKey) -> TimeKey {
    if topology.slice(requested).is_ok() {
        return requested;
    }
    match topology.time_keys().first() {
        Some(first) => {
            tracing::warn!(
                target: "leaf::topology",
                requested = %requested,
                fallback = %first,
                "time_key.unknown"
            );
            *first
        }
        None => requested,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisibleNode {
    pub id: ElementId,
    pub label: String,
    pub classes: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    pub selectable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisibleEdge {
    pub id: ElementId,
    pub source: ElementId,
    pub target: ElementId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classes: Option<String>,
    pub selectable: bool,
}

/// Elements handed to the graph renderer.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VisibleElements {
    pub time: TimeKey,
    pub nodes: Vec<VisibleNode>,
    pub edges: Vec<VisibleEdge>,
}

impl VisibleElements {
    pub fn empty(time: TimeKey) -> Self {
        Self {
            time,
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len() + self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.iter().any(|node| node.id.as_str() == id)
            || self.edges.iter().any(|edge| edge.id.as_str() == id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &ElementId> {
        self.nodes
            .iter()
            .map(|node| &node.id)
            .chain(self.edges.iter().map(|edge| &edge.id))
    }
}

/// Apply the type filter to one slice.
///
/// An edge survives only when both endpoints are in the slice and both pass
/// the filter.
pub fn derive_visible(
    filter: &FilterState,
    slice: &TopologySlice,
    selectable: &SelectableSet,
    layout: LayoutMode,
) -> VisibleElements {
    let keep_positions = layout.is_preset();
    let nodes = slice
        .nodes()
        .iter()
        .filter(|node| filter.accepts(&node.filter_type()))
        .map(|node| VisibleNode {
            id: node.id.clone(),
            label: node.id.to_string(),
            classes: node.element_type().to_string(),
            position: node.position.filter(|_| keep_positions),
            selectable: selectable.contains(node.id.as_str()),
        })
        .collect();

    let endpoint_visible = |id: &ElementId| {
        slice
            .node(id.as_str())
            .is_some_and(|node| filter.accepts(&node.filter_type()))
    };
    let edges = slice
        .edges()
        .iter()
        .filter(|edge| endpoint_visible(&edge.source) && endpoint_visible(&edge.target))
        .map(|edge| VisibleEdge {
            id: edge.id.clone(),
            source: edge.source.clone(),
            target: edge.target.clone(),
            classes: edge.class.clone(),
            selectable: selectable.contains(edge.id.as_str()),
        })
        .collect();

    VisibleElements {
        time: slice.time(),
        nodes,
        edges,
    }
}

/// Checkbox options for a slice: distinct node class types in order of appearance.
pub fn available_filter_types(slice: &TopologySlice) -> Vec<ElementType> {
    let mut types: Vec<ElementType> = Vec::new();
    for node in slice.nodes() {
        let ty = match &node.class {
            Some(class) => ElementType::for_filter(class),
            None => node.filter_type(),
        };
        if !types.contains(&ty) {
            types.push(ty);
        }
    }
    types
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineMark {
    pub time: TimeKey,
    /// Empty for unlabelled ticks.
    pub label: String,
}

/// Slider marks: the first key, every `stride`-th key and the last key are labelled.
pub fn timeline_marks(keys: &[TimeKey], stride: usize) -> Vec<TimelineMark> {
    let stride = stride.max(1);
    let last = keys.len().saturating_sub(1);
    keys.iter()
        .enumerate()
        .map(|(index, key)| TimelineMark {
            time: *key,
            label: if index % stride == 0 || index == last {
                key.to_string()
            } else {
                String::new()
            },
        })
        .collect()
}

pub fn slider_caption(time: TimeKey) -> String {
    format!("Current selected timeslot: \"{time}\"")
}
