//! Raw widget snapshots and their classification into a single trigger.
//!
//! A dashboard callback receives every widget value at once. Only one of them
//! actually changed; [`TriggerFrame::classify`] finds it by comparing against
//! the [`TriggerMemory`] of the previous call and applying the priority order
//! dropdown > search > select/deselect-all > edges > node tap > cleared.

use leaf_schema::{ElementId, ElementType, TimeKey};
use serde::Serialize;

use crate::events::{LayoutMode, ViewEvent};

/// Every trigger-relevant widget value as seen by one callback invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerFrame {
    pub selected_nodes: Option<Vec<ElementId>>,
    pub tapped_node: Option<ElementId>,
    pub selected_edges: Option<Vec<ElementId>>,
    pub select_clicks: u64,
    pub deselect_clicks: u64,
    pub search_clicks: u64,
    pub search_value: String,
    pub dropdown: Vec<String>,
    pub filter_clicks: u64,
    pub type_filter: Vec<ElementType>,
    pub time: TimeKey,
    pub layout: LayoutMode,
}

impl TriggerFrame {
    /// A frame carrying no user interaction at the given slice and layout.
    pub fn idle(time: TimeKey, layout: LayoutMode) -> Self {
        Self {
            selected_nodes: None,
            tapped_node: None,
            selected_edges: None,
            select_clicks: 0,
            deselect_clicks: 0,
            search_clicks: 0,
            search_value: String::new(),
            dropdown: Vec::new(),
            filter_clicks: 0,
            type_filter: Vec::new(),
            time,
            layout,
        }
    }

    /// Split the frame into ambient updates and the winning selection trigger.
    ///
    /// Ambient updates are only produced for values that differ from the
    /// memory. A frame whose only change is ambient never yields
    /// [`ViewEvent::NodeSelectionCleared`].
    pub fn classify(&self, memory: &TriggerMemory) -> FrameTriggers {
        let mut ambient = Vec::new();
        if self.type_filter != memory.type_filter {
            ambient.push(ViewEvent::TypeFilterChanged {
                types: self.type_filter.clone(),
            });
        }
        if memory.time != Some(self.time) {
            ambient.push(ViewEvent::TimeChanged { time: self.time });
        }
        if memory.layout != Some(self.layout) {
            ambient.push(ViewEvent::LayoutChanged {
                layout: self.layout,
            });
        }
        if self.filter_clicks > memory.filter_clicks {
            ambient.push(ViewEvent::FilterPanelToggled);
        }

        let selection = self.selection_trigger(memory, ambient.is_empty());
        FrameTriggers { ambient, selection }
    }

    fn selection_trigger(&self, memory: &TriggerMemory, quiet: bool) -> Option<ViewEvent> {
        if !self.dropdown.is_empty() && self.dropdown != memory.dropdown {
            return Some(ViewEvent::DropdownChanged {
                values: self.dropdown.clone(),
            });
        }
        if self.search_clicks > memory.search_clicks {
            return Some(ViewEvent::SearchSubmitted {
                query: self.search_value.clone(),
            });
        }
        if self.select_clicks > memory.select_clicks {
            return Some(ViewEvent::SelectAll);
        }
        if self.deselect_clicks > memory.deselect_clicks {
            return Some(ViewEvent::DeselectAll);
        }

        let nodes_empty = self
            .selected_nodes
            .as_ref()
            .map_or(true, |nodes| nodes.is_empty());
        let nodes_changed = self.selected_nodes != memory.selected_nodes;
        // The graph keeps reporting the last tapped node; it only counts when
        // the tap or the node selection moved.
        let tap_fresh =
            self.tapped_node.is_some() && (self.tapped_node != memory.tapped_node || nodes_changed);
        match &self.selected_edges {
            Some(edges) if !edges.is_empty() => {
                return Some(ViewEvent::EdgeSelection {
                    edge_ids: edges.clone(),
                });
            }
            Some(_) if nodes_empty && !nodes_changed && !tap_fresh && quiet => {
                return Some(ViewEvent::EdgeSelection {
                    edge_ids: Vec::new(),
                });
            }
            _ => {}
        }

        let nodes_cleared = matches!(&self.selected_nodes, Some(nodes) if nodes.is_empty());
        if nodes_cleared && (nodes_changed || quiet) {
            return Some(ViewEvent::NodeSelectionCleared);
        }
        if tap_fresh && !nodes_empty {
            if let Some(node_id) = &self.tapped_node {
                return Some(ViewEvent::NodeTap {
                    node_id: node_id.clone(),
                });
            }
        }
        if nodes_empty && quiet {
            return Some(ViewEvent::NodeSelectionCleared);
        }
        None
    }
}

/// Result of classifying a [`TriggerFrame`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameTriggers {
    /// Filter, slider, layout and drawer updates; applied before `selection`.
    pub ambient: Vec<ViewEvent>,
    pub selection: Option<ViewEvent>,
}

/// Last observed widget values and click counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TriggerMemory {
    pub dropdown: Vec<String>,
    pub search_clicks: u64,
    pub select_clicks: u64,
    pub deselect_clicks: u64,
    pub filter_clicks: u64,
    pub selected_nodes: Option<Vec<ElementId>>,
    pub tapped_node: Option<ElementId>,
    pub type_filter: Vec<ElementType>,
    pub time: Option<TimeKey>,
    pub layout: Option<LayoutMode>,
}

impl TriggerMemory {
    /// Record a frame so that the same values do not fire again.
    pub fn observe(&mut self, frame: &TriggerFrame) {
        self.dropdown = frame.dropdown.clone();
        self.search_clicks = self.search_clicks.max(frame.search_clicks);
        self.select_clicks = self.select_clicks.max(frame.select_clicks);
        self.deselect_clicks = self.deselect_clicks.max(frame.deselect_clicks);
        self.filter_clicks = self.filter_clicks.max(frame.filter_clicks);
        self.selected_nodes = frame.selected_nodes.clone();
        self.tapped_node = frame.tapped_node.clone();
        self.type_filter = frame.type_filter.clone();
        self.time = Some(frame.time);
        self.layout = Some(frame.layout);
    }
}
