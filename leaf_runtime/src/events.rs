use std::fmt;
use std::str::FromStr;

use leaf_schema::{ElementId, ElementType, TimeKey};
use serde::{Deserialize, Serialize};

/// Dropdown value that stands for every selectable element.
pub const SELECT_ALL_SENTINEL: &str = "select all";

/// A single user trigger handed to the reconciler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViewEvent {
    /// Multi-select dropdown value changed.
    DropdownChanged { values: Vec<String> },
    /// Free-text search submitted.
    SearchSubmitted { query: String },
    SelectAll,
    DeselectAll,
    /// Edges tapped or box-selected on the graph.
    EdgeSelection { edge_ids: Vec<ElementId> },
    NodeTap { node_id: ElementId },
    /// The graph reported an empty node selection.
    NodeSelectionCleared,
    TypeFilterChanged { types: Vec<ElementType> },
    TimeChanged { time: TimeKey },
    LayoutChanged { layout: LayoutMode },
    FilterPanelToggled,
}

impl ViewEvent {
    pub fn category(&self) -> TriggerCategory {
        match self {
            ViewEvent::DropdownChanged { .. } => TriggerCategory::Dropdown,
            ViewEvent::SearchSubmitted { .. } => TriggerCategory::Search,
            ViewEvent::SelectAll | ViewEvent::DeselectAll => TriggerCategory::SelectionToggle,
            ViewEvent::EdgeSelection { .. } => TriggerCategory::EdgeSelection,
            ViewEvent::NodeTap { .. } => TriggerCategory::NodeTap,
            ViewEvent::NodeSelectionCleared => TriggerCategory::NodeSelectionCleared,
            ViewEvent::TypeFilterChanged { .. }
            | ViewEvent::TimeChanged { .. }
            | ViewEvent::LayoutChanged { .. }
            | ViewEvent::FilterPanelToggled => TriggerCategory::Ambient,
        }
    }

    /// Selection triggers change the active set; ambient ones only re-derive the view.
    pub fn is_selection_trigger(&self) -> bool {
        self.category() != TriggerCategory::Ambient
    }
}

/// Trigger categories in reconciliation priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerCategory {
    Dropdown,
    Search,
    SelectionToggle,
    EdgeSelection,
    NodeTap,
    NodeSelectionCleared,
    Ambient,
}

impl TriggerCategory {
    pub fn key(self) -> &'static str {
        match self {
            Self::Dropdown => "dropdown",
            Self::Search => "search",
            Self::SelectionToggle => "selection_toggle",
            Self::EdgeSelection => "edge_selection",
            Self::NodeTap => "node_tap",
            Self::NodeSelectionCleared => "node_selection_cleared",
            Self::Ambient => "ambient",
        }
    }
}

/// Graph layout algorithm requested from the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    /// Use the positions stored in the topology.
    Preset,
    Breadthfirst,
    Grid,
    Random,
    Circle,
    Cose,
    Concentric,
}

impl LayoutMode {
    pub const ALL: [Self; 7] = [
        Self::Preset,
        Self::Breadthfirst,
        Self::Grid,
        Self::Random,
        Self::Circle,
        Self::Cose,
        Self::Concentric,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::Preset => "preset",
            Self::Breadthfirst => "breadthfirst",
            Self::Grid => "grid",
            Self::Random => "random",
            Self::Circle => "circle",
            Self::Cose => "cose",
            Self::Concentric => "concentric",
        }
    }

    pub fn is_preset(self) -> bool {
        self == Self::Preset
    }
}

impl fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for LayoutMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|mode| mode.key() == lowered)
            .ok_or_else(|| s.to_string())
    }
}
