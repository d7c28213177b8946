use leaf_schema::ElementId;
use serde::Serialize;

/// What produced the current active set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionTrigger {
    #[default]
    None,
    Tap,
    EdgeTap,
    Search,
    Dropdown,
    SelectAll,
    DeselectAll,
    Cleared,
}

impl SelectionTrigger {
    /// Triggers whose charts include the summed series.
    pub fn wants_aggregate(self) -> bool {
        matches!(
            self,
            Self::Dropdown | Self::SelectAll | Self::DeselectAll
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectionState {
    /// In display order.
    pub active_ids: Vec<ElementId>,
    /// Last non-empty active set; charts fall back to it while nothing is active.
    pub previous_active_ids: Vec<ElementId>,
    pub last_trigger: SelectionTrigger,
}

impl SelectionState {
    /// Make `ids` the active set. The replaced set becomes the memory when it differs.
    pub fn replace(&mut self, ids: Vec<ElementId>, trigger: SelectionTrigger) {
        if !self.active_ids.is_empty() && self.active_ids != ids {
            self.previous_active_ids = std::mem::take(&mut self.active_ids);
        }
        self.active_ids = ids;
        self.last_trigger = trigger;
    }

    /// Empty the active set, remembering it for the charts.
    pub fn close(&mut self, trigger: SelectionTrigger) {
        if !self.active_ids.is_empty() {
            self.previous_active_ids = std::mem::take(&mut self.active_ids);
        }
        self.last_trigger = trigger;
    }

    /// Forget both the active set and the memory.
    pub fn clear_all(&mut self) {
        self.active_ids.clear();
        self.previous_active_ids.clear();
        self.last_trigger = SelectionTrigger::DeselectAll;
    }

    pub fn chart_ids(&self) -> &[ElementId] {
        if self.active_ids.is_empty() {
            &self.previous_active_ids
        } else {
            &self.active_ids
        }
    }
}
