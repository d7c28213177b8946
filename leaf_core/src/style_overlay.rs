//! Per-element style records layered over the graph stylesheet.

use std::collections::{BTreeMap, HashMap, HashSet};

use ahash::RandomState;
use leaf_schema::ElementId;
use serde::{ser::SerializeStruct, Serialize, Serializer};

use crate::view_config::{OverlayConfig, StyleConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleRole {
    Selectable,
    Selected,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyleRecord {
    pub role: StyleRole,
    pub background_color: String,
    pub size_px: u32,
    pub label_visible: bool,
}

impl StyleRecord {
    fn from_config(role: StyleRole, style: &StyleConfig) -> Self {
        Self {
            role,
            background_color: style.background_color.clone(),
            size_px: style.size_px,
            label_visible: style.label_visible,
        }
    }
}

/// Style overrides keyed by element id; at most one record per id.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleOverlayStack {
    records: HashMap<ElementId, StyleRecord, RandomState>,
    selected: Vec<ElementId>,
    selected_lookup: HashSet<ElementId, RandomState>,
    base: StyleRecord,
    highlight: StyleRecord,
}

impl StyleOverlayStack {
    pub fn new(palette: &OverlayConfig) -> Self {
        Self {
            records: HashMap::default(),
            selected: Vec::new(),
            selected_lookup: HashSet::default(),
            base: StyleRecord::from_config(StyleRole::Selectable, &palette.selectable),
            highlight: StyleRecord::from_config(StyleRole::Selected, &palette.selected),
        }
    }

    /// Give every id without a record the base "selectable" style.
    pub fn apply_base_highlight<'a>(&mut self, ids: impl IntoIterator<Item = &'a ElementId>) {
        for id in ids {
            if !self.records.contains_key(id) {
                self.records.insert(id.clone(), self.base.clone());
            }
        }
    }

    pub fn set_selected<'a>(&mut self, ids: impl IntoIterator<Item = &'a ElementId>) {
        for id in ids {
            self.records.insert(id.clone(), self.highlight.clone());
            if self.selected_lookup.insert(id.clone()) {
                self.selected.push(id.clone());
            }
        }
    }

    pub fn reset<'a>(&mut self, ids: impl IntoIterator<Item = &'a ElementId>) {
        let mut unselected = false;
        for id in ids {
            self.records.insert(id.clone(), self.base.clone());
            unselected |= self.selected_lookup.remove(id);
        }
        if unselected {
            let lookup = &self.selected_lookup;
            self.selected.retain(|selected| lookup.contains(selected));
        }
    }

    /// Restore every currently selected id to the base style.
    pub fn reset_selected(&mut self) {
        let selected = std::mem::take(&mut self.selected);
        self.selected_lookup.clear();
        self.reset(&selected);
    }

    pub fn record(&self, id: &str) -> Option<&StyleRecord> {
        self.records.get(id)
    }

    pub fn selected_ids(&self) -> &[ElementId] {
        &self.selected
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Serialize for StyleOverlayStack {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let records: BTreeMap<&str, &StyleRecord> = self
            .records
            .iter()
            .map(|(id, record)| (id.as_str(), record))
            .collect();
        let mut state = serializer.serialize_struct("StyleOverlayStack", 2)?;
        state.serialize_field("records", &records)?;
        state.serialize_field("selected", &self.selected)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[&str]) -> Vec<ElementId> {
        raw.iter().map(|id| ElementId::new(*id)).collect()
    }

    #[test]
    fn base_highlight_keeps_existing_records() {
        let mut stack = StyleOverlayStack::new(&OverlayConfig::default());
        let taxi = ids(&["taxi_1"]);
        stack.set_selected(&taxi);
        stack.apply_base_highlight(&ids(&["taxi_1", "taxi_2"]));

        assert_eq!(stack.len(), 2);
        assert_eq!(stack.record("taxi_1").map(|r| r.role), Some(StyleRole::Selected));
        assert_eq!(
            stack.record("taxi_2").map(|r| r.background_color.as_str()),
            Some("#ABE8E8")
        );
    }

    #[test]
    fn repeated_selection_never_duplicates() {
        let mut stack = StyleOverlayStack::new(&OverlayConfig::default());
        let selection = ids(&["taxi_1", "traffic_1"]);
        stack.set_selected(&selection);
        let once = stack.clone();
        stack.set_selected(&selection);

        assert_eq!(stack, once);
        assert_eq!(stack.selected_ids().len(), 2);
        assert_eq!(stack.len(), 2);
    }

    #[test]
    fn reset_selected_restores_base_style() {
        let mut stack = StyleOverlayStack::new(&OverlayConfig::default());
        stack.apply_base_highlight(&ids(&["taxi_1", "taxi_2"]));
        stack.set_selected(&ids(&["taxi_2"]));
        stack.reset_selected();

        assert!(stack.selected_ids().is_empty());
        assert_eq!(
            stack.record("taxi_2").map(|r| r.role),
            Some(StyleRole::Selectable)
        );
        let json = serde_json::to_value(&stack).expect("serialize");
        assert_eq!(json["records"]["taxi_2"]["background_color"], "#ABE8E8");
    }

    #[test]
    fn partial_reset_keeps_selection_order() {
        let mut stack = StyleOverlayStack::new(&OverlayConfig::default());
        let many: Vec<ElementId> = (0..5_000)
            .map(|i| ElementId::new(format!("taxi_{i}")))
            .collect();
        stack.set_selected(&many);
        stack.set_selected(&many);
        assert_eq!(stack.selected_ids().len(), 5_000);

        stack.reset(&ids(&["taxi_1", "taxi_3"]));
        assert_eq!(
            &stack.selected_ids()[..3],
            ids(&["taxi_0", "taxi_2", "taxi_4"]).as_slice()
        );
        assert_eq!(stack.record("taxi_3").map(|r| r.role), Some(StyleRole::Selectable));

        stack.set_selected(&ids(&["taxi_1"]));
        assert_eq!(stack.selected_ids().last(), Some(&ElementId::new("taxi_1")));
        stack.reset_selected();
        assert!(stack.selected_ids().is_empty());
        assert_eq!(stack.len(), 5_000);
    }
}
