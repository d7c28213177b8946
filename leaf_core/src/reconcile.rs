//! Trigger reconciliation.
//!
//! [`Reconciler::apply`] maps the previous [`ViewState`] and one
//! [`ViewEvent`] to the next state plus everything the renderer needs to
//! redraw: chart requests, visible elements, style overlays, panel geometry
//! and the search message.

use std::collections::HashSet;

use ahash::RandomState;
use leaf_runtime::{
    LayoutMode, TriggerCategory, TriggerFrame, TriggerMemory, ViewEvent, SELECT_ALL_SENTINEL,
};
use leaf_schema::{ElementId, ElementType, TimeKey, TopologyStore};
use serde::Serialize;

use crate::charts::{plan_chart_requests, ChartRequest};
use crate::filter::{derive_visible, resolve_time_key, slider_caption, FilterState, VisibleElements};
use crate::measurements::SelectableSet;
use crate::panel::{ChartRegions, PanelState, ToolbarState};
use crate::selection::{SelectionState, SelectionTrigger};
use crate::style_overlay::StyleOverlayStack;
use crate::view_config::ViewConfig;

/// Everything the reconciler carries from one trigger to the next.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewState {
    pub selection: SelectionState,
    pub filter: FilterState,
    pub panel: PanelState,
    pub toolbar: ToolbarState,
    pub layout: LayoutMode,
    pub styles: StyleOverlayStack,
    pub memory: TriggerMemory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchOutcome {
    Found,
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchMessage {
    pub outcome: SearchOutcome,
    pub text: String,
}

/// Re-layout instruction for the graph renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LayoutRequest {
    pub name: LayoutMode,
    pub animate: bool,
}

/// Output of one reconciliation step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reconciliation {
    pub trigger: TriggerCategory,
    pub state: ViewState,
    pub charts: Vec<ChartRequest>,
    pub visible: VisibleElements,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout_request: Option<LayoutRequest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<SearchMessage>,
    pub slider_caption: String,
}

/// Pure state transition over a loaded topology and selectable set.
pub struct Reconciler<'a> {
    topology: &'a dyn TopologyStore,
    selectable: &'a SelectableSet,
    config: &'a ViewConfig,
}

impl<'a> Reconciler<'a> {
    pub fn new(
        topology: &'a dyn TopologyStore,
        selectable: &'a SelectableSet,
        config: &'a ViewConfig,
    ) -> Self {
        Self {
            topology,
            selectable,
            config,
        }
    }

    /// Session defaults: first slice, nothing selected, every selectable
    /// element highlighted with the base style.
    pub fn initial_state(&self) -> ViewState {
        let time = self
            .topology
            .time_keys()
            .first()
            .copied()
            .unwrap_or_default();
        let mut styles = StyleOverlayStack::new(&self.config.overlay);
        styles.apply_base_highlight(self.selectable.nodes());
        styles.apply_base_highlight(self.selectable.edges());

        ViewState {
            selection: SelectionState::default(),
            filter: FilterState::new(time),
            panel: PanelState::closed(&self.config.panel),
            toolbar: ToolbarState::default(),
            layout: self.config.layout.default,
            styles,
            memory: TriggerMemory::default(),
        }
    }

    pub fn apply(&self, previous: &ViewState, event: &ViewEvent) -> Reconciliation {
        let mut next = previous.clone();
        let message = self.transition(&mut next, event);
        self.finish(next, event.category(), message)
    }

    /// Reconcile a raw widget snapshot: ambient updates first, then the
    /// highest-priority selection trigger.
    pub fn apply_frame(&self, previous: &ViewState, frame: &TriggerFrame) -> Reconciliation {
        let triggers = frame.classify(&previous.memory);
        let mut next = previous.clone();
        for event in &triggers.ambient {
            self.transition(&mut next, event);
        }
        let (category, message) = match &triggers.selection {
            Some(event) => (event.category(), self.transition(&mut next, event)),
            None => (TriggerCategory::Ambient, None),
        };
        next.memory.observe(frame);
        self.finish(next, category, message)
    }

    fn transition(&self, next: &mut ViewState, event: &ViewEvent) -> Option<SearchMessage> {
        match event {
            ViewEvent::DropdownChanged { values } => self.on_dropdown(next, values),
            ViewEvent::SearchSubmitted { query } => return Some(self.on_search(next, query)),
            ViewEvent::SelectAll => self.on_select_all(next),
            ViewEvent::DeselectAll => self.on_deselect_all(next),
            ViewEvent::EdgeSelection { edge_ids } => self.on_edge_selection(next, edge_ids),
            ViewEvent::NodeTap { node_id } => self.on_node_tap(next, node_id),
            ViewEvent::NodeSelectionCleared => self.close(next, SelectionTrigger::Cleared),
            ViewEvent::TypeFilterChanged { types } => self.on_type_filter(next, types),
            ViewEvent::TimeChanged { time } => self.on_time(next, *time),
            ViewEvent::LayoutChanged { layout } => next.layout = *layout,
            ViewEvent::FilterPanelToggled => next.toolbar.toggle_filter_panel(),
        }
        None
    }

    fn on_dropdown(&self, next: &mut ViewState, values: &[String]) {
        if values == next.memory.dropdown.as_slice() {
            return;
        }
        next.memory.dropdown = values.to_vec();
        if values.is_empty() {
            return;
        }

        let select_all = values
            .iter()
            .any(|value| value.eq_ignore_ascii_case(SELECT_ALL_SENTINEL));
        let ids = if select_all {
            self.selectable.all()
        } else {
            self.selectable
                .retain_legal(values.iter().map(String::as_str))
        };
        if ids.is_empty() {
            self.close(next, SelectionTrigger::Dropdown);
            return;
        }

        next.panel = if select_all {
            PanelState::all_selected(&self.config.panel)
        } else {
            let mut charts = ChartRegions::PRIMARY | ChartRegions::AGGREGATE_NODES;
            if ids.iter().any(ElementId::is_edge) {
                charts |= ChartRegions::AGGREGATE_EDGES;
            }
            PanelState::open(&self.config.panel, charts, &ids)
        };
        next.selection.replace(ids, SelectionTrigger::Dropdown);
        next.toolbar.show_select_all();
    }

    fn on_search(&self, next: &mut ViewState, query: &str) -> SearchMessage {
        let visible = self.visible_for(next);
        let mut matches: Vec<ElementId> = Vec::new();
        let mut matched: HashSet<&str, RandomState> = HashSet::default();
        for token in query.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            for node in &visible.nodes {
                if node.selectable
                    && node.id.as_str().contains(token)
                    && matched.insert(node.id.as_str())
                {
                    matches.push(node.id.clone());
                }
            }
        }

        if matches.is_empty() {
            self.close(next, SelectionTrigger::Search);
            return SearchMessage {
                outcome: SearchOutcome::NotFound,
                text: self.config.search.not_found.clone(),
            };
        }

        let found: Vec<&str> = matches.iter().map(ElementId::as_str).collect();
        let text = format!("{}{}", self.config.search.found_prefix, found.join(" "));
        next.panel = PanelState::open(&self.config.panel, ChartRegions::PRIMARY, &matches);
        next.selection.replace(matches, SelectionTrigger::Search);
        next.toolbar.show_select_all();
        SearchMessage {
            outcome: SearchOutcome::Found,
            text,
        }
    }

    fn on_select_all(&self, next: &mut ViewState) {
        next.selection
            .replace(self.selectable.all(), SelectionTrigger::SelectAll);
        next.panel = PanelState::all_selected(&self.config.panel);
        next.toolbar.show_deselect_all();
    }

    fn on_deselect_all(&self, next: &mut ViewState) {
        next.selection.clear_all();
        next.panel = PanelState::hidden(&self.config.panel);
        next.toolbar.show_select_all();
    }

    fn on_edge_selection(&self, next: &mut ViewState, edge_ids: &[ElementId]) {
        let legal = self.selectable.retain_legal(
            edge_ids
                .iter()
                .filter(|id| id.is_edge())
                .map(ElementId::as_str),
        );
        if !legal.is_empty() {
            next.panel = PanelState::open(&self.config.panel, ChartRegions::PRIMARY, &legal);
            next.selection.replace(legal, SelectionTrigger::EdgeTap);
            next.toolbar.show_select_all();
            return;
        }
        // An empty edge list only closes what an earlier edge selection opened.
        if edge_ids.is_empty() && next.selection.last_trigger != SelectionTrigger::EdgeTap {
            return;
        }
        self.close(next, SelectionTrigger::EdgeTap);
    }

    fn on_node_tap(&self, next: &mut ViewState, node_id: &ElementId) {
        if node_id.is_edge() || !self.selectable.contains(node_id.as_str()) {
            tracing::debug!(
                target: "leaf::reconcile",
                node = %node_id,
                panel_open = next.panel.is_open,
                "tap.ignored"
            );
            return;
        }
        let ids = vec![node_id.clone()];
        next.panel = PanelState::open(&self.config.panel, ChartRegions::PRIMARY, &ids);
        next.selection.replace(ids, SelectionTrigger::Tap);
        next.toolbar.show_select_all();
    }

    fn on_type_filter(&self, next: &mut ViewState, types: &[ElementType]) {
        next.filter.set_types(types);
    }

    fn on_time(&self, next: &mut ViewState, time: TimeKey) {
        next.filter.time = resolve_time_key(self.topology, time);
    }

    fn close(&self, next: &mut ViewState, trigger: SelectionTrigger) {
        next.selection.close(trigger);
        next.panel.close(&self.config.panel);
        next.toolbar.show_select_all();
    }

    fn visible_for(&self, state: &ViewState) -> VisibleElements {
        let time = resolve_time_key(self.topology, state.filter.time);
        match self.topology.slice(time) {
            Ok(slice) => derive_visible(&state.filter, slice, self.selectable, state.layout),
            Err(_) => VisibleElements::empty(time),
        }
    }

    fn finish(
        &self,
        mut next: ViewState,
        trigger: TriggerCategory,
        message: Option<SearchMessage>,
    ) -> Reconciliation {
        next.filter.time = resolve_time_key(self.topology, next.filter.time);

        next.styles.reset_selected();
        if next.panel.is_open {
            next.styles.set_selected(&next.selection.active_ids);
        }

        let aggregate = !next.selection.active_ids.is_empty()
            && next.selection.last_trigger.wants_aggregate();
        let charts = plan_chart_requests(next.selection.chart_ids(), aggregate);
        let visible = self.visible_for(&next);
        let layout_request = (!next.layout.is_preset()).then(|| LayoutRequest {
            name: next.layout,
            animate: self.config.layout.animate,
        });

        tracing::debug!(
            target: "leaf::reconcile",
            trigger = trigger.key(),
            active = next.selection.active_ids.len(),
            panel = ?next.panel.mode,
            visible = visible.len(),
            "reconcile.applied"
        );

        Reconciliation {
            trigger,
            slider_caption: slider_caption(next.filter.time),
            state: next,
            charts,
            visible,
            layout_request,
            message,
        }
    }
}
