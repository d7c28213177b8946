//! Side panel geometry and toolbar button state.

use bitflags::bitflags;
use leaf_schema::ElementId;
use serde::Serialize;

use crate::view_config::PanelConfig;

bitflags! {
    /// Charts shown inside the side panel.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
    pub struct ChartRegions: u8 {
        const PRIMARY = 1 << 0;
        const AGGREGATE_NODES = 1 << 1;
        const AGGREGATE_EDGES = 1 << 2;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelMode {
    Idle,
    SingleOrMultiSelected,
    AllSelected,
    /// Slid fully out after "deselect all".
    Hidden,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PanelState {
    pub mode: PanelMode,
    pub is_open: bool,
    pub width_percent: u32,
    pub right_offset_percent: i32,
    pub overlay_visible: bool,
    pub visible_charts: ChartRegions,
    pub title: String,
}

impl PanelState {
    pub fn closed(config: &PanelConfig) -> Self {
        Self {
            mode: PanelMode::Idle,
            is_open: false,
            width_percent: config.single_width_percent,
            right_offset_percent: config.closed_offset_percent,
            overlay_visible: false,
            visible_charts: ChartRegions::PRIMARY,
            title: String::new(),
        }
    }

    pub fn open(config: &PanelConfig, charts: ChartRegions, ids: &[ElementId]) -> Self {
        Self {
            mode: PanelMode::SingleOrMultiSelected,
            is_open: true,
            width_percent: config.single_width_percent,
            right_offset_percent: config.open_offset_percent,
            overlay_visible: false,
            visible_charts: charts,
            title: join_ids(ids),
        }
    }

    pub fn all_selected(config: &PanelConfig) -> Self {
        Self {
            mode: PanelMode::AllSelected,
            is_open: true,
            width_percent: config.all_width_percent,
            right_offset_percent: config.open_offset_percent,
            overlay_visible: true,
            visible_charts: ChartRegions::AGGREGATE_NODES | ChartRegions::AGGREGATE_EDGES,
            title: config.select_all_title.clone(),
        }
    }

    pub fn hidden(config: &PanelConfig) -> Self {
        Self {
            mode: PanelMode::Hidden,
            is_open: false,
            width_percent: config.all_width_percent,
            right_offset_percent: config.hidden_offset_percent,
            overlay_visible: false,
            visible_charts: ChartRegions::empty(),
            title: config.select_all_title.clone(),
        }
    }

    /// Close the panel, keeping the last title for the slide-out animation.
    pub fn close(&mut self, config: &PanelConfig) {
        let title = std::mem::take(&mut self.title);
        *self = Self {
            title,
            ..Self::closed(config)
        };
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.mode, PanelMode::Idle | PanelMode::Hidden)
    }
}

fn join_ids(ids: &[ElementId]) -> String {
    ids.iter()
        .map(ElementId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Select/deselect button swap and the filter drawer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolbarState {
    pub select_all_visible: bool,
    pub deselect_all_visible: bool,
    pub filter_panel_open: bool,
}

impl Default for ToolbarState {
    fn default() -> Self {
        Self {
            select_all_visible: true,
            deselect_all_visible: false,
            filter_panel_open: false,
        }
    }
}

impl ToolbarState {
    pub fn show_select_all(&mut self) {
        self.select_all_visible = true;
        self.deselect_all_visible = false;
    }

    pub fn show_deselect_all(&mut self) {
        self.select_all_visible = false;
        self.deselect_all_visible = true;
    }

    pub fn toggle_filter_panel(&mut self) {
        self.filter_panel_open = !self.filter_panel_open;
    }
}
