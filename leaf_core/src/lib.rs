//! Selection and filter reconciliation for the LEAF network viewer.
//!
//! Given the loaded topology and the elements that carry power measurements,
//! [`Reconciler`] turns each user trigger into the next [`ViewState`] and the
//! chart requests, visible elements and panel geometry the renderer needs.
//! [`build_headless_viewer`] hosts a session inside a Bevy [`App`](bevy::app::App).

pub mod charts;
pub mod filter;
pub mod measurements;
mod panel;
mod reconcile;
mod selection;
mod session;
mod style_overlay;
pub mod view_config;

pub use charts::{assemble_chart, plan_chart_requests, ChartFigure, ChartRequest, ChartSeries};
pub use filter::{
    available_filter_types, derive_visible, resolve_time_key, slider_caption, timeline_marks,
    FilterState, TimelineMark, VisibleEdge, VisibleElements, VisibleNode,
};
pub use measurements::{
    ElementSeries, MeasurementError, MeasurementRecord, MeasurementStore, MeasurementTable,
    PowerSample, SelectableSet, TimeRange,
};
pub use panel::{ChartRegions, PanelMode, PanelState, ToolbarState};
pub use reconcile::{
    LayoutRequest, Reconciler, Reconciliation, SearchMessage, SearchOutcome, ViewState,
};
pub use selection::{SelectionState, SelectionTrigger};
pub use session::{
    build_headless_viewer, reconcile_triggers, SessionContext, TriggerEvent, ViewSession,
    ViewerPlugin,
};
pub use style_overlay::{StyleOverlayStack, StyleRecord, StyleRole};
pub use view_config::{
    load_view_config, ViewConfig, ViewConfigError, ViewConfigHandle, ViewConfigMetadata,
    BUILTIN_VIEW_CONFIG, VIEW_CONFIG_ENV,
};
