//! Headless Bevy host for a viewer session.
//!
//! Triggers are queued as [`TriggerEvent`]s and applied in order by
//! [`reconcile_triggers`]; the last reconciliation is kept on [`ViewSession`].

use std::sync::Arc;

use bevy::prelude::*;
use leaf_runtime::{TriggerFrame, ViewEvent};
use leaf_schema::TopologyStore;

use crate::charts::{assemble_chart, ChartFigure};
use crate::measurements::{MeasurementStore, SelectableSet, TimeRange};
use crate::reconcile::{Reconciler, Reconciliation, ViewState};
use crate::view_config::{ViewConfig, ViewConfigHandle};

/// Data loaded once at startup and shared by every reconciliation.
#[derive(Clone)]
pub struct SessionContext {
    pub topology: Arc<dyn TopologyStore + Send + Sync>,
    pub measurements: Arc<dyn MeasurementStore + Send + Sync>,
    pub selectable: Arc<SelectableSet>,
    pub config: Arc<ViewConfig>,
}

impl SessionContext {
    pub fn new(
        topology: Arc<dyn TopologyStore + Send + Sync>,
        measurements: Arc<dyn MeasurementStore + Send + Sync>,
        config: Arc<ViewConfig>,
    ) -> Self {
        let selectable = Arc::new(SelectableSet::from_store(measurements.as_ref()));
        Self {
            topology,
            measurements,
            selectable,
            config,
        }
    }

    pub fn reconciler(&self) -> Reconciler<'_> {
        Reconciler::new(self.topology.as_ref(), &self.selectable, &self.config)
    }
}

#[derive(Event, Debug, Clone)]
pub enum TriggerEvent {
    View(ViewEvent),
    Frame(TriggerFrame),
}

impl From<ViewEvent> for TriggerEvent {
    fn from(event: ViewEvent) -> Self {
        Self::View(event)
    }
}

#[derive(Resource)]
pub struct ViewSession {
    context: SessionContext,
    state: ViewState,
    latest: Option<Reconciliation>,
    applied: u64,
}

impl ViewSession {
    pub fn new(context: SessionContext) -> Self {
        let state = context.reconciler().initial_state();
        Self {
            context,
            state,
            latest: None,
            applied: 0,
        }
    }

    pub fn handle(&mut self, trigger: &TriggerEvent) -> &Reconciliation {
        let outcome = {
            let reconciler = self.context.reconciler();
            match trigger {
                TriggerEvent::View(event) => reconciler.apply(&self.state, event),
                TriggerEvent::Frame(frame) => reconciler.apply_frame(&self.state, frame),
            }
        };
        self.state = outcome.state.clone();
        self.applied += 1;
        self.latest.insert(outcome)
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn latest(&self) -> Option<&Reconciliation> {
        self.latest.as_ref()
    }

    pub fn applied(&self) -> u64 {
        self.applied
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    /// Figures for the chart requests of the latest reconciliation.
    pub fn chart_figures(&self, range: TimeRange) -> Vec<ChartFigure> {
        self.latest
            .iter()
            .flat_map(|latest| latest.charts.iter())
            .map(|request| assemble_chart(request, self.context.measurements.as_ref(), range))
            .collect()
    }
}

pub fn reconcile_triggers(
    mut triggers: EventReader<TriggerEvent>,
    mut session: ResMut<ViewSession>,
) {
    for trigger in triggers.read() {
        session.handle(trigger);
    }
}

pub struct ViewerPlugin;

impl Plugin for ViewerPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<TriggerEvent>()
            .add_systems(Update, reconcile_triggers);
    }
}

/// Construct a headless Bevy [`App`] hosting one viewer session.
pub fn build_headless_viewer(context: SessionContext) -> App {
    let mut app = App::new();
    app.insert_resource(ViewConfigHandle::new(Arc::clone(&context.config)))
        .insert_resource(ViewSession::new(context))
        .add_plugins(MinimalPlugins)
        .add_plugins(ViewerPlugin);
    app
}
