use std::io::{BufRead, Write};

use bevy::app::App;
use color_eyre::Result;
use leaf_core::{
    available_filter_types, build_headless_viewer, timeline_marks, ChartFigure, Reconciliation,
    SessionContext, TimeRange, TimelineMark, TriggerEvent, ViewConfigHandle, ViewSession,
};
use leaf_runtime::{parse_trigger_line, ElementType, TimeKey, TopologyStore};
use serde::Serialize;
use tracing::{debug, warn};

/// Replays textual triggers through a headless viewer session.
pub struct InspectorApp {
    app: App,
    include_charts: bool,
    pretty: bool,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RunSummary {
    pub applied: usize,
    pub rejected: usize,
}

#[derive(Serialize)]
struct Record<'a> {
    line: usize,
    input: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reconciliation: Option<&'a Reconciliation>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    figures: Vec<ChartFigure>,
}

#[derive(Serialize)]
struct SessionSummary {
    time_keys: Vec<TimeKey>,
    timeline: Vec<TimelineMark>,
    filter_types: Vec<ElementType>,
    dropdown_options: Vec<String>,
}

impl InspectorApp {
    pub fn new(context: SessionContext, include_charts: bool, pretty: bool) -> Self {
        Self {
            app: build_headless_viewer(context),
            include_charts,
            pretty,
        }
    }

    pub fn describe(&self, out: &mut impl Write) -> Result<()> {
        let context = self.session().context();
        let config = self.app.world.resource::<ViewConfigHandle>().get();
        let keys = context.topology.time_keys().to_vec();
        let summary = SessionSummary {
            timeline: timeline_marks(&keys, config.timeline.mark_stride),
            filter_types: context
                .topology
                .first_slice()
                .map(available_filter_types)
                .unwrap_or_default(),
            dropdown_options: context.selectable.dropdown_options(),
            time_keys: keys,
        };
        self.emit(out, &summary)
    }

    pub fn run(&mut self, input: impl BufRead, out: &mut impl Write) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        for (index, line) in input.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let line_number = index + 1;

            let event = match parse_trigger_line(trimmed) {
                Ok(event) => event,
                Err(err) => {
                    warn!(line = line_number, error = %err, "trigger.rejected");
                    summary.rejected += 1;
                    let record = Record {
                        line: line_number,
                        input: trimmed,
                        error: Some(err.to_string()),
                        reconciliation: None,
                        figures: Vec::new(),
                    };
                    self.emit(out, &record)?;
                    continue;
                }
            };

            debug!(line = line_number, ?event, "trigger.sent");
            self.app.world.send_event(TriggerEvent::View(event));
            self.app.update();
            summary.applied += 1;

            let session = self.session();
            let figures = if self.include_charts {
                session.chart_figures(TimeRange::ALL)
            } else {
                Vec::new()
            };
            let record = Record {
                line: line_number,
                input: trimmed,
                error: None,
                reconciliation: session.latest(),
                figures,
            };
            self.emit(out, &record)?;
        }
        Ok(summary)
    }

    fn session(&self) -> &ViewSession {
        self.app.world.resource::<ViewSession>()
    }

    fn emit(&self, out: &mut impl Write, value: &impl Serialize) -> Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut *out, value)?;
        } else {
            serde_json::to_writer(&mut *out, value)?;
        }
        writeln!(out)?;
        Ok(())
    }
}
