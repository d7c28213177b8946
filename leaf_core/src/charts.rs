//! Chart requests and their assembly into plottable series.

use std::collections::BTreeMap;

use leaf_schema::{ElementId, ElementKind};
use serde::Serialize;

use crate::measurements::{MeasurementStore, TimeRange};

const TIME_AXIS_TITLE: &str = "Time in sec";
const POWER_AXIS_TITLE: &str = "Power usage (Watt)";
const SUMMED_AXIS_TITLE: &str = "Summed power usage (Watt)";
const TITLE_ID_LIMIT: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartRequest {
    pub source_kind: ElementKind,
    pub ids: Vec<ElementId>,
    pub aggregate: bool,
}

/// Requests for the ids on display: always one per-id chart, plus summed
/// charts per element kind when `aggregate` is set.
pub fn plan_chart_requests(ids: &[ElementId], aggregate: bool) -> Vec<ChartRequest> {
    let (nodes, edges): (Vec<ElementId>, Vec<ElementId>) =
        ids.iter().cloned().partition(|id| !id.is_edge());

    let primary = if !nodes.is_empty() || edges.is_empty() {
        ChartRequest {
            source_kind: ElementKind::Node,
            ids: nodes.clone(),
            aggregate: false,
        }
    } else {
        ChartRequest {
            source_kind: ElementKind::Edge,
            ids: edges.clone(),
            aggregate: false,
        }
    };

    let mut requests = vec![primary];
    if aggregate {
        if !nodes.is_empty() {
            requests.push(ChartRequest {
                source_kind: ElementKind::Node,
                ids: nodes,
                aggregate: true,
            });
        }
        if !edges.is_empty() {
            requests.push(ChartRequest {
                source_kind: ElementKind::Edge,
                ids: edges,
                aggregate: true,
            });
        }
    }
    requests
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub name: String,
    /// `(time, watts)` pairs ordered by time.
    pub points: Vec<(u64, f64)>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartFigure {
    pub title: String,
    pub x_axis_title: String,
    pub y_axis_title: String,
    pub series: Vec<ChartSeries>,
}

impl ChartFigure {
    /// Placeholder drawn when nothing is selected.
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn is_blank(&self) -> bool {
        self.series.is_empty()
    }
}

pub fn assemble_chart(
    request: &ChartRequest,
    store: &dyn MeasurementStore,
    range: TimeRange,
) -> ChartFigure {
    if request.ids.is_empty() {
        return ChartFigure::blank();
    }
    if request.aggregate {
        summed_chart(request, store, range)
    } else {
        per_element_chart(request, store, range)
    }
}

fn per_element_chart(
    request: &ChartRequest,
    store: &dyn MeasurementStore,
    range: TimeRange,
) -> ChartFigure {
    let mut series = Vec::with_capacity(request.ids.len() * 2);
    for element in store.series_for(&request.ids, range) {
        series.push(ChartSeries {
            name: format!("{} Static power", element.id),
            points: element
                .samples
                .iter()
                .map(|sample| (sample.time, sample.static_power))
                .collect(),
        });
        series.push(ChartSeries {
            name: format!("{} Dynamic power", element.id),
            points: element
                .samples
                .iter()
                .map(|sample| (sample.time, sample.dynamic_power))
                .collect(),
        });
    }

    let ids: Vec<&str> = request.ids.iter().map(ElementId::as_str).collect();
    ChartFigure {
        title: format!("Power usage: {}", ids.join(", ")),
        x_axis_title: TIME_AXIS_TITLE.to_string(),
        y_axis_title: POWER_AXIS_TITLE.to_string(),
        series,
    }
}

fn summed_chart(
    request: &ChartRequest,
    store: &dyn MeasurementStore,
    range: TimeRange,
) -> ChartFigure {
    let mut totals: BTreeMap<u64, (f64, f64)> = BTreeMap::new();
    for element in store.series_for(&request.ids, range) {
        for sample in element.samples {
            let entry = totals.entry(sample.time).or_insert((0.0, 0.0));
            entry.0 += sample.static_power;
            entry.1 += sample.dynamic_power;
        }
    }

    let head: Vec<&str> = request
        .ids
        .iter()
        .take(TITLE_ID_LIMIT)
        .map(ElementId::as_str)
        .collect();
    let ellipsis = if request.ids.len() > TITLE_ID_LIMIT {
        "..."
    } else {
        ""
    };

    ChartFigure {
        title: format!("Summed power usage: {}{ellipsis}", head.join(", ")),
        x_axis_title: TIME_AXIS_TITLE.to_string(),
        y_axis_title: SUMMED_AXIS_TITLE.to_string(),
        series: vec![
            ChartSeries {
                name: "Sum Static power".to_string(),
                points: totals.iter().map(|(time, (s, _))| (*time, *s)).collect(),
            },
            ChartSeries {
                name: "Sum Dynamic power".to_string(),
                points: totals.iter().map(|(time, (_, d))| (*time, *d)).collect(),
            },
        ],
    }
}
