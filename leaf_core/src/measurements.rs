//! Per-element power samples and the set of elements that have them.
//!
//! Only elements with at least one sample are selectable; the
//! [`SelectableSet`] built here is the single source of that legality.

use std::{collections::HashSet, fs, io, path::Path, path::PathBuf};

use ahash::{AHashMap, RandomState};
use leaf_runtime::SELECT_ALL_SENTINEL;
use leaf_schema::{ElementId, ElementKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One measurement row as stored on disk.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MeasurementRecord {
    pub time: u64,
    pub id: ElementId,
    pub static_power: f64,
    pub dynamic_power: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PowerSample {
    pub time: u64,
    pub static_power: f64,
    pub dynamic_power: f64,
}

/// Inclusive range of sample times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: u64,
    pub end: u64,
}

impl TimeRange {
    pub const ALL: Self = Self {
        start: 0,
        end: u64::MAX,
    };

    pub fn new(start: u64, end: u64) -> Self {
        Self {
            start: start.min(end),
            end: start.max(end),
        }
    }

    pub fn contains(&self, time: u64) -> bool {
        (self.start..=self.end).contains(&time)
    }
}

impl Default for TimeRange {
    fn default() -> Self {
        Self::ALL
    }
}

/// Samples of one element, ordered by time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementSeries {
    pub id: ElementId,
    pub samples: Vec<PowerSample>,
}

/// Read access to power measurements.
pub trait MeasurementStore {
    /// Every id with at least one sample, in first-appearance order.
    fn element_ids(&self) -> Vec<ElementId>;

    /// Samples for `ids` within `range`. Unknown ids yield an empty series.
    fn series_for(&self, ids: &[ElementId], range: TimeRange) -> Vec<ElementSeries>;
}

#[derive(Debug, Error)]
pub enum MeasurementError {
    #[error("failed to parse measurements: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read measurements from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// In-memory [`MeasurementStore`] keyed by element id.
#[derive(Debug, Clone, Default)]
pub struct MeasurementTable {
    order: Vec<ElementId>,
    series: AHashMap<ElementId, Vec<PowerSample>>,
}

impl MeasurementTable {
    pub fn from_records(records: impl IntoIterator<Item = MeasurementRecord>) -> Self {
        let mut table = Self::default();
        for record in records {
            let samples = table.series.entry(record.id.clone()).or_insert_with(|| {
                table.order.push(record.id.clone());
                Vec::new()
            });
            samples.push(PowerSample {
                time: record.time,
                static_power: record.static_power,
                dynamic_power: record.dynamic_power,
            });
        }
        for samples in table.series.values_mut() {
            samples.sort_by_key(|sample| sample.time);
        }
        table
    }

    /// Parse a JSON array of [`MeasurementRecord`]s.
    pub fn from_json_str(json: &str) -> Result<Self, MeasurementError> {
        let records: Vec<MeasurementRecord> = serde_json::from_str(json)?;
        Ok(Self::from_records(records))
    }

    pub fn from_file(path: &Path) -> Result<Self, MeasurementError> {
        let contents = fs::read_to_string(path).map_err(|source| MeasurementError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::from_json_str(&contents)?;
        tracing::info!(
            target: "leaf::measurements",
            path = %path.display(),
            elements = table.order.len(),
            "measurements.loaded"
        );
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl MeasurementStore for MeasurementTable {
    fn element_ids(&self) -> Vec<ElementId> {
        self.order.clone()
    }

    fn series_for(&self, ids: &[ElementId], range: TimeRange) -> Vec<ElementSeries> {
        ids.iter()
            .map(|id| ElementSeries {
                id: id.clone(),
                samples: self
                    .series
                    .get(id)
                    .map(|samples| {
                        samples
                            .iter()
                            .filter(|sample| range.contains(sample.time))
                            .copied()
                            .collect()
                    })
                    .unwrap_or_default(),
            })
            .collect()
    }
}

/// Elements for which measurements exist: nodes first, then edges.
#[derive(Debug, Clone, Default)]
pub struct SelectableSet {
    nodes: Vec<ElementId>,
    edges: Vec<ElementId>,
    lookup: HashSet<ElementId, RandomState>,
}

impl SelectableSet {
    pub fn new(ids: impl IntoIterator<Item = ElementId>) -> Self {
        let mut set = Self::default();
        for id in ids {
            if !set.lookup.insert(id.clone()) {
                continue;
            }
            match id.kind() {
                ElementKind::Node => set.nodes.push(id),
                ElementKind::Edge => set.edges.push(id),
            }
        }
        set
    }

    pub fn from_store(store: &dyn MeasurementStore) -> Self {
        Self::new(store.element_ids())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.lookup.contains(id)
    }

    pub fn nodes(&self) -> &[ElementId] {
        &self.nodes
    }

    pub fn edges(&self) -> &[ElementId] {
        &self.edges
    }

    /// Nodes followed by edges.
    pub fn all(&self) -> Vec<ElementId> {
        self.nodes.iter().chain(self.edges.iter()).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lookup.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }

    /// Keep the selectable ids of `ids`, first occurrence wins.
    pub fn retain_legal<'a>(&self, ids: impl IntoIterator<Item = &'a str>) -> Vec<ElementId> {
        let mut seen: HashSet<&str, RandomState> = HashSet::default();
        ids.into_iter()
            .filter(|id| self.contains(id) && seen.insert(*id))
            .map(ElementId::from)
            .collect()
    }

    /// Options offered by the multi-select dropdown.
    pub fn dropdown_options(&self) -> Vec<String> {
        std::iter::once(SELECT_ALL_SENTINEL.to_string())
            .chain(self.nodes.iter().map(|id| id.to_string()))
            .collect()
    }
}
