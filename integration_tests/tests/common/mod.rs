#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Once};

use anyhow::Context;
use leaf_core::{MeasurementTable, SessionContext, ViewConfig, VIEW_CONFIG_ENV};
use leaf_runtime::{ElementId, InfrastructureTimeline};

static INIT: Once = Once::new();

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Make sure a stray config override on the host does not leak into the tests.
pub fn ensure_builtin_config() {
    INIT.call_once(|| {
        std::env::remove_var(VIEW_CONFIG_ENV);
    });
}

pub fn load_context() -> anyhow::Result<SessionContext> {
    ensure_builtin_config();
    let topology_path = fixture_path("infrastructure.json");
    let measurements_path = fixture_path("measurements.json");
    let topology = InfrastructureTimeline::from_file(&topology_path)
        .with_context(|| format!("loading {}", topology_path.display()))?;
    let measurements = MeasurementTable::from_file(&measurements_path)
        .with_context(|| format!("loading {}", measurements_path.display()))?;
    Ok(SessionContext::new(
        Arc::new(topology),
        Arc::new(measurements),
        ViewConfig::builtin(),
    ))
}

pub fn ids(raw: &[&str]) -> Vec<ElementId> {
    raw.iter().map(|id| ElementId::new(*id)).collect()
}
