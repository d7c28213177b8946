//! Configuration for panel geometry, overlay styles and user-facing texts.
//!
//! Loaded from `view_config.json` with support for environment variable overrides.

use std::{
    env, fs, io,
    path::{Path, PathBuf},
    sync::Arc,
};

use bevy::prelude::Resource;
use leaf_runtime::LayoutMode;
use serde::Deserialize;
use thiserror::Error;

pub const BUILTIN_VIEW_CONFIG: &str = include_str!("data/view_config.json");

pub const VIEW_CONFIG_ENV: &str = "LEAF_VIEW_CONFIG_PATH";

/// Root configuration of the viewer.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub panel: PanelConfig,
    pub overlay: OverlayConfig,
    pub search: SearchConfig,
    pub layout: LayoutConfig,
    pub timeline: TimelineConfig,
}

impl ViewConfig {
    pub fn builtin() -> Arc<Self> {
        Arc::new(
            serde_json::from_str(BUILTIN_VIEW_CONFIG).expect("builtin view config should parse"),
        )
    }

    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn from_file(path: &Path) -> Result<Self, ViewConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ViewConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = ViewConfig::from_json_str(&contents)?;
        Ok(config)
    }
}

/// Side panel geometry, in percent of the viewport width.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    pub single_width_percent: u32,
    pub all_width_percent: u32,
    pub open_offset_percent: i32,
    /// Right offset of a panel closed after a regular selection.
    pub closed_offset_percent: i32,
    /// Right offset after "deselect all"; slides the wide panel fully out.
    pub hidden_offset_percent: i32,
    pub select_all_title: String,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            single_width_percent: 50,
            all_width_percent: 75,
            open_offset_percent: 0,
            closed_offset_percent: -50,
            hidden_offset_percent: -75,
            select_all_title: "All selectable nodes and edges".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub selectable: StyleConfig,
    pub selected: StyleConfig,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            selectable: StyleConfig {
                background_color: "#ABE8E8".to_string(),
                ..StyleConfig::default()
            },
            selected: StyleConfig {
                background_color: "#A2C2C2".to_string(),
                ..StyleConfig::default()
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    pub background_color: String,
    pub size_px: u32,
    pub label_visible: bool,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            background_color: "black".to_string(),
            size_px: 100,
            label_visible: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub found_prefix: String,
    pub not_found: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            found_prefix: "The following nodes were found: ".to_string(),
            not_found: "Nothing found, please type a valid node id or node group!".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub default: LayoutMode,
    pub animate: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            default: LayoutMode::Breadthfirst,
            animate: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Every n-th slider key gets a visible label.
    pub mark_stride: usize,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self { mark_stride: 40 }
    }
}

#[derive(Debug, Error)]
pub enum ViewConfigError {
    #[error("failed to parse view config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read view config from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Handle for accessing the view configuration.
#[derive(Resource, Debug, Clone)]
pub struct ViewConfigHandle(pub Arc<ViewConfig>);

impl ViewConfigHandle {
    pub fn new(config: Arc<ViewConfig>) -> Self {
        Self(config)
    }

    pub fn get(&self) -> Arc<ViewConfig> {
        Arc::clone(&self.0)
    }
}

/// Metadata about the view configuration source.
#[derive(Resource, Debug, Clone)]
pub struct ViewConfigMetadata {
    path: Option<PathBuf>,
}

impl ViewConfigMetadata {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    pub fn path(&self) -> Option<&PathBuf> {
        self.path.as_ref()
    }
}

/// Load the view configuration from an explicit path, the environment, or
/// fall back to the builtin copy.
pub fn load_view_config(explicit: Option<&Path>) -> (Arc<ViewConfig>, ViewConfigMetadata) {
    let candidate = explicit
        .map(Path::to_path_buf)
        .or_else(|| env::var(VIEW_CONFIG_ENV).ok().map(PathBuf::from));

    if let Some(path) = candidate {
        match ViewConfig::from_file(&path) {
            Ok(config) => {
                tracing::info!(
                    target: "leaf::config",
                    path = %path.display(),
                    "view_config.loaded=file"
                );
                return (Arc::new(config), ViewConfigMetadata::new(Some(path)));
            }
            Err(err) => {
                tracing::warn!(
                    target: "leaf::config",
                    path = %path.display(),
                    error = %err,
                    "view_config.load_failed"
                );
            }
        }
    }

    let config = ViewConfig::builtin();
    tracing::info!(target: "leaf::config", "view_config.loaded=builtin");
    (config, ViewConfigMetadata::new(None))
}
