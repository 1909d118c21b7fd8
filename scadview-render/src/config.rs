//! Render configuration

use crate::error::Result;
use crate::value::ScadValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Program name used when no executable is configured
pub const DEFAULT_EXECUTABLE: &str = "openscad";

/// Geometry backend passed as `--backend=`
pub const DEFAULT_BACKEND: &str = "manifold";

/// Settings for evaluating a model and exporting its preview
///
/// Every field has a default, so an empty JSON object is a valid configuration:
///
/// ```json
/// {
///   "executable": "/usr/bin/openscad",
///   "libraryPaths": ["/opt/scad-libs"],
///   "defines": { "$fn": 64, "label": "M3" },
///   "features": ["textmetrics"],
///   "vertexColors": true
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderConfig {
    /// OpenSCAD binary; resolved through `PATH` when relative
    pub executable: Option<PathBuf>,
    /// Extra entries appended to `OPENSCADPATH`
    pub library_paths: Vec<PathBuf>,
    pub backend: String,
    /// Variables passed as `-Dname=value`
    pub defines: BTreeMap<String, ScadValue>,
    /// Experimental features passed as `--enable=`
    pub features: Vec<String>,
    /// Arguments appended verbatim after everything else
    pub extra_args: Vec<String>,
    /// Export per-vertex `COLOR_0` alongside the materials
    pub vertex_colors: bool,
    /// Add the two directional lights to the scene
    pub lights: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        let mut defines = BTreeMap::new();
        defines.insert("$preview".to_string(), ScadValue::Bool(true));
        Self {
            executable: None,
            library_paths: Vec::new(),
            backend: DEFAULT_BACKEND.to_string(),
            defines,
            features: Vec::new(),
            extra_args: Vec::new(),
            vertex_colors: false,
            lights: true,
        }
    }
}

impl RenderConfig {
    /// Parse a configuration from JSON text
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load a configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Executable to spawn
    pub fn executable(&self) -> PathBuf {
        self.executable
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_EXECUTABLE))
    }

    pub fn with_executable<P: Into<PathBuf>>(mut self, executable: P) -> Self {
        self.executable = Some(executable.into());
        self
    }

    pub fn with_library_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.library_paths.push(path.into());
        self
    }

    pub fn with_define<S: Into<String>, V: Into<ScadValue>>(mut self, name: S, value: V) -> Self {
        self.defines.insert(name.into(), value.into());
        self
    }

    pub fn with_feature<S: Into<String>>(mut self, feature: S) -> Self {
        self.features.push(feature.into());
        self
    }

    pub fn with_vertex_colors(mut self, enabled: bool) -> Self {
        self.vertex_colors = enabled;
        self
    }

    pub fn with_lights(mut self, enabled: bool) -> Self {
        self.lights = enabled;
        self
    }
}
