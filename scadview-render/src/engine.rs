//! CAD engines that turn a model into an OFF file

use crate::config::RenderConfig;
use crate::error::{RenderError, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info, warn};

/// Search path variable understood by OpenSCAD
pub const OPENSCADPATH: &str = "OPENSCADPATH";

/// Exit status of an engine run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineStatus {
    /// `None` when the process was terminated by a signal
    pub code: Option<i32>,
}

impl EngineStatus {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl From<std::process::ExitStatus> for EngineStatus {
    fn from(status: std::process::ExitStatus) -> Self {
        Self {
            code: status.code(),
        }
    }
}

/// Something that can evaluate a model source into an OFF file
pub trait CadEngine {
    /// Evaluate `source` and write the resulting polyhedron to `output`
    fn evaluate(&self, source: &Path, output: &Path, config: &RenderConfig) -> Result<EngineStatus>;
}

/// Runs the OpenSCAD command line binary
#[derive(Debug, Clone, Default)]
pub struct OpenScadCli {
    /// Bundled library directory, searched before anything else
    pub library_dir: Option<PathBuf>,
}

impl OpenScadCli {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_library_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.library_dir = Some(dir.into());
        self
    }

    /// Command line arguments for one evaluation
    pub fn arguments(&self, source: &Path, output: &Path, config: &RenderConfig) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            source.into(),
            "-o".into(),
            output.into(),
            format!("--backend={}", config.backend).into(),
            "--export-format=off".into(),
        ];
        args.extend(
            config
                .defines
                .iter()
                .map(|(name, value)| value.define(name).into()),
        );
        args.extend(config.features.iter().map(|f| format!("--enable={}", f).into()));
        args.extend(config.extra_args.iter().map(OsString::from));
        args
    }

    /// `OPENSCADPATH` value: library dir, then the inherited value, then configured paths
    pub fn search_path(&self, inherited: Option<OsString>, config: &RenderConfig) -> Option<OsString> {
        let mut entries: Vec<OsString> = Vec::new();
        if let Some(dir) = &self.library_dir {
            entries.push(dir.into());
        }
        if let Some(inherited) = inherited.filter(|value| !value.is_empty()) {
            entries.push(inherited);
        }
        entries.extend(config.library_paths.iter().map(OsString::from));

        let mut entries = entries.into_iter();
        let mut joined = entries.next()?;
        for entry in entries {
            joined.push(":");
            joined.push(entry);
        }
        Some(joined)
    }
}

impl CadEngine for OpenScadCli {
    fn evaluate(&self, source: &Path, output: &Path, config: &RenderConfig) -> Result<EngineStatus> {
        let program = config.executable();
        let mut command = Command::new(&program);
        command.args(self.arguments(source, output, config));
        if let Some(path) = self.search_path(std::env::var_os(OPENSCADPATH), config) {
            debug!("{}={:?}", OPENSCADPATH, path);
            command.env(OPENSCADPATH, path);
        }

        info!("Evaluating {} with {}", source.display(), program.display());
        let result = command
            .output()
            .map_err(|source| RenderError::Spawn { program, source })?;

        for line in String::from_utf8_lossy(&result.stdout).lines() {
            info!(target: "openscad", "{}", line);
        }
        for line in String::from_utf8_lossy(&result.stderr).lines() {
            if line.starts_with("ERROR") || line.starts_with("WARNING") {
                warn!(target: "openscad", "{}", line);
            } else {
                info!(target: "openscad", "{}", line);
            }
        }

        Ok(result.status.into())
    }
}
