//! Calibration configuration management.
//!
//! Configuration is loaded from YAML once by the caller and handed to the
//! analyzer, tracker and builder constructors as explicit sections.

mod defaults;


pub use defaults::{AnalyzerConfig, ConvergenceConfig, NeutralTargets, ProfileConfig};

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "PRINTCAL_CONFIG";

/// Canonical list of candidate config file names we search for on disk.
const CONFIG_FILENAMES: &[&str] = &["printcal.yml", "printcal.yaml"];

/// Complete configuration file structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CalibrationConfig {
    pub analyzer: AnalyzerConfig,
    pub convergence: ConvergenceConfig,
    pub targets: NeutralTargets,
    pub profile: ProfileConfig,
}

impl CalibrationConfig {
    pub fn sanitize(mut self) -> Self {
        self.analyzer.sanitize();
        self.convergence.sanitize();
        self.targets.sanitize();
        self.profile.sanitize();
        self
    }

    /// Parse and sanitize a YAML document
    pub fn from_yaml(contents: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str::<CalibrationConfig>(contents).map(Self::sanitize)
    }
}

/// Loaded configuration with its source path and any warnings raised while searching.
#[derive(Debug, Clone)]
pub struct CalibrationConfigHandle {
    pub config: CalibrationConfig,
    pub source: Option<PathBuf>,
    pub warnings: Vec<String>,
}

impl CalibrationConfigHandle {
    fn with_config(
        config: CalibrationConfig,
        source: Option<PathBuf>,
        warnings: Vec<String>,
    ) -> Self {
        Self {
            config,
            source,
            warnings,
        }
    }
}

/// Load configuration from disk, optionally forcing a specific path.
///
/// Candidates that are missing are skipped; candidates that fail to read or
/// parse add a warning and the search continues. Falls back to built-in defaults.
pub fn load_calibration_config(custom_path: Option<&Path>) -> CalibrationConfigHandle {
    let mut warnings = Vec::new();

    for candidate in get_config_candidates(custom_path) {
        if !candidate.is_file() {
            continue;
        }

        match fs::read_to_string(&candidate) {
            Ok(contents) => match CalibrationConfig::from_yaml(&contents) {
                Ok(config) => {
                    let source = fs::canonicalize(&candidate).unwrap_or(candidate);
                    info!("Loaded calibration config from {}", source.display());
                    return CalibrationConfigHandle::with_config(config, Some(source), warnings);
                }
                Err(err) => {
                    let message = format!(
                        "Failed to parse calibration config {}: {}",
                        candidate.display(),
                        err
                    );
                    warn!("{}", message);
                    warnings.push(message);
                }
            },
            Err(err) => {
                let message = format!(
                    "Failed to read calibration config {}: {}",
                    candidate.display(),
                    err
                );
                warn!("{}", message);
                warnings.push(message);
            }
        }
    }

    debug!("No calibration config found; using built-in defaults");
    warnings.push("No calibration config found; using built-in defaults.".to_string());
    CalibrationConfigHandle::with_config(CalibrationConfig::default(), None, warnings)
}

/// Get list of config file candidates to try
fn get_config_candidates(custom_path: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Some(path) = custom_path {
        candidates.push(path.to_path_buf());
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
        candidates.push(PathBuf::from(env_path));
    }

    if let Ok(cwd) = std::env::current_dir() {
        for name in CONFIG_FILENAMES {
            candidates.push(cwd.join("config").join(name));
            candidates.push(cwd.join(name));
        }
    }

    if let Some(home_dir) = dirs::home_dir() {
        for name in CONFIG_FILENAMES {
            candidates.push(home_dir.join("printcal").join(name));
        }
    }

    candidates
}
