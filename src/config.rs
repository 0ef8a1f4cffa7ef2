// Configuration loading and parsing (config/solver.toml).

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },
}

/// Tunable knobs for the solver pipeline, loaded from `config/solver.toml`.
///
/// Unlike the request-level parameters in `solver::SolverRequest` (budget,
/// min_chemistry, owned/include sets), these govern how the candidate
/// provider and solver behave regardless of which squad is being built.
#[derive(Debug, Clone, Deserialize)]
pub struct SolverConfig {
    /// Per-slot candidate rating floor (§4.2 rule 2); bypassed for required
    /// players.
    pub min_rating: f64,
    /// Per-slot candidate pool size before the required-player bypass is
    /// added on top.
    pub candidate_limit: usize,
    /// Wall-clock budget handed to the MILP solver per request.
    pub timeout_seconds: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            min_rating: 75.0,
            candidate_limit: 30,
            timeout_seconds: 10,
        }
    }
}

/// Raw deserialization target for the entire solver.toml file.
#[derive(Debug, Deserialize)]
struct SolverConfigFile {
    solver: SolverConfig,
}

fn validate(config: &SolverConfig) -> Result<(), ConfigError> {
    if !(0.0..=99.0).contains(&config.min_rating) {
        return Err(ConfigError::ValidationError {
            field: "min_rating".to_string(),
            message: format!("must be in [0, 99], got {}", config.min_rating),
        });
    }
    if config.candidate_limit == 0 {
        return Err(ConfigError::ValidationError {
            field: "candidate_limit".to_string(),
            message: "must be at least 1".to_string(),
        });
    }
    if config.timeout_seconds == 0 {
        return Err(ConfigError::ValidationError {
            field: "timeout_seconds".to_string(),
            message: "must be at least 1".to_string(),
        });
    }
    Ok(())
}

/// Load `config/solver.toml` relative to `base_dir`.
///
/// This is the lower-level loading primitive used by tests; prefer
/// `load_config()` for the cwd-relative convenience wrapper.
pub(crate) fn load_config_from(base_dir: &Path) -> Result<SolverConfig, ConfigError> {
    let path = base_dir.join("config").join("solver.toml");
    let text = read_file(&path)?;
    let file: SolverConfigFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    validate(&file.solver)?;
    Ok(file.solver)
}

/// Convenience wrapper: loads `config/solver.toml` relative to the current
/// working directory, falling back to defaults if the file is absent.
pub fn load_config() -> Result<SolverConfig, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    let path = cwd.join("config").join("solver.toml");
    if !path.exists() {
        return Ok(SolverConfig::default());
    }
    load_config_from(&cwd)
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}
