//! Configuration for the upload service

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::tools::StageCommand;

/// Environment variable naming a TOML config file
pub const CONFIG_ENV: &str = "APNEA_CONFIG";

/// Main service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Working directory layout
    pub storage: StorageConfig,
    /// External tool pipeline
    pub pipeline: PipelineConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file. Missing sections keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load from an explicit path, else `APNEA_CONFIG`, else defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }

        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(PathBuf::from(path)),
            None => Ok(Self::default()),
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
    /// Maximum upload size in bytes (default: 512MB)
    pub max_upload_size: usize,
    /// Directory with a built web frontend, served for unmatched routes
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            enable_cors: true,
            max_upload_size: 512 * 1024 * 1024, // recordings run to hundreds of MB
            static_dir: None,
        }
    }
}

/// Working directory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory uploads are saved into
    pub upload_dir: PathBuf,
    /// Sub-directory for header-repaired recordings
    pub fixed_subdir: String,
    /// Prefix added to repaired file names
    pub fixed_prefix: String,
    /// Sub-directory for ASCII conversions
    pub ascii_subdir: String,
    /// Suffix appended to ASCII file names
    pub ascii_suffix: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("uploads"),
            fixed_subdir: "fixed".to_string(),
            fixed_prefix: "fixed_".to_string(),
            ascii_subdir: "ascii".to_string(),
            ascii_suffix: ".ascii".to_string(),
        }
    }
}

/// External tool pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Header repair stage
    pub repair: StageCommand,
    /// Conversion to ASCII stage
    pub conversion: StageCommand,
    /// Analysis stage
    pub analysis: StageCommand,
    /// Run the analysis stage. When off, a job completes after conversion
    /// with a fixed confirmation string as its result.
    pub run_analysis: bool,
    /// Working directory for every tool invocation (default: process cwd)
    pub working_dir: Option<PathBuf>,
    /// Jobs allowed to run their pipeline at the same time
    pub max_concurrent_jobs: Option<usize>,
    /// Submitted jobs buffered ahead of the workers
    pub queue_capacity: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            repair: StageCommand::new(
                "bash",
                ["scripts/edf-hdr-repair.sh", "{input}", "{output}"],
            ),
            conversion: StageCommand::new(
                "python",
                [
                    "scripts/convert_rec_to_ascii.py",
                    "{input}",
                    "{output}",
                    "{channel}",
                ],
            ),
            analysis: StageCommand::new("python", ["scripts/analyze_data.py", "{input}"]),
            run_analysis: true,
            working_dir: None,
            max_concurrent_jobs: None, // Auto-detect from CPU count
            queue_capacity: 1000,
        }
    }
}

impl PipelineConfig {
    /// Effective concurrency bound for pipeline runs
    pub fn concurrency(&self) -> usize {
        self.max_concurrent_jobs
            .unwrap_or_else(|| num_cpus::get().min(4))
            .max(1)
    }
}
