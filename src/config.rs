//! Report configuration loaded from TOML
//!
//! # Example wta-stats.toml
//!
//! ```toml
//! trace = "traces/alibaba/workflows.jsonl"
//! workload_name = "alibaba_2018"
//! output_folder = "report"
//! html_report = true
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Settings for one report run
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ReportConfig {
    /// Trace file with job records
    #[serde(default)]
    pub trace: Option<PathBuf>,

    /// Name used in output file names
    #[serde(default)]
    pub workload_name: Option<String>,

    /// Existing directory receiving the image and report
    #[serde(default = "default_output_folder")]
    pub output_folder: PathBuf,

    /// Also write an HTML report embedding the image
    #[serde(default = "default_html_report")]
    pub html_report: bool,
}

fn default_output_folder() -> PathBuf {
    PathBuf::from(".")
}

fn default_html_report() -> bool {
    true
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            trace: None,
            workload_name: None,
            output_folder: default_output_folder(),
            html_report: default_html_report(),
        }
    }
}

impl ReportConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML")
    }
}
