//! Configuration management with layered hierarchy

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::Project;
use crate::entities::ticket::DEFAULT_TOLERANCE;

/// Default timeout for the customer lookup request
const DEFAULT_LOOKUP_TIMEOUT_SECS: u64 = 5;

/// Glazier configuration with layered hierarchy
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Field tech name, used as the default assignee for new tickets
    pub tech: Option<String>,

    /// Allowed mismatch in inches when checking measurements
    pub tolerance: Option<f64>,

    /// Customer lookup endpoint
    pub lookup_url: Option<String>,

    /// Customer lookup timeout in seconds
    pub lookup_timeout_secs: Option<u64>,

    /// Default output format
    pub default_format: Option<String>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let project = Project::discover().ok();
        Self::load_for(project.as_ref())
    }

    /// Load configuration for a known project (or none)
    pub fn load_for(project: Option<&Project>) -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (already in Default impl)

        // 2. Global user config (~/.config/glazier/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if let Some(global) = Self::read_file(&global_path) {
                config.merge(global);
            }
        }

        // 3. Project config (.glazier/config.yaml)
        if let Some(project) = project {
            if let Some(project_config) = Self::read_file(&project.config_path()) {
                config.merge(project_config);
            }
        }

        // 4. Environment variables
        if let Ok(tech) = std::env::var("GLAZIER_TECH") {
            config.tech = Some(tech);
        }
        if let Ok(url) = std::env::var("GLAZIER_LOOKUP_URL") {
            config.lookup_url = Some(url);
        }
        if let Ok(tolerance) = std::env::var("GLAZIER_TOLERANCE") {
            match tolerance.parse::<f64>() {
                Ok(t) => config.tolerance = Some(t),
                Err(_) => tracing::warn!(value = %tolerance, "ignoring unparseable GLAZIER_TOLERANCE"),
            }
        }

        config
    }

    fn read_file(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        let contents = std::fs::read_to_string(path).ok()?;
        if !has_settings(&contents) {
            return None;
        }
        match serde_yml::from_str::<Config>(&contents) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping unreadable config file");
                None
            }
        }
    }

    /// Get the path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "glazier")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.tech.is_some() {
            self.tech = other.tech;
        }
        if other.tolerance.is_some() {
            self.tolerance = other.tolerance;
        }
        if other.lookup_url.is_some() {
            self.lookup_url = other.lookup_url;
        }
        if other.lookup_timeout_secs.is_some() {
            self.lookup_timeout_secs = other.lookup_timeout_secs;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
    }

    /// Measurement tolerance, never negative
    pub fn tolerance(&self) -> f64 {
        self.tolerance
            .filter(|t| t.is_finite() && *t >= 0.0)
            .unwrap_or(DEFAULT_TOLERANCE)
    }

    pub fn lookup_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(
            self.lookup_timeout_secs
                .unwrap_or(DEFAULT_LOOKUP_TIMEOUT_SECS),
        )
    }

    /// Configured lookup endpoint, if any non-blank one is set
    pub fn lookup_url(&self) -> Option<&str> {
        self.lookup_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
    }

    /// Default tech name for new tickets, if any non-blank one is set
    pub fn tech(&self) -> Option<&str> {
        self.tech.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }
}

/// False for a document holding nothing but comments and blank lines
fn has_settings(contents: &str) -> bool {
    contents
        .lines()
        .map(str::trim)
        .any(|line| !line.is_empty() && !line.starts_with('#') && line != "---")
}
