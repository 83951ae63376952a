//! Project discovery and structure

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the marker directory at the project root
pub const PROJECT_DIR: &str = ".glazier";

/// File holding the ticket store (named after the browser storage key)
pub const STORE_FILE: &str = "shower-tickets-v1.json";

/// Represents a Glazier project
#[derive(Debug, Clone)]
pub struct Project {
    /// Root directory of the project (parent of .glazier/)
    root: PathBuf,
}

impl Project {
    /// Find project root by walking up from the current directory
    pub fn discover() -> Result<Self, ProjectError> {
        let current = std::env::current_dir().map_err(|e| ProjectError::IoError(e.to_string()))?;
        Self::discover_from(&current)
    }

    /// Find project root by walking up from the given directory
    pub fn discover_from(start: &Path) -> Result<Self, ProjectError> {
        let mut current = start
            .canonicalize()
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        loop {
            if current.join(PROJECT_DIR).is_dir() {
                return Ok(Self { root: current });
            }

            if !current.pop() {
                return Err(ProjectError::NotFound {
                    searched_from: start.to_path_buf(),
                });
            }
        }
    }

    /// Create a new project structure at the given path
    pub fn init(path: &Path) -> Result<Self, ProjectError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

        if root.join(PROJECT_DIR).exists() {
            return Err(ProjectError::AlreadyExists(root));
        }

        Self::write_structure(root)
    }

    /// Force initialization even if .glazier/ exists.
    ///
    /// The config is rewritten; an existing ticket store is left alone.
    pub fn init_force(path: &Path) -> Result<Self, ProjectError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        Self::write_structure(root)
    }

    fn write_structure(root: PathBuf) -> Result<Self, ProjectError> {
        let project = Self { root };

        std::fs::create_dir_all(project.glazier_dir())
            .map_err(|e| ProjectError::IoError(e.to_string()))?;
        std::fs::write(project.config_path(), Self::default_config())
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        let store = project.store_path();
        if !store.exists() {
            std::fs::write(&store, "[]\n").map_err(|e| ProjectError::IoError(e.to_string()))?;
        }

        Ok(project)
    }

    pub(crate) fn default_config() -> &'static str {
        r#"# Glazier Project Configuration

# Field tech name used as the default assignee for new tickets
# tech: ""

# Allowed mismatch between door + panel + outages and overall width (inches)
# tolerance: 0.02

# Customer lookup endpoint, queried as GET <url>?q=<query>
# lookup_url: ""

# Default output format (auto, yaml, tsv, json, csv, md, id)
# default_format: auto
"#
    }

    /// Get the project root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the .glazier configuration directory
    pub fn glazier_dir(&self) -> PathBuf {
        self.root.join(PROJECT_DIR)
    }

    /// Get the project config file path
    pub fn config_path(&self) -> PathBuf {
        self.glazier_dir().join("config.yaml")
    }

    /// Get the ticket store path
    pub fn store_path(&self) -> PathBuf {
        self.root.join(STORE_FILE)
    }
}

/// Errors that can occur during project operations
#[derive(Debug, Error, miette::Diagnostic)]
pub enum ProjectError {
    #[error("not a Glazier project (searched from {searched_from:?})")]
    #[diagnostic(
        code(glazier::project::not_found),
        help("Run 'glazier init' to create one")
    )]
    NotFound { searched_from: PathBuf },

    #[error("Glazier project already exists at {0:?}")]
    AlreadyExists(PathBuf),

    #[error("IO error: {0}")]
    IoError(String),
}
