//! Shared helper functions for CLI commands
//!
//! This module contains utility functions that are used across multiple
//! command modules to avoid code duplication.

use clap::ValueEnum;
use miette::Result;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::project::Project;
use crate::core::store::TicketStore;
use crate::core::Config;

/// Everything a ticket command needs: the project's config and store
pub struct Workspace {
    pub config: Config,
    pub store: TicketStore,
}

/// Locate the project, honouring `--project` when given
pub fn discover_project(global: &GlobalOpts) -> Result<Project> {
    let project = match &global.project {
        Some(path) => Project::discover_from(path)?,
        None => Project::discover()?,
    };
    tracing::debug!(root = %project.root().display(), "using project");
    Ok(project)
}

/// Open the project, its layered config and the ticket store
pub fn open_workspace(global: &GlobalOpts) -> Result<Workspace> {
    let project = discover_project(global)?;
    let config = Config::load_for(Some(&project));
    let store = TicketStore::open(&project)?;
    Ok(Workspace { config, store })
}

/// Config for commands that work with or without a project
pub fn load_config(global: &GlobalOpts) -> Config {
    match discover_project(global) {
        Ok(project) => Config::load_for(Some(&project)),
        Err(_) => Config::load_for(None),
    }
}

/// Resolve `--format auto` using the configured default, then `fallback`
pub fn effective_format(global: &GlobalOpts, config: &Config, fallback: OutputFormat) -> OutputFormat {
    if global.format != OutputFormat::Auto {
        return global.format;
    }
    config
        .default_format
        .as_deref()
        .and_then(|name| OutputFormat::from_str(name, true).ok())
        .filter(|f| *f != OutputFormat::Auto)
        .unwrap_or(fallback)
}

/// Truncate a string to max_len characters, adding "..." if truncated
///
/// Useful for table columns that need fixed-width output.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
