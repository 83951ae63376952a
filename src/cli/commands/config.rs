//! `glazier config` command - Configuration management
//!
//! Shows the effective configuration and where it comes from.

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{discover_project, load_config};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::Config;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration values
    Show(ShowArgs),

    /// Show paths to configuration files
    Path,

    /// List all available configuration keys
    Keys,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Show only this key's value
    pub key: Option<String>,
}

/// Valid configuration keys
const VALID_KEYS: &[(&str, &str)] = &[
    ("tech", "Field tech assigned to new tickets (env GLAZIER_TECH)"),
    ("tolerance", "Allowed mismatch in inches, default 0.02 (env GLAZIER_TOLERANCE)"),
    ("lookup_url", "Customer lookup endpoint (env GLAZIER_LOOKUP_URL)"),
    ("lookup_timeout_secs", "Customer lookup timeout, default 5"),
    ("default_format", "Default output format (yaml, json, tsv, etc.)"),
];

/// Run a config subcommand
pub fn run(cmd: ConfigCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ConfigCommands::Show(args) => run_show(args, global),
        ConfigCommands::Path => run_path(global),
        ConfigCommands::Keys => run_keys(),
    }
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global);

    if let Some(key) = &args.key {
        return match get_config_value(&config, key) {
            Some(value) => {
                println!("{}", value);
                Ok(())
            }
            None if VALID_KEYS.iter().any(|(k, _)| k == key) => {
                Err(miette::miette!("Key '{}' is not set", key))
            }
            None => Err(miette::miette!(
                help = "Run 'glazier config keys' to list them",
                "Unknown configuration key '{}'",
                key
            )),
        };
    }

    match global.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&config).into_diagnostic()?),
        OutputFormat::Yaml => print!("{}", serde_yml::to_string(&config).into_diagnostic()?),
        _ => {
            println!("{}", style("Effective Configuration").bold().underlined());
            println!();
            for (key, _) in VALID_KEYS {
                print_config_value(key, get_config_value(&config, key).as_deref());
            }

            println!();
            println!("{}", style("Config Sources (in priority order):").dim());
            println!("  1. Environment variables (GLAZIER_TECH, GLAZIER_LOOKUP_URL, GLAZIER_TOLERANCE)");
            println!("  2. Project config (.glazier/config.yaml)");
            println!("  3. Global config (~/.config/glazier/config.yaml)");
        }
    }

    Ok(())
}

fn run_path(global: &GlobalOpts) -> Result<()> {
    match discover_project(global) {
        Ok(project) => println!("Project: {}", project.config_path().display()),
        Err(_) => println!("Project: {}", style("(not in a Glazier project)").dim()),
    }
    match Config::global_config_path() {
        Some(path) => println!("Global:  {}", path.display()),
        None => println!("Global:  {}", style("(no home directory)").dim()),
    }
    Ok(())
}

fn run_keys() -> Result<()> {
    println!("{}", style("Available configuration keys:").bold());
    println!();
    for (key, description) in VALID_KEYS {
        println!("  {:<22} {}", style(key).cyan(), description);
    }
    Ok(())
}

/// Effective value of a key, with built-in defaults applied
fn get_config_value(config: &Config, key: &str) -> Option<String> {
    match key {
        "tech" => config.tech().map(String::from),
        "tolerance" => Some(config.tolerance().to_string()),
        "lookup_url" => config.lookup_url().map(String::from),
        "lookup_timeout_secs" => Some(config.lookup_timeout().as_secs().to_string()),
        "default_format" => config.default_format.clone(),
        _ => None,
    }
}

fn print_config_value(key: &str, value: Option<&str>) {
    match value {
        Some(v) => println!("  {:<22} {}", style(key).cyan(), v),
        None => println!("  {:<22} {}", style(key).cyan(), style("(not set)").dim()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_reported() {
        let config = Config::default();
        assert_eq!(get_config_value(&config, "tolerance").as_deref(), Some("0.02"));
        assert_eq!(get_config_value(&config, "lookup_timeout_secs").as_deref(), Some("5"));
        assert_eq!(get_config_value(&config, "tech"), None);
        assert_eq!(get_config_value(&config, "bogus"), None);
    }

    #[test]
    fn test_every_key_is_readable() {
        let config = Config {
            tech: Some("Sam".to_string()),
            tolerance: Some(0.05),
            lookup_url: Some("http://localhost/customers".to_string()),
            lookup_timeout_secs: Some(2),
            default_format: Some("json".to_string()),
        };
        for (key, _) in VALID_KEYS {
            assert!(get_config_value(&config, key).is_some(), "{key} unreadable");
        }
    }
}
