//! `glazier init` command - Initialize a new Glazier project

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::core::project::{Project, ProjectError, PROJECT_DIR, STORE_FILE};

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize (default: current directory)
    #[arg(default_value = ".")]
    pub path: std::path::PathBuf,

    /// Rewrite the config even if .glazier/ already exists (tickets are kept)
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs) -> Result<()> {
    let path = if args.path.as_os_str() == "." {
        std::env::current_dir().into_diagnostic()?
    } else {
        args.path.clone()
    };

    if !path.exists() {
        std::fs::create_dir_all(&path).into_diagnostic()?;
        println!(
            "{} Created directory {}",
            style("✓").green(),
            style(path.display()).cyan()
        );
    }

    let project = if args.force {
        Project::init_force(&path)
    } else {
        Project::init(&path)
    };

    match project {
        Ok(project) => {
            println!(
                "{} Initialized Glazier project at {}",
                style("✓").green(),
                style(project.root().display()).cyan()
            );
            println!();
            println!("Created project structure:");
            for entry in [
                format!("{}/", PROJECT_DIR),
                format!("{}/config.yaml", PROJECT_DIR),
                STORE_FILE.to_string(),
            ] {
                println!("  {}", style(entry).dim());
            }
            println!();
            println!("Next steps:");
            println!(
                "  {} Enter your first ticket",
                style("glazier ticket new -i").yellow()
            );
            println!(
                "  {} Check a set of measurements",
                style("glazier check --door 30 --panel 20 --overall 50").yellow()
            );
            println!(
                "  {} Validate the ticket store",
                style("glazier validate").yellow()
            );
            Ok(())
        }
        Err(ProjectError::AlreadyExists(path)) => {
            println!(
                "{} Glazier project already exists at {}",
                style("!").yellow(),
                style(path.display()).cyan()
            );
            println!();
            println!(
                "Use {} to reinitialize",
                style("glazier init --force").yellow()
            );
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
