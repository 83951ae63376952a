//! `glazier validate` command - Validate the ticket store
//!
//! Two passes: the store text is checked against the embedded JSON Schema,
//! then every ticket's measurements are re-checked and compared with the
//! result stored on the ticket.

use console::style;
use miette::Result;
use std::path::PathBuf;

use crate::cli::helpers::{discover_project, load_config};
use crate::cli::GlobalOpts;
use crate::core::store::TicketStore;
use crate::schema::registry::SchemaRegistry;
use crate::schema::validator::Validator;

#[derive(clap::Args, Debug)]
pub struct ValidateArgs {
    /// Store file to validate (default: the project's ticket store)
    #[arg()]
    pub path: Option<PathBuf>,

    /// Rewrite stale check results on tickets in-place
    #[arg(long)]
    pub fix: bool,

    /// Show summary only, don't show individual errors
    #[arg(long)]
    pub summary: bool,
}

/// Validation statistics
#[derive(Default)]
struct ValidationStats {
    tickets_checked: usize,
    invalid: usize,
    stale: usize,
    fixed: usize,
}

pub fn run(args: ValidateArgs, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global);
    let path = match args.path {
        Some(path) => path,
        None => discover_project(global)?.store_path(),
    };

    if !path.exists() {
        println!(
            "{} No ticket store at {}; nothing to validate",
            style("!").yellow(),
            style(path.display()).cyan()
        );
        return Ok(());
    }

    println!(
        "{} Validating {}...\n",
        style("→").blue(),
        style(path.display()).cyan()
    );

    let source = std::fs::read_to_string(&path)
        .map_err(|e| miette::miette!("Failed to read {}: {}", path.display(), e))?;
    let filename = path
        .file_name()
        .map(|f| f.to_string_lossy().to_string())
        .unwrap_or_default();

    let registry = SchemaRegistry::default();
    let validator = Validator::new(&registry)?;
    if let Err(e) = validator.validate(&source, &filename) {
        let count = e.violation_count();
        if !args.summary {
            // Print detailed error using miette
            let report = miette::Report::new(e);
            println!("{:?}", report);
        }
        return Err(miette::miette!(
            "Validation failed: {} schema error(s) in {}",
            count,
            filename
        ));
    }
    println!("{} Schema OK", style("✓").green());

    let mut store = TicketStore::open_path(&path)?;
    let tolerance = config.tolerance();
    let mut stats = ValidationStats::default();

    for ticket in store.tickets() {
        let check = ticket.check(tolerance);
        stats.tickets_checked += 1;

        if !check.valid {
            stats.invalid += 1;
            if !args.summary {
                println!(
                    "{} {} - {}",
                    style("✗").red(),
                    style(&ticket.ticket_number).cyan(),
                    check.message
                );
            }
        }

        if ticket.is_check_stale(&check) {
            stats.stale += 1;
            if !args.summary {
                println!(
                    "{} {} - stored result is out of date",
                    style("!").yellow(),
                    style(&ticket.ticket_number).cyan()
                );
            }
        }
    }

    if args.fix && stats.stale > 0 {
        stats.fixed = store.recheck_all(tolerance);
        store.save()?;
    }

    println!();
    println!("{}", style("Summary").bold());
    println!("  Tickets checked:   {}", style(stats.tickets_checked).cyan());
    println!("  Not adding up:     {}", style(stats.invalid).cyan());
    println!("  Stale results:     {}", style(stats.stale).cyan());
    if stats.fixed > 0 {
        println!("  Tickets fixed:     {}", style(stats.fixed).cyan());
    }
    println!();

    if stats.stale > stats.fixed {
        Err(miette::miette!(
            help = "Run 'glazier validate --fix' to store fresh results",
            "Validation failed: {} ticket(s) have stale check results",
            stats.stale - stats.fixed
        ))
    } else {
        println!(
            "{} Ticket store passed validation!",
            style("✓").green().bold()
        );
        Ok(())
    }
}
