//! `glazier tech` command - a field tech's assigned tickets

use miette::Result;

use crate::cli::commands::ticket::print_ticket_list;
use crate::cli::helpers::{effective_format, open_workspace, Workspace};
use crate::cli::{GlobalOpts, OutputFormat};

#[derive(clap::Args, Debug)]
pub struct TechArgs {
    /// Tech name, matched case-insensitively as a substring (default: configured tech)
    pub name: Option<String>,
}

pub fn run(args: TechArgs, global: &GlobalOpts) -> Result<()> {
    let Workspace { config, store, .. } = open_workspace(global)?;

    let name = args
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .or_else(|| config.tech())
        .ok_or_else(|| {
            miette::miette!(
                help = "Pass a name, or set 'tech' in .glazier/config.yaml or GLAZIER_TECH",
                "No tech name given"
            )
        })?;

    let tickets = store.assigned_to(name);
    tracing::debug!(tech = name, count = tickets.len(), "tech lookup");

    let format = effective_format(global, &config, OutputFormat::Tsv);
    print_ticket_list(&tickets, format, global)
}
