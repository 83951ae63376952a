//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    check::CheckArgs, completions::CompletionsArgs, config::ConfigCommands,
    customer::CustomerCommands, init::InitArgs, measure::MeasureArgs, tech::TechArgs,
    ticket::TicketCommands, validate::ValidateArgs,
};

#[derive(Parser)]
#[command(name = "glazier")]
#[command(author, version, about = "Shower-door installation tickets")]
#[command(long_about = "A Unix-style toolkit for shower-door installation tickets: \
parse tape-measure input, check door + panel + outages against the opening, \
keep tickets in a plain JSON store and draw the layout as SVG.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Project root (default: auto-detect by finding .glazier/)
    #[arg(long, global = true)]
    pub project: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new Glazier project
    Init(InitArgs),

    /// Ticket management
    #[command(subcommand)]
    Ticket(TicketCommands),

    /// Check door + panel + outages against an overall width
    Check(CheckArgs),

    /// Parse tape-measure values into inches
    Measure(MeasureArgs),

    /// List the tickets assigned to a field tech
    Tech(TechArgs),

    /// Customer lookup
    #[command(subcommand)]
    Customer(CustomerCommands),

    /// Validate the ticket store against its schema
    Validate(ValidateArgs),

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Automatically detect based on context (card for show, tsv for list)
    #[default]
    Auto,
    /// YAML format (full fidelity)
    Yaml,
    /// Tab-separated values (for piping)
    Tsv,
    /// JSON format (for programming)
    Json,
    /// CSV format (for spreadsheets)
    Csv,
    /// Markdown tables
    Md,
    /// Just IDs, one per line
    Id,
}
