//! `glazier ticket` command - Ticket management

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

use crate::cli::helpers::{effective_format, open_workspace, Workspace};
use crate::cli::table::{TableConfig, TableFormatter, TableRow, TICKET_COLUMNS};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::lookup::CustomerLookup;
use crate::core::measure::parse_measurement;
use crate::diagram::render_svg;
use crate::entities::ticket::{Direction, Edge, GlassColor, Outage, Side, Ticket};
use crate::schema::template::TemplateGenerator;
use crate::schema::wizard::{TicketWizard, WizardDefaults};

#[derive(Subcommand, Debug)]
pub enum TicketCommands {
    /// Enter a new ticket
    New(NewArgs),

    /// List tickets with filtering
    List(ListArgs),

    /// Show a ticket's details
    Show(ShowArgs),

    /// Edit ticket fields and re-check the measurements
    Set(SetArgs),

    /// Manage a ticket's outages
    #[command(subcommand)]
    Outage(OutageCommands),

    /// Record a measurement taken along one edge of the opening
    Edge(EdgeArgs),

    /// Draw the door layout as SVG
    Draw(DrawArgs),

    /// Delete a ticket
    Delete(DeleteArgs),
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Ticket number (e.g. T-1042)
    #[arg(long, short = 'n')]
    pub number: Option<String>,

    /// Customer name
    #[arg(long, short = 'c')]
    pub customer: Option<String>,

    /// Shower type (e.g. "tub enclosure")
    #[arg(long)]
    pub shower_type: Option<String>,

    /// Hardware color: chrome, black or "brushed nickel"
    #[arg(long, default_value = "chrome")]
    pub color: GlassColor,

    /// Side the door hinges on
    #[arg(long, default_value = "left")]
    pub side: Side,

    /// Door width (e.g. 30, 29.5, 29 1/2)
    #[arg(long)]
    pub door: Option<String>,

    /// Panel width
    #[arg(long)]
    pub panel: Option<String>,

    /// Overall opening width
    #[arg(long)]
    pub overall: Option<String>,

    /// Outage as side:direction:value, repeatable (e.g. left:in:1/4)
    #[arg(long = "outage", value_name = "SIDE:DIR:VALUE")]
    pub outages: Vec<Outage>,

    /// Field tech to assign (default: configured tech)
    #[arg(long)]
    pub tech: Option<String>,

    /// Use the interactive wizard to fill in fields
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Only tickets assigned to this tech (case-insensitive substring)
    #[arg(long)]
    pub tech: Option<String>,

    /// Filter by hardware color
    #[arg(long)]
    pub color: Option<GlassColor>,

    /// Filter by door side
    #[arg(long)]
    pub side: Option<Side>,

    /// Only tickets whose last check failed
    #[arg(long)]
    pub invalid: bool,

    /// Search ticket number, customer and shower type (case-insensitive)
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Limit number of results
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Show count only, not the items
    #[arg(long)]
    pub count: bool,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Ticket id or ticket number
    pub reference: String,
}

#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Ticket id or ticket number
    pub reference: String,

    /// New ticket number
    #[arg(long)]
    pub number: Option<String>,

    /// New customer name
    #[arg(long)]
    pub customer: Option<String>,

    /// Shower type (empty string clears it)
    #[arg(long)]
    pub shower_type: Option<String>,

    /// Hardware color
    #[arg(long)]
    pub color: Option<GlassColor>,

    /// Door side
    #[arg(long)]
    pub side: Option<Side>,

    /// Door width
    #[arg(long)]
    pub door: Option<String>,

    /// Panel width
    #[arg(long)]
    pub panel: Option<String>,

    /// Overall opening width
    #[arg(long)]
    pub overall: Option<String>,

    /// Assigned field tech (empty string unassigns)
    #[arg(long)]
    pub tech: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum OutageCommands {
    /// Add an outage to a ticket
    Add(OutageAddArgs),

    /// Remove every outage from a ticket
    Clear(OutageClearArgs),
}

#[derive(clap::Args, Debug)]
pub struct OutageAddArgs {
    /// Ticket id or ticket number
    pub reference: String,

    /// Side of the opening (left or right)
    pub side: Side,

    /// in narrows the opening, out widens it
    pub direction: Direction,

    /// Amount, e.g. 1/4 (blank counts as zero)
    #[arg(default_value = "")]
    pub value: String,
}

#[derive(clap::Args, Debug)]
pub struct OutageClearArgs {
    /// Ticket id or ticket number
    pub reference: String,
}

#[derive(clap::Args, Debug)]
pub struct EdgeArgs {
    /// Ticket id or ticket number
    pub reference: String,

    /// Edge of the opening: left, right, bottom (sill) or head (top)
    pub edge: Edge,

    /// Measurement along the edge (omit to clear it)
    #[arg(default_value = "")]
    pub value: String,
}

#[derive(clap::Args, Debug)]
pub struct DrawArgs {
    /// Ticket id or ticket number
    pub reference: String,

    /// Write the SVG to a file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Ticket id or ticket number
    pub reference: String,
}

/// Run a ticket subcommand
pub fn run(cmd: TicketCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        TicketCommands::New(args) => run_new(args, global),
        TicketCommands::List(args) => run_list(args, global),
        TicketCommands::Show(args) => run_show(args, global),
        TicketCommands::Set(args) => run_set(args, global),
        TicketCommands::Outage(cmd) => run_outage(cmd, global),
        TicketCommands::Edge(args) => run_edge(args, global),
        TicketCommands::Draw(args) => run_draw(args, global),
        TicketCommands::Delete(args) => run_delete(args, global),
    }
}

fn run_new(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let Workspace {
        config, mut store, ..
    } = open_workspace(global)?;
    let tech = non_blank(args.tech.as_deref()).or_else(|| config.tech().map(String::from));

    let mut ticket = if args.interactive {
        let lookup = CustomerLookup::from_config(&config);
        TicketWizard::new(&lookup).run(WizardDefaults {
            ticket_number: non_blank(args.number.as_deref()),
            customer_name: non_blank(args.customer.as_deref()),
            tech,
        })?
    } else {
        let number = non_blank(args.number.as_deref()).ok_or_else(|| {
            miette::miette!(
                help = "Pass --number, or use --interactive",
                "Ticket number is required"
            )
        })?;
        let customer = non_blank(args.customer.as_deref()).ok_or_else(|| {
            miette::miette!(
                help = "Pass --customer, or use --interactive",
                "Customer name is required"
            )
        })?;

        let mut ticket = Ticket::new(number, customer).with_widths(
            args.door.unwrap_or_default(),
            args.panel.unwrap_or_default(),
            args.overall.unwrap_or_default(),
        );
        ticket.shower_type = non_blank(args.shower_type.as_deref());
        ticket.glass_color = args.color;
        ticket.door_side = args.side;
        ticket.outages = args.outages;
        ticket.assigned_tech = tech;
        ticket
    };

    let check = ticket.recheck(config.tolerance());
    if !check.valid {
        return Err(miette::miette!(
            code = "glazier::ticket::invalid",
            help = "Fix the measurements and try again; the ticket was not saved",
            "{}",
            check.message
        ));
    }

    if store
        .tickets()
        .iter()
        .any(|t| t.ticket_number.eq_ignore_ascii_case(&ticket.ticket_number))
    {
        eprintln!(
            "{} Ticket number {} is already in use; refer to it by id",
            style("!").yellow(),
            style(&ticket.ticket_number).cyan()
        );
    }

    let id = store.insert(ticket)?;
    store.save()?;
    let ticket = store.find(&id.to_string())?;

    match effective_format(global, &config, OutputFormat::Auto) {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(ticket).into_diagnostic()?);
        }
        OutputFormat::Yaml => print!("{}", serde_yml::to_string(ticket).into_diagnostic()?),
        OutputFormat::Id => println!("{}", id),
        _ if global.quiet => println!("{}", id),
        _ => {
            println!(
                "{} Created ticket {} for {} {}",
                style("✓").green(),
                style(&ticket.ticket_number).cyan(),
                style(&ticket.customer_name).yellow(),
                style(format!("(id {})", id)).dim()
            );
            print_status(ticket);
        }
    }

    Ok(())
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let Workspace { config, store, .. } = open_workspace(global)?;

    let search = args.search.as_deref().map(|s| s.trim().to_lowercase());
    let mut tickets: Vec<&Ticket> = store
        .tickets()
        .iter()
        .filter(|t| args.tech.as_deref().map_or(true, |name| t.is_assigned_to(name)))
        .filter(|t| args.color.map_or(true, |c| t.glass_color == c))
        .filter(|t| args.side.map_or(true, |s| t.door_side == s))
        .filter(|t| !args.invalid || !t.valid)
        .filter(|t| search.as_deref().map_or(true, |needle| matches_search(t, needle)))
        .collect();

    if let Some(limit) = args.limit {
        tickets.truncate(limit);
    }

    if args.count {
        println!("{}", tickets.len());
        return Ok(());
    }

    let format = effective_format(global, &config, OutputFormat::Tsv);
    print_ticket_list(&tickets, format, global)
}

/// Print tickets in a list format; shared with `glazier tech`
pub(crate) fn print_ticket_list(tickets: &[&Ticket], format: OutputFormat, global: &GlobalOpts) -> Result<()> {
    if tickets.is_empty() {
        match format {
            OutputFormat::Json | OutputFormat::Yaml => println!("[]"),
            OutputFormat::Id | OutputFormat::Csv => {}
            _ => {
                println!("No tickets found.");
                if !global.quiet {
                    println!();
                    println!("Create one with: {}", style("glazier ticket new -i").yellow());
                }
            }
        }
        return Ok(());
    }

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(tickets).into_diagnostic()?);
        }
        OutputFormat::Yaml => print!("{}", serde_yml::to_string(&tickets).into_diagnostic()?),
        _ => {
            let config = if global.quiet {
                TableConfig::for_pipe()
            } else {
                TableConfig::default()
            };
            TableFormatter::new(TICKET_COLUMNS, "ticket")
                .with_config(config)
                .output(tickets.iter().map(|t| TableRow::for_ticket(t)), format)?;
        }
    }

    Ok(())
}

fn matches_search(ticket: &Ticket, needle: &str) -> bool {
    [
        Some(ticket.ticket_number.as_str()),
        Some(ticket.customer_name.as_str()),
        ticket.shower_type.as_deref(),
    ]
    .into_iter()
    .flatten()
    .any(|field| field.to_lowercase().contains(needle))
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let Workspace { config, store, .. } = open_workspace(global)?;
    let ticket = store.find(&args.reference)?;

    match effective_format(global, &config, OutputFormat::Auto) {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(ticket).into_diagnostic()?);
        }
        OutputFormat::Yaml => print!("{}", serde_yml::to_string(ticket).into_diagnostic()?),
        OutputFormat::Id => println!("{}", ticket.id),
        _ => {
            let card = TemplateGenerator::new()?.render_ticket_card(ticket)?;
            print!("{}", card);
        }
    }

    Ok(())
}

fn run_set(args: SetArgs, global: &GlobalOpts) -> Result<()> {
    let Workspace {
        config, mut store, ..
    } = open_workspace(global)?;
    let ticket = store.find_mut(&args.reference)?;

    if let Some(number) = args.number {
        ticket.ticket_number = non_blank(Some(&number))
            .ok_or_else(|| miette::miette!("Ticket number cannot be empty"))?;
    }
    if let Some(customer) = args.customer {
        ticket.customer_name = non_blank(Some(&customer))
            .ok_or_else(|| miette::miette!("Customer name cannot be empty"))?;
    }
    if let Some(shower_type) = args.shower_type {
        ticket.shower_type = non_blank(Some(&shower_type));
    }
    if let Some(color) = args.color {
        ticket.glass_color = color;
    }
    if let Some(side) = args.side {
        ticket.door_side = side;
    }
    if let Some(door) = args.door {
        ticket.door_width = door;
    }
    if let Some(panel) = args.panel {
        ticket.panel_width = panel;
    }
    if let Some(overall) = args.overall {
        ticket.overall_width = overall;
    }
    if let Some(tech) = args.tech {
        ticket.assigned_tech = non_blank(Some(&tech));
    }

    // Edits are kept even when the numbers stop adding up
    ticket.recheck(config.tolerance());
    let ticket = ticket.clone();
    store.save()?;

    if !global.quiet {
        println!(
            "{} Updated ticket {}",
            style("✓").green(),
            style(&ticket.ticket_number).cyan()
        );
        print_status(&ticket);
    }
    Ok(())
}

fn run_outage(cmd: OutageCommands, global: &GlobalOpts) -> Result<()> {
    let Workspace {
        config, mut store, ..
    } = open_workspace(global)?;

    let (reference, outage) = match cmd {
        OutageCommands::Add(args) => {
            if !args.value.trim().is_empty() {
                parse_measurement(&args.value).map_err(|e| miette::miette!("{}", e))?;
            }
            let outage = Outage::new(args.side, args.direction, args.value.trim());
            (args.reference, Some(outage))
        }
        OutageCommands::Clear(args) => (args.reference, None),
    };

    let ticket = store.find_mut(&reference)?;
    let added = outage.is_some();
    match outage {
        Some(outage) => ticket.outages.push(outage),
        None => ticket.outages.clear(),
    }
    ticket.recheck(config.tolerance());
    let ticket = ticket.clone();
    store.save()?;

    if !global.quiet {
        let action = if added { "Added outage to" } else { "Cleared outages on" };
        println!(
            "{} {} ticket {}",
            style("✓").green(),
            action,
            style(&ticket.ticket_number).cyan()
        );
        print_status(&ticket);
    }
    Ok(())
}

fn run_edge(args: EdgeArgs, global: &GlobalOpts) -> Result<()> {
    let Workspace { mut store, .. } = open_workspace(global)?;

    let value = args.value.trim();
    if !value.is_empty() {
        parse_measurement(value).map_err(|e| miette::miette!("{}", e))?;
    }

    let ticket = store.find_mut(&args.reference)?;
    ticket.set_edge(args.edge, value);
    let number = ticket.ticket_number.clone();
    store.save()?;

    if !global.quiet {
        if value.is_empty() {
            println!(
                "{} Cleared {} edge on ticket {}",
                style("✓").green(),
                args.edge,
                style(number).cyan()
            );
        } else {
            println!(
                "{} Set {} edge on ticket {} to {} in",
                style("✓").green(),
                args.edge,
                style(number).cyan(),
                style(value).yellow()
            );
        }
    }
    Ok(())
}

fn run_draw(args: DrawArgs, global: &GlobalOpts) -> Result<()> {
    let Workspace { store, .. } = open_workspace(global)?;
    let ticket = store.find(&args.reference)?;
    let svg = render_svg(ticket);

    match args.output {
        Some(path) => {
            std::fs::write(&path, svg).into_diagnostic()?;
            if !global.quiet {
                println!(
                    "{} Wrote diagram for {} to {}",
                    style("✓").green(),
                    style(&ticket.ticket_number).cyan(),
                    style(path.display()).cyan()
                );
            }
        }
        None => print!("{}", svg),
    }
    Ok(())
}

fn run_delete(args: DeleteArgs, global: &GlobalOpts) -> Result<()> {
    let Workspace { mut store, .. } = open_workspace(global)?;
    let ticket = store.remove(&args.reference)?;
    store.save()?;

    if !global.quiet {
        println!(
            "{} Deleted ticket {} {}",
            style("✓").green(),
            style(&ticket.ticket_number).cyan(),
            style(format!("(id {})", ticket.id)).dim()
        );
    }
    Ok(())
}

fn print_status(ticket: &Ticket) {
    if ticket.valid {
        println!("  {} {}", style("✓").green(), ticket.status_line());
    } else {
        println!("  {} {}", style("!").yellow(), style(ticket.status_line()).yellow());
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}
