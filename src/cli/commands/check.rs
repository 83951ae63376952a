//! `glazier check` command - ad-hoc measurement check
//!
//! Runs the same arithmetic as ticket entry without touching the store, so
//! it also works outside a project. Exits non-zero when the numbers do not
//! add up, which makes it usable from scripts.

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{effective_format, load_config};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::measure::{format_inches, parse_measurement};
use crate::entities::ticket::{check_measurements, Outage, TicketCheck};

#[derive(clap::Args, Debug)]
pub struct CheckArgs {
    /// Door width (e.g. 30, 29.5, 29 1/2)
    #[arg(long)]
    pub door: String,

    /// Panel width
    #[arg(long)]
    pub panel: String,

    /// Overall opening width
    #[arg(long)]
    pub overall: String,

    /// Outage as side:direction:value, repeatable (e.g. left:in:1/4)
    #[arg(long = "outage", value_name = "SIDE:DIR:VALUE")]
    pub outages: Vec<Outage>,

    /// Allowed mismatch in inches (default: configured tolerance)
    #[arg(long, value_parser = parse_tolerance)]
    pub tolerance: Option<f64>,
}

fn parse_tolerance(raw: &str) -> Result<f64, String> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number", raw))?;
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(format!("tolerance must be a non-negative number of inches, got '{}'", raw))
    }
}

pub fn run(args: CheckArgs, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global);
    let tolerance = args.tolerance.unwrap_or_else(|| config.tolerance());

    let check = check_measurements(&args.door, &args.panel, &args.overall, &args.outages, tolerance);
    tracing::debug!(valid = check.valid, tolerance, "checked measurements");

    match effective_format(global, &config, OutputFormat::Auto) {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&check).into_diagnostic()?),
        OutputFormat::Yaml => print!("{}", serde_yml::to_string(&check).into_diagnostic()?),
        _ => {
            if !global.quiet {
                print_breakdown(&args, &check);
            }
            if check.valid {
                println!("{} {}", style("✓").green(), check.message);
            }
        }
    }

    if check.valid {
        Ok(())
    } else {
        Err(miette::miette!(
            code = "glazier::check::mismatch",
            help = "Re-measure, or record the outages that account for the difference",
            "{}",
            check.message
        ))
    }
}

fn print_breakdown(args: &CheckArgs, check: &TicketCheck) {
    let line = |label: &str, raw: &str| match parse_measurement(raw) {
        Ok(inches) => println!("  {:<12} {:>10} in", label, format_inches(inches)),
        Err(_) => println!("  {:<12} {:>10}", label, style(raw.trim()).red()),
    };

    line("Door", &args.door);
    line("Panel", &args.panel);
    for outage in &args.outages {
        println!("  {:<12} {:>10}", style("outage").dim(), outage);
    }
    println!("  {:<12} {:>10} in", "Net outage", format_inches(check.net_outage));
    if let Some(expected) = check.expected {
        println!("  {:<12} {:>10} in", "Sum", format_inches(expected));
    }
    line("Overall", &args.overall);
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tolerance() {
        assert_eq!(parse_tolerance("0.25"), Ok(0.25));
        assert_eq!(parse_tolerance("0"), Ok(0.0));
        assert!(parse_tolerance("-0.1").is_err());
        assert!(parse_tolerance("NaN").is_err());
        assert!(parse_tolerance("inf").is_err());
        assert!(parse_tolerance("wide").is_err());
    }
}
