//! `glazier customer` command - Customer lookup

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::{effective_format, load_config, truncate_str};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::lookup::{CustomerLookup, LookupSource};
use crate::entities::customer::Customer;

#[derive(Subcommand, Debug)]
pub enum CustomerCommands {
    /// Search the customer lookup endpoint
    Search(SearchArgs),
}

#[derive(clap::Args, Debug)]
pub struct SearchArgs {
    /// Name, address or phone to search for
    #[arg(required = true)]
    pub query: Vec<String>,

    /// Endpoint to query instead of the configured lookup_url
    #[arg(long)]
    pub url: Option<String>,
}

pub fn run(cmd: CustomerCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        CustomerCommands::Search(args) => run_search(args, global),
    }
}

fn run_search(args: SearchArgs, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global);
    let lookup = match args.url.as_deref() {
        Some(url) => CustomerLookup::new(Some(url), config.lookup_timeout()),
        None => CustomerLookup::from_config(&config),
    };

    let query = args.query.join(" ");
    let result = lookup.search(&query);

    if result.source == LookupSource::Fallback && !global.quiet {
        eprintln!(
            "{} Customer lookup unavailable, showing sample customers",
            style("!").yellow()
        );
    }

    let customers = &result.customers;
    match effective_format(global, &config, OutputFormat::Tsv) {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(customers).into_diagnostic()?),
        OutputFormat::Yaml => print!("{}", serde_yml::to_string(customers).into_diagnostic()?),
        OutputFormat::Id => {
            for customer in customers {
                println!("{}", customer.id);
            }
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(std::io::stdout());
            writer
                .write_record(["id", "name", "address", "city", "state", "zip_code", "phone"])
                .into_diagnostic()?;
            for c in customers {
                let id = c.id.to_string();
                writer
                    .write_record([
                        id.as_str(),
                        c.name.as_str(),
                        c.address.as_str(),
                        c.city.as_str(),
                        c.state.as_str(),
                        c.zip_code.as_str(),
                        c.phone.as_str(),
                    ])
                    .into_diagnostic()?;
            }
            writer.flush().into_diagnostic()?;
        }
        OutputFormat::Md => println!("{}", markdown_table(customers)),
        _ => print_tsv(customers, global.quiet),
    }

    Ok(())
}

fn markdown_table(customers: &[Customer]) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Name", "Address", "Phone"]);
    for c in customers {
        builder.push_record([c.name.clone(), c.full_address(), c.phone.clone()]);
    }
    builder.build().with(Style::markdown()).to_string()
}

fn print_tsv(customers: &[Customer], quiet: bool) {
    if customers.is_empty() {
        println!("No customers found.");
        return;
    }

    println!(
        "{:<24} {:<16} {}",
        style("NAME").bold(),
        style("PHONE").bold(),
        style("ADDRESS").bold()
    );
    println!("{}", "-".repeat(80));
    for c in customers {
        println!(
            "{:<24} {:<16} {}",
            truncate_str(&c.name, 22),
            c.phone,
            c.full_address()
        );
    }

    if !quiet {
        println!();
        println!("{} customer(s) found", style(customers.len()).cyan());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::customer::fallback_customers;

    #[test]
    fn test_markdown_table_lists_every_customer() {
        let customers = fallback_customers();
        let md = markdown_table(&customers);
        assert_eq!(md.lines().count(), customers.len() + 2);
        for c in &customers {
            assert!(md.contains(&c.name));
        }
    }
}
