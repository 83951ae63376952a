//! Interactive wizard for ticket entry
//!
//! Walks through the same fields as the browser order form. Choice lists
//! come from the embedded ticket schema, and the customer prompt can search
//! the lookup endpoint.

use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use miette::{IntoDiagnostic, Result};

use crate::core::lookup::{CustomerLookup, LookupSource};
use crate::core::measure::parse_measurement;
use crate::entities::ticket::{Direction, GlassColor, Outage, Side, Ticket};
use crate::schema::registry::SchemaRegistry;

/// Values pre-filled in the wizard
#[derive(Debug, Default)]
pub struct WizardDefaults {
    pub ticket_number: Option<String>,
    pub customer_name: Option<String>,
    pub tech: Option<String>,
}

/// Interactive ticket wizard
pub struct TicketWizard<'a> {
    registry: SchemaRegistry,
    lookup: &'a CustomerLookup,
    theme: ColorfulTheme,
}

impl<'a> TicketWizard<'a> {
    pub fn new(lookup: &'a CustomerLookup) -> Self {
        Self {
            registry: SchemaRegistry::default(),
            lookup,
            theme: ColorfulTheme::default(),
        }
    }

    /// Prompt for every ticket field and return the unsaved ticket
    pub fn run(&self, defaults: WizardDefaults) -> Result<Ticket> {
        println!();
        println!("{} Creating new shower ticket", style("◆").cyan());
        println!("{}", style("─".repeat(50)).dim());
        println!();

        let ticket_number = self.prompt_required("Ticket number", defaults.ticket_number)?;
        let customer_name = match defaults.customer_name {
            Some(name) => name,
            None => self.prompt_customer()?,
        };

        let mut ticket = Ticket::new(ticket_number, customer_name);

        let shower_type: String = Input::with_theme(&self.theme)
            .with_prompt("Shower type (optional)")
            .allow_empty(true)
            .interact_text()
            .into_diagnostic()?;
        ticket.shower_type = (!shower_type.trim().is_empty()).then(|| shower_type.trim().to_string());

        ticket.glass_color = self.prompt_choice::<GlassColor>("Glass color", "glassColor")?;
        ticket.door_side = self.prompt_choice::<Side>("Door side", "doorSide")?;
        ticket.door_width = self.prompt_measurement("Door width (in)", false)?;
        ticket.panel_width = self.prompt_measurement("Panel width (in)", false)?;
        ticket.overall_width = self.prompt_measurement("Overall width (in)", false)?;

        while Confirm::with_theme(&self.theme)
            .with_prompt("Add an outage?")
            .default(false)
            .interact()
            .into_diagnostic()?
        {
            ticket.outages.push(self.prompt_outage()?);
        }

        let mut tech_input = Input::<String>::with_theme(&self.theme)
            .with_prompt("Assigned tech (optional)")
            .allow_empty(true);
        if let Some(tech) = defaults.tech {
            tech_input = tech_input.default(tech);
        }
        let tech = tech_input.interact_text().into_diagnostic()?;
        ticket.assigned_tech = (!tech.trim().is_empty()).then(|| tech.trim().to_string());

        println!();
        println!("{} Values collected!", style("✓").green());
        Ok(ticket)
    }

    fn prompt_required(&self, prompt: &str, default: Option<String>) -> Result<String> {
        let mut input = Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .validate_with(|v: &String| -> std::result::Result<(), &str> {
                if v.trim().is_empty() {
                    Err("required")
                } else {
                    Ok(())
                }
            });
        if let Some(default) = default {
            input = input.default(default);
        }
        let value = input.interact_text().into_diagnostic()?;
        Ok(value.trim().to_string())
    }

    /// Search the lookup endpoint, falling back to typing the name
    fn prompt_customer(&self) -> Result<String> {
        let query: String = Input::with_theme(&self.theme)
            .with_prompt("Customer search (blank to type a name)")
            .allow_empty(true)
            .interact_text()
            .into_diagnostic()?;

        if query.trim().is_empty() {
            return self.prompt_required("Customer name", None);
        }

        let result = self.lookup.search(&query);
        if result.source == LookupSource::Fallback {
            println!("{} Customer lookup unavailable, showing sample customers", style("!").yellow());
        }

        let mut items: Vec<String> = result
            .customers
            .iter()
            .map(|c| format!("{} ({})", c.name, c.full_address()))
            .collect();
        items.push("Enter a different name".to_string());

        let selection = Select::with_theme(&self.theme)
            .with_prompt("Customer")
            .items(&items)
            .default(0)
            .interact()
            .into_diagnostic()?;

        match result.customers.get(selection) {
            Some(customer) => Ok(customer.name.clone()),
            None => self.prompt_required("Customer name", None),
        }
    }

    /// Select one of the enum options the schema declares for `field`
    fn prompt_choice<T>(&self, prompt: &str, field: &str) -> Result<T>
    where
        T: std::str::FromStr<Err = String> + Default,
    {
        let options = self.registry.ticket_field_options(field);
        if options.is_empty() {
            return Ok(T::default());
        }

        let selection = Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(&options)
            .default(0)
            .interact()
            .into_diagnostic()?;

        options[selection].parse::<T>().map_err(|e| miette::miette!("{}", e))
    }

    fn prompt_measurement(&self, prompt: &str, allow_empty: bool) -> Result<String> {
        let value: String = Input::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(allow_empty)
            .validate_with(move |v: &String| -> std::result::Result<(), String> {
                if allow_empty && v.trim().is_empty() {
                    return Ok(());
                }
                parse_measurement(v).map(|_| ()).map_err(|e| e.to_string())
            })
            .interact_text()
            .into_diagnostic()?;
        Ok(value.trim().to_string())
    }

    fn prompt_outage(&self) -> Result<Outage> {
        let sides = [Side::Left, Side::Right];
        let side = Select::with_theme(&self.theme)
            .with_prompt("Outage side")
            .items(&sides.iter().map(|s| s.as_str()).collect::<Vec<_>>())
            .default(0)
            .interact()
            .into_diagnostic()?;

        let directions = [Direction::In, Direction::Out];
        let direction = Select::with_theme(&self.theme)
            .with_prompt("Outage direction")
            .items(&directions.iter().map(|d| d.as_str()).collect::<Vec<_>>())
            .default(0)
            .interact()
            .into_diagnostic()?;

        let value = self.prompt_measurement("Outage (in)", true)?;
        Ok(Outage::new(sides[side], directions[direction], value))
    }
}
