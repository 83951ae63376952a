//! Text templates for ticket output

use rust_embed::Embed;
use tera::Tera;
use thiserror::Error;

use crate::core::measure::format_inches;
use crate::entities::ticket::{Edge, Ticket};

#[derive(Embed)]
#[folder = "templates/"]
struct EmbeddedTemplates;

const TICKET_CARD: &str = "ticket_card.txt.tera";

#[derive(Debug, Error, miette::Diagnostic)]
pub enum TemplateError {
    #[error("Template not found: {0}")]
    NotFound(String),

    #[error("Template rendering error: {0}")]
    RenderError(String),
}

/// Template generator using Tera
pub struct TemplateGenerator {
    tera: Tera,
}

impl TemplateGenerator {
    /// Create a new template generator with embedded templates
    pub fn new() -> Result<Self, TemplateError> {
        let mut tera = Tera::default();

        for file in EmbeddedTemplates::iter() {
            let filename = file.as_ref();
            if let Some(content) = EmbeddedTemplates::get(filename) {
                if let Ok(template_str) = std::str::from_utf8(&content.data) {
                    tera.add_raw_template(filename, template_str)
                        .map_err(|e| TemplateError::RenderError(e.to_string()))?;
                }
            }
        }

        Ok(Self { tera })
    }

    /// Render the human-readable card shown by `ticket show`
    pub fn render_ticket_card(&self, ticket: &Ticket) -> Result<String, TemplateError> {
        if !self.tera.get_template_names().any(|n| n == TICKET_CARD) {
            return Err(TemplateError::NotFound(TICKET_CARD.to_string()));
        }

        let heading = format!("{} - {}", ticket.ticket_number, ticket.customer_name);
        let outages: Vec<String> = ticket.outages.iter().map(|o| o.to_string()).collect();
        let edges: Vec<String> = Edge::all()
            .iter()
            .filter_map(|e| ticket.edge(*e).map(|m| format!("{}: {} in", e, m)))
            .collect();

        let mut context = tera::Context::new();
        context.insert("id", &ticket.id);
        context.insert("ticket_number", &ticket.ticket_number);
        context.insert("customer_name", &ticket.customer_name);
        context.insert("rule", &"=".repeat(heading.chars().count()));
        context.insert(
            "created",
            &ticket
                .created
                .map(|c| c.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
        );
        context.insert("shower_type", &ticket.shower_type.clone().unwrap_or_default());
        context.insert("glass_color", ticket.glass_color.as_str());
        context.insert("door_side", ticket.door_side.as_str());
        context.insert("door_width", or_dash(&ticket.door_width));
        context.insert("panel_width", or_dash(&ticket.panel_width));
        context.insert("overall_width", or_dash(&ticket.overall_width));
        context.insert("outages", &outages);
        context.insert("net_outage", &format_inches(ticket.net_outage()));
        context.insert("edges", &edges);
        context.insert("tech", &ticket.assigned_tech.clone().unwrap_or_default());
        context.insert("status", ticket.status_line());

        self.tera
            .render(TICKET_CARD, &context)
            .map_err(|e| TemplateError::RenderError(e.to_string()))
    }
}

fn or_dash(value: &str) -> &str {
    if value.trim().is_empty() {
        "-"
    } else {
        value.trim()
    }
}
