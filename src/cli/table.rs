//! Table formatting utilities for CLI list commands
//!
//! One table output path shared by `ticket list` and `tech`, so the two
//! commands print identical rows in every format.

use chrono::{DateTime, Local, Utc};
use console::style;
use miette::{IntoDiagnostic, Result};
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::truncate_str;
use crate::cli::OutputFormat;
use crate::entities::ticket::{GlassColor, Ticket};

/// Configuration for table output
#[derive(Debug, Clone)]
pub struct TableConfig {
    /// Show summary line after table (e.g., "5 ticket(s) found")
    pub show_summary: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self { show_summary: true }
    }
}

impl TableConfig {
    /// Create config optimized for piping (no summary)
    pub fn for_pipe() -> Self {
        Self {
            show_summary: false,
        }
    }
}

/// A typed cell value with semantic meaning for formatting
#[derive(Debug, Clone)]
pub enum CellValue {
    /// Plain text, truncated to the column width
    Text(String),
    /// Measurement exactly as typed
    Width(String),
    /// Glass color, shown with a swatch-like tint
    Color(GlassColor),
    /// Result of the last measurement check
    Valid(bool),
    /// DateTime displayed as date only
    Date(DateTime<Utc>),
    /// Empty/placeholder
    Empty,
}

impl CellValue {
    /// Optional text, empty when missing or blank
    pub fn optional(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if !v.is_empty() => CellValue::Text(v.to_string()),
            _ => CellValue::Empty,
        }
    }

    /// Format for TSV output (with colors if terminal)
    pub fn format_tsv(&self, width: usize) -> String {
        match self {
            CellValue::Text(s) => {
                let truncated = truncate_str(s, width.saturating_sub(2));
                format!("{:<width$}", truncated, width = width)
            }
            CellValue::Width(s) if s.trim().is_empty() => {
                format!("{:<width$}", style("-").dim(), width = width)
            }
            CellValue::Width(s) => format!("{:<width$}", s.trim(), width = width),
            CellValue::Color(color) => {
                let s = color.as_str();
                let styled = match color {
                    GlassColor::Chrome => style(s).white(),
                    GlassColor::Black => style(s).bold(),
                    GlassColor::BrushedNickel => style(s).dim(),
                };
                format!("{:<width$}", styled, width = width)
            }
            CellValue::Valid(valid) => {
                let styled = if *valid {
                    style("yes").green()
                } else {
                    style("no").red().bold()
                };
                format!("{:<width$}", styled, width = width)
            }
            CellValue::Date(dt) => {
                let local: DateTime<Local> = dt.with_timezone(&Local);
                format!("{:<width$}", local.format("%Y-%m-%d"), width = width)
            }
            CellValue::Empty => format!("{:<width$}", style("-").dim(), width = width),
        }
    }

    /// Get raw string value (no formatting, for CSV and Markdown)
    pub fn raw(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Width(s) => s.trim().to_string(),
            CellValue::Color(color) => color.as_str().to_string(),
            CellValue::Valid(valid) => (if *valid { "yes" } else { "no" }).to_string(),
            CellValue::Date(dt) => {
                let local: DateTime<Local> = dt.with_timezone(&Local);
                local.format("%Y-%m-%d").to_string()
            }
            CellValue::Empty => String::new(),
        }
    }

    /// Format for Markdown output (no colors, escaped pipes)
    pub fn format_md(&self) -> String {
        let raw = self.raw();
        if raw.is_empty() {
            "-".to_string()
        } else {
            raw.replace('|', "\\|")
        }
    }

    /// Get the display width of this cell's content (for dynamic column sizing)
    pub fn display_width(&self) -> usize {
        match self {
            CellValue::Valid(_) => 3,
            CellValue::Date(_) => 10, // "YYYY-MM-DD"
            CellValue::Empty => 1,
            other => other.raw().chars().count().max(1),
        }
    }
}

/// Column definition with header label and width
#[derive(Debug, Clone)]
pub struct ColumnDef {
    pub key: &'static str,
    pub header: &'static str,
    pub width: usize,
}

impl ColumnDef {
    pub const fn new(key: &'static str, header: &'static str, width: usize) -> Self {
        Self { key, header, width }
    }
}

/// Columns of the ticket table, in display order
pub const TICKET_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("number", "TICKET", 14),
    ColumnDef::new("customer", "CUSTOMER", 24),
    ColumnDef::new("side", "SIDE", 6),
    ColumnDef::new("color", "COLOR", 15),
    ColumnDef::new("door", "DOOR", 10),
    ColumnDef::new("panel", "PANEL", 10),
    ColumnDef::new("overall", "OVERALL", 10),
    ColumnDef::new("valid", "VALID", 6),
    ColumnDef::new("tech", "TECH", 16),
    ColumnDef::new("created", "CREATED", 10),
];

/// A row of cell values for table output
pub struct TableRow {
    pub id: i64,
    pub cells: Vec<(&'static str, CellValue)>,
}

impl TableRow {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            cells: Vec::new(),
        }
    }

    pub fn cell(mut self, key: &'static str, value: CellValue) -> Self {
        self.cells.push((key, value));
        self
    }

    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.cells.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    /// Build the standard row for a ticket
    pub fn for_ticket(ticket: &Ticket) -> Self {
        let created = match ticket.created {
            Some(dt) => CellValue::Date(dt),
            None => CellValue::Empty,
        };
        Self::new(ticket.id)
            .cell("number", CellValue::Text(ticket.ticket_number.clone()))
            .cell("customer", CellValue::Text(ticket.customer_name.clone()))
            .cell("side", CellValue::Text(ticket.door_side.to_string()))
            .cell("color", CellValue::Color(ticket.glass_color))
            .cell("door", CellValue::Width(ticket.door_width.clone()))
            .cell("panel", CellValue::Width(ticket.panel_width.clone()))
            .cell("overall", CellValue::Width(ticket.overall_width.clone()))
            .cell("valid", CellValue::Valid(ticket.valid))
            .cell("tech", CellValue::optional(ticket.assigned_tech.as_deref()))
            .cell("created", created)
    }
}

/// Table formatter that outputs rows in various formats
pub struct TableFormatter<'a> {
    columns: &'a [ColumnDef],
    entity_name: &'static str,
    config: TableConfig,
}

impl<'a> TableFormatter<'a> {
    pub fn new(columns: &'a [ColumnDef], entity_name: &'static str) -> Self {
        Self {
            columns,
            entity_name,
            config: TableConfig::default(),
        }
    }

    /// Configure the formatter with custom settings
    pub fn with_config(mut self, config: TableConfig) -> Self {
        self.config = config;
        self
    }

    /// Output rows in the requested format
    ///
    /// JSON and YAML carry full records, so callers serialize those
    /// themselves; here they fall back to TSV.
    pub fn output<I>(&self, rows: I, format: OutputFormat) -> Result<()>
    where
        I: IntoIterator<Item = TableRow>,
    {
        let rows: Vec<TableRow> = rows.into_iter().collect();

        match format {
            OutputFormat::Csv => self.output_csv(&rows)?,
            OutputFormat::Md => println!("{}", self.render_md(&rows)),
            OutputFormat::Id => self.output_ids(&rows),
            _ => self.output_tsv(&rows),
        }
        Ok(())
    }

    /// Calculate dynamic column widths based on actual content
    fn calculate_widths(&self, rows: &[TableRow]) -> Vec<usize> {
        // ID column - epoch millis, min 2 for header
        let id_width = rows
            .iter()
            .map(|r| r.id.to_string().len())
            .max()
            .unwrap_or(2)
            .max(2);
        let mut widths = vec![id_width];

        for col in self.columns {
            let max_content = rows
                .iter()
                .filter_map(|r| r.get(col.key))
                .map(|v| v.display_width())
                .max()
                .unwrap_or(0);

            // +2 leaves room for the truncation marker
            let natural_width = col.header.len().max(max_content.saturating_add(2));
            widths.push(natural_width.min(col.width));
        }

        widths
    }

    fn output_tsv(&self, rows: &[TableRow]) {
        let widths = self.calculate_widths(rows);

        let mut header_parts = vec![format!("{:<width$}", style("ID").bold().dim(), width = widths[0])];
        for (col, width) in self.columns.iter().zip(&widths[1..]) {
            header_parts.push(format!("{:<width$}", style(col.header).bold(), width = *width));
        }
        println!("{}", header_parts.join(" "));

        let total_width: usize = widths.iter().sum::<usize>() + widths.len() - 1;
        println!("{}", "-".repeat(total_width));

        for row in rows {
            let mut row_parts = vec![format!("{:<width$}", style(row.id).cyan(), width = widths[0])];
            for (col, width) in self.columns.iter().zip(&widths[1..]) {
                match row.get(col.key) {
                    Some(value) => row_parts.push(value.format_tsv(*width)),
                    None => row_parts.push(format!("{:<width$}", "-", width = *width)),
                }
            }
            println!("{}", row_parts.join(" "));
        }

        if self.config.show_summary {
            println!();
            println!(
                "{} {}(s) found. Use the {} or {} to reference one.",
                style(rows.len()).cyan(),
                self.entity_name,
                style("ID").cyan(),
                style("TICKET").cyan()
            );
        }
    }

    fn output_csv(&self, rows: &[TableRow]) -> Result<()> {
        let mut writer = csv::Writer::from_writer(std::io::stdout());

        let mut headers = vec!["id"];
        headers.extend(self.columns.iter().map(|c| c.key));
        writer.write_record(&headers).into_diagnostic()?;

        for row in rows {
            let mut record = vec![row.id.to_string()];
            for col in self.columns {
                record.push(row.get(col.key).map(CellValue::raw).unwrap_or_default());
            }
            writer.write_record(&record).into_diagnostic()?;
        }

        writer.flush().into_diagnostic()
    }

    fn render_md(&self, rows: &[TableRow]) -> String {
        let mut builder = Builder::default();

        let mut headers = vec!["ID".to_string()];
        headers.extend(self.columns.iter().map(|c| c.header.to_string()));
        builder.push_record(headers);

        for row in rows {
            let mut values = vec![row.id.to_string()];
            for col in self.columns {
                values.push(
                    row.get(col.key)
                        .map(CellValue::format_md)
                        .unwrap_or_else(|| "-".to_string()),
                );
            }
            builder.push_record(values);
        }

        builder.build().with(Style::markdown()).to_string()
    }

    fn output_ids(&self, rows: &[TableRow]) {
        for row in rows {
            println!("{}", row.id);
        }
    }
}
