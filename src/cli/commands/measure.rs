//! `glazier measure` command - parse tape-measure values

use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;

use crate::cli::helpers::{effective_format, load_config};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::measure::{format_fraction, format_inches, parse_measurement};

#[derive(clap::Args, Debug)]
pub struct MeasureArgs {
    /// Values to parse; quote mixed fractions, e.g. "12 3/8"
    #[arg(required = true)]
    pub values: Vec<String>,

    /// Denominator of the nearest-fraction reading
    #[arg(long, short = 'd', default_value_t = 16)]
    pub denominator: u32,
}

/// One parsed value
#[derive(Debug, Serialize)]
struct Reading {
    input: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    inches: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fraction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl Reading {
    fn parse(input: &str, denominator: u32) -> Self {
        match parse_measurement(input) {
            Ok(inches) => Self {
                input: input.to_string(),
                inches: Some(inches),
                fraction: Some(format_fraction(inches, denominator)),
                error: None,
            },
            Err(e) => Self {
                input: input.to_string(),
                inches: None,
                fraction: None,
                error: Some(e.to_string()),
            },
        }
    }
}

pub fn run(args: MeasureArgs, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global);
    let readings: Vec<Reading> = args
        .values
        .iter()
        .map(|v| Reading::parse(v, args.denominator))
        .collect();
    let failed = readings.iter().filter(|r| r.error.is_some()).count();

    match effective_format(global, &config, OutputFormat::Tsv) {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&readings).into_diagnostic()?),
        OutputFormat::Yaml => print!("{}", serde_yml::to_string(&readings).into_diagnostic()?),
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(std::io::stdout());
            writer.write_record(["input", "inches", "fraction"]).into_diagnostic()?;
            for r in &readings {
                let inches = r.inches.map(format_inches).unwrap_or_default();
                writer
                    .write_record([
                        r.input.as_str(),
                        inches.as_str(),
                        r.fraction.as_deref().unwrap_or_default(),
                    ])
                    .into_diagnostic()?;
            }
            writer.flush().into_diagnostic()?;
        }
        _ => {
            for r in &readings {
                match (&r.inches, &r.fraction, &r.error) {
                    (Some(inches), Some(fraction), _) => println!(
                        "{}\t{} in\t{}",
                        r.input.trim(),
                        style(format_inches(*inches)).cyan(),
                        style(fraction).dim()
                    ),
                    (_, _, Some(error)) => eprintln!("{} {}", style("✗").red(), error),
                    _ => {}
                }
            }
        }
    }

    if failed == 0 {
        Ok(())
    } else {
        Err(miette::miette!("{} of {} value(s) could not be parsed", failed, readings.len()))
    }
}
