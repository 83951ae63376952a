//! Core module - fundamental types and utilities

pub mod config;
pub mod lookup;
pub mod measure;
pub mod project;
pub mod store;
pub mod telemetry;

pub use config::Config;
pub use lookup::{CustomerLookup, LookupResult, LookupSource};
pub use measure::{format_fraction, format_inches, parse_measurement, Measurement, MeasurementError};
pub use project::{Project, ProjectError};
pub use store::{StoreError, TicketStore};
