//! Schema system - store validation, templates and the entry wizard

pub mod registry;
pub mod template;
pub mod validator;
pub mod wizard;

pub use registry::SchemaRegistry;
pub use template::{TemplateError, TemplateGenerator};
pub use validator::{ValidationError, Validator};
pub use wizard::{TicketWizard, WizardDefaults};
