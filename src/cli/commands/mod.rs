//! CLI command implementations

pub mod check;
pub mod completions;
pub mod config;
pub mod customer;
pub mod init;
pub mod measure;
pub mod tech;
pub mod ticket;
pub mod validate;
