//! Entity type definitions
//!
//! - [`Ticket`] - a shower-door installation order with its measurements
//! - [`Customer`] - a customer record from the lookup endpoint

pub mod customer;
pub mod ticket;

pub use customer::Customer;
pub use ticket::{Direction, Edge, EdgeMeasurements, GlassColor, Outage, Side, Ticket, TicketCheck};
