//! Glazier: shower-door installation tickets
//!
//! A Unix-style toolkit for shower-door tickets: parse tape-measure input,
//! check that door + panel + outages add up to the opening, keep tickets in
//! a plain JSON store, and draw the layout as SVG.

pub mod cli;
pub mod core;
pub mod diagram;
pub mod entities;
pub mod schema;
