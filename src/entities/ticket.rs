//! Ticket entity - one shower-door installation order with its measurements
//!
//! A ticket records the opening as measured on site: door, fixed panel and
//! overall width, plus any outages where the wall runs in or out of plumb.
//! The measurement check is recalculated whenever those numbers change.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::measure::{format_inches, parse_measurement, MeasurementError};

/// Allowed slack between door + panel + outages and the overall width, in inches
pub const DEFAULT_TOLERANCE: f64 = 0.02;

/// Message shown for a ticket whose measurements were never checked
pub const AWAITING_VALIDATION: &str = "Awaiting validation";

const MALFORMED_MESSAGE: &str =
    "Enter valid measurements (supports decimals, fractions, and mixed fractions).";

/// Left or right side of the opening
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    #[default]
    Left,
    Right,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "left" | "l" => Ok(Side::Left),
            "right" | "r" => Ok(Side::Right),
            _ => Err(format!("Unknown side: {} (expected left or right)", s)),
        }
    }
}

/// Which way an outage runs relative to the opening
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Wall leans into the opening; the value is subtracted
    #[default]
    In,
    /// Wall leans away from the opening; the value is added
    Out,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::In => "in",
            Direction::Out => "out",
        }
    }

    /// +1 for out, -1 for in
    pub fn sign(&self) -> f64 {
        match self {
            Direction::In => -1.0,
            Direction::Out => 1.0,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "in" => Ok(Direction::In),
            "out" => Ok(Direction::Out),
            _ => Err(format!("Unknown outage direction: {} (expected in or out)", s)),
        }
    }
}

/// Hardware finish, which also picks the diagram colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GlassColor {
    #[default]
    #[serde(rename = "chrome")]
    Chrome,
    #[serde(rename = "black")]
    Black,
    #[serde(rename = "brushed nickel")]
    BrushedNickel,
}

impl GlassColor {
    pub fn all() -> &'static [GlassColor] {
        &[GlassColor::Chrome, GlassColor::Black, GlassColor::BrushedNickel]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GlassColor::Chrome => "chrome",
            GlassColor::Black => "black",
            GlassColor::BrushedNickel => "brushed nickel",
        }
    }

    /// Stroke/fill colour used by the diagram
    pub fn hex(&self) -> &'static str {
        match self {
            GlassColor::Chrome => "#64748b",
            GlassColor::Black => "#111827",
            GlassColor::BrushedNickel => "#9ca3af",
        }
    }
}

impl fmt::Display for GlassColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for GlassColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', '_'], " ");
        match normalized.as_str() {
            "chrome" => Ok(GlassColor::Chrome),
            "black" => Ok(GlassColor::Black),
            "brushed nickel" | "nickel" => Ok(GlassColor::BrushedNickel),
            _ => Err(format!(
                "Unknown glass color: {} (expected chrome, black or brushed nickel)",
                s
            )),
        }
    }
}

/// A single out-of-plumb adjustment on one side of the opening
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Outage {
    pub side: Side,
    pub direction: Direction,
    /// Raw measurement text; blank means "not measured yet"
    #[serde(default)]
    pub value: String,
}

impl Outage {
    pub fn new(side: Side, direction: Direction, value: impl Into<String>) -> Self {
        Self {
            side,
            direction,
            value: value.into(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }

    pub fn inches(&self) -> Result<f64, MeasurementError> {
        parse_measurement(&self.value)
    }

    /// Signed contribution to the net outage; unparseable values count as zero
    pub fn signed_inches(&self) -> f64 {
        self.inches()
            .map(|n| self.direction.sign() * n)
            .unwrap_or(0.0)
    }
}

impl fmt::Display for Outage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = if self.is_blank() { "0" } else { self.value.trim() };
        write!(f, "{} {} {}\"", self.side, self.direction, value)
    }
}

/// Parses the `side:direction:value` form used on the command line,
/// e.g. `left:in:1/4` or `right:out:0 3/16`
impl FromStr for Outage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ':');
        let side = parts.next().unwrap_or_default();
        let direction = parts
            .next()
            .ok_or_else(|| format!("Outage '{}' must look like side:direction:value", s))?;
        let value = parts.next().unwrap_or_default();

        Ok(Outage::new(side.parse()?, direction.parse()?, value.trim()))
    }
}

/// Sum of all outages, out counted positive and in negative
pub fn net_outage(outages: &[Outage]) -> f64 {
    outages.iter().map(Outage::signed_inches).sum()
}

/// One edge of the opening that can carry its own measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Left,
    Right,
    Bottom,
    Head,
}

impl Edge {
    pub fn all() -> &'static [Edge] {
        &[Edge::Left, Edge::Right, Edge::Bottom, Edge::Head]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Edge::Left => "left",
            Edge::Right => "right",
            Edge::Bottom => "bottom",
            Edge::Head => "head",
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Edge {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "left" => Ok(Edge::Left),
            "right" => Ok(Edge::Right),
            "bottom" | "sill" => Ok(Edge::Bottom),
            "head" | "top" => Ok(Edge::Head),
            _ => Err(format!(
                "Unknown edge: {} (expected left, right, bottom or head)",
                s
            )),
        }
    }
}

/// Measurements taken along each edge of the opening
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeMeasurements {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head: Option<String>,
}

impl EdgeMeasurements {
    pub fn get(&self, edge: Edge) -> Option<&str> {
        let slot = match edge {
            Edge::Left => &self.left,
            Edge::Right => &self.right,
            Edge::Bottom => &self.bottom,
            Edge::Head => &self.head,
        };
        slot.as_deref()
    }

    /// Store a measurement; blank text clears the edge
    pub fn set(&mut self, edge: Edge, value: &str) {
        let value = value.trim();
        let value = (!value.is_empty()).then(|| value.to_string());
        match edge {
            Edge::Left => self.left = value,
            Edge::Right => self.right = value,
            Edge::Bottom => self.bottom = value,
            Edge::Head => self.head = value,
        }
    }

    pub fn is_empty(&self) -> bool {
        Edge::all().iter().all(|e| self.get(*e).is_none())
    }
}

/// Outcome of checking a set of measurements
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TicketCheck {
    pub valid: bool,
    pub message: String,
    /// door + panel + net outage, when every width parsed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<f64>,
    pub net_outage: f64,
}

/// Check that door + panel + net outage lands on the overall width.
pub fn check_measurements(
    door: &str,
    panel: &str,
    overall: &str,
    outages: &[Outage],
    tolerance: f64,
) -> TicketCheck {
    let net = net_outage(outages);
    let bad_outage = outages
        .iter()
        .any(|o| !o.is_blank() && o.inches().is_err());

    let (door, panel, overall) = match (
        parse_measurement(door),
        parse_measurement(panel),
        parse_measurement(overall),
    ) {
        (Ok(d), Ok(p), Ok(o)) if !bad_outage => (d, p, o),
        _ => {
            return TicketCheck {
                valid: false,
                message: MALFORMED_MESSAGE.to_string(),
                expected: None,
                net_outage: net,
            }
        }
    };

    let expected = door + panel + net;
    let diff = (expected - overall).abs();

    if diff > tolerance {
        let outage_term = if net != 0.0 {
            format!(" + Net Outage ({} in)", format_inches(net))
        } else {
            String::new()
        };
        return TicketCheck {
            valid: false,
            message: format!(
                "Mismatch: Door + Panel{} = {} in, not {} in.",
                outage_term,
                format_inches(expected),
                format_inches(overall)
            ),
            expected: Some(expected),
            net_outage: net,
        };
    }

    TicketCheck {
        valid: true,
        message: format!("Measurements check out. Total = {} in.", format_inches(overall)),
        expected: Some(expected),
        net_outage: net,
    }
}

fn same_words(a: &str, b: &str) -> bool {
    a.split_whitespace().eq(b.split_whitespace())
}

/// Ticket entity - an installation order as stored in the ticket store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    /// Creation time in epoch milliseconds, unique within a store
    pub id: i64,

    pub ticket_number: String,

    pub customer_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shower_type: Option<String>,

    #[serde(default)]
    pub glass_color: GlassColor,

    #[serde(default)]
    pub door_side: Side,

    #[serde(default)]
    pub door_width: String,

    #[serde(default)]
    pub panel_width: String,

    #[serde(default)]
    pub overall_width: String,

    #[serde(default)]
    pub outages: Vec<Outage>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge_measurements: Option<EdgeMeasurements>,

    /// Field tech the install is assigned to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_tech: Option<String>,

    /// Result of the last measurement check
    #[serde(default)]
    pub valid: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
}

impl Default for Ticket {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: now.timestamp_millis(),
            ticket_number: String::new(),
            customer_name: String::new(),
            shower_type: None,
            glass_color: GlassColor::default(),
            door_side: Side::default(),
            door_width: String::new(),
            panel_width: String::new(),
            overall_width: String::new(),
            outages: Vec::new(),
            edge_measurements: None,
            assigned_tech: None,
            valid: false,
            valid_message: None,
            created: Some(now),
        }
    }
}

impl Ticket {
    /// Create a new ticket with required fields
    pub fn new(ticket_number: impl Into<String>, customer_name: impl Into<String>) -> Self {
        Self {
            ticket_number: ticket_number.into().trim().to_string(),
            customer_name: customer_name.into().trim().to_string(),
            ..Default::default()
        }
    }

    /// Set the three widths as typed
    pub fn with_widths(
        mut self,
        door: impl Into<String>,
        panel: impl Into<String>,
        overall: impl Into<String>,
    ) -> Self {
        self.door_width = door.into();
        self.panel_width = panel.into();
        self.overall_width = overall.into();
        self
    }

    pub fn with_outage(mut self, outage: Outage) -> Self {
        self.outages.push(outage);
        self
    }

    pub fn net_outage(&self) -> f64 {
        net_outage(&self.outages)
    }

    /// Check the measurements without touching the stored result
    pub fn check(&self, tolerance: f64) -> TicketCheck {
        check_measurements(
            &self.door_width,
            &self.panel_width,
            &self.overall_width,
            &self.outages,
            tolerance,
        )
    }

    /// Check the measurements and store the outcome on the ticket
    pub fn recheck(&mut self, tolerance: f64) -> TicketCheck {
        let check = self.check(tolerance);
        self.valid = check.valid;
        self.valid_message = Some(check.message.clone());
        check
    }

    /// Whether the stored result differs from a fresh check.
    ///
    /// Messages compare with runs of whitespace collapsed, so stores written
    /// by the browser form (which leaves a double space when there is no net
    /// outage term) are not reported as out of date.
    pub fn is_check_stale(&self, check: &TicketCheck) -> bool {
        self.valid != check.valid
            || !self
                .valid_message
                .as_deref()
                .is_some_and(|stored| same_words(stored, &check.message))
    }

    /// Stored status line, or the placeholder for unchecked tickets
    pub fn status_line(&self) -> &str {
        self.valid_message.as_deref().unwrap_or(AWAITING_VALIDATION)
    }

    pub fn edge(&self, edge: Edge) -> Option<&str> {
        self.edge_measurements.as_ref().and_then(|m| m.get(edge))
    }

    pub fn set_edge(&mut self, edge: Edge, value: &str) {
        let measurements = self.edge_measurements.get_or_insert_with(Default::default);
        measurements.set(edge, value);
        if measurements.is_empty() {
            self.edge_measurements = None;
        }
    }

    /// Case-insensitive substring match on the assigned tech
    pub fn is_assigned_to(&self, name: &str) -> bool {
        let needle = name.trim().to_lowercase();
        if needle.is_empty() {
            return false;
        }
        self.assigned_tech
            .as_ref()
            .is_some_and(|tech| tech.to_lowercase().contains(&needle))
    }
}
