//! Shower layout diagram
//!
//! [`Diagram::for_ticket`] works out the geometry of a ticket's opening
//! (door and panel sized by their share of the overall width, outage
//! markers, edge hit-areas) and its `Display` impl writes the SVG document.

use std::fmt;

use crate::core::measure::{format_inches, parse_measurement};
use crate::entities::ticket::{Direction, Edge, Side, Ticket};

/// Canvas width in SVG units
pub const CANVAS_WIDTH: f64 = 620.0;
/// Canvas height, leaving room for the labels under the opening
pub const CANVAS_HEIGHT: f64 = 360.0;

const OPENING_HEIGHT: f64 = 250.0;
const START_X: f64 = 20.0;
const TOP_Y: f64 = 30.0;
const USABLE_WIDTH: f64 = CANVAS_WIDTH - 40.0;
const EDGE_HIT_WIDTH: f64 = 12.0;
const FRAME_COLOR: &str = "#334155";
const OUTAGE_COLOR: &str = "#dc2626";

/// Axis-aligned rectangle in SVG units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }
}

/// A red tick showing one outage, stacked down the side it belongs to
#[derive(Debug, Clone, PartialEq)]
pub struct OutageMarker {
    pub x1: f64,
    pub x2: f64,
    pub y: f64,
    /// +1 when the tick points right, -1 when it points left
    pub dir: f64,
    pub label: String,
}

/// Clickable strip along one edge of the opening
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeRegion {
    pub edge: Edge,
    pub rect: Rect,
    pub measurement: Option<String>,
}

/// Computed layout of a ticket's diagram
#[derive(Debug, Clone)]
pub struct Diagram {
    pub frame: Rect,
    pub door: Rect,
    pub panel: Rect,
    pub door_side: Side,
    pub color: &'static str,
    pub outages: Vec<OutageMarker>,
    pub edges: Vec<EdgeRegion>,
    pub net_outage: f64,
    title: String,
    header: String,
    door_label: String,
    panel_label: String,
}

impl Diagram {
    /// Lay out the diagram for a ticket.
    ///
    /// Widths are scaled against the overall width, or door + panel when the
    /// overall width is missing or zero. Unparseable widths draw as zero.
    pub fn for_ticket(ticket: &Ticket) -> Self {
        let door = parse_measurement(&ticket.door_width).unwrap_or(0.0);
        let panel = parse_measurement(&ticket.panel_width).unwrap_or(0.0);
        let overall = parse_measurement(&ticket.overall_width)
            .ok()
            .filter(|o| *o != 0.0)
            .unwrap_or(door + panel);
        let total = overall.max(1.0);

        let door_w = door / total * USABLE_WIDTH;
        let panel_w = panel / total * USABLE_WIDTH;

        let (door_x, panel_x) = match ticket.door_side {
            Side::Left => (START_X, START_X + door_w),
            Side::Right => (START_X + panel_w, START_X),
        };

        let outages = ticket
            .outages
            .iter()
            .enumerate()
            .map(|(index, outage)| {
                let i = index as f64;
                let side_x = match outage.side {
                    Side::Left => START_X,
                    Side::Right => START_X + USABLE_WIDTH,
                };
                let dir = match outage.direction {
                    Direction::Out => 1.0,
                    Direction::In => -1.0,
                };
                OutageMarker {
                    x1: side_x,
                    x2: side_x + dir * (16.0 + i * 12.0),
                    y: TOP_Y + 30.0 + i * 20.0,
                    dir,
                    label: outage.to_string(),
                }
            })
            .collect();

        let edges = Edge::all()
            .iter()
            .map(|edge| EdgeRegion {
                edge: *edge,
                rect: edge_rect(*edge),
                measurement: ticket.edge(*edge).map(str::to_string),
            })
            .collect();

        Self {
            frame: Rect {
                x: START_X,
                y: TOP_Y,
                width: USABLE_WIDTH,
                height: OPENING_HEIGHT,
            },
            door: Rect {
                x: door_x,
                y: TOP_Y,
                width: door_w,
                height: OPENING_HEIGHT,
            },
            panel: Rect {
                x: panel_x,
                y: TOP_Y,
                width: panel_w,
                height: OPENING_HEIGHT,
            },
            door_side: ticket.door_side,
            color: ticket.glass_color.hex(),
            outages,
            edges,
            net_outage: ticket.net_outage(),
            title: format!("Ticket {} - {}", ticket.ticket_number, ticket.customer_name),
            header: format!(
                "Overall: {} in | Color: {}",
                or_dash(&ticket.overall_width),
                ticket.glass_color
            ),
            door_label: format!(
                "Door ({}): {} in",
                ticket.door_side,
                or_dash(&ticket.door_width)
            ),
            panel_label: format!("Panel: {} in", or_dash(&ticket.panel_width)),
        }
    }

    /// Centre of the door handle, on the latch edge of the door
    pub fn handle(&self) -> (f64, f64) {
        let cx = match self.door_side {
            Side::Left => self.door.x + 12.0,
            Side::Right => self.door.x + self.door.width - 12.0,
        };
        (cx, self.door.y + self.door.height / 2.0)
    }

    /// Render the SVG document
    pub fn to_svg(&self) -> String {
        self.to_string()
    }

    fn write_edges(&self, svg: &mut fmt::Formatter<'_>) -> fmt::Result {
        for region in &self.edges {
            let name = region.edge.as_str();
            let reading = region
                .measurement
                .as_deref()
                .map(|m| format!("{} in", m))
                .unwrap_or_else(|| "not measured".to_string());

            writeln!(
                svg,
                r#"  <g class="edge" data-edge="{name}" tabindex="0" style="cursor:pointer">"#
            )?;
            writeln!(
                svg,
                "    <title>{} edge: {}</title>",
                capitalize(name),
                escape_xml(&reading)
            )?;
            writeln!(
                svg,
                r#"    <rect x="{}" y="{}" width="{}" height="{}" fill="transparent" stroke="none" />"#,
                num(region.rect.x),
                num(region.rect.y),
                num(region.rect.width),
                num(region.rect.height)
            )?;
            if let Some(measurement) = &region.measurement {
                let (x, y, anchor) = edge_label_position(region.edge);
                writeln!(
                    svg,
                    r#"    <text class="edge-label" x="{}" y="{}" text-anchor="{}" fill="{}" font-size="11">{}</text>"#,
                    num(x),
                    num(y),
                    anchor,
                    FRAME_COLOR,
                    escape_xml(measurement)
                )?;
            }
            writeln!(svg, "  </g>")?;
        }
        Ok(())
    }
}

impl fmt::Display for Diagram {
    fn fmt(&self, svg: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (f, d, p) = (&self.frame, &self.door, &self.panel);
        let c = self.color;

        writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="system-ui, sans-serif">"#,
            w = num(CANVAS_WIDTH),
            h = num(CANVAS_HEIGHT)
        )?;
        writeln!(svg, "  <title>{}</title>", escape_xml(&self.title))?;

        writeln!(
            svg,
            r#"  <rect x="{}" y="{}" width="{}" height="{}" fill="none" stroke="{}" stroke-width="3" />"#,
            num(f.x),
            num(f.y),
            num(f.width),
            num(f.height),
            FRAME_COLOR
        )?;
        writeln!(
            svg,
            r#"  <rect class="panel" x="{}" y="{}" width="{}" height="{}" fill="{c}22" stroke="{c}" stroke-width="3" />"#,
            num(p.x),
            num(p.y),
            num(p.width),
            num(p.height)
        )?;
        writeln!(
            svg,
            r#"  <rect class="door" x="{}" y="{}" width="{}" height="{}" fill="{c}44" stroke="{c}" stroke-width="3" />"#,
            num(d.x),
            num(d.y),
            num(d.width),
            num(d.height)
        )?;
        writeln!(
            svg,
            r#"  <line x1="{x}" y1="{}" x2="{x}" y2="{}" stroke="{c}" stroke-dasharray="8,6" stroke-width="2" />"#,
            num(d.y + 10.0),
            num(d.y + d.height - 10.0),
            x = num(d.center_x())
        )?;
        let (hx, hy) = self.handle();
        writeln!(
            svg,
            r#"  <circle cx="{}" cy="{}" r="6" fill="{c}" />"#,
            num(hx),
            num(hy)
        )?;

        let bottom = f.y + f.height;
        let labels = [
            (p.center_x(), bottom + 22.0, &self.panel_label),
            (d.center_x(), bottom + 42.0, &self.door_label),
            (f.center_x(), f.y - 10.0, &self.header),
        ];
        for (x, y, text) in labels {
            writeln!(
                svg,
                r#"  <text x="{}" y="{}" text-anchor="middle" font-size="13">{}</text>"#,
                num(x),
                num(y),
                escape_xml(text)
            )?;
        }
        writeln!(
            svg,
            r#"  <text x="{}" y="{}" text-anchor="middle" font-size="13">Net Outage Adjustment: {} in</text>"#,
            num(f.center_x()),
            num(bottom + 62.0),
            format_inches(self.net_outage)
        )?;

        for marker in &self.outages {
            let anchor = if marker.dir > 0.0 { "start" } else { "end" };
            writeln!(
                svg,
                r#"  <line x1="{}" y1="{y}" x2="{}" y2="{y}" stroke="{OUTAGE_COLOR}" stroke-width="2" />"#,
                num(marker.x1),
                num(marker.x2),
                y = num(marker.y)
            )?;
            writeln!(
                svg,
                r#"  <text x="{}" y="{}" text-anchor="{anchor}" fill="{OUTAGE_COLOR}" font-size="11">{}</text>"#,
                num(marker.x2 + marker.dir * 4.0),
                num(marker.y + 4.0),
                escape_xml(&marker.label)
            )?;
        }

        self.write_edges(svg)?;
        writeln!(svg, "</svg>")
    }
}

/// Render a ticket straight to an SVG document
pub fn render_svg(ticket: &Ticket) -> String {
    Diagram::for_ticket(ticket).to_svg()
}

fn edge_rect(edge: Edge) -> Rect {
    let half = EDGE_HIT_WIDTH / 2.0;
    match edge {
        Edge::Left => Rect {
            x: START_X - half,
            y: TOP_Y,
            width: EDGE_HIT_WIDTH,
            height: OPENING_HEIGHT,
        },
        Edge::Right => Rect {
            x: START_X + USABLE_WIDTH - half,
            y: TOP_Y,
            width: EDGE_HIT_WIDTH,
            height: OPENING_HEIGHT,
        },
        Edge::Head => Rect {
            x: START_X,
            y: TOP_Y - half,
            width: USABLE_WIDTH,
            height: EDGE_HIT_WIDTH,
        },
        Edge::Bottom => Rect {
            x: START_X,
            y: TOP_Y + OPENING_HEIGHT - half,
            width: USABLE_WIDTH,
            height: EDGE_HIT_WIDTH,
        },
    }
}

fn edge_label_position(edge: Edge) -> (f64, f64, &'static str) {
    let bottom = TOP_Y + OPENING_HEIGHT;
    let mid = START_X + USABLE_WIDTH / 2.0;
    match edge {
        Edge::Left => (START_X + 6.0, bottom - 8.0, "start"),
        Edge::Right => (START_X + USABLE_WIDTH - 6.0, bottom - 8.0, "end"),
        Edge::Head => (mid, TOP_Y + 16.0, "middle"),
        Edge::Bottom => (mid, bottom - 14.0, "middle"),
    }
}

fn or_dash(value: &str) -> &str {
    let value = value.trim();
    if value.is_empty() {
        "-"
    } else {
        value
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Format a coordinate with at most two decimals
fn num(value: f64) -> String {
    let mut s = format!("{:.2}", value);
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    if s == "-0" {
        s = "0".to_string();
    }
    s
}

/// Escape text for use in SVG element content and attribute values
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::ticket::{GlassColor, Outage};

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn sample(side: Side) -> Ticket {
        let mut ticket = Ticket::new("T-1", "Ada").with_widths("30", "20", "50");
        ticket.door_side = side;
        ticket
    }

    #[test]
    fn test_widths_are_proportional_to_overall() {
        let diagram = Diagram::for_ticket(&sample(Side::Left));
        assert!(approx(diagram.door.width, 348.0));
        assert!(approx(diagram.panel.width, 232.0));
        assert!(approx(diagram.door.x, 20.0));
        assert!(approx(diagram.panel.x, 368.0));
    }

    #[test]
    fn test_right_door_sits_after_panel() {
        let diagram = Diagram::for_ticket(&sample(Side::Right));
        assert!(approx(diagram.panel.x, 20.0));
        assert!(approx(diagram.door.x, 252.0));
        let (hx, _) = diagram.handle();
        assert!(approx(hx, 252.0 + 348.0 - 12.0));
    }

    #[test]
    fn test_missing_overall_uses_door_plus_panel() {
        let ticket = Ticket::new("T-2", "Bo").with_widths("25", "25", "");
        let diagram = Diagram::for_ticket(&ticket);
        assert!(approx(diagram.door.width, 290.0));
        assert!(approx(diagram.panel.width, 290.0));
    }

    #[test]
    fn test_empty_ticket_does_not_divide_by_zero() {
        let diagram = Diagram::for_ticket(&Ticket::new("T-3", "Cy"));
        assert!(approx(diagram.door.width, 0.0));
        assert!(diagram.to_svg().contains("Overall: - in"));
    }

    #[test]
    fn test_outage_markers_stack_and_point() {
        let ticket = sample(Side::Left)
            .with_outage(Outage::new(Side::Left, Direction::Out, "1/4"))
            .with_outage(Outage::new(Side::Right, Direction::In, ""));
        let diagram = Diagram::for_ticket(&ticket);

        let first = &diagram.outages[0];
        assert!(approx(first.x1, 20.0));
        assert!(approx(first.x2, 36.0));
        assert!(approx(first.y, 60.0));
        assert_eq!(first.label, "left out 1/4\"");

        let second = &diagram.outages[1];
        assert!(approx(second.x1, 600.0));
        assert!(approx(second.x2, 600.0 - 28.0));
        assert!(approx(second.y, 80.0));
        assert_eq!(second.label, "right in 0\"");
    }

    #[test]
    fn test_svg_contents() {
        let mut ticket = sample(Side::Left);
        ticket.glass_color = GlassColor::Black;
        ticket.set_edge(Edge::Head, "72 1/2");
        let svg = render_svg(&ticket);

        assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\""));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains(r##"fill="#11182744""##));
        assert!(svg.contains("Door (left): 30 in"));
        assert!(svg.contains("Panel: 20 in"));
        assert!(svg.contains("Net Outage Adjustment: 0.000 in"));
        assert_eq!(svg.matches("class=\"edge\"").count(), 4);
        assert!(svg.contains("<title>Head edge: 72 1/2 in</title>"));
        assert!(svg.contains("<title>Left edge: not measured</title>"));
    }

    #[test]
    fn test_text_is_escaped() {
        let ticket = Ticket::new("<T&1>", "O'Brien \"Bath\"");
        let svg = render_svg(&ticket);
        assert!(svg.contains("Ticket &lt;T&amp;1&gt; - O&apos;Brien &quot;Bath&quot;"));
    }

    #[test]
    fn test_num_formatting() {
        assert_eq!(num(348.0), "348");
        assert_eq!(num(12.5), "12.5");
        assert_eq!(num(1.0 / 3.0), "0.33");
        assert_eq!(num(-0.001), "0");
    }
}
