//! # Diagram renderer
//!
//! Draws the solved arm as a standalone SVG document: links as colored segments, joints as
//! dots, the target (x) and the computed wrist (+) as markers, and every joint angle as an
//! arc with its value. The SVG text is built directly, there is no drawing dependency.

use std::fmt::{self, Write};
use tracing::{error, info};
use crate::kinematic_traits::{ElbowConfiguration, JointPositions, Point, Solution, TargetPose};
use crate::kinematics_impl::{forward, solve};
use crate::parameters::LinkLengths;

/// Number of points on each angle arc.
pub const ARC_STEPS: usize = 40;

/// Distance of the angle label beyond its arc.
const LABEL_OFFSET: f64 = 0.6;

/// Drawing size in pixels, the longer side of the plotted area.
const CANVAS: f64 = 640.0;

/// Border around the plotted area, pixels.
const MARGIN: f64 = 48.0;

const LINK_COLORS: [&str; 3] = ["red", "green", "blue"];
const LINK_NAMES: [&str; 3] = ["L1", "L2", "L3"];

/// Arc showing a joint angle, directions in degrees in world coordinates (0 = +x).
#[derive(Debug, Clone, PartialEq)]
pub struct AngleArc {
    pub center: Point,
    pub start_deg: f64,
    pub end_deg: f64,
    pub radius: f64,
    pub label: String,
}

impl AngleArc {
    /// Points along the arc. If the end direction is below the start, the arc continues
    /// counterclockwise through a full turn.
    pub fn points(&self) -> Vec<Point> {
        let start = self.start_deg.to_radians();
        let mut end = self.end_deg.to_radians();
        if end < start {
            end += 2.0 * std::f64::consts::PI;
        }
        (0..ARC_STEPS)
            .map(|i| {
                let t = start + (end - start) * i as f64 / (ARC_STEPS - 1) as f64;
                Point::new(self.center.x + self.radius * t.cos(), self.center.y + self.radius * t.sin())
            })
            .collect()
    }

    /// Where the label goes: past the middle of the arc.
    pub fn label_position(&self) -> Point {
        let points = self.points();
        let mid = points[ARC_STEPS / 2];
        let t = (mid.y - self.center.y).atan2(mid.x - self.center.x);
        let r = self.radius + LABEL_OFFSET;
        Point::new(self.center.x + r * t.cos(), self.center.y + r * t.sin())
    }
}

/// Everything needed to draw one solved arm configuration.
#[derive(Debug, Clone)]
pub struct Diagram {
    pub links: LinkLengths,
    pub target: TargetPose,
    pub solution: Solution,
    pub positions: JointPositions,
}

impl Diagram {
    pub fn new(links: LinkLengths, target: TargetPose, solution: Solution) -> Self {
        let [t1, t2, t3] = solution.joints;
        let positions = forward(links.l1, links.l2, links.l3, t1, t2, t3);
        Diagram {
            links,
            target,
            solution,
            positions,
        }
    }

    /// Arcs for θ1 (from +x to link 1), θ2 (link 1 to link 2) and θ3 (link 2 to link 3).
    pub fn arcs(&self) -> [AngleArc; 3] {
        let [t1, t2, t3] = self.solution.joints;
        let a1 = t1;
        let a2 = t1 + t2;
        let a3 = t1 + t2 + t3;
        let [p0, p1, p2, _] = self.positions;
        [
            AngleArc {
                center: p0,
                start_deg: 0.0,
                end_deg: a1,
                radius: f64::max(2.0, self.links.l1 * 0.12),
                label: format!("θ1={:.1}°", t1),
            },
            AngleArc {
                center: p1,
                start_deg: a1,
                end_deg: a2,
                radius: f64::max(2.0, self.links.l2 * 0.12),
                label: format!("θ2={:.1}°", t2),
            },
            AngleArc {
                center: p2,
                start_deg: a2,
                end_deg: a3,
                radius: f64::max(2.0, self.links.l3 * 0.25),
                label: format!("θ3={:.1}°", t3),
            },
        ]
    }

    pub fn title(&self) -> String {
        format!("3-Link IK Diagram (psi={}°, elbow={})", self.target.psi, self.solution.elbow)
    }

    /// Text lines reporting angles, wrist and reached tip against the target.
    pub fn summary(&self) -> [String; 3] {
        let [t1, t2, t3] = self.solution.joints;
        let wrist = self.solution.wrist;
        let tip = self.positions[3];
        let target = self.target.position;
        [
            format!("theta1={:.2}°, theta2={:.2}°, theta3={:.2}°", t1, t2, t3),
            format!("Computed wrist point: ({:.2}, {:.2})", wrist.x, wrist.y),
            format!(
                "FK tip reached: ({:.2}, {:.2})  target=({:.2}, {:.2})",
                tip.x, tip.y, target.x, target.y
            ),
        ]
    }

    /// Renders the standalone SVG document.
    pub fn to_svg(&self) -> Result<String, fmt::Error> {
        let mut svg = String::new();
        self.write_svg(&mut svg)?;
        Ok(svg)
    }

    /// Writes the standalone SVG document into the given writer.
    pub fn write_svg<W: Write>(&self, svg: &mut W) -> fmt::Result {
        let arcs = self.arcs();
        let view = View::fit(self, &arcs);
        let (width, height) = view.size();

        writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{:.0}" height="{:.0}" viewBox="0 0 {:.0} {:.0}" font-family="sans-serif">"#,
            width, height, width, height
        )?;
        writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#)?;
        writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="16">{}</text>"#,
            width / 2.0,
            MARGIN / 2.0,
            self.title()
        )?;
        view.grid(svg)?;

        // Links
        for (i, color) in LINK_COLORS.iter().enumerate() {
            let (a, b) = (view.map(self.positions[i]), view.map(self.positions[i + 1]));
            writeln!(
                svg,
                r#"<line class="link" x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}" stroke-width="3"/>"#,
                a.x, a.y, b.x, b.y, color
            )?;
        }

        // Joints
        for p in &self.positions {
            let p = view.map(*p);
            writeln!(svg, r#"<circle class="joint" cx="{:.2}" cy="{:.2}" r="4" fill="black"/>"#, p.x, p.y)?;
        }

        // Target (x) and computed wrist (+)
        let t = view.map(self.target.position);
        writeln!(
            svg,
            r#"<path class="target" d="M{:.2},{:.2} l10,10 M{:.2},{:.2} l-10,10" stroke="black" stroke-width="1.5"/>"#,
            t.x - 5.0, t.y - 5.0, t.x + 5.0, t.y - 5.0
        )?;
        let w = view.map(self.solution.wrist);
        writeln!(
            svg,
            r#"<path class="wrist" d="M{:.2},{:.2} h12 M{:.2},{:.2} v12" stroke="black" stroke-width="1.5"/>"#,
            w.x - 6.0, w.y, w.x, w.y - 6.0
        )?;

        // Angle arcs with labels
        for arc in &arcs {
            let points: Vec<String> = arc
                .points()
                .iter()
                .map(|p| {
                    let p = view.map(*p);
                    format!("{:.2},{:.2}", p.x, p.y)
                })
                .collect();
            writeln!(
                svg,
                r#"<polyline class="arc" points="{}" fill="none" stroke="dimgray"/>"#,
                points.join(" ")
            )?;
            let l = view.map(arc.label_position());
            writeln!(
                svg,
                r#"<text class="label" x="{:.2}" y="{:.2}" font-size="12">{}</text>"#,
                l.x, l.y, arc.label
            )?;
        }

        self.legend(svg, width)?;
        writeln!(svg, "</svg>")
    }

    fn legend<W: Write>(&self, svg: &mut W, width: f64) -> fmt::Result {
        let x = width - MARGIN - 130.0;
        let mut y = MARGIN + 8.0;
        for (name, color) in LINK_NAMES.iter().zip(LINK_COLORS.iter()) {
            writeln!(
                svg,
                r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{}" stroke-width="3"/><text x="{:.1}" y="{:.1}" font-size="12">{}</text>"#,
                x, y, x + 20.0, y, color, x + 26.0, y + 4.0, name
            )?;
            y += 16.0;
        }
        for (symbol, name) in [("×", "Target (tip)"), ("+", "Computed wrist")] {
            writeln!(
                svg,
                r#"<text x="{:.1}" y="{:.1}" font-size="14">{}</text><text x="{:.1}" y="{:.1}" font-size="12">{}</text>"#,
                x + 5.0, y + 5.0, symbol, x + 26.0, y + 4.0, name
            )?;
            y += 16.0;
        }
        Ok(())
    }
}

/// Maps world coordinates (y up) to SVG pixels (y down) with equal aspect ratio.
struct View {
    min: Point,
    max: Point,
    scale: f64,
}

impl View {
    fn fit(diagram: &Diagram, arcs: &[AngleArc; 3]) -> Self {
        let mut min = Point::new(f64::INFINITY, f64::INFINITY);
        let mut max = Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        let all = diagram
            .positions
            .iter()
            .copied()
            .chain([diagram.target.position, diagram.solution.wrist])
            .chain(arcs.iter().flat_map(|arc| arc.points()))
            .chain(arcs.iter().map(|arc| arc.label_position()));
        for p in all {
            min = Point::new(min.x.min(p.x), min.y.min(p.y));
            max = Point::new(max.x.max(p.x), max.y.max(p.y));
        }
        // Room for labels
        let pad = 2.0;
        min = Point::new(min.x - pad, min.y - pad);
        max = Point::new(max.x + pad, max.y + pad);

        let span = f64::max(max.x - min.x, max.y - min.y);
        View {
            min,
            max,
            scale: CANVAS / span,
        }
    }

    fn size(&self) -> (f64, f64) {
        (
            (self.max.x - self.min.x) * self.scale + 2.0 * MARGIN,
            (self.max.y - self.min.y) * self.scale + 2.0 * MARGIN,
        )
    }

    fn map(&self, p: Point) -> Point {
        Point::new(
            MARGIN + (p.x - self.min.x) * self.scale,
            MARGIN + (self.max.y - p.y) * self.scale,
        )
    }

    /// Grid lines at a round spacing in world units.
    fn grid<W: Write>(&self, svg: &mut W) -> fmt::Result {
        let span = f64::max(self.max.x - self.min.x, self.max.y - self.min.y);
        let raw = span / 10.0;
        let magnitude = 10f64.powf(raw.log10().floor());
        let step = [1.0, 2.0, 5.0, 10.0]
            .iter()
            .map(|m| m * magnitude)
            .find(|s| *s >= raw)
            .unwrap_or(10.0 * magnitude);

        let mut x = (self.min.x / step).ceil() * step;
        while x <= self.max.x {
            let a = self.map(Point::new(x, self.min.y));
            let b = self.map(Point::new(x, self.max.y));
            writeln!(
                svg,
                r#"<line class="grid" x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="lightgray" stroke-width="0.5"/>"#,
                a.x, a.y, b.x, b.y
            )?;
            x += step;
        }
        let mut y = (self.min.y / step).ceil() * step;
        while y <= self.max.y {
            let a = self.map(Point::new(self.min.x, y));
            let b = self.map(Point::new(self.max.x, y));
            writeln!(
                svg,
                r#"<line class="grid" x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="lightgray" stroke-width="0.5"/>"#,
                a.x, a.y, b.x, b.y
            )?;
            y += step;
        }
        Ok(())
    }
}

/// Solves the target and renders the diagram, logging the summary lines. If the target
/// cannot be reached, the failure is logged and no diagram is produced.
pub fn plot_diagram(links: &LinkLengths, target: &TargetPose, elbow: ElbowConfiguration) -> Option<String> {
    let solution = match solve(
        links.l1,
        links.l2,
        links.l3,
        target.position.x,
        target.position.y,
        target.psi,
        elbow,
    ) {
        Ok(solution) => solution,
        Err(e) => {
            error!(reason = %e, "Target is unreachable with these link lengths.");
            return None;
        }
    };

    let diagram = Diagram::new(*links, *target, solution);
    for line in diagram.summary() {
        info!("{}", line);
    }
    match diagram.to_svg() {
        Ok(svg) => Some(svg),
        Err(e) => {
            error!(reason = %e, "Failed to render the diagram.");
            None
        }
    }
}
