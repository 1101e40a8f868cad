//! Sparkline geometry
//!
//! Converts an ordered value series into a compact polyline:
//! - empty input => empty geometry (nothing drawn)
//! - one value => a single move-to point, no segment
//! - flat series => horizontal line (range of 0 is treated as 1)
//!
//! Y is inverted so larger values plot higher. Coordinates are rounded to
//! two decimals so the output is stable across runs.

use std::fmt;

/// Default viewbox width
pub const DEFAULT_WIDTH: f64 = 120.0;
/// Default viewbox height
pub const DEFAULT_HEIGHT: f64 = 28.0;

/// Block glyphs from lowest to highest
const GLYPHS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// A vertex in viewbox coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Path command, SVG-style
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
}

impl PathCommand {
    pub fn point(&self) -> Point {
        match self {
            PathCommand::MoveTo(p) | PathCommand::LineTo(p) => *p,
        }
    }
}

/// Generated sparkline geometry
#[derive(Debug, Clone, PartialEq)]
pub struct Sparkline {
    pub width: f64,
    pub height: f64,
    pub commands: Vec<PathCommand>,
}

impl Sparkline {
    /// No path at all
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// A single point with no connecting segment
    pub fn is_point(&self) -> bool {
        self.commands.len() == 1
    }

    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.commands.iter().map(PathCommand::point)
    }

    /// SVG path data, e.g. `M0.00 28.00 L60.00 0.00`
    pub fn to_svg_path(&self) -> String {
        self.to_string()
    }

    /// One block glyph per vertex, height-scaled into eight levels.
    pub fn glyphs(&self) -> String {
        if self.height <= 0.0 {
            return self.points().map(|_| GLYPHS[0]).collect();
        }
        self.points()
            .map(|p| {
                let level = ((self.height - p.y) / self.height * (GLYPHS.len() - 1) as f64).round();
                GLYPHS[(level.max(0.0) as usize).min(GLYPHS.len() - 1)]
            })
            .collect()
    }
}

impl fmt::Display for Sparkline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, cmd) in self.commands.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            match cmd {
                PathCommand::MoveTo(p) => write!(f, "M{:.2} {:.2}", p.x, p.y)?,
                PathCommand::LineTo(p) => write!(f, "L{:.2} {:.2}", p.x, p.y)?,
            }
        }
        Ok(())
    }
}

/// Build sparkline geometry in the default 120x28 viewbox.
pub fn sparkline_path(values: &[f64]) -> Sparkline {
    sparkline_path_sized(values, DEFAULT_WIDTH, DEFAULT_HEIGHT)
}

/// Build sparkline geometry in a `width` x `height` viewbox.
pub fn sparkline_path_sized(values: &[f64], width: f64, height: f64) -> Sparkline {
    let mut spark = Sparkline {
        width,
        height,
        commands: Vec::with_capacity(values.len()),
    };
    if values.is_empty() {
        return spark;
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = if max - min == 0.0 { 1.0 } else { max - min };
    let step = if values.len() > 1 {
        width / (values.len() - 1) as f64
    } else {
        0.0
    };

    for (i, v) in values.iter().enumerate() {
        let point = Point {
            x: round2(i as f64 * step),
            y: round2(height - ((v - min) / range) * height),
        };
        spark.commands.push(if i == 0 {
            PathCommand::MoveTo(point)
        } else {
            PathCommand::LineTo(point)
        });
    }

    spark
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
