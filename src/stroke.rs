//! Drawing data: points, strokes, and the session that owns them.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{JournalError, JournalResult};

pub const DEFAULT_COLOR: &str = "#000000";
pub const DEFAULT_WIDTH: f64 = 4.0;

/// A position in canvas pixels, origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl From<(f64, f64)> for Point {
    fn from(v: (f64, f64)) -> Self {
        Point { x: v.0, y: v.1 }
    }
}

impl From<Point> for (f64, f64) {
    fn from(p: Point) -> Self {
        (p.x, p.y)
    }
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

fn default_width() -> f64 {
    DEFAULT_WIDTH
}

// Saved sketches may carry `null`, `""` or `0` where a value was never set.
fn color_or_default<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    let color = Option::<String>::deserialize(d)?;
    Ok(color
        .filter(|c| !c.is_empty())
        .unwrap_or_else(default_color))
}

fn width_or_default<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    let width = Option::<f64>::deserialize(d)?;
    Ok(width.filter(|w| *w > 0.0).unwrap_or(DEFAULT_WIDTH))
}

/// One finished pointer drag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    #[serde(default = "default_color", deserialize_with = "color_or_default")]
    pub color: String,
    #[serde(default = "default_width", deserialize_with = "width_or_default")]
    pub width: f64,
    #[serde(default)]
    pub points: Vec<Point>,
}

impl Stroke {
    pub fn new(color: impl Into<String>, width: f64, points: Vec<Point>) -> Self {
        let width = if width > 0.0 { width } else { DEFAULT_WIDTH };
        Self {
            color: color.into(),
            width,
            points,
        }
    }

    /// Convenience for tests and fixtures: black, default width.
    pub fn from_coords(coords: &[(f64, f64)]) -> Self {
        Self::new(
            DEFAULT_COLOR,
            DEFAULT_WIDTH,
            coords.iter().copied().map(Point::from).collect(),
        )
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }
}

/// An in-progress gesture. Points accumulate here and the stroke only
/// becomes visible to analysis once `finish` hands it over.
#[derive(Debug)]
pub struct StrokeBuilder {
    color: String,
    width: f64,
    points: Vec<Point>,
}

impl StrokeBuilder {
    pub fn begin(color: impl Into<String>, width: f64, first: Point) -> Self {
        Self {
            color: color.into(),
            width,
            points: vec![first],
        }
    }

    pub fn extend(&mut self, point: Point) {
        self.points.push(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn finish(self) -> Stroke {
        Stroke::new(self.color, self.width, self.points)
    }
}

/// Everything currently on the canvas, in drawing order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DrawingSession {
    strokes: Vec<Stroke>,
}

impl DrawingSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, stroke: Stroke) {
        self.strokes.push(stroke);
    }

    pub fn replace_all(&mut self, strokes: Vec<Stroke>) {
        self.strokes = strokes;
    }

    pub fn clear(&mut self) {
        self.strokes.clear();
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    pub fn from_json(json: &str) -> JournalResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> JournalResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Reject coordinates and widths the analysis core has no meaning for.
    pub fn validate(&self) -> JournalResult<()> {
        for (idx, stroke) in self.strokes.iter().enumerate() {
            if !(stroke.width.is_finite() && stroke.width > 0.0) {
                return Err(JournalError::InvalidInput(format!(
                    "stroke {idx} has non-positive width {}",
                    stroke.width
                )));
            }
            if let Some(p) = stroke
                .points
                .iter()
                .find(|p| !(p.x.is_finite() && p.y.is_finite()))
            {
                return Err(JournalError::InvalidInput(format!(
                    "stroke {idx} has non-finite point ({}, {})",
                    p.x, p.y
                )));
            }
        }
        Ok(())
    }
}

impl From<Vec<Stroke>> for DrawingSession {
    fn from(strokes: Vec<Stroke>) -> Self {
        Self { strokes }
    }
}

impl FromIterator<Stroke> for DrawingSession {
    fn from_iter<I: IntoIterator<Item = Stroke>>(iter: I) -> Self {
        Self {
            strokes: iter.into_iter().collect(),
        }
    }
}
