//! Aggregate drawing metrics over a whole session.

use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_4;

use crate::geometry::{segment_angle, BoundingBox};
use crate::stroke::DrawingSession;

/// Segment turns sharper than this count toward `direction_changes`.
pub const METRIC_TURN_THRESHOLD: f64 = FRAC_PI_4;
pub const TOP_AREA_FRACTION: f64 = 0.33;
pub const BOTTOM_AREA_FRACTION: f64 = 0.66;
pub const VERY_BUSY_STROKES: usize = 15;
pub const VERY_BUSY_TURNS: usize = 40;
pub const BUSY_STROKES: usize = 7;
pub const BUSY_TURNS: usize = 20;
/// Total ink length, in canvas widths, above which a drawing is energetic.
pub const ENERGETIC_WIDTHS: f64 = 5.0;
pub const DYNAMIC_WIDTHS: f64 = 2.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DominantArea {
    Top,
    Center,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
pub enum Complexity {
    #[serde(rename = "minimal")]
    #[strum(serialize = "minimal")]
    Minimal,
    #[serde(rename = "moderately busy")]
    #[strum(serialize = "moderately busy")]
    ModeratelyBusy,
    #[serde(rename = "very busy")]
    #[strum(serialize = "very busy")]
    VeryBusy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Energy {
    Calm,
    Dynamic,
    Energetic,
}

/// Snapshot of a session's drawing character, recomputed from scratch on every call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub has_strokes: bool,
    /// Distinct stroke colors in first-seen order.
    pub colors: Vec<String>,
    pub stroke_count: usize,
    pub total_length: f64,
    pub total_points: usize,
    pub avg_x: f64,
    pub avg_y: f64,
    pub bounds: BoundingBox,
    pub dominant_area: DominantArea,
    pub complexity: Complexity,
    pub energy: Energy,
    pub direction_changes: usize,
}

impl Metrics {
    fn empty(canvas_width: f64, canvas_height: f64) -> Self {
        Self {
            has_strokes: false,
            colors: Vec::new(),
            stroke_count: 0,
            total_length: 0.0,
            total_points: 0,
            avg_x: canvas_width / 2.0,
            avg_y: canvas_height / 2.0,
            bounds: BoundingBox::default(),
            dominant_area: DominantArea::Center,
            complexity: Complexity::Minimal,
            energy: Energy::Calm,
            direction_changes: 0,
        }
    }
}

pub fn classify_area(avg_y: f64, canvas_height: f64) -> DominantArea {
    if avg_y < canvas_height * TOP_AREA_FRACTION {
        DominantArea::Top
    } else if avg_y > canvas_height * BOTTOM_AREA_FRACTION {
        DominantArea::Bottom
    } else {
        DominantArea::Center
    }
}

pub fn classify_complexity(stroke_count: usize, direction_changes: usize) -> Complexity {
    if stroke_count > VERY_BUSY_STROKES || direction_changes > VERY_BUSY_TURNS {
        Complexity::VeryBusy
    } else if stroke_count > BUSY_STROKES || direction_changes > BUSY_TURNS {
        Complexity::ModeratelyBusy
    } else {
        Complexity::Minimal
    }
}

pub fn classify_energy(total_length: f64, canvas_width: f64) -> Energy {
    if total_length > canvas_width * ENERGETIC_WIDTHS {
        Energy::Energetic
    } else if total_length > canvas_width * DYNAMIC_WIDTHS {
        Energy::Dynamic
    } else {
        Energy::Calm
    }
}

/// Single pass over every stroke and point of `session`.
///
/// Strokes with fewer than two points still count toward `stroke_count`, the
/// position averages and the bounding box, but contribute no length or turns.
/// The turn detector starts fresh on each stroke.
pub fn compute_metrics(session: &DrawingSession, canvas_width: f64, canvas_height: f64) -> Metrics {
    if session.is_empty() {
        return Metrics::empty(canvas_width, canvas_height);
    }

    let mut colors: Vec<String> = Vec::new();
    let mut total_length = 0.0;
    let mut total_points = 0usize;
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut bounds: Option<BoundingBox> = None;
    let mut direction_changes = 0usize;

    for stroke in session.strokes() {
        if !colors.contains(&stroke.color) {
            colors.push(stroke.color.clone());
        }

        for p in &stroke.points {
            sum_x += p.x;
            sum_y += p.y;
            total_points += 1;
            match bounds.as_mut() {
                Some(b) => b.include(p),
                None => bounds = BoundingBox::of(std::slice::from_ref(p)),
            }
        }

        let mut previous_angle: Option<f64> = None;
        for pair in stroke.points.windows(2) {
            total_length += pair[0].distance_to(&pair[1]);
            let angle = segment_angle(&pair[0], &pair[1]);
            if let Some(prev) = previous_angle {
                if (angle - prev).abs() > METRIC_TURN_THRESHOLD {
                    direction_changes += 1;
                }
            }
            previous_angle = Some(angle);
        }
    }

    let (avg_x, avg_y) = if total_points > 0 {
        (sum_x / total_points as f64, sum_y / total_points as f64)
    } else {
        (canvas_width / 2.0, canvas_height / 2.0)
    };
    let stroke_count = session.len();

    let metrics = Metrics {
        has_strokes: true,
        colors,
        stroke_count,
        total_length,
        total_points,
        avg_x,
        avg_y,
        bounds: bounds.unwrap_or_default(),
        dominant_area: classify_area(avg_y, canvas_height),
        complexity: classify_complexity(stroke_count, direction_changes),
        energy: classify_energy(total_length, canvas_width),
        direction_changes,
    };
    tracing::debug!(
        strokes = metrics.stroke_count,
        points = metrics.total_points,
        length = metrics.total_length,
        turns = metrics.direction_changes,
        "computed doodle metrics"
    );
    metrics
}
