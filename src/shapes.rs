//! Best-effort shape labels from raw stroke geometry.
//!
//! Every detector is a threshold heuristic over pixel coordinates. Per stroke
//! the cascade is heart, then circle, then line; the first match wins. The
//! smiley-face detector runs once over the whole session and reuses strokes
//! that may already carry their own label.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::geometry::{direction_change_count, distance_to_line, is_closed, BoundingBox};
use crate::stroke::{DrawingSession, Point, Stroke};
use crate::util::coefficient_of_variation;

/// Strokes shorter than this never get a per-stroke label.
pub const MIN_CLASSIFIABLE_POINTS: usize = 4;
/// First/last point gap under which circles and hearts count as closed.
pub const CLOSURE_THRESHOLD: f64 = 45.0;

pub const CIRCLE_MIN_POINTS: usize = 8;
pub const CIRCLE_MIN_SIZE: f64 = 20.0;
pub const CIRCLE_ASPECT_MIN: f64 = 0.6;
pub const CIRCLE_ASPECT_MAX: f64 = 1.4;
pub const CIRCLE_MAX_RADIAL_CV: f64 = 0.55;

pub const HEART_MIN_WIDTH: f64 = 20.0;
pub const HEART_MIN_HEIGHT: f64 = 30.0;
pub const HEART_ASPECT_MIN: f64 = 0.5;
pub const HEART_ASPECT_MAX: f64 = 1.1;
/// Tip candidates lie within this fraction of the width from the center line.
pub const HEART_TIP_BAND: f64 = 0.25;
/// The tip must sit at or below this fraction of the height.
pub const HEART_TIP_MIN_DEPTH: f64 = 0.6;
/// Lobe points lie above this fraction of the height.
pub const HEART_LOBE_DEPTH: f64 = 0.4;
pub const HEART_MIN_LOBE_POINTS: usize = 6;

pub const LINE_MIN_LENGTH: f64 = 40.0;
pub const LINE_MAX_DEVIATION: f64 = 8.0;

pub const EYE_MAX_FRACTION: f64 = 0.3;
pub const EYE_MAX_DEPTH: f64 = 0.5;
pub const MIN_EYES: usize = 2;
pub const MOUTH_MIN_DEPTH: f64 = 0.55;
pub const MOUTH_MIN_WIDTH_FRACTION: f64 = 0.3;
pub const MOUTH_MIN_FLATNESS: f64 = 2.0;
pub const MOUTH_MIN_TURNS: usize = 2;
pub const MOUTH_MAX_TURNS: usize = 30;
pub const MOUTH_TURN_THRESHOLD: f64 = PI / 6.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum_macros::Display)]
pub enum ShapeKind {
    #[serde(rename = "heart-like")]
    #[strum(serialize = "heart-like")]
    HeartLike,
    #[serde(rename = "circle-like")]
    #[strum(serialize = "circle-like")]
    CircleLike,
    #[serde(rename = "line")]
    #[strum(serialize = "line")]
    Line,
    #[serde(rename = "smiley-face")]
    #[strum(serialize = "smiley-face")]
    SmileyFace,
}

/// A detected shape. Per-stroke shapes carry the stroke's color; the
/// composite smiley face carries none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    #[serde(rename = "type")]
    pub kind: ShapeKind,
    pub color: Option<String>,
}

impl Shape {
    fn of_stroke(kind: ShapeKind, stroke: &Stroke) -> Self {
        Self {
            kind,
            color: Some(stroke.color.clone()),
        }
    }
}

pub fn is_circle_like(points: &[Point]) -> bool {
    if points.len() < CIRCLE_MIN_POINTS || !is_closed(points, CLOSURE_THRESHOLD) {
        return false;
    }
    let Some(b) = BoundingBox::of(points) else {
        return false;
    };
    if b.width() < CIRCLE_MIN_SIZE || b.height() < CIRCLE_MIN_SIZE {
        return false;
    }
    let aspect = b.aspect_ratio();
    if !(CIRCLE_ASPECT_MIN..=CIRCLE_ASPECT_MAX).contains(&aspect) {
        return false;
    }

    let center = b.center();
    let radii: Vec<f64> = points.iter().map(|p| p.distance_to(&center)).collect();
    coefficient_of_variation(&radii).is_some_and(|cv| cv < CIRCLE_MAX_RADIAL_CV)
}

pub fn is_heart_like(points: &[Point]) -> bool {
    if !is_closed(points, CLOSURE_THRESHOLD) {
        return false;
    }
    let Some(b) = BoundingBox::of(points) else {
        return false;
    };
    let (w, h) = (b.width(), b.height());
    if w < HEART_MIN_WIDTH || h < HEART_MIN_HEIGHT {
        return false;
    }
    let aspect = b.aspect_ratio();
    if !(HEART_ASPECT_MIN..=HEART_ASPECT_MAX).contains(&aspect) {
        return false;
    }

    let cx = b.center().x;

    // lowest point near the vertical center line; ties keep the earliest
    let mut tip: Option<&Point> = None;
    for p in points {
        if (p.x - cx).abs() < w * HEART_TIP_BAND && tip.map_or(true, |t| p.y > t.y) {
            tip = Some(p);
        }
    }
    match tip {
        Some(t) if t.y >= b.min_y + h * HEART_TIP_MIN_DEPTH => {}
        _ => return false,
    }

    let lobe_line = b.min_y + h * HEART_LOBE_DEPTH;
    let (left, right) = points
        .iter()
        .filter(|p| p.y < lobe_line)
        .fold((0usize, 0usize), |(l, r), p| {
            if p.x < cx {
                (l + 1, r)
            } else {
                (l, r + 1)
            }
        });

    left >= HEART_MIN_LOBE_POINTS && right >= HEART_MIN_LOBE_POINTS
}

pub fn is_line_like(points: &[Point]) -> bool {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return false;
    };
    if points.len() < 2 || first.distance_to(last) < LINE_MIN_LENGTH {
        return false;
    }

    let max_deviation = points
        .iter()
        .map(|p| distance_to_line(p, first, last))
        .fold(0.0_f64, f64::max);

    max_deviation < LINE_MAX_DEVIATION
}

/// Per-stroke cascade: heart, circle, line. `None` for short or unmatched strokes.
pub fn classify_stroke(stroke: &Stroke) -> Option<ShapeKind> {
    let pts = &stroke.points;
    if pts.len() < MIN_CLASSIFIABLE_POINTS {
        return None;
    }
    if is_heart_like(pts) {
        Some(ShapeKind::HeartLike)
    } else if is_circle_like(pts) {
        Some(ShapeKind::CircleLike)
    } else if is_line_like(pts) {
        Some(ShapeKind::Line)
    } else {
        None
    }
}

/// The largest circle-like stroke, taken as the outline of a face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceOutline {
    pub stroke_index: usize,
    pub bounds: BoundingBox,
}

pub fn find_face_outline(strokes: &[Stroke]) -> Option<FaceOutline> {
    let mut best: Option<FaceOutline> = None;
    for (idx, stroke) in strokes.iter().enumerate() {
        if !is_circle_like(&stroke.points) {
            continue;
        }
        let Some(bounds) = BoundingBox::of(&stroke.points) else {
            continue;
        };
        if best.map_or(true, |f| bounds.area() > f.bounds.area()) {
            best = Some(FaceOutline {
                stroke_index: idx,
                bounds,
            });
        }
    }
    best
}

/// Centers of small circle-like strokes in the face's upper half. Empty
/// unless at least two qualify. The outline stroke itself is never an eye.
pub fn find_eyes(strokes: &[Stroke], face: &FaceOutline) -> Vec<Point> {
    let fb = &face.bounds;
    let eyes: Vec<Point> = strokes
        .iter()
        .enumerate()
        .filter(|(idx, _)| *idx != face.stroke_index)
        .filter(|(_, s)| is_circle_like(&s.points))
        .filter_map(|(_, s)| BoundingBox::of(&s.points))
        .filter(|b| {
            b.width() <= fb.width() * EYE_MAX_FRACTION && b.height() <= fb.height() * EYE_MAX_FRACTION
        })
        .map(|b| b.center())
        .filter(|c| c.y < fb.min_y + fb.height() * EYE_MAX_DEPTH)
        .collect();

    if eyes.len() >= MIN_EYES {
        eyes
    } else {
        Vec::new()
    }
}

/// First stroke, in drawing order, that is wide, flat, low in the face and
/// wiggles a bounded amount.
pub fn find_mouth(strokes: &[Stroke], face: &FaceOutline) -> Option<usize> {
    let fb = &face.bounds;
    strokes.iter().position(|s| {
        let Some(b) = BoundingBox::of(&s.points) else {
            return false;
        };
        if is_circle_like(&s.points) {
            return false;
        }
        if b.center().y < fb.min_y + fb.height() * MOUTH_MIN_DEPTH {
            return false;
        }
        if b.width() < fb.width() * MOUTH_MIN_WIDTH_FRACTION || b.width() < b.height() * MOUTH_MIN_FLATNESS {
            return false;
        }
        let turns = direction_change_count(&s.points, MOUTH_TURN_THRESHOLD);
        (MOUTH_MIN_TURNS..=MOUTH_MAX_TURNS).contains(&turns)
    })
}

/// Face outline plus two eyes plus a mouth, composed from separate strokes.
pub fn detect_smiley_face(strokes: &[Stroke]) -> Option<Shape> {
    let face = find_face_outline(strokes)?;
    let eyes = find_eyes(strokes, &face);
    if eyes.is_empty() {
        return None;
    }
    let mouth = find_mouth(strokes, &face)?;
    tracing::debug!(
        face = face.stroke_index,
        eyes = eyes.len(),
        mouth,
        "smiley face detected"
    );
    Some(Shape {
        kind: ShapeKind::SmileyFace,
        color: None,
    })
}

/// Labels every classifiable stroke in drawing order, then appends a smiley
/// face if the session contains one.
pub fn detect_shapes(session: &DrawingSession) -> Vec<Shape> {
    let strokes = session.strokes();
    let mut shapes: Vec<Shape> = strokes
        .iter()
        .filter_map(|s| classify_stroke(s).map(|kind| Shape::of_stroke(kind, s)))
        .collect();

    if let Some(smiley) = detect_smiley_face(strokes) {
        shapes.push(smiley);
    }
    shapes
}
