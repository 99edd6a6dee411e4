//! Geometric primitives shared by the metric extractor and shape detectors.

use serde::{Deserialize, Serialize};

use crate::stroke::Point;

/// Axis-aligned extent of a point set.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Min/max reduction over `points`; `None` when there are no points.
    pub fn of(points: &[Point]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut b = BoundingBox {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };
        for p in rest {
            b.include(p);
        }
        Some(b)
    }

    pub fn include(&mut self, p: &Point) {
        self.min_x = self.min_x.min(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_x = self.max_x.max(p.x);
        self.max_y = self.max_y.max(p.y);
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Width over height, with a zero height treated as 1.
    pub fn aspect_ratio(&self) -> f64 {
        self.width() / crate::util::nonzero_or_one(self.height())
    }
}

/// Straight-line distance between the first and last point (0 for fewer than 2 points).
pub fn closure_distance(points: &[Point]) -> f64 {
    match (points.first(), points.last()) {
        (Some(first), Some(last)) => first.distance_to(last),
        _ => 0.0,
    }
}

/// A stroke reads as closed when it has at least 4 points and ends within
/// `threshold` pixels of where it started.
pub fn is_closed(points: &[Point], threshold: f64) -> bool {
    points.len() >= 4 && closure_distance(points) < threshold
}

/// Direction angle of the segment `from -> to`, in radians.
pub fn segment_angle(from: &Point, to: &Point) -> f64 {
    (to.y - from.y).atan2(to.x - from.x)
}

/// Counts consecutive segments whose direction differs by more than
/// `angle_threshold`. The difference is the raw `|a - b|` of `atan2` angles,
/// without wrap-around.
pub fn direction_change_count(points: &[Point], angle_threshold: f64) -> usize {
    let mut previous: Option<f64> = None;
    let mut changes = 0;
    for pair in points.windows(2) {
        let angle = segment_angle(&pair[0], &pair[1]);
        if let Some(prev) = previous {
            if (angle - prev).abs() > angle_threshold {
                changes += 1;
            }
        }
        previous = Some(angle);
    }
    changes
}

/// Perpendicular distance from `p` to the infinite line through `a` and `b`.
/// A zero-length chord divides by 1.
pub fn distance_to_line(p: &Point, a: &Point, b: &Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let length = (dx * dx + dy * dy).sqrt();
    let num = (dy * p.x - dx * p.y + b.x * a.y - b.y * a.x).abs();
    num / crate::util::nonzero_or_one(length)
}
