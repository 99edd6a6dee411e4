//! Text renderings of a doodle: the fixed-format summary handed to the
//! reflection service, and the numbered live shape list.

use itertools::Itertools;

use crate::features::compute_metrics;
use crate::shapes::{detect_shapes, Shape, ShapeKind};
use crate::stroke::DrawingSession;

pub const NO_STROKES: &str = "No strokes drawn.";
pub const NO_SHAPES_SUMMARY: &str = "No specific shapes confidently detected.";
pub const NO_SHAPES_LIST: &str = "No shapes confidently detected yet.";

/// Counts shapes by kind, ordered by each kind's first appearance.
pub fn shape_breakdown(shapes: &[Shape]) -> Vec<(ShapeKind, usize)> {
    let mut counts: Vec<(ShapeKind, usize)> = Vec::new();
    for shape in shapes {
        match counts.iter_mut().find(|(kind, _)| *kind == shape.kind) {
            Some((_, n)) => *n += 1,
            None => counts.push((shape.kind, 1)),
        }
    }
    counts
}

fn describe_shapes(shapes: &[Shape]) -> String {
    if shapes.is_empty() {
        return NO_SHAPES_SUMMARY.to_string();
    }
    shape_breakdown(shapes)
        .iter()
        .map(|(kind, count)| format!("{count} × {kind}"))
        .join(", ")
}

/// Fixed-template summary of metrics and detected shapes, or
/// `No strokes drawn.` for an empty session.
pub fn summarize_doodle(session: &DrawingSession, canvas_width: f64, canvas_height: f64) -> String {
    let m = compute_metrics(session, canvas_width, canvas_height);
    if !m.has_strokes {
        return NO_STROKES.to_string();
    }

    let colors = if m.colors.is_empty() {
        "none".to_string()
    } else {
        m.colors.join(", ")
    };
    let shapes = detect_shapes(session);

    [
        format!("Colors used (raw hex): {colors}"),
        format!("Stroke count: {}", m.stroke_count),
        format!("Overall complexity: {}", m.complexity),
        format!("Line energy: {}", m.energy),
        format!("Dominant area on canvas: {}", m.dominant_area),
        format!("Direction changes (sharp turns): {}", m.direction_changes),
        format!("Detected shapes (rough heuristic): {}", describe_shapes(&shapes)),
    ]
    .join("\n")
}

/// Numbered lines for the live shape list, e.g. `1. circle-like – red`.
pub fn shape_list_lines(shapes: &[Shape]) -> Vec<String> {
    if shapes.is_empty() {
        return vec![NO_SHAPES_LIST.to_string()];
    }
    shapes
        .iter()
        .enumerate()
        .map(|(idx, shape)| match (&shape.kind, &shape.color) {
            (ShapeKind::SmileyFace, _) | (_, None) => format!("{}. {}", idx + 1, shape.kind),
            (_, Some(color)) => format!("{}. {} – {}", idx + 1, shape.kind, describe_color(color)),
        })
        .collect()
}

/// Hue/saturation/lightness of a `#rgb` or `#rrggbb` color, hue in degrees.
pub fn hex_to_hsl(hex: &str) -> Option<(f64, f64, f64)> {
    let c = hex.trim().trim_start_matches('#');
    let expanded: String = match c.len() {
        3 => c.chars().flat_map(|ch| [ch, ch]).collect(),
        6 => c.to_string(),
        _ => return None,
    };
    let channel = |i: usize| -> Option<f64> {
        let v = u8::from_str_radix(expanded.get(i..i + 2)?, 16).ok()?;
        Some(v as f64 / 255.0)
    };
    let (r, g, b) = (channel(0)?, channel(2)?, channel(4)?);

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;
    if max == min {
        return Some((0.0, 0.0, l));
    }

    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };
    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };
    Some((h * 60.0, s, l))
}

/// Friendly name for a stroke color, e.g. `deep red` or `baby blue`.
pub fn describe_color(hex: &str) -> String {
    let Some((h, s, l)) = hex_to_hsl(hex) else {
        return "unknown color".to_string();
    };

    if s < 0.15 {
        return if l > 0.8 {
            "very light gray"
        } else if l < 0.25 {
            "dark gray"
        } else {
            "gray"
        }
        .to_string();
    }

    let base = match h {
        h if !(15.0..345.0).contains(&h) => "red",
        h if h < 45.0 => "orange",
        h if h < 65.0 => "yellow",
        h if h < 150.0 => "green",
        h if h < 210.0 => "teal",
        h if h < 260.0 => "blue",
        h if h < 300.0 => "purple",
        _ => "pink",
    };

    match base {
        "blue" if l > 0.6 => return "baby blue".to_string(),
        "pink" if l > 0.6 => return "soft pink".to_string(),
        _ => {}
    }

    let tone = if l > 0.78 {
        "very light "
    } else if l > 0.6 {
        "light "
    } else if l < 0.3 {
        "deep "
    } else {
        ""
    };
    format!("{tone}{base}")
}
