use doodle_journal::shapes::{classify_stroke, is_circle_like, is_heart_like, is_line_like};
use doodle_journal::{
    compute_metrics, detect_shapes, summarize_doodle, DrawingSession, Point, ShapeKind, Stroke,
};

const W: f64 = 800.0;
const H: f64 = 600.0;

fn polygon(cx: f64, cy: f64, r: f64, sides: usize) -> Stroke {
    let mut coords: Vec<(f64, f64)> = (0..sides)
        .map(|i| {
            let t = 2.0 * std::f64::consts::PI * i as f64 / sides as f64;
            (cx + r * t.cos(), cy + r * t.sin())
        })
        .collect();
    coords.push(coords[0]);
    Stroke::from_coords(&coords)
}

fn zigzag(x0: f64, y: f64, steps: usize) -> Stroke {
    let coords: Vec<(f64, f64)> = (0..=steps)
        .map(|i| (x0 + 10.0 * i as f64, if i % 2 == 0 { y } else { y + 5.0 }))
        .collect();
    Stroke::from_coords(&coords)
}

fn smiley() -> DrawingSession {
    vec![
        polygon(100.0, 100.0, 100.0, 16),
        polygon(70.0, 60.0, 12.0, 16),
        polygon(130.0, 60.0, 12.0, 16),
        zigzag(50.0, 150.0, 10),
    ]
    .into()
}

#[test]
fn stroke_count_ignores_point_counts() {
    let session: DrawingSession = vec![
        Stroke::new("#000000", 4.0, vec![]),
        Stroke::from_coords(&[(10.0, 10.0)]),
        Stroke::from_coords(&[(0.0, 0.0), (5.0, 5.0)]),
        polygon(300.0, 300.0, 40.0, 8),
    ]
    .into();
    let m = compute_metrics(&session, W, H);
    assert!(m.has_strokes);
    assert_eq!(m.stroke_count, 4);
    assert_eq!(m.total_points, 1 + 2 + 9);
}

#[test]
fn empty_session_reports_canvas_center() {
    let m = compute_metrics(&DrawingSession::new(), W, H);
    assert!(!m.has_strokes);
    assert_eq!(m.avg_x, W / 2.0);
    assert_eq!(m.avg_y, H / 2.0);
    assert_eq!(m.stroke_count, 0);
    assert_eq!(m.direction_changes, 0);
    assert_eq!(m.dominant_area.to_string(), "center");
    assert_eq!(m.complexity.to_string(), "minimal");
    assert_eq!(m.energy.to_string(), "calm");
}

#[test]
fn regular_polygon_is_circle_like() {
    for sides in [8, 12, 24] {
        let stroke = polygon(200.0, 200.0, 60.0, sides);
        assert!(is_circle_like(&stroke.points), "{sides}-gon");
        assert_eq!(classify_stroke(&stroke), Some(ShapeKind::CircleLike));
    }
}

#[test]
fn straight_two_point_stroke_is_a_line() {
    let points = [Point::new(0.0, 0.0), Point::new(100.0, 0.0)];
    assert!(is_line_like(&points));
    // too short to enter the per-stroke cascade
    let session: DrawingSession = vec![Stroke::from_coords(&[(0.0, 0.0), (100.0, 0.0)])].into();
    assert!(detect_shapes(&session).is_empty());
}

#[test]
fn inverted_v_is_not_heart_and_stays_unlabelled() {
    let stroke = Stroke::from_coords(&[
        (0.0, 50.0),
        (25.0, 0.0),
        (50.0, 50.0),
        (45.0, 48.0),
        (5.0, 48.0),
    ]);
    assert!(!is_heart_like(&stroke.points));
    assert!(!is_circle_like(&stroke.points));
    assert!(!is_line_like(&stroke.points));
    assert_eq!(classify_stroke(&stroke), None);
    assert!(detect_shapes(&vec![stroke].into()).is_empty());
}

#[test]
fn smiley_face_is_appended_after_individual_labels() {
    let shapes = detect_shapes(&smiley());
    let kinds: Vec<ShapeKind> = shapes.iter().map(|s| s.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ShapeKind::CircleLike,
            ShapeKind::CircleLike,
            ShapeKind::CircleLike,
            ShapeKind::Line,
            ShapeKind::SmileyFace,
        ]
    );
    assert_eq!(shapes[4].color, None);
    assert_eq!(shapes[0].color.as_deref(), Some("#000000"));
}

#[test]
fn smiley_needs_a_mouth() {
    let mut session = smiley();
    let strokes = session.strokes()[..3].to_vec();
    session.replace_all(strokes);
    assert!(detect_shapes(&session)
        .iter()
        .all(|s| s.kind != ShapeKind::SmileyFace));
}

#[test]
fn analysis_is_idempotent() {
    let session = smiley();
    assert_eq!(
        compute_metrics(&session, W, H),
        compute_metrics(&session, W, H)
    );
    assert_eq!(detect_shapes(&session), detect_shapes(&session));
    assert_eq!(
        summarize_doodle(&session, W, H),
        summarize_doodle(&session, W, H)
    );
}

#[test]
fn empty_summary_literal() {
    assert_eq!(summarize_doodle(&DrawingSession::new(), W, H), "No strokes drawn.");
}

#[test]
fn summary_field_order() {
    let summary = summarize_doodle(&smiley(), W, H);
    let prefixes: Vec<&str> = summary
        .lines()
        .map(|l| l.split(':').next().unwrap_or_default())
        .collect();
    assert_eq!(
        prefixes,
        vec![
            "Colors used (raw hex)",
            "Stroke count",
            "Overall complexity",
            "Line energy",
            "Dominant area on canvas",
            "Direction changes (sharp turns)",
            "Detected shapes (rough heuristic)",
        ]
    );
    assert!(summary.ends_with("3 × circle-like, 1 × line, 1 × smiley-face"));
    assert!(summary.contains("Stroke count: 4"));
    assert!(summary.contains("Colors used (raw hex): #000000"));
}
