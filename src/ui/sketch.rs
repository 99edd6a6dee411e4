use std::str::FromStr;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Color,
    symbols::Marker,
    widgets::{
        canvas::{Canvas, Line as CanvasLine, Points},
        Block, Widget,
    },
};

use crate::stroke::DrawingSession;

/// Terminal color for a stroke. Black ink and unparsable colors fall back
/// to the terminal's default foreground.
pub fn stroke_color(color: &str) -> Color {
    match Color::from_str(color.trim()) {
        Ok(Color::Black) | Ok(Color::Rgb(0, 0, 0)) | Err(_) => Color::Reset,
        Ok(c) => c,
    }
}

/// Draws a saved sketch in canvas coordinates (origin top-left, y down).
pub struct SketchView<'a> {
    pub session: &'a DrawingSession,
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub block: Block<'a>,
}

impl Widget for SketchView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let height = self.canvas_height;
        let session = self.session;
        Canvas::default()
            .block(self.block)
            .marker(Marker::Braille)
            .x_bounds([0.0, self.canvas_width])
            .y_bounds([0.0, height])
            .paint(move |ctx| {
                for stroke in session.strokes() {
                    let color = stroke_color(&stroke.color);
                    if let [only] = stroke.points.as_slice() {
                        let coords = [(only.x, height - only.y)];
                        ctx.draw(&Points {
                            coords: &coords,
                            color,
                        });
                        continue;
                    }
                    for pair in stroke.points.windows(2) {
                        ctx.draw(&CanvasLine {
                            x1: pair[0].x,
                            y1: height - pair[0].y,
                            x2: pair[1].x,
                            y2: height - pair[1].y,
                            color,
                        });
                    }
                }
            })
            .render(area, buf);
    }
}
