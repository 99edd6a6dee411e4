// Library surface for the `doodle` binary, headless tests and reuse.
pub mod app_dirs;
pub mod browser;
pub mod calendar;
pub mod config;
pub mod error;
pub mod features;
pub mod geometry;
pub mod journal;
pub mod mood;
pub mod reflection;
pub mod runtime;
pub mod shapes;
pub mod stroke;
pub mod summary;
pub mod ui;
pub mod util;

pub use error::{JournalError, JournalResult};
pub use features::{compute_metrics, Metrics};
pub use shapes::{detect_shapes, Shape, ShapeKind};
pub use stroke::{DrawingSession, Point, Stroke, StrokeBuilder};
pub use summary::summarize_doodle;
