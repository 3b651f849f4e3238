//! # Zonemark Renderer
//!
//! Maps pointer coordinates from the on-screen canvas element into the
//! fixed-resolution drawing surface, and turns tool state into a list of
//! serializable draw commands that a browser or native canvas replays.

pub mod render_data;
pub mod scene;
pub mod style;
pub mod viewport;

pub use render_data::{Color, DrawCommand, FillRule, RenderFrame, Stroke};
pub use scene::Scene;
pub use style::OverlayStyle;
pub use viewport::{client_to_canvas, CanvasViewport, DisplayRect};
