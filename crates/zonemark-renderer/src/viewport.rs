use serde::{Deserialize, Serialize};

use zonemark_core::{CanvasSize, Point};

/// On-screen rectangle the canvas element occupies, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl DisplayRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// A rect at the origin showing the canvas at 1:1.
    pub fn identity(canvas: CanvasSize) -> Self {
        Self::new(0.0, 0.0, canvas.width, canvas.height)
    }

    pub fn is_valid(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// Map client (CSS pixel) coordinates to canvas pixel coordinates.
///
/// `canvasX = (clientX - rect.left) * canvas.width / rect.width`, likewise
/// for y. Returns `None` when the canvas has no on-screen area.
pub fn client_to_canvas(client: Point, rect: &DisplayRect, canvas: CanvasSize) -> Option<Point> {
    if !rect.is_valid() {
        return None;
    }
    Some(Point::new(
        (client.x - rect.left) * (canvas.width / rect.width),
        (client.y - rect.top) * (canvas.height / rect.height),
    ))
}

/// Inverse of [`client_to_canvas`].
pub fn canvas_to_client(p: Point, rect: &DisplayRect, canvas: CanvasSize) -> Option<Point> {
    if !rect.is_valid() || canvas.width <= 0.0 || canvas.height <= 0.0 {
        return None;
    }
    Some(Point::new(
        p.x * (rect.width / canvas.width) + rect.left,
        p.y * (rect.height / canvas.height) + rect.top,
    ))
}

/// Fixed-resolution drawing surface and where it currently sits on screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasViewport {
    pub canvas: CanvasSize,
    pub display: DisplayRect,
}

impl CanvasViewport {
    pub fn new(canvas: CanvasSize) -> Self {
        Self {
            canvas,
            display: DisplayRect::identity(canvas),
        }
    }

    pub fn with_display(canvas: CanvasSize, display: DisplayRect) -> Self {
        Self { canvas, display }
    }

    /// Update the on-screen rect, e.g. after a layout change.
    pub fn set_display(&mut self, display: DisplayRect) {
        if !display.is_valid() {
            log::warn!(
                "ignoring display rect with no area: {}x{}",
                display.width,
                display.height
            );
            return;
        }
        self.display = display;
    }

    pub fn to_canvas(&self, client_x: f64, client_y: f64) -> Option<Point> {
        client_to_canvas(Point::new(client_x, client_y), &self.display, self.canvas)
    }

    /// Largest aspect-preserving rect for the canvas inside a container,
    /// centered (letterboxed) at the container's origin.
    pub fn fit_within(&self, left: f64, top: f64, width: f64, height: f64) -> DisplayRect {
        let zoom = (width / self.canvas.width).min(height / self.canvas.height);
        let w = self.canvas.width * zoom;
        let h = self.canvas.height * zoom;
        DisplayRect::new(left + (width - w) / 2.0, top + (height - h) / 2.0, w, h)
    }
}

impl Default for CanvasViewport {
    fn default() -> Self {
        Self::new(CanvasSize::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_half_scale_mapping() {
        let canvas = CanvasSize::new(640.0, 480.0);
        let rect = DisplayRect::new(0.0, 0.0, 320.0, 240.0);
        let p = client_to_canvas(Point::new(160.0, 120.0), &rect, canvas).unwrap();
        assert!((p.x - 320.0).abs() < 1e-10);
        assert!((p.y - 240.0).abs() < 1e-10);
    }

    #[test]
    fn test_offset_and_anisotropic_mapping() {
        let canvas = CanvasSize::new(640.0, 480.0);
        let rect = DisplayRect::new(100.0, 50.0, 1280.0, 240.0);
        let p = client_to_canvas(Point::new(740.0, 110.0), &rect, canvas).unwrap();
        assert!((p.x - 320.0).abs() < 1e-10);
        assert!((p.y - 120.0).abs() < 1e-10);

        let back = canvas_to_client(p, &rect, canvas).unwrap();
        assert!((back.x - 740.0).abs() < 1e-10);
        assert!((back.y - 110.0).abs() < 1e-10);
    }

    #[test]
    fn test_mapping_scales_with_display_size() {
        let canvas = CanvasSize::default();
        for (w, h) in [(640.0, 480.0), (1920.0, 1440.0), (200.0, 150.0)] {
            let rect = DisplayRect::new(0.0, 0.0, w, h);
            let (px, py) = (w * 0.25, h * 0.75);
            let p = client_to_canvas(Point::new(px, py), &rect, canvas).unwrap();
            assert!((p.x - px * 640.0 / w).abs() < 1e-9);
            assert!((p.y - py * 480.0 / h).abs() < 1e-9);
        }
    }

    #[test]
    fn test_zero_area_rect() {
        let rect = DisplayRect::new(0.0, 0.0, 0.0, 240.0);
        assert!(client_to_canvas(Point::new(1.0, 1.0), &rect, CanvasSize::default()).is_none());

        let mut viewport = CanvasViewport::default();
        viewport.set_display(rect);
        assert_eq!(viewport.display, DisplayRect::identity(CanvasSize::default()));
    }

    #[test]
    fn test_fit_within_letterboxes() {
        let viewport = CanvasViewport::default();
        let rect = viewport.fit_within(0.0, 0.0, 1000.0, 480.0);
        assert!((rect.width - 640.0).abs() < 1e-10);
        assert!((rect.left - 180.0).abs() < 1e-10);
        assert!((rect.top - 0.0).abs() < 1e-10);
    }
}
