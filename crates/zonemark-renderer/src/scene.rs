//! Pure rendering of tool state into draw commands.
//!
//! Hosts call [`Scene::render`] after every state change and replay the
//! resulting frame onto their canvas. Nothing here touches a UI framework.

use zonemark_core::{
    CanvasSize, ImageHandle, LineGeometry, LineTool, Point, ZoneGeometry, ZoneTool,
};

use crate::render_data::{DrawCommand, FillRule, RenderFrame};
use crate::style::OverlayStyle;

/// Something that can draw itself over an optional snapshot backdrop.
pub trait Scene {
    fn render(
        &self,
        canvas: CanvasSize,
        background: Option<ImageHandle>,
        style: &OverlayStyle,
    ) -> RenderFrame;
}

/// Clear the surface and draw the snapshot scaled to the full canvas.
fn backdrop(canvas: CanvasSize, background: Option<ImageHandle>) -> RenderFrame {
    let mut frame = RenderFrame::empty(canvas);
    frame.push(DrawCommand::Clear {
        width: canvas.width,
        height: canvas.height,
    });
    if let Some(handle) = background {
        frame.push(DrawCommand::Image {
            handle,
            x: 0.0,
            y: 0.0,
            width: canvas.width,
            height: canvas.height,
        });
    }
    frame
}

/// The two barb end points of an arrowhead at `line`'s end.
///
/// Returns `None` for a zero-length line, which has no direction.
pub fn arrowhead(line: &LineGeometry, length: f64, angle_deg: f64) -> Option<[Point; 2]> {
    if line.length() == 0.0 {
        return None;
    }
    let end = line.end();
    let back = line.angle() + std::f64::consts::PI;
    let spread = angle_deg.to_radians();
    let barb = |a: f64| Point::new(end.x + length * a.cos(), end.y + length * a.sin());
    Some([barb(back - spread), barb(back + spread)])
}

fn push_line(frame: &mut RenderFrame, line: &LineGeometry, style: &OverlayStyle) {
    frame.push(DrawCommand::Line {
        from: line.start(),
        to: line.end(),
        stroke: style.line,
    });
    if let Some(barbs) = arrowhead(line, style.arrow_head_length, style.arrow_head_angle) {
        for barb in barbs {
            frame.push(DrawCommand::Line {
                from: line.end(),
                to: barb,
                stroke: style.line,
            });
        }
    }
}

fn push_entrance(frame: &mut RenderFrame, marker: Point, style: &OverlayStyle) {
    frame.push(DrawCommand::Circle {
        center: marker,
        radius: style.entrance_radius,
        fill: Some(style.entrance_color),
        stroke: None,
    });
    frame.push(DrawCommand::Text {
        position: marker.translate(style.entrance_radius + 4.0, -style.entrance_radius),
        text: style.entrance_label.clone(),
        color: style.entrance_color,
        font_size: style.font_size,
    });
}

fn push_hint(frame: &mut RenderFrame, text: &str, style: &OverlayStyle) {
    frame.push(DrawCommand::Text {
        position: Point::new(10.0, 10.0 + style.font_size),
        text: text.to_string(),
        color: style.hint_color,
        font_size: style.font_size,
    });
}

impl Scene for LineTool {
    fn render(
        &self,
        canvas: CanvasSize,
        background: Option<ImageHandle>,
        style: &OverlayStyle,
    ) -> RenderFrame {
        let mut frame = backdrop(canvas, background);
        if let Some(line) = self.line() {
            push_line(&mut frame, &line, style);
        }
        if let Some(marker) = self.entrance_side() {
            push_entrance(&mut frame, marker, style);
        }
        if self.awaiting_entrance() {
            push_hint(&mut frame, "Click to mark the entrance side", style);
        }
        frame
    }
}

fn push_zone(
    frame: &mut RenderFrame,
    zone: &ZoneGeometry,
    hovered: Option<usize>,
    active: Option<usize>,
    style: &OverlayStyle,
) {
    frame.push(DrawCommand::Polygon {
        points: zone.points.clone(),
        fill: Some(style.zone_fill),
        stroke: Some(style.zone_outline),
        fill_rule: FillRule::NonZero,
    });
    for (i, p) in zone.points.iter().enumerate() {
        let fill = if active == Some(i) {
            style.handle_active_fill
        } else if hovered == Some(i) {
            style.handle_hover_fill
        } else {
            style.handle_fill
        };
        frame.push(DrawCommand::Circle {
            center: *p,
            radius: style.handle_radius,
            fill: Some(fill),
            stroke: Some(style.handle_outline),
        });
    }
}

impl Scene for ZoneTool {
    fn render(
        &self,
        canvas: CanvasSize,
        background: Option<ImageHandle>,
        style: &OverlayStyle,
    ) -> RenderFrame {
        let mut frame = backdrop(canvas, background);
        if let Some(zone) = self.zone() {
            push_zone(
                &mut frame,
                zone,
                self.hovered_vertex(),
                self.dragging_vertex(),
                style,
            );
        }
        frame
    }
}
