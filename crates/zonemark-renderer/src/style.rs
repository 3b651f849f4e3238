use serde::{Deserialize, Serialize};

use crate::render_data::{Color, Stroke};

/// Colors and sizes of the annotation overlay, in canvas pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OverlayStyle {
    pub line: Stroke,
    pub arrow_head_length: f64,
    /// Angle between the shaft and each arrowhead stroke, in degrees.
    pub arrow_head_angle: f64,
    pub entrance_radius: f64,
    pub entrance_color: Color,
    pub entrance_label: String,
    pub zone_fill: Color,
    pub zone_outline: Stroke,
    pub handle_radius: f64,
    pub handle_fill: Color,
    pub handle_hover_fill: Color,
    pub handle_active_fill: Color,
    pub handle_outline: Stroke,
    pub font_size: f64,
    pub hint_color: Color,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            line: Stroke::new(Color::rgb(255, 64, 64), 3.0),
            arrow_head_length: 15.0,
            arrow_head_angle: 30.0,
            entrance_radius: 8.0,
            entrance_color: Color::rgb(34, 197, 94),
            entrance_label: "Entrance".to_string(),
            zone_fill: Color::rgba(59, 130, 246, 0.3),
            zone_outline: Stroke::new(Color::rgb(59, 130, 246), 2.0),
            handle_radius: 6.0,
            handle_fill: Color::rgb(255, 255, 255),
            handle_hover_fill: Color::rgb(250, 204, 21),
            handle_active_fill: Color::rgb(239, 68, 68),
            handle_outline: Stroke::new(Color::rgb(59, 130, 246), 2.0),
            font_size: 14.0,
            hint_color: Color::rgb(255, 255, 255),
        }
    }
}
