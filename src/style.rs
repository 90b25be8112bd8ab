//! Visual themes shared by all chart types.

use crate::render::Color;

/// Visual theme for charts.
///
/// Per-element colors from a datasource win over the theme; the theme covers
/// chrome (background, axes, markers) and the heat-map color ramp.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    /// Background fill behind the chart.
    pub background: Color,
    /// Axis line color.
    pub axis: Color,
    /// Marker gridline color.
    pub grid: Color,
    /// Marker label color.
    pub marker_text: Color,
    /// Marker label size in pixels.
    pub marker_text_size: f32,
    /// Overlay color for the selected element.
    pub selection: Color,
    /// Heat-map color at 0%.
    pub heat_low: Color,
    /// Heat-map color at 100%.
    pub heat_high: Color,
    /// Heat-map color for missing cells.
    pub heat_absent: Color,
}

impl Theme {
    /// Create the default (light) theme.
    pub fn new() -> Self {
        Self::light()
    }

    /// Light theme.
    pub fn light() -> Self {
        Self {
            background: Color::WHITE,
            axis: Color::from_rgb8(120, 120, 128),
            grid: Color::from_rgb8(228, 228, 232),
            marker_text: Color::from_rgb8(90, 90, 96),
            marker_text_size: 11.0,
            selection: Color::new(1.0, 1.0, 1.0, 0.35),
            heat_low: Color::from_rgb8(235, 242, 250),
            heat_high: Color::from_rgb8(20, 70, 160),
            heat_absent: Color::from_rgb8(240, 240, 240),
        }
    }

    /// Dark theme.
    pub fn dark() -> Self {
        Self {
            background: Color::from_rgb8(18, 18, 20),
            axis: Color::from_rgb8(180, 180, 190),
            grid: Color::from_rgb8(40, 40, 45),
            marker_text: Color::from_rgb8(210, 210, 220),
            marker_text_size: 11.0,
            selection: Color::new(1.0, 1.0, 1.0, 0.25),
            heat_low: Color::from_rgb8(30, 34, 60),
            heat_high: Color::from_rgb8(250, 180, 60),
            heat_absent: Color::from_rgb8(28, 28, 30),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::new()
    }
}
