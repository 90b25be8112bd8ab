//! The shared coordinate space of every chart and its axis drawing primitives.

use crate::axis::AxisMarker;
use crate::geom::{ScreenPoint, ScreenRect};
use crate::render::{LineSegment, LineStyle, RenderCommand, RenderList, TextAnchor, TextStyle};
use crate::style::Theme;

const LABEL_GAP: f32 = 4.0;

/// Margins reserved around the canvas for axis labels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Insets {
    /// Top margin.
    pub top: f32,
    /// Left margin.
    pub left: f32,
    /// Bottom margin.
    pub bottom: f32,
    /// Right margin.
    pub right: f32,
}

impl Insets {
    /// Same margin on every edge.
    pub const fn uniform(value: f32) -> Self {
        Self {
            top: value,
            left: value,
            bottom: value,
            right: value,
        }
    }

    /// No margins.
    pub const ZERO: Self = Self::uniform(0.0);
}

impl Default for Insets {
    fn default() -> Self {
        Self {
            top: 10.0,
            left: 44.0,
            bottom: 24.0,
            right: 12.0,
        }
    }
}

/// The drawable content area of a chart.
///
/// `bounds` is the full chart view in chart-local pixels; the content
/// rectangle removes the label insets and then the inner padding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Canvas {
    bounds: ScreenRect,
    insets: Insets,
    padding: f32,
}

impl Canvas {
    /// Create a canvas for a view of the given size.
    pub fn new(width: f32, height: f32, insets: Insets, padding: f32) -> Self {
        Self {
            bounds: ScreenRect::from_origin_size(0.0, 0.0, width.max(0.0), height.max(0.0)),
            insets,
            padding: padding.max(0.0),
        }
    }

    /// Full view bounds.
    pub fn bounds(&self) -> ScreenRect {
        self.bounds
    }

    /// Content rectangle: bounds minus insets and padding.
    pub fn content(&self) -> ScreenRect {
        let insets = self.insets;
        let padding = self.padding;
        self.bounds.inset(
            insets.top + padding,
            insets.left + padding,
            insets.bottom + padding,
            insets.right + padding,
        )
    }

    /// Content width in pixels.
    pub fn width(&self) -> f32 {
        self.content().width()
    }

    /// Content height in pixels.
    pub fn height(&self) -> f32 {
        self.content().height()
    }
}

/// Text style used for axis marker labels.
pub fn marker_text_style(theme: &Theme, anchor: TextAnchor) -> TextStyle {
    TextStyle {
        color: theme.marker_text,
        size: theme.marker_text_size,
        anchor,
    }
}

/// Draw the left and bottom axis lines around the content rectangle.
pub fn push_axes(out: &mut RenderList, content: ScreenRect, theme: &Theme) {
    out.push(RenderCommand::LineSegments {
        segments: vec![
            LineSegment::new(
                ScreenPoint::new(content.min.x, content.min.y),
                ScreenPoint::new(content.min.x, content.max.y),
            ),
            LineSegment::new(
                ScreenPoint::new(content.min.x, content.max.y),
                ScreenPoint::new(content.max.x, content.max.y),
            ),
        ],
        style: LineStyle {
            color: theme.axis,
            width: 1.0,
        },
    });
}

/// Draw horizontal value markers: optional gridlines plus labels in the left inset.
pub fn push_value_markers(
    out: &mut RenderList,
    content: ScreenRect,
    markers: &[AxisMarker],
    show_grid: bool,
    theme: &Theme,
) {
    if markers.is_empty() {
        return;
    }
    if show_grid {
        let segments = markers
            .iter()
            .map(|marker| {
                let y = content.min.y + marker.offset;
                LineSegment::new(
                    ScreenPoint::new(content.min.x, y),
                    ScreenPoint::new(content.max.x, y),
                )
            })
            .collect();
        out.push(RenderCommand::LineSegments {
            segments,
            style: LineStyle {
                color: theme.grid,
                width: 1.0,
            },
        });
    }
    let style = marker_text_style(theme, TextAnchor::End);
    for marker in markers {
        let y = content.min.y + marker.offset + style.size * 0.35;
        out.push(RenderCommand::Text {
            position: ScreenPoint::new(content.min.x - LABEL_GAP, y),
            text: marker.label.clone(),
            style: style.clone(),
        });
    }
}

/// Draw category labels centered under the given X positions.
pub fn push_category_labels(
    out: &mut RenderList,
    content: ScreenRect,
    labels: &[(f32, String)],
    theme: &Theme,
) {
    let style = marker_text_style(theme, TextAnchor::Middle);
    for (x, text) in labels {
        if text.is_empty() {
            continue;
        }
        out.push(RenderCommand::Text {
            position: ScreenPoint::new(*x, content.max.y + LABEL_GAP + style.size),
            text: text.clone(),
            style: style.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axis::{LabelFormat, MarkerConfig, value_markers};
    use crate::limits::AxisLimits;

    #[test]
    fn content_removes_insets_and_padding() {
        let canvas = Canvas::new(200.0, 100.0, Insets::uniform(10.0), 5.0);
        let content = canvas.content();
        assert_eq!(content.min, ScreenPoint::new(15.0, 15.0));
        assert_eq!(content.max, ScreenPoint::new(185.0, 85.0));
        assert_eq!(canvas.width(), 170.0);
    }

    #[test]
    fn tiny_views_collapse_to_empty_content() {
        let canvas = Canvas::new(20.0, 20.0, Insets::default(), 0.0);
        assert!(!canvas.content().is_valid());
    }

    #[test]
    fn markers_emit_grid_and_labels() {
        let content = ScreenRect::from_origin_size(40.0, 10.0, 100.0, 100.0);
        let markers = value_markers(
            AxisLimits::new(0.0, 10.0),
            content.height(),
            &MarkerConfig::new(LabelFormat::Integer).with_count(3),
            |_, _| None,
        );
        let mut out = RenderList::new();
        push_value_markers(&mut out, content, &markers, true, &Theme::default());
        assert_eq!(out.len(), 4);
        let RenderCommand::LineSegments { segments, .. } = &out.commands()[0] else {
            panic!("gridlines come first");
        };
        assert_eq!(segments.len(), 3);
        assert!((segments[0].start.y - 110.0).abs() < 1e-6);
    }
}
