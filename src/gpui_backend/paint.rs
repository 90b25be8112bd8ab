use gpui::{
    App, BorderStyle, Bounds, ContentMask, Corners, Edges, PathBuilder, Pixels, TextRun, Window,
    font, point, px, quad,
};

use crate::geom::{ScreenPoint, ScreenRect};
use crate::render::{
    Color, CubicSegment, LineSegment, LineStyle, MarkerShape, MarkerStyle, RectStyle,
    RenderCommand, RenderList, TextAnchor, TextStyle,
};

/// Paint a chart-local render list with its origin at `origin` (window pixels).
pub(crate) fn paint_frame(render: &RenderList, origin: ScreenPoint, window: &mut Window, cx: &mut App) {
    let painter = Painter { origin };
    let mut clip_stack: Vec<ContentMask<Pixels>> = Vec::new();
    for command in render.commands() {
        match command {
            RenderCommand::ClipRect(rect) => {
                clip_stack.push(ContentMask {
                    bounds: painter.bounds(*rect),
                });
            }
            RenderCommand::ClipEnd => {
                clip_stack.pop();
            }
            RenderCommand::LineSegments { segments, style } => {
                with_clip(window, &clip_stack, |window| {
                    painter.lines(window, segments, *style);
                });
            }
            RenderCommand::Curve {
                start,
                segments,
                style,
            } => {
                with_clip(window, &clip_stack, |window| {
                    painter.curve(window, *start, segments, *style);
                });
            }
            RenderCommand::Points { points, style } => {
                with_clip(window, &clip_stack, |window| {
                    painter.points(window, points, *style);
                });
            }
            RenderCommand::Rect { rect, style } => {
                with_clip(window, &clip_stack, |window| {
                    painter.rect(window, *rect, *style);
                });
            }
            RenderCommand::Polygon { points, fill } => {
                with_clip(window, &clip_stack, |window| {
                    painter.polygon(window, points, *fill);
                });
            }
            RenderCommand::Text {
                position,
                text,
                style,
            } => {
                with_clip(window, &clip_stack, |window| {
                    painter.text(window, cx, *position, text, style);
                });
            }
        }
    }
}

#[derive(Clone, Copy)]
struct Painter {
    origin: ScreenPoint,
}

impl Painter {
    fn point(&self, pt: ScreenPoint) -> gpui::Point<Pixels> {
        point(px(self.origin.x + pt.x), px(self.origin.y + pt.y))
    }

    fn bounds(&self, rect: ScreenRect) -> Bounds<Pixels> {
        Bounds::from_corners(self.point(rect.min), self.point(rect.max))
    }

    fn lines(&self, window: &mut Window, segments: &[LineSegment], style: LineStyle) {
        if segments.is_empty() {
            return;
        }
        let mut builder = PathBuilder::stroke(px(style.width.max(0.5)));
        for segment in segments {
            builder.move_to(self.point(segment.start));
            builder.line_to(self.point(segment.end));
        }
        if let Ok(path) = builder.build() {
            window.paint_path(path, to_rgba(style.color));
        }
    }

    fn curve(&self, window: &mut Window, start: ScreenPoint, segments: &[CubicSegment], style: LineStyle) {
        if segments.is_empty() {
            return;
        }
        let mut builder = PathBuilder::stroke(px(style.width.max(0.5)));
        builder.move_to(self.point(start));
        for segment in segments {
            builder.cubic_bezier_to(
                self.point(segment.to),
                self.point(segment.ctrl_a),
                self.point(segment.ctrl_b),
            );
        }
        if let Ok(path) = builder.build() {
            window.paint_path(path, to_rgba(style.color));
        }
    }

    fn points(&self, window: &mut Window, points: &[ScreenPoint], style: MarkerStyle) {
        let half = style.size.max(2.0) * 0.5;
        match style.shape {
            MarkerShape::Circle | MarkerShape::Square => {
                let corner = if style.shape == MarkerShape::Circle { half } else { 0.0 };
                for pt in points {
                    let bounds = Bounds::from_corners(
                        self.point(pt.offset(-half, -half)),
                        self.point(pt.offset(half, half)),
                    );
                    window.paint_quad(quad(
                        bounds,
                        Corners::all(px(corner)),
                        to_rgba(style.color),
                        Edges::all(px(0.0)),
                        to_rgba(style.color),
                        BorderStyle::default(),
                    ));
                }
            }
            MarkerShape::Cross => {
                let mut builder = PathBuilder::stroke(px(1.5));
                for pt in points {
                    builder.move_to(self.point(pt.offset(-half, 0.0)));
                    builder.line_to(self.point(pt.offset(half, 0.0)));
                    builder.move_to(self.point(pt.offset(0.0, -half)));
                    builder.line_to(self.point(pt.offset(0.0, half)));
                }
                if let Ok(path) = builder.build() {
                    window.paint_path(path, to_rgba(style.color));
                }
            }
        }
    }

    fn rect(&self, window: &mut Window, rect: ScreenRect, style: RectStyle) {
        window.paint_quad(quad(
            self.bounds(rect),
            Corners::all(px(0.0)),
            to_rgba(style.fill),
            Edges::all(px(style.stroke_width)),
            to_rgba(style.stroke),
            BorderStyle::default(),
        ));
    }

    fn polygon(&self, window: &mut Window, points: &[ScreenPoint], fill: Color) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        let mut builder = PathBuilder::fill();
        builder.move_to(self.point(*first));
        for pt in rest {
            builder.line_to(self.point(*pt));
        }
        builder.close();
        if let Ok(path) = builder.build() {
            window.paint_path(path, to_rgba(fill));
        }
    }

    fn text(&self, window: &mut Window, cx: &mut App, position: ScreenPoint, text: &str, style: &TextStyle) {
        if text.is_empty() {
            return;
        }
        let run = TextRun {
            len: text.len(),
            font: font(".SystemUIFont"),
            color: to_hsla(style.color),
            background_color: None,
            underline: None,
            strikethrough: None,
        };
        let shaped = window
            .text_system()
            .shape_line(text.to_string().into(), px(style.size), &[run], None);
        let width = f32::from(shaped.width);
        let dx = match style.anchor {
            TextAnchor::Start => 0.0,
            TextAnchor::Middle => -width * 0.5,
            TextAnchor::End => -width,
        };
        let line_height = shaped.ascent + shaped.descent;
        let baseline = self.point(position.offset(dx, 0.0));
        let origin = point(baseline.x, baseline.y - shaped.ascent);
        let _ = shaped.paint(origin, line_height, window, cx);
    }
}

fn to_rgba(color: Color) -> gpui::Rgba {
    gpui::Rgba {
        r: color.r,
        g: color.g,
        b: color.b,
        a: color.a,
    }
}

pub(crate) fn to_hsla(color: Color) -> gpui::Hsla {
    gpui::Hsla::from(to_rgba(color))
}

fn with_clip(window: &mut Window, stack: &[ContentMask<Pixels>], f: impl FnOnce(&mut Window)) {
    if let Some(mask) = stack.last() {
        window.with_content_mask(Some(mask.clone()), f);
    } else {
        f(window);
    }
}
