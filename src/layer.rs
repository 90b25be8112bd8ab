//! Renderable layers built from projected points.
//!
//! A chart keeps one [`LayerSet`]. When the data cardinality changes the set
//! is rebuilt and selection is dropped; otherwise only geometry and colors
//! are updated in place.

use std::f32::consts::{FRAC_PI_2, TAU};

use crate::geom::{ScreenPoint, ScreenRect, lerp};
use crate::render::{
    Color, CubicSegment, LineStyle, MarkerShape, MarkerStyle, RectStyle, RenderCommand,
    RenderList, build_line_segments,
};
use crate::style::Theme;

const ARC_STEP: f32 = TAU / 96.0;
const SELECTED_MARKER_SCALE: f32 = 1.6;
const MIN_SELECTED_RADIUS: f32 = 4.0;

/// Identity of a layer within its chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerKey {
    /// Dataset, line, row or slice index.
    pub dataset: usize,
    /// Item, point or column index; `None` for whole-series layers such as a line path.
    pub item: Option<usize>,
}

impl LayerKey {
    /// Key of a single element.
    pub fn new(dataset: usize, item: usize) -> Self {
        Self {
            dataset,
            item: Some(item),
        }
    }

    /// Key of a whole-series layer.
    pub fn series(dataset: usize) -> Self {
        Self {
            dataset,
            item: None,
        }
    }
}

/// Geometry of a layer in chart-local pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Filled rectangle (bars, heat-map cells, legend swatches).
    Rect(ScreenRect),
    /// Point marker.
    Marker {
        /// Marker center.
        center: ScreenPoint,
        /// Marker radius.
        radius: f32,
        /// Marker shape.
        shape: MarkerShape,
    },
    /// Straight polyline.
    Polyline(Vec<ScreenPoint>),
    /// Bezier-smoothed curve through the points.
    Curve(Vec<ScreenPoint>),
    /// Annular sector; angles are radians, clockwise from 3 o'clock.
    Sector {
        /// Circle center.
        center: ScreenPoint,
        /// Inner radius (0 for a pie slice).
        inner_radius: f32,
        /// Outer radius.
        outer_radius: f32,
        /// Start angle.
        start_angle: f32,
        /// End angle.
        end_angle: f32,
    },
}

impl Shape {
    /// Interpolate towards `other` when both shapes are compatible.
    pub fn lerp(&self, other: &Self, t: f32) -> Option<Self> {
        match (self, other) {
            (Self::Rect(a), Self::Rect(b)) => Some(Self::Rect(a.lerp(*b, t))),
            (
                Self::Marker {
                    center: ca,
                    radius: ra,
                    ..
                },
                Self::Marker {
                    center: cb,
                    radius: rb,
                    shape,
                },
            ) => Some(Self::Marker {
                center: ca.lerp(*cb, t),
                radius: lerp(*ra, *rb, t),
                shape: *shape,
            }),
            (Self::Polyline(a), Self::Polyline(b)) if a.len() == b.len() => {
                Some(Self::Polyline(lerp_points(a, b, t)))
            }
            (Self::Curve(a), Self::Curve(b)) if a.len() == b.len() => {
                Some(Self::Curve(lerp_points(a, b, t)))
            }
            (
                Self::Sector {
                    center: ca,
                    inner_radius: ia,
                    outer_radius: oa,
                    start_angle: sa,
                    end_angle: ea,
                },
                Self::Sector {
                    center: cb,
                    inner_radius: ib,
                    outer_radius: ob,
                    start_angle: sb,
                    end_angle: eb,
                },
            ) => Some(Self::Sector {
                center: ca.lerp(*cb, t),
                inner_radius: lerp(*ia, *ib, t),
                outer_radius: lerp(*oa, *ob, t),
                start_angle: lerp(*sa, *sb, t),
                end_angle: lerp(*ea, *eb, t),
            }),
            _ => None,
        }
    }

    /// Zero-size version of the shape, used as the start of entry animations.
    ///
    /// Rectangles keep their bottom edge, markers shrink to their center,
    /// lines flatten onto `baseline` and sectors lose their sweep.
    pub fn collapsed(&self, baseline: f32) -> Self {
        match self {
            Self::Rect(rect) => Self::Rect(ScreenRect::new(
                ScreenPoint::new(rect.min.x, rect.max.y),
                rect.max,
            )),
            Self::Marker { center, shape, .. } => Self::Marker {
                center: *center,
                radius: 0.0,
                shape: *shape,
            },
            Self::Polyline(points) => Self::Polyline(flatten(points, baseline)),
            Self::Curve(points) => Self::Curve(flatten(points, baseline)),
            Self::Sector {
                center,
                inner_radius,
                outer_radius,
                start_angle,
                ..
            } => Self::Sector {
                center: *center,
                inner_radius: *inner_radius,
                outer_radius: *outer_radius,
                start_angle: *start_angle,
                end_angle: *start_angle,
            },
        }
    }
}

/// A renderable element of a chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    /// Layer identity.
    pub key: LayerKey,
    /// Current geometry.
    pub shape: Shape,
    /// Fill (or stroke, for lines) color.
    pub color: Color,
    /// Stroke width for line shapes.
    pub line_width: f32,
    /// Selection highlight.
    pub selected: bool,
}

impl Layer {
    /// Create an unselected layer.
    pub fn new(key: LayerKey, shape: Shape, color: Color) -> Self {
        Self {
            key,
            shape,
            color,
            line_width: 1.0,
            selected: false,
        }
    }

    /// Set the stroke width.
    pub fn with_line_width(mut self, width: f32) -> Self {
        self.line_width = width;
        self
    }

    /// Interpolate towards `target`; incompatible shapes snap to the target.
    pub fn lerp(&self, target: &Self, t: f32) -> Self {
        let shape = self
            .shape
            .lerp(&target.shape, t)
            .unwrap_or_else(|| target.shape.clone());
        Self {
            shape,
            color: self.color.lerp(target.color, t),
            line_width: lerp(self.line_width, target.line_width, t),
            ..target.clone()
        }
    }

    /// Collapsed copy of the layer.
    pub fn collapsed(&self, baseline: f32) -> Self {
        Self {
            shape: self.shape.collapsed(baseline),
            ..self.clone()
        }
    }

    /// Append draw commands for the layer.
    pub fn render(&self, out: &mut RenderList, clip: ScreenRect, theme: &Theme) {
        match &self.shape {
            Shape::Rect(rect) => {
                out.push(RenderCommand::Rect {
                    rect: *rect,
                    style: RectStyle::filled(self.color),
                });
                if self.selected {
                    out.push(RenderCommand::Rect {
                        rect: *rect,
                        style: RectStyle::filled(theme.selection),
                    });
                }
            }
            Shape::Marker {
                center,
                radius,
                shape,
            } => {
                if self.selected {
                    out.push(RenderCommand::Points {
                        points: vec![*center],
                        style: MarkerStyle {
                            color: self.color.with_alpha(self.color.a * 0.35),
                            size: radius.max(MIN_SELECTED_RADIUS) * 2.0 * SELECTED_MARKER_SCALE,
                            shape: *shape,
                        },
                    });
                }
                if *radius > 0.0 {
                    out.push(RenderCommand::Points {
                        points: vec![*center],
                        style: MarkerStyle {
                            color: self.color,
                            size: radius * 2.0,
                            shape: *shape,
                        },
                    });
                }
            }
            Shape::Polyline(points) => {
                let mut segments = Vec::new();
                build_line_segments(points, clip, &mut segments);
                if !segments.is_empty() {
                    out.push(RenderCommand::LineSegments {
                        segments,
                        style: self.line_style(),
                    });
                }
            }
            Shape::Curve(points) => {
                if points.len() >= 2 {
                    out.push(RenderCommand::Curve {
                        start: points[0],
                        segments: smooth_segments(points),
                        style: self.line_style(),
                    });
                }
            }
            Shape::Sector {
                center,
                inner_radius,
                outer_radius,
                start_angle,
                end_angle,
            } => {
                let points =
                    sector_polygon(*center, *inner_radius, *outer_radius, *start_angle, *end_angle);
                if points.len() >= 3 {
                    out.push(RenderCommand::Polygon {
                        points,
                        fill: self.color,
                    });
                }
            }
        }
    }

    fn line_style(&self) -> LineStyle {
        LineStyle {
            color: self.color,
            width: self.line_width,
        }
    }
}

/// Outcome of synchronizing a [`LayerSet`] with new geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerSync {
    /// Cardinality changed; every layer was replaced.
    Rebuilt,
    /// Cardinality unchanged; geometry updated in place.
    Updated,
}

/// The layers owned by one chart instance.
#[derive(Debug, Clone, Default)]
pub struct LayerSet {
    layers: Vec<Layer>,
    signature: Vec<usize>,
}

impl LayerSet {
    /// Create an empty layer set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Access the layers.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Replace or update layers.
    ///
    /// `signature` describes the data cardinality (for example dataset and
    /// item counts). A different signature rebuilds the set.
    pub fn sync(&mut self, signature: Vec<usize>, layers: Vec<Layer>) -> LayerSync {
        if signature != self.signature || layers.len() != self.layers.len() {
            self.signature = signature;
            self.layers = layers;
            return LayerSync::Rebuilt;
        }
        for (current, next) in self.layers.iter_mut().zip(layers) {
            current.key = next.key;
            current.shape = next.shape;
            current.color = next.color;
            current.line_width = next.line_width;
        }
        LayerSync::Updated
    }

    /// Mark layers matching `predicate` as selected and every other layer as not.
    ///
    /// Returns `true` when any flag changed.
    pub fn select(&mut self, predicate: impl Fn(&LayerKey) -> bool) -> bool {
        let mut changed = false;
        for layer in &mut self.layers {
            let selected = predicate(&layer.key);
            if layer.selected != selected {
                layer.selected = selected;
                changed = true;
            }
        }
        changed
    }

    /// Clear every selection flag.
    pub fn clear_selection(&mut self) -> bool {
        self.select(|_| false)
    }
}

/// Cubic segments of a smoothed curve through `points`.
///
/// Control points sit at the horizontal midpoint of each span, level with
/// the span's end points, which keeps tangents horizontal at every point.
pub fn smooth_segments(points: &[ScreenPoint]) -> Vec<CubicSegment> {
    points
        .windows(2)
        .map(|pair| {
            let (from, to) = (pair[0], pair[1]);
            let mid_x = (from.x + to.x) * 0.5;
            CubicSegment {
                ctrl_a: ScreenPoint::new(mid_x, from.y),
                ctrl_b: ScreenPoint::new(mid_x, to.y),
                to,
            }
        })
        .collect()
}

/// Polygon approximating an annular sector.
pub fn sector_polygon(
    center: ScreenPoint,
    inner_radius: f32,
    outer_radius: f32,
    start_angle: f32,
    end_angle: f32,
) -> Vec<ScreenPoint> {
    let sweep = end_angle - start_angle;
    if sweep <= 0.0 || outer_radius <= 0.0 {
        return Vec::new();
    }
    let steps = ((sweep / ARC_STEP).ceil() as usize).max(1);
    let arc = |radius: f32, i: usize| {
        let angle = start_angle + sweep * i as f32 / steps as f32;
        ScreenPoint::new(
            center.x + radius * angle.cos(),
            center.y + radius * angle.sin(),
        )
    };
    let mut points: Vec<ScreenPoint> = (0..=steps).map(|i| arc(outer_radius, i)).collect();
    if inner_radius > 0.0 {
        points.extend((0..=steps).rev().map(|i| arc(inner_radius, i)));
    } else {
        points.push(center);
    }
    points
}

/// Angle of `point` around `center`, normalized to start at 12 o'clock and
/// grow clockwise in `0..TAU`.
pub fn clockwise_angle_from_top(center: ScreenPoint, point: ScreenPoint) -> f32 {
    let angle = (point.y - center.y).atan2(point.x - center.x) + FRAC_PI_2;
    angle.rem_euclid(TAU)
}

fn lerp_points(a: &[ScreenPoint], b: &[ScreenPoint], t: f32) -> Vec<ScreenPoint> {
    a.iter().zip(b).map(|(a, b)| a.lerp(*b, t)).collect()
}

fn flatten(points: &[ScreenPoint], baseline: f32) -> Vec<ScreenPoint> {
    points
        .iter()
        .map(|point| ScreenPoint::new(point.x, baseline))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect_layer(item: usize, height: f32) -> Layer {
        Layer::new(
            LayerKey::new(0, item),
            Shape::Rect(ScreenRect::from_origin_size(item as f32 * 10.0, 100.0 - height, 8.0, height)),
            Color::BLACK,
        )
    }

    #[test]
    fn sync_rebuilds_on_cardinality_change() {
        let mut set = LayerSet::new();
        assert_eq!(set.sync(vec![1, 2], vec![rect_layer(0, 10.0), rect_layer(1, 20.0)]), LayerSync::Rebuilt);
        assert!(set.select(|key| key.item == Some(1)));
        assert_eq!(
            set.sync(vec![1, 3], vec![rect_layer(0, 10.0), rect_layer(1, 20.0), rect_layer(2, 5.0)]),
            LayerSync::Rebuilt
        );
        assert!(set.layers().iter().all(|layer| !layer.selected));
    }

    #[test]
    fn sync_updates_in_place_and_keeps_selection() {
        let mut set = LayerSet::new();
        set.sync(vec![1, 2], vec![rect_layer(0, 10.0), rect_layer(1, 20.0)]);
        set.select(|key| key.item == Some(1));
        assert_eq!(set.sync(vec![1, 2], vec![rect_layer(0, 40.0), rect_layer(1, 60.0)]), LayerSync::Updated);
        assert!(set.layers()[1].selected);
        let Shape::Rect(rect) = set.layers()[1].shape else {
            panic!("rect layer expected");
        };
        assert!((rect.height() - 60.0).abs() < 1e-6);
    }

    #[test]
    fn collapsed_rect_keeps_bottom_edge() {
        let layer = rect_layer(0, 30.0).collapsed(0.0);
        let Shape::Rect(rect) = layer.shape else {
            panic!("rect layer expected");
        };
        assert_eq!(rect.height(), 0.0);
        assert_eq!(rect.max.y, 100.0);
    }

    #[test]
    fn incompatible_shapes_snap_to_target() {
        let from = Layer::new(LayerKey::series(0), Shape::Polyline(vec![ScreenPoint::default()]), Color::BLACK);
        let to = Layer::new(
            LayerKey::series(0),
            Shape::Polyline(vec![ScreenPoint::default(), ScreenPoint::new(1.0, 1.0)]),
            Color::BLACK,
        );
        assert_eq!(from.lerp(&to, 0.5).shape, to.shape);
    }

    #[test]
    fn smooth_segments_have_horizontal_tangents() {
        let points = [ScreenPoint::new(0.0, 10.0), ScreenPoint::new(10.0, 0.0)];
        let segments = smooth_segments(&points);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].ctrl_a, ScreenPoint::new(5.0, 10.0));
        assert_eq!(segments[0].ctrl_b, ScreenPoint::new(5.0, 0.0));
    }

    #[test]
    fn angle_from_top_is_clockwise() {
        let center = ScreenPoint::new(0.0, 0.0);
        assert!(clockwise_angle_from_top(center, ScreenPoint::new(0.0, -1.0)).abs() < 1e-6);
        let right = clockwise_angle_from_top(center, ScreenPoint::new(1.0, 0.0));
        assert!((right - FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn pie_slice_polygon_closes_at_center() {
        let points = sector_polygon(ScreenPoint::new(0.0, 0.0), 0.0, 10.0, 0.0, FRAC_PI_2);
        assert_eq!(points.last(), Some(&ScreenPoint::new(0.0, 0.0)));
    }
}
