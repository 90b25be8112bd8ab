//! Line charts with optional bezier smoothing and point markers.

use std::rc::Weak;

use tracing::debug;

use crate::axis::{AxisMarker, MarkerConfig, value_markers};
use crate::canvas::{Insets, push_axes, push_category_labels, push_value_markers};
use crate::chart::{Chart, ConfigError, LayoutPass, LayoutState, check_insets, check_size, upgrade};
use crate::datasource::LineChartDataSource;
use crate::delegate::LineChartDelegate;
use crate::geom::ScreenPoint;
use crate::interaction::{TouchEvent, nearest_sorted_by_x};
use crate::layer::{Layer, LayerKey, Shape};
use crate::limits::{AxisLimits, line_limits};
use crate::render::{MarkerShape, RenderList};
use crate::style::Theme;
use crate::transform::Scale;

const KIND: &str = "line";

/// Configuration for a [`LineChart`].
#[derive(Debug, Clone)]
pub struct LineChartConfig {
    /// Smooth lines with cubic bezier segments.
    pub bezier: bool,
    /// Draw a marker at every point.
    pub show_points: bool,
    /// Radius of point markers.
    pub point_radius: f32,
    /// Margins reserved for labels.
    pub insets: Insets,
    /// Extra padding inside the insets.
    pub padding: f32,
    /// Value axis markers.
    pub markers: MarkerConfig,
    /// Draw point labels under each column.
    pub show_point_labels: bool,
}

impl LineChartConfig {
    /// Toggle bezier smoothing.
    pub fn with_bezier(mut self, bezier: bool) -> Self {
        self.bezier = bezier;
        self
    }

    /// Toggle point markers.
    pub fn with_points(mut self, show_points: bool) -> Self {
        self.show_points = show_points;
        self
    }

    /// Set the marker radius.
    pub fn with_point_radius(mut self, radius: f32) -> Self {
        self.point_radius = radius;
        self
    }

    /// Set the label insets.
    pub fn with_insets(mut self, insets: Insets) -> Self {
        self.insets = insets;
        self
    }

    /// Set the marker configuration.
    pub fn with_markers(mut self, markers: MarkerConfig) -> Self {
        self.markers = markers;
        self
    }

    /// Check the configuration for unusable values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.markers.count == 0 {
            return Err(ConfigError::ZeroMarkerCount);
        }
        check_size("point radius", self.point_radius)?;
        check_size("padding", self.padding)?;
        check_insets(self.insets)
    }
}

impl Default for LineChartConfig {
    fn default() -> Self {
        Self {
            bezier: false,
            show_points: true,
            point_radius: 3.0,
            insets: Insets::default(),
            padding: 0.0,
            markers: MarkerConfig::default(),
            show_point_labels: true,
        }
    }
}

/// One projected line point in content-local pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinePoint {
    /// Horizontal position.
    pub x: f32,
    /// Vertical position.
    pub y: f32,
    /// Line index.
    pub line: usize,
    /// Point index.
    pub point: usize,
}

/// Project line values into content-local points.
///
/// Points are evenly spaced across `width`; a single point sits at the left
/// edge. Values map through the inverted value scale.
pub fn project_lines(
    values: &[Vec<f64>],
    limits: AxisLimits,
    width: f32,
    height: f32,
) -> Vec<Vec<LinePoint>> {
    let scale = Scale::new(limits, height);
    values
        .iter()
        .enumerate()
        .map(|(line, series)| {
            let step = if series.len() > 1 {
                width / (series.len() - 1) as f32
            } else {
                0.0
            };
            series
                .iter()
                .enumerate()
                .map(|(point, &value)| LinePoint {
                    x: step * point as f32,
                    y: scale.offset_of(value),
                    line,
                    point,
                })
                .collect()
        })
        .collect()
}

/// A line chart bound to a datasource and an optional delegate.
#[derive(Debug)]
pub struct LineChart {
    config: LineChartConfig,
    datasource: Option<Weak<dyn LineChartDataSource>>,
    delegate: Option<Weak<dyn LineChartDelegate>>,
    state: LayoutState,
    limits: AxisLimits,
    lines: Vec<Vec<LinePoint>>,
    markers: Vec<AxisMarker>,
    point_labels: Vec<(f32, String)>,
}

impl LineChart {
    /// Create a chart with the default configuration.
    pub fn new() -> Self {
        Self {
            config: LineChartConfig::default(),
            datasource: None,
            delegate: None,
            state: LayoutState::new(),
            limits: AxisLimits::EMPTY,
            lines: Vec::new(),
            markers: Vec::new(),
            point_labels: Vec::new(),
        }
    }

    /// Create a chart with a custom configuration.
    pub fn with_config(config: LineChartConfig) -> Result<Self, ConfigError> {
        let mut chart = Self::new();
        chart.set_config(config)?;
        Ok(chart)
    }

    /// Current configuration.
    pub fn config(&self) -> &LineChartConfig {
        &self.config
    }

    /// Replace the configuration; an invalid one is rejected and the old one kept.
    pub fn set_config(&mut self, config: LineChartConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config;
        self.state.mark_dirty();
        Ok(())
    }

    /// Attach the datasource.
    pub fn set_datasource<T: LineChartDataSource + 'static>(&mut self, datasource: Weak<T>) {
        self.datasource = Some(datasource as Weak<dyn LineChartDataSource>);
        self.state.mark_dirty();
    }

    /// Attach the delegate.
    pub fn set_delegate<T: LineChartDelegate + 'static>(&mut self, delegate: Weak<T>) {
        self.delegate = Some(delegate as Weak<dyn LineChartDelegate>);
    }

    /// Value axis limits of the last pass.
    pub fn limits(&self) -> AxisLimits {
        self.limits
    }

    /// Projected points of the last pass, one vector per line.
    pub fn lines(&self) -> &[Vec<LinePoint>] {
        &self.lines
    }

    /// Value markers of the last pass.
    pub fn markers(&self) -> &[AxisMarker] {
        &self.markers
    }
}

impl Default for LineChart {
    fn default() -> Self {
        Self::new()
    }
}

impl Chart for LineChart {
    fn kind(&self) -> &'static str {
        KIND
    }

    fn state(&self) -> &LayoutState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut LayoutState {
        &mut self.state
    }

    fn layout(&mut self) -> Option<LayoutPass> {
        if !self.state.is_dirty() {
            return None;
        }
        let canvas = self.state.canvas(self.config.insets, self.config.padding);
        let content = canvas.content();
        let datasource = upgrade(&self.datasource, KIND, "datasource");

        let mut values = Vec::new();
        let mut styles = Vec::new();
        let mut labels = Vec::new();
        if let Some(source) = &datasource {
            let lines = source.number_of_lines();
            let points = source.number_of_points();
            for line in 0..lines {
                values.push((0..points).map(|point| source.value(line, point)).collect::<Vec<_>>());
                styles.push((source.line_color(line), source.line_width(line)));
            }
            labels = (0..points).map(|point| source.point_label(point)).collect();
        }
        let points = values.first().map_or(0, Vec::len);

        self.limits = line_limits(&values, self.config.bezier);
        self.lines = project_lines(&values, self.limits, content.width(), content.height());
        self.markers = value_markers(
            self.limits,
            content.height(),
            &self.config.markers,
            |marker, value| {
                datasource
                    .as_ref()
                    .and_then(|source| source.marker_label(marker, value))
            },
        );
        self.point_labels = match (self.config.show_point_labels, self.lines.first()) {
            (true, Some(first)) => first
                .iter()
                .zip(labels)
                .filter_map(|(point, label)| Some((content.min.x + point.x, label?)))
                .collect(),
            _ => Vec::new(),
        };

        let origin = |point: &LinePoint| ScreenPoint::new(content.min.x + point.x, content.min.y + point.y);
        let radius = if self.config.show_points {
            self.config.point_radius
        } else {
            0.0
        };
        let mut layers = Vec::new();
        for (line, projected) in self.lines.iter().enumerate() {
            let (color, width) = styles[line];
            if projected.len() >= 2 {
                let path: Vec<ScreenPoint> = projected.iter().map(origin).collect();
                let shape = if self.config.bezier {
                    Shape::Curve(path)
                } else {
                    Shape::Polyline(path)
                };
                layers.push(Layer::new(LayerKey::series(line), shape, color).with_line_width(width));
            }
            for point in projected {
                layers.push(Layer::new(
                    LayerKey::new(line, point.point),
                    Shape::Marker {
                        center: origin(point),
                        radius,
                        shape: MarkerShape::Circle,
                    },
                    color,
                ));
            }
        }
        Some(self.state.commit(
            KIND,
            &canvas,
            vec![values.len(), points, usize::from(self.config.bezier)],
            layers,
        ))
    }

    fn decorations(&self, theme: &Theme, out: &mut RenderList) {
        let content = self.state.content();
        if !content.is_valid() {
            return;
        }
        push_value_markers(out, content, &self.markers, self.config.markers.show_grid, theme);
        push_axes(out, content, theme);
        push_category_labels(out, content, &self.point_labels, theme);
    }

    fn touch(&mut self, event: TouchEvent) -> bool {
        let Some(local) = event.relative_to(self.state.content().min) else {
            debug!(chart = KIND, x = event.position.x, "touch outside plot area ignored");
            return false;
        };
        let positions: Vec<f32> = self
            .lines
            .first()
            .map(|line| line.iter().map(|point| point.x).collect())
            .unwrap_or_default();
        let Some(point) = nearest_sorted_by_x(&positions, local.x) else {
            debug!(chart = KIND, "touch without points ignored");
            return false;
        };
        let delegate = upgrade(&self.delegate, KIND, "delegate");
        let layers = self.state.layer_set_mut();
        if event.phase.is_release() {
            layers.clear_selection();
            if let Some(delegate) = delegate {
                delegate.did_release_touch(point);
            }
        } else {
            layers.select(|key| key.item == Some(point));
            if let Some(delegate) = delegate {
                delegate.did_touch(point);
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::chart::test_support::approx;
    use crate::datasource::LineData;
    use crate::interaction::TouchPhase;
    use crate::render::RenderCommand;

    #[derive(Default)]
    struct Recorder {
        touched: RefCell<Vec<usize>>,
        released: RefCell<Vec<usize>>,
    }

    impl LineChartDelegate for Recorder {
        fn did_touch(&self, point: usize) {
            self.touched.borrow_mut().push(point);
        }

        fn did_release_touch(&self, point: usize) {
            self.released.borrow_mut().push(point);
        }
    }

    fn chart_with(data: &Rc<LineData>, config: LineChartConfig) -> LineChart {
        let mut chart = LineChart::with_config(config.with_insets(Insets::ZERO)).unwrap();
        chart.set_datasource(Rc::downgrade(data));
        chart.set_size(200.0, 120.0);
        chart
    }

    #[test]
    fn points_are_evenly_spaced_and_inverted() {
        let values = vec![vec![5.0, -5.0, 0.0]];
        let limits = line_limits(&values, false);
        let lines = project_lines(&values, limits, 200.0, 120.0);
        let xs: Vec<f32> = lines[0].iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, 100.0, 200.0]);
        // limits are -6..6, span 12
        assert!(approx(lines[0][0].y, 10.0));
        assert!(approx(lines[0][1].y, 110.0));
        assert!(approx(lines[0][2].y, 60.0));
    }

    #[test]
    fn single_point_has_no_path() {
        let data = Rc::new(LineData::new(vec![vec![3.0]]).unwrap());
        let mut chart = chart_with(&data, LineChartConfig::default());
        chart.layout();
        assert_eq!(chart.layers().len(), 1);
        assert!(matches!(chart.layers()[0].shape, Shape::Marker { .. }));
    }

    #[test]
    fn bezier_lines_render_as_curves() {
        let data = Rc::new(LineData::new(vec![vec![1.0, 4.0, 2.0]]).unwrap());
        let mut chart = chart_with(&data, LineChartConfig::default().with_bezier(true));
        chart.layout();
        assert!(approx(chart.limits().max as f32, 4.8));
        let frame = crate::chart::render_frame(&chart, chart.layers(), &Theme::default());
        assert!(
            frame
                .commands()
                .iter()
                .any(|command| matches!(command, RenderCommand::Curve { segments, .. } if segments.len() == 2))
        );
    }

    #[test]
    fn touch_resolves_nearest_column_of_first_line() {
        let data = Rc::new(LineData::new(vec![vec![1.0, 2.0, 3.0], vec![3.0, 2.0, 1.0]]).unwrap());
        let recorder = Rc::new(Recorder::default());
        let mut chart = chart_with(&data, LineChartConfig::default());
        chart.set_delegate(Rc::downgrade(&recorder));
        chart.layout();

        let at = ScreenPoint::new(120.0, 5.0);
        assert!(chart.touch(TouchEvent::new(TouchPhase::Down, at)));
        assert!(chart.touch(TouchEvent::new(TouchPhase::Move, at)));
        let selected: Vec<LayerKey> = chart
            .layers()
            .iter()
            .filter(|layer| layer.selected)
            .map(|layer| layer.key)
            .collect();
        assert_eq!(selected, vec![LayerKey::new(0, 1), LayerKey::new(1, 1)]);

        assert!(chart.touch(TouchEvent::new(TouchPhase::Cancel, at)));
        assert_eq!(*recorder.touched.borrow(), vec![1, 1]);
        assert_eq!(*recorder.released.borrow(), vec![1]);
        assert!(chart.layers().iter().all(|layer| !layer.selected));
    }

    #[test]
    fn repeated_touch_resolves_same_point() {
        let data = Rc::new(LineData::new(vec![vec![4.0, 1.0, 3.0, 2.0, 5.0]]).unwrap());
        let recorder = Rc::new(Recorder::default());
        let mut chart = chart_with(&data, LineChartConfig::default());
        chart.set_delegate(Rc::downgrade(&recorder));
        chart.layout();

        // columns sit 50 px apart; 60 is closest to column 1
        let at = ScreenPoint::new(60.0, 90.0);
        assert!(chart.touch(TouchEvent::new(TouchPhase::Down, at)));
        assert!(chart.touch(TouchEvent::new(TouchPhase::Down, at)));
        assert_eq!(*recorder.touched.borrow(), vec![1, 1]);
    }

    #[test]
    fn touch_on_axis_labels_is_silent() {
        let data = Rc::new(LineData::new(vec![vec![1.0, 2.0, 3.0]]).unwrap());
        let recorder = Rc::new(Recorder::default());
        let mut chart = LineChart::new();
        chart.set_datasource(Rc::downgrade(&data));
        chart.set_delegate(Rc::downgrade(&recorder));
        chart.set_size(200.0, 120.0);
        chart.layout();

        let left = chart.content().min.x;
        assert!(!chart.touch(TouchEvent::new(TouchPhase::Down, ScreenPoint::new(left - 2.0, 40.0))));
        assert!(recorder.touched.borrow().is_empty());
        assert!(chart.layers().iter().all(|layer| !layer.selected));
    }

    #[test]
    fn empty_chart_lays_out_and_ignores_touches() {
        let data = Rc::new(LineData::new(vec![]).unwrap());
        let mut chart = chart_with(&data, LineChartConfig::default());
        assert!(chart.layout().is_some());
        assert!(chart.layers().is_empty());
        assert_eq!(chart.limits(), AxisLimits::EMPTY);
        assert!(!chart.touch(TouchEvent::new(TouchPhase::Down, ScreenPoint::new(10.0, 10.0))));
        let frame = crate::chart::render_frame(&chart, chart.layers(), &Theme::default());
        assert!(!frame.is_empty());
    }
}
