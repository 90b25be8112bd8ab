//! Scatter charts: free-form points with per-point markers.

use std::rc::Weak;

use tracing::debug;

use crate::axis::{AxisMarker, MarkerConfig, value_markers};
use crate::canvas::{Insets, push_axes, push_category_labels, push_value_markers};
use crate::chart::{Chart, ConfigError, LayoutPass, LayoutState, check_insets, check_size, upgrade};
use crate::datasource::ScatterChartDataSource;
use crate::delegate::ScatterChartDelegate;
use crate::geom::{Point, ScreenPoint};
use crate::interaction::{TouchEvent, nearest_point};
use crate::layer::{Layer, LayerKey, Shape};
use crate::limits::{ScatterLimits, scatter_limits};
use crate::render::{Color, MarkerShape, RenderList};
use crate::style::Theme;
use crate::transform::Scale;

const KIND: &str = "scatter";

/// Configuration for a [`ScatterChart`].
#[derive(Debug, Clone)]
pub struct ScatterChartConfig {
    /// Margins reserved for labels.
    pub insets: Insets,
    /// Extra padding inside the insets.
    pub padding: f32,
    /// Horizontal axis markers.
    pub x_markers: MarkerConfig,
    /// Vertical axis markers.
    pub y_markers: MarkerConfig,
    /// Draw the horizontal marker labels.
    pub show_x_markers: bool,
}

impl ScatterChartConfig {
    /// Set the label insets.
    pub fn with_insets(mut self, insets: Insets) -> Self {
        self.insets = insets;
        self
    }

    /// Set the horizontal marker configuration.
    pub fn with_x_markers(mut self, markers: MarkerConfig) -> Self {
        self.x_markers = markers;
        self
    }

    /// Set the vertical marker configuration.
    pub fn with_y_markers(mut self, markers: MarkerConfig) -> Self {
        self.y_markers = markers;
        self
    }

    /// Check the configuration for unusable values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.x_markers.count == 0 || self.y_markers.count == 0 {
            return Err(ConfigError::ZeroMarkerCount);
        }
        check_size("padding", self.padding)?;
        check_insets(self.insets)
    }
}

impl Default for ScatterChartConfig {
    fn default() -> Self {
        Self {
            insets: Insets::default(),
            padding: 0.0,
            x_markers: MarkerConfig::default().with_grid(false),
            y_markers: MarkerConfig::default(),
            show_x_markers: true,
        }
    }
}

/// One projected scatter point in content-local pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterPoint {
    /// Horizontal position.
    pub x: f32,
    /// Vertical position.
    pub y: f32,
    /// Marker radius.
    pub radius: f32,
    /// Dataset index.
    pub dataset: usize,
    /// Item index.
    pub item: usize,
}

impl ScatterPoint {
    fn position(&self) -> ScreenPoint {
        ScreenPoint::new(self.x, self.y)
    }
}

/// Project `(point, radius)` pairs into content-local pixels.
///
/// Both axes use the inverted mapping `(max - value) / max * extent`.
pub fn project_scatter(
    datasets: &[Vec<(Point, f32)>],
    limits: ScatterLimits,
    width: f32,
    height: f32,
) -> Vec<ScatterPoint> {
    let x_scale = Scale::new(limits.x, width);
    let y_scale = Scale::new(limits.y, height);
    datasets
        .iter()
        .enumerate()
        .flat_map(|(dataset, points)| {
            points.iter().enumerate().map(move |(item, &(point, radius))| ScatterPoint {
                x: x_scale.offset_of(point.x),
                y: y_scale.offset_of(point.y),
                radius,
                dataset,
                item,
            })
        })
        .collect()
}

/// A scatter chart bound to a datasource and an optional delegate.
#[derive(Debug)]
pub struct ScatterChart {
    config: ScatterChartConfig,
    datasource: Option<Weak<dyn ScatterChartDataSource>>,
    delegate: Option<Weak<dyn ScatterChartDelegate>>,
    state: LayoutState,
    limits: ScatterLimits,
    points: Vec<ScatterPoint>,
    y_markers: Vec<AxisMarker>,
    x_labels: Vec<(f32, String)>,
}

impl ScatterChart {
    /// Create a chart with the default configuration.
    pub fn new() -> Self {
        Self {
            config: ScatterChartConfig::default(),
            datasource: None,
            delegate: None,
            state: LayoutState::new(),
            limits: ScatterLimits::default(),
            points: Vec::new(),
            y_markers: Vec::new(),
            x_labels: Vec::new(),
        }
    }

    /// Create a chart with a custom configuration.
    pub fn with_config(config: ScatterChartConfig) -> Result<Self, ConfigError> {
        let mut chart = Self::new();
        chart.set_config(config)?;
        Ok(chart)
    }

    /// Current configuration.
    pub fn config(&self) -> &ScatterChartConfig {
        &self.config
    }

    /// Replace the configuration; an invalid one is rejected and the old one kept.
    pub fn set_config(&mut self, config: ScatterChartConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config;
        self.state.mark_dirty();
        Ok(())
    }

    /// Attach the datasource.
    pub fn set_datasource<T: ScatterChartDataSource + 'static>(&mut self, datasource: Weak<T>) {
        self.datasource = Some(datasource as Weak<dyn ScatterChartDataSource>);
        self.state.mark_dirty();
    }

    /// Attach the delegate.
    pub fn set_delegate<T: ScatterChartDelegate + 'static>(&mut self, delegate: Weak<T>) {
        self.delegate = Some(delegate as Weak<dyn ScatterChartDelegate>);
    }

    /// Axis limits of the last pass.
    pub fn limits(&self) -> ScatterLimits {
        self.limits
    }

    /// Projected points of the last pass, in content-local pixels.
    pub fn points(&self) -> &[ScatterPoint] {
        &self.points
    }
}

impl Default for ScatterChart {
    fn default() -> Self {
        Self::new()
    }
}

impl Chart for ScatterChart {
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

        let mut datasets: Vec<Vec<(Point, f32)>> = Vec::new();
        let mut styles: Vec<Vec<(Color, MarkerShape)>> = Vec::new();
        if let Some(source) = &datasource {
            for dataset in 0..source.number_of_datasets() {
                let count = source.number_of_points(dataset);
                datasets.push(
                    (0..count)
                        .map(|item| {
                            (
                                source.point(dataset, item),
                                source.point_radius(dataset, item),
                            )
                        })
                        .collect(),
                );
                styles.push(
                    (0..count)
                        .map(|item| {
                            (
                                source.point_color(dataset, item),
                                source.point_shape(dataset, item),
                            )
                        })
                        .collect(),
                );
            }
        }

        self.limits = scatter_limits(&datasets);
        self.points = project_scatter(&datasets, self.limits, content.width(), content.height());
        self.y_markers = value_markers(
            self.limits.y,
            content.height(),
            &self.config.y_markers,
            |marker, value| {
                datasource
                    .as_ref()
                    .and_then(|source| source.y_marker_label(marker, value))
            },
        );
        self.x_labels = if self.config.show_x_markers {
            value_markers(
                self.limits.x,
                content.width(),
                &self.config.x_markers,
                |marker, value| {
                    datasource
                        .as_ref()
                        .and_then(|source| source.x_marker_label(marker, value))
                },
            )
            .into_iter()
            .map(|marker| (content.min.x + marker.offset, marker.label))
            .collect()
        } else {
            Vec::new()
        };

        let layers = self
            .points
            .iter()
            .map(|point| {
                let (color, shape) = styles[point.dataset][point.item];
                Layer::new(
                    LayerKey::new(point.dataset, point.item),
                    Shape::Marker {
                        center: point.position().offset(content.min.x, content.min.y),
                        radius: point.radius,
                        shape,
                    },
                    color,
                )
            })
            .collect();
        let mut signature = vec![datasets.len()];
        signature.extend(datasets.iter().map(Vec::len));
        Some(self.state.commit(KIND, &canvas, signature, layers))
    }

    fn decorations(&self, theme: &Theme, out: &mut RenderList) {
        let content = self.state.content();
        if !content.is_valid() {
            return;
        }
        push_value_markers(out, content, &self.y_markers, self.config.y_markers.show_grid, theme);
        push_axes(out, content, theme);
        push_category_labels(out, content, &self.x_labels, theme);
    }

    fn touch(&mut self, event: TouchEvent) -> bool {
        let Some(local) = event.relative_to(self.state.content().min) else {
            debug!(chart = KIND, x = event.position.x, "touch outside plot area ignored");
            return false;
        };
        let candidates = self
            .points
            .iter()
            .map(|point| ((point.dataset, point.item), point.position()));
        let Some((dataset, item)) = nearest_point(candidates, local) else {
            debug!(chart = KIND, "touch without points ignored");
            return false;
        };
        let delegate = upgrade(&self.delegate, KIND, "delegate");
        let layers = self.state.layer_set_mut();
        if event.phase.is_release() {
            layers.clear_selection();
            if let Some(delegate) = delegate {
                delegate.did_release_touch(dataset, item);
            }
        } else {
            let key = LayerKey::new(dataset, item);
            layers.select(|candidate| *candidate == key);
            if let Some(delegate) = delegate {
                delegate.did_touch(dataset, item);
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
    use crate::datasource::ScatterData;
    use crate::interaction::TouchPhase;

    #[derive(Default)]
    struct Recorder {
        events: RefCell<Vec<(bool, usize, usize)>>,
    }

    impl ScatterChartDelegate for Recorder {
        fn did_touch(&self, dataset: usize, item: usize) {
            self.events.borrow_mut().push((false, dataset, item));
        }

        fn did_release_touch(&self, dataset: usize, item: usize) {
            self.events.borrow_mut().push((true, dataset, item));
        }
    }

    fn sample() -> Rc<ScatterData> {
        Rc::new(
            ScatterData::new(vec![
                vec![Point::new(10.0, 10.0), Point::new(50.0, 20.0)],
                vec![Point::new(96.0, 36.0)],
            ])
            .unwrap()
            .with_radii(vec![2.0, 4.0])
            .unwrap(),
        )
    }

    fn chart_with(data: &Rc<ScatterData>) -> ScatterChart {
        let config = ScatterChartConfig::default().with_insets(Insets::ZERO);
        let mut chart = ScatterChart::with_config(config).unwrap();
        chart.set_datasource(Rc::downgrade(data));
        chart.set_size(200.0, 100.0);
        chart
    }

    #[test]
    fn projection_inverts_both_axes() {
        let data = sample();
        let mut chart = chart_with(&data);
        chart.layout();
        assert!(approx(chart.limits().x.max as f32, 100.0));
        assert!(approx(chart.limits().y.max as f32, 40.0));
        let first = chart.points()[0];
        assert!(approx(first.x, (100.0 - 10.0) / 100.0 * 200.0));
        assert!(approx(first.y, (40.0 - 10.0) / 40.0 * 100.0));
        assert_eq!(chart.layers().len(), 3);
    }

    #[test]
    fn touch_resolves_in_two_dimensions() {
        let data = sample();
        let recorder = Rc::new(Recorder::default());
        let mut chart = chart_with(&data);
        chart.set_delegate(Rc::downgrade(&recorder));
        chart.layout();

        let last = chart.points()[2];
        let at = ScreenPoint::new(last.x + 1.0, last.y - 1.0);
        assert!(chart.touch(TouchEvent::new(TouchPhase::Down, at)));
        assert!(chart.layers()[2].selected);
        assert!(chart.touch(TouchEvent::new(TouchPhase::Down, at)));
        assert!(chart.touch(TouchEvent::new(TouchPhase::Up, at)));
        assert_eq!(
            *recorder.events.borrow(),
            vec![(false, 1, 0), (false, 1, 0), (true, 1, 0)]
        );
    }

    #[test]
    fn coincident_points_resolve_to_first_dataset() {
        let data = Rc::new(
            ScatterData::new(vec![
                vec![Point::new(20.0, 20.0), Point::new(60.0, 30.0)],
                vec![Point::new(20.0, 20.0)],
            ])
            .unwrap(),
        );
        let recorder = Rc::new(Recorder::default());
        let mut chart = chart_with(&data);
        chart.set_delegate(Rc::downgrade(&recorder));
        chart.layout();

        let shared = chart.points()[0];
        assert_eq!(shared.position(), chart.points()[2].position());
        let at = ScreenPoint::new(shared.x + 0.5, shared.y);
        assert!(chart.touch(TouchEvent::new(TouchPhase::Down, at)));
        assert!(chart.touch(TouchEvent::new(TouchPhase::Down, at)));
        assert_eq!(*recorder.events.borrow(), vec![(false, 0, 0), (false, 0, 0)]);
        assert!(chart.layers()[0].selected);
        assert!(!chart.layers()[2].selected);
    }

    #[test]
    fn touch_on_axis_labels_is_silent() {
        let data = sample();
        let recorder = Rc::new(Recorder::default());
        let mut chart = ScatterChart::new();
        chart.set_datasource(Rc::downgrade(&data));
        chart.set_delegate(Rc::downgrade(&recorder));
        chart.set_size(200.0, 100.0);
        chart.layout();

        let content = chart.content();
        let at = ScreenPoint::new(content.min.x - 1.0, content.min.y + 10.0);
        assert!(!chart.touch(TouchEvent::new(TouchPhase::Down, at)));
        assert!(recorder.events.borrow().is_empty());
        assert!(chart.layers().iter().all(|layer| !layer.selected));
    }

    #[test]
    fn no_points_means_silent_touches() {
        let data = Rc::new(ScatterData::new(vec![vec![]]).unwrap());
        let mut chart = chart_with(&data);
        chart.layout();
        assert!(chart.points().is_empty());
        assert!(!chart.touch(TouchEvent::new(TouchPhase::Down, ScreenPoint::new(5.0, 5.0))));
    }
}
