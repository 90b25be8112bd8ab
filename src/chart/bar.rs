//! Grouped and stacked bar charts.

use std::rc::Weak;

use tracing::debug;

use crate::axis::{AxisMarker, LabelFormat, MarkerConfig, value_markers};
use crate::canvas::{Insets, push_axes, push_category_labels, push_value_markers};
use crate::chart::{Chart, ConfigError, LayoutPass, LayoutState, check_insets, check_size, upgrade};
use crate::datasource::BarChartDataSource;
use crate::delegate::BarChartDelegate;
use crate::geom::ScreenRect;
use crate::interaction::{TouchEvent, nearest_by_x};
use crate::layer::{Layer, LayerKey, Shape};
use crate::limits::{AxisLimits, BAR_SHIFT, bar_limits};
use crate::render::{Color, RenderList};
use crate::style::Theme;

const KIND: &str = "bar";

/// Configuration for a [`BarChart`].
#[derive(Debug, Clone)]
pub struct BarChartConfig {
    /// Stack datasets into one column per item instead of grouping them side by side.
    pub stacked: bool,
    /// Fixed bar width; `None` fits the bars to the canvas width.
    pub bar_width: Option<f32>,
    /// Horizontal space before every item group and after the last one.
    pub spacing: f32,
    /// Headroom above the tallest bar, as a fraction of it.
    pub shift: f64,
    /// Margins reserved for labels.
    pub insets: Insets,
    /// Extra padding inside the insets.
    pub padding: f32,
    /// Value axis markers.
    pub markers: MarkerConfig,
    /// Draw item labels under each group.
    pub show_item_labels: bool,
}

impl BarChartConfig {
    /// Set stacking.
    pub fn with_stacked(mut self, stacked: bool) -> Self {
        self.stacked = stacked;
        self
    }

    /// Set a fixed bar width.
    pub fn with_bar_width(mut self, width: f32) -> Self {
        self.bar_width = Some(width);
        self
    }

    /// Set the spacing between item groups.
    pub fn with_spacing(mut self, spacing: f32) -> Self {
        self.spacing = spacing;
        self
    }

    /// Set the headroom factor.
    pub fn with_shift(mut self, shift: f64) -> Self {
        self.shift = shift;
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
        if let Some(width) = self.bar_width
            && !(width.is_finite() && width >= 0.0)
        {
            return Err(ConfigError::InvalidBarWidth(width));
        }
        if !(self.spacing.is_finite() && self.spacing >= 0.0) {
            return Err(ConfigError::InvalidSpacing(self.spacing));
        }
        if !(0.0..=1.0).contains(&self.shift) {
            return Err(ConfigError::ShiftOutOfRange(self.shift));
        }
        if self.markers.count == 0 {
            return Err(ConfigError::ZeroMarkerCount);
        }
        check_size("padding", self.padding)?;
        check_insets(self.insets)
    }
}

impl Default for BarChartConfig {
    fn default() -> Self {
        Self {
            stacked: false,
            bar_width: None,
            spacing: 10.0,
            shift: BAR_SHIFT,
            insets: Insets::default(),
            padding: 0.0,
            markers: MarkerConfig::new(LabelFormat::Integer),
            show_item_labels: true,
        }
    }
}

/// One projected bar in content-local pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarPoint {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Bar width.
    pub width: f32,
    /// Bar height.
    pub height: f32,
    /// Dataset index.
    pub dataset: usize,
    /// Item index.
    pub item: usize,
}

impl BarPoint {
    /// Rectangle of the bar, shifted by the content origin.
    pub fn rect(&self, origin_x: f32, origin_y: f32) -> ScreenRect {
        ScreenRect::from_origin_size(origin_x + self.x, origin_y + self.y, self.width, self.height)
    }
}

/// Every bar sharing one item index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarGroup {
    /// Left edge of the leftmost bar.
    pub x: f32,
    /// Width spanning every bar of the group.
    pub width: f32,
    /// Item index.
    pub index: usize,
}

impl BarGroup {
    /// Horizontal center.
    pub fn center(&self) -> f32 {
        self.x + self.width * 0.5
    }
}

/// Resolved horizontal bar geometry for one pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarGeometry {
    /// Width of a single bar.
    pub bar_width: f32,
    /// Space before every group.
    pub spacing: f32,
    /// Stacked layout.
    pub stacked: bool,
}

impl BarGeometry {
    /// Resolve the bar width, fitting bars to `width` when none is configured.
    pub fn resolve(config: &BarChartConfig, width: f32, datasets: usize, items: usize) -> Self {
        let bar_width = config.bar_width.unwrap_or_else(|| {
            let columns = if config.stacked { items } else { items * datasets };
            if columns == 0 {
                return 0.0;
            }
            ((width - config.spacing * (items + 1) as f32) / columns as f32).max(0.0)
        });
        Self {
            bar_width,
            spacing: config.spacing,
            stacked: config.stacked,
        }
    }

    fn group_x(&self, item: usize, datasets: usize) -> f32 {
        let per_group = if self.stacked { 1 } else { datasets };
        self.bar_width * per_group as f32 * item as f32 + self.spacing * (item + 1) as f32
    }

    fn group_width(&self, datasets: usize) -> f32 {
        if self.stacked {
            self.bar_width
        } else {
            self.bar_width * datasets as f32
        }
    }
}

/// Project bar values into content-local rectangles, dataset by dataset.
///
/// Heights use the magnitude of each value. A chart whose limit is zero
/// draws full-height bars; stacked columns split the height evenly instead.
pub fn project_bars(
    values: &[Vec<f64>],
    limits: AxisLimits,
    height: f32,
    geometry: BarGeometry,
) -> Vec<BarPoint> {
    let datasets = values.len();
    let items = values.first().map_or(0, Vec::len);
    let max = limits.max;
    let bar_height = |value: f64| {
        if max > 0.0 {
            (height as f64 * value.abs() / max) as f32
        } else if geometry.stacked {
            height / datasets as f32
        } else {
            height
        }
    };

    let mut stacks = vec![0.0_f32; items];
    let mut points = Vec::with_capacity(datasets * items);
    for (dataset, series) in values.iter().enumerate() {
        for (item, &value) in series.iter().enumerate().take(items) {
            let raw = bar_height(value);
            let point = if geometry.stacked {
                let stack = stacks[item];
                let y = (height - raw - stack).max(0.0);
                let bar = (height - stack - y).max(0.0);
                stacks[item] += bar;
                BarPoint {
                    x: geometry.group_x(item, datasets),
                    y,
                    width: geometry.bar_width,
                    height: bar,
                    dataset,
                    item,
                }
            } else {
                BarPoint {
                    x: geometry.group_x(item, datasets) + geometry.bar_width * dataset as f32,
                    y: height - raw,
                    width: geometry.bar_width,
                    height: raw,
                    dataset,
                    item,
                }
            };
            points.push(point);
        }
    }
    points
}

/// Item groups used for hit-testing.
pub fn bar_groups(datasets: usize, items: usize, geometry: BarGeometry) -> Vec<BarGroup> {
    if datasets == 0 {
        return Vec::new();
    }
    (0..items)
        .map(|index| BarGroup {
            x: geometry.group_x(index, datasets),
            width: geometry.group_width(datasets),
            index,
        })
        .collect()
}

/// A bar chart bound to a datasource and an optional delegate.
#[derive(Debug)]
pub struct BarChart {
    config: BarChartConfig,
    datasource: Option<Weak<dyn BarChartDataSource>>,
    delegate: Option<Weak<dyn BarChartDelegate>>,
    state: LayoutState,
    limits: AxisLimits,
    points: Vec<BarPoint>,
    groups: Vec<BarGroup>,
    markers: Vec<AxisMarker>,
    item_labels: Vec<(f32, String)>,
}

impl BarChart {
    /// Create a chart with the default configuration.
    pub fn new() -> Self {
        Self {
            config: BarChartConfig::default(),
            datasource: None,
            delegate: None,
            state: LayoutState::new(),
            limits: AxisLimits::EMPTY,
            points: Vec::new(),
            groups: Vec::new(),
            markers: Vec::new(),
            item_labels: Vec::new(),
        }
    }

    /// Create a chart with a custom configuration.
    pub fn with_config(config: BarChartConfig) -> Result<Self, ConfigError> {
        let mut chart = Self::new();
        chart.set_config(config)?;
        Ok(chart)
    }

    /// Current configuration.
    pub fn config(&self) -> &BarChartConfig {
        &self.config
    }

    /// Replace the configuration; an invalid one is rejected and the old one kept.
    pub fn set_config(&mut self, config: BarChartConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config;
        self.state.mark_dirty();
        Ok(())
    }

    /// Attach the datasource.
    pub fn set_datasource<T: BarChartDataSource + 'static>(&mut self, datasource: Weak<T>) {
        self.datasource = Some(datasource as Weak<dyn BarChartDataSource>);
        self.state.mark_dirty();
    }

    /// Attach the delegate.
    pub fn set_delegate<T: BarChartDelegate + 'static>(&mut self, delegate: Weak<T>) {
        self.delegate = Some(delegate as Weak<dyn BarChartDelegate>);
    }

    /// Value axis limits of the last pass.
    pub fn limits(&self) -> AxisLimits {
        self.limits
    }

    /// Projected bars of the last pass, in content-local pixels.
    pub fn points(&self) -> &[BarPoint] {
        &self.points
    }

    /// Item groups of the last pass, in content-local pixels.
    pub fn groups(&self) -> &[BarGroup] {
        &self.groups
    }

    /// Value markers of the last pass.
    pub fn markers(&self) -> &[AxisMarker] {
        &self.markers
    }
}

impl Default for BarChart {
    fn default() -> Self {
        Self::new()
    }
}

impl Chart for BarChart {
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
        let mut colors = Vec::new();
        let mut labels = Vec::new();
        if let Some(source) = &datasource {
            let datasets = source.number_of_datasets();
            let items = source.number_of_items();
            for dataset in 0..datasets {
                values.push((0..items).map(|item| source.value(dataset, item)).collect::<Vec<_>>());
                colors.push(
                    (0..items)
                        .map(|item| source.bar_color(dataset, item))
                        .collect::<Vec<Color>>(),
                );
            }
            labels = (0..items).map(|item| source.item_label(item)).collect();
        }
        let datasets = values.len();
        let items = values.first().map_or(0, Vec::len);

        self.limits = bar_limits(&values, self.config.stacked, self.config.shift);
        let geometry = BarGeometry::resolve(&self.config, content.width(), datasets, items);
        self.points = project_bars(&values, self.limits, content.height(), geometry);
        self.groups = bar_groups(datasets, items, geometry);
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
        self.item_labels = if self.config.show_item_labels {
            self.groups
                .iter()
                .zip(labels)
                .filter_map(|(group, label)| Some((content.min.x + group.center(), label?)))
                .collect()
        } else {
            Vec::new()
        };

        let layers = self
            .points
            .iter()
            .map(|point| {
                Layer::new(
                    LayerKey::new(point.dataset, point.item),
                    Shape::Rect(point.rect(content.min.x, content.min.y)),
                    colors[point.dataset][point.item],
                )
            })
            .collect();
        Some(self.state.commit(
            KIND,
            &canvas,
            vec![datasets, items, usize::from(self.config.stacked)],
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
        push_category_labels(out, content, &self.item_labels, theme);
    }

    fn touch(&mut self, event: TouchEvent) -> bool {
        let Some(local) = event.relative_to(self.state.content().min) else {
            debug!(chart = KIND, x = event.position.x, "touch outside plot area ignored");
            return false;
        };
        let Some(item) = nearest_by_x(self.groups.iter().map(BarGroup::center), local.x) else {
            debug!(chart = KIND, "touch without bars ignored");
            return false;
        };
        let delegate = upgrade(&self.delegate, KIND, "delegate");
        let layers = self.state.layer_set_mut();
        if event.phase.is_release() {
            layers.clear_selection();
            if let Some(delegate) = delegate {
                delegate.did_release_touch(item);
            }
        } else {
            layers.select(|key| key.item == Some(item));
            if let Some(delegate) = delegate {
                delegate.did_touch(item);
            }
        }
        true
    }
}
