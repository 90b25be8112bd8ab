//! Pie and donut charts with tap-to-select slices.

use std::f32::consts::{FRAC_PI_2, TAU};
use std::rc::Weak;

use tracing::debug;

use crate::canvas::Insets;
use crate::chart::{Chart, ConfigError, LayoutPass, LayoutState, check_size, upgrade};
use crate::datasource::PieChartDataSource;
use crate::delegate::PieChartDelegate;
use crate::geom::{ScreenPoint, distance_sq};
use crate::interaction::{TouchEvent, TouchPhase};
use crate::layer::{Layer, LayerKey, Shape, clockwise_angle_from_top};
use crate::render::RenderList;
use crate::style::Theme;

const KIND: &str = "pie";

/// Configuration for a [`PieChart`].
#[derive(Debug, Clone, PartialEq)]
pub struct PieChartConfig {
    /// Inner radius as a fraction of the outer radius; non-zero draws a donut.
    pub inner_radius_ratio: f32,
    /// Distance the selected slice moves outward.
    pub selection_offset: f32,
    /// Padding around the pie.
    pub padding: f32,
}

impl PieChartConfig {
    /// Set the donut hole ratio.
    pub fn with_inner_radius_ratio(mut self, ratio: f32) -> Self {
        self.inner_radius_ratio = ratio;
        self
    }

    /// Set the selection offset.
    pub fn with_selection_offset(mut self, offset: f32) -> Self {
        self.selection_offset = offset;
        self
    }

    /// Check the configuration for unusable values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_size("inner radius ratio", self.inner_radius_ratio)?;
        if self.inner_radius_ratio >= 1.0 {
            return Err(ConfigError::InvalidSize {
                what: "inner radius ratio",
                value: self.inner_radius_ratio,
            });
        }
        check_size("selection offset", self.selection_offset)?;
        check_size("padding", self.padding)
    }
}

impl Default for PieChartConfig {
    fn default() -> Self {
        Self {
            inner_radius_ratio: 0.0,
            selection_offset: 10.0,
            padding: 8.0,
        }
    }
}

/// One slice as angles measured clockwise from 12 o'clock, in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PieSlice {
    /// Start angle.
    pub start_angle: f32,
    /// End angle.
    pub end_angle: f32,
    /// Slice index.
    pub slice: usize,
}

impl PieSlice {
    /// Angle halfway through the slice.
    pub fn mid_angle(&self) -> f32 {
        (self.start_angle + self.end_angle) * 0.5
    }

    /// Whether `angle` falls inside the slice.
    pub fn contains(&self, angle: f32) -> bool {
        angle >= self.start_angle && angle < self.end_angle
    }
}

/// Split the full circle proportionally to the values.
///
/// Negative values count as zero. Without a positive total every slice is empty.
pub fn project_slices(values: &[f64]) -> Vec<PieSlice> {
    let total: f64 = values.iter().map(|value| value.max(0.0)).sum();
    let mut cursor = 0.0_f64;
    values
        .iter()
        .enumerate()
        .map(|(slice, value)| {
            let sweep = if total > 0.0 {
                value.max(0.0) / total * TAU as f64
            } else {
                0.0
            };
            let start = cursor;
            cursor += sweep;
            PieSlice {
                start_angle: start as f32,
                end_angle: cursor as f32,
                slice,
            }
        })
        .collect()
}

/// A pie chart bound to a datasource and an optional delegate.
#[derive(Debug)]
pub struct PieChart {
    config: PieChartConfig,
    datasource: Option<Weak<dyn PieChartDataSource>>,
    delegate: Option<Weak<dyn PieChartDelegate>>,
    state: LayoutState,
    slices: Vec<PieSlice>,
    center: ScreenPoint,
    inner_radius: f32,
    outer_radius: f32,
    selected: Option<usize>,
}

impl PieChart {
    /// Create a chart with the default configuration.
    pub fn new() -> Self {
        Self {
            config: PieChartConfig::default(),
            datasource: None,
            delegate: None,
            state: LayoutState::new(),
            slices: Vec::new(),
            center: ScreenPoint::default(),
            inner_radius: 0.0,
            outer_radius: 0.0,
            selected: None,
        }
    }

    /// Create a chart with a custom configuration.
    pub fn with_config(config: PieChartConfig) -> Result<Self, ConfigError> {
        let mut chart = Self::new();
        chart.set_config(config)?;
        Ok(chart)
    }

    /// Current configuration.
    pub fn config(&self) -> &PieChartConfig {
        &self.config
    }

    /// Replace the configuration; an invalid one is rejected and the old one kept.
    pub fn set_config(&mut self, config: PieChartConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config;
        self.state.mark_dirty();
        Ok(())
    }

    /// Attach the datasource.
    pub fn set_datasource<T: PieChartDataSource + 'static>(&mut self, datasource: Weak<T>) {
        self.datasource = Some(datasource as Weak<dyn PieChartDataSource>);
        self.state.mark_dirty();
    }

    /// Attach the delegate.
    pub fn set_delegate<T: PieChartDelegate + 'static>(&mut self, delegate: Weak<T>) {
        self.delegate = Some(delegate as Weak<dyn PieChartDelegate>);
    }

    /// Slices of the last pass.
    pub fn slices(&self) -> &[PieSlice] {
        &self.slices
    }

    /// Currently selected slice.
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Slice drawn under a chart-local point, if any.
    ///
    /// The selected slice is tested at its offset center, so the gap it
    /// leaves behind resolves to nothing.
    pub fn slice_at(&self, position: ScreenPoint) -> Option<usize> {
        self.slices
            .iter()
            .find(|slice| {
                let center = self.slice_center(slice);
                let distance = distance_sq(position, center).sqrt();
                distance >= self.inner_radius
                    && distance <= self.outer_radius
                    && slice.contains(clockwise_angle_from_top(center, position))
            })
            .map(|slice| slice.slice)
    }

    fn slice_center(&self, slice: &PieSlice) -> ScreenPoint {
        if self.selected != Some(slice.slice) {
            return self.center;
        }
        let angle = slice.mid_angle();
        let offset = self.config.selection_offset;
        self.center.offset(angle.sin() * offset, -angle.cos() * offset)
    }

    fn toggle(&mut self, slice: usize) {
        let delegate = upgrade(&self.delegate, KIND, "delegate");
        let previous = self.selected.take();
        if let (Some(previous), Some(delegate)) = (previous, &delegate) {
            delegate.did_deselect(previous);
        }
        if previous != Some(slice) {
            self.selected = Some(slice);
            if let Some(delegate) = &delegate {
                delegate.did_select(slice);
            }
        }
        self.state.mark_dirty();
    }
}

impl Default for PieChart {
    fn default() -> Self {
        Self::new()
    }
}

impl Chart for PieChart {
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
        let canvas = self.state.canvas(Insets::ZERO, self.config.padding);
        let content = canvas.content();
        let datasource = upgrade(&self.datasource, KIND, "datasource");
        let (values, colors): (Vec<f64>, Vec<_>) = match &datasource {
            Some(source) => (0..source.number_of_slices())
                .map(|slice| (source.value(slice), source.slice_color(slice)))
                .unzip(),
            None => (Vec::new(), Vec::new()),
        };
        if self.selected.is_some_and(|slice| slice >= values.len()) {
            self.selected = None;
        }

        self.slices = project_slices(&values);
        self.center = content.center();
        self.outer_radius =
            (content.width().min(content.height()) * 0.5 - self.config.selection_offset).max(0.0);
        self.inner_radius = self.outer_radius * self.config.inner_radius_ratio;

        let layers = self
            .slices
            .iter()
            .map(|slice| {
                Layer::new(
                    LayerKey::series(slice.slice),
                    Shape::Sector {
                        center: self.slice_center(slice),
                        inner_radius: self.inner_radius,
                        outer_radius: self.outer_radius,
                        start_angle: slice.start_angle - FRAC_PI_2,
                        end_angle: slice.end_angle - FRAC_PI_2,
                    },
                    colors[slice.slice],
                )
            })
            .collect();
        let pass = self.state.commit(KIND, &canvas, vec![values.len()], layers);
        let selected = self.selected;
        self.state
            .layer_set_mut()
            .select(|key| Some(key.dataset) == selected);
        Some(pass)
    }

    fn decorations(&self, _theme: &Theme, _out: &mut RenderList) {}

    fn touch(&mut self, event: TouchEvent) -> bool {
        if event.is_outside() {
            debug!(chart = KIND, x = event.position.x, "touch outside chart ignored");
            return false;
        }
        let Some(slice) = self.slice_at(event.position) else {
            debug!(chart = KIND, "touch outside slices ignored");
            return false;
        };
        if event.phase == TouchPhase::Up {
            self.toggle(slice);
        }
        true
    }
}
