//! Chart types and the layout state they share.
//!
//! Every chart follows the same cycle: configuration or data changes mark it
//! dirty, [`Chart::layout`] recomputes the projected points and layers in one
//! pass, and touches are resolved against the most recent pass.

pub mod bar;
pub mod heatmap;
pub mod legend;
pub mod line;
pub mod pie;
pub mod scatter;

use std::rc::{Rc, Weak};

use thiserror::Error;
use tracing::{debug, trace};

use crate::canvas::{Canvas, Insets};
use crate::geom::ScreenRect;
use crate::interaction::TouchEvent;
use crate::layer::{Layer, LayerSet, LayerSync};
use crate::render::{RenderCommand, RenderList};
use crate::style::Theme;

/// Errors raised when a chart configuration is rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Bar width is negative or not finite.
    #[error("bar width must be a finite non-negative number, got {0}")]
    InvalidBarWidth(f32),
    /// Spacing between bar groups is negative or not finite.
    #[error("bar spacing must be a finite non-negative number, got {0}")]
    InvalidSpacing(f32),
    /// Headroom factor outside `0..=1`.
    #[error("shift factor must lie within [0, 1], got {0}")]
    ShiftOutOfRange(f64),
    /// Axis markers require at least one marker.
    #[error("marker count must be at least 1")]
    ZeroMarkerCount,
    /// A size, radius or ratio is negative or not finite.
    #[error("{what} must be a finite non-negative number, got {value}")]
    InvalidSize {
        /// Field name.
        what: &'static str,
        /// Rejected value.
        value: f32,
    },
}

/// Check that a size-like config value is finite and non-negative.
pub(crate) fn check_size(what: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidSize { what, value })
    }
}

pub(crate) fn check_insets(insets: Insets) -> Result<(), ConfigError> {
    check_size("top inset", insets.top)?;
    check_size("left inset", insets.left)?;
    check_size("bottom inset", insets.bottom)?;
    check_size("right inset", insets.right)
}

/// Result of a layout pass that produced new layers.
///
/// The layers themselves are read from [`Chart::layers`]; the pass carries
/// what a presentation driver needs to animate towards them.
#[derive(Debug, Clone)]
pub struct LayoutPass {
    /// Whether layers were rebuilt or updated in place.
    pub sync: LayerSync,
    /// Layers of the previous pass (empty on the first pass).
    pub previous: Vec<Layer>,
    /// Bottom edge of the content rectangle; rebuilt lines start from here.
    pub baseline: f32,
}

impl LayoutPass {
    /// Starting snapshot for a transition towards `target`.
    ///
    /// Rebuilt layers grow out of their collapsed form; updated layers move
    /// from their previous geometry.
    pub fn start_layers(&self, target: &[Layer]) -> Vec<Layer> {
        match self.sync {
            LayerSync::Rebuilt => target
                .iter()
                .map(|layer| layer.collapsed(self.baseline))
                .collect(),
            LayerSync::Updated => self.previous.clone(),
        }
    }
}

/// Per-instance layout state: view size, dirty flag, content rectangle and layers.
#[derive(Debug, Clone)]
pub struct LayoutState {
    width: f32,
    height: f32,
    dirty: bool,
    laid_out: bool,
    content: ScreenRect,
    layers: LayerSet,
}

impl LayoutState {
    /// Create an uninitialized state.
    pub fn new() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            dirty: true,
            laid_out: false,
            content: ScreenRect::default(),
            layers: LayerSet::new(),
        }
    }

    /// Update the view size; marks the state dirty when it changes.
    pub fn set_size(&mut self, width: f32, height: f32) {
        let width = if width.is_finite() { width.max(0.0) } else { 0.0 };
        let height = if height.is_finite() { height.max(0.0) } else { 0.0 };
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.dirty = true;
        }
    }

    /// View size in pixels.
    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    /// Request a recomputation on the next layout pass.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Whether the next layout pass will recompute.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Whether at least one layout pass completed.
    pub fn is_laid_out(&self) -> bool {
        self.laid_out
    }

    /// Content rectangle of the last pass.
    pub fn content(&self) -> ScreenRect {
        self.content
    }

    /// Layers of the last pass.
    pub fn layers(&self) -> &[Layer] {
        self.layers.layers()
    }

    pub(crate) fn layer_set_mut(&mut self) -> &mut LayerSet {
        &mut self.layers
    }

    pub(crate) fn canvas(&self, insets: Insets, padding: f32) -> Canvas {
        Canvas::new(self.width, self.height, insets, padding)
    }

    pub(crate) fn commit(
        &mut self,
        kind: &'static str,
        canvas: &Canvas,
        signature: Vec<usize>,
        layers: Vec<Layer>,
    ) -> LayoutPass {
        let previous = self.layers.layers().to_vec();
        let sync = self.layers.sync(signature, layers);
        self.content = canvas.content();
        self.dirty = false;
        self.laid_out = true;
        trace!(
            chart = kind,
            layers = self.layers.layers().len(),
            ?sync,
            "layout pass"
        );
        LayoutPass {
            sync,
            previous,
            baseline: self.content.max.y,
        }
    }
}

impl Default for LayoutState {
    fn default() -> Self {
        Self::new()
    }
}

/// Common surface of every chart type.
///
/// Implementors own a [`LayoutState`]; size, dirty tracking and layer access
/// are provided on top of it.
pub trait Chart {
    /// Short chart name used in diagnostics.
    fn kind(&self) -> &'static str;

    /// Shared layout state.
    fn state(&self) -> &LayoutState;

    /// Shared layout state, mutably.
    fn state_mut(&mut self) -> &mut LayoutState;

    /// Recompute projected points and layers if the chart is dirty.
    ///
    /// Returns `None` when nothing changed since the last pass.
    fn layout(&mut self) -> Option<LayoutPass>;

    /// Append axes, markers and labels for the last pass.
    fn decorations(&self, theme: &Theme, out: &mut RenderList);

    /// Resolve a touch against the last pass and notify the delegate.
    ///
    /// Returns `true` when the touch resolved to an element.
    fn touch(&mut self, event: TouchEvent) -> bool;

    /// Update the view size.
    fn set_size(&mut self, width: f32, height: f32) {
        self.state_mut().set_size(width, height);
    }

    /// Re-read the datasource on the next layout pass.
    fn reload_data(&mut self) {
        self.state_mut().mark_dirty();
    }

    /// Whether the next layout pass will recompute.
    fn is_dirty(&self) -> bool {
        self.state().is_dirty()
    }

    /// Layers of the last pass.
    fn layers(&self) -> &[Layer] {
        self.state().layers()
    }

    /// Content rectangle of the last pass.
    fn content(&self) -> ScreenRect {
        self.state().content()
    }
}

/// Build a full frame: decorations, then `layers` clipped to the content area.
///
/// `layers` is usually [`Chart::layers`] or an animated sample of them.
pub fn render_frame<C: Chart + ?Sized>(chart: &C, layers: &[Layer], theme: &Theme) -> RenderList {
    let mut out = RenderList::new();
    chart.decorations(theme, &mut out);
    let clip = chart.content();
    out.push(RenderCommand::ClipRect(clip));
    for layer in layers {
        layer.render(&mut out, clip, theme);
    }
    out.push(RenderCommand::ClipEnd);
    out
}

/// Upgrade an optional weak reference, logging when its target is gone.
pub(crate) fn upgrade<T: ?Sized>(
    weak: &Option<Weak<T>>,
    chart: &'static str,
    role: &'static str,
) -> Option<Rc<T>> {
    let weak = weak.as_ref()?;
    let strong = weak.upgrade();
    if strong.is_none() {
        debug!(chart, role, "weak reference dropped");
    }
    strong
}

#[cfg(test)]
pub(crate) mod test_support {
    pub(crate) fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::ScreenPoint;
    use crate::layer::{LayerKey, Shape};
    use crate::render::Color;

    #[test]
    fn set_size_only_dirties_on_change() {
        let mut state = LayoutState::new();
        assert!(state.is_dirty());
        let canvas = state.canvas(Insets::ZERO, 0.0);
        state.commit("test", &canvas, vec![], vec![]);
        assert!(!state.is_dirty());
        state.set_size(0.0, 0.0);
        assert!(!state.is_dirty());
        state.set_size(100.0, 50.0);
        assert!(state.is_dirty());
    }

    #[test]
    fn rebuilt_pass_starts_collapsed() {
        let target = vec![Layer::new(
            LayerKey::series(0),
            Shape::Polyline(vec![ScreenPoint::new(0.0, 10.0), ScreenPoint::new(5.0, 20.0)]),
            Color::BLACK,
        )];
        let pass = LayoutPass {
            sync: LayerSync::Rebuilt,
            previous: Vec::new(),
            baseline: 90.0,
        };
        let start = pass.start_layers(&target);
        assert_eq!(
            start[0].shape,
            Shape::Polyline(vec![ScreenPoint::new(0.0, 90.0), ScreenPoint::new(5.0, 90.0)])
        );
    }

    #[test]
    fn upgrade_tolerates_missing_and_dropped_targets() {
        let missing: Option<Weak<u32>> = None;
        assert!(upgrade(&missing, "test", "datasource").is_none());
        let value = Rc::new(7_u32);
        let weak = Some(Rc::downgrade(&value));
        assert_eq!(upgrade(&weak, "test", "datasource").as_deref(), Some(&7));
        drop(value);
        assert!(upgrade(&weak, "test", "datasource").is_none());
    }

    #[test]
    fn config_errors_render_messages() {
        assert_eq!(
            ConfigError::ShiftOutOfRange(1.5).to_string(),
            "shift factor must lie within [0, 1], got 1.5"
        );
        assert!(check_size("padding", -1.0).is_err());
        assert!(check_size("padding", f32::NAN).is_err());
        assert!(check_size("padding", 0.0).is_ok());
    }
}
