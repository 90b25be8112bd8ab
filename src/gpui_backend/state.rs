use std::time::Instant;

use crate::animation::{AnimationConfig, Transition};
use crate::chart::LayoutPass;
use crate::geom::ScreenPoint;
use crate::layer::{Layer, LayerSync};

#[derive(Debug, Clone)]
pub(crate) struct ActiveTransition {
    pub(crate) transition: Transition,
    pub(crate) started: Instant,
}

/// Presentation state of a chart view, kept apart from the chart's layout state.
#[derive(Debug, Clone, Default)]
pub(crate) struct ChartUiState {
    pub(crate) origin: ScreenPoint,
    pub(crate) pressed: bool,
    pub(crate) transition: Option<ActiveTransition>,
    pub(crate) shown: Option<Vec<Layer>>,
}

impl ChartUiState {
    /// Start animating towards `target` after a layout pass.
    ///
    /// Updated layers continue from what is on screen so an interrupted
    /// transition does not jump.
    pub(crate) fn begin(&mut self, pass: &LayoutPass, target: &[Layer], config: AnimationConfig, now: Instant) {
        if !config.is_active() {
            self.transition = None;
            return;
        }
        let from = match (pass.sync, self.shown.take()) {
            (LayerSync::Updated, Some(shown)) if shown.len() == target.len() => shown,
            _ => pass.start_layers(target),
        };
        self.transition = Some(ActiveTransition {
            transition: Transition::new(from, target.to_vec(), config),
            started: now,
        });
    }

    /// Layers to paint at `now`; selection flags always follow `current`.
    pub(crate) fn frame_layers(&mut self, current: &[Layer], now: Instant) -> Vec<Layer> {
        let sampled = match &self.transition {
            Some(active) if !active.transition.is_finished(now - active.started) => {
                let mut layers = active.transition.sample(now - active.started);
                for (layer, live) in layers.iter_mut().zip(current) {
                    layer.selected = live.selected;
                }
                Some(layers)
            }
            _ => None,
        };
        let layers = match sampled {
            Some(layers) => layers,
            None => {
                self.transition = None;
                current.to_vec()
            }
        };
        self.shown = Some(layers.clone());
        layers
    }

    pub(crate) fn is_animating(&self) -> bool {
        self.transition.is_some()
    }
}
