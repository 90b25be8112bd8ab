//! Eased transitions between two layer snapshots.
//!
//! The layout core only produces exact target geometry. A [`Transition`]
//! holds the previous and the next snapshot and is sampled by a presentation
//! driver (the GPUI backend) against wall-clock time.

use std::time::Duration;

use crate::layer::Layer;

/// Easing curves for transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    /// Linear interpolation.
    Linear,
    /// Slow start.
    EaseIn,
    /// Slow end.
    EaseOut,
    /// Slow start and end.
    #[default]
    EaseInOut,
}

impl Easing {
    /// Apply the curve to a normalized time value.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t,
            Self::EaseOut => t * (2.0 - t),
            Self::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
        }
    }
}

/// Animation settings for layout changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationConfig {
    /// Whether layout changes animate at all.
    pub enabled: bool,
    /// Transition length.
    pub duration: Duration,
    /// Timing curve.
    pub easing: Easing,
}

impl AnimationConfig {
    /// Animations switched off.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Set the duration.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Set the easing curve.
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Whether a transition would have any visible length.
    pub fn is_active(&self) -> bool {
        self.enabled && !self.duration.is_zero()
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            duration: Duration::from_millis(350),
            easing: Easing::EaseInOut,
        }
    }
}

/// Interpolation between two layer snapshots.
#[derive(Debug, Clone)]
pub struct Transition {
    from: Vec<Layer>,
    to: Vec<Layer>,
    config: AnimationConfig,
}

impl Transition {
    /// Create a transition. Snapshots are paired by position.
    pub fn new(from: Vec<Layer>, to: Vec<Layer>, config: AnimationConfig) -> Self {
        Self { from, to, config }
    }

    /// Eased progress in `0..=1` after `elapsed`.
    pub fn progress(&self, elapsed: Duration) -> f32 {
        if !self.config.is_active() {
            return 1.0;
        }
        let t = elapsed.as_secs_f32() / self.config.duration.as_secs_f32();
        self.config.easing.apply(t)
    }

    /// Whether the transition has reached its target.
    pub fn is_finished(&self, elapsed: Duration) -> bool {
        !self.config.is_active() || elapsed >= self.config.duration
    }

    /// Interpolated layers after `elapsed`.
    ///
    /// Layers without a compatible counterpart snap to their target.
    pub fn sample(&self, elapsed: Duration) -> Vec<Layer> {
        if self.is_finished(elapsed) {
            return self.to.clone();
        }
        let t = self.progress(elapsed);
        self.to
            .iter()
            .enumerate()
            .map(|(index, target)| match self.from.get(index) {
                Some(start) => start.lerp(target, t),
                None => target.clone(),
            })
            .collect()
    }

    /// Target snapshot.
    pub fn target(&self) -> &[Layer] {
        &self.to
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::ScreenRect;
    use crate::layer::{LayerKey, Shape};
    use crate::render::Color;

    fn bar(height: f32) -> Layer {
        Layer::new(
            LayerKey::new(0, 0),
            Shape::Rect(ScreenRect::from_origin_size(0.0, 100.0 - height, 10.0, height)),
            Color::BLACK,
        )
    }

    #[test]
    fn easing_endpoints() {
        for easing in [Easing::Linear, Easing::EaseIn, Easing::EaseOut, Easing::EaseInOut] {
            assert_eq!(easing.apply(0.0), 0.0);
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-6);
        }
        assert!((Easing::EaseInOut.apply(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn sample_interpolates_then_snaps() {
        let config = AnimationConfig::default()
            .with_duration(Duration::from_millis(100))
            .with_easing(Easing::Linear);
        let transition = Transition::new(vec![bar(0.0)], vec![bar(50.0)], config);

        let half = transition.sample(Duration::from_millis(50));
        let Shape::Rect(rect) = half[0].shape else {
            panic!("rect layer expected");
        };
        assert!((rect.height() - 25.0).abs() < 1e-4);

        assert!(transition.is_finished(Duration::from_millis(100)));
        assert_eq!(transition.sample(Duration::from_millis(150)), vec![bar(50.0)]);
    }

    #[test]
    fn disabled_transition_is_immediately_finished() {
        let transition = Transition::new(vec![bar(0.0)], vec![bar(50.0)], AnimationConfig::disabled());
        assert!(transition.is_finished(Duration::ZERO));
        assert_eq!(transition.progress(Duration::ZERO), 1.0);
    }
}
