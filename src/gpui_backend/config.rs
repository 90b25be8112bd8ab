use crate::animation::AnimationConfig;
use crate::style::Theme;

/// Configuration for the GPUI chart view.
#[derive(Debug, Clone, Default)]
pub struct ChartViewConfig {
    /// Colors for background, axes and selection.
    pub theme: Theme,
    /// Transition settings for layout changes.
    pub animation: AnimationConfig,
}

impl ChartViewConfig {
    /// Set the theme.
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Set the animation settings.
    pub fn with_animation(mut self, animation: AnimationConfig) -> Self {
        self.animation = animation;
        self
    }
}
