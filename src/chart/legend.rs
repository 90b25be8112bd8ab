//! Legends: one swatch and label per row.

use std::rc::Weak;

use tracing::debug;

use crate::canvas::{Insets, marker_text_style};
use crate::chart::{Chart, ConfigError, LayoutPass, LayoutState, check_size, upgrade};
use crate::datasource::LegendDataSource;
use crate::delegate::LegendDelegate;
use crate::geom::{ScreenPoint, ScreenRect};
use crate::interaction::{TouchEvent, TouchPhase};
use crate::layer::{Layer, LayerKey, Shape};
use crate::render::{RenderCommand, RenderList, TextAnchor};
use crate::style::Theme;

const KIND: &str = "legend";

/// Configuration for a [`Legend`].
#[derive(Debug, Clone, PartialEq)]
pub struct LegendConfig {
    /// Height of one row.
    pub row_height: f32,
    /// Edge length of the color swatch.
    pub swatch_size: f32,
    /// Gap between swatch and label.
    pub gap: f32,
    /// Padding around the rows.
    pub padding: f32,
}

impl LegendConfig {
    /// Set the row height.
    pub fn with_row_height(mut self, height: f32) -> Self {
        self.row_height = height;
        self
    }

    /// Check the configuration for unusable values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_size("row height", self.row_height)?;
        if self.row_height == 0.0 {
            return Err(ConfigError::InvalidSize {
                what: "row height",
                value: 0.0,
            });
        }
        check_size("swatch size", self.swatch_size)?;
        check_size("gap", self.gap)?;
        check_size("padding", self.padding)
    }
}

impl Default for LegendConfig {
    fn default() -> Self {
        Self {
            row_height: 22.0,
            swatch_size: 12.0,
            gap: 8.0,
            padding: 4.0,
        }
    }
}

/// A legend bound to a datasource and an optional delegate.
#[derive(Debug)]
pub struct Legend {
    config: LegendConfig,
    datasource: Option<Weak<dyn LegendDataSource>>,
    delegate: Option<Weak<dyn LegendDelegate>>,
    state: LayoutState,
    labels: Vec<(ScreenPoint, String)>,
}

impl Legend {
    /// Create a legend with the default configuration.
    pub fn new() -> Self {
        Self {
            config: LegendConfig::default(),
            datasource: None,
            delegate: None,
            state: LayoutState::new(),
            labels: Vec::new(),
        }
    }

    /// Create a legend with a custom configuration.
    pub fn with_config(config: LegendConfig) -> Result<Self, ConfigError> {
        let mut legend = Self::new();
        legend.set_config(config)?;
        Ok(legend)
    }

    /// Current configuration.
    pub fn config(&self) -> &LegendConfig {
        &self.config
    }

    /// Replace the configuration; an invalid one is rejected and the old one kept.
    pub fn set_config(&mut self, config: LegendConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config;
        self.state.mark_dirty();
        Ok(())
    }

    /// Attach the datasource.
    pub fn set_datasource<T: LegendDataSource + 'static>(&mut self, datasource: Weak<T>) {
        self.datasource = Some(datasource as Weak<dyn LegendDataSource>);
        self.state.mark_dirty();
    }

    /// Attach the delegate.
    pub fn set_delegate<T: LegendDelegate + 'static>(&mut self, delegate: Weak<T>) {
        self.delegate = Some(delegate as Weak<dyn LegendDelegate>);
    }

    /// Row under a chart-local point, if any.
    pub fn row_at(&self, position: ScreenPoint) -> Option<usize> {
        let content = self.state.content();
        let offset = position.y - content.min.y;
        if offset < 0.0 || position.x > content.max.x {
            return None;
        }
        let row = (offset / self.config.row_height) as usize;
        (row < self.labels.len()).then_some(row)
    }
}

impl Default for Legend {
    fn default() -> Self {
        Self::new()
    }
}

impl Chart for Legend {
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
        let entries: Vec<_> = upgrade(&self.datasource, KIND, "datasource")
            .map(|source| {
                (0..source.number_of_items())
                    .map(|item| (source.label(item), source.color(item)))
                    .collect()
            })
            .unwrap_or_default();

        let config = &self.config;
        let mut layers = Vec::with_capacity(entries.len());
        let mut labels = Vec::with_capacity(entries.len());
        for (item, (label, color)) in entries.into_iter().enumerate() {
            let row_center = content.min.y + config.row_height * (item as f32 + 0.5);
            let swatch = ScreenRect::from_origin_size(
                content.min.x,
                row_center - config.swatch_size * 0.5,
                config.swatch_size,
                config.swatch_size,
            );
            layers.push(Layer::new(LayerKey::new(0, item), Shape::Rect(swatch), color));
            labels.push((
                ScreenPoint::new(swatch.max.x + config.gap, row_center),
                label,
            ));
        }
        let count = labels.len();
        self.labels = labels;
        Some(self.state.commit(KIND, &canvas, vec![count], layers))
    }

    fn decorations(&self, theme: &Theme, out: &mut RenderList) {
        let style = marker_text_style(theme, TextAnchor::Start);
        for (position, text) in &self.labels {
            out.push(RenderCommand::Text {
                position: position.offset(0.0, style.size * 0.35),
                text: text.clone(),
                style: style.clone(),
            });
        }
    }

    fn touch(&mut self, event: TouchEvent) -> bool {
        if event.is_outside() {
            debug!(chart = KIND, x = event.position.x, "touch outside legend ignored");
            return false;
        }
        let Some(item) = self.row_at(event.position) else {
            debug!(chart = KIND, "touch outside rows ignored");
            return false;
        };
        let layers = self.state.layer_set_mut();
        match event.phase {
            TouchPhase::Down | TouchPhase::Move => {
                layers.select(|key| key.item == Some(item));
            }
            TouchPhase::Up => {
                layers.select(|key| key.item == Some(item));
                if let Some(delegate) = upgrade(&self.delegate, KIND, "delegate") {
                    delegate.did_select(item);
                }
            }
            TouchPhase::Cancel => {
                layers.clear_selection();
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
    use crate::datasource::LegendData;
    use crate::render::Color;

    #[derive(Default)]
    struct Recorder {
        selected: RefCell<Vec<usize>>,
    }

    impl LegendDelegate for Recorder {
        fn did_select(&self, item: usize) {
            self.selected.borrow_mut().push(item);
        }
    }

    fn legend() -> (Rc<LegendData>, Legend) {
        let data = Rc::new(LegendData::new([
            ("North", Color::BLACK),
            ("South", Color::WHITE),
        ]));
        let mut legend = Legend::new();
        legend.set_datasource(Rc::downgrade(&data));
        legend.set_size(120.0, 100.0);
        legend.layout();
        (data, legend)
    }

    #[test]
    fn rows_stack_vertically() {
        let (_data, legend) = legend();
        assert_eq!(legend.layers().len(), 2);
        let mut out = RenderList::new();
        legend.decorations(&Theme::default(), &mut out);
        let texts: Vec<&str> = out
            .commands()
            .iter()
            .filter_map(|command| match command {
                RenderCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(texts, vec!["North", "South"]);
        assert_eq!(legend.row_at(ScreenPoint::new(10.0, 30.0)), Some(1));
        assert_eq!(legend.row_at(ScreenPoint::new(10.0, 90.0)), None);
    }

    #[test]
    fn tap_notifies_delegate() {
        let (_data, mut legend) = legend();
        let recorder = Rc::new(Recorder::default());
        legend.set_delegate(Rc::downgrade(&recorder));
        let at = ScreenPoint::new(10.0, 10.0);
        assert!(legend.touch(TouchEvent::new(TouchPhase::Down, at)));
        assert!(legend.touch(TouchEvent::new(TouchPhase::Up, at)));
        assert!(legend.layers()[0].selected);
        assert_eq!(*recorder.selected.borrow(), vec![0]);
        legend.touch(TouchEvent::new(TouchPhase::Cancel, at));
        assert!(!legend.layers()[0].selected);
    }
}
