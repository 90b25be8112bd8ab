//! Heat-maps: a grid of cells colored by percentage.

use std::rc::Weak;

use crate::canvas::Insets;
use crate::chart::{Chart, ConfigError, LayoutPass, LayoutState, check_insets, check_size, upgrade};
use crate::datasource::HeatMapDataSource;
use crate::geom::ScreenRect;
use crate::interaction::TouchEvent;
use crate::layer::{Layer, LayerKey, Shape};
use crate::render::{Color, RenderList};
use crate::style::Theme;

const KIND: &str = "heatmap";

/// Configuration for a [`HeatMapChart`].
#[derive(Debug, Clone, PartialEq)]
pub struct HeatMapConfig {
    /// Color at 0%.
    pub low: Color,
    /// Color at 100%.
    pub high: Color,
    /// Color of cells missing from ragged rows.
    pub absent: Color,
    /// Gap between neighbouring cells.
    pub cell_spacing: f32,
    /// Margins around the grid.
    pub insets: Insets,
}

impl HeatMapConfig {
    /// Take the cell colors from a theme.
    pub fn from_theme(theme: &Theme) -> Self {
        Self {
            low: theme.heat_low,
            high: theme.heat_high,
            absent: theme.heat_absent,
            cell_spacing: 1.0,
            insets: Insets::ZERO,
        }
    }

    /// Set the low and high colors.
    pub fn with_colors(mut self, low: Color, high: Color) -> Self {
        self.low = low;
        self.high = high;
        self
    }

    /// Set the gap between cells.
    pub fn with_cell_spacing(mut self, spacing: f32) -> Self {
        self.cell_spacing = spacing;
        self
    }

    /// Check the configuration for unusable values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_size("cell spacing", self.cell_spacing)?;
        check_insets(self.insets)
    }
}

impl Default for HeatMapConfig {
    fn default() -> Self {
        Self::from_theme(&Theme::default())
    }
}

/// Color of a cell value on the 0-100 scale; values outside it are clamped.
pub fn heat_color(low: Color, high: Color, value: f64) -> Color {
    low.lerp(high, (value / 100.0) as f32)
}

impl HeatMapConfig {
    /// Color of a cell; missing and non-finite values use the absence color.
    pub fn cell_color(&self, value: Option<f64>) -> Color {
        match value {
            Some(value) if value.is_finite() => heat_color(self.low, self.high, value),
            _ => self.absent,
        }
    }
}

/// One projected cell in content-local pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatCell {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Cell width.
    pub width: f32,
    /// Cell height.
    pub height: f32,
    /// Row index.
    pub row: usize,
    /// Column index.
    pub column: usize,
    /// Cell value; `None` for cells beyond the end of a ragged row.
    pub value: Option<f64>,
}

/// Lay out a cell grid of `rows` by the longest row's length.
pub fn project_cells(rows: &[Vec<f64>], width: f32, height: f32, spacing: f32) -> Vec<HeatCell> {
    let row_count = rows.len();
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    if row_count == 0 || columns == 0 {
        return Vec::new();
    }
    let cell_width = ((width - spacing * (columns - 1) as f32) / columns as f32).max(0.0);
    let cell_height = ((height - spacing * (row_count - 1) as f32) / row_count as f32).max(0.0);
    let mut cells = Vec::with_capacity(row_count * columns);
    for (row, values) in rows.iter().enumerate() {
        for column in 0..columns {
            cells.push(HeatCell {
                x: column as f32 * (cell_width + spacing),
                y: row as f32 * (cell_height + spacing),
                width: cell_width,
                height: cell_height,
                row,
                column,
                value: values.get(column).copied(),
            });
        }
    }
    cells
}

/// A heat-map bound to a datasource. Heat-maps do not resolve touches.
#[derive(Debug)]
pub struct HeatMapChart {
    config: HeatMapConfig,
    datasource: Option<Weak<dyn HeatMapDataSource>>,
    state: LayoutState,
    cells: Vec<HeatCell>,
}

impl HeatMapChart {
    /// Create a heat-map with the default configuration.
    pub fn new() -> Self {
        Self {
            config: HeatMapConfig::default(),
            datasource: None,
            state: LayoutState::new(),
            cells: Vec::new(),
        }
    }

    /// Create a heat-map with a custom configuration.
    pub fn with_config(config: HeatMapConfig) -> Result<Self, ConfigError> {
        let mut chart = Self::new();
        chart.set_config(config)?;
        Ok(chart)
    }

    /// Current configuration.
    pub fn config(&self) -> &HeatMapConfig {
        &self.config
    }

    /// Replace the configuration; an invalid one is rejected and the old one kept.
    pub fn set_config(&mut self, config: HeatMapConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config;
        self.state.mark_dirty();
        Ok(())
    }

    /// Attach the datasource.
    pub fn set_datasource<T: HeatMapDataSource + 'static>(&mut self, datasource: Weak<T>) {
        self.datasource = Some(datasource as Weak<dyn HeatMapDataSource>);
        self.state.mark_dirty();
    }

    /// Cells of the last pass, row by row.
    pub fn cells(&self) -> &[HeatCell] {
        &self.cells
    }
}

impl Default for HeatMapChart {
    fn default() -> Self {
        Self::new()
    }
}

impl Chart for HeatMapChart {
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
        let canvas = self.state.canvas(self.config.insets, 0.0);
        let content = canvas.content();
        let rows: Vec<Vec<f64>> = upgrade(&self.datasource, KIND, "datasource")
            .map(|source| {
                (0..source.number_of_rows())
                    .map(|row| {
                        (0..source.number_of_columns(row))
                            .map(|column| source.value(row, column))
                            .collect()
                    })
                    .collect()
            })
            .unwrap_or_default();

        self.cells = project_cells(
            &rows,
            content.width(),
            content.height(),
            self.config.cell_spacing,
        );
        let config = &self.config;
        let layers = self
            .cells
            .iter()
            .map(|cell| {
                let color = config.cell_color(cell.value);
                Layer::new(
                    LayerKey::new(cell.row, cell.column),
                    Shape::Rect(ScreenRect::from_origin_size(
                        content.min.x + cell.x,
                        content.min.y + cell.y,
                        cell.width,
                        cell.height,
                    )),
                    color,
                )
            })
            .collect();
        let mut signature = vec![rows.len()];
        signature.extend(rows.iter().map(Vec::len));
        Some(self.state.commit(KIND, &canvas, signature, layers))
    }

    fn decorations(&self, _theme: &Theme, _out: &mut RenderList) {}

    fn touch(&mut self, _event: TouchEvent) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::chart::test_support::approx;
    use crate::datasource::HeatMapData;

    #[test]
    fn color_interpolates_and_clamps() {
        let low = Color::new(0.0, 0.0, 0.0, 1.0);
        let high = Color::new(1.0, 0.5, 0.0, 1.0);
        assert_eq!(heat_color(low, high, 50.0), Color::new(0.5, 0.25, 0.0, 1.0));
        assert_eq!(heat_color(low, high, 140.0), high);
        assert_eq!(heat_color(low, high, -3.0), low);
    }

    #[test]
    fn non_finite_values_use_absence_color() {
        let config = HeatMapConfig::default();
        assert_eq!(config.cell_color(Some(f64::NAN)), config.absent);
        assert_eq!(config.cell_color(Some(f64::INFINITY)), config.absent);
        assert_eq!(config.cell_color(None), config.absent);
        assert_eq!(config.cell_color(Some(100.0)), config.high);
    }

    #[test]
    fn custom_source_with_nan_draws_absent_cell() {
        struct Noisy;

        impl HeatMapDataSource for Noisy {
            fn number_of_rows(&self) -> usize {
                1
            }

            fn number_of_columns(&self, _row: usize) -> usize {
                2
            }

            fn value(&self, _row: usize, column: usize) -> f64 {
                if column == 0 { f64::NAN } else { 0.0 }
            }
        }

        let data = Rc::new(Noisy);
        let config = HeatMapConfig::default();
        let mut chart = HeatMapChart::with_config(config.clone()).unwrap();
        chart.set_datasource(Rc::downgrade(&data));
        chart.set_size(100.0, 40.0);
        chart.layout();
        let colors: Vec<Color> = chart.layers().iter().map(|layer| layer.color).collect();
        assert_eq!(colors, vec![config.absent, config.low]);
    }

    #[test]
    fn grid_uses_longest_row() {
        let cells = project_cells(&[vec![1.0, 2.0, 3.0], vec![4.0]], 92.0, 41.0, 1.0);
        assert_eq!(cells.len(), 6);
        assert!(approx(cells[0].width, 30.0));
        assert!(approx(cells[0].height, 20.0));
        assert!(approx(cells[2].x, 62.0));
        assert!(approx(cells[3].y, 21.0));
        assert_eq!(cells[4].value, None);
    }

    #[test]
    fn missing_cells_use_absence_color() {
        let data = Rc::new(HeatMapData::new(vec![vec![0.0, 100.0], vec![25.0]]).unwrap());
        let config = HeatMapConfig::default();
        let mut chart = HeatMapChart::with_config(config.clone()).unwrap();
        chart.set_datasource(Rc::downgrade(&data));
        chart.set_size(100.0, 100.0);
        chart.layout();
        let colors: Vec<Color> = chart.layers().iter().map(|layer| layer.color).collect();
        assert_eq!(colors[0], config.low);
        assert_eq!(colors[1], config.high);
        assert_eq!(colors[3], config.absent);
    }

    #[test]
    fn empty_heat_map_has_no_cells() {
        assert!(project_cells(&[], 10.0, 10.0, 0.0).is_empty());
        assert!(project_cells(&[vec![]], 10.0, 10.0, 0.0).is_empty());
        let mut chart = HeatMapChart::new();
        chart.set_size(10.0, 10.0);
        assert!(chart.layout().is_some());
        assert!(chart.layers().is_empty());
    }
}
