//! In-memory datasources backed by plain vectors.

use crate::datasource::{
    BarChartDataSource, DEFAULT_LINE_WIDTH, DEFAULT_POINT_RADIUS, DataError, HeatMapDataSource,
    LegendDataSource, LineChartDataSource, PieChartDataSource, ScatterChartDataSource,
    check_index,
};
use crate::geom::Point;
use crate::render::{Color, MarkerShape};

/// Bar chart values held in memory.
#[derive(Debug, Clone, Default)]
pub struct BarData {
    datasets: Vec<Vec<f64>>,
    items: usize,
    colors: Vec<Color>,
    item_labels: Vec<String>,
}

impl BarData {
    /// Create bar data; every dataset must have the same length and finite values.
    pub fn new(datasets: Vec<Vec<f64>>) -> Result<Self, DataError> {
        let items = check_rectangular(&datasets)?;
        Ok(Self {
            datasets,
            items,
            colors: Vec::new(),
            item_labels: Vec::new(),
        })
    }

    /// Set one color per dataset.
    pub fn with_colors(mut self, colors: Vec<Color>) -> Result<Self, DataError> {
        check_len("dataset colors", self.datasets.len(), colors.len())?;
        self.colors = colors;
        Ok(self)
    }

    /// Set one label per item.
    pub fn with_item_labels<S: Into<String>>(
        mut self,
        labels: impl IntoIterator<Item = S>,
    ) -> Result<Self, DataError> {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        check_len("item labels", self.items, labels.len())?;
        self.item_labels = labels;
        Ok(self)
    }
}

impl BarChartDataSource for BarData {
    fn number_of_datasets(&self) -> usize {
        self.datasets.len()
    }

    fn number_of_items(&self) -> usize {
        self.items
    }

    fn value(&self, dataset: usize, item: usize) -> f64 {
        check_index("dataset", dataset, self.datasets.len());
        check_index("item", item, self.items);
        self.datasets[dataset][item]
    }

    fn bar_color(&self, dataset: usize, _item: usize) -> Color {
        self.colors.get(dataset).copied().unwrap_or(Color::BLACK)
    }

    fn item_label(&self, item: usize) -> Option<String> {
        self.item_labels.get(item).cloned()
    }
}

/// Line chart values held in memory.
#[derive(Debug, Clone, Default)]
pub struct LineData {
    lines: Vec<Vec<f64>>,
    points: usize,
    colors: Vec<Color>,
    widths: Vec<f32>,
    point_labels: Vec<String>,
}

impl LineData {
    /// Create line data; every line must have the same length and finite values.
    pub fn new(lines: Vec<Vec<f64>>) -> Result<Self, DataError> {
        let points = check_rectangular(&lines)?;
        Ok(Self {
            lines,
            points,
            colors: Vec::new(),
            widths: Vec::new(),
            point_labels: Vec::new(),
        })
    }

    /// Set one color per line.
    pub fn with_colors(mut self, colors: Vec<Color>) -> Result<Self, DataError> {
        check_len("line colors", self.lines.len(), colors.len())?;
        self.colors = colors;
        Ok(self)
    }

    /// Set one stroke width per line.
    pub fn with_widths(mut self, widths: Vec<f32>) -> Result<Self, DataError> {
        check_len("line widths", self.lines.len(), widths.len())?;
        self.widths = widths;
        Ok(self)
    }

    /// Set one label per point column.
    pub fn with_point_labels<S: Into<String>>(
        mut self,
        labels: impl IntoIterator<Item = S>,
    ) -> Result<Self, DataError> {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        check_len("point labels", self.points, labels.len())?;
        self.point_labels = labels;
        Ok(self)
    }
}

impl LineChartDataSource for LineData {
    fn number_of_lines(&self) -> usize {
        self.lines.len()
    }

    fn number_of_points(&self) -> usize {
        self.points
    }

    fn value(&self, line: usize, point: usize) -> f64 {
        check_index("line", line, self.lines.len());
        check_index("point", point, self.points);
        self.lines[line][point]
    }

    fn line_color(&self, line: usize) -> Color {
        self.colors.get(line).copied().unwrap_or(Color::BLACK)
    }

    fn line_width(&self, line: usize) -> f32 {
        self.widths.get(line).copied().unwrap_or(DEFAULT_LINE_WIDTH)
    }

    fn point_label(&self, point: usize) -> Option<String> {
        self.point_labels.get(point).cloned()
    }
}

/// Scatter points held in memory, styled per dataset.
#[derive(Debug, Clone, Default)]
pub struct ScatterData {
    datasets: Vec<Vec<Point>>,
    colors: Vec<Color>,
    shapes: Vec<MarkerShape>,
    radii: Vec<f32>,
}

impl ScatterData {
    /// Create scatter data; coordinates must be finite.
    pub fn new(datasets: Vec<Vec<Point>>) -> Result<Self, DataError> {
        for (dataset, points) in datasets.iter().enumerate() {
            for (item, point) in points.iter().enumerate() {
                if !point.x.is_finite() || !point.y.is_finite() {
                    return Err(DataError::NonFiniteValue { dataset, item });
                }
            }
        }
        Ok(Self {
            datasets,
            colors: Vec::new(),
            shapes: Vec::new(),
            radii: Vec::new(),
        })
    }

    /// Set one color per dataset.
    pub fn with_colors(mut self, colors: Vec<Color>) -> Result<Self, DataError> {
        check_len("dataset colors", self.datasets.len(), colors.len())?;
        self.colors = colors;
        Ok(self)
    }

    /// Set one marker shape per dataset.
    pub fn with_shapes(mut self, shapes: Vec<MarkerShape>) -> Result<Self, DataError> {
        check_len("dataset shapes", self.datasets.len(), shapes.len())?;
        self.shapes = shapes;
        Ok(self)
    }

    /// Set one marker radius per dataset.
    pub fn with_radii(mut self, radii: Vec<f32>) -> Result<Self, DataError> {
        check_len("dataset radii", self.datasets.len(), radii.len())?;
        self.radii = radii;
        Ok(self)
    }
}

impl ScatterChartDataSource for ScatterData {
    fn number_of_datasets(&self) -> usize {
        self.datasets.len()
    }

    fn number_of_points(&self, dataset: usize) -> usize {
        check_index("dataset", dataset, self.datasets.len());
        self.datasets[dataset].len()
    }

    fn point(&self, dataset: usize, item: usize) -> Point {
        check_index("dataset", dataset, self.datasets.len());
        check_index("point", item, self.datasets[dataset].len());
        self.datasets[dataset][item]
    }

    fn point_color(&self, dataset: usize, _item: usize) -> Color {
        self.colors.get(dataset).copied().unwrap_or(Color::BLACK)
    }

    fn point_shape(&self, dataset: usize, _item: usize) -> MarkerShape {
        self.shapes.get(dataset).copied().unwrap_or_default()
    }

    fn point_radius(&self, dataset: usize, _item: usize) -> f32 {
        self.radii.get(dataset).copied().unwrap_or(DEFAULT_POINT_RADIUS)
    }
}

/// Heat-map cells held in memory; rows may differ in length.
#[derive(Debug, Clone, Default)]
pub struct HeatMapData {
    rows: Vec<Vec<f64>>,
}

impl HeatMapData {
    /// Create heat-map data; values must be finite.
    pub fn new(rows: Vec<Vec<f64>>) -> Result<Self, DataError> {
        check_finite(&rows)?;
        Ok(Self { rows })
    }
}

impl HeatMapDataSource for HeatMapData {
    fn number_of_rows(&self) -> usize {
        self.rows.len()
    }

    fn number_of_columns(&self, row: usize) -> usize {
        check_index("row", row, self.rows.len());
        self.rows[row].len()
    }

    fn value(&self, row: usize, column: usize) -> f64 {
        check_index("row", row, self.rows.len());
        check_index("column", column, self.rows[row].len());
        self.rows[row][column]
    }
}

/// Pie slices held in memory.
#[derive(Debug, Clone, Default)]
pub struct PieData {
    values: Vec<f64>,
    colors: Vec<Color>,
}

impl PieData {
    /// Create pie data; values must be finite and non-negative.
    pub fn new(values: Vec<f64>) -> Result<Self, DataError> {
        for (slice, &value) in values.iter().enumerate() {
            if !value.is_finite() {
                return Err(DataError::NonFiniteValue {
                    dataset: 0,
                    item: slice,
                });
            }
            if value < 0.0 {
                return Err(DataError::NegativeSlice { slice, value });
            }
        }
        Ok(Self {
            values,
            colors: Vec::new(),
        })
    }

    /// Set one color per slice.
    pub fn with_colors(mut self, colors: Vec<Color>) -> Result<Self, DataError> {
        check_len("slice colors", self.values.len(), colors.len())?;
        self.colors = colors;
        Ok(self)
    }
}

impl PieChartDataSource for PieData {
    fn number_of_slices(&self) -> usize {
        self.values.len()
    }

    fn value(&self, slice: usize) -> f64 {
        check_index("slice", slice, self.values.len());
        self.values[slice]
    }

    fn slice_color(&self, slice: usize) -> Color {
        self.colors.get(slice).copied().unwrap_or(Color::BLACK)
    }
}

/// Legend rows held in memory.
#[derive(Debug, Clone, Default)]
pub struct LegendData {
    items: Vec<(String, Color)>,
}

impl LegendData {
    /// Create a legend from label and color pairs.
    pub fn new<S: Into<String>>(items: impl IntoIterator<Item = (S, Color)>) -> Self {
        Self {
            items: items
                .into_iter()
                .map(|(label, color)| (label.into(), color))
                .collect(),
        }
    }
}

impl LegendDataSource for LegendData {
    fn number_of_items(&self) -> usize {
        self.items.len()
    }

    fn label(&self, item: usize) -> String {
        check_index("legend item", item, self.items.len());
        self.items[item].0.clone()
    }

    fn color(&self, item: usize) -> Color {
        check_index("legend item", item, self.items.len());
        self.items[item].1
    }
}

fn check_rectangular(datasets: &[Vec<f64>]) -> Result<usize, DataError> {
    let expected = datasets.first().map(Vec::len).unwrap_or(0);
    for (dataset, values) in datasets.iter().enumerate() {
        if values.len() != expected {
            return Err(DataError::RaggedDataset {
                dataset,
                expected,
                found: values.len(),
            });
        }
    }
    check_finite(datasets)?;
    Ok(expected)
}

fn check_finite(datasets: &[Vec<f64>]) -> Result<(), DataError> {
    for (dataset, values) in datasets.iter().enumerate() {
        if let Some(item) = values.iter().position(|value| !value.is_finite()) {
            return Err(DataError::NonFiniteValue { dataset, item });
        }
    }
    Ok(())
}

fn check_len(what: &'static str, expected: usize, found: usize) -> Result<(), DataError> {
    if expected != found {
        return Err(DataError::LengthMismatch {
            what,
            expected,
            found,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ragged_bar_data_is_rejected() {
        let err = BarData::new(vec![vec![1.0, 2.0], vec![1.0]]).unwrap_err();
        assert_eq!(
            err,
            DataError::RaggedDataset {
                dataset: 1,
                expected: 2,
                found: 1
            }
        );
        assert_eq!(err.to_string(), "dataset 1 has 1 items, expected 2");
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let err = LineData::new(vec![vec![1.0, f64::NAN]]).unwrap_err();
        assert_eq!(err, DataError::NonFiniteValue { dataset: 0, item: 1 });
    }

    #[test]
    fn negative_pie_slices_are_rejected() {
        assert!(matches!(
            PieData::new(vec![1.0, -2.0]),
            Err(DataError::NegativeSlice { slice: 1, .. })
        ));
    }

    #[test]
    fn colors_must_match_datasets() {
        let data = BarData::new(vec![vec![1.0], vec![2.0]]).unwrap();
        assert!(matches!(
            data.with_colors(vec![Color::WHITE]),
            Err(DataError::LengthMismatch { expected: 2, found: 1, .. })
        ));
    }

    #[test]
    fn optional_queries_fall_back_to_defaults() {
        let data = ScatterData::new(vec![vec![Point::new(1.0, 2.0)]]).unwrap();
        assert_eq!(data.point_color(0, 0), Color::BLACK);
        assert_eq!(data.point_shape(0, 0), MarkerShape::Circle);
        assert_eq!(data.point_radius(0, 0), DEFAULT_POINT_RADIUS);
        assert_eq!(data.x_marker_label(0, 1.0), None);
    }

    #[test]
    #[should_panic(expected = "item index 3 out of range")]
    fn out_of_range_query_panics() {
        let data = BarData::new(vec![vec![1.0, 2.0, 3.0]]).unwrap();
        data.value(0, 3);
    }

    #[test]
    fn heat_map_rows_may_be_ragged() {
        let data = HeatMapData::new(vec![vec![1.0, 2.0, 3.0], vec![4.0]]).unwrap();
        assert_eq!(data.number_of_columns(0), 3);
        assert_eq!(data.number_of_columns(1), 1);
    }
}
