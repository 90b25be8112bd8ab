//! Datasource capabilities, one narrow trait per chart type.
//!
//! Charts hold datasources as weak references and query them synchronously
//! during layout. Required methods answer cardinality and value queries;
//! style and label queries are optional and default to black circles of a
//! fixed size with numeric labels.
//!
//! Querying an index outside the declared count is a programmer error. The
//! in-memory stores in this module panic on it, and charts never issue such
//! queries: every index they pass is below a count read in the same pass.

mod store;

pub use store::{BarData, HeatMapData, LegendData, LineData, PieData, ScatterData};

use thiserror::Error;

use crate::geom::Point;
use crate::render::{Color, MarkerShape};

/// Default scatter marker radius in pixels.
pub const DEFAULT_POINT_RADIUS: f32 = 4.0;
/// Default line stroke width in pixels.
pub const DEFAULT_LINE_WIDTH: f32 = 2.0;

/// Errors raised when building an in-memory datasource.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataError {
    /// A dataset has a different item count than the first one.
    #[error("dataset {dataset} has {found} items, expected {expected}")]
    RaggedDataset {
        /// Offending dataset.
        dataset: usize,
        /// Item count of the first dataset.
        expected: usize,
        /// Item count of the offending dataset.
        found: usize,
    },
    /// A value is NaN or infinite.
    #[error("value at ({dataset}, {item}) is not finite")]
    NonFiniteValue {
        /// Dataset (or row) index.
        dataset: usize,
        /// Item (or column) index.
        item: usize,
    },
    /// A pie slice has a negative value.
    #[error("slice {slice} has negative value {value}")]
    NegativeSlice {
        /// Slice index.
        slice: usize,
        /// Offending value.
        value: f64,
    },
    /// Per-element attributes do not match the element count.
    #[error("expected {expected} {what}, found {found}")]
    LengthMismatch {
        /// Attribute name.
        what: &'static str,
        /// Expected length.
        expected: usize,
        /// Provided length.
        found: usize,
    },
}

/// Values for a bar chart: datasets of equally long item series.
pub trait BarChartDataSource {
    /// Number of datasets (bar colors).
    fn number_of_datasets(&self) -> usize;

    /// Number of items per dataset.
    fn number_of_items(&self) -> usize;

    /// Bar value.
    fn value(&self, dataset: usize, item: usize) -> f64;

    /// Bar color.
    fn bar_color(&self, _dataset: usize, _item: usize) -> Color {
        Color::BLACK
    }

    /// Label under an item group.
    fn item_label(&self, _item: usize) -> Option<String> {
        None
    }

    /// Label of a value marker; `None` uses integer truncation.
    fn marker_label(&self, _marker: usize, _value: f64) -> Option<String> {
        None
    }
}

/// Values for a line chart. Every line has the same number of points.
pub trait LineChartDataSource {
    /// Number of lines.
    fn number_of_lines(&self) -> usize;

    /// Number of points on every line.
    fn number_of_points(&self) -> usize;

    /// Point value.
    fn value(&self, line: usize, point: usize) -> f64;

    /// Line color.
    fn line_color(&self, _line: usize) -> Color {
        Color::BLACK
    }

    /// Line stroke width.
    fn line_width(&self, _line: usize) -> f32 {
        DEFAULT_LINE_WIDTH
    }

    /// Label under a point column.
    fn point_label(&self, _point: usize) -> Option<String> {
        None
    }

    /// Label of a value marker; `None` uses two decimals.
    fn marker_label(&self, _marker: usize, _value: f64) -> Option<String> {
        None
    }
}

/// Points for a scatter chart.
pub trait ScatterChartDataSource {
    /// Number of datasets.
    fn number_of_datasets(&self) -> usize;

    /// Number of points in a dataset.
    fn number_of_points(&self, dataset: usize) -> usize;

    /// Point coordinates.
    fn point(&self, dataset: usize, item: usize) -> Point;

    /// Marker color.
    fn point_color(&self, _dataset: usize, _item: usize) -> Color {
        Color::BLACK
    }

    /// Marker shape.
    fn point_shape(&self, _dataset: usize, _item: usize) -> MarkerShape {
        MarkerShape::Circle
    }

    /// Marker radius in pixels.
    fn point_radius(&self, _dataset: usize, _item: usize) -> f32 {
        DEFAULT_POINT_RADIUS
    }

    /// Label of an X-axis marker; `None` uses two decimals.
    fn x_marker_label(&self, _marker: usize, _value: f64) -> Option<String> {
        None
    }

    /// Label of a Y-axis marker; `None` uses two decimals.
    fn y_marker_label(&self, _marker: usize, _value: f64) -> Option<String> {
        None
    }
}

/// Cells for a heat-map. Rows may be ragged.
pub trait HeatMapDataSource {
    /// Number of rows.
    fn number_of_rows(&self) -> usize;

    /// Number of cells in a row.
    fn number_of_columns(&self, row: usize) -> usize;

    /// Cell value on a 0-100 scale.
    fn value(&self, row: usize, column: usize) -> f64;
}

/// Slices for a pie chart.
pub trait PieChartDataSource {
    /// Number of slices.
    fn number_of_slices(&self) -> usize;

    /// Slice value; negative values are drawn as empty slices.
    fn value(&self, slice: usize) -> f64;

    /// Slice color.
    fn slice_color(&self, _slice: usize) -> Color {
        Color::BLACK
    }
}

/// Entries for a legend.
pub trait LegendDataSource {
    /// Number of legend rows.
    fn number_of_items(&self) -> usize;

    /// Row label.
    fn label(&self, item: usize) -> String;

    /// Swatch color.
    fn color(&self, _item: usize) -> Color {
        Color::BLACK
    }
}

/// Panic with a uniform message when `index` is outside `count`.
///
/// Used by the in-memory stores at their query boundary.
#[track_caller]
pub(crate) fn check_index(what: &str, index: usize, count: usize) {
    assert!(
        index < count,
        "{what} index {index} out of range (declared count {count})"
    );
}
