//! Delegate capabilities notified on touch, one narrow trait per chart type.
//!
//! Every method has an empty default so a delegate only implements the
//! callbacks it cares about. Charts hold delegates as weak references.

/// Touch callbacks of a bar chart; indices are item (bar group) indices.
pub trait BarChartDelegate {
    /// A press or drag resolved to a bar group.
    fn did_touch(&self, _item: usize) {}

    /// The touch ended on a bar group.
    fn did_release_touch(&self, _item: usize) {}
}

/// Touch callbacks of a line chart; indices are point indices.
pub trait LineChartDelegate {
    /// A press or drag resolved to a point column.
    fn did_touch(&self, _point: usize) {}

    /// The touch ended on a point column.
    fn did_release_touch(&self, _point: usize) {}
}

/// Touch callbacks of a scatter chart.
pub trait ScatterChartDelegate {
    /// A press or drag resolved to a point.
    fn did_touch(&self, _dataset: usize, _item: usize) {}

    /// The touch ended on a point.
    fn did_release_touch(&self, _dataset: usize, _item: usize) {}
}

/// Selection callbacks of a pie chart.
pub trait PieChartDelegate {
    /// A slice was selected.
    fn did_select(&self, _slice: usize) {}

    /// The selected slice was deselected.
    fn did_deselect(&self, _slice: usize) {}
}

/// Selection callbacks of a legend.
pub trait LegendDelegate {
    /// A legend row was tapped.
    fn did_select(&self, _item: usize) {}
}
