//! gpui_charts provides bar, line, scatter, pie and heat-map charts on top of
//! a shared layout core: axis limits, point projection, layer layout and
//! touch hit-testing. The core is backend-agnostic and emits a [`RenderList`];
//! the optional `gpui` feature paints it in a GPUI view with animated
//! transitions.

#![forbid(unsafe_code)]

pub mod animation;
pub mod axis;
pub mod canvas;
pub mod chart;
pub mod datasource;
pub mod delegate;
pub mod geom;
pub mod interaction;
pub mod layer;
pub mod limits;
pub mod render;
pub mod style;
pub mod transform;

#[cfg(feature = "gpui")]
pub mod gpui_backend;

pub use animation::{AnimationConfig, Easing, Transition};
pub use axis::{AxisMarker, LabelFormat, MarkerConfig};
pub use canvas::{Canvas, Insets};
pub use chart::bar::{BarChart, BarChartConfig, BarGroup, BarPoint};
pub use chart::heatmap::{HeatCell, HeatMapChart, HeatMapConfig};
pub use chart::legend::{Legend, LegendConfig};
pub use chart::line::{LineChart, LineChartConfig, LinePoint};
pub use chart::pie::{PieChart, PieChartConfig, PieSlice};
pub use chart::scatter::{ScatterChart, ScatterChartConfig, ScatterPoint};
pub use chart::{Chart, ConfigError, LayoutPass, LayoutState, render_frame};
pub use datasource::{
    BarChartDataSource, BarData, DataError, HeatMapData, HeatMapDataSource, LegendData,
    LegendDataSource, LineChartDataSource, LineData, PieChartDataSource, PieData,
    ScatterChartDataSource, ScatterData,
};
pub use delegate::{
    BarChartDelegate, LegendDelegate, LineChartDelegate, PieChartDelegate, ScatterChartDelegate,
};
pub use geom::{Point, ScreenPoint, ScreenRect};
pub use interaction::{TouchEvent, TouchPhase};
pub use layer::{Layer, LayerKey, LayerSet, LayerSync, Shape};
pub use limits::{AxisLimits, ScatterLimits};
pub use render::{
    Color, CubicSegment, LineSegment, LineStyle, MarkerShape, MarkerStyle, RectStyle,
    RenderCommand, RenderList, TextAnchor, TextStyle,
};
pub use style::Theme;
pub use transform::Scale;

#[cfg(feature = "gpui")]
pub use gpui_backend::{ChartHandle, ChartView, ChartViewConfig};
