//! GPUI integration for gpui_charts.
//!
//! This module provides a GPUI view that lays out any
//! [`Chart`](crate::chart::Chart), animates its layout changes and maps
//! mouse input onto chart touches.

mod config;
mod paint;
mod state;
mod view;

pub use config::ChartViewConfig;
pub use view::{ChartHandle, ChartView};
