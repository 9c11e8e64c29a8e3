//! GPUI integration for gpui_timechart.
//!
//! This module provides a GPUI view that renders a [`Chart`](crate::chart::Chart),
//! forwards mouse input to it, and runs the animation frames and detail
//! fetches the chart asks for.

mod config;
mod paint;
mod text;
mod view;

pub use config::ChartViewConfig;
pub use view::{ChartHandle, GpuiChartView, SharedDataSource};
