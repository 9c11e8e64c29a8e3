//! gpui_timechart is an interactive time-series chart engine.
//! A main line chart shows a window of the data; a mini-map below it shows
//! the whole series with a draggable frame selecting that window. Rescaling
//! is animated, series can be toggled, and a click on the plot shows the
//! values of the nearest sample.
//!
//! The engine is backend-agnostic: it consumes [`InputEvent`]s and produces
//! [`RenderList`]s. The optional `gpui` feature provides a GPUI view.

#![forbid(unsafe_code)]

pub mod animation;
pub mod axis;
pub mod calendar;
pub mod chart;
pub mod config;
pub mod datasource;
pub mod error;
pub mod event;
pub mod geom;
pub mod interaction;
pub mod layout;
pub mod render;
pub mod series;
pub mod style;
pub mod transform;
pub mod view;

#[cfg(feature = "gpui")]
pub mod gpui_backend;

pub use animation::{FrameTicket, RangeAnimator, RangePair};
pub use axis::{DateTick, Granularity, TickPlanner, ValueTick};
pub use chart::{Chart, ChartDataset, CursorHint, DetailRequest, Response};
pub use config::{AnimationSettings, ChartConfig, ChartSettings, ChartStyle, TimeUnit};
pub use datasource::{ChartData, DataSource, FileDataSource};
pub use error::{ChartError, DataSourceError};
pub use event::{InputEvent, PointerEvent, PointerKind, TouchEvent, TouchPhase};
pub use geom::{ScreenPoint, ScreenRect};
#[cfg(feature = "gpui")]
pub use gpui_backend::{ChartHandle, ChartViewConfig, GpuiChartView, SharedDataSource};
pub use interaction::{DragController, DragState, HitRegion, HitTester, MiniMapFrame};
pub use layout::{ButtonLayout, ChartGeometry, InfoBoxLayout};
pub use render::{
    ApproxTextMeasurer, Color, LineStyle, RectStyle, RenderCommand, RenderList, Shadow,
    TextMeasurer, TextStyle,
};
pub use series::{Column, SeriesStore, VisibilityChange};
pub use style::{Theme, ThemeMode};
pub use transform::{AxisScaler, ScaledFrame, ScaledPoint, ScaledSeries};
pub use view::{ViewMode, Viewport};
