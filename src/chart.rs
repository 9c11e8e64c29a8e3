//! The chart orchestrator.
//!
//! [`Chart`] owns the overview data set (and, while zoomed, a detail data
//! set), dispatches input events through hit testing and the drag state
//! machine, drives the value-range animation, and describes each frame as a
//! [`RenderList`]. It never blocks, sleeps, or fetches: every mutating call
//! returns a [`Response`] telling the host what to do next.

use std::fmt;
use std::time::Duration;

use crate::animation::{FrameTicket, RangeAnimator, RangePair};
use crate::axis::TickPlanner;
use crate::calendar;
use crate::config::{AnimationSettings, ChartConfig, ChartSettings};
use crate::datasource::ChartData;
use crate::error::{ChartError, DataSourceError};
use crate::event::{InputEvent, PointerEvent, PointerKind, TouchEvent, TouchPhase};
use crate::geom::{ScreenPoint, ScreenRect};
use crate::interaction::{DragController, DragState, HitRegion, HitTester, MiniMapFrame};
use crate::layout::{self, ChartGeometry, InfoBoxLayout};
use crate::render::{
    ApproxTextMeasurer, Color, LineStyle, RectStyle, RenderCommand, RenderList, Shadow,
    TextMeasurer, TextStyle,
};
use crate::series::{Column, SeriesStore, VisibilityChange};
use crate::style::{Theme, ThemeMode};
use crate::transform::AxisScaler;
use crate::view::{ViewMode, Viewport};

/// A series store together with the index range displayed from it.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartDataset {
    store: SeriesStore,
    viewport: Viewport,
}

impl ChartDataset {
    /// Wrap a store with a viewport spanning all of it.
    pub fn new(store: SeriesStore, min_display_positions: usize) -> Self {
        let viewport = Viewport::new(store.last_index(), min_display_positions);
        Self { store, viewport }
    }

    /// Column data.
    pub fn store(&self) -> &SeriesStore {
        &self.store
    }

    /// Displayed index range.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Greatest visible value inside the viewport (both ends included).
    pub fn chart_max(&self) -> f64 {
        self.store
            .max_visible_in(self.viewport.start(), self.viewport.end())
    }

    /// Greatest visible value of the whole series.
    pub fn minimap_max(&self) -> f64 {
        self.store.max_visible_in(0, self.store.last_index())
    }

    fn maxima(&self) -> RangePair {
        RangePair::new(self.chart_max(), self.minimap_max())
    }
}

/// Mouse cursor the host should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorHint {
    /// Regular arrow.
    #[default]
    Default,
    /// Horizontal resize, over a drag handle.
    ColResize,
    /// Move, over the mini-map frame.
    Move,
    /// Pointer, over something clickable.
    Pointer,
}

/// A detail data fetch the host should perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailRequest {
    /// Request id, echoed back on completion.
    pub id: u64,
    /// Clicked timestamp in milliseconds.
    pub timestamp: i64,
    /// Time after which the host should give up and call
    /// [`Chart::expire_detail`].
    pub timeout: Duration,
}

/// Effects of a chart call the host must carry out.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Response {
    /// The chart should be repainted.
    pub redraw: bool,
    /// Animation steps to fire after their delays via
    /// [`Chart::on_animation_frame`].
    pub animation: Vec<FrameTicket>,
    /// Detail data to fetch, then hand to [`Chart::complete_detail`].
    pub detail_request: Option<DetailRequest>,
    /// Cursor to show.
    pub cursor: CursorHint,
}

impl Response {
    fn idle(cursor: CursorHint) -> Self {
        Self {
            cursor,
            ..Self::default()
        }
    }

    fn redraw(cursor: CursorHint) -> Self {
        Self {
            redraw: true,
            cursor,
            ..Self::default()
        }
    }

    /// Check whether animation frames must be scheduled.
    pub fn is_animating(&self) -> bool {
        !self.animation.is_empty()
    }
}

struct InfoEntry {
    value: String,
    name: String,
    color: Color,
    offset: f32,
}

struct InfoContent {
    header: String,
    entries: Vec<InfoEntry>,
    width: f32,
}

/// Interactive time-series chart with a mini-map.
pub struct Chart {
    settings: ChartSettings,
    theme_mode: ThemeMode,
    theme: Theme,
    overview: ChartDataset,
    detail: Option<ChartDataset>,
    mode: ViewMode,
    width: f32,
    height: f32,
    drag: DragController,
    animator: RangeAnimator,
    info_x: Option<f32>,
    geometry: ChartGeometry,
    measurer: Box<dyn TextMeasurer>,
    next_request_id: u64,
    pending_detail: Option<DetailRequest>,
}

impl fmt::Debug for Chart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chart")
            .field("mode", &self.mode)
            .field("theme_mode", &self.theme_mode)
            .field("viewport", &self.viewport())
            .field("size", &(self.width, self.height))
            .field("drag", &self.drag)
            .field("displayed_max", &self.animator.displayed())
            .finish_non_exhaustive()
    }
}

impl Chart {
    /// Build a chart from raw column data and host options.
    pub fn new(data: ChartData, config: &ChartConfig) -> Result<Self, ChartError> {
        let settings = config.resolve()?;
        let store = data.into_store(settings.time_unit)?;
        Ok(Self::from_store(store, settings))
    }

    /// Build a chart from an already validated store.
    pub fn from_store(store: SeriesStore, settings: ChartSettings) -> Self {
        let overview = ChartDataset::new(store, settings.min_display_positions);
        let theme_mode = settings.theme_mode;
        let mut chart = Self {
            theme_mode,
            theme: Theme::for_mode(theme_mode),
            animator: RangeAnimator::new(overview.maxima()),
            overview,
            detail: None,
            mode: ViewMode::Overview,
            width: settings.width,
            height: settings.height,
            drag: DragController::new(),
            info_x: None,
            geometry: ChartGeometry::default(),
            measurer: Box::new(ApproxTextMeasurer::default()),
            next_request_id: 0,
            pending_detail: None,
            settings,
        };
        chart.refresh_geometry();
        tracing::debug!(
            samples = chart.overview.store.len(),
            columns = chart.overview.store.columns().len(),
            "chart created"
        );
        chart
    }

    /// Replace the text measurer used for layout.
    pub fn set_text_measurer(&mut self, measurer: Box<dyn TextMeasurer>) {
        self.measurer = measurer;
        self.refresh_geometry();
    }

    /// Validated settings.
    pub fn settings(&self) -> &ChartSettings {
        &self.settings
    }

    /// Active color theme.
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Active theme mode.
    pub fn theme_mode(&self) -> ThemeMode {
        self.theme_mode
    }

    /// Which data set is displayed.
    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    /// The displayed data set.
    pub fn dataset(&self) -> &ChartDataset {
        match &self.detail {
            Some(detail) if self.mode.is_detail() => detail,
            _ => &self.overview,
        }
    }

    /// The overview data set.
    pub fn overview(&self) -> &ChartDataset {
        &self.overview
    }

    /// The detail data set, while zoomed in.
    pub fn detail(&self) -> Option<&ChartDataset> {
        self.detail.as_ref()
    }

    /// Viewport of the displayed data set.
    pub fn viewport(&self) -> Viewport {
        self.dataset().viewport
    }

    /// Geometry of the last layout pass.
    pub fn geometry(&self) -> &ChartGeometry {
        &self.geometry
    }

    /// Current drag state.
    pub fn drag_state(&self) -> DragState {
        self.drag.state()
    }

    /// Ids of the visible series of the displayed data set.
    pub fn visible_series(&self) -> Vec<&str> {
        self.dataset().store.visible_ids()
    }

    /// Value maxima currently drawn (mid-animation values included).
    pub fn displayed_max(&self) -> RangePair {
        self.animator.displayed()
    }

    /// Detail request awaiting completion.
    pub fn pending_detail(&self) -> Option<DetailRequest> {
        self.pending_detail
    }

    /// Canvas size.
    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    /// Scaler of the main chart at the displayed maximum.
    pub fn chart_scaler(&self) -> AxisScaler {
        let viewport = self.viewport();
        AxisScaler::chart(
            self.width,
            self.height,
            &self.settings.style,
            self.top(),
            viewport.start(),
            viewport.end(),
            self.animator.displayed().chart,
        )
    }

    /// Scaler of the mini-map at the displayed maximum.
    pub fn minimap_scaler(&self) -> AxisScaler {
        AxisScaler::minimap(
            self.width,
            self.height,
            &self.settings.style,
            self.dataset().store.last_index(),
            self.animator.displayed().minimap,
        )
    }

    /// Classify a canvas point against the current geometry.
    pub fn hit_test(&self, position: ScreenPoint) -> HitRegion {
        HitTester::new(&self.geometry, self.settings.style.drag_tolerance).hit_test(position)
    }

    /// Switch between the day and night themes.
    pub fn toggle_night_mode(&mut self) -> Response {
        self.theme_mode = self.theme_mode.toggled();
        self.theme = Theme::for_mode(self.theme_mode);
        tracing::debug!(mode = ?self.theme_mode, "theme switched");
        Response::redraw(CursorHint::Default)
    }

    /// Alias of [`Chart::toggle_night_mode`].
    pub fn switch_mode(&mut self) -> Response {
        self.toggle_night_mode()
    }

    /// Hide a series. Hiding the last visible series is ignored.
    pub fn hide_column(&mut self, id: &str) -> Response {
        self.set_column_visible(id, false)
    }

    /// Show a hidden series.
    pub fn show_column(&mut self, id: &str) -> Response {
        self.set_column_visible(id, true)
    }

    /// Flip the visibility of a series.
    pub fn toggle_column(&mut self, id: &str) -> Response {
        match self.dataset().store.column(id).map(Column::is_visible) {
            Some(visible) => self.set_column_visible(id, !visible),
            None => {
                tracing::warn!(column = id, "toggle requested for unknown column");
                Response::default()
            }
        }
    }

    /// Change the canvas size.
    pub fn resize(&mut self, width: f32, height: f32) -> Response {
        let width = width.max(0.0);
        let height = height.max(0.0);
        if (width, height) == (self.width, self.height) {
            return Response::default();
        }
        self.width = width;
        self.height = height;
        self.refresh_geometry();
        tracing::trace!(width, height, "chart resized");
        Response::redraw(CursorHint::Default)
    }

    /// Dispatch one input event.
    pub fn handle_event(&mut self, event: impl Into<InputEvent>) -> Response {
        match event.into() {
            InputEvent::Pointer(pointer) => self.handle_pointer(pointer),
            InputEvent::Touch(touch) => self.handle_touch(touch),
        }
    }

    /// Apply a due animation step.
    pub fn on_animation_frame(&mut self, ticket: FrameTicket) -> Response {
        Response {
            redraw: self.animator.on_frame(ticket),
            ..Response::default()
        }
    }

    /// Hand back the outcome of a detail fetch.
    ///
    /// Responses for requests that are no longer pending are dropped. On
    /// success the detail data set becomes the displayed one.
    pub fn complete_detail(
        &mut self,
        request: &DetailRequest,
        result: Result<ChartData, DataSourceError>,
    ) -> Response {
        if self.pending_detail.map(|pending| pending.id) != Some(request.id) {
            tracing::warn!(id = request.id, "dropping detail response for a stale request");
            return Response::default();
        }
        self.pending_detail = None;
        let data = match result {
            Ok(data) => data,
            Err(error) => {
                tracing::warn!(id = request.id, %error, "detail fetch failed");
                return Response::default();
            }
        };
        let mut store = match data.into_store(self.settings.time_unit) {
            Ok(store) => store,
            Err(error) => {
                tracing::warn!(id = request.id, %error, "detail data rejected");
                return Response::default();
            }
        };
        store.inherit_visibility(&self.overview.store);
        tracing::debug!(
            id = request.id,
            timestamp = request.timestamp,
            samples = store.len(),
            "detail data set active"
        );
        self.detail = Some(ChartDataset::new(store, self.settings.min_display_positions));
        self.mode = ViewMode::Detail {
            timestamp: request.timestamp,
        };
        self.info_x = None;
        self.drag.end();
        self.rescale(self.settings.button_animation)
    }

    /// Give up on a detail fetch that ran past its deadline.
    pub fn expire_detail(&mut self, request: &DetailRequest) -> Response {
        if self.pending_detail.map(|pending| pending.id) == Some(request.id) {
            self.pending_detail = None;
            tracing::warn!(id = request.id, timeout = ?request.timeout, "detail fetch timed out");
        }
        Response::default()
    }

    /// Return from the detail data set to the overview.
    pub fn zoom_out(&mut self) -> Response {
        if !self.mode.is_detail() {
            return Response::default();
        }
        self.mode = ViewMode::Overview;
        self.detail = None;
        self.info_x = None;
        self.drag.end();
        tracing::debug!("returned to overview");
        self.rescale(self.settings.button_animation)
    }

    /// Lay out the frame and describe it as render commands.
    pub fn render(&mut self) -> RenderList {
        self.refresh_geometry();
        let mut list = RenderList::new();
        list.push(RenderCommand::Clear(self.theme.background));
        self.render_minimap(&mut list);
        self.render_axes(&mut list);
        self.render_series(&mut list);
        self.render_title(&mut list);
        self.render_info(&mut list);
        self.render_buttons(&mut list);
        tracing::trace!(commands = list.len(), "render list built");
        list
    }

    fn handle_pointer(&mut self, event: PointerEvent) -> Response {
        match event.kind {
            PointerKind::Down => self.press(event.position),
            PointerKind::Move => {
                if self.drag.is_touch() {
                    return Response::default();
                }
                self.pointer_moved(event.position)
            }
            PointerKind::Up => {
                self.drag.end();
                Response::idle(cursor_for(self.hit_test(event.position)))
            }
            PointerKind::Leave => {
                self.drag.end();
                self.drag.set_touch(false);
                Response::idle(CursorHint::Default)
            }
        }
    }

    fn handle_touch(&mut self, event: TouchEvent) -> Response {
        match event.phase {
            TouchPhase::Start | TouchPhase::Move => {
                self.drag.set_touch(true);
                if event.is_multi_touch() {
                    self.drag.end();
                    return Response::default();
                }
                let Some(position) = event.primary() else {
                    return Response::default();
                };
                if event.phase == TouchPhase::Start {
                    self.press(position)
                } else {
                    self.drag_moved(position.x)
                }
            }
            TouchPhase::End | TouchPhase::Cancel => {
                self.drag.end();
                self.drag.set_touch(false);
                Response::default()
            }
        }
    }

    fn press(&mut self, position: ScreenPoint) -> Response {
        let region = self.hit_test(position);
        let cursor = cursor_for(region);
        match region {
            HitRegion::LeftHandle | HitRegion::RightHandle | HitRegion::FrameBody => {
                self.drag.begin(region, position.x);
                let redraw = self.info_x.take().is_some();
                if redraw {
                    self.refresh_geometry();
                }
                Response {
                    redraw,
                    cursor,
                    ..Response::default()
                }
            }
            HitRegion::InfoBox => {
                let mut response = self.info_box_clicked();
                response.cursor = cursor;
                response
            }
            HitRegion::Button(slot) => {
                let Some(id) = self.geometry.buttons.get(slot).map(|button| button.id.clone())
                else {
                    return Response::idle(cursor);
                };
                let mut response = self.toggle_column(&id);
                response.cursor = cursor;
                response
            }
            HitRegion::Plot => {
                self.info_x = Some(position.x);
                self.refresh_geometry();
                Response::redraw(cursor)
            }
            HitRegion::Outside => Response::idle(cursor),
        }
    }

    fn info_box_clicked(&mut self) -> Response {
        if self.mode.is_detail() {
            return self.zoom_out();
        }
        if !self.settings.enable_zoom {
            return Response::default();
        }
        let Some(timestamp) = self
            .geometry
            .info_box
            .as_ref()
            .and_then(|info| self.overview.store.timestamp(info.index))
        else {
            return Response::default();
        };
        let request = DetailRequest {
            id: self.next_request_id,
            timestamp,
            timeout: self.settings.detail_timeout,
        };
        self.next_request_id = self.next_request_id.wrapping_add(1);
        self.pending_detail = Some(request);
        tracing::debug!(id = request.id, timestamp, "detail data requested");
        Response {
            detail_request: Some(request),
            ..Response::default()
        }
    }

    fn pointer_moved(&mut self, position: ScreenPoint) -> Response {
        let cursor = match self.drag.state() {
            DragState::Idle => cursor_for(self.hit_test(position)),
            DragState::DraggingLeftEdge | DragState::DraggingRightEdge => CursorHint::ColResize,
            DragState::DraggingFrame { .. } => CursorHint::Move,
        };
        let mut response = self.drag_moved(position.x);
        response.cursor = cursor;
        response
    }

    fn drag_moved(&mut self, x: f32) -> Response {
        if !self.drag.is_dragging() {
            return Response::default();
        }
        let dataset = match self.detail.as_mut() {
            Some(detail) if self.mode.is_detail() => detail,
            _ => &mut self.overview,
        };
        let changed = self
            .drag
            .drag_to(x, &self.geometry.minimap_xs, &mut dataset.viewport);
        if !changed {
            return Response::default();
        }
        tracing::trace!(
            start = dataset.viewport.start(),
            end = dataset.viewport.end(),
            "viewport dragged"
        );
        self.rescale(self.settings.scroll_animation)
    }

    fn set_column_visible(&mut self, id: &str, visible: bool) -> Response {
        let change = match self.detail.as_mut() {
            Some(detail) if self.mode.is_detail() => detail.store.set_visible(id, visible),
            _ => self.overview.store.set_visible(id, visible),
        };
        match change {
            VisibilityChange::Changed => {
                if self.mode.is_detail() {
                    self.overview.store.set_visible(id, visible);
                }
                tracing::debug!(column = id, visible, "column visibility changed");
                self.rescale(self.settings.button_animation)
            }
            VisibilityChange::Unchanged => Response::default(),
            VisibilityChange::LastVisible => {
                tracing::debug!(column = id, "refusing to hide the last visible column");
                Response::default()
            }
            VisibilityChange::UnknownColumn => {
                tracing::warn!(column = id, "visibility change for unknown column");
                Response::default()
            }
        }
    }

    fn rescale(&mut self, settings: AnimationSettings) -> Response {
        let target = self.dataset().maxima();
        let animation = self.animator.animate_to(target, settings);
        self.refresh_geometry();
        Response {
            redraw: true,
            animation,
            ..Response::default()
        }
    }

    fn top(&self) -> f32 {
        let style = &self.settings.style;
        match self.settings.title {
            Some(_) => style.top_padding + style.title_height,
            None => style.top_padding,
        }
    }

    fn refresh_geometry(&mut self) {
        let style = &self.settings.style;
        let dataset = self.dataset();
        let viewport = dataset.viewport;
        let mut geometry = ChartGeometry::new(self.width, self.height, self.top(), style);
        geometry.minimap_xs = self.minimap_scaler().xs();
        let left = geometry.minimap_xs.get(viewport.start()).copied().unwrap_or_default();
        let right = geometry.minimap_xs.get(viewport.end()).copied().unwrap_or_default();
        geometry.frame = MiniMapFrame::new(
            left,
            right,
            geometry.minimap,
            style.handle_width,
            style.frame_border_width,
        );
        geometry.buttons = layout::layout_buttons(
            dataset.store.columns(),
            self.height,
            style,
            self.measurer.as_ref(),
        );
        geometry.info_box = self.info_x.and_then(|x| self.info_layout(x));
        self.geometry = geometry;
    }

    fn info_layout(&self, x: f32) -> Option<InfoBoxLayout> {
        let scaler = self.chart_scaler();
        let xs = scaler.xs();
        let position = layout::position_at(&xs, x, self.width)?;
        let marker_x = xs[position];
        let index = scaler.start() + position;
        let content = self.info_content(index)?;
        let rect = layout::info_box_rect(marker_x, content.width, self.width, &self.settings.style);
        Some(InfoBoxLayout {
            index,
            marker_x,
            rect,
        })
    }

    fn info_content(&self, index: usize) -> Option<InfoContent> {
        let style = &self.settings.style;
        let store = &self.dataset().store;
        let header = calendar::weekday_label(store.timestamp(index)?);
        let (header_width, _) = self.measurer.measure(&header, style.info_header_font_size);
        let mut offset = 0.0;
        let mut entries = Vec::new();
        for column in store.visible_columns() {
            let Some(&value) = column.values().get(index) else {
                continue;
            };
            let value = format_sample(value);
            let (value_width, _) = self.measurer.measure(&value, style.info_value_font_size);
            let (name_width, _) = self.measurer.measure(column.name(), style.info_name_font_size);
            entries.push(InfoEntry {
                value,
                name: column.name().to_string(),
                color: column.color(),
                offset,
            });
            offset += value_width.max(name_width) + style.button_spacing;
        }
        let values_width = (offset - style.button_spacing).max(0.0);
        Some(InfoContent {
            header,
            entries,
            width: style.info_left_padding
                + header_width.max(values_width)
                + style.info_right_padding,
        })
    }

    fn render_minimap(&self, list: &mut RenderList) {
        let style = &self.settings.style;
        let scaled = self.minimap_scaler().scale(&self.dataset().store);
        for series in &scaled.series {
            list.push(RenderCommand::Polyline {
                points: scaled.points(series),
                style: LineStyle::new(series.color, style.minimap_line_width),
            });
        }

        let band = self.geometry.minimap;
        let frame = &self.geometry.frame;
        let viewport = self.viewport();
        if viewport.start() > 0 {
            list.push(RenderCommand::FillRect {
                rect: ScreenRect::new(
                    band.min,
                    ScreenPoint::new(frame.left_handle.min.x, band.max.y),
                ),
                color: self.theme.fade,
            });
        }
        if viewport.end() < viewport.last_index() {
            list.push(RenderCommand::FillRect {
                rect: ScreenRect::new(
                    ScreenPoint::new(frame.right_handle.max.x, band.min.y),
                    band.max,
                ),
                color: self.theme.fade,
            });
        }
        for handle in [frame.left_handle, frame.right_handle] {
            list.push(RenderCommand::FillRect {
                rect: handle,
                color: self.theme.frame,
            });
        }
        let border = LineStyle::new(self.theme.frame, style.frame_border_width);
        let half = style.frame_border_width / 2.0;
        for y in [frame.body.min.y + half, frame.body.max.y - half] {
            list.push(RenderCommand::Line {
                start: ScreenPoint::new(frame.body.min.x, y),
                end: ScreenPoint::new(frame.body.max.x, y),
                style: border,
            });
        }
    }

    fn render_axes(&self, list: &mut RenderList) {
        let style = &self.settings.style;
        let scaler = self.chart_scaler();
        let planner = TickPlanner::new(self.settings.y_tick_count, style);
        let grid = LineStyle::new(self.theme.grid, style.grid_line_width);
        let label = TextStyle::new(self.theme.axis_text, style.axis_font_size);
        let left = style.left_padding;
        let right = self.width - style.right_padding;

        list.push(RenderCommand::Line {
            start: ScreenPoint::new(left, scaler.baseline()),
            end: ScreenPoint::new(right, scaler.baseline()),
            style: grid,
        });
        for tick in planner.value_ticks(&scaler) {
            list.push(RenderCommand::Line {
                start: ScreenPoint::new(left, tick.y),
                end: ScreenPoint::new(right, tick.y),
                style: grid,
            });
            list.push(RenderCommand::Text {
                position: ScreenPoint::new(left, tick.y - style.axis_text_bottom_padding),
                text: tick.label,
                style: label,
            });
        }

        let dataset = self.dataset();
        let viewport = dataset.viewport;
        let y = scaler.baseline() + style.axis_text_top_padding + style.axis_font_size;
        let ticks = planner.date_ticks(
            &dataset.store,
            viewport.start(),
            viewport.end(),
            self.width,
        );
        for (position, tick) in ticks.into_iter().enumerate() {
            let x = scaler.x(tick.index);
            let x = if position == 0 {
                x
            } else {
                let (text_width, _) = self.measurer.measure(&tick.label, style.axis_font_size);
                (x - style.axis_text_left_padding).min(right - text_width)
            };
            list.push(RenderCommand::Text {
                position: ScreenPoint::new(x, y),
                text: tick.label,
                style: label,
            });
        }
    }

    fn render_series(&self, list: &mut RenderList) {
        let style = &self.settings.style;
        let scaler = self.chart_scaler();
        let scaled = scaler.scale(&self.dataset().store);
        list.push(RenderCommand::ClipRect(ScreenRect::new(
            ScreenPoint::new(0.0, 0.0),
            ScreenPoint::new(self.width, scaler.baseline() + style.line_width),
        )));
        for series in &scaled.series {
            list.push(RenderCommand::Polyline {
                points: scaled.points(series),
                style: LineStyle::new(series.color, style.line_width),
            });
        }
        list.push(RenderCommand::ClipEnd);
    }

    fn render_title(&self, list: &mut RenderList) {
        let Some(title) = &self.settings.title else {
            return;
        };
        let style = &self.settings.style;
        list.push(RenderCommand::Text {
            position: ScreenPoint::new(style.left_padding, style.title_height),
            text: title.clone(),
            style: TextStyle::new(self.theme.text, style.title_font_size).bold(),
        });
    }

    fn render_info(&self, list: &mut RenderList) {
        let Some(info) = &self.geometry.info_box else {
            return;
        };
        let Some(content) = self.info_content(info.index) else {
            return;
        };
        let style = &self.settings.style;
        let scaler = self.chart_scaler();

        list.push(RenderCommand::Line {
            start: ScreenPoint::new(info.marker_x, style.marker_top),
            end: ScreenPoint::new(info.marker_x, scaler.baseline()),
            style: LineStyle::new(self.theme.marker_line, 1.0),
        });
        for column in self.dataset().store.visible_columns() {
            let Some(&value) = column.values().get(info.index) else {
                continue;
            };
            let center = ScreenPoint::new(info.marker_x, scaler.y(value));
            list.push(RenderCommand::Circle {
                center,
                radius: style.marker_radius,
                color: column.color(),
            });
            list.push(RenderCommand::Circle {
                center,
                radius: style.marker_radius - 2.0,
                color: self.theme.background,
            });
        }

        let rect = info.rect;
        list.push(RenderCommand::RoundedRect {
            rect,
            radius: style.info_corner_radius,
            style: RectStyle {
                fill: Some(self.theme.background),
                stroke: Some(LineStyle::new(self.theme.info_border, 1.0)),
                shadow: Some(Shadow {
                    color: self.theme.info_shadow,
                    offset: ScreenPoint::new(1.0, 1.0),
                    blur: 4.0,
                }),
            },
        });
        let text_x = rect.min.x + style.info_left_padding;
        list.push(RenderCommand::Text {
            position: ScreenPoint::new(text_x, rect.min.y + style.info_header_offset),
            text: content.header,
            style: TextStyle::new(self.theme.text, style.info_header_font_size),
        });
        let values_y = rect.min.y + style.info_values_offset;
        for entry in content.entries {
            let x = text_x + entry.offset;
            list.push(RenderCommand::Text {
                position: ScreenPoint::new(x, values_y),
                text: entry.value,
                style: TextStyle::new(entry.color, style.info_value_font_size).bold(),
            });
            list.push(RenderCommand::Text {
                position: ScreenPoint::new(x, values_y + style.info_names_offset),
                text: entry.name,
                style: TextStyle::new(entry.color, style.info_name_font_size),
            });
        }
    }

    fn render_buttons(&self, list: &mut RenderList) {
        let style = &self.settings.style;
        let store = &self.dataset().store;
        for button in &self.geometry.buttons {
            let Some(column) = store.column(&button.id) else {
                continue;
            };
            let rect = button.rect;
            list.push(RenderCommand::RoundedRect {
                rect,
                radius: rect.height() / 2.0,
                style: RectStyle {
                    stroke: Some(LineStyle::new(self.theme.button_border, 0.7)),
                    ..RectStyle::default()
                },
            });
            let center = ScreenPoint::new(
                rect.min.x + style.button_height / 2.0,
                rect.min.y + style.button_height / 2.0,
            );
            let radius = style.button_height / 3.0;
            list.push(RenderCommand::Circle {
                center,
                radius,
                color: column.color(),
            });
            if column.is_visible() {
                list.push(RenderCommand::Polyline {
                    points: vec![
                        ScreenPoint::new(center.x - 4.0, center.y),
                        ScreenPoint::new(center.x - 1.0, center.y + 3.0),
                        ScreenPoint::new(center.x + 4.0, center.y - 2.0),
                    ],
                    style: LineStyle::new(self.theme.check, 2.0),
                });
            } else {
                list.push(RenderCommand::Circle {
                    center,
                    radius: radius - 2.0,
                    color: self.theme.background,
                });
            }
            list.push(RenderCommand::Text {
                position: ScreenPoint::new(
                    center.x + radius + 2.0,
                    center.y + style.button_font_size / 3.0,
                ),
                text: column.name().to_string(),
                style: TextStyle::new(self.theme.text, style.button_font_size),
            });
        }
    }
}

fn cursor_for(region: HitRegion) -> CursorHint {
    match region {
        HitRegion::LeftHandle | HitRegion::RightHandle => CursorHint::ColResize,
        HitRegion::FrameBody => CursorHint::Move,
        HitRegion::InfoBox | HitRegion::Button(_) | HitRegion::Plot => CursorHint::Pointer,
        HitRegion::Outside => CursorHint::Default,
    }
}

fn format_sample(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::DAY_MS;
    use crate::config::TimeUnit;

    fn store(days: usize) -> SeriesStore {
        let timestamps = (0..days as i64).map(|day| 1_542_412_800_000 + day * DAY_MS).collect();
        let joined = (0..days).map(|v| v as f64).collect();
        let left = (0..days).map(|v| (v / 2) as f64).collect();
        SeriesStore::new(
            "x",
            timestamps,
            vec![
                Column::new("y0", "Joined", Color::BLACK, joined),
                Column::new("y1", "Left", Color::WHITE, left),
            ],
        )
        .expect("valid store")
    }

    fn chart(days: usize) -> Chart {
        Chart::from_store(store(days), ChartSettings::default())
    }

    fn finish(chart: &mut Chart, response: &Response) {
        for ticket in &response.animation {
            chart.on_animation_frame(*ticket);
        }
    }

    fn touch(phase: TouchPhase, touches: &[ScreenPoint]) -> TouchEvent {
        TouchEvent::new(phase, touches.to_vec(), ScreenPoint::default())
    }

    fn band_y(chart: &Chart) -> f32 {
        let band = chart.geometry().minimap;
        (band.min.y + band.max.y) / 2.0
    }

    #[test]
    fn geometry_exists_right_after_construction() {
        let chart = chart(100);
        assert_eq!(chart.geometry().minimap_xs.len(), 100);
        assert_eq!(chart.geometry().buttons.len(), 2);
        assert!(chart.geometry().frame.left_handle.is_valid());
        assert_eq!((chart.viewport().start(), chart.viewport().end()), (0, 99));
    }

    #[test]
    fn hide_column_guards_last_series() {
        let mut chart = chart(20);
        let response = chart.hide_column("y0");
        assert!(response.redraw);
        assert_eq!(response.animation.len(), 30);
        let response = chart.hide_column("y1");
        assert!(!response.redraw);
        assert_eq!(chart.visible_series(), vec!["y1"]);
        assert!(chart.show_column("y0").redraw);
        assert_eq!(chart.visible_series(), vec!["y0", "y1"]);
    }

    #[test]
    fn frame_drag_moves_viewport_and_animates() {
        let mut chart = chart(100);
        let y = band_y(&chart);
        let right = chart.geometry().frame.right_handle.max.x;
        chart.handle_event(PointerEvent::down(right, y));
        let target = chart.geometry().minimap_xs[30];
        let response = chart.handle_event(PointerEvent::moved(target, y));
        assert_eq!(response.cursor, CursorHint::ColResize);
        assert_eq!(chart.viewport().end(), 30);
        assert_eq!(response.animation.len(), 10);
        chart.handle_event(PointerEvent::up(target, y));

        let body = chart.geometry().frame.body;
        let x = (body.min.x + body.max.x) / 2.0;
        let response = chart.handle_event(PointerEvent::down(x, y));
        assert_eq!(response.cursor, CursorHint::Move);
        chart.handle_event(PointerEvent::moved(x + 5.0, y));
        assert_eq!((chart.viewport().start(), chart.viewport().end()), (1, 31));
        chart.handle_event(PointerEvent::leave());
        assert_eq!(chart.drag_state(), DragState::Idle);
    }

    #[test]
    fn touch_suppresses_mouse_moves() {
        let mut chart = chart(100);
        let y = band_y(&chart);
        let right = chart.geometry().frame.right_handle.max.x;
        let start = touch(TouchPhase::Start, &[ScreenPoint::new(right, y)]);
        chart.handle_event(start);
        assert_eq!(chart.drag_state(), DragState::DraggingRightEdge);
        let target = chart.geometry().minimap_xs[40];
        chart.handle_event(PointerEvent::moved(target, y));
        assert_eq!(chart.viewport().end(), 99);
        let touch_move = touch(TouchPhase::Move, &[ScreenPoint::new(target, y)]);
        chart.handle_event(touch_move);
        assert_eq!(chart.viewport().end(), 40);
        let two_fingers = touch(
            TouchPhase::Move,
            &[ScreenPoint::new(target, y), ScreenPoint::new(10.0, 10.0)],
        );
        chart.handle_event(two_fingers);
        assert_eq!(chart.drag_state(), DragState::Idle);
    }

    #[test]
    fn touch_cancel_returns_control_to_the_mouse() {
        for phase in [TouchPhase::Cancel, TouchPhase::End] {
            let mut chart = chart(100);
            let y = band_y(&chart);
            let right = chart.geometry().frame.right_handle.max.x;
            chart.handle_event(touch(TouchPhase::Start, &[ScreenPoint::new(right, y)]));
            assert_eq!(chart.drag_state(), DragState::DraggingRightEdge);

            chart.handle_event(touch(phase, &[]));
            assert_eq!(chart.drag_state(), DragState::Idle);
            assert_eq!(chart.viewport().end(), 99);

            let target = chart.geometry().minimap_xs[60];
            chart.handle_event(PointerEvent::down(right, y));
            assert_eq!(chart.drag_state(), DragState::DraggingRightEdge);
            chart.handle_event(PointerEvent::moved(target, y));
            assert_eq!(chart.viewport().end(), 60);
        }
    }

    #[test]
    fn plot_click_shows_info_box_and_requests_detail() {
        let settings = ChartConfig::new().with_zoom(true).resolve().expect("valid settings");
        let mut chart = Chart::from_store(store(100), settings);
        let x = chart.chart_scaler().x(42);
        let response = chart.handle_event(PointerEvent::down(x, 200.0));
        assert!(response.redraw);
        let info = chart.geometry().info_box.clone().expect("info box");
        assert_eq!(info.index, 42);

        let center = ScreenPoint::new(
            (info.rect.min.x + info.rect.max.x) / 2.0,
            (info.rect.min.y + info.rect.max.y) / 2.0,
        );
        let response = chart.handle_event(PointerEvent::down(center.x, center.y));
        let request = response.detail_request.expect("detail request");
        assert_eq!(Some(request.timestamp), chart.overview().store().timestamp(42));

        let detail = ChartData::from_json(
            r#"{"columns": [["x", 0, 3600000, 7200000], ["y0", 5, 6, 7], ["y1", 1, 2, 3]],
                "types": {"x": "x", "y0": "line", "y1": "line"}}"#,
        )
        .expect("valid json");
        let response = chart.complete_detail(&request, Ok(detail));
        assert!(response.redraw);
        assert!(chart.mode().is_detail());
        assert_eq!(chart.dataset().store().len(), 3);
        finish(&mut chart, &response);
        assert_eq!(chart.displayed_max().chart, 7.0);

        chart.zoom_out();
        assert_eq!(chart.mode(), ViewMode::Overview);
    }

    #[test]
    fn stale_and_expired_detail_requests_are_ignored() {
        let settings = ChartConfig::new().with_zoom(true).resolve().expect("valid settings");
        let mut chart = Chart::from_store(store(100), settings);
        let request = DetailRequest {
            id: 7,
            timestamp: 0,
            timeout: Duration::from_secs(1),
        };
        let response = chart.complete_detail(&request, Ok(ChartData::default()));
        assert!(!response.redraw);
        assert!(!chart.mode().is_detail());
        assert!(chart.expire_detail(&request).detail_request.is_none());
    }

    #[test]
    fn render_lists_title_labels_and_buttons() {
        let settings = ChartConfig::new()
            .with_title("Followers")
            .with_time_unit(TimeUnit::Milliseconds)
            .resolve()
            .expect("valid settings");
        let mut chart = Chart::from_store(store(100), settings);
        let list = chart.render();
        assert_eq!(list.commands().first(), Some(&RenderCommand::Clear(Theme::day().background)));
        let texts: Vec<&str> = list.texts().collect();
        assert!(texts.contains(&"Followers"));
        assert!(texts.contains(&"Joined"));
        assert!(texts.contains(&"Nov 17"));
        chart.switch_mode();
        let list = chart.render();
        assert_eq!(list.commands().first(), Some(&RenderCommand::Clear(Theme::night().background)));
    }
}
