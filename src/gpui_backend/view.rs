use std::sync::{Arc, RwLock};
use std::time::Duration;

use gpui::prelude::*;
use gpui::{
    AsyncWindowContext, CursorStyle, MouseButton, MouseDownEvent, MouseMoveEvent, MouseUpEvent,
    Pixels, Point, Timer, Window, canvas, div, px,
};

use crate::animation::FrameTicket;
use crate::chart::{Chart, CursorHint, DetailRequest, Response};
use crate::datasource::DataSource;
use crate::event::PointerEvent;
use crate::geom::ScreenPoint;
use crate::render::{Color, RenderList};
use crate::style::{Theme, ThemeMode};

use super::config::ChartViewConfig;
use super::paint::{paint_list, to_hsla};
use super::text::GpuiTextMeasurer;

/// Detail data provider shared with background fetch tasks.
pub type SharedDataSource = Arc<dyn DataSource + Send + Sync>;

#[derive(Debug, Default)]
struct ViewState {
    origin: ScreenPoint,
    cursor: CursorHint,
    measurer_installed: bool,
}

/// A GPUI view that renders a [`Chart`] and drives its interaction.
///
/// Mouse input is translated into canvas-local [`PointerEvent`]s. Animation
/// tickets are fired from timers on the window's executor; detail requests
/// are fetched from the attached [`DataSource`] on the background executor.
#[derive(Clone)]
pub struct GpuiChartView {
    chart: Arc<RwLock<Chart>>,
    state: Arc<RwLock<ViewState>>,
    config: ChartViewConfig,
    source: Option<SharedDataSource>,
}

impl GpuiChartView {
    /// Create a view for the given chart with the default [`ChartViewConfig`].
    pub fn new(chart: Chart) -> Self {
        Self::with_config(chart, ChartViewConfig::default())
    }

    /// Create a view with a custom configuration.
    pub fn with_config(chart: Chart, config: ChartViewConfig) -> Self {
        Self {
            chart: Arc::new(RwLock::new(chart)),
            state: Arc::new(RwLock::new(ViewState::default())),
            config,
            source: None,
        }
    }

    /// Serve detail requests from `source`.
    ///
    /// Without a source, clicks that would zoom into a detail data set are
    /// expired immediately.
    pub fn with_data_source(mut self, source: SharedDataSource) -> Self {
        self.source = Some(source);
        self
    }

    /// Get a handle for reading or mutating the underlying chart.
    pub fn chart_handle(&self) -> ChartHandle {
        ChartHandle {
            chart: Arc::clone(&self.chart),
        }
    }

    fn local_point(&self, position: Point<Pixels>) -> ScreenPoint {
        let origin = self
            .state
            .read()
            .map(|state| state.origin)
            .unwrap_or_default();
        ScreenPoint::new(
            f32::from(position.x) - origin.x,
            f32::from(position.y) - origin.y,
        )
    }

    fn dispatch(&mut self, event: PointerEvent, window: &mut Window, cx: &mut Context<Self>) {
        let response = match self.chart.write() {
            Ok(mut chart) => chart.handle_event(event),
            Err(_) => return,
        };
        self.apply(response, window, cx);
    }

    fn on_mouse_down(&mut self, ev: &MouseDownEvent, window: &mut Window, cx: &mut Context<Self>) {
        let position = self.local_point(ev.position);
        self.dispatch(PointerEvent::down(position.x, position.y), window, cx);
    }

    fn on_mouse_move(&mut self, ev: &MouseMoveEvent, window: &mut Window, cx: &mut Context<Self>) {
        let position = self.local_point(ev.position);
        self.dispatch(PointerEvent::moved(position.x, position.y), window, cx);
    }

    fn on_mouse_up(&mut self, ev: &MouseUpEvent, window: &mut Window, cx: &mut Context<Self>) {
        let position = self.local_point(ev.position);
        self.dispatch(PointerEvent::up(position.x, position.y), window, cx);
    }

    fn on_mouse_up_out(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        self.dispatch(PointerEvent::leave(), window, cx);
    }

    fn toggle_night_mode(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        let response = match self.chart.write() {
            Ok(mut chart) => chart.toggle_night_mode(),
            Err(_) => return,
        };
        self.apply(response, window, cx);
    }

    fn apply(&mut self, response: Response, window: &mut Window, cx: &mut Context<Self>) {
        let cursor_changed = match self.state.write() {
            Ok(mut state) => {
                let changed = state.cursor != response.cursor;
                state.cursor = response.cursor;
                changed
            }
            Err(_) => false,
        };
        if let Some(request) = response.detail_request {
            self.fetch_detail(request, window, cx);
        }
        if !response.animation.is_empty() {
            self.run_animation(response.animation, window, cx);
        }
        if response.redraw || cursor_changed {
            cx.notify();
        }
    }

    fn run_animation(
        &self,
        tickets: Vec<FrameTicket>,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        let chart = Arc::clone(&self.chart);
        let view = cx.entity();
        window
            .spawn(cx, move |cx: &mut AsyncWindowContext| {
                let mut cx = cx.clone();
                async move {
                    let mut elapsed = Duration::ZERO;
                    for ticket in tickets {
                        Timer::after(ticket.delay.saturating_sub(elapsed)).await;
                        elapsed = ticket.delay;
                        let redraw = chart
                            .write()
                            .map(|mut chart| chart.on_animation_frame(ticket).redraw)
                            .unwrap_or(false);
                        // A newer job superseded this one.
                        if !redraw {
                            break;
                        }
                        let updated = cx.update(|_, cx| {
                            view.update(cx, |_, view_cx| view_cx.notify());
                        });
                        if updated.is_err() {
                            break;
                        }
                    }
                }
            })
            .detach();
    }

    fn fetch_detail(&self, request: DetailRequest, window: &mut Window, cx: &mut Context<Self>) {
        let Some(source) = self.source.clone() else {
            tracing::warn!(id = request.id, "no data source for detail request");
            if let Ok(mut chart) = self.chart.write() {
                chart.expire_detail(&request);
            }
            return;
        };

        let fetch = cx
            .background_executor()
            .spawn(async move { source.fetch_detail(request.timestamp) });
        let chart = Arc::clone(&self.chart);
        let view = cx.entity();
        window
            .spawn(cx, move |cx: &mut AsyncWindowContext| {
                let mut cx = cx.clone();
                async move {
                    let result = fetch.await;
                    let response = match chart.write() {
                        Ok(mut chart) => chart.complete_detail(&request, result),
                        Err(_) => return,
                    };
                    cx.update(|window, cx| {
                        view.update(cx, |this, view_cx| this.apply(response, window, view_cx));
                    })
                    .ok();
                }
            })
            .detach();

        let chart = Arc::clone(&self.chart);
        window
            .spawn(cx, move |_: &mut AsyncWindowContext| async move {
                Timer::after(request.timeout).await;
                if let Ok(mut chart) = chart.write() {
                    chart.expire_detail(&request);
                }
            })
            .detach();
    }

    fn cursor_style(&self) -> CursorStyle {
        let cursor = self
            .state
            .read()
            .map(|state| state.cursor)
            .unwrap_or_default();
        match cursor {
            CursorHint::Default => CursorStyle::Arrow,
            CursorHint::ColResize => CursorStyle::ResizeLeftRight,
            CursorHint::Move => CursorStyle::OpenHand,
            CursorHint::Pointer => CursorStyle::PointingHand,
        }
    }
}

impl Render for GpuiChartView {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let chart = Arc::clone(&self.chart);
        let state = Arc::clone(&self.state);
        let (theme, mode) = match self.chart.read() {
            Ok(chart) => (chart.theme().clone(), chart.theme_mode()),
            Err(_) => (Theme::day(), ThemeMode::Day),
        };

        let plot = div()
            .flex_1()
            .w_full()
            .cursor(self.cursor_style())
            .child(
                canvas(
                    move |bounds, window, _| {
                        let origin = ScreenPoint::new(
                            f32::from(bounds.origin.x),
                            f32::from(bounds.origin.y),
                        );
                        let install = match state.write() {
                            Ok(mut state) => {
                                state.origin = origin;
                                !std::mem::replace(&mut state.measurer_installed, true)
                            }
                            Err(_) => false,
                        };
                        let Ok(mut chart) = chart.write() else {
                            return RenderList::new();
                        };
                        if install {
                            chart.set_text_measurer(Box::new(GpuiTextMeasurer::new(window)));
                        }
                        chart.resize(f32::from(bounds.size.width), f32::from(bounds.size.height));
                        chart.render()
                    },
                    move |bounds, list, window, cx| {
                        paint_list(&list, bounds, window, cx);
                    },
                )
                .size_full(),
            )
            .on_mouse_down(
                MouseButton::Left,
                cx.listener(|this, ev, window, cx| {
                    this.on_mouse_down(ev, window, cx);
                }),
            )
            .on_mouse_move(cx.listener(|this, ev, window, cx| {
                this.on_mouse_move(ev, window, cx);
            }))
            .on_mouse_up(
                MouseButton::Left,
                cx.listener(|this, ev, window, cx| {
                    this.on_mouse_up(ev, window, cx);
                }),
            )
            .on_mouse_up_out(
                MouseButton::Left,
                cx.listener(|this, _, window, cx| {
                    this.on_mouse_up_out(window, cx);
                }),
            );

        let mut root = div()
            .size_full()
            .flex()
            .flex_col()
            .bg(to_hsla(theme.background))
            .child(plot);

        if self.config.show_mode_switch {
            let label = match mode {
                ThemeMode::Day => "Switch to Night Mode",
                ThemeMode::Night => "Switch to Day Mode",
            };
            root = root.child(
                div()
                    .w_full()
                    .h(px(self.config.mode_switch_height))
                    .flex()
                    .items_center()
                    .justify_center()
                    .text_size(px(self.config.mode_switch_font_size))
                    .text_color(to_hsla(switch_color(theme.text)))
                    .cursor(CursorStyle::PointingHand)
                    .child(label)
                    .on_mouse_down(
                        MouseButton::Left,
                        cx.listener(|this, _, window, cx| {
                            this.toggle_night_mode(window, cx);
                        }),
                    ),
            );
        }

        root
    }
}

fn switch_color(text: Color) -> Color {
    Color::new(text.r, text.g, text.b, 0.8)
}

/// A handle for reading or mutating a [`Chart`] held inside a `GpuiChartView`.
///
/// Calls return `None` when the chart lock is poisoned. Mutations made
/// through the handle are drawn on the view's next render.
#[derive(Clone)]
pub struct ChartHandle {
    chart: Arc<RwLock<Chart>>,
}

impl ChartHandle {
    /// Read the chart state.
    pub fn read<R>(&self, f: impl FnOnce(&Chart) -> R) -> Option<R> {
        let chart = self.chart.read().ok()?;
        Some(f(&chart))
    }

    /// Mutate the chart state.
    pub fn write<R>(&self, f: impl FnOnce(&mut Chart) -> R) -> Option<R> {
        let mut chart = self.chart.write().ok()?;
        Some(f(&mut chart))
    }
}
