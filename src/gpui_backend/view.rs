use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use gpui::prelude::*;
use gpui::{MouseButton, Pixels, Point, Window, canvas, div};
use tracing::trace;

use crate::chart::{Chart, render_frame};
use crate::geom::ScreenPoint;
use crate::interaction::{TouchEvent, TouchPhase};
use crate::render::RenderList;

use super::config::ChartViewConfig;
use super::paint::{paint_frame, to_hsla};
use super::state::ChartUiState;

/// A GPUI view that lays out, animates and paints any [`Chart`].
///
/// Left-button presses, drags and releases are forwarded to the chart as
/// touches; a release outside the view cancels the touch. Layout changes
/// are animated according to [`ChartViewConfig::animation`].
pub struct ChartView<C: Chart + 'static> {
    chart: Rc<RefCell<C>>,
    state: Rc<RefCell<ChartUiState>>,
    config: ChartViewConfig,
}

impl<C: Chart + 'static> ChartView<C> {
    /// Create a view with the default [`ChartViewConfig`].
    pub fn new(chart: C) -> Self {
        Self::with_config(chart, ChartViewConfig::default())
    }

    /// Create a view with a custom configuration.
    pub fn with_config(chart: C, config: ChartViewConfig) -> Self {
        Self {
            chart: Rc::new(RefCell::new(chart)),
            state: Rc::new(RefCell::new(ChartUiState::default())),
            config,
        }
    }

    /// Get a handle for mutating the underlying chart.
    ///
    /// Call `cx.notify()` on the view after mutating so it lays out again.
    pub fn chart_handle(&self) -> ChartHandle<C> {
        ChartHandle {
            chart: Rc::clone(&self.chart),
        }
    }

    fn on_touch(&mut self, phase: TouchPhase, position: Point<Pixels>, cx: &mut Context<Self>) {
        let origin = self.state.borrow().origin;
        let local = screen_point(position).offset(-origin.x, -origin.y);
        let mut chart = self.chart.borrow_mut();
        let resolved = chart.touch(TouchEvent::new(phase, local));
        trace!(chart = chart.kind(), ?phase, resolved, "touch");
        if resolved || chart.is_dirty() {
            cx.notify();
        }
    }
}

impl<C: Chart + 'static> Render for ChartView<C> {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let chart = Rc::clone(&self.chart);
        let state = Rc::clone(&self.state);
        let config = self.config.clone();
        let background = to_hsla(self.config.theme.background);

        div()
            .size_full()
            .bg(background)
            .child(
                canvas(
                    move |bounds, window, _| {
                        let mut chart = chart.borrow_mut();
                        let mut state = state.borrow_mut();
                        let origin = screen_point(bounds.origin);
                        state.origin = origin;
                        chart.set_size(f32::from(bounds.size.width), f32::from(bounds.size.height));
                        let now = Instant::now();
                        if let Some(pass) = chart.layout() {
                            state.begin(&pass, chart.layers(), config.animation, now);
                        }
                        let layers = state.frame_layers(chart.layers(), now);
                        if state.is_animating() {
                            window.request_animation_frame();
                        }
                        ChartFrame {
                            origin,
                            render: render_frame(&*chart, &layers, &config.theme),
                        }
                    },
                    move |_, frame, window, cx| {
                        paint_frame(&frame.render, frame.origin, window, cx);
                    },
                )
                .size_full(),
            )
            .on_mouse_down(
                MouseButton::Left,
                cx.listener(|this, ev: &gpui::MouseDownEvent, _, cx| {
                    this.state.borrow_mut().pressed = true;
                    this.on_touch(TouchPhase::Down, ev.position, cx);
                }),
            )
            .on_mouse_move(cx.listener(|this, ev: &gpui::MouseMoveEvent, _, cx| {
                if this.state.borrow().pressed {
                    this.on_touch(TouchPhase::Move, ev.position, cx);
                }
            }))
            .on_mouse_up(
                MouseButton::Left,
                cx.listener(|this, ev: &gpui::MouseUpEvent, _, cx| {
                    this.state.borrow_mut().pressed = false;
                    this.on_touch(TouchPhase::Up, ev.position, cx);
                }),
            )
            .on_mouse_up_out(
                MouseButton::Left,
                cx.listener(|this, ev: &gpui::MouseUpEvent, _, cx| {
                    let was_pressed = std::mem::replace(&mut this.state.borrow_mut().pressed, false);
                    if was_pressed {
                        this.on_touch(TouchPhase::Cancel, ev.position, cx);
                    }
                }),
            )
    }
}

struct ChartFrame {
    origin: ScreenPoint,
    render: RenderList,
}

/// A handle for mutating a chart held inside a [`ChartView`].
///
/// The chart is borrowed for the duration of each callback; delegates must
/// not re-enter the handle while the chart is resolving a touch.
pub struct ChartHandle<C> {
    chart: Rc<RefCell<C>>,
}

impl<C> Clone for ChartHandle<C> {
    fn clone(&self) -> Self {
        Self {
            chart: Rc::clone(&self.chart),
        }
    }
}

impl<C> ChartHandle<C> {
    /// Read the chart.
    pub fn read<R>(&self, f: impl FnOnce(&C) -> R) -> R {
        f(&self.chart.borrow())
    }

    /// Mutate the chart.
    pub fn write<R>(&self, f: impl FnOnce(&mut C) -> R) -> R {
        f(&mut self.chart.borrow_mut())
    }
}

fn screen_point(point: Point<Pixels>) -> ScreenPoint {
    ScreenPoint::new(f32::from(point.x), f32::from(point.y))
}
