//! Hit testing and the mini-map drag state machine.
//!
//! [`HitTester`] classifies a canvas point against the current frame
//! geometry; [`DragController`] turns pointer motion into viewport updates.

use crate::geom::{ScreenPoint, ScreenRect};
use crate::layout::ChartGeometry;
use crate::view::Viewport;

/// Interaction hit regions, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitRegion {
    /// Left drag handle of the mini-map frame.
    LeftHandle,
    /// Right drag handle of the mini-map frame.
    RightHandle,
    /// Mini-map frame between the handles.
    FrameBody,
    /// The info box above the plot.
    InfoBox,
    /// A series toggle button, by column position.
    Button(usize),
    /// Main plot area.
    Plot,
    /// Anything else.
    Outside,
}

/// Mini-map selection rectangles, derived from the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MiniMapFrame {
    /// Left drag handle, starting at the mini-map X of `start`.
    pub left_handle: ScreenRect,
    /// Right drag handle, ending at the mini-map X of `end`.
    pub right_handle: ScreenRect,
    /// Area between the handles.
    pub body: ScreenRect,
}

impl MiniMapFrame {
    /// Build the frame from the mini-map X of both viewport edges.
    ///
    /// The handles are `handle_width` wide and extend `border` pixels above
    /// and below the mini-map band.
    pub fn new(
        left_x: f32,
        right_x: f32,
        band: ScreenRect,
        handle_width: f32,
        border: f32,
    ) -> Self {
        let top = band.min.y - border;
        let bottom = band.max.y + border;
        let left_handle = ScreenRect::new(
            ScreenPoint::new(left_x, top),
            ScreenPoint::new(left_x + handle_width, bottom),
        );
        let right_handle = ScreenRect::new(
            ScreenPoint::new(right_x - handle_width, top),
            ScreenPoint::new(right_x, bottom),
        );
        let body = ScreenRect::new(
            ScreenPoint::new(left_handle.max.x, top),
            ScreenPoint::new(right_handle.min.x.max(left_handle.max.x), bottom),
        );
        Self {
            left_handle,
            right_handle,
            body,
        }
    }
}

/// Stateless hit predicates over one frame geometry.
#[derive(Debug, Clone, Copy)]
pub struct HitTester<'a> {
    geometry: &'a ChartGeometry,
    tolerance: f32,
}

impl<'a> HitTester<'a> {
    /// Create a tester; handle boxes are widened by `tolerance` pixels.
    pub fn new(geometry: &'a ChartGeometry, tolerance: f32) -> Self {
        Self {
            geometry,
            tolerance,
        }
    }

    /// Classify a point. The first matching region wins.
    pub fn hit_test(&self, point: ScreenPoint) -> HitRegion {
        let frame = &self.geometry.frame;
        if frame.left_handle.widened(self.tolerance).contains(point) {
            HitRegion::LeftHandle
        } else if frame.right_handle.widened(self.tolerance).contains(point) {
            HitRegion::RightHandle
        } else if frame.body.contains(point) {
            HitRegion::FrameBody
        } else if self
            .geometry
            .info_box
            .as_ref()
            .is_some_and(|info| info.rect.contains(point))
        {
            HitRegion::InfoBox
        } else if let Some(position) = self
            .geometry
            .buttons
            .iter()
            .position(|button| button.rect.contains(point))
        {
            HitRegion::Button(position)
        } else if self.geometry.plot.contains(point) {
            HitRegion::Plot
        } else {
            HitRegion::Outside
        }
    }
}

/// Drag state of one chart.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    /// No drag in progress.
    #[default]
    Idle,
    /// Moving the viewport start.
    DraggingLeftEdge,
    /// Moving the viewport end.
    DraggingRightEdge,
    /// Moving the whole frame.
    DraggingFrame {
        /// Pointer X at the previous move.
        last_x: f32,
    },
}

/// Pointer and touch drag state machine.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DragController {
    state: DragState,
    touch_active: bool,
}

impl DragController {
    /// Create an idle controller.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current drag state.
    pub fn state(&self) -> DragState {
        self.state
    }

    /// Check whether a drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.state != DragState::Idle
    }

    /// Check whether a touch gesture owns the pointer.
    pub fn is_touch(&self) -> bool {
        self.touch_active
    }

    /// Mark a touch gesture as active or finished.
    pub fn set_touch(&mut self, active: bool) {
        self.touch_active = active;
    }

    /// Start a drag for a pointer-down in `region`. Returns true when a drag
    /// started.
    pub fn begin(&mut self, region: HitRegion, x: f32) -> bool {
        self.state = match region {
            HitRegion::LeftHandle => DragState::DraggingLeftEdge,
            HitRegion::RightHandle => DragState::DraggingRightEdge,
            HitRegion::FrameBody => DragState::DraggingFrame { last_x: x },
            _ => return false,
        };
        tracing::debug!(state = ?self.state, x, "drag started");
        true
    }

    /// Apply a pointer move at `x` to the viewport.
    ///
    /// `minimap_xs` holds the mini-map X of every sample. Returns true when
    /// the viewport changed.
    pub fn drag_to(&mut self, x: f32, minimap_xs: &[f32], viewport: &mut Viewport) -> bool {
        match self.state {
            DragState::Idle => false,
            DragState::DraggingLeftEdge => drag_left_edge(x, minimap_xs, viewport),
            DragState::DraggingRightEdge => drag_right_edge(x, minimap_xs, viewport),
            DragState::DraggingFrame { last_x } => {
                let changed = if x < last_x {
                    viewport.step(false)
                } else if x > last_x {
                    viewport.step(true)
                } else {
                    false
                };
                self.state = DragState::DraggingFrame { last_x: x };
                changed
            }
        }
    }

    /// End any drag in progress.
    pub fn end(&mut self) {
        if self.is_dragging() {
            tracing::debug!(state = ?self.state, "drag ended");
        }
        self.state = DragState::Idle;
    }
}

// Brackets are half-open towards the dragged edge so a pointer exactly on a
// sample selects that sample.
fn drag_left_edge(x: f32, xs: &[f32], viewport: &mut Viewport) -> bool {
    let limit = viewport
        .end()
        .saturating_sub(viewport.min_span() + 2)
        .min(xs.len().saturating_sub(1));
    (0..limit)
        .find(|&i| x >= xs[i] && x < xs[i + 1])
        .is_some_and(|i| viewport.set_start(i))
}

fn drag_right_edge(x: f32, xs: &[f32], viewport: &mut Viewport) -> bool {
    let last = viewport.last_index().min(xs.len().saturating_sub(1));
    let floor = viewport.start() + viewport.min_span();
    (floor + 1..=last)
        .rev()
        .find(|&i| x <= xs[i] && x > xs[i - 1])
        .is_some_and(|i| viewport.set_end(i))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xs(count: usize) -> Vec<f32> {
        (0..count).map(|i| 7.0 + i as f32 * 4.0).collect()
    }

    fn band() -> ScreenRect {
        ScreenRect::from_origin_size(7.0, 400.0, 386.0, 50.0)
    }

    #[test]
    fn frame_handles_are_symmetric() {
        let frame = MiniMapFrame::new(50.0, 200.0, band(), 10.0, 2.0);
        assert_eq!(frame.left_handle.min.x, 50.0);
        assert_eq!(frame.left_handle.max.x, 60.0);
        assert_eq!(frame.right_handle.min.x, 190.0);
        assert_eq!(frame.right_handle.max.x, 200.0);
        assert_eq!(frame.body.min.x, 60.0);
        assert_eq!(frame.body.max.x, 190.0);
        assert_eq!(frame.left_handle.height(), 54.0);
    }

    #[test]
    fn only_drag_regions_start_drags() {
        let mut drag = DragController::new();
        assert!(!drag.begin(HitRegion::Plot, 10.0));
        assert_eq!(drag.state(), DragState::Idle);
        assert!(drag.begin(HitRegion::FrameBody, 10.0));
        assert_eq!(drag.state(), DragState::DraggingFrame { last_x: 10.0 });
        drag.end();
        assert!(!drag.is_dragging());
    }

    #[test]
    fn left_edge_keeps_min_span() {
        let xs = xs(100);
        let mut viewport = Viewport::new(99, 10);
        let mut drag = DragController::new();
        drag.begin(HitRegion::LeftHandle, xs[0]);
        assert!(drag.drag_to(xs[40] + 1.0, &xs, &mut viewport));
        assert_eq!(viewport.start(), 40);
        assert!(!drag.drag_to(xs[95], &xs, &mut viewport));
        assert_eq!(viewport.start(), 40);
        assert!(viewport.is_valid());
    }

    #[test]
    fn right_edge_moves_end() {
        let xs = xs(100);
        let mut viewport = Viewport::new(99, 10);
        let mut drag = DragController::new();
        drag.begin(HitRegion::RightHandle, xs[99]);
        assert!(drag.drag_to(xs[50], &xs, &mut viewport));
        assert_eq!(viewport.end(), 50);
        assert!(!drag.drag_to(xs[3], &xs, &mut viewport));
        assert_eq!(viewport.end(), 50);
    }

    #[test]
    fn frame_drag_is_clamped() {
        let xs = xs(30);
        let mut viewport = Viewport::new(29, 10);
        assert!(viewport.set_end(10));
        let mut drag = DragController::new();
        drag.begin(HitRegion::FrameBody, 100.0);
        assert!(!drag.drag_to(90.0, &xs, &mut viewport));
        let mut x = 100.0;
        for _ in 0..50 {
            x += 1.0;
            drag.drag_to(x, &xs, &mut viewport);
        }
        assert_eq!((viewport.start(), viewport.end()), (19, 29));
        assert!(viewport.is_valid());
    }
}
