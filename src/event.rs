//! Input events delivered by the host.

use crate::geom::ScreenPoint;

/// Mouse or pen action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    /// Primary button pressed.
    Down,
    /// Pointer moved.
    Move,
    /// Primary button released.
    Up,
    /// Pointer left the canvas.
    Leave,
}

/// Pointer event in canvas-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Action.
    pub kind: PointerKind,
    /// Canvas-local position.
    pub position: ScreenPoint,
}

impl PointerEvent {
    /// Create a pointer event.
    pub fn new(kind: PointerKind, x: f32, y: f32) -> Self {
        Self {
            kind,
            position: ScreenPoint::new(x, y),
        }
    }

    /// Primary button pressed at `(x, y)`.
    pub fn down(x: f32, y: f32) -> Self {
        Self::new(PointerKind::Down, x, y)
    }

    /// Pointer moved to `(x, y)`.
    pub fn moved(x: f32, y: f32) -> Self {
        Self::new(PointerKind::Move, x, y)
    }

    /// Primary button released at `(x, y)`.
    pub fn up(x: f32, y: f32) -> Self {
        Self::new(PointerKind::Up, x, y)
    }

    /// Pointer left the canvas.
    pub fn leave() -> Self {
        Self::new(PointerKind::Leave, 0.0, 0.0)
    }
}

/// Touch gesture phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchPhase {
    /// A finger touched down.
    Start,
    /// A finger moved.
    Move,
    /// A finger lifted.
    End,
    /// The gesture was cancelled by the platform.
    Cancel,
}

/// Touch event with page-space touch points.
#[derive(Debug, Clone, PartialEq)]
pub struct TouchEvent {
    /// Phase.
    pub phase: TouchPhase,
    /// Active touch points, in page coordinates.
    pub touches: Vec<ScreenPoint>,
    /// Page position of the canvas origin.
    pub canvas_offset: ScreenPoint,
}

impl TouchEvent {
    /// Create a touch event.
    pub fn new(phase: TouchPhase, touches: Vec<ScreenPoint>, canvas_offset: ScreenPoint) -> Self {
        Self {
            phase,
            touches,
            canvas_offset,
        }
    }

    /// Check whether more than one finger is down.
    pub fn is_multi_touch(&self) -> bool {
        self.touches.len() > 1
    }

    /// First touch point in canvas-local coordinates.
    pub fn primary(&self) -> Option<ScreenPoint> {
        self.touches.first().map(|touch| {
            ScreenPoint::new(touch.x - self.canvas_offset.x, touch.y - self.canvas_offset.y)
        })
    }
}

/// Any input the chart reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Mouse or pen input.
    Pointer(PointerEvent),
    /// Touch input.
    Touch(TouchEvent),
}

impl From<PointerEvent> for InputEvent {
    fn from(event: PointerEvent) -> Self {
        Self::Pointer(event)
    }
}

impl From<TouchEvent> for InputEvent {
    fn from(event: TouchEvent) -> Self {
        Self::Touch(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touch_points_are_made_canvas_local() {
        let event = TouchEvent::new(
            TouchPhase::Start,
            vec![ScreenPoint::new(120.0, 340.0)],
            ScreenPoint::new(20.0, 40.0),
        );
        assert_eq!(event.primary(), Some(ScreenPoint::new(100.0, 300.0)));
        assert!(!event.is_multi_touch());
    }
}
