use std::time::Instant;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum MouseButton {
    Left,
    Right,
    Middle,
    Other,
}

/// Pointer event in drawing-area coordinates (origin top-left, y down).
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct MouseEvent {
    pub(crate) x: f32,
    pub(crate) y: f32,
    pub(crate) button: MouseButton,
}

impl MouseEvent {
    pub(crate) fn new(x: f32, y: f32, button: MouseButton) -> Self {
        Self { x, y, button }
    }

    /// Pixel position measured from the bottom-left corner of an area
    /// `height` pixels tall, as read back from render targets.
    pub(crate) fn relative_position(&self, height: u32) -> (u32, u32) {
        let x = self.x.max(0.0) as u32;
        let y = (height as f32 - self.y).max(0.0) as u32;
        (x, y)
    }
}

pub(crate) trait InputHandler {
    /// Mouse button pressed; returns whether the event was consumed.
    fn start_rotate(&mut self, event: &MouseEvent, now: Instant) -> bool;
    fn rotate(&mut self, event: &MouseEvent, now: Instant) -> bool;
    fn end_rotate(&mut self, event: &MouseEvent, now: Instant) -> bool;
    fn toggle_perspective(&mut self, key: char) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_position_flips_y() {
        let event = MouseEvent::new(10.0, 30.0, MouseButton::Left);
        assert_eq!(event.relative_position(100), (10, 70));
    }

    #[test]
    fn relative_position_clamps_outside_points() {
        let event = MouseEvent::new(-4.0, 120.0, MouseButton::Left);
        assert_eq!(event.relative_position(100), (0, 0));
    }
}
