//! Mouse gesture state machine.
//!
//! A press arms the controller; after a short debounce it starts tracking
//! the drag. Each move is classified either as a trackball reorientation of
//! the whole cube or as an attempt to turn the layer under the press point.

use std::time::{Duration, Instant};

use nalgebra::Point3;

/// Delay between a press and the moment moves count as a drag
pub(crate) const DRAG_DEBOUNCE: Duration = Duration::from_millis(50);

/// Drag distance, in degrees, before a layer turn is attempted
pub(crate) const MIN_MOVE: f32 = 5.0;

#[derive(Clone, Copy, Debug, PartialEq)]
enum Phase {
    Released,
    Armed { since: Instant },
    Dragging,
    /// The drag already turned a layer; further moves are ignored
    Turned,
}

/// What a pointer move asks the player to do.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum DragAction {
    None,
    /// Rotate the whole cube by pixel deltas scaled to degrees, y up
    Reorient { delta_x: f32, delta_y: f32 },
    /// The drag is long enough to resolve a layer turn
    TryLayerTurn,
}

#[derive(Debug)]
pub(crate) struct GestureController {
    phase: Phase,
    /// Pointer position at the previous event, y down
    last_position: Option<(f32, f32)>,
    press_position: Option<(f32, f32)>,
    /// Object-space point under the press, on the near plane
    init_point: Option<Point3<f32>>,
}

impl Default for GestureController {
    fn default() -> Self {
        Self {
            phase: Phase::Released,
            last_position: None,
            press_position: None,
            init_point: None,
        }
    }
}

impl GestureController {
    pub(crate) fn press(&mut self, now: Instant, position: (f32, f32), init_point: Option<Point3<f32>>) {
        self.phase = Phase::Armed { since: now };
        self.last_position = Some(position);
        self.press_position = Some(position);
        self.init_point = init_point;
    }

    pub(crate) fn init_point(&self) -> Option<Point3<f32>> {
        self.init_point
    }

    /// Whether moves are being tracked, promoting an armed press once the
    /// debounce has elapsed.
    pub(crate) fn is_dragging(&mut self, now: Instant) -> bool {
        if let Phase::Armed { since } = self.phase {
            if now.duration_since(since) >= DRAG_DEBOUNCE {
                self.phase = Phase::Dragging;
            }
        }
        matches!(self.phase, Phase::Dragging | Phase::Turned)
    }

    /// Records that this drag turned a layer.
    pub(crate) fn layer_turned(&mut self) {
        if self.phase == Phase::Dragging {
            self.phase = Phase::Turned;
        }
    }

    /// Classifies a pointer move in an area of `width` x `height` pixels.
    pub(crate) fn moved(
        &mut self,
        now: Instant,
        position: (f32, f32),
        size: (u32, u32),
        has_selection: bool,
    ) -> DragAction {
        let previous = self.last_position.replace(position);
        if !self.is_dragging(now) || self.phase == Phase::Turned {
            return DragAction::None;
        }
        let (width, height) = (size.0.max(1) as f32, size.1.max(1) as f32);

        if has_selection {
            let start = self.press_position.unwrap_or(position);
            let dx = (position.0 - start.0) * 360.0 / width;
            let dy = (start.1 - position.1) * 360.0 / height;
            if dx.abs() > MIN_MOVE || dy.abs() > MIN_MOVE {
                DragAction::TryLayerTurn
            } else {
                DragAction::None
            }
        } else {
            let previous = previous.unwrap_or(position);
            DragAction::Reorient {
                delta_x: (position.0 - previous.0) * 360.0 / width,
                delta_y: (previous.1 - position.1) * 360.0 / height,
            }
        }
    }

    /// Releases the press; returns whether a drag was in progress.
    pub(crate) fn release(&mut self, now: Instant) -> bool {
        let was_dragging = self.is_dragging(now);
        self.phase = Phase::Released;
        self.press_position = None;
        self.init_point = None;
        was_dragging
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIZE: (u32, u32) = (360, 360);

    #[test]
    fn moves_before_the_debounce_are_ignored() {
        let t0 = Instant::now();
        let mut gesture = GestureController::default();
        gesture.press(t0, (100.0, 100.0), None);
        let early = t0 + Duration::from_millis(10);
        assert_eq!(gesture.moved(early, (150.0, 100.0), SIZE, false), DragAction::None);
        assert!(!gesture.release(early));
    }

    #[test]
    fn background_drag_reorients_with_y_up() {
        let t0 = Instant::now();
        let mut gesture = GestureController::default();
        gesture.press(t0, (100.0, 100.0), None);
        let later = t0 + Duration::from_millis(60);
        assert_eq!(
            gesture.moved(later, (110.0, 95.0), SIZE, false),
            DragAction::Reorient {
                delta_x: 10.0,
                delta_y: 5.0
            }
        );
        assert_eq!(
            gesture.moved(later, (110.0, 95.0), SIZE, false),
            DragAction::Reorient {
                delta_x: 0.0,
                delta_y: 0.0
            }
        );
        assert!(gesture.release(later));
    }

    #[test]
    fn layer_turn_waits_for_min_move() {
        let t0 = Instant::now();
        let mut gesture = GestureController::default();
        gesture.press(t0, (100.0, 100.0), Some(Point3::origin()));
        let later = t0 + Duration::from_millis(60);
        assert_eq!(gesture.moved(later, (103.0, 100.0), SIZE, true), DragAction::None);
        assert_eq!(gesture.moved(later, (106.0, 100.0), SIZE, true), DragAction::TryLayerTurn);
        assert_eq!(gesture.init_point(), Some(Point3::origin()));
    }

    #[test]
    fn one_layer_turn_per_drag() {
        let t0 = Instant::now();
        let mut gesture = GestureController::default();
        gesture.press(t0, (100.0, 100.0), Some(Point3::origin()));
        let later = t0 + Duration::from_millis(60);
        assert_eq!(gesture.moved(later, (120.0, 100.0), SIZE, true), DragAction::TryLayerTurn);
        gesture.layer_turned();
        assert_eq!(gesture.moved(later, (160.0, 100.0), SIZE, true), DragAction::None);
        assert_eq!(gesture.moved(later, (160.0, 140.0), SIZE, false), DragAction::None);
        assert!(gesture.release(later));

        gesture.press(later, (100.0, 100.0), Some(Point3::origin()));
        let again = later + Duration::from_millis(60);
        assert_eq!(gesture.moved(again, (120.0, 100.0), SIZE, true), DragAction::TryLayerTurn);
    }

    #[test]
    fn release_without_press_reports_no_drag() {
        let mut gesture = GestureController::default();
        assert!(!gesture.release(Instant::now()));
    }
}
