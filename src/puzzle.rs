//! The puzzle state machine.
//!
//! [`RubiksCube`] owns the 27 cubies, the center map, the rotation session of
//! the turn currently in flight and the queue of moves still to be played. All
//! mutation goes through its methods; the gesture controller and the scene
//! adapter only read its state or request actions.

use std::collections::VecDeque;

use nalgebra::Vector3;

use crate::centers::{CORE, CenterMap, FaceRole, Slice};
use crate::cube::{Color, Cubie, GridIndex, build_grid};
use crate::math::{Axis, MARGIN_OF_ERROR, ease_out_expo, rotation_about, snap_matrix, snap_vector};
use crate::notation::{Algorithm, Face, Move};
use crate::pattern;

/// Nominal per-tick increment of a turn, in degrees
pub(crate) const DEGREES: f32 = 6.0;

/// Smallest per-tick increment of an eased turn, in degrees
const MIN_STEP: f32 = 3.0;

/// Number of cubies in a valid layer
const LAYER_SIZE: usize = 9;

/// Snap threshold for axis inference: a cross-product component at least this
/// large (in magnitude) counts as a unit component.
pub(crate) const AXIS_SNAP_THRESHOLD: f32 = 0.5;

/// Where the turn machinery currently is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TurnState {
    Idle,
    /// A cubie is selected and a rotation axis is still pending
    LayerSelected,
    Rotating,
}

/// Notifications for observers of algorithm playback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PlaybackEvent {
    AlgorithmDone,
}

/// The layer a move turns, before membership is computed.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Layer {
    /// Cubies whose coordinate on `axis` defines the layer
    pub(crate) anchors: Vec<GridIndex>,
    pub(crate) axis: Axis,
    /// Signed rotation axis, already flipped for direction
    pub(crate) rotation: Vector3<f32>,
}

/// State of the turn currently in flight.
#[derive(Clone, Debug)]
struct RotationSession {
    rotated: Vec<GridIndex>,
    axis: Vector3<f32>,
    angle: f32,
    target: f32,
    /// Increment applied by the latest tick
    degrees: f32,
}

/// The puzzle engine.
#[derive(Debug)]
pub(crate) struct RubiksCube {
    cubes: [[[Cubie; 3]; 3]; 3],
    centers: CenterMap,
    /// Cubie picked by the current press
    selected: Option<GridIndex>,
    session: Option<RotationSession>,
    queue: VecDeque<Move>,
    current_move: Option<Move>,
    animating: bool,
    initializing: bool,
    done_pending: bool,
    events: Vec<PlaybackEvent>,
}

impl Default for RubiksCube {
    fn default() -> Self {
        Self::new()
    }
}

impl RubiksCube {
    /// Creates a solved cube with no turn in flight.
    pub(crate) fn new() -> Self {
        Self {
            cubes: build_grid(),
            centers: CenterMap::default(),
            selected: None,
            session: None,
            queue: VecDeque::new(),
            current_move: None,
            animating: false,
            initializing: false,
            done_pending: false,
            events: Vec::new(),
        }
    }

    pub(crate) fn cubie(&self, index: GridIndex) -> &Cubie {
        &self.cubes[index[0]][index[1]][index[2]]
    }

    fn cubie_mut(&mut self, index: GridIndex) -> &mut Cubie {
        &mut self.cubes[index[0]][index[1]][index[2]]
    }

    pub(crate) fn cubies(&self) -> impl Iterator<Item = &Cubie> {
        self.cubes.iter().flatten().flatten()
    }

    pub(crate) fn centers(&self) -> &CenterMap {
        &self.centers
    }

    pub(crate) fn current_move(&self) -> Option<Move> {
        self.current_move
    }

    pub(crate) fn is_rotating(&self) -> bool {
        self.session.is_some()
    }

    pub(crate) fn is_animating(&self) -> bool {
        self.animating
    }

    pub(crate) fn is_initializing(&self) -> bool {
        self.initializing
    }

    pub(crate) fn set_initializing(&mut self, initializing: bool) {
        self.initializing = initializing;
    }

    /// Whether a turn or an algorithm is still playing.
    pub(crate) fn is_busy(&self) -> bool {
        self.is_rotating() || self.animating || !self.queue.is_empty()
    }

    pub(crate) fn state(&self) -> TurnState {
        if self.session.is_some() {
            TurnState::Rotating
        } else if self.selected_cubie().is_some() {
            TurnState::LayerSelected
        } else {
            TurnState::Idle
        }
    }

    pub(crate) fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.events)
    }

    /// Replaces the selection with the cubie under the cursor, if any.
    pub(crate) fn select(&mut self, hit: Option<GridIndex>) {
        self.selected = hit;
    }

    pub(crate) fn selected_cubie(&self) -> Option<GridIndex> {
        self.selected
    }

    /// Resolves a move to the anchors, axis and direction of its layer.
    ///
    /// Anchors are looked up through the center map, so a letter keeps naming
    /// the same logical layer after slice turns have moved the centers.
    pub(crate) fn resolve_layer(&self, mv: &Move) -> Layer {
        let c = &self.centers;
        let left = c.get(FaceRole::Left);
        let right = c.get(FaceRole::Right);
        let up = c.get(FaceRole::Up);
        let down = c.get(FaceRole::Down);
        let front = c.get(FaceRole::Front);
        let back = c.get(FaceRole::Back);
        let core = c.core();

        // "ccw" here means counter-clockwise about the positive axis as seen
        // from the origin, not from the face
        let (anchors, axis, ccw) = match mv.face {
            Face::L => (vec![left], Axis::Z, true),
            Face::R => (vec![right], Axis::Z, false),
            Face::U => (vec![up], Axis::Y, false),
            Face::D => (vec![down], Axis::Y, true),
            Face::F => (vec![front], Axis::X, false),
            Face::B => (vec![back], Axis::X, true),
            Face::M => (vec![core], Axis::Z, true),
            Face::E => (vec![core], Axis::Y, true),
            Face::S => (vec![core], Axis::X, false),
            Face::WideL => (vec![left, core], Axis::Z, true),
            Face::WideR => (vec![right, core], Axis::Z, false),
            Face::WideU => (vec![up, core], Axis::Y, false),
            Face::WideD => (vec![down, core], Axis::Y, true),
            Face::WideF => (vec![front, core], Axis::X, false),
            Face::WideB => (vec![back, core], Axis::X, true),
            Face::X => (vec![left, core, right], Axis::Z, false),
            Face::Y => (vec![up, core, down], Axis::Y, false),
            Face::Z => (vec![front, core, back], Axis::X, false),
        };

        let rotation = if ccw != mv.inverse {
            -axis.unit()
        } else {
            axis.unit()
        };

        Layer {
            anchors,
            axis,
            rotation,
        }
    }

    /// Collects every cubie sharing an anchor's coordinate on `axis`.
    ///
    /// Returns `None` when the result is not a whole layer.
    pub(crate) fn compute_rotated_set(&self, anchors: &[GridIndex], axis: Axis) -> Option<Vec<GridIndex>> {
        let i = axis.index();
        let mut rotated = Vec::new();
        for &anchor in anchors {
            let value = self.cubie(anchor).coordinates[i];
            rotated.extend(
                self.cubies()
                    .filter(|c| (c.coordinates[i] - value).abs() < MARGIN_OF_ERROR)
                    .map(Cubie::index),
            );
        }
        (rotated.len() >= LAYER_SIZE).then_some(rotated)
    }

    /// Starts turning the layer through `anchors`.
    ///
    /// Returns `false`, leaving the cube untouched, when a turn is already in
    /// flight or the anchors do not resolve to a layer.
    fn begin_turn(&mut self, anchors: &[GridIndex], axis: Axis, rotation: Vector3<f32>, count: u8) -> bool {
        if self.session.is_some() {
            return false;
        }
        let Some(rotated) = self.compute_rotated_set(anchors, axis) else {
            log::debug!("anchors {anchors:?} do not span a layer on {axis:?}");
            return false;
        };

        if rotated.contains(&CORE) {
            let slice = match axis {
                Axis::X => Slice::S,
                Axis::Y => Slice::E,
                Axis::Z => Slice::M,
            };
            let sum = rotation.x + rotation.y + rotation.z;
            let inverse = match slice {
                Slice::M | Slice::E => sum > 0.0,
                Slice::S => sum < 0.0,
            };
            for _ in 0..count {
                self.centers.relabel(slice, inverse);
            }
        }

        self.session = Some(RotationSession {
            rotated,
            axis: rotation,
            angle: 0.0,
            target: 90.0 * f32::from(count),
            degrees: DEGREES,
        });
        true
    }

    /// Starts playing a single move.
    pub(crate) fn apply_move(&mut self, mv: Move) -> bool {
        if self.session.is_some() {
            return false;
        }
        let layer = self.resolve_layer(&mv);
        let started = self.begin_turn(&layer.anchors, layer.axis, layer.rotation, mv.count);
        if started {
            self.current_move = Some(mv);
        }
        started
    }

    /// Starts a quarter turn of the selected cubie's layer about an axis
    /// inferred from a drag gesture.
    pub(crate) fn begin_gesture_turn(&mut self, rotation: Vector3<f32>, axis: Axis) -> bool {
        let Some(selected) = self.selected else {
            return false;
        };
        self.begin_turn(&[selected], axis, rotation, 1)
    }

    /// One animation tick of the turn in flight.
    ///
    /// Rotates the turning layer by the eased increment (never past the
    /// target) and tears the session down once the target angle is reached.
    pub(crate) fn advance(&mut self) {
        let Some(mut session) = self.session.take() else {
            return;
        };

        session.degrees = if self.initializing {
            session.target
        } else {
            MIN_STEP + DEGREES * (1.0 - ease_out_expo(session.angle / session.target))
        };
        let step = session.degrees.min(session.target - session.angle);
        session.angle += step;

        let rotation = rotation_about(&session.axis, step);
        let homogeneous = rotation.to_homogeneous();
        for &index in &session.rotated {
            let cubie = self.cubie_mut(index);
            cubie.coordinates = rotation * cubie.coordinates;
            cubie.orientation = homogeneous * cubie.orientation;
        }

        if session.angle < session.target {
            self.session = Some(session);
            return;
        }

        for &index in &session.rotated {
            let cubie = self.cubie_mut(index);
            cubie.coordinates = snap_vector(&cubie.coordinates);
            cubie.orientation = snap_matrix(&cubie.orientation);
        }
        if self.done_pending && self.queue.is_empty() {
            self.alg_done();
        }
    }

    /// Per-frame update: advances the turn in flight, or dequeues the next
    /// move, or finishes the algorithm once the queue has drained.
    pub(crate) fn update(&mut self) {
        if self.session.is_some() {
            self.advance();
        } else if let Some(mv) = self.queue.pop_front() {
            if !self.apply_move(mv) {
                log::warn!("skipping move {mv}: layer could not be resolved");
            }
        } else if self.animating {
            self.alg_done();
        }
    }

    /// Queues an algorithm for playback.
    ///
    /// Rejected (returns `false`) while another algorithm is still playing.
    pub(crate) fn perform(&mut self, alg: Algorithm) -> bool {
        if alg.is_empty() {
            return false;
        }
        if self.animating {
            log::debug!("ignoring algorithm {alg}: playback in progress");
            return false;
        }
        log::debug!("playing {alg}");
        self.queue.extend(alg);
        self.animating = true;
        true
    }

    /// Marks playback as finished once the turn in flight has settled.
    pub(crate) fn alg_done(&mut self) {
        if !self.queue.is_empty() {
            return;
        }
        if self.session.is_some() {
            self.done_pending = true;
            return;
        }
        self.done_pending = false;
        self.initializing = false;
        self.current_move = None;
        if self.animating {
            self.animating = false;
            self.events.push(PlaybackEvent::AlgorithmDone);
        }
    }

    /// Recolors every sticker from a 54-character pattern.
    pub(crate) fn set_stickers(&mut self, stickers: &str) {
        for cubie in self.cubes.iter_mut().flatten().flatten() {
            let c = snap_vector(&cubie.coordinates);
            let mut faces = Vec::with_capacity(3);
            if c.x == -1.0 {
                faces.push('F');
            } else if c.x == 1.0 {
                faces.push('B');
            }
            if c.y == -1.0 {
                faces.push('U');
            } else if c.y == 1.0 {
                faces.push('D');
            }
            if c.z == -1.0 {
                faces.push('R');
            } else if c.z == 1.0 {
                faces.push('L');
            }

            for sticker in cubie.stickers.iter_mut().take(faces.len()) {
                let name: String = faces.iter().collect();
                sticker.color = pattern::position_index(&name)
                    .map_or(Color::Gray, |index| pattern::color_at(stickers, index));
                faces.rotate_left(1);
            }
        }
    }
}

/// Infers a rotation axis from the surface normal under the cursor and the
/// drag direction.
///
/// The cross product is snapped component-wise to `{-1, 0, 1}` and accepted
/// only if exactly one component survives.
pub(crate) fn infer_rotation_axis(normal: &Vector3<f32>, direction: &Vector3<f32>) -> Option<(Vector3<f32>, Axis)> {
    let cross = normal.cross(direction);
    let snapped = cross.map(|c| {
        if c >= AXIS_SNAP_THRESHOLD {
            1.0
        } else if c <= -AXIS_SNAP_THRESHOLD {
            -1.0
        } else {
            0.0
        }
    });
    if snapped.abs().sum() != 1.0 {
        return None;
    }
    let axis = Axis::ALL.into_iter().find(|a| snapped[a.index()] != 0.0)?;
    Some((snapped, axis))
}

#[cfg(test)]
impl RubiksCube {
    /// Current angle of the turn in flight, in degrees.
    pub(crate) fn rotation_angle(&self) -> f32 {
        self.session.as_ref().map_or(0.0, |s| s.angle)
    }

    /// Runs updates until playback and any turn in flight have finished.
    pub(crate) fn settle(&mut self) {
        for _ in 0..100_000 {
            if !self.is_busy() {
                return;
            }
            self.update();
        }
        panic!("cube never settled");
    }

    /// Plays `alg` to completion in initializing mode.
    pub(crate) fn play(&mut self, alg: &str) {
        self.set_initializing(true);
        assert!(self.perform(Algorithm::parse(alg)) || Algorithm::parse(alg).is_empty());
        self.settle();
    }

    /// Coordinates and orientation of every cubie, in grid order.
    pub(crate) fn snapshot(&self) -> Vec<(Vector3<f32>, nalgebra::Matrix4<f32>)> {
        self.cubies().map(|c| (c.coordinates, c.orientation)).collect()
    }
}
