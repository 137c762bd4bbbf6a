//! The player: puzzle engine, camera, gesture handling and off-screen passes
//! behind one interface.
//!
//! The application shell forwards pointer events, key presses and frame ticks
//! here; everything else about the cube happens inside.

use std::time::Instant;

use nalgebra::{Matrix4, Point3, Vector3};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::camera::{Camera, CameraController, Projection, ViewPreset};
use crate::config::PlayerConfig;
use crate::error::StartError;
use crate::gesture::{DragAction, GestureController};
use crate::input::{InputHandler, MouseButton, MouseEvent};
use crate::math::unproject;
use crate::normals::NormalsCube;
use crate::notation::Algorithm;
use crate::picking::PickingLayer;
use crate::puzzle::{PlaybackEvent, RubiksCube, TurnState, infer_rotation_axis};
use crate::scene::{RenderMode, SceneMeshes, ScreenQuad};
use crate::scramble::{default_length, scramble};
use crate::surface::RenderSurface;

/// Off-screen passes and the surface they live on.
#[derive(Debug)]
struct Passes<S> {
    surface: S,
    picking: PickingLayer,
    normals: NormalsCube,
}

#[derive(Debug)]
pub(crate) struct Player<S: RenderSurface> {
    config: PlayerConfig,
    cube: RubiksCube,
    camera: Camera,
    controller: CameraController,
    projection: Projection,
    gesture: GestureController,
    meshes: SceneMeshes,
    rng: StdRng,
    width: u32,
    height: u32,
    passes: Option<Passes<S>>,
    last_scramble: Option<String>,
}

impl<S: RenderSurface> Player<S> {
    pub(crate) fn new(config: PlayerConfig, width: u32, height: u32) -> Self {
        let rng = config.seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        let mut projection = Projection::default();
        projection.resize(width, height);
        let mut player = Self {
            config,
            cube: RubiksCube::new(),
            camera: Camera::default(),
            controller: CameraController::default(),
            projection,
            gesture: GestureController::default(),
            meshes: SceneMeshes::default(),
            rng,
            width,
            height,
            passes: None,
            last_scramble: None,
        };
        player.reset();
        player
    }

    /// Binds the player to a rendering surface and resets the cube.
    ///
    /// Fails when the surface cannot provide the off-screen targets; the
    /// player then keeps running without picking.
    pub(crate) fn start(&mut self, mut surface: S) -> Result<(), StartError> {
        if self.passes.is_some() {
            return Err(StartError::AlreadyStarted);
        }
        let passes = PickingLayer::new(&mut surface, self.width, self.height).and_then(|picking| {
            let normals = NormalsCube::new(&mut surface, self.width, self.height)?;
            Ok((picking, normals))
        });
        let (picking, normals) = match passes {
            Ok(passes) => passes,
            Err(err) => {
                log::error!("cannot start player: {err}");
                return Err(err.into());
            }
        };
        self.passes = Some(Passes {
            surface,
            picking,
            normals,
        });
        log::info!("player started at {}x{}", self.width, self.height);
        self.reset();
        Ok(())
    }

    pub(crate) fn is_started(&self) -> bool {
        self.passes.is_some()
    }

    pub(crate) fn cube(&self) -> &RubiksCube {
        &self.cube
    }

    pub(crate) fn last_scramble(&self) -> Option<&str> {
        self.last_scramble.as_deref()
    }

    /// Rebuilds the cube, reapplies the sticker pattern and plays the
    /// configured setup moves without animation.
    pub(crate) fn reset(&mut self) {
        self.cube = RubiksCube::new();
        self.cube.set_stickers(self.config.sticker_pattern());
        self.controller.apply_preset(ViewPreset::Perspective);
        self.gesture = GestureController::default();
        self.last_scramble = None;

        let setup = self.config.setup_moves();
        if !setup.is_empty() {
            log::debug!("setting up with {setup}");
            self.cube.set_initializing(true);
            self.cube.perform(setup);
        }
    }

    /// Starts an animated scramble of `length` moves (or the configured
    /// length) and returns it in canonical notation.
    ///
    /// Returns `None` while another algorithm is playing.
    pub(crate) fn scramble(&mut self, length: Option<usize>) -> Option<String> {
        if self.cube.is_busy() {
            log::debug!("scramble rejected: cube is busy");
            return None;
        }
        let length = match length.or(self.config.scramble_length) {
            Some(length) => length,
            None => default_length(&mut self.rng),
        };
        let alg = scramble(&mut self.rng, length);
        self.cube.set_initializing(false);
        let text = alg.to_string();
        if !self.cube.perform(alg) {
            return None;
        }
        log::info!("scramble: {text}");
        self.last_scramble = Some(text.clone());
        Some(text)
    }

    pub(crate) fn parse_algorithm(text: &str) -> Algorithm {
        Algorithm::parse(text)
    }

    /// Queues moves for animated playback; `false` if rejected.
    pub(crate) fn do_algorithm(&mut self, alg: impl Into<Algorithm>) -> bool {
        self.cube.perform(alg.into())
    }

    /// Reserved for single-stepping through an algorithm; does nothing yet.
    pub(crate) fn step_forward(&mut self) {
        log::trace!("step forward requested");
    }

    /// Advances the animation by one frame.
    pub(crate) fn tick(&mut self, now: Instant) -> Vec<PlaybackEvent> {
        self.gesture.is_dragging(now);
        self.cube.update();
        let events = self.cube.drain_events();
        for event in &events {
            log::debug!("{event:?}");
        }
        events
    }

    pub(crate) fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 || (width, height) == (self.width, self.height) {
            return;
        }
        self.width = width;
        self.height = height;
        self.projection.resize(width, height);
        if let Some(passes) = self.passes.as_mut() {
            for target in [passes.picking.target(), passes.normals.target()] {
                if let Err(err) = passes.surface.resize_render_target(target, width, height) {
                    log::error!("cannot resize render target: {err}");
                }
            }
        }
    }

    /// View matrix including the world rotation.
    fn model_view(&self) -> Matrix4<f32> {
        self.controller.model_view(&self.camera)
    }

    fn view_projection(&self) -> Matrix4<f32> {
        self.projection.build_projection_matrix() * self.model_view()
    }

    /// Redraws both off-screen passes from the current state.
    fn refresh_passes(&mut self) {
        let view_projection = self.view_projection();
        if let Some(p) = self.passes.as_mut() {
            p.picking.render(&mut p.surface, self.cube.cubies(), &view_projection);
            p.normals.render(&mut p.surface, &view_projection);
        }
    }

    /// Object-space point on the near plane under a bottom-left pixel.
    fn screen_to_object(&self, x: u32, y: u32) -> Option<Point3<f32>> {
        unproject(
            &Vector3::new(x as f32, y as f32, 0.0),
            &self.model_view(),
            &self.projection.build_projection_matrix(),
            [0.0, 0.0, self.width as f32, self.height as f32],
        )
    }

    /// Tries to start turning the selected layer in the drag direction.
    fn try_layer_turn(&mut self, event: &MouseEvent) -> bool {
        if self.cube.is_busy() || !self.config.playable {
            return false;
        }
        let (x, y) = event.relative_position(self.height);
        let (Some(init), Some(current)) = (self.gesture.init_point(), self.screen_to_object(x, y)) else {
            return false;
        };
        let Some(direction) = (current - init).try_normalize(f32::EPSILON) else {
            return false;
        };
        let Some(passes) = self.passes.as_ref() else {
            return false;
        };
        let Some(normal) = passes.normals.normal_at(&passes.surface, x, y) else {
            log::debug!("drag left the cube at ({x}, {y})");
            return false;
        };
        let Some((axis, constant)) = infer_rotation_axis(&normal, &direction) else {
            log::debug!("no rotation axis for normal {normal:?} and drag {direction:?}");
            return false;
        };
        self.cube.begin_gesture_turn(axis, constant)
    }

    /// Quads for the canvas in a `size` pixel area.
    ///
    /// Nothing is drawn while setup moves are still being applied.
    pub(crate) fn screen_quads(&self, mode: RenderMode, size: (f32, f32)) -> Vec<ScreenQuad> {
        if self.cube.is_initializing() {
            return Vec::new();
        }
        let mut projection = self.projection;
        projection.aspect = size.0.max(1.0) / size.1.max(1.0);
        self.meshes.build(
            mode,
            self.cube.cubies(),
            &self.config.color_scheme,
            self.model_view(),
            &projection.build_projection_matrix(),
            size,
        )
    }
}

impl<S: RenderSurface> InputHandler for Player<S> {
    fn start_rotate(&mut self, event: &MouseEvent, now: Instant) -> bool {
        if event.button != MouseButton::Left || !self.is_started() {
            return false;
        }
        self.refresh_passes();
        let (x, y) = event.relative_position(self.height);
        let hit = self
            .passes
            .as_ref()
            .and_then(|p| p.picking.select(&p.surface, x, y));
        log::trace!("pressed ({x}, {y}) on {hit:?}");
        self.cube.select(hit);
        let init = self.screen_to_object(x, y);
        self.gesture.press(now, (event.x, event.y), init);
        true
    }

    fn rotate(&mut self, event: &MouseEvent, now: Instant) -> bool {
        let has_selection = self.cube.selected_cubie().is_some();
        match self
            .gesture
            .moved(now, (event.x, event.y), (self.width, self.height), has_selection)
        {
            DragAction::None => false,
            DragAction::Reorient { delta_x, delta_y } => {
                self.controller.process_drag(delta_x, delta_y);
                true
            }
            DragAction::TryLayerTurn => {
                if self.cube.state() == TurnState::LayerSelected && self.try_layer_turn(event) {
                    self.gesture.layer_turned();
                }
                true
            }
        }
    }

    fn end_rotate(&mut self, event: &MouseEvent, now: Instant) -> bool {
        if event.button != MouseButton::Left {
            return false;
        }
        let dragged = self.gesture.release(now);
        self.cube.select(None);
        if !dragged {
            return false;
        }
        self.cube.alg_done();
        true
    }

    fn toggle_perspective(&mut self, key: char) -> bool {
        let Some(preset) = ViewPreset::from_key(key) else {
            return false;
        };
        self.controller.apply_preset(preset);
        true
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use approx::assert_relative_eq;
    use nalgebra::Vector4;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::config::PlaybackMode;
    use crate::cube::ColorScheme;
    use crate::error::SurfaceError;
    use crate::surface::SoftwareSurface;

    const SIZE: u32 = 400;

    fn started(config: PlayerConfig) -> Player<SoftwareSurface> {
        let mut player = Player::new(config, SIZE, SIZE);
        player.start(SoftwareSurface::new()).unwrap();
        player
    }

    fn seeded() -> PlayerConfig {
        PlayerConfig {
            seed: Some(42),
            ..PlayerConfig::default()
        }
    }

    fn run_until_idle(player: &mut Player<SoftwareSurface>, now: Instant) -> Vec<PlaybackEvent> {
        let mut events = Vec::new();
        for _ in 0..10_000 {
            if !player.cube().is_busy() {
                return events;
            }
            events.extend(player.tick(now));
        }
        panic!("player never went idle");
    }

    fn left(x: f32, y: f32) -> MouseEvent {
        MouseEvent::new(x, y, MouseButton::Left)
    }

    #[test]
    fn empty_surface_fails_to_start() {
        let mut player = Player::new(seeded(), 0, 0);
        assert_eq!(
            player.start(SoftwareSurface::new()),
            Err(StartError::RendererUnavailable(SurfaceError::EmptyTarget {
                width: 0,
                height: 0
            }))
        );
        assert!(!player.is_started());
    }

    #[test]
    fn starting_twice_is_rejected() {
        let mut player = started(seeded());
        assert_eq!(player.start(SoftwareSurface::new()), Err(StartError::AlreadyStarted));
    }

    #[test]
    fn pressing_the_front_center_selects_its_cubie() {
        let mut player = started(seeded());
        assert!(player.toggle_perspective('w'));
        assert!(player.start_rotate(&left(200.0, 200.0), Instant::now()));
        assert_eq!(player.cube().selected_cubie(), Some([1, 1, 0]));
        assert_eq!(player.cube().state(), TurnState::LayerSelected);
    }

    #[test]
    fn dragging_a_cubie_turns_its_layer() {
        let mut player = started(seeded());
        player.toggle_perspective('w');
        let t0 = Instant::now();
        player.start_rotate(&left(200.0, 200.0), t0);
        let later = t0 + Duration::from_millis(100);
        assert!(player.rotate(&left(240.0, 200.0), later));
        assert_eq!(player.cube().state(), TurnState::Rotating);

        run_until_idle(&mut player, later);
        assert!(player.end_rotate(&left(240.0, 200.0), later));
        assert_eq!(player.cube().state(), TurnState::Idle);
        assert_ne!(player.cube().snapshot(), RubiksCube::new().snapshot());
    }

    #[test]
    fn drag_keeps_its_cubie_after_the_layer_turn() {
        let mut player = started(seeded());
        player.toggle_perspective('w');
        let t0 = Instant::now();
        player.start_rotate(&left(200.0, 200.0), t0);
        let later = t0 + Duration::from_millis(100);
        player.rotate(&left(240.0, 200.0), later);
        assert!(player.cube().is_rotating());
        run_until_idle(&mut player, later);

        let view = player.controller.rotation;
        let turned = player.cube().snapshot();
        assert!(!player.rotate(&left(280.0, 200.0), later));
        assert_eq!(player.cube().selected_cubie(), Some([1, 1, 0]));
        assert_eq!(player.controller.rotation, view);
        assert!(!player.cube().is_rotating());
        assert_eq!(player.cube().snapshot(), turned);

        player.end_rotate(&left(280.0, 200.0), later);
        assert_eq!(player.cube().selected_cubie(), None);
    }

    #[test]
    fn press_during_playback_keeps_its_selection() {
        let mut player = started(seeded());
        player.toggle_perspective('w');
        let t0 = Instant::now();
        assert!(player.do_algorithm("R U"));
        player.tick(t0);
        assert!(player.start_rotate(&left(200.0, 200.0), t0));
        assert_eq!(player.cube().selected_cubie(), Some([1, 1, 0]));

        let later = t0 + Duration::from_millis(100);
        player.rotate(&left(240.0, 200.0), later);
        assert_eq!(player.controller.rotation, Matrix4::identity());
        run_until_idle(&mut player, later);
        assert_eq!(player.cube().selected_cubie(), Some([1, 1, 0]));
        assert_eq!(player.controller.rotation, Matrix4::identity());
    }

    #[test]
    fn unplayable_cube_ignores_layer_drags() {
        let mut player = started(PlayerConfig {
            playable: false,
            ..seeded()
        });
        player.toggle_perspective('w');
        let t0 = Instant::now();
        player.start_rotate(&left(200.0, 200.0), t0);
        player.rotate(&left(240.0, 200.0), t0 + Duration::from_millis(100));
        assert!(!player.cube().is_rotating());
    }

    #[test]
    fn background_drag_reorients_the_cube() {
        let mut player = started(seeded());
        player.toggle_perspective('w');
        let t0 = Instant::now();
        player.start_rotate(&left(2.0, 2.0), t0);
        assert_eq!(player.cube().selected_cubie(), None);
        assert!(player.rotate(&left(30.0, 2.0), t0 + Duration::from_millis(100)));
        assert_ne!(player.controller.rotation, Matrix4::identity());
        assert!(!player.cube().is_rotating());
    }

    #[test]
    fn moves_before_the_debounce_do_nothing() {
        let mut player = started(seeded());
        player.toggle_perspective('w');
        let t0 = Instant::now();
        player.start_rotate(&left(200.0, 200.0), t0);
        assert!(!player.rotate(&left(240.0, 200.0), t0 + Duration::from_millis(10)));
        assert!(!player.cube().is_rotating());
    }

    #[test]
    fn right_button_is_ignored() {
        let mut player = started(seeded());
        let event = MouseEvent::new(200.0, 200.0, MouseButton::Right);
        assert!(!player.start_rotate(&event, Instant::now()));
    }

    #[test]
    fn scramble_is_rejected_while_playing() {
        let mut player = started(PlayerConfig {
            scramble_length: Some(12),
            ..seeded()
        });
        let text = player.scramble(None).unwrap();
        assert_eq!(text.split(' ').count(), 12);
        assert_eq!(player.last_scramble(), Some(text.as_str()));
        assert_eq!(player.scramble(None), None);
        assert!(!player.do_algorithm("R"));

        let events = run_until_idle(&mut player, Instant::now());
        assert_eq!(events, vec![PlaybackEvent::AlgorithmDone]);
        assert!(player.scramble(None).is_some());
    }

    #[test]
    fn explicit_scramble_length_wins() {
        let mut player = started(PlayerConfig {
            scramble_length: Some(12),
            ..seeded()
        });
        let text = player.scramble(Some(3)).unwrap();
        assert_eq!(text.split(' ').count(), 3);
    }

    #[test]
    fn seeded_scrambles_repeat() {
        let mut a = started(seeded());
        let mut b = started(seeded());
        assert_eq!(a.scramble(None), b.scramble(None));
    }

    #[test]
    fn solver_reset_shows_the_unsolved_state() {
        let mut player = started(PlayerConfig {
            alg: "R U R' U'".to_string(),
            ..seeded()
        });
        let now = Instant::now();
        run_until_idle(&mut player, now);
        assert!(!player.cube().is_initializing());
        assert_ne!(player.cube().snapshot(), RubiksCube::new().snapshot());

        assert!(player.do_algorithm(Player::<SoftwareSurface>::parse_algorithm("R U R' U'")));
        run_until_idle(&mut player, now);
        assert_eq!(player.cube().snapshot(), RubiksCube::new().snapshot());
    }

    #[test]
    fn plain_reset_plays_the_init_script() {
        let mut player = started(PlayerConfig {
            alg: "R".to_string(),
            init_script: "U2".to_string(),
            mode: PlaybackMode::Plain,
            ..seeded()
        });
        run_until_idle(&mut player, Instant::now());
        let mut expected = RubiksCube::new();
        expected.play("U2");
        assert_eq!(player.cube().snapshot(), expected.snapshot());

        player.reset();
        run_until_idle(&mut player, Instant::now());
        assert_eq!(player.cube().snapshot(), expected.snapshot());
    }

    #[test]
    fn resize_keeps_picking_aligned() {
        let mut player = started(seeded());
        player.resize(200, 100);
        player.toggle_perspective('w');
        assert!(player.start_rotate(&left(100.0, 50.0), Instant::now()));
        assert_eq!(player.cube().selected_cubie(), Some([1, 1, 0]));
    }

    #[test]
    fn unknown_keys_keep_the_view() {
        let mut player = started(seeded());
        let before = player.controller.rotation;
        assert!(!player.toggle_perspective('z'));
        assert_eq!(player.controller.rotation, before);
    }

    #[test]
    fn configured_colors_reach_the_canvas() {
        let magenta = Vector4::new(1.0, 0.0, 1.0, 1.0);
        let mut player = started(PlayerConfig {
            color_scheme: ColorScheme {
                green: magenta,
                ..ColorScheme::default()
            },
            ..seeded()
        });
        player.toggle_perspective('w');
        let quads = player.screen_quads(RenderMode::Standard, (400.0, 400.0));
        // the nearest quad is the head-on center sticker of the front face
        let nearest = quads.last().unwrap();
        assert_relative_eq!(nearest.color, magenta, epsilon = 1e-4);
    }

    #[test]
    fn canvas_quads_follow_render_mode() {
        let player = started(seeded());
        let standard = player.screen_quads(RenderMode::Standard, (400.0, 400.0));
        let normals = player.screen_quads(RenderMode::Normals, (400.0, 400.0));
        assert!(standard.len() > normals.len());
        // the perspective preset shows three faces of the normals cube
        assert_eq!(normals.len(), 3);
    }
}
