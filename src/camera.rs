use nalgebra::{Matrix4, Point3, Vector3};

use crate::math::{rotation_about, rotation_x, rotation_y};

/// Distance of the eye from the cube center, on the -Z side
const EYE_DISTANCE: f32 = 17.0;

/// Vertical field of view in radians
const PROJECTION_FOVY: f32 = 0.65;

#[derive(Clone, Debug)]
pub(crate) struct Camera {
    pub(crate) eye: Point3<f32>,
    pub(crate) target: Point3<f32>,
    pub(crate) up: Vector3<f32>,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Point3::new(0.0, 0.0, -EYE_DISTANCE),
            target: Point3::origin(),
            up: Vector3::y(),
        }
    }
}

impl Camera {
    pub(crate) fn build_view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.eye, &self.target, &self.up)
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Projection {
    pub(crate) aspect: f32,
    pub(crate) fovy: f32,
    pub(crate) znear: f32,
    pub(crate) zfar: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            aspect: 1.0,
            fovy: PROJECTION_FOVY,
            znear: 0.1,
            zfar: 100.0,
        }
    }
}

impl Projection {
    pub(crate) fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub(crate) fn build_projection_matrix(&self) -> Matrix4<f32> {
        Matrix4::new_perspective(self.aspect, self.fovy, self.znear, self.zfar)
    }
}

/// Fixed orientations selectable from the keyboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ViewPreset {
    Perspective,
    Left,
    Right,
    Top,
    Bottom,
    Back,
    Front,
}

impl ViewPreset {
    pub(crate) fn from_key(key: char) -> Option<Self> {
        match key {
            ' ' => Some(ViewPreset::Perspective),
            'a' => Some(ViewPreset::Left),
            'd' => Some(ViewPreset::Right),
            'e' => Some(ViewPreset::Top),
            'q' => Some(ViewPreset::Bottom),
            's' => Some(ViewPreset::Back),
            'w' => Some(ViewPreset::Front),
            _ => None,
        }
    }

    pub(crate) fn rotation(self) -> Matrix4<f32> {
        match self {
            ViewPreset::Perspective => rotation_x(30.0) * rotation_y(-50.0),
            ViewPreset::Left => rotation_y(-90.0),
            ViewPreset::Right => rotation_y(90.0),
            ViewPreset::Top => rotation_x(90.0),
            ViewPreset::Bottom => rotation_x(-90.0),
            ViewPreset::Back => rotation_y(180.0),
            ViewPreset::Front => Matrix4::identity(),
        }
    }
}

/// Owns the world rotation applied between the camera and the cube.
#[derive(Clone, Debug)]
pub(crate) struct CameraController {
    pub(crate) rotation: Matrix4<f32>,
}

impl Default for CameraController {
    fn default() -> Self {
        Self {
            rotation: ViewPreset::Perspective.rotation(),
        }
    }
}

impl CameraController {
    pub(crate) fn apply_preset(&mut self, preset: ViewPreset) {
        self.rotation = preset.rotation();
    }

    /// Trackball rotation from a drag already scaled to degrees.
    ///
    /// `delta_y` grows upward. The new rotation is applied in view space, on
    /// top of the current one.
    pub(crate) fn process_drag(&mut self, delta_x: f32, delta_y: f32) {
        let degrees = (delta_x * delta_x + delta_y * delta_y).sqrt();
        if degrees == 0.0 {
            return;
        }
        let axis = Vector3::new(-delta_y, -delta_x, 0.0);
        self.rotation = rotation_about(&axis, degrees).to_homogeneous() * self.rotation;
    }

    /// View matrix including the world rotation.
    pub(crate) fn model_view(&self, camera: &Camera) -> Matrix4<f32> {
        camera.build_view_matrix() * self.rotation
    }
}
