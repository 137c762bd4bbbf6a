//! Off-screen normals pass.
//!
//! A cube enclosing the whole puzzle is drawn with one flat color per face.
//! The color under the cursor tells which outward face normal, in cube space,
//! was clicked.

use nalgebra::{Matrix4, Vector3, Vector4};

use crate::error::SurfaceError;
use crate::mesh::{self, CUBE_FACES};
use crate::surface::{MeshHandle, RenderSurface, TargetId};

/// Scale of the normals cube so it coincides with the puzzle's outer surface
pub(crate) const NORMALS_CUBE_SCALE: f32 = 3.0;

/// Face colors, in [`CUBE_FACES`] order (+X, -X, +Y, -Y, +Z, -Z)
#[rustfmt::skip]
pub(crate) const FACE_COLORS: [[f32; 3]; 6] = [
    [1.0, 0.5, 0.0], // orange
    [0.0, 0.0, 1.0], // blue
    [1.0, 1.0, 0.0], // yellow
    [0.0, 0.0, 0.0], // black
    [1.0, 0.0, 0.0], // red
    [0.0, 1.0, 0.0], // green
];

/// Maps a normals-pass pixel to the face normal it encodes.
///
/// Channels are compared after rounding to one decimal, so slight blending
/// at face borders still resolves.
pub(crate) fn color_to_normal(pixel: [u8; 4]) -> Option<Vector3<f32>> {
    let tenths = |c: u8| (f32::from(c) / 255.0 * 10.0).round() as i32;
    let rgb = [tenths(pixel[0]), tenths(pixel[1]), tenths(pixel[2])];
    FACE_COLORS
        .iter()
        .zip(CUBE_FACES)
        .find(|(color, _)| color.map(|c| (c * 10.0).round() as i32) == rgb)
        .map(|(_, (normal, _))| Vector3::from(normal))
}

#[derive(Debug)]
pub(crate) struct NormalsCube {
    target: TargetId,
    faces: Vec<MeshHandle>,
}

impl NormalsCube {
    pub(crate) fn new<S: RenderSurface>(surface: &mut S, width: u32, height: u32) -> Result<Self, SurfaceError> {
        let target = surface.create_render_target(width, height)?;
        let faces = (0..CUBE_FACES.len())
            .map(|i| surface.upload_mesh(&mesh::cube_face(i)))
            .collect();
        Ok(Self { target, faces })
    }

    pub(crate) fn target(&self) -> TargetId {
        self.target
    }

    /// Redraws the pass; `view_projection` includes the world rotation.
    pub(crate) fn render<S: RenderSurface>(&self, surface: &mut S, view_projection: &Matrix4<f32>) {
        surface.clear(self.target);
        let transform = view_projection * Matrix4::new_scaling(NORMALS_CUBE_SCALE);
        for (&face, [r, g, b]) in self.faces.iter().zip(FACE_COLORS) {
            surface.bind_and_draw(self.target, face, &transform, &Vector4::new(r, g, b, 1.0));
        }
    }

    /// Face normal under `(x, y)`, or `None` off the cube.
    pub(crate) fn normal_at<S: RenderSurface>(&self, surface: &S, x: u32, y: u32) -> Option<Vector3<f32>> {
        color_to_normal(surface.read_pixel(self.target, x, y))
    }
}
