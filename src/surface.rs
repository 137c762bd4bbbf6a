//! The rendering surface the player draws its off-screen passes through.
//!
//! [`RenderSurface`] is the narrow interface the engine needs from a graphics
//! backend: render targets, uploaded meshes, flat-colored draws and pixel
//! reads. [`SoftwareSurface`] implements it on the CPU by recording every
//! drawn triangle in normalized device coordinates and ray casting on reads.

use std::collections::HashMap;

use nalgebra::{Matrix4, Point3, Vector4};

use crate::error::SurfaceError;
use crate::mesh::Mesh;
use crate::ray_casting::{Ray, nearest_hit, pixel_to_ndc};

/// Color every target is cleared to
pub(crate) const CLEAR_COLOR: [u8; 4] = [255, 255, 255, 255];

/// Handle to an off-screen render target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct TargetId(usize);

/// Handle to a mesh uploaded to a surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct MeshHandle(usize);

pub(crate) trait RenderSurface {
    fn create_render_target(&mut self, width: u32, height: u32) -> Result<TargetId, SurfaceError>;

    /// Changes the size of an existing target, discarding its contents.
    fn resize_render_target(&mut self, target: TargetId, width: u32, height: u32) -> Result<(), SurfaceError>;

    fn upload_mesh(&mut self, mesh: &Mesh) -> MeshHandle;

    fn clear(&mut self, target: TargetId);

    /// Draws `mesh` into `target` with a single flat color.
    ///
    /// `transform` maps mesh space to clip space.
    fn bind_and_draw(&mut self, target: TargetId, mesh: MeshHandle, transform: &Matrix4<f32>, color: &Vector4<f32>);

    /// RGBA of the pixel at `(x, y)`, measured from the bottom-left corner.
    fn read_pixel(&self, target: TargetId, x: u32, y: u32) -> [u8; 4];
}

/// Converts a normalized color to bytes.
pub(crate) fn color_to_bytes(color: &Vector4<f32>) -> [u8; 4] {
    color.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8).into()
}

#[derive(Debug, Default)]
struct SoftwareTarget {
    width: u32,
    height: u32,
    triangles: Vec<[Point3<f32>; 3]>,
    colors: Vec<[u8; 4]>,
}

/// CPU implementation of [`RenderSurface`].
#[derive(Debug, Default)]
pub(crate) struct SoftwareSurface {
    targets: HashMap<TargetId, SoftwareTarget>,
    meshes: Vec<Mesh>,
    next_target: usize,
}

impl SoftwareSurface {
    pub(crate) fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl SoftwareSurface {
    pub(crate) fn target_size(&self, target: TargetId) -> Option<(u32, u32)> {
        self.targets.get(&target).map(|t| (t.width, t.height))
    }

    /// Number of triangles drawn into `target` since it was last cleared.
    pub(crate) fn triangle_count(&self, target: TargetId) -> usize {
        self.targets.get(&target).map_or(0, |t| t.triangles.len())
    }
}

/// Transforms a point to normalized device coordinates, dropping points
/// behind the eye.
fn to_ndc(transform: &Matrix4<f32>, point: &Point3<f32>) -> Option<Point3<f32>> {
    let clip = transform * point.to_homogeneous();
    (clip.w > 0.0).then(|| Point3::new(clip.x / clip.w, clip.y / clip.w, clip.z / clip.w))
}

impl RenderSurface for SoftwareSurface {
    fn create_render_target(&mut self, width: u32, height: u32) -> Result<TargetId, SurfaceError> {
        if width == 0 || height == 0 {
            return Err(SurfaceError::EmptyTarget { width, height });
        }
        let id = TargetId(self.next_target);
        self.next_target += 1;
        self.targets.insert(
            id,
            SoftwareTarget {
                width,
                height,
                ..SoftwareTarget::default()
            },
        );
        Ok(id)
    }

    fn resize_render_target(&mut self, target: TargetId, width: u32, height: u32) -> Result<(), SurfaceError> {
        if width == 0 || height == 0 {
            return Err(SurfaceError::EmptyTarget { width, height });
        }
        let t = self
            .targets
            .get_mut(&target)
            .ok_or(SurfaceError::UnknownTarget(target.0))?;
        *t = SoftwareTarget {
            width,
            height,
            ..SoftwareTarget::default()
        };
        Ok(())
    }

    fn upload_mesh(&mut self, mesh: &Mesh) -> MeshHandle {
        self.meshes.push(mesh.clone());
        MeshHandle(self.meshes.len() - 1)
    }

    fn clear(&mut self, target: TargetId) {
        if let Some(t) = self.targets.get_mut(&target) {
            t.triangles.clear();
            t.colors.clear();
        }
    }

    fn bind_and_draw(&mut self, target: TargetId, mesh: MeshHandle, transform: &Matrix4<f32>, color: &Vector4<f32>) {
        let Some(mesh) = self.meshes.get(mesh.0) else {
            log::warn!("draw with unknown mesh {mesh:?}");
            return;
        };
        let Some(t) = self.targets.get_mut(&target) else {
            log::warn!("draw into unknown target {target:?}");
            return;
        };
        let bytes = color_to_bytes(color);
        for triangle in mesh.triangles() {
            let [a, b, c] = triangle.map(|v| to_ndc(transform, &v));
            if let (Some(a), Some(b), Some(c)) = (a, b, c) {
                t.triangles.push([a, b, c]);
                t.colors.push(bytes);
            }
        }
    }

    fn read_pixel(&self, target: TargetId, x: u32, y: u32) -> [u8; 4] {
        let Some(t) = self.targets.get(&target) else {
            log::warn!("read from unknown target {target:?}");
            return CLEAR_COLOR;
        };
        if x >= t.width || y >= t.height {
            return CLEAR_COLOR;
        }
        let (ndc_x, ndc_y) = pixel_to_ndc(x, y, t.width, t.height);
        nearest_hit(&Ray::through_ndc(ndc_x, ndc_y), &t.triangles).map_or(CLEAR_COLOR, |(i, _)| t.colors[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh;

    #[test]
    fn empty_targets_are_rejected() {
        let mut surface = SoftwareSurface::new();
        assert_eq!(
            surface.create_render_target(0, 10),
            Err(SurfaceError::EmptyTarget { width: 0, height: 10 })
        );
    }

    #[test]
    fn cleared_target_reads_white() {
        let mut surface = SoftwareSurface::new();
        let target = surface.create_render_target(4, 4).unwrap();
        surface.clear(target);
        assert_eq!(surface.read_pixel(target, 1, 1), CLEAR_COLOR);
        assert_eq!(surface.read_pixel(target, 9, 9), CLEAR_COLOR);
    }

    #[test]
    fn nearer_geometry_wins() {
        let mut surface = SoftwareSurface::new();
        let target = surface.create_render_target(8, 8).unwrap();
        let cube = surface.upload_mesh(&mesh::cube());
        let scale = Matrix4::new_scaling(0.5);
        let far = Matrix4::new_translation(&nalgebra::Vector3::new(0.0, 0.0, 0.4)) * scale;
        let near = Matrix4::new_translation(&nalgebra::Vector3::new(0.0, 0.0, -0.4)) * scale;

        surface.clear(target);
        surface.bind_and_draw(target, cube, &far, &Vector4::new(1.0, 0.0, 0.0, 1.0));
        surface.bind_and_draw(target, cube, &near, &Vector4::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(surface.triangle_count(target), 24);
        assert_eq!(surface.read_pixel(target, 4, 4), [0, 0, 255, 255]);
        // outside both cubes
        assert_eq!(surface.read_pixel(target, 0, 0), CLEAR_COLOR);
    }

    #[test]
    fn resizing_discards_contents() {
        let mut surface = SoftwareSurface::new();
        let target = surface.create_render_target(8, 8).unwrap();
        let cube = surface.upload_mesh(&mesh::cube());
        surface.bind_and_draw(target, cube, &Matrix4::new_scaling(0.5), &Vector4::new(1.0, 0.0, 0.0, 1.0));
        surface.resize_render_target(target, 16, 4).unwrap();
        assert_eq!(surface.target_size(target), Some((16, 4)));
        assert_eq!(surface.triangle_count(target), 0);
    }

    #[test]
    fn colors_round_to_the_nearest_byte() {
        assert_eq!(color_to_bytes(&Vector4::new(1.0 / 3.0, 2.0 / 3.0, 0.5, 1.0)), [85, 170, 128, 255]);
    }
}
