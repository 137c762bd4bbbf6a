//! Off-screen picking pass.
//!
//! Every cubie is drawn flat in its unique pick color; reading the pixel under
//! the cursor and decoding it identifies the cubie there.

use nalgebra::Matrix4;

use crate::cube::{Cubie, GridIndex};
use crate::error::SurfaceError;
use crate::mesh;
use crate::surface::{CLEAR_COLOR, MeshHandle, RenderSurface, TargetId};

/// Decodes a picking pixel back into a grid index.
///
/// Pick colors are `index / 3`, so after rounding to bytes every channel is
/// congruent to its index component modulo 3. The white clear color means no
/// cubie was hit.
pub(crate) fn color_to_cubie(pixel: [u8; 4]) -> Option<GridIndex> {
    let [r, g, b, _] = pixel;
    if [r, g, b] == CLEAR_COLOR[..3] {
        return None;
    }
    Some([usize::from(r % 3), usize::from(g % 3), usize::from(b % 3)])
}

#[derive(Debug)]
pub(crate) struct PickingLayer {
    target: TargetId,
    mesh: MeshHandle,
}

impl PickingLayer {
    pub(crate) fn new<S: RenderSurface>(surface: &mut S, width: u32, height: u32) -> Result<Self, SurfaceError> {
        Ok(Self {
            target: surface.create_render_target(width, height)?,
            mesh: surface.upload_mesh(&mesh::cube()),
        })
    }

    pub(crate) fn target(&self) -> TargetId {
        self.target
    }

    /// Redraws the pass; `view_projection` includes the world rotation.
    pub(crate) fn render<'a, S, I>(&self, surface: &mut S, cubies: I, view_projection: &Matrix4<f32>)
    where
        S: RenderSurface,
        I: IntoIterator<Item = &'a Cubie>,
    {
        surface.clear(self.target);
        for cubie in cubies {
            let transform = view_projection * cubie.model_matrix();
            surface.bind_and_draw(self.target, self.mesh, &transform, &cubie.pick_color());
        }
    }

    /// The cubie under `(x, y)`, measured from the bottom-left corner.
    pub(crate) fn select<S: RenderSurface>(&self, surface: &S, x: u32, y: u32) -> Option<GridIndex> {
        color_to_cubie(surface.read_pixel(self.target, x, y))
    }
}
