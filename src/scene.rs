//! Converts engine state into flat screen-space quads.
//!
//! The canvas has no depth buffer, so every face is projected, back faces
//! are culled and the rest are sorted far to near.

use nalgebra::{Matrix4, Point3, Vector4};

use crate::cube::{ColorScheme, Cubie};
use crate::mesh::{self, CUBE_FACES, Mesh};
use crate::normals::{FACE_COLORS, NORMALS_CUBE_SCALE};

/// What the canvas shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum RenderMode {
    #[default]
    Standard,
    Normals,
    Picking,
}

impl std::fmt::Display for RenderMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderMode::Standard => write!(f, "Standard"),
            RenderMode::Normals => write!(f, "Normal Map"),
            RenderMode::Picking => write!(f, "Picking Map"),
        }
    }
}

impl RenderMode {
    pub(crate) const ALL: [RenderMode; 3] = [RenderMode::Standard, RenderMode::Normals, RenderMode::Picking];
}

/// Quad in pixel coordinates, origin top-left.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ScreenQuad {
    pub(crate) corners: [[f32; 2]; 4],
    pub(crate) color: Vector4<f32>,
    /// Mean NDC depth, larger is farther
    depth: f32,
}

/// Accumulates the quads of one frame.
#[derive(Debug)]
struct DisplayList {
    model_view: Matrix4<f32>,
    view_projection: Matrix4<f32>,
    size: (f32, f32),
    quads: Vec<ScreenQuad>,
}

impl DisplayList {
    fn new(model_view: Matrix4<f32>, projection: &Matrix4<f32>, size: (f32, f32)) -> Self {
        Self {
            model_view,
            view_projection: projection * model_view,
            size,
            quads: Vec::new(),
        }
    }

    /// Projects every front-facing quad of `mesh` placed by `model`.
    ///
    /// With `shaded`, faces turned away from the eye are darkened.
    fn push_mesh(&mut self, mesh: &Mesh, model: &Matrix4<f32>, color: &Vector4<f32>, shaded: bool) {
        let transform = self.view_projection * model;
        let eye_transform = self.model_view * model;
        for (corners, _) in mesh.quads() {
            let Some(ndc) = project_quad(&transform, &corners) else {
                continue;
            };
            if signed_area(&ndc) <= 0.0 {
                continue;
            }
            let color = if shaded {
                shade(color, &corners, &eye_transform)
            } else {
                *color
            };
            let (w, h) = self.size;
            self.quads.push(ScreenQuad {
                corners: ndc.map(|p| [(p.x + 1.0) * 0.5 * w, (1.0 - p.y) * 0.5 * h]),
                color,
                depth: ndc.iter().map(|p| p.z).sum::<f32>() / 4.0,
            });
        }
    }

    /// Quads in drawing order, far to near.
    fn finish(mut self) -> Vec<ScreenQuad> {
        self.quads.sort_by(|a, b| b.depth.total_cmp(&a.depth));
        self.quads
    }
}

fn project_quad(transform: &Matrix4<f32>, corners: &[Point3<f32>; 4]) -> Option<[Point3<f32>; 4]> {
    let mut out = [Point3::origin(); 4];
    for (o, c) in out.iter_mut().zip(corners) {
        let clip = transform * c.to_homogeneous();
        if clip.w <= 0.0 {
            return None;
        }
        *o = Point3::new(clip.x / clip.w, clip.y / clip.w, clip.z / clip.w);
    }
    Some(out)
}

/// Twice the signed area in NDC, positive for counter-clockwise quads.
fn signed_area(ndc: &[Point3<f32>; 4]) -> f32 {
    (0..4)
        .map(|i| {
            let (a, b) = (ndc[i], ndc[(i + 1) % 4]);
            a.x * b.y - b.x * a.y
        })
        .sum()
}

/// Headlight shading from the face normal in eye space.
fn shade(color: &Vector4<f32>, corners: &[Point3<f32>; 4], eye_transform: &Matrix4<f32>) -> Vector4<f32> {
    let normal = (corners[1] - corners[0]).cross(&(corners[2] - corners[0]));
    let eye_normal = eye_transform.transform_vector(&normal);
    let facing = (eye_normal.z / eye_normal.norm()).max(0.0);
    let factor = 0.55 + 0.45 * facing;
    Vector4::new(color.x * factor, color.y * factor, color.z * factor, color.w)
}

/// Meshes drawn by the canvas, built once.
#[derive(Debug)]
pub(crate) struct SceneMeshes {
    cube: Mesh,
    sticker: Mesh,
    faces: Vec<Mesh>,
}

impl Default for SceneMeshes {
    fn default() -> Self {
        Self {
            cube: mesh::cube(),
            sticker: mesh::sticker(),
            faces: (0..CUBE_FACES.len()).map(mesh::cube_face).collect(),
        }
    }
}

impl SceneMeshes {
    /// Builds the quads for `mode` in a `size` pixel area.
    ///
    /// `model_view` already contains the world rotation.
    pub(crate) fn build<'a, I>(
        &self,
        mode: RenderMode,
        cubies: I,
        scheme: &ColorScheme,
        model_view: Matrix4<f32>,
        projection: &Matrix4<f32>,
        size: (f32, f32),
    ) -> Vec<ScreenQuad>
    where
        I: IntoIterator<Item = &'a Cubie>,
    {
        let mut list = DisplayList::new(model_view, projection, size);
        match mode {
            RenderMode::Standard => {
                for cubie in cubies.into_iter().filter(|c| !c.is_core()) {
                    let model = cubie.model_matrix();
                    list.push_mesh(&self.cube, &model, &scheme.black, true);
                    for sticker in &cubie.stickers {
                        let placement = model * sticker.placement();
                        list.push_mesh(&self.sticker, &placement, &scheme.rgba(sticker.color), true);
                    }
                }
            }
            RenderMode::Normals => {
                let scale = Matrix4::new_scaling(NORMALS_CUBE_SCALE);
                for (face, [r, g, b]) in self.faces.iter().zip(FACE_COLORS) {
                    list.push_mesh(face, &scale, &Vector4::new(r, g, b, 1.0), false);
                }
            }
            RenderMode::Picking => {
                for cubie in cubies {
                    list.push_mesh(&self.cube, &cubie.model_matrix(), &cubie.pick_color(), false);
                }
            }
        }
        list.finish()
    }
}
