//! Static geometry: cubie bodies, stickers and the normals cube.

use nalgebra::{Point3, Vector3};

/// Half-width of a sticker quad
const STICKER_HALF_WIDTH: f32 = 0.85;

/// Height of a sticker above its placement origin, so it sits just outside the
/// cubie body
const STICKER_LIFT: f32 = 0.06;

/// Triangle mesh with per-vertex normals.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Mesh {
    pub(crate) vertices: Vec<Point3<f32>>,
    pub(crate) normals: Vec<Vector3<f32>>,
    pub(crate) faces: Vec<[u16; 3]>,
}

impl Mesh {
    fn from_quads(quads: &[([f32; 3], [[f32; 3]; 4])]) -> Self {
        let mut mesh = Mesh {
            vertices: Vec::with_capacity(quads.len() * 4),
            normals: Vec::with_capacity(quads.len() * 4),
            faces: Vec::with_capacity(quads.len() * 2),
        };
        for (normal, corners) in quads {
            let base = mesh.vertices.len() as u16;
            for corner in corners {
                mesh.vertices.push(Point3::from(*corner));
                mesh.normals.push(Vector3::from(*normal));
            }
            mesh.faces.push([base, base + 1, base + 2]);
            mesh.faces.push([base + 2, base + 3, base]);
        }
        mesh
    }

    /// Triangles as vertex triples.
    pub(crate) fn triangles(&self) -> impl Iterator<Item = [Point3<f32>; 3]> + '_ {
        self.faces.iter().map(|f| {
            [
                self.vertices[usize::from(f[0])],
                self.vertices[usize::from(f[1])],
                self.vertices[usize::from(f[2])],
            ]
        })
    }

    /// Groups of four vertices sharing a normal, one per quad face.
    pub(crate) fn quads(&self) -> impl Iterator<Item = ([Point3<f32>; 4], Vector3<f32>)> + '_ {
        self.vertices
            .chunks_exact(4)
            .zip(self.normals.chunks_exact(4))
            .map(|(v, n)| ([v[0], v[1], v[2], v[3]], n[0]))
    }
}

/// Outward normal and corners (counter-clockwise seen from outside) of each
/// face of the cube spanning `[-1, 1]³`, in the order +X, -X, +Y, -Y, +Z, -Z.
#[rustfmt::skip]
pub(crate) const CUBE_FACES: [([f32; 3], [[f32; 3]; 4]); 6] = [
    ([ 1.0,  0.0,  0.0], [[ 1.0, -1.0,  1.0], [ 1.0, -1.0, -1.0], [ 1.0,  1.0, -1.0], [ 1.0,  1.0,  1.0]]),
    ([-1.0,  0.0,  0.0], [[-1.0, -1.0, -1.0], [-1.0, -1.0,  1.0], [-1.0,  1.0,  1.0], [-1.0,  1.0, -1.0]]),
    ([ 0.0,  1.0,  0.0], [[-1.0,  1.0,  1.0], [ 1.0,  1.0,  1.0], [ 1.0,  1.0, -1.0], [-1.0,  1.0, -1.0]]),
    ([ 0.0, -1.0,  0.0], [[-1.0, -1.0, -1.0], [ 1.0, -1.0, -1.0], [ 1.0, -1.0,  1.0], [-1.0, -1.0,  1.0]]),
    ([ 0.0,  0.0,  1.0], [[-1.0, -1.0,  1.0], [ 1.0, -1.0,  1.0], [ 1.0,  1.0,  1.0], [-1.0,  1.0,  1.0]]),
    ([ 0.0,  0.0, -1.0], [[ 1.0, -1.0, -1.0], [-1.0, -1.0, -1.0], [-1.0,  1.0, -1.0], [ 1.0,  1.0, -1.0]]),
];

/// Body of a single cubie.
pub(crate) fn cube() -> Mesh {
    Mesh::from_quads(&CUBE_FACES)
}

/// A single face of the cube body, indexed as in [`CUBE_FACES`].
pub(crate) fn cube_face(index: usize) -> Mesh {
    Mesh::from_quads(&CUBE_FACES[index..=index])
}

/// Flat sticker facing +Y.
pub(crate) fn sticker() -> Mesh {
    let w = STICKER_HALF_WIDTH;
    let h = STICKER_LIFT;
    Mesh::from_quads(&[([0.0, 1.0, 0.0], [[-w, h, w], [w, h, w], [w, h, -w], [-w, h, -w]])])
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn cube_has_twelve_triangles() {
        let mesh = cube();
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.triangles().count(), 12);
        assert_eq!(mesh.quads().count(), 6);
    }

    #[test]
    fn face_corners_are_counter_clockwise_from_outside() {
        for (normal, corners) in CUBE_FACES {
            let [a, b, c, _] = corners.map(Vector3::from);
            let winding = (b - a).cross(&(c - a)).normalize();
            assert_relative_eq!(winding, Vector3::from(normal));
        }
    }

    #[test]
    fn sticker_faces_up() {
        let mesh = sticker();
        assert!(mesh.vertices.iter().all(|v| v.y > 0.0));
        assert_eq!(mesh.normals[0], Vector3::y());
    }
}
