//! Ray casting against recorded triangles.
//!
//! Used by the software render surface to answer pixel reads: a ray is cast
//! through the pixel in normalized device coordinates and the nearest hit
//! triangle decides the pixel's color.

use nalgebra::{Point3, Vector3};

/// 3D ray for intersection testing
#[derive(Debug, Clone)]
pub(crate) struct Ray {
    /// Ray origin point
    pub(crate) origin: Point3<f32>,
    /// Ray direction vector (normalized)
    pub(crate) direction: Vector3<f32>,
}

impl Ray {
    /// Ray entering the view volume at the near plane through an NDC point,
    /// pointing into the screen.
    pub(crate) fn through_ndc(ndc_x: f32, ndc_y: f32) -> Self {
        Self {
            origin: Point3::new(ndc_x, ndc_y, -1.0),
            direction: Vector3::z(),
        }
    }
}

/// Converts a pixel (origin bottom-left) to the NDC coordinates of its center.
pub(crate) fn pixel_to_ndc(x: u32, y: u32, width: u32, height: u32) -> (f32, f32) {
    let ndc_x = (x as f32 + 0.5) / width as f32 * 2.0 - 1.0;
    let ndc_y = (y as f32 + 0.5) / height as f32 * 2.0 - 1.0;
    (ndc_x, ndc_y)
}

/// Test ray intersection with a triangle using the Möller-Trumbore algorithm
/// Returns Some(distance) if ray intersects the triangle
pub(crate) fn ray_triangle_intersection(ray: &Ray, triangle: &[Point3<f32>; 3]) -> Option<f32> {
    const EPSILON: f32 = 1e-8;

    let [v0, v1, v2] = *triangle;
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    let h = ray.direction.cross(&edge2);
    let a = edge1.dot(&h);

    // Ray is parallel to the triangle
    if a > -EPSILON && a < EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = ray.origin - v0;

    let u = f * s.dot(&h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(&edge1);
    let v = f * ray.direction.dot(&q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(&q);
    (t > EPSILON).then_some(t)
}

/// Index and distance of the nearest triangle hit by `ray`.
pub(crate) fn nearest_hit<'a, I>(ray: &Ray, triangles: I) -> Option<(usize, f32)>
where
    I: IntoIterator<Item = &'a [Point3<f32>; 3]>,
{
    triangles
        .into_iter()
        .enumerate()
        .filter_map(|(i, tri)| ray_triangle_intersection(ray, tri).map(|t| (i, t)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn square_at(z: f32) -> [[Point3<f32>; 3]; 2] {
        [
            [
                Point3::new(-1.0, -1.0, z),
                Point3::new(1.0, -1.0, z),
                Point3::new(1.0, 1.0, z),
            ],
            [
                Point3::new(1.0, 1.0, z),
                Point3::new(-1.0, 1.0, z),
                Point3::new(-1.0, -1.0, z),
            ],
        ]
    }

    #[test]
    fn ray_hits_triangle_in_front() {
        let [lower, upper] = square_at(0.5);
        // below the diagonal
        let ray = Ray::through_ndc(0.3, 0.2);
        assert_relative_eq!(ray_triangle_intersection(&ray, &lower).unwrap(), 1.5);
        assert_eq!(ray_triangle_intersection(&ray, &upper), None);
        // above it
        let ray = Ray::through_ndc(0.2, 0.3);
        assert_eq!(ray_triangle_intersection(&ray, &lower), None);
        assert_relative_eq!(ray_triangle_intersection(&ray, &upper).unwrap(), 1.5);
    }

    #[test]
    fn ray_misses_triangle_to_the_side() {
        let ray = Ray::through_ndc(0.9, -0.9);
        let [_, tri] = square_at(0.0);
        assert_eq!(ray_triangle_intersection(&ray, &tri), None);
    }

    #[test]
    fn nearest_hit_prefers_closer_triangles() {
        let far = square_at(0.8);
        let near = square_at(-0.2);
        let all = [far[0], far[1], near[0], near[1]];
        let (index, t) = nearest_hit(&Ray::through_ndc(0.1, 0.5), &all).unwrap();
        assert!(index >= 2);
        assert_relative_eq!(t, 0.8);
    }

    #[test]
    fn pixel_centers_map_into_ndc() {
        assert_eq!(pixel_to_ndc(0, 0, 2, 2), (-0.5, -0.5));
        assert_eq!(pixel_to_ndc(1, 1, 2, 2), (0.5, 0.5));
    }
}
