use nalgebra::{Matrix4, Point3, Rotation3, Unit, Vector3, Vector4};

/// Values closer than this are treated as the same grid coordinate.
pub(crate) const MARGIN_OF_ERROR: f32 = 1e-3;

/// Coordinate axis of the cube grid, used as an index into coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub(crate) const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub(crate) fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    pub(crate) fn unit(self) -> Vector3<f32> {
        match self {
            Axis::X => Vector3::x(),
            Axis::Y => Vector3::y(),
            Axis::Z => Vector3::z(),
        }
    }
}

pub fn degrees_to_radians(degrees: f32) -> f32 {
    degrees * std::f32::consts::PI / 180.0
}

/// Rotation about `axis` by `degrees`, right-handed.
pub fn rotation_about(axis: &Vector3<f32>, degrees: f32) -> Rotation3<f32> {
    Rotation3::from_axis_angle(&Unit::new_normalize(*axis), degrees_to_radians(degrees))
}

pub fn rotation_x(degrees: f32) -> Matrix4<f32> {
    rotation_about(&Vector3::x(), degrees).to_homogeneous()
}

pub fn rotation_y(degrees: f32) -> Matrix4<f32> {
    rotation_about(&Vector3::y(), degrees).to_homogeneous()
}

pub fn rotation_z(degrees: f32) -> Matrix4<f32> {
    rotation_about(&Vector3::z(), degrees).to_homogeneous()
}

/// Exponential ease-out over `progress` in `[0, 1]`.
pub fn ease_out_expo(progress: f32) -> f32 {
    if progress >= 1.0 {
        1.0
    } else {
        1.0 - 2f32.powf(-10.0 * progress)
    }
}

/// Applies a homogeneous transform to a point, dividing by `w`.
pub fn transform_point(matrix: &Matrix4<f32>, point: &Point3<f32>) -> Option<Point3<f32>> {
    let v = matrix * Vector4::new(point.x, point.y, point.z, 1.0);
    if v.w == 0.0 {
        return None;
    }
    Some(Point3::new(v.x / v.w, v.y / v.w, v.z / v.w))
}

/// Maps a window-space point (origin bottom-left, depth in `[0, 1]`) back
/// into the space `view` was built from.
pub fn unproject(
    window: &Vector3<f32>,
    view: &Matrix4<f32>,
    projection: &Matrix4<f32>,
    viewport: [f32; 4],
) -> Option<Point3<f32>> {
    let ndc = Point3::new(
        (window.x - viewport[0]) * 2.0 / viewport[2] - 1.0,
        (window.y - viewport[1]) * 2.0 / viewport[3] - 1.0,
        2.0 * window.z - 1.0,
    );
    let inverse = (projection * view).try_inverse()?;
    transform_point(&inverse, &ndc)
}

/// Rounds every component to the nearest integer.
pub fn snap_vector(v: &Vector3<f32>) -> Vector3<f32> {
    v.map(f32::round)
}

/// Rounds every entry of a quarter-turn rotation back onto `{-1, 0, 1}`.
pub fn snap_matrix(m: &Matrix4<f32>) -> Matrix4<f32> {
    m.map(f32::round)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn quarter_turn_about_z_maps_x_to_y() {
        let rotated = rotation_about(&Vector3::z(), 90.0) * Vector3::x();
        assert_relative_eq!(rotated, Vector3::y(), epsilon = 1e-6);
    }

    #[test]
    fn ease_out_expo_is_monotonic_and_bounded() {
        let mut last = ease_out_expo(0.0);
        assert_relative_eq!(last, 0.0);
        for step in 1..=10 {
            let value = ease_out_expo(step as f32 / 10.0);
            assert!(value >= last);
            last = value;
        }
        assert_relative_eq!(last, 1.0);
    }

    #[test]
    fn unproject_inverts_projection() {
        let view = Matrix4::look_at_rh(
            &Point3::new(0.0, 0.0, -17.0),
            &Point3::origin(),
            &Vector3::y(),
        );
        let projection = Matrix4::new_perspective(1.0, 0.65, 0.1, 100.0);
        let viewport = [0.0, 0.0, 400.0, 400.0];

        let point = Point3::new(1.0, -2.0, 0.5);
        let ndc = transform_point(&(projection * view), &point).unwrap();
        let window = Vector3::new(
            (ndc.x + 1.0) * 200.0,
            (ndc.y + 1.0) * 200.0,
            (ndc.z + 1.0) / 2.0,
        );
        let back = unproject(&window, &view, &projection, viewport).unwrap();
        assert_relative_eq!(back, point, epsilon = 1e-3);
    }

    #[test]
    fn snapping_removes_drift() {
        let drifted = Vector3::new(0.999_999_9, -1.000_000_1, 1e-7);
        assert_eq!(snap_vector(&drifted), Vector3::new(1.0, -1.0, 0.0));
    }
}
