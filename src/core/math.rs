//! Vector geometry primitives for skeletal retargeting.
//!
//! Pure functions over [`Point3`] and [`Vector3`]: building vectors from
//! point pairs, angles between vectors, projection onto a plane, and the
//! perpendicular from a point to a line. All functions are stateless and
//! deterministic; identical inputs produce bit-identical outputs.

use thiserror::Error;

use crate::core::types::{Point3, Vector3};

/// Below this length a vector's direction is considered undefined.
pub const MIN_NORM: f32 = 1e-6;

/// Degenerate-geometry errors.
///
/// Raised instead of propagating a NaN when a tracking glitch produces
/// coincident points (zero-length limb segments). Callers treat the
/// affected frame as a no-op and continue with the next one.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryError {
    /// An angle or direction was requested of a (near-)zero-length vector.
    #[error("geometry undefined for zero-length vector")]
    ZeroLengthVector,
}

/// Displacement from `tail` to `head`.
///
/// # Example
/// ```
/// use chhaya_retarget::core::math::vector_from_points;
/// use chhaya_retarget::core::types::Point3;
///
/// let v = vector_from_points(&Point3::new(1.0, 0.0, 0.0), &Point3::new(1.0, 2.0, 0.0));
/// assert_eq!((v.x, v.y, v.z), (0.0, 2.0, 0.0));
/// ```
#[inline]
pub fn vector_from_points(tail: &Point3, head: &Point3) -> Vector3 {
    *head - *tail
}

/// Unsigned angle between two vectors, in radians within [0, π].
///
/// Computed as `acos(dot / (|a| |b|))` with the cosine clamped to
/// [-1, 1] so floating-point rounding cannot push it outside the acos
/// domain. Fails with [`GeometryError::ZeroLengthVector`] when either
/// vector has no defined direction.
///
/// # Example
/// ```
/// use chhaya_retarget::core::math::angle_between;
/// use chhaya_retarget::core::types::Vector3;
/// use std::f32::consts::FRAC_PI_2;
///
/// let x = Vector3::new(1.0, 0.0, 0.0);
/// let y = Vector3::new(0.0, 2.0, 0.0);
/// assert!((angle_between(&x, &y).unwrap() - FRAC_PI_2).abs() < 1e-6);
/// ```
pub fn angle_between(a: &Vector3, b: &Vector3) -> Result<f32, GeometryError> {
    let na = a.norm();
    let nb = b.norm();
    if na < MIN_NORM || nb < MIN_NORM {
        return Err(GeometryError::ZeroLengthVector);
    }
    let cos = (a.dot(b) / (na * nb)).clamp(-1.0, 1.0);
    Ok(cos.acos())
}

/// Project `v` onto the plane with the given normal.
///
/// The result is expressed through an in-plane orthonormal basis built
/// from `in_plane_axis` (the reference direction, assumed perpendicular
/// to the normal) and `normal × in_plane_axis`. Used to isolate the
/// horizontal component of the upper-arm vector.
///
/// Fails when the normal or the reference axis is zero-length, or when
/// the two are parallel (no plane basis exists). The projection itself
/// may legitimately be the zero vector when `v` is parallel to the
/// normal; downstream angle computations surface that case.
pub fn project_onto_plane(
    v: &Vector3,
    normal: &Vector3,
    in_plane_axis: &Vector3,
) -> Result<Vector3, GeometryError> {
    let b1 = in_plane_axis
        .normalized()
        .ok_or(GeometryError::ZeroLengthVector)?;
    let b2 = normal
        .cross(in_plane_axis)
        .normalized()
        .ok_or(GeometryError::ZeroLengthVector)?;
    Ok(b1 * v.dot(&b1) + b2 * v.dot(&b2))
}

/// Shortest vector from `point` to the infinite line through
/// `line_origin` along `line_dir`.
///
/// Returns the perpendicular pointing from the point toward the line.
/// When the point lies exactly on the line the perpendicular vanishes;
/// `companion` (the forearm vector at the call site) then supplies the
/// disambiguating off-axis direction. If the companion is also parallel
/// to the line the geometry is fully degenerate and the zero vector is
/// returned for the caller's angle step to reject.
pub fn shortest_vector_to_line(
    point: &Point3,
    line_dir: &Vector3,
    companion: &Vector3,
    line_origin: &Point3,
) -> Result<Vector3, GeometryError> {
    let d = line_dir.normalized().ok_or(GeometryError::ZeroLengthVector)?;
    let w = *point - *line_origin;
    let perp = d * w.dot(&d) - w;
    if perp.norm() >= MIN_NORM {
        return Ok(perp);
    }
    // Point sits on the line; fall back to the companion segment's
    // off-axis component, oriented the same way as the vanished
    // perpendicular would be.
    Ok(-(*companion - d * companion.dot(&d)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_vector_from_points_antisymmetry() {
        let a = Point3::new(0.3, -1.2, 2.0);
        let b = Point3::new(-0.5, 0.4, 1.1);
        let fwd = vector_from_points(&a, &b);
        let back = vector_from_points(&b, &a);
        assert_relative_eq!(fwd.x, -back.x);
        assert_relative_eq!(fwd.y, -back.y);
        assert_relative_eq!(fwd.z, -back.z);
    }

    #[test]
    fn test_angle_between_self_is_zero() {
        let v = Vector3::new(0.2, -0.7, 1.3);
        assert_relative_eq!(angle_between(&v, &v).unwrap(), 0.0);
    }

    #[test]
    fn test_angle_between_opposite_is_pi() {
        let v = Vector3::new(0.2, -0.7, 1.3);
        assert_relative_eq!(angle_between(&v, &(-v)).unwrap(), PI, epsilon = 1e-6);
    }

    #[test]
    fn test_angle_between_perpendicular() {
        let a = Vector3::new(1.0, 0.0, 0.0);
        let b = Vector3::new(0.0, 0.0, -3.0);
        assert_relative_eq!(angle_between(&a, &b).unwrap(), FRAC_PI_2, epsilon = 1e-6);
    }

    #[test]
    fn test_angle_between_zero_vector_fails() {
        let v = Vector3::new(1.0, 0.0, 0.0);
        assert_eq!(
            angle_between(&v, &Vector3::ZERO),
            Err(GeometryError::ZeroLengthVector)
        );
        assert_eq!(
            angle_between(&Vector3::ZERO, &v),
            Err(GeometryError::ZeroLengthVector)
        );
    }

    #[test]
    fn test_angle_between_clamps_rounding() {
        // Nearly-parallel vectors whose cosine can round above 1.0.
        let a = Vector3::new(0.1, 0.1, 0.1);
        let b = Vector3::new(0.3, 0.3, 0.3);
        let theta = angle_between(&a, &b).unwrap();
        assert!(theta.is_finite());
        assert_relative_eq!(theta, 0.0, epsilon = 1e-3);
    }

    #[test]
    fn test_project_onto_plane_drops_normal_component() {
        let normal = Vector3::new(0.0, 0.0, -1.0);
        let axis = Vector3::new(-1.0, 0.0, 0.0);
        let v = Vector3::new(1.0, 2.0, 5.0);
        let p = project_onto_plane(&v, &normal, &axis).unwrap();
        assert_relative_eq!(p.x, 1.0, epsilon = 1e-6);
        assert_relative_eq!(p.y, 2.0, epsilon = 1e-6);
        assert_relative_eq!(p.z, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_project_onto_plane_parallel_vector_vanishes() {
        let normal = Vector3::new(0.0, 0.0, -1.0);
        let axis = Vector3::new(-1.0, 0.0, 0.0);
        let v = Vector3::new(0.0, 0.0, 4.0);
        let p = project_onto_plane(&v, &normal, &axis).unwrap();
        assert!(p.norm() < MIN_NORM);
    }

    #[test]
    fn test_project_onto_plane_degenerate_basis_fails() {
        let normal = Vector3::new(0.0, 1.0, 0.0);
        let v = Vector3::new(1.0, 1.0, 1.0);
        assert_eq!(
            project_onto_plane(&v, &normal, &normal),
            Err(GeometryError::ZeroLengthVector)
        );
    }

    #[test]
    fn test_shortest_vector_points_at_line() {
        // Line along +y through the origin; point at (2, 5, 0).
        let perp = shortest_vector_to_line(
            &Point3::new(2.0, 5.0, 0.0),
            &Vector3::new(0.0, 1.0, 0.0),
            &Vector3::new(0.0, 1.0, 1.0),
            &Point3::new(0.0, 0.0, 0.0),
        )
        .unwrap();
        assert_relative_eq!(perp.x, -2.0, epsilon = 1e-6);
        assert_relative_eq!(perp.y, 0.0, epsilon = 1e-6);
        assert_relative_eq!(perp.z, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_shortest_vector_on_line_uses_companion() {
        // Point on the line itself; the companion's off-axis part decides.
        let perp = shortest_vector_to_line(
            &Point3::new(0.0, 3.0, 0.0),
            &Vector3::new(0.0, 1.0, 0.0),
            &Vector3::new(1.0, 1.0, 0.0),
            &Point3::new(0.0, 0.0, 0.0),
        )
        .unwrap();
        assert_relative_eq!(perp.x, -1.0, epsilon = 1e-6);
        assert_relative_eq!(perp.y, 0.0, epsilon = 1e-6);
        assert_relative_eq!(perp.z, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_shortest_vector_fully_collinear_returns_zero() {
        // Companion parallel to the line too: no perpendicular exists.
        let perp = shortest_vector_to_line(
            &Point3::new(0.0, 2.0, 0.0),
            &Vector3::new(0.0, 1.0, 0.0),
            &Vector3::new(0.0, -1.0, 0.0),
            &Point3::new(0.0, 0.0, 0.0),
        )
        .unwrap();
        assert!(perp.norm() < MIN_NORM);
    }
}
