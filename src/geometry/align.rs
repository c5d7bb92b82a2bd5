//! Rotations that bring directions onto other directions.

use crate::float_types::{PI, Real, tolerance};
use crate::transform::rotation;
use crate::vector::{any_perpendicular, cross, dot, norm, normalize, project_perpendicular};
use nalgebra::{Matrix4, Vector4};

/// Rotation about `axis` taking the part of `u` perpendicular to the axis
/// onto the part of `v` perpendicular to the axis.
pub fn around_axis(axis: &Vector4<Real>, u: &Vector4<Real>, v: &Vector4<Real>) -> Matrix4<Real> {
    let Some(a) = normalize(axis) else {
        return Matrix4::identity();
    };
    let pu = project_perpendicular(&a, u);
    let pv = project_perpendicular(&a, v);
    let angle = dot(&a, &cross(&pu, &pv)).atan2(dot(&pu, &pv));
    rotation(&a, angle)
}

/// Smallest rotation taking the direction of `u` onto the direction of `v`.
///
/// Antiparallel inputs turn half way around an arbitrary perpendicular axis;
/// a zero input gives the identity.
pub fn vector(u: &Vector4<Real>, v: &Vector4<Real>) -> Matrix4<Real> {
    let (Some(a), Some(b)) = (normalize(u), normalize(v)) else {
        return Matrix4::identity();
    };
    let axis = cross(&a, &b);
    let sin = norm(&axis);
    let cos = dot(&a, &b);
    if sin > tolerance() {
        rotation(&axis, sin.atan2(cos))
    } else if cos > 0.0 {
        Matrix4::identity()
    } else {
        rotation(&any_perpendicular(&a), PI)
    }
}

/// Orthonormal frame of a pair of directions: the bisector, the in-plane
/// half-difference, and their cross product, as matrix columns.
fn bisector_frame(a1: &Vector4<Real>, a2: &Vector4<Real>) -> Matrix4<Real> {
    let a1 = normalize(a1).unwrap_or_else(Vector4::zeros);
    let a2 = normalize(a2).unwrap_or_else(Vector4::zeros);
    let e1 = normalize(&(a1 + a2)).unwrap_or_else(|| any_perpendicular(&a1));
    let e2 = normalize(&project_perpendicular(&e1, &(a1 - a2))).unwrap_or_else(|| any_perpendicular(&e1));
    let e3 = cross(&e1, &e2);
    Matrix4::from_columns(&[e1, e2, e3, Vector4::w()])
}

/// Rotation taking the pair `(orig1, orig2)` onto `(target1, target2)`.
///
/// Maps the bisector frame of the originals onto the bisector frame of the
/// targets. When the two pairs subtend the same angle the fit is exact.
/// Otherwise both rotated directions land in the target plane, each off its
/// target by half the difference of the two angles, which is the rotation
/// that minimizes the summed squared angular error.
pub fn vectors(
    orig1: &Vector4<Real>,
    orig2: &Vector4<Real>,
    target1: &Vector4<Real>,
    target2: &Vector4<Real>,
) -> Matrix4<Real> {
    let from = bisector_frame(orig1, orig2);
    let to = bisector_frame(target1, target2);
    to * from.transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::angle::angle;
    use crate::vector::direction;
    use approx::assert_abs_diff_eq;

    #[test]
    fn single_vector() {
        let m = vector(&direction(1.0, 0.0, 0.0), &direction(0.0, 2.0, 0.0));
        assert_abs_diff_eq!(m * direction(1.0, 0.0, 0.0), direction(0.0, 1.0, 0.0), epsilon = tolerance());
        let m = vector(&direction(0.0, 0.0, 1.0), &direction(0.0, 0.0, -3.0));
        assert_abs_diff_eq!(m * direction(0.0, 0.0, 1.0), direction(0.0, 0.0, -1.0), epsilon = tolerance());
        assert_eq!(vector(&direction(0.0, 1.0, 0.0), &direction(0.0, 1.0, 0.0)), Matrix4::identity());
    }

    #[test]
    fn isometric_pairs_align_exactly() {
        let tgt1 = direction(-0.816497, -0.000000, -0.577350);
        let tgt2 = direction(0.000000, 0.000000, 1.000000);
        let orig1 = direction(0.000000, 0.000000, 1.000000);
        let orig2 = direction(-0.723746, 0.377967, -0.577350);
        let m = vectors(&orig1, &orig2, &tgt1, &tgt2);
        assert_abs_diff_eq!(m * orig1, tgt1, epsilon = 1e-5);
        assert_abs_diff_eq!(m * orig2, tgt2, epsilon = 1e-5);
    }

    #[test]
    fn mismatched_pairs_split_the_error() {
        let orig1 = direction(1.0, 0.0, 0.0);
        let orig2 = direction(0.0, 1.0, 0.0);
        let t = 1.2 as Real;
        let tgt1 = direction(0.0, 0.0, 1.0);
        let tgt2 = direction(t.sin(), 0.0, t.cos());
        let m = vectors(&orig1, &orig2, &tgt1, &tgt2);
        let e1 = angle(&(m * orig1), &tgt1);
        let e2 = angle(&(m * orig2), &tgt2);
        assert_abs_diff_eq!(e1, e2, epsilon = 1e-9);
        assert_abs_diff_eq!(e1, (crate::float_types::FRAC_PI_2 - t).abs() / 2.0, epsilon = 1e-9);
    }
}
