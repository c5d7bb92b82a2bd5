//! Angles between directions and dihedrals of point quadruples.

use crate::float_types::Real;
use crate::vector::{as_point, cross, dot, normalize};
use nalgebra::Vector4;

/// Unsigned angle in `[0, pi]` between the first three components of `u`
/// and `v`. Zero-length inputs give `NaN`.
pub fn angle(u: &Vector4<Real>, v: &Vector4<Real>) -> Real {
    match (normalize(u), normalize(v)) {
        (Some(a), Some(b)) => dot(&a, &b).clamp(-1.0, 1.0).acos(),
        _ => Real::NAN,
    }
}

/// [`angle`] in degrees.
pub fn angle_degrees(u: &Vector4<Real>, v: &Vector4<Real>) -> Real {
    angle(u, v).to_degrees()
}

/// Signed dihedral angle of `p1-p2-p3-p4` about the `p2 -> p3` bond, in
/// `(-pi, pi]` with the right-hand rule.
///
/// Inputs are read as points whatever their w.
pub fn dihedral(
    p1: &Vector4<Real>,
    p2: &Vector4<Real>,
    p3: &Vector4<Real>,
    p4: &Vector4<Real>,
) -> Real {
    let (p1, p2, p3, p4) = (as_point(p1), as_point(p2), as_point(p3), as_point(p4));
    let unit = |v: Vector4<Real>| normalize(&v).unwrap_or_else(Vector4::zeros);
    let a = unit(p2 - p1);
    let b = unit(p3 - p2);
    let c = unit(p4 - p3);
    let x = (dot(&a, &b) * dot(&b, &c) - dot(&a, &c)).clamp(-1.0, 1.0);
    let y = dot(&a, &cross(&b, &c)).clamp(-1.0, 1.0);
    y.atan2(x)
}
