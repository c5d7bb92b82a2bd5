//! Ray and plane geometry over batches
//!
//! Each submodule holds the single-element kernels; the functions here lift
//! them over broadcast batches and collect per-element statuses.

pub mod align;
pub mod angle;
pub mod line;
pub mod plane;

pub use plane::{IntersectionStatus, intersect_plane_pair};

use crate::batch::{Batch, zip3_with, zip4_with};
use crate::errors::HomogError;
use crate::float_types::Real;
use crate::ray::{Plane, Ray};
use nalgebra::{Matrix4, Vector4};

/// Per-element test that `points` lie on `planes` within tolerance.
pub fn point_in_plane(
    planes: &Batch<Plane>,
    points: &Batch<Vector4<Real>>,
) -> Result<Batch<bool>, HomogError> {
    planes.zip_with(points, plane::contains_point)
}

/// Per-element test that `rays` lie in `planes`: the origin is on the plane
/// and the direction is perpendicular to the normal.
pub fn ray_in_plane(planes: &Batch<Plane>, rays: &Batch<Ray>) -> Result<Batch<bool>, HomogError> {
    planes.zip_with(rays, plane::contains_ray)
}

/// Lines shared by pairs of planes, with a status per pair.
///
/// Every plane must be a valid ray (point w = 1, unit normal with w = 0);
/// the first violation is reported as [`HomogError::InvalidRay`]. Parallel and
/// coincident pairs are not errors: they carry a placeholder ray and a
/// degenerate status.
pub fn intersect_planes(
    planes1: &Batch<Plane>,
    planes2: &Batch<Plane>,
) -> Result<(Batch<Ray>, Batch<IntersectionStatus>), HomogError> {
    if let Some(index) = planes1.first_invalid() {
        return Err(HomogError::InvalidRay {
            argument: "plane1",
            index,
        });
    }
    if let Some(index) = planes2.first_invalid() {
        return Err(HomogError::InvalidRay {
            argument: "plane2",
            index,
        });
    }
    let (lines, status) = planes1.zip_with(planes2, plane::intersect)?.unzip();
    let degenerate = status.iter().filter(|s| s.is_degenerate()).count();
    if degenerate > 0 {
        tracing::debug!(degenerate, total = status.len(), "degenerate plane pairs");
    }
    Ok((lines, status))
}

/// Batched [`line::distance`].
pub fn line_line_distance(rays1: &Batch<Ray>, rays2: &Batch<Ray>) -> Result<Batch<Real>, HomogError> {
    rays1.zip_with(rays2, line::distance)
}

/// Batched [`line::closest_points`]: the closest point on each line of
/// `rays1`, and on each line of `rays2`.
pub fn line_line_closest_points(
    rays1: &Batch<Ray>,
    rays2: &Batch<Ray>,
) -> Result<(Batch<Vector4<Real>>, Batch<Vector4<Real>>), HomogError> {
    Ok(rays1.zip_with(rays2, line::closest_points)?.unzip())
}

/// Batched [`angle::dihedral`].
pub fn dihedral(
    p1: &Batch<Vector4<Real>>,
    p2: &Batch<Vector4<Real>>,
    p3: &Batch<Vector4<Real>>,
    p4: &Batch<Vector4<Real>>,
) -> Result<Batch<Real>, HomogError> {
    zip4_with(p1, p2, p3, p4, angle::dihedral)
}

/// Batched [`angle::angle`], in radians.
pub fn angle(u: &Batch<Vector4<Real>>, v: &Batch<Vector4<Real>>) -> Result<Batch<Real>, HomogError> {
    u.zip_with(v, angle::angle)
}

/// Batched [`angle::angle_degrees`].
pub fn angle_degrees(
    u: &Batch<Vector4<Real>>,
    v: &Batch<Vector4<Real>>,
) -> Result<Batch<Real>, HomogError> {
    u.zip_with(v, angle::angle_degrees)
}

/// Batched [`align::around_axis`].
pub fn align_around_axis(
    axis: &Batch<Vector4<Real>>,
    u: &Batch<Vector4<Real>>,
    v: &Batch<Vector4<Real>>,
) -> Result<Batch<Matrix4<Real>>, HomogError> {
    zip3_with(axis, u, v, align::around_axis)
}

/// Batched [`align::vector`].
pub fn align_vector(
    u: &Batch<Vector4<Real>>,
    v: &Batch<Vector4<Real>>,
) -> Result<Batch<Matrix4<Real>>, HomogError> {
    u.zip_with(v, align::vector)
}

/// Batched [`align::vectors`].
pub fn align_vectors(
    orig1: &Batch<Vector4<Real>>,
    orig2: &Batch<Vector4<Real>>,
    target1: &Batch<Vector4<Real>>,
    target2: &Batch<Vector4<Real>>,
) -> Result<Batch<Matrix4<Real>>, HomogError> {
    zip4_with(orig1, orig2, target1, target2, align::vectors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::{direction, point};

    #[test]
    fn invalid_planes_are_rejected() {
        let bad_point = Ray::from_parts(Vector4::new(0.0, 0.0, 0.0, 2.0), direction(0.0, 0.0, 1.0));
        let good = Ray::from_parts(point(0.0, 0.0, 0.0), direction(0.0, 0.0, 1.0));
        let bad_dir = Ray::from_parts(point(0.0, 0.0, 0.0), Vector4::new(0.0, 0.0, 3.0, 0.0));
        assert_eq!(
            intersect_planes(&bad_point.into(), &good.into()).unwrap_err(),
            HomogError::InvalidRay {
                argument: "plane1",
                index: 0
            }
        );
        assert!(matches!(
            intersect_planes(&good.into(), &Batch::from_vec(vec![good, bad_dir])),
            Err(HomogError::InvalidRay {
                argument: "plane2",
                index: 1
            })
        ));
    }

    #[test]
    fn incompatible_batches_fail_to_broadcast() {
        let p = Ray::from_parts(point(0.0, 0.0, 0.0), direction(0.0, 0.0, 1.0));
        let nine = Batch::filled([9], p);
        let two = Batch::filled([2], p);
        assert!(matches!(
            intersect_planes(&nine, &two),
            Err(HomogError::Broadcast { .. })
        ));
    }

    #[test]
    fn coincident_batch_reports_status() {
        let p = Ray::from_parts(point(0.0, 0.0, 0.0), direction(1.0, 0.0, 0.0));
        let (lines, status) = intersect_planes(&Batch::filled([9], p), &Batch::filled([9], p)).unwrap();
        assert_eq!(lines.shape(), &[9]);
        assert!(status.iter().all(|s| s.code() == 2));
    }
}
