//! Plane membership and plane/plane intersection.

use crate::errors::HomogError;
use crate::float_types::{Real, tolerance};
use crate::ray::{Plane, Ray};
use crate::vector::{any_perpendicular, cross, dot, normalize, point};
use nalgebra::Vector4;

/// Outcome of intersecting two planes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntersectionStatus {
    /// The planes meet in a single line.
    Unique,
    /// Parallel and disjoint.
    Parallel,
    /// The same plane.
    Coincident,
}

impl IntersectionStatus {
    /// Integer code: 0 unique, 1 parallel, 2 coincident.
    pub const fn code(self) -> u8 {
        match self {
            IntersectionStatus::Unique => 0,
            IntersectionStatus::Parallel => 1,
            IntersectionStatus::Coincident => 2,
        }
    }

    pub const fn is_degenerate(self) -> bool {
        !matches!(self, IntersectionStatus::Unique)
    }
}

/// Signed distance from `plane` to `p` along the plane normal.
#[inline]
pub fn signed_distance(plane: &Plane, p: &Vector4<Real>) -> Real {
    dot(&plane.direction, &(p - plane.origin))
}

/// True when `p` lies on `plane` within tolerance.
#[inline]
pub fn contains_point(plane: &Plane, p: &Vector4<Real>) -> bool {
    signed_distance(plane, p).abs() <= tolerance()
}

/// True when the ray's origin lies on `plane` and its direction is
/// perpendicular to the normal.
#[inline]
pub fn contains_ray(plane: &Plane, ray: &Ray) -> bool {
    contains_point(plane, &ray.origin) && dot(&plane.direction, &ray.direction).abs() <= tolerance()
}

/// Line shared by two planes.
///
/// The line direction is `n1 × n2`. Its point is found by zeroing the
/// coordinate along the dominant component of the direction and solving the
/// two plane equations for the other two. Degenerate pairs return a
/// placeholder ray lying in `p1` together with their status.
pub fn intersect(p1: &Plane, p2: &Plane) -> (Ray, IntersectionStatus) {
    let (n1, n2) = (&p1.direction, &p2.direction);
    let u = cross(n1, n2);

    if u.x.abs() + u.y.abs() + u.z.abs() < tolerance() {
        let status = if contains_point(p1, &p2.origin) {
            IntersectionStatus::Coincident
        } else {
            IntersectionStatus::Parallel
        };
        let placeholder = Ray::from_parts(p1.origin, any_perpendicular(n1));
        return (placeholder, status);
    }

    let d1 = -dot(n1, &p1.origin);
    let d2 = -dot(n2, &p2.origin);
    let (ax, ay, az) = (u.x.abs(), u.y.abs(), u.z.abs());
    let origin = if ax >= ay && ax >= az {
        point(
            0.0,
            (d2 * n1.z - d1 * n2.z) / u.x,
            (d1 * n2.y - d2 * n1.y) / u.x,
        )
    } else if ay >= az {
        point(
            (d1 * n2.z - d2 * n1.z) / u.y,
            0.0,
            (d2 * n1.x - d1 * n2.x) / u.y,
        )
    } else {
        point(
            (d2 * n1.y - d1 * n2.y) / u.z,
            (d1 * n2.x - d2 * n1.x) / u.z,
            0.0,
        )
    };

    // u is well away from zero here
    let direction = normalize(&u).unwrap_or_else(|| any_perpendicular(n1));
    (Ray::from_parts(origin, direction), IntersectionStatus::Unique)
}

/// Strict single-pair intersection: invalid planes and degenerate pairs are
/// errors rather than statuses.
pub fn intersect_plane_pair(p1: &Plane, p2: &Plane) -> Result<Ray, HomogError> {
    if !p1.is_valid() {
        return Err(HomogError::InvalidRay {
            argument: "plane1",
            index: 0,
        });
    }
    if !p2.is_valid() {
        return Err(HomogError::InvalidRay {
            argument: "plane2",
            index: 0,
        });
    }
    match intersect(p1, p2) {
        (ray, IntersectionStatus::Unique) => Ok(ray),
        (_, status) => Err(HomogError::DegenerateIntersection {
            coincident: status == IntersectionStatus::Coincident,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::direction;
    use approx::assert_relative_eq;

    fn plane(o: [Real; 3], n: [Real; 3]) -> Plane {
        Ray::new(point(o[0], o[1], o[2]), direction(n[0], n[1], n[2])).unwrap()
    }

    #[test]
    fn axis_aligned_pairs() {
        let (line, status) = intersect(&plane([0.0; 3], [1.0, 0.0, 0.0]), &plane([0.0; 3], [0.0, 1.0, 0.0]));
        assert_eq!(status, IntersectionStatus::Unique);
        assert_eq!(line.origin.z, 0.0);
        assert_eq!(line.direction.abs(), direction(0.0, 0.0, 1.0));

        let (line, _) = intersect(&plane([0.0; 3], [0.0, 1.0, 0.0]), &plane([0.0; 3], [0.0, 0.0, 1.0]));
        assert_eq!(line.origin.x, 0.0);
        assert_eq!(line.direction.abs(), direction(1.0, 0.0, 0.0));

        let (line, _) = intersect(&plane([7.0, 0.0, 0.0], [1.0, 0.0, 0.0]), &plane([0.0, 9.0, 0.0], [0.0, 1.0, 0.0]));
        assert_relative_eq!(line.origin, point(7.0, 9.0, 0.0), epsilon = tolerance());
    }

    #[test]
    fn diagonal_normals() {
        let (line, status) = intersect(&plane([0.0; 3], [1.0, 1.0, 0.0]), &plane([0.0; 3], [0.0, 1.0, 1.0]));
        assert_eq!(status, IntersectionStatus::Unique);
        let expected = normalize(&direction(1.0, 1.0, 1.0)).unwrap();
        assert_relative_eq!(line.direction.abs(), expected, epsilon = tolerance());
    }

    #[test]
    fn arbitrary_pair_lies_in_both() {
        let p1 = Ray::from_parts(
            point(0.39263901, 0.57934885, -0.7693232),
            direction(-0.80966465, -0.18557869, 0.55677976),
        );
        let p2 = Ray::from_parts(
            point(0.14790894, -1.333329, 0.45396509),
            direction(-0.92436319, -0.0221499, 0.38087016),
        );
        let (line, status) = intersect(&p1, &p2);
        assert_eq!(status, IntersectionStatus::Unique);
        assert!(contains_ray(&p1, &line));
        assert!(contains_ray(&p2, &line));
    }

    #[test]
    fn degenerate_pairs() {
        let a = plane([0.0; 3], [0.0, 0.0, 1.0]);
        let b = plane([3.0, -2.0, 0.0], [0.0, 0.0, -1.0]);
        let c = plane([0.0, 0.0, 1.0], [0.0, 0.0, 1.0]);
        assert_eq!(intersect(&a, &b).1, IntersectionStatus::Coincident);
        assert_eq!(intersect(&a, &c).1, IntersectionStatus::Parallel);
        assert_eq!(IntersectionStatus::Parallel.code(), 1);
        assert_eq!(
            intersect_plane_pair(&a, &b),
            Err(HomogError::DegenerateIntersection { coincident: true })
        );
        assert_eq!(
            intersect_plane_pair(&a, &c),
            Err(HomogError::DegenerateIntersection { coincident: false })
        );
        // the placeholder still lies in the first plane
        assert!(contains_ray(&a, &intersect(&a, &c).0));
    }
}
