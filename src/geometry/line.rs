//! Distances and closest points between infinite lines.

use crate::float_types::{Real, tolerance};
use crate::ray::Ray;
use crate::vector::{self, as_point, cross, dot, norm_squared, project_perpendicular};
use nalgebra::Vector4;

/// Shortest distance between the lines through `r1` and `r2`.
///
/// Skew lines use `|(p2 - p1)·(d1 × d2)| / |d1 × d2|`. Lines whose directions
/// are parallel within [`tolerance`] use the part of `p2 - p1` perpendicular
/// to `d1`, the same cutoff [`closest_points`] applies.
pub fn distance(r1: &Ray, r2: &Ray) -> Real {
    let offset = as_point(&r2.origin) - as_point(&r1.origin);
    let (d1, d2) = (&r1.direction, &r2.direction);
    let normal = cross(d1, d2);
    if is_parallel(&normal, d1, d2) {
        if norm_squared(d1) == 0.0 {
            return vector::norm(&offset);
        }
        return vector::norm(&project_perpendicular(d1, &offset));
    }
    dot(&offset, &normal).abs() / vector::norm(&normal)
}

/// `|d1 × d2| <= tolerance · |d1| |d2|`, i.e. the sine of the angle between
/// the directions is below tolerance.
fn is_parallel(normal: &Vector4<Real>, d1: &Vector4<Real>, d2: &Vector4<Real>) -> bool {
    norm_squared(normal) <= tolerance() * tolerance() * norm_squared(d1) * norm_squared(d2)
}

/// The pair of points, one on each line, that are closest to each other.
///
/// With `C = p2 - p1`, `M = d1 × d2` and `R = C × M / |M|²`, the points are
/// `p1 - (R·d2) d1` and `p2 - (R·d1) d2`. Parallel lines have no unique pair;
/// they return `p2` projected onto line 1, paired with `p2`.
pub fn closest_points(r1: &Ray, r2: &Ray) -> (Vector4<Real>, Vector4<Real>) {
    let (p1, p2) = (as_point(&r1.origin), as_point(&r2.origin));
    let (d1, d2) = (&r1.direction, &r2.direction);
    let c = p2 - p1;
    let m = cross(d1, d2);
    let m2 = norm_squared(&m);

    if is_parallel(&m, d1, d2) {
        let d1_len2 = norm_squared(d1);
        if d1_len2 == 0.0 {
            return (p1, p2);
        }
        let along = p1 + d1 * (dot(&c, d1) / d1_len2);
        return (along, p2);
    }

    let r = cross(&c, &(m / m2));
    let q1 = p1 - d1 * dot(&r, d2);
    let q2 = p2 - d2 * dot(&r, d1);
    (q1, q2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::{direction, point};

    fn ray(o: [Real; 3], d: [Real; 3]) -> Ray {
        Ray::new(point(o[0], o[1], o[2]), direction(d[0], d[1], d[2])).unwrap()
    }

    #[test]
    fn distances() {
        let x_axis = ray([0.0; 3], [1.0, 0.0, 0.0]);
        assert_eq!(distance(&x_axis, &x_axis), 0.0);
        assert_eq!(distance(&x_axis, &ray([1.0, 0.0, 0.0], [1.0, 0.0, 0.0])), 0.0);
        assert_eq!(distance(&x_axis, &ray([0.0, 1.0, 0.0], [1.0, 0.0, 0.0])), 1.0);
        assert_eq!(distance(&x_axis, &ray([0.0, 1.0, 0.0], [0.0, 0.0, 1.0])), 1.0);
    }

    #[test]
    fn nearly_parallel_lines_that_meet_have_zero_distance() {
        let x_axis = ray([0.0; 3], [1.0, 0.0, 0.0]);
        let tilt: Real = 0.01;
        let other = ray([0.0, 100.0 * tilt.tan(), 0.0], [tilt.cos(), tilt.sin(), 0.0]);
        assert!(distance(&x_axis, &other) < tolerance());
        let (p, q) = closest_points(&x_axis, &other);
        assert!(vector::norm(&(p - q)) < tolerance());
        assert!((p.x + 100.0).abs() < 1e-3);
    }

    #[test]
    fn closest_points_on_axis_lines() {
        let cases = [
            (([0.0, 0.0, 0.0], [1.0, 0.0, 0.0]), ([0.0, 0.0, 0.0], [0.0, 1.0, 0.0]), [0.0, 0.0, 0.0], [0.0, 0.0, 0.0]),
            (([0.0, 1.0, 0.0], [1.0, 0.0, 0.0]), ([1.0, 0.0, 0.0], [0.0, 1.0, 0.0]), [1.0, 1.0, 0.0], [1.0, 1.0, 0.0]),
            (([1.0, 1.0, 0.0], [1.0, 0.0, 0.0]), ([1.0, 1.0, 0.0], [0.0, 1.0, 0.0]), [1.0, 1.0, 0.0], [1.0, 1.0, 0.0]),
            (([1.0, 2.0, 3.0], [1.0, 0.0, 0.0]), ([4.0, 5.0, 6.0], [0.0, 1.0, 0.0]), [4.0, 2.0, 3.0], [4.0, 2.0, 6.0]),
            (([1.0, 2.0, 3.0], [-13.0, 0.0, 0.0]), ([4.0, 5.0, 6.0], [0.0, -7.0, 0.0]), [4.0, 2.0, 3.0], [4.0, 2.0, 6.0]),
        ];
        for ((o1, d1), (o2, d2), e1, e2) in cases {
            let (p, q) = closest_points(&ray(o1, d1), &ray(o2, d2));
            assert_eq!(p, point(e1[0], e1[1], e1[2]));
            assert_eq!(q, point(e2[0], e2[1], e2[2]));
        }
    }

    #[test]
    fn parallel_lines_project_second_origin() {
        let (p, q) = closest_points(&ray([0.0; 3], [0.0, 0.0, 1.0]), &ray([1.0, 2.0, 3.0], [0.0, 0.0, -1.0]));
        assert_eq!(p, point(0.0, 0.0, 3.0));
        assert_eq!(q, point(1.0, 2.0, 3.0));
    }
}
