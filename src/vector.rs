//! Homogeneous points (w = 1) and directions (w = 0)
//!
//! Every product here works on the first three components only; the
//! homogeneous coordinate never leaks into a length or an angle.

use crate::batch::{Batch, leading_shape};
use crate::errors::HomogError;
use crate::float_types::Real;
use nalgebra::{Vector3, Vector4};
use rand::Rng;
use rand_distr::StandardNormal;

/// A point `(x, y, z, 1)`.
#[inline]
pub fn point(x: Real, y: Real, z: Real) -> Vector4<Real> {
    Vector4::new(x, y, z, 1.0)
}

/// A direction `(x, y, z, 0)`.
#[inline]
pub fn direction(x: Real, y: Real, z: Real) -> Vector4<Real> {
    Vector4::new(x, y, z, 0.0)
}

/// `v` as a point, whatever its current w.
#[inline]
pub fn as_point(v: &Vector4<Real>) -> Vector4<Real> {
    point(v.x, v.y, v.z)
}

/// `v` as a direction, whatever its current w.
#[inline]
pub fn as_direction(v: &Vector4<Real>) -> Vector4<Real> {
    direction(v.x, v.y, v.z)
}

#[inline]
pub fn is_point(v: &Vector4<Real>) -> bool {
    v.w == 1.0
}

#[inline]
pub fn is_direction(v: &Vector4<Real>) -> bool {
    v.w == 0.0
}

#[inline]
pub fn xyz(v: &Vector4<Real>) -> Vector3<Real> {
    v.xyz()
}

/// Dot product of the first three components.
#[inline]
pub fn dot(a: &Vector4<Real>, b: &Vector4<Real>) -> Real {
    a.x * b.x + a.y * b.y + a.z * b.z
}

/// Cross product of the first three components, returned as a direction.
#[inline]
pub fn cross(a: &Vector4<Real>, b: &Vector4<Real>) -> Vector4<Real> {
    direction(
        a.y * b.z - a.z * b.y,
        a.z * b.x - a.x * b.z,
        a.x * b.y - a.y * b.x,
    )
}

#[inline]
pub fn norm_squared(v: &Vector4<Real>) -> Real {
    dot(v, v)
}

#[inline]
pub fn norm(v: &Vector4<Real>) -> Real {
    norm_squared(v).sqrt()
}

/// Unit direction along `v`, or `None` for a zero-length (or non-finite) input.
#[inline]
pub fn normalize(v: &Vector4<Real>) -> Option<Vector4<Real>> {
    let n = norm(v);
    if n > 0.0 && n.is_finite() {
        Some(direction(v.x / n, v.y / n, v.z / n))
    } else {
        None
    }
}

/// Component of `v` along `onto` (which need not be unit length).
#[inline]
pub fn project(onto: &Vector4<Real>, v: &Vector4<Real>) -> Vector4<Real> {
    let scale = dot(onto, v) / norm_squared(onto);
    as_direction(onto) * scale
}

/// Component of `v` perpendicular to `onto`; keeps the w of `v`.
#[inline]
pub fn project_perpendicular(onto: &Vector4<Real>, v: &Vector4<Real>) -> Vector4<Real> {
    v - project(onto, v)
}

/// Some unit direction perpendicular to `v`, chosen deterministically.
pub fn any_perpendicular(v: &Vector4<Real>) -> Vector4<Real> {
    let a = v.xyz().abs();
    let helper = if a.x <= a.y && a.x <= a.z {
        direction(1.0, 0.0, 0.0)
    } else if a.y <= a.z {
        direction(0.0, 1.0, 0.0)
    } else {
        direction(0.0, 0.0, 1.0)
    };
    // a nonzero v is never parallel to its smallest axis
    normalize(&cross(v, &helper)).unwrap_or(helper)
}

/// Direction with iid standard-normal components (not normalized).
pub fn random_vector<R: Rng + ?Sized>(rng: &mut R) -> Vector4<Real> {
    direction(
        rng.sample(StandardNormal),
        rng.sample(StandardNormal),
        rng.sample(StandardNormal),
    )
}

/// Uniformly distributed unit direction.
pub fn random_direction<R: Rng + ?Sized>(rng: &mut R) -> Vector4<Real> {
    loop {
        if let Some(unit) = normalize(&random_vector(rng)) {
            return unit;
        }
    }
}

/// Point with iid standard-normal coordinates.
pub fn random_point<R: Rng + ?Sized>(rng: &mut R) -> Vector4<Real> {
    as_point(&random_vector(rng))
}

impl Batch<Vector4<Real>> {
    /// Points from a flat row-major buffer whose trailing dimension is 3
    /// (w = 1 is appended) or 4 (taken as is).
    pub fn points_from_flat(shape: &[usize], data: &[Real]) -> Result<Self, HomogError> {
        Self::homogeneous_from_flat(shape, data, 1.0)
    }

    /// Directions from a flat row-major buffer whose trailing dimension is 3
    /// (w = 0 is appended) or 4 (taken as is).
    pub fn directions_from_flat(shape: &[usize], data: &[Real]) -> Result<Self, HomogError> {
        Self::homogeneous_from_flat(shape, data, 0.0)
    }

    fn homogeneous_from_flat(shape: &[usize], data: &[Real], w: Real) -> Result<Self, HomogError> {
        match shape.last() {
            Some(3) => {
                let leading = leading_shape(shape, &[3], data.len())?;
                let elements = data
                    .chunks_exact(3)
                    .map(|c| Vector4::new(c[0], c[1], c[2], w))
                    .collect();
                Batch::new(leading, elements)
            },
            Some(4) => {
                let leading = leading_shape(shape, &[4], data.len())?;
                let elements = data
                    .chunks_exact(4)
                    .map(|c| Vector4::new(c[0], c[1], c[2], c[3]))
                    .collect();
                Batch::new(leading, elements)
            },
            _ => Err(HomogError::Shape {
                expected: "trailing dimension 3 or 4".to_string(),
                found: shape.to_vec(),
            }),
        }
    }

    /// Flat row-major layout with trailing dimension 4.
    pub fn to_flat(&self) -> (Vec<usize>, Vec<Real>) {
        let mut shape = self.shape().to_vec();
        shape.push(4);
        let data = self.iter().flat_map(|v| [v.x, v.y, v.z, v.w]).collect();
        (shape, data)
    }

    /// Elementwise unit directions; `None` marks zero-length elements.
    pub fn normalize(&self) -> Batch<Option<Vector4<Real>>> {
        self.map(normalize)
    }

    pub fn norms(&self) -> Batch<Real> {
        self.map(norm)
    }

    pub fn dot(&self, other: &Self) -> Result<Batch<Real>, HomogError> {
        self.zip_with(other, dot)
    }

    pub fn cross(&self, other: &Self) -> Result<Self, HomogError> {
        self.zip_with(other, cross)
    }

    pub fn project_perpendicular(&self, v: &Self) -> Result<Self, HomogError> {
        self.zip_with(v, project_perpendicular)
    }

    pub fn are_points(&self) -> bool {
        self.all(is_point)
    }

    pub fn are_directions(&self) -> bool {
        self.all(is_direction)
    }

    pub fn random_directions<R: Rng + ?Sized>(rng: &mut R, shape: &[usize]) -> Self {
        let len = shape.iter().product();
        let data = (0..len).map(|_| random_direction(rng)).collect();
        Self::new_unchecked(shape, data)
    }

    pub fn random_points<R: Rng + ?Sized>(rng: &mut R, shape: &[usize]) -> Self {
        let len = shape.iter().product();
        let data = (0..len).map(|_| random_point(rng)).collect();
        Self::new_unchecked(shape, data)
    }

    pub fn random_vectors<R: Rng + ?Sized>(rng: &mut R, shape: &[usize]) -> Self {
        let len = shape.iter().product();
        let data = (0..len).map(|_| random_vector(rng)).collect();
        Self::new_unchecked(shape, data)
    }
}
