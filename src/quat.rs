//! Quaternion <-> rotation conversion
//!
//! Quaternions are stored as nalgebra [`Quaternion`]s and read in
//! `(w, x, y, z)` order. Every quaternion this module returns is in the upper
//! half: the first nonzero of `w, x, y, z` is positive, so each rotation has
//! exactly one representative.

use crate::batch::{Batch, leading_shape};
use crate::errors::HomogError;
use crate::float_types::{Real, tolerance};
use nalgebra::{Matrix3, Matrix4, Quaternion};
use rand::Rng;
use rand_distr::StandardNormal;

/// Flip the sign of `q` when its first nonzero component is negative.
pub fn canonicalize_quaternion(q: &Quaternion<Real>) -> Quaternion<Real> {
    let negative = if q.w != 0.0 {
        q.w < 0.0
    } else if q.i != 0.0 {
        q.i < 0.0
    } else if q.j != 0.0 {
        q.j < 0.0
    } else {
        q.k < 0.0
    };
    if negative { -*q } else { *q }
}

/// Unit norm within tolerance.
pub fn is_valid_quaternion(q: &Quaternion<Real>) -> bool {
    (q.norm() - 1.0).abs() <= tolerance()
}

/// Uniformly random unit quaternion, canonicalized.
pub fn random_quaternion<R: Rng + ?Sized>(rng: &mut R) -> Quaternion<Real> {
    loop {
        let q: Quaternion<Real> = Quaternion::new(
            rng.sample(StandardNormal),
            rng.sample(StandardNormal),
            rng.sample(StandardNormal),
            rng.sample(StandardNormal),
        );
        let n = q.norm();
        if n > 0.0 {
            return canonicalize_quaternion(&(q / n));
        }
    }
}

/// Canonical unit quaternion of a proper rotation.
///
/// One of four formulas is picked by whichever of the trace or a diagonal
/// entry dominates, so the divisor is never small. Ties go to the first
/// branch that qualifies.
pub fn rotation_to_quaternion(r: &Matrix3<Real>) -> Quaternion<Real> {
    let (t0, t1, t2) = (r[(0, 0)], r[(1, 1)], r[(2, 2)]);
    let trace = t0 + t1 + t2;

    let q = if trace > 0.0 {
        let s = (trace + 1.0).sqrt() * 2.0;
        Quaternion::new(
            0.25 * s,
            (r[(2, 1)] - r[(1, 2)]) / s,
            (r[(0, 2)] - r[(2, 0)]) / s,
            (r[(1, 0)] - r[(0, 1)]) / s,
        )
    } else if t0 >= t1 && t0 >= t2 {
        let s = (1.0 + t0 - t1 - t2).sqrt() * 2.0;
        Quaternion::new(
            (r[(2, 1)] - r[(1, 2)]) / s,
            0.25 * s,
            (r[(0, 1)] + r[(1, 0)]) / s,
            (r[(0, 2)] + r[(2, 0)]) / s,
        )
    } else if t1 >= t2 {
        let s = (1.0 + t1 - t0 - t2).sqrt() * 2.0;
        Quaternion::new(
            (r[(0, 2)] - r[(2, 0)]) / s,
            (r[(0, 1)] + r[(1, 0)]) / s,
            0.25 * s,
            (r[(1, 2)] + r[(2, 1)]) / s,
        )
    } else {
        let s = (1.0 + t2 - t0 - t1).sqrt() * 2.0;
        Quaternion::new(
            (r[(1, 0)] - r[(0, 1)]) / s,
            (r[(0, 2)] + r[(2, 0)]) / s,
            (r[(1, 2)] + r[(2, 1)]) / s,
            0.25 * s,
        )
    };
    canonicalize_quaternion(&q)
}

/// [`rotation_to_quaternion`] of the upper-left 3x3 block.
pub fn transform_to_quaternion(m: &Matrix4<Real>) -> Quaternion<Real> {
    rotation_to_quaternion(&m.fixed_view::<3, 3>(0, 0).into_owned())
}

/// Rotation matrix of a unit quaternion.
pub fn quaternion_to_rotation(q: &Quaternion<Real>) -> Matrix3<Real> {
    let (r, i, j, k) = (q.w, q.i, q.j, q.k);
    #[rustfmt::skip]
    let m = Matrix3::new(
        1.0 - 2.0 * (j * j + k * k), 2.0 * (i * j - k * r),       2.0 * (i * k + j * r),
        2.0 * (i * j + k * r),       1.0 - 2.0 * (i * i + k * k), 2.0 * (j * k - i * r),
        2.0 * (i * k - j * r),       2.0 * (j * k + i * r),       1.0 - 2.0 * (i * i + j * j),
    );
    m
}

/// [`quaternion_to_rotation`] embedded in a 4x4 with no translation.
pub fn quaternion_to_transform(q: &Quaternion<Real>) -> Matrix4<Real> {
    quaternion_to_rotation(q).to_homogeneous()
}

/// Hamilton product; `q1 * q2` rotates by `q2` first, then `q1`.
#[inline]
pub fn quaternion_multiply(q1: &Quaternion<Real>, q2: &Quaternion<Real>) -> Quaternion<Real> {
    q1 * q2
}

impl Batch<Quaternion<Real>> {
    /// Quaternions from a flat row-major `[.., 4]` buffer in `(w, x, y, z)` order.
    pub fn quaternions_from_flat(shape: &[usize], data: &[Real]) -> Result<Self, HomogError> {
        let leading = leading_shape(shape, &[4], data.len())?;
        let quats = data
            .chunks_exact(4)
            .map(|c| Quaternion::new(c[0], c[1], c[2], c[3]))
            .collect();
        Batch::new(leading, quats)
    }

    /// Flat row-major `[.., 4]` layout in `(w, x, y, z)` order.
    pub fn to_flat(&self) -> (Vec<usize>, Vec<Real>) {
        let mut shape = self.shape().to_vec();
        shape.push(4);
        let data = self.iter().flat_map(|q| [q.w, q.i, q.j, q.k]).collect();
        (shape, data)
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R, shape: &[usize]) -> Self {
        let len = shape.iter().product();
        let quats = (0..len).map(|_| random_quaternion(rng)).collect();
        Batch::new_unchecked(shape, quats)
    }

    /// Batched [`transform_to_quaternion`].
    pub fn from_transforms(transforms: &Batch<Matrix4<Real>>) -> Self {
        transforms.map(transform_to_quaternion)
    }

    /// Batched [`rotation_to_quaternion`].
    pub fn from_rotations(rotations: &Batch<Matrix3<Real>>) -> Self {
        rotations.map(rotation_to_quaternion)
    }

    pub fn to_rotations(&self) -> Batch<Matrix3<Real>> {
        self.map(quaternion_to_rotation)
    }

    pub fn to_transforms(&self) -> Batch<Matrix4<Real>> {
        self.map(quaternion_to_transform)
    }

    /// Elementwise Hamilton product, broadcast.
    pub fn multiply(&self, other: &Self) -> Result<Self, HomogError> {
        self.zip_with(other, quaternion_multiply)
    }

    pub fn canonicalize(&self) -> Self {
        self.map(canonicalize_quaternion)
    }

    /// Per-element unit-norm check, for callers that bin or filter.
    pub fn validity(&self) -> Batch<bool> {
        self.map(is_valid_quaternion)
    }

    pub fn are_valid(&self) -> bool {
        self.all(is_valid_quaternion)
    }
}
