//! Transform builders
//!
//! Rotations (Rodrigues), rotations about an arbitrary center, screw motions,
//! translations and three-point frames, each as a single-element kernel plus
//! a broadcasting batch form.

use crate::batch::{Batch, leading_shape, zip3_with, zip4_with};
use crate::errors::HomogError;
use crate::float_types::{Real, tolerance};
use crate::quat::{quaternion_to_transform, random_quaternion};
use crate::vector::{self, as_point, cross, normalize, project_perpendicular};
use nalgebra::{Matrix3, Matrix4, Translation3, Vector3, Vector4};
use rand::Rng;
use rand_distr::StandardNormal;

/// Two algebraically identical ways of evaluating Rodrigues' formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RotationFormula {
    /// Closed-form entries from sin/cos of the angle.
    #[default]
    Rodrigues,
    /// `R_ij = cos δ_ij + (1 - cos) a_i a_j - sin ε_ijk a_k`, summed explicitly.
    Contraction,
}

/// Rotation by `angle` radians about `axis` through the origin.
///
/// The axis need not be unit length. A zero axis yields the identity.
pub fn rotation(axis: &Vector4<Real>, angle: Real) -> Matrix4<Real> {
    let a = normalize(axis).unwrap_or_else(Vector4::zeros);
    let (s, c) = angle.sin_cos();
    let t = 1.0 - c;
    let (x, y, z) = (a.x, a.y, a.z);

    #[rustfmt::skip]
    let m = Matrix4::new(
        t * x * x + c,     t * x * y - s * z, t * x * z + s * y, 0.0,
        t * x * y + s * z, t * y * y + c,     t * y * z - s * x, 0.0,
        t * x * z - s * y, t * y * z + s * x, t * z * z + c,     0.0,
        0.0,               0.0,               0.0,               1.0,
    );
    m
}

#[inline]
fn levi_civita(i: usize, j: usize, k: usize) -> Real {
    match (i, j, k) {
        (0, 1, 2) | (1, 2, 0) | (2, 0, 1) => 1.0,
        (0, 2, 1) | (2, 1, 0) | (1, 0, 2) => -1.0,
        _ => 0.0,
    }
}

/// Same rotation as [`rotation`], evaluated as an index contraction.
pub fn rotation_contraction(axis: &Vector4<Real>, angle: Real) -> Matrix4<Real> {
    let a = normalize(axis).map(|u| u.xyz()).unwrap_or_else(Vector3::zeros);
    let (s, c) = angle.sin_cos();
    let mut r = Matrix4::identity();
    for i in 0..3 {
        for j in 0..3 {
            let delta = if i == j { 1.0 } else { 0.0 };
            let mut skew = 0.0;
            for k in 0..3 {
                skew += levi_civita(i, j, k) * a[k];
            }
            r[(i, j)] = c * delta + (1.0 - c) * a[i] * a[j] - s * skew;
        }
    }
    r
}

/// Rotation by `angle` about the line through `center` along `axis`:
/// `T(center) * R * T(-center)`.
pub fn rotation_about(axis: &Vector4<Real>, angle: Real, center: &Vector4<Real>) -> Matrix4<Real> {
    let mut m = rotation(axis, angle);
    let c = center.xyz();
    let shift = c - m.fixed_view::<3, 3>(0, 0) * c;
    m.fixed_view_mut::<3, 1>(0, 3).copy_from(&shift);
    m
}

/// Screw motion: [`rotation_about`] followed by a translation of `helical`
/// along the unit axis.
pub fn helical(
    axis: &Vector4<Real>,
    angle: Real,
    center: &Vector4<Real>,
    helical: Real,
) -> Matrix4<Real> {
    let mut m = rotation_about(axis, angle, center);
    if let Some(a) = normalize(axis) {
        let along = a.xyz() * helical;
        let mut column = m.fixed_view_mut::<3, 1>(0, 3);
        column += along;
    }
    m
}

/// Pure translation by the first three components of `t`.
pub fn translation(t: &Vector4<Real>) -> Matrix4<Real> {
    Translation3::from(t.xyz()).to_homogeneous()
}

/// Right-handed orthonormal frame at `v`: x points from `v` to `w`, y is the
/// part of `u - v` perpendicular to x, z = x × y.
///
/// `None` when the three points are (nearly) collinear or coincide.
pub fn frame(u: &Vector4<Real>, v: &Vector4<Real>, w: &Vector4<Real>) -> Option<Matrix4<Real>> {
    let (u, v, w) = (as_point(u), as_point(v), as_point(w));
    let x = normalize(&(w - v))?;
    let in_plane = project_perpendicular(&x, &(u - v));
    if vector::norm(&in_plane) <= tolerance() {
        return None;
    }
    let y = normalize(&in_plane)?;
    let z = cross(&x, &y);
    Some(Matrix4::from_columns(&[x, y, z, v]))
}

/// True when the bottom row is exactly `(0, 0, 0, 1)` and the rotation block
/// is orthonormal with determinant +1 (within tolerance).
pub fn is_homog_transform(m: &Matrix4<Real>) -> bool {
    if m.row(3) != Matrix4::<Real>::identity().row(3) {
        return false;
    }
    let r: Matrix3<Real> = m.fixed_view::<3, 3>(0, 0).into_owned();
    let gram = r.transpose() * r;
    (gram - Matrix3::identity()).abs().max() <= tolerance() && (r.determinant() - 1.0).abs() <= tolerance()
}

/// Uniformly random rotation with a normally distributed translation of
/// standard deviation `translation_sd`.
pub fn random_transform<R: Rng + ?Sized>(rng: &mut R, translation_sd: Real) -> Matrix4<Real> {
    let mut m = quaternion_to_transform(&random_quaternion(rng));
    for i in 0..3 {
        let offset: Real = rng.sample(StandardNormal);
        m[(i, 3)] = offset * translation_sd;
    }
    m
}

/// Batched [`rotation`]; axes and angles broadcast.
pub fn build_rotation(
    axes: &Batch<Vector4<Real>>,
    angles: &Batch<Real>,
) -> Result<Batch<Matrix4<Real>>, HomogError> {
    build_rotation_with(axes, angles, RotationFormula::default())
}

/// Batched rotation using the chosen evaluation of Rodrigues' formula.
pub fn build_rotation_with(
    axes: &Batch<Vector4<Real>>,
    angles: &Batch<Real>,
    formula: RotationFormula,
) -> Result<Batch<Matrix4<Real>>, HomogError> {
    match formula {
        RotationFormula::Rodrigues => axes.zip_with(angles, |a, t| rotation(a, *t)),
        RotationFormula::Contraction => axes.zip_with(angles, |a, t| rotation_contraction(a, *t)),
    }
}

/// Batched [`rotation_about`]; axes, angles and centers broadcast.
pub fn build_rotation_about(
    axes: &Batch<Vector4<Real>>,
    angles: &Batch<Real>,
    centers: &Batch<Vector4<Real>>,
) -> Result<Batch<Matrix4<Real>>, HomogError> {
    zip3_with(axes, angles, centers, |a, t, c| rotation_about(a, *t, c))
}

/// Batched [`helical`]; all four inputs broadcast.
pub fn build_helical(
    axes: &Batch<Vector4<Real>>,
    angles: &Batch<Real>,
    centers: &Batch<Vector4<Real>>,
    translations: &Batch<Real>,
) -> Result<Batch<Matrix4<Real>>, HomogError> {
    zip4_with(axes, angles, centers, translations, |a, t, c, h| {
        helical(a, *t, c, *h)
    })
}

/// Translations from a flat row-major buffer whose trailing dimension must be
/// exactly 3.
pub fn build_translation(shape: &[usize], data: &[Real]) -> Result<Batch<Matrix4<Real>>, HomogError> {
    let leading = leading_shape(shape, &[3], data.len())?;
    let offsets = data
        .chunks_exact(3)
        .map(|c| Translation3::new(c[0], c[1], c[2]).to_homogeneous())
        .collect();
    Batch::new(leading, offsets)
}

/// Batched [`translation`].
pub fn translations(offsets: &Batch<Vector4<Real>>) -> Batch<Matrix4<Real>> {
    offsets.map(translation)
}

/// Batched [`frame`]. Collinear triples are a contract violation.
pub fn build_frame(
    u: &Batch<Vector4<Real>>,
    v: &Batch<Vector4<Real>>,
    w: &Batch<Vector4<Real>>,
) -> Result<Batch<Matrix4<Real>>, HomogError> {
    let frames = zip3_with(u, v, w, frame)?;
    let shape = frames.shape().to_vec();
    let mut valid = Vec::with_capacity(frames.len());
    for (index, f) in frames.into_iter().enumerate() {
        valid.push(f.ok_or(HomogError::DegenerateFrame { index })?);
    }
    Ok(Batch::new_unchecked(&shape, valid))
}

pub fn random_transforms<R: Rng + ?Sized>(
    rng: &mut R,
    shape: &[usize],
    translation_sd: Real,
) -> Batch<Matrix4<Real>> {
    let len = shape.iter().product();
    let data = (0..len).map(|_| random_transform(rng, translation_sd)).collect();
    Batch::new_unchecked(shape, data)
}

/// True iff every element satisfies [`is_homog_transform`].
pub fn are_homog_transforms(transforms: &Batch<Matrix4<Real>>) -> bool {
    transforms.all(is_homog_transform)
}

/// `transforms * vectors`, broadcast.
pub fn apply(
    transforms: &Batch<Matrix4<Real>>,
    vectors: &Batch<Vector4<Real>>,
) -> Result<Batch<Vector4<Real>>, HomogError> {
    transforms.zip_with(vectors, |m, v| m * v)
}

/// `left * right`, broadcast.
pub fn compose(
    left: &Batch<Matrix4<Real>>,
    right: &Batch<Matrix4<Real>>,
) -> Result<Batch<Matrix4<Real>>, HomogError> {
    left.zip_with(right, |a, b| a * b)
}

impl Batch<Matrix4<Real>> {
    /// Transforms from a flat row-major buffer shaped `[.., 4, 4]`.
    pub fn transforms_from_flat(shape: &[usize], data: &[Real]) -> Result<Self, HomogError> {
        let leading = leading_shape(shape, &[4, 4], data.len())?;
        let matrices = data.chunks_exact(16).map(Matrix4::from_row_slice).collect();
        Batch::new(leading, matrices)
    }

    /// Flat row-major layout shaped `[.., 4, 4]`.
    pub fn to_flat(&self) -> (Vec<usize>, Vec<Real>) {
        let mut shape = self.shape().to_vec();
        shape.extend([4, 4]);
        let data = self
            .iter()
            .flat_map(|m| m.transpose().as_slice().to_vec())
            .collect();
        (shape, data)
    }
}
