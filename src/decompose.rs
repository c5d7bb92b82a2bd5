//! Transform decomposition
//!
//! Recovers the rotation axis and angle of a rigid transform, the center of
//! the rotation and any screw translation along the axis, and rigid inverses.

use crate::batch::Batch;
use crate::errors::HomogError;
use crate::float_types::{Real, tolerance};
use crate::transform::is_homog_transform;
use crate::vector::{self, as_point, cross, direction, dot, normalize};
use nalgebra::{Matrix3, Matrix4, Vector4};

/// Unit axis and angle in `[0, pi]`.
///
/// `axis` is the zero direction when the rotation is the identity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisAngle {
    pub axis: Vector4<Real>,
    pub angle: Real,
}

impl AxisAngle {
    /// True when no axis could be recovered (identity rotation).
    pub fn is_identity(&self) -> bool {
        self.axis == Vector4::zeros()
    }
}

/// Axis and angle plus the point the rotation fixes and the screw translation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisAngleCenter {
    pub axis: Vector4<Real>,
    pub angle: Real,
    /// Fixed point of the rotation lying in the plane through the origin
    /// perpendicular to `axis`. `None` when the angle is (nearly) zero.
    pub center: Option<Vector4<Real>>,
    /// Translation along `axis` that no center can absorb.
    pub helical: Real,
}

/// How [`inverse_of`] produced its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InverseKind {
    /// Closed-form rigid inverse.
    Rigid,
    /// General matrix inverse; the input was not a rigid transform.
    General,
}

/// Unnormalized rotation axis from the skew-symmetric part; its length is
/// `2 * sin(angle)`.
#[inline]
pub fn fast_axis_of(m: &Matrix4<Real>) -> Vector4<Real> {
    direction(
        m[(2, 1)] - m[(1, 2)],
        m[(0, 2)] - m[(2, 0)],
        m[(1, 0)] - m[(0, 1)],
    )
}

/// Axis and angle of the rotation block of `m`.
///
/// The trace picks the formula. For angles up to pi/2 the skew part gives
/// both the axis and `asin`; past pi/2 the angle comes from `acos` of the
/// trace and the axis from the symmetric part, signed to agree with the skew
/// part, since the skew part vanishes as the angle approaches pi.
pub fn axis_angle_of(m: &Matrix4<Real>) -> AxisAngle {
    let skew = fast_axis_of(m);
    let sin_angle = (vector::norm(&skew) / 2.0).min(1.0);
    let cos_angle = ((m[(0, 0)] + m[(1, 1)] + m[(2, 2)] - 1.0) / 2.0).clamp(-1.0, 1.0);

    if cos_angle >= 0.0 {
        return AxisAngle {
            axis: normalize(&skew).unwrap_or_else(Vector4::zeros),
            angle: sin_angle.asin(),
        };
    }

    // sym = cos I + (1 - cos) a a^T, and 1 - cos > 1 here
    let r: Matrix3<Real> = m.fixed_view::<3, 3>(0, 0).into_owned();
    let outer = ((r + r.transpose()) * 0.5 - Matrix3::identity() * cos_angle) / (1.0 - cos_angle);
    let mut pivot = 0;
    for i in 1..3 {
        if outer[(i, i)] > outer[(pivot, pivot)] {
            pivot = i;
        }
    }
    let column = outer.column(pivot) / outer[(pivot, pivot)].sqrt();
    let mut axis = normalize(&direction(column.x, column.y, column.z)).unwrap_or_else(Vector4::zeros);
    if dot(&axis, &skew) < 0.0 {
        axis = -axis;
    }
    AxisAngle {
        axis,
        angle: cos_angle.acos(),
    }
}

/// Axis, angle, center and helical translation of a rigid transform.
///
/// The center solves `(I - R) c = t_perp`, where `t_perp` is the translation
/// with its along-axis part removed; that part is reported as `helical`.
pub fn axis_angle_center_of(m: &Matrix4<Real>) -> AxisAngleCenter {
    let AxisAngle { axis, angle } = axis_angle_of(m);
    let t = direction(m[(0, 3)], m[(1, 3)], m[(2, 3)]);
    if axis == Vector4::zeros() || angle <= tolerance() {
        return AxisAngleCenter {
            axis,
            angle,
            center: None,
            helical: 0.0,
        };
    }
    let helical = dot(&t, &axis);
    let t_perp = t - axis * helical;
    let cot_half = 1.0 / (angle / 2.0).tan();
    let center = (t_perp + cross(&axis, &t_perp) * cot_half) * 0.5;
    AxisAngleCenter {
        axis,
        angle,
        center: Some(as_point(&center)),
        helical,
    }
}

/// `[R^T | -R^T t]`, valid only for rigid `m`.
pub fn rigid_inverse(m: &Matrix4<Real>) -> Matrix4<Real> {
    let rt = m.fixed_view::<3, 3>(0, 0).transpose();
    let t = m.fixed_view::<3, 1>(0, 3).into_owned();
    let mut inv = Matrix4::identity();
    inv.fixed_view_mut::<3, 3>(0, 0).copy_from(&rt);
    inv.fixed_view_mut::<3, 1>(0, 3).copy_from(&(-(rt * t)));
    inv
}

/// Rigid inverse when `m` is a rigid transform, otherwise the general inverse.
/// `None` when `m` is singular.
pub fn inverse_of(m: &Matrix4<Real>) -> Option<(Matrix4<Real>, InverseKind)> {
    if is_homog_transform(m) {
        Some((rigid_inverse(m), InverseKind::Rigid))
    } else {
        m.try_inverse().map(|inv| (inv, InverseKind::General))
    }
}

/// Batched [`fast_axis_of`].
pub fn fast_axis(transforms: &Batch<Matrix4<Real>>) -> Batch<Vector4<Real>> {
    transforms.map(fast_axis_of)
}

/// Batched [`axis_angle_of`].
pub fn axis_angle(transforms: &Batch<Matrix4<Real>>) -> Batch<AxisAngle> {
    let out = transforms.map(axis_angle_of);
    let identities = out.iter().filter(|aa| aa.is_identity()).count();
    if identities > 0 {
        tracing::debug!(identities, total = out.len(), "rotations without a defined axis");
    }
    out
}

/// Batched [`axis_angle_center_of`].
pub fn axis_angle_center(transforms: &Batch<Matrix4<Real>>) -> Batch<AxisAngleCenter> {
    let out = transforms.map(axis_angle_center_of);
    let centerless = out.iter().filter(|aac| aac.center.is_none()).count();
    if centerless > 0 {
        tracing::debug!(centerless, total = out.len(), "rotations without a defined center");
    }
    out
}

/// Batched [`inverse_of`].
///
/// Elements that are not rigid are inverted generally and tagged
/// [`InverseKind::General`]; a singular element fails the whole call.
pub fn invert(
    transforms: &Batch<Matrix4<Real>>,
) -> Result<(Batch<Matrix4<Real>>, Batch<InverseKind>), HomogError> {
    let results = transforms.map(inverse_of);
    let shape = results.shape().to_vec();
    let mut inverses = Vec::with_capacity(results.len());
    let mut kinds = Vec::with_capacity(results.len());
    for (index, result) in results.into_iter().enumerate() {
        let (inv, kind) = result.ok_or(HomogError::Singular { index })?;
        inverses.push(inv);
        kinds.push(kind);
    }
    let general = kinds.iter().filter(|k| **k == InverseKind::General).count();
    if general > 0 {
        tracing::warn!(general, total = kinds.len(), "inverting non-rigid transforms");
    }
    Ok((Batch::new_unchecked(&shape, inverses), Batch::new_unchecked(&shape, kinds)))
}

impl Batch<AxisAngle> {
    pub fn axes(&self) -> Batch<Vector4<Real>> {
        self.map(|aa| aa.axis)
    }

    pub fn angles(&self) -> Batch<Real> {
        self.map(|aa| aa.angle)
    }
}

impl Batch<AxisAngleCenter> {
    pub fn axes(&self) -> Batch<Vector4<Real>> {
        self.map(|aac| aac.axis)
    }

    pub fn angles(&self) -> Batch<Real> {
        self.map(|aac| aac.angle)
    }

    pub fn centers(&self) -> Batch<Option<Vector4<Real>>> {
        self.map(|aac| aac.center)
    }
}
