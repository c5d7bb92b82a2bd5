//! Rays and planes
//!
//! A ray is a point plus a unit direction. The same pair doubles as a plane:
//! the plane through `origin` whose normal is `direction`.

use crate::batch::{Batch, leading_shape};
use crate::errors::HomogError;
use crate::float_types::{Real, tolerance};
use crate::vector::{self, normalize};
use nalgebra::{Matrix4, Vector4};
use rand::Rng;

/// A point (w = 1) and a unit direction (w = 0).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vector4<Real>,
    pub direction: Vector4<Real>,
}

/// A plane through `origin` with unit normal `direction`.
pub type Plane = Ray;

impl Ray {
    /// Ray through `origin` along `direction`; the direction is normalized and
    /// both homogeneous coordinates are forced. `None` for a zero direction.
    pub fn new(origin: Vector4<Real>, direction: Vector4<Real>) -> Option<Self> {
        Some(Self {
            origin: vector::as_point(&origin),
            direction: normalize(&direction)?,
        })
    }

    /// Ray built from raw parts, without normalization or validation.
    pub const fn from_parts(origin: Vector4<Real>, direction: Vector4<Real>) -> Self {
        Self { origin, direction }
    }

    /// Point (w exactly 1), direction w exactly 0, unit direction within tolerance.
    pub fn is_valid(&self) -> bool {
        vector::is_point(&self.origin)
            && vector::is_direction(&self.direction)
            && (vector::norm(&self.direction) - 1.0).abs() <= tolerance()
    }

    /// The point `origin + t * direction`.
    pub fn at(&self, t: Real) -> Vector4<Real> {
        self.origin + self.direction * t
    }

    /// Apply a transform to both the point and the direction.
    pub fn transform(&self, matrix: &Matrix4<Real>) -> Self {
        Self {
            origin: matrix * self.origin,
            direction: matrix * self.direction,
        }
    }

    /// Random ray through a standard-normal point (or `center` when given).
    pub fn random<R: Rng + ?Sized>(rng: &mut R, center: Option<&Vector4<Real>>) -> Self {
        let origin = match center {
            Some(c) => vector::as_point(c),
            None => vector::random_point(rng),
        };
        Self {
            origin,
            direction: vector::random_direction(rng),
        }
    }
}

impl Batch<Ray> {
    /// Rays from a flat row-major buffer shaped `[.., 4, 2]`: column 0 holds
    /// the point, column 1 the direction.
    pub fn rays_from_flat(shape: &[usize], data: &[Real]) -> Result<Self, HomogError> {
        let leading = leading_shape(shape, &[4, 2], data.len())?;
        let rays = data
            .chunks_exact(8)
            .map(|c| Ray {
                origin: Vector4::new(c[0], c[2], c[4], c[6]),
                direction: Vector4::new(c[1], c[3], c[5], c[7]),
            })
            .collect();
        Batch::new(leading, rays)
    }

    /// Flat row-major layout shaped `[.., 4, 2]`.
    pub fn to_flat(&self) -> (Vec<usize>, Vec<Real>) {
        let mut shape = self.shape().to_vec();
        shape.extend([4, 2]);
        let data = self
            .iter()
            .flat_map(|r| {
                [
                    r.origin.x,
                    r.direction.x,
                    r.origin.y,
                    r.direction.y,
                    r.origin.z,
                    r.direction.z,
                    r.origin.w,
                    r.direction.w,
                ]
            })
            .collect();
        (shape, data)
    }

    /// Pair up origins and directions, normalizing the directions.
    /// Zero directions are a contract violation.
    pub fn from_parts(
        origins: &Batch<Vector4<Real>>,
        directions: &Batch<Vector4<Real>>,
    ) -> Result<Self, HomogError> {
        let rays = origins.zip_with(directions, |o, d| Ray::new(*o, *d))?;
        let shape = rays.shape().to_vec();
        let mut valid = Vec::with_capacity(rays.len());
        for (index, ray) in rays.into_iter().enumerate() {
            valid.push(ray.ok_or(HomogError::InvalidRay {
                argument: "directions",
                index,
            })?);
        }
        Ok(Batch::new_unchecked(&shape, valid))
    }

    pub fn origins(&self) -> Batch<Vector4<Real>> {
        self.map(|r| r.origin)
    }

    pub fn directions(&self) -> Batch<Vector4<Real>> {
        self.map(|r| r.direction)
    }

    /// Apply `matrix` (broadcast) to every ray.
    pub fn transform(&self, matrix: &Batch<Matrix4<Real>>) -> Result<Self, HomogError> {
        self.zip_with(matrix, |r, m| r.transform(m))
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R, shape: &[usize]) -> Self {
        let len = shape.iter().product();
        let rays = (0..len).map(|_| Ray::random(rng, None)).collect();
        Batch::new_unchecked(shape, rays)
    }

    /// Random rays through the given centers (one ray per center).
    pub fn random_through<R: Rng + ?Sized>(rng: &mut R, centers: &Batch<Vector4<Real>>) -> Self {
        let rays = centers.iter().map(|c| Ray::random(rng, Some(c))).collect();
        Batch::new_unchecked(centers.shape(), rays)
    }

    /// Position of the first invalid ray, if any.
    pub(crate) fn first_invalid(&self) -> Option<usize> {
        self.iter().position(|r| !r.is_valid())
    }
}

/// True iff every ray has a point with w exactly 1 and a unit direction with
/// w exactly 0.
pub fn is_valid_rays(rays: &Batch<Ray>) -> bool {
    rays.all(Ray::is_valid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::{direction, point};
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rays(columns: [[Real; 2]; 4]) -> Batch<Ray> {
        let flat: Vec<Real> = columns.iter().flatten().copied().collect();
        Batch::<Ray>::rays_from_flat(&[4, 2], &flat).unwrap()
    }

    #[test]
    fn validity() {
        assert!(!is_valid_rays(&rays([[0.0, 1.0], [0.0, 0.0], [0.0, 0.0], [0.0, 0.0]])));
        assert!(!is_valid_rays(&rays([[0.0, 0.0], [0.0, 0.0], [0.0, 0.0], [1.0, 0.0]])));
        assert!(!is_valid_rays(&rays([[0.0, 0.0], [0.0, 3.0], [0.0, 0.0], [1.0, 0.0]])));
        assert!(is_valid_rays(&rays([[0.0, 0.0], [0.0, 1.0], [0.0, 0.0], [1.0, 0.0]])));
    }

    #[test]
    fn random_rays_are_valid() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let r = Batch::<Ray>::random(&mut rng, &[5, 6, 7]);
        assert_eq!(r.shape(), &[5, 6, 7]);
        assert!(is_valid_rays(&r));
        for ray in &r {
            assert_relative_eq!(vector::norm(&ray.direction), 1.0, epsilon = tolerance());
        }
        let (shape, flat) = r.to_flat();
        assert_eq!(shape, vec![5, 6, 7, 4, 2]);
        assert_eq!(Batch::<Ray>::rays_from_flat(&shape, &flat).unwrap(), r);
    }

    #[test]
    fn new_normalizes_direction() {
        let r = Ray::new(point(1.0, 2.0, 3.0), direction(-13.0, 0.0, 0.0)).unwrap();
        assert_eq!(r.direction, direction(-1.0, 0.0, 0.0));
        assert!(Ray::new(point(0.0, 0.0, 0.0), direction(0.0, 0.0, 0.0)).is_none());
    }

    #[test]
    fn wrong_trailing_shape_is_rejected() {
        assert!(Batch::<Ray>::rays_from_flat(&[2, 4], &[0.0; 8]).is_err());
        assert!(Batch::<Ray>::rays_from_flat(&[3, 2], &[0.0; 6]).is_err());
    }
}
