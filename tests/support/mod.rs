//! Test support library
//! Provides seeded random batches and comparison helpers for tests.
#![allow(dead_code)]

use homog::{Batch, float_types::Real, vector::direction};
use nalgebra::{Matrix4, Vector4};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Deterministic generator so failures reproduce.
pub fn rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Uniform values in `[lo, hi)` with the given leading shape.
pub fn uniform(rng: &mut ChaCha8Rng, shape: &[usize], lo: Real, hi: Real) -> Batch<Real> {
    let len: usize = shape.iter().product();
    let data = (0..len).map(|_| rng.gen_range(lo..hi)).collect();
    Batch::new(shape, data).unwrap()
}

/// Quick helper to compare floating-point results with an acceptable tolerance.
pub fn approx_eq(a: Real, b: Real, eps: Real) -> bool {
    (a - b).abs() < eps
}

/// `|a - b| <= atol + rtol * |b|` on every component.
pub fn allclose(a: &Vector4<Real>, b: &Vector4<Real>, rtol: Real, atol: Real) -> bool {
    (0..4).all(|i| (a[i] - b[i]).abs() <= atol + rtol * b[i].abs())
}

/// Largest absolute entry of `a - b`.
pub fn max_abs_diff(a: &Matrix4<Real>, b: &Matrix4<Real>) -> Real {
    (a - b).abs().max()
}

/// Shorthand for a direction from an array.
pub fn dir(v: [Real; 3]) -> Vector4<Real> {
    direction(v[0], v[1], v[2])
}
