//! Batched **homogeneous transforms**, quaternions and ray/plane geometry.
//!
//! Points `(x, y, z, 1)`, directions `(x, y, z, 0)`, 4x4 rigid transforms,
//! unit quaternions and rays are stored as [`Batch`]es: arrays of fixed-size
//! nalgebra elements with an arbitrary leading shape that broadcast against
//! each other with numpy rules.
//!
//! # Features
//! #### Default
//! - **f64**: use f64 as Real
//!
//! #### Optional
//! - **f32**: use f32 as Real, this conflicts with f64
//! - **parallel**: evaluate batch kernels with rayon

#![forbid(unsafe_code)]
#![warn(clippy::approx_constant, clippy::all)]

pub mod backend;
pub mod batch;
pub mod decompose;
pub mod errors;
pub mod float_types;
pub mod geometry;
pub mod quat;
pub mod ray;
pub mod transform;
pub mod vector;

#[cfg(any(all(feature = "f64", feature = "f32"), not(any(feature = "f64", feature = "f32"))))]
compile_error!("Either 'f64' or 'f32' feature must be specified, but not both");

pub use batch::Batch;
pub use errors::HomogError;
pub use float_types::Real;
pub use ray::{Plane, Ray};
