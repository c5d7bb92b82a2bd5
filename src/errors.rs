//! Contract violations

use std::fmt::Display;

/// All the ways a caller can break the contract of a batched operation.
///
/// Geometric degeneracies (parallel planes, zero-angle rotations, zero-length
/// vectors) are *not* errors; they come back as per-element status values.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HomogError {
    /// (Shape) The data does not have the layout the operation requires
    Shape { expected: String, found: Vec<usize> },
    /// (Broadcast) Two leading shapes cannot be broadcast together
    Broadcast { left: Vec<usize>, right: Vec<usize> },
    /// (InvalidRay) A ray or plane has a non-unit direction or a malformed point
    InvalidRay { argument: &'static str, index: usize },
    /// (DegenerateFrame) Three points handed to a frame builder are collinear
    DegenerateFrame { index: usize },
    /// (DegenerateIntersection) Two planes have no unique line of intersection
    DegenerateIntersection { coincident: bool },
    /// (Singular) A matrix has no inverse
    Singular { index: usize },
    /// (BackendUnavailable) The requested execution backend is not compiled in
    BackendUnavailable(String),
}

impl Display for HomogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HomogError::Shape { expected, found } => write!(f, "(Shape) expected {}, found shape {:?}", expected, found),
            HomogError::Broadcast { left, right } => write!(f, "(Broadcast) shapes {:?} and {:?} cannot be broadcast together", left, right),
            HomogError::InvalidRay { argument, index } => write!(f, "(InvalidRay) {} is not a valid ray at batch element {}", argument, index),
            HomogError::DegenerateFrame { index } => write!(f, "(DegenerateFrame) points are collinear at batch element {}", index),
            HomogError::DegenerateIntersection { coincident } => {
                if *coincident {
                    write!(f, "(DegenerateIntersection) the planes coincide")
                } else {
                    write!(f, "(DegenerateIntersection) the planes are parallel and disjoint")
                }
            },
            HomogError::Singular { index } => write!(f, "(Singular) matrix is not invertible at batch element {}", index),
            HomogError::BackendUnavailable(name) => write!(f, "(BackendUnavailable) backend '{}' is not compiled in", name),
        }
    }
}
