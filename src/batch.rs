//! `Batch<T>`: an n-dimensional array of fixed-size geometric elements
//!
//! The leading shape is stored explicitly; the trailing, fixed-size part of
//! each element (4-vector, 4x4 matrix, ray) lives in the element type itself.
//! Binary and n-ary operations broadcast leading shapes with numpy rules.

use crate::backend::execute;
use crate::errors::HomogError;

/// Row-major batch of elements with an arbitrary leading shape.
///
/// An empty shape (`[]`) holds exactly one element.
#[derive(Clone, Debug, PartialEq)]
pub struct Batch<T> {
    shape: Vec<usize>,
    data: Vec<T>,
}

impl<T> Batch<T> {
    /// Build a batch, checking that `data` fills `shape` exactly.
    pub fn new(shape: impl Into<Vec<usize>>, data: Vec<T>) -> Result<Self, HomogError> {
        let shape = shape.into();
        let expected: usize = shape.iter().product();
        if expected != data.len() {
            return Err(HomogError::Shape {
                expected: format!("a shape holding {} elements", data.len()),
                found: shape,
            });
        }
        Ok(Self { shape, data })
    }

    /// A zero-dimensional batch holding one element.
    pub fn single(value: T) -> Self {
        Self {
            shape: Vec::new(),
            data: vec![value],
        }
    }

    /// A one-dimensional batch.
    pub fn from_vec(data: Vec<T>) -> Self {
        Self {
            shape: vec![data.len()],
            data,
        }
    }

    /// Build a batch by evaluating `f` at every flat index on the active backend.
    pub fn from_fn<F>(shape: impl Into<Vec<usize>>, f: F) -> Self
    where
        T: Send,
        F: Fn(usize) -> T + Sync + Send,
    {
        let shape = shape.into();
        let len = shape.iter().product();
        Self {
            data: execute(len, f),
            shape,
        }
    }

    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    #[inline]
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// The element at a full multi-index, or `None` when out of bounds.
    pub fn get(&self, index: &[usize]) -> Option<&T> {
        if index.len() != self.shape.len() {
            return None;
        }
        let mut flat = 0;
        for (&i, &extent) in index.iter().zip(&self.shape) {
            if i >= extent {
                return None;
            }
            flat = flat * extent + i;
        }
        self.data.get(flat)
    }

    /// Reinterpret the leading shape without touching the data.
    pub fn reshape(self, shape: impl Into<Vec<usize>>) -> Result<Self, HomogError> {
        let shape = shape.into();
        if shape.iter().product::<usize>() != self.data.len() {
            return Err(HomogError::Shape {
                expected: format!("{} elements", self.data.len()),
                found: shape,
            });
        }
        Ok(Self {
            shape,
            data: self.data,
        })
    }

    /// The only element of a one-element batch.
    pub fn into_single(self) -> Option<T> {
        if self.data.len() == 1 {
            self.data.into_iter().next()
        } else {
            None
        }
    }
}

impl<T> Batch<T> {
    /// For call sites where shape and length agree by construction.
    pub(crate) fn new_unchecked(shape: &[usize], data: Vec<T>) -> Self {
        debug_assert_eq!(shape.iter().product::<usize>(), data.len());
        Self {
            shape: shape.to_vec(),
            data,
        }
    }
}

impl<T: Clone> Batch<T> {
    /// A batch where every element is `value`.
    pub fn filled(shape: impl Into<Vec<usize>>, value: T) -> Self {
        let shape = shape.into();
        let len = shape.iter().product();
        Self {
            data: vec![value; len],
            shape,
        }
    }
}

impl<T: Sync> Batch<T> {
    /// Elementwise map on the active backend.
    pub fn map<U, F>(&self, f: F) -> Batch<U>
    where
        U: Send,
        F: Fn(&T) -> U + Sync + Send,
    {
        Batch {
            shape: self.shape.clone(),
            data: execute(self.data.len(), |i| f(&self.data[i])),
        }
    }

    /// True when `pred` holds for every element (vacuously true when empty).
    pub fn all<F: Fn(&T) -> bool>(&self, pred: F) -> bool {
        self.data.iter().all(pred)
    }

    pub fn any<F: Fn(&T) -> bool>(&self, pred: F) -> bool {
        self.data.iter().any(pred)
    }

    /// Elementwise binary kernel over the broadcast shape of `self` and `other`.
    pub fn zip_with<U, V, F>(&self, other: &Batch<U>, f: F) -> Result<Batch<V>, HomogError>
    where
        U: Sync,
        V: Send,
        F: Fn(&T, &U) -> V + Sync + Send,
    {
        let shape = broadcast_shapes(&self.shape, &other.shape)?;
        let a = BroadcastIndex::new(&self.shape, &shape);
        let b = BroadcastIndex::new(&other.shape, &shape);
        let len = shape.iter().product();
        let data = execute(len, |i| f(&self.data[a.source(i)], &other.data[b.source(i)]));
        Ok(Batch { shape, data })
    }
}

impl<A, B> Batch<(A, B)> {
    /// Split a batch of pairs into a pair of batches with the same shape.
    pub fn unzip(self) -> (Batch<A>, Batch<B>) {
        let (left, right): (Vec<A>, Vec<B>) = self.data.into_iter().unzip();
        (
            Batch {
                shape: self.shape.clone(),
                data: left,
            },
            Batch {
                shape: self.shape,
                data: right,
            },
        )
    }
}

impl<T> IntoIterator for Batch<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Batch<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

impl<T> From<T> for Batch<T> {
    fn from(value: T) -> Self {
        Batch::single(value)
    }
}

/// Elementwise ternary kernel over the broadcast shape of three batches.
pub fn zip3_with<A, B, C, V, F>(
    a: &Batch<A>,
    b: &Batch<B>,
    c: &Batch<C>,
    f: F,
) -> Result<Batch<V>, HomogError>
where
    A: Sync,
    B: Sync,
    C: Sync,
    V: Send,
    F: Fn(&A, &B, &C) -> V + Sync + Send,
{
    let shape = broadcast_shapes(&broadcast_shapes(&a.shape, &b.shape)?, &c.shape)?;
    let (ia, ib, ic) = (
        BroadcastIndex::new(&a.shape, &shape),
        BroadcastIndex::new(&b.shape, &shape),
        BroadcastIndex::new(&c.shape, &shape),
    );
    let len = shape.iter().product();
    let data = execute(len, |i| {
        f(
            &a.data[ia.source(i)],
            &b.data[ib.source(i)],
            &c.data[ic.source(i)],
        )
    });
    Ok(Batch { shape, data })
}

/// Elementwise quaternary kernel over the broadcast shape of four batches.
pub fn zip4_with<A, B, C, D, V, F>(
    a: &Batch<A>,
    b: &Batch<B>,
    c: &Batch<C>,
    d: &Batch<D>,
    f: F,
) -> Result<Batch<V>, HomogError>
where
    A: Sync,
    B: Sync,
    C: Sync,
    D: Sync,
    V: Send,
    F: Fn(&A, &B, &C, &D) -> V + Sync + Send,
{
    let shape = broadcast_shapes(&a.shape, &b.shape)?;
    let shape = broadcast_shapes(&shape, &c.shape)?;
    let shape = broadcast_shapes(&shape, &d.shape)?;
    let (ia, ib, ic, id) = (
        BroadcastIndex::new(&a.shape, &shape),
        BroadcastIndex::new(&b.shape, &shape),
        BroadcastIndex::new(&c.shape, &shape),
        BroadcastIndex::new(&d.shape, &shape),
    );
    let len = shape.iter().product();
    let data = execute(len, |i| {
        f(
            &a.data[ia.source(i)],
            &b.data[ib.source(i)],
            &c.data[ic.source(i)],
            &d.data[id.source(i)],
        )
    });
    Ok(Batch { shape, data })
}

/// Broadcast two leading shapes with numpy rules: align on the right, and each
/// pair of extents must match or one of them must be 1.
pub fn broadcast_shapes(left: &[usize], right: &[usize]) -> Result<Vec<usize>, HomogError> {
    let ndim = left.len().max(right.len());
    let mut shape = vec![0; ndim];
    for d in 0..ndim {
        let l = if d < ndim - left.len() { 1 } else { left[d - (ndim - left.len())] };
        let r = if d < ndim - right.len() { 1 } else { right[d - (ndim - right.len())] };
        shape[d] = match (l, r) {
            (l, r) if l == r => l,
            (1, r) => r,
            (l, 1) => l,
            _ => {
                return Err(HomogError::Broadcast {
                    left: left.to_vec(),
                    right: right.to_vec(),
                });
            },
        };
    }
    Ok(shape)
}

/// Split a flat-layout shape into (leading shape, trailing shape), requiring
/// the trailing part to equal `trailing`.
pub(crate) fn leading_shape(
    shape: &[usize],
    trailing: &[usize],
    data_len: usize,
) -> Result<Vec<usize>, HomogError> {
    let shape_error = || HomogError::Shape {
        expected: format!("trailing dimensions {:?}", trailing),
        found: shape.to_vec(),
    };
    if shape.len() < trailing.len() || &shape[shape.len() - trailing.len()..] != trailing {
        return Err(shape_error());
    }
    if shape.iter().product::<usize>() != data_len {
        return Err(HomogError::Shape {
            expected: format!("a shape holding {} values", data_len),
            found: shape.to_vec(),
        });
    }
    Ok(shape[..shape.len() - trailing.len()].to_vec())
}

/// Maps a flat index in the broadcast output back to a flat index in one input.
struct BroadcastIndex {
    out_shape: Vec<usize>,
    strides: Vec<usize>,
    identity: bool,
}

impl BroadcastIndex {
    fn new(input: &[usize], out: &[usize]) -> Self {
        let offset = out.len() - input.len();
        let mut strides = vec![0; out.len()];
        let mut stride = 1;
        for d in (0..input.len()).rev() {
            strides[offset + d] = if input[d] == 1 { 0 } else { stride };
            stride *= input[d];
        }
        Self {
            out_shape: out.to_vec(),
            strides,
            identity: input == out,
        }
    }

    #[inline]
    fn source(&self, mut flat: usize) -> usize {
        if self.identity {
            return flat;
        }
        let mut src = 0;
        for d in (0..self.out_shape.len()).rev() {
            let extent = self.out_shape[d];
            src += (flat % extent) * self.strides[d];
            flat /= extent;
        }
        src
    }
}
