//! Minimal strided N-dimensional array used as einsum operands and results.
//!
//! Storage is shared: cloning a tensor or taking a view never copies data,
//! and writes through one handle are visible through every other handle on
//! the same storage.

use std::sync::Arc;

use parking_lot::RwLock;
use smallvec::SmallVec;

use crate::dtype::MemoryOrder;
use crate::error::{EinsumError, EinsumResult};

/// Shared element buffer behind one or more tensors.
pub type Storage<T> = Arc<RwLock<Vec<T>>>;

/// Compute row-major (C order) element strides from shape.
///
/// ```
/// use einsum_sumprod::tensor::row_major_strides;
///
/// assert_eq!(row_major_strides(&[3, 4, 5]), vec![20, 5, 1]);
/// assert_eq!(row_major_strides(&[]), Vec::<usize>::new());
/// ```
pub fn row_major_strides(shape: &[usize]) -> Vec<usize> {
    let mut strides = vec![0; shape.len()];
    let mut stride = 1;
    for (s, &dim) in strides.iter_mut().zip(shape.iter()).rev() {
        *s = stride;
        stride *= dim.max(1);
    }
    strides
}

/// Compute column-major (Fortran order) element strides from shape.
///
/// ```
/// use einsum_sumprod::tensor::column_major_strides;
///
/// assert_eq!(column_major_strides(&[3, 4, 5]), vec![1, 3, 12]);
/// ```
pub fn column_major_strides(shape: &[usize]) -> Vec<usize> {
    let mut strides = Vec::with_capacity(shape.len());
    let mut stride = 1;
    for &dim in shape {
        strides.push(stride);
        stride *= dim.max(1);
    }
    strides
}

/// Advances a row-major multi-index over `shape`, last axis fastest.
///
/// Returns false once every index has been visited.
#[inline]
pub(crate) fn next_index(index: &mut [usize], shape: &[usize]) -> bool {
    for axis in (0..shape.len()).rev() {
        index[axis] += 1;
        if index[axis] < shape[axis] {
            return true;
        }
        index[axis] = 0;
    }
    false
}

/// A strided view onto shared storage.
#[derive(Debug, Clone)]
pub struct Tensor<T> {
    storage: Storage<T>,
    shape: Vec<usize>,
    strides: Vec<usize>,
    offset: usize,
}

impl<T: Copy> Tensor<T> {
    /// Creates a tensor from row-major data.
    ///
    /// ```
    /// use einsum_sumprod::Tensor;
    ///
    /// let t = Tensor::from_vec(vec![1, 2, 3, 4, 5, 6], &[2, 3]).unwrap();
    /// assert_eq!(t.get(&[1, 0]), Some(4));
    /// ```
    pub fn from_vec(data: Vec<T>, shape: &[usize]) -> EinsumResult<Self> {
        Self::from_vec_with_order(data, shape, MemoryOrder::RowMajor)
    }

    /// Creates a tensor from data laid out in `order` (`Native` reads as row-major).
    pub fn from_vec_with_order(
        data: Vec<T>,
        shape: &[usize],
        order: MemoryOrder,
    ) -> EinsumResult<Self> {
        let expected: usize = shape.iter().product();
        if data.len() != expected {
            return Err(EinsumError::shape(format!(
                "data has {} elements, shape {:?} needs {}",
                data.len(),
                shape,
                expected
            )));
        }
        let strides = match order {
            MemoryOrder::ColumnMajor => column_major_strides(shape),
            MemoryOrder::RowMajor | MemoryOrder::Native => row_major_strides(shape),
        };
        Ok(Self {
            storage: Arc::new(RwLock::new(data)),
            shape: shape.to_vec(),
            strides,
            offset: 0,
        })
    }

    /// Creates a tensor filled with `value`.
    pub fn full(shape: &[usize], value: T, order: MemoryOrder) -> Self {
        let len: usize = shape.iter().product();
        let strides = match order {
            MemoryOrder::ColumnMajor => column_major_strides(shape),
            MemoryOrder::RowMajor | MemoryOrder::Native => row_major_strides(shape),
        };
        Self {
            storage: Arc::new(RwLock::new(vec![value; len])),
            shape: shape.to_vec(),
            strides,
            offset: 0,
        }
    }

    /// Creates a tensor of default values (zero for every numeric element).
    pub fn zeros(shape: &[usize], order: MemoryOrder) -> Self
    where
        T: Default,
    {
        Self::full(shape, T::default(), order)
    }

    /// Creates a 0-dimensional tensor holding one value.
    pub fn scalar(value: T) -> Self {
        Self::full(&[], value, MemoryOrder::RowMajor)
    }

    /// Creates a view with new shape, strides and offset on the same storage.
    ///
    /// Fails if any reachable element lies outside the storage.
    pub fn view(&self, shape: &[usize], strides: &[usize], offset: usize) -> EinsumResult<Self> {
        if shape.len() != strides.len() {
            return Err(EinsumError::shape(format!(
                "view shape {:?} and strides {:?} differ in rank",
                shape, strides
            )));
        }
        let len = self.storage.read().len();
        if shape.iter().all(|&d| d > 0) {
            let last = shape
                .iter()
                .zip(strides.iter())
                .fold(offset, |acc, (&d, &s)| acc + (d - 1) * s);
            if last >= len {
                return Err(EinsumError::shape(format!(
                    "view reaches element {} of a buffer with {} elements",
                    last, len
                )));
            }
        }
        Ok(Self {
            storage: Arc::clone(&self.storage),
            shape: shape.to_vec(),
            strides: strides.to_vec(),
            offset,
        })
    }

    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Element strides, one per axis.
    #[inline]
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[inline]
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Number of logical elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.shape.iter().product()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn linear(&self, indices: &[usize]) -> Option<usize> {
        if indices.len() != self.shape.len() {
            return None;
        }
        let mut linear = self.offset;
        for ((&i, &d), &s) in indices.iter().zip(self.shape.iter()).zip(self.strides.iter()) {
            if i >= d {
                return None;
            }
            linear += i * s;
        }
        Some(linear)
    }

    /// Reads one element.
    pub fn get(&self, indices: &[usize]) -> Option<T> {
        let linear = self.linear(indices)?;
        self.storage.read().get(linear).copied()
    }

    /// Writes one element, visible through every tensor sharing this storage.
    pub fn set(&self, indices: &[usize], value: T) -> EinsumResult<()> {
        let linear = self.linear(indices).ok_or_else(|| {
            EinsumError::shape(format!(
                "index {:?} out of bounds for shape {:?}",
                indices, self.shape
            ))
        })?;
        let mut guard = self.storage.write();
        match guard.get_mut(linear) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(EinsumError::shape(format!(
                "element {} outside storage of {}",
                linear,
                guard.len()
            ))),
        }
    }

    /// Logical elements in row-major order.
    pub fn to_vec(&self) -> Vec<T> {
        let guard = self.storage.read();
        let mut out = Vec::with_capacity(self.len());
        if self.is_empty() {
            return out;
        }
        let mut index: SmallVec<[usize; 8]> = SmallVec::from_elem(0, self.ndim());
        loop {
            let linear = self.offset
                + index
                    .iter()
                    .zip(self.strides.iter())
                    .map(|(&i, &s)| i * s)
                    .sum::<usize>();
            out.push(guard[linear]);
            if !next_index(&mut index, &self.shape) {
                break;
            }
        }
        out
    }

    /// Writes `value` to every logical element.
    pub fn fill(&self, value: T) {
        if self.is_empty() {
            return;
        }
        let mut guard = self.storage.write();
        let mut index: SmallVec<[usize; 8]> = SmallVec::from_elem(0, self.ndim());
        loop {
            let linear = self.offset
                + index
                    .iter()
                    .zip(self.strides.iter())
                    .map(|(&i, &s)| i * s)
                    .sum::<usize>();
            if let Some(slot) = guard.get_mut(linear) {
                *slot = value;
            }
            if !next_index(&mut index, &self.shape) {
                break;
            }
        }
    }

    /// Deep copy into fresh row-major storage.
    pub fn to_contiguous(&self) -> Self {
        let data = self.to_vec();
        Self {
            storage: Arc::new(RwLock::new(data)),
            strides: row_major_strides(&self.shape),
            shape: self.shape.clone(),
            offset: 0,
        }
    }

    /// Element-wise conversion into fresh row-major storage.
    pub fn map<U: Copy>(&self, f: impl FnMut(T) -> U) -> Tensor<U> {
        let data: Vec<U> = self.to_vec().into_iter().map(f).collect();
        Tensor {
            storage: Arc::new(RwLock::new(data)),
            strides: row_major_strides(&self.shape),
            shape: self.shape.clone(),
            offset: 0,
        }
    }

    /// Returns true if both tensors read from the same buffer.
    pub fn shares_storage(&self, other: &Tensor<T>) -> bool {
        Arc::ptr_eq(&self.storage, &other.storage)
    }

    pub fn is_row_contiguous(&self) -> bool {
        self.layout_matches(&row_major_strides(&self.shape))
    }

    pub fn is_column_contiguous(&self) -> bool {
        self.layout_matches(&column_major_strides(&self.shape))
    }

    fn layout_matches(&self, dense: &[usize]) -> bool {
        self.shape
            .iter()
            .zip(self.strides.iter().zip(dense.iter()))
            .all(|(&d, (&s, &expected))| d <= 1 || s == expected)
    }

    pub(crate) fn storage(&self) -> &Storage<T> {
        &self.storage
    }
}
