//! # Dense vector
//!
//! Wrapping a `Vec` such that it has a fixed size and can interact with sparse vectors.
use std::fmt;
use std::fmt::Display;
use std::ops::{Index, IndexMut};
use std::slice::Iter;

use num_traits::Float;

use crate::data::linear_algebra::SparseTuple;

/// Uses a `Vec` as underlying data a structure. Length is fixed at creation.
#[derive(Debug, Clone, PartialEq)]
pub struct Dense<F> {
    data: Vec<F>,
}

impl<F> Dense<F> {
    /// Wrap values.
    #[must_use]
    pub fn new(data: Vec<F>) -> Self {
        Self { data }
    }

    /// Create a vector with all values being equal to a given value.
    ///
    /// # Arguments
    ///
    /// * `value`: The value which all elements of this vector are equal to.
    /// * `len`: Length of the vector, number of elements.
    #[must_use]
    pub fn constant(value: F, len: usize) -> Self
    where
        F: Clone,
    {
        Self { data: vec![value; len] }
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the vector has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Iterate over the values.
    pub fn iter(&self) -> Iter<'_, F> {
        self.data.iter()
    }
}

impl<F: Float> Dense<F> {
    /// A vector of zeros.
    #[must_use]
    pub fn zeros(len: usize) -> Self {
        Self::constant(F::zero(), len)
    }

    /// Set all values to zero.
    pub fn clear(&mut self) {
        for value in &mut self.data {
            *value = F::zero();
        }
    }

    /// Add a multiple of a sparse vector to this vector.
    ///
    /// # Arguments
    ///
    /// * `multiple`: Factor to multiply the values of `other` with.
    /// * `other`: Sparse entries with indices smaller than the length of this vector.
    pub fn mult_add(&mut self, multiple: F, other: &[SparseTuple<F>]) {
        for &(i, value) in other {
            self.data[i] = self.data[i] + multiple * value;
        }
    }

    /// Inner product with sparse entries.
    #[must_use]
    pub fn inner_product_with_sparse(&self, other: &[SparseTuple<F>]) -> F {
        other.iter().fold(F::zero(), |total, &(i, value)| total + self.data[i] * value)
    }

    /// Squared Euclidean norm.
    #[must_use]
    pub fn length2(&self) -> F {
        self.data.iter().fold(F::zero(), |total, &value| total + value * value)
    }

    /// Largest absolute value, `0` for an empty vector.
    #[must_use]
    pub fn max_abs(&self) -> F {
        self.data.iter().fold(F::zero(), |max, &value| max.max(value.abs()))
    }
}

impl<F> Index<usize> for Dense<F> {
    type Output = F;

    fn index(&self, index: usize) -> &Self::Output {
        debug_assert!(index < self.data.len());

        &self.data[index]
    }
}

impl<F> IndexMut<usize> for Dense<F> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        debug_assert!(index < self.data.len());

        &mut self.data[index]
    }
}

impl<F: Display> Display for Dense<F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[")?;
        for (i, value) in self.data.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", value)?;
        }
        write!(f, "]")
    }
}
