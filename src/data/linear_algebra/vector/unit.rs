//! # Unit vector
//!
//! The standard basis vector `e_i`, used for the slack columns of a linear program.
use std::fmt;
use std::fmt::Display;
use std::ops::Deref;

use num_traits::One;

use crate::data::linear_algebra::SparseTuple;
use crate::data::linear_algebra::vector::SparseVector;

/// A vector with a single entry that has value `1`, at an arbitrary index.
///
/// Only read access is possible. Code that needs to modify the vector has to promote it to a
/// `SparseVector` first, which no longer carries the guarantee of being a unit vector.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Unit<F> {
    entry: [SparseTuple<F>; 1],
}

impl<F: One> Unit<F> {
    /// Create the `i`th unit vector.
    #[must_use]
    pub fn new(i: usize) -> Self {
        Self { entry: [(i, F::one())] }
    }

    /// Value of the `n`th entry, which is always `1`.
    ///
    /// # Arguments
    ///
    /// * `n`: Entry position, there is only one entry so this should be `0`.
    #[must_use]
    pub fn value(&self, n: usize) -> F {
        debug_assert_eq!(n, 0);

        F::one()
    }
}

impl<F> Unit<F> {
    /// The index of the nonzero entry.
    #[must_use]
    pub fn index(&self) -> usize {
        self.entry[0].0
    }

    /// Number of entries, always `1`.
    #[must_use]
    pub fn size(&self) -> usize {
        1
    }

    /// Dimension of the smallest dense vector this vector fits in.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.index() + 1
    }

    /// Promote to a sparse vector that can be modified.
    ///
    /// # Arguments
    ///
    /// * `capacity`: Capacity of the new sparse vector, at least `1`.
    #[must_use]
    pub fn to_sparse(&self, capacity: usize) -> SparseVector<F>
    where
        F: One,
    {
        SparseVector::with_entries(vec![(self.index(), F::one())], capacity)
    }
}

impl<F> Deref for Unit<F> {
    type Target = [SparseTuple<F>];

    fn deref(&self) -> &Self::Target {
        &self.entry
    }
}

impl<F> Display for Unit<F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "e{}", self.index())
    }
}
