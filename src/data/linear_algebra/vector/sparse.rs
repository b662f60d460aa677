//! # Sparse vector
//!
//! Wrapping a `Vec<(usize, _)>` with a fixed capacity. Entries are kept in insertion order until
//! they are sorted explicitly.
use std::fmt;
use std::fmt::Display;
use std::ops::Deref;
use std::slice::Iter;

use log::debug;
use num_traits::{Float, Zero};

use crate::data::linear_algebra::SparseTuple;
use crate::data::linear_algebra::vector::DenseVector;

/// A sparse vector using a `Vec` with (index, value) combinations as back-end. Indices start at
/// `0`.
///
/// The number of entries, the `size`, can never exceed the `capacity` that was fixed at creation.
/// Each index appears at most once, with the exception of zero valued placeholder entries.
#[derive(PartialEq, Clone, Debug)]
pub struct Sparse<F> {
    data: Vec<SparseTuple<F>>,
    capacity: usize,
}

impl<F> Sparse<F> {
    /// Create an empty vector that can hold up to `capacity` entries.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Create a vector from entries, with a capacity equal to the number of entries.
    ///
    /// # Arguments
    ///
    /// * `data`: (index, value) tuples, in any order. Indices should be unique.
    #[must_use]
    pub fn new(data: Vec<SparseTuple<F>>) -> Self {
        let capacity = data.len();
        Self::with_entries(data, capacity)
    }

    /// Create a vector from entries with room for more.
    ///
    /// # Arguments
    ///
    /// * `data`: (index, value) tuples, in any order. Indices should be unique.
    /// * `capacity`: Maximum number of entries. Should be at least the length of `data`.
    #[must_use]
    pub fn with_entries(data: Vec<SparseTuple<F>>, capacity: usize) -> Self {
        assert!(
            data.len() <= capacity,
            "{} entries don't fit in a sparse vector of capacity {}", data.len(), capacity,
        );

        Self { data, capacity }
    }

    /// Number of entries stored.
    #[must_use]
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Maximum number of entries that can be stored.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether no entries are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Index of the `n`th entry.
    #[must_use]
    pub fn index(&self, n: usize) -> usize {
        self.data[n].0
    }

    /// Iterate over the stored (index, value) tuples.
    pub fn iter(&self) -> Iter<'_, SparseTuple<F>> {
        self.data.iter()
    }

    /// Append entries.
    ///
    /// # Arguments
    ///
    /// * `entries`: Tuples with indices that are not yet present in this vector. Together with
    /// the current entries, they should fit within the capacity.
    pub fn add(&mut self, entries: &[SparseTuple<F>])
    where
        F: Copy,
    {
        assert!(
            self.data.len() + entries.len() <= self.capacity,
            "adding {} entries to a sparse vector of size {} exceeds its capacity {}",
            entries.len(), self.data.len(), self.capacity,
        );

        self.data.extend_from_slice(entries);
    }

    /// Append a single entry.
    pub fn add_one(&mut self, index: usize, value: F) {
        assert!(self.data.len() < self.capacity, "sparse vector is at capacity {}", self.capacity);

        self.data.push((index, value));
    }

    /// Remove the entries at positions `lo` through `hi` (inclusive).
    ///
    /// The gap is filled with the trailing entries, so the relative order of the remaining entries
    /// is not preserved.
    ///
    /// # Arguments
    ///
    /// * `lo`: Position of the first entry to remove.
    /// * `hi`: Position of the last entry to remove, at least `lo` and smaller than the size.
    pub fn remove(&mut self, lo: usize, hi: usize) {
        assert!(lo <= hi && hi < self.data.len());

        let len = self.data.len();
        let removed = hi - lo + 1;
        let moved = removed.min(len - hi - 1);
        for k in 0..moved {
            self.data.swap(lo + k, len - 1 - k);
        }
        self.data.truncate(len - removed);
    }

    /// Remove all entries, keeping the capacity.
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Sort the entries by index.
    ///
    /// Insertion sort: the vectors are short, and often nearly sorted already. Stable.
    pub fn sort(&mut self) {
        for w in 1..self.data.len() {
            let mut l = w;
            while l > 0 && self.data[l - 1].0 > self.data[l].0 {
                self.data.swap(l - 1, l);
                l -= 1;
            }
        }
    }

    /// Whether the entries are ordered by index.
    #[must_use]
    pub fn is_sorted(&self) -> bool {
        self.data.windows(2).all(|w| w[0].0 <= w[1].0)
    }

    /// Dimension of the smallest dense vector this vector fits in.
    ///
    /// # Return value
    ///
    /// One more than the largest index, or `0` if there are no entries.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.data.iter().map(|&(i, _)| i + 1).max().unwrap_or(0)
    }

    /// Check the internal invariants.
    ///
    /// No index may appear twice, unless it is as a zero valued placeholder.
    #[must_use]
    pub fn is_consistent(&self) -> bool
    where
        F: Zero,
    {
        if self.data.len() > self.capacity {
            debug!("sparse vector of size {} exceeds capacity {}", self.data.len(), self.capacity);
            return false;
        }

        for i in 1..self.data.len() {
            for j in 0..i {
                let (first, second) = (&self.data[j], &self.data[i]);
                if first.0 == second.0 && !(first.1.is_zero() && second.1.is_zero()) {
                    debug!("sparse vector contains index {} twice", first.0);
                    return false;
                }
            }
        }

        true
    }
}

impl<F: Copy> Sparse<F> {
    /// Value of the `n`th entry.
    #[must_use]
    pub fn value(&self, n: usize) -> F {
        self.data[n].1
    }
}

impl<F: Float> Sparse<F> {
    /// Squared Euclidean norm.
    #[must_use]
    pub fn length2(&self) -> F {
        self.data.iter().fold(F::zero(), |total, &(_, value)| total + value * value)
    }

    /// Largest absolute value, `0` for a vector without entries.
    #[must_use]
    pub fn max_abs(&self) -> F {
        self.data.iter().fold(F::zero(), |max, &(_, value)| max.max(value.abs()))
    }

    /// Smallest absolute value, infinite for a vector without entries.
    #[must_use]
    pub fn min_abs(&self) -> F {
        self.data.iter().fold(F::infinity(), |min, &(_, value)| min.min(value.abs()))
    }

    /// Replace the contents with the significant values of a dense vector.
    ///
    /// # Arguments
    ///
    /// * `vector`: Dense vector to read the values from.
    /// * `epsilon`: Values with an absolute value not larger than this are dropped.
    pub fn assign(&mut self, vector: &DenseVector<F>, epsilon: F) {
        self.data.clear();
        for (i, &value) in vector.iter().enumerate() {
            if value.abs() > epsilon {
                self.add_one(i, value);
            }
        }
    }
}

impl<F> Deref for Sparse<F> {
    type Target = [SparseTuple<F>];

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl<F: Float + Display> Display for Sparse<F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (n, &(index, value)) in self.data.iter().enumerate() {
            if n == 0 {
                write!(f, "{} x{}", value, index)?;
            } else {
                if n % 4 == 0 {
                    write!(f, "\n\t")?;
                }
                if value < F::zero() {
                    write!(f, " - {} x{}", -value, index)?;
                } else {
                    write!(f, " + {} x{}", value, index)?;
                }
            }
        }

        Ok(())
    }
}
