//! # Linear algebra primitives
//!
//! Linear algebra primitives used to represent data in either a dense or a sparse format.

pub mod vector;

/// An (index, value) pair of a sparse data structure.
pub type SparseTuple<F> = (usize, F);
