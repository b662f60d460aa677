//! # Vector types for linear programs
//!
//! Sparse and dense vectors. These were written by hand, because a certain specific set of
//! operations needs to be done quickly with these types.
//!
//! Columns of the basis matrix are only ever read through a slice of `SparseTuple`s. Both
//! `SparseVector` and `UnitVector` dereference to such a slice, so that the basis doesn't need to
//! know which of the two it is looking at.
pub use dense::Dense as DenseVector;
pub use sparse::Sparse as SparseVector;
pub use unit::Unit as UnitVector;

mod dense;
mod sparse;
mod unit;
