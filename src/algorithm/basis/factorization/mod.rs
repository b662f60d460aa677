//! # Factorization of the basis matrix
//!
//! The basis matrix is never inverted explicitly. Instead, an engine keeps a factorization from
//! which systems with the basis matrix can be solved, and which can be updated cheaply when a single
//! column changes. The basis decides when updating is no longer worth it.
use std::fmt;
use std::fmt::Display;

use thiserror::Error;

use crate::data::linear_algebra::SparseTuple;
use crate::data::linear_algebra::vector::{DenseVector, SparseVector};

pub mod lower_upper;

/// State of a factorization engine.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum FactorizationStatus {
    /// A valid factorization is available.
    Ok,
    /// The last load or update found the matrix to be (numerically) singular.
    Singular,
    /// Nothing has been loaded since creation or the last clear.
    Unloaded,
    /// The input could not be processed, for example because of an index out of range.
    Error,
}

impl Display for FactorizationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FactorizationStatus::Ok => "ok",
            FactorizationStatus::Singular => "singular",
            FactorizationStatus::Unloaded => "unloaded",
            FactorizationStatus::Error => "error",
        })
    }
}

/// Failure of the engine that can't be recovered from by refactorizing.
///
/// Singularity is not an error, it is reflected in the status of the basis.
#[derive(Error, Copy, Clone, Debug, Eq, PartialEq)]
pub enum FactorizationError {
    /// The engine reported a status other than ok or singular.
    #[error("factorization engine reported unexpected status: {0}")]
    Unexpected(FactorizationStatus),
}

/// A factorization engine.
///
/// The columns are those of the basis matrix, ordered by slot. Indices within the columns are
/// smaller than the dimension.
pub trait Factorization {
    /// Factorize a matrix from scratch, dropping any previous factorization and updates.
    ///
    /// # Return value
    ///
    /// The new status, which is also what `status` returns afterwards.
    fn load(&mut self, columns: &[&[SparseTuple<f64>]]) -> FactorizationStatus;

    /// Replace the column in `slot` by `column`.
    ///
    /// # Arguments
    ///
    /// * `slot`: Position of the column being replaced.
    /// * `column`: The new column.
    /// * `eta`: The new column expressed in the current basis, if the caller has already computed it
    /// (it is `B^-1 column`, with `B` the matrix before the change).
    fn change(
        &mut self,
        slot: usize,
        column: &[SparseTuple<f64>],
        eta: Option<&SparseVector<f64>>,
    ) -> FactorizationStatus;

    /// Forget the factorization, the status becomes `Unloaded`.
    fn clear(&mut self);

    /// Number of values stored, including those of updates.
    fn memory(&self) -> usize;

    /// Estimate of the numerical quality, between `0` (lost) and `1` (perfect).
    fn stability(&self) -> f64;

    /// Current state.
    fn status(&self) -> FactorizationStatus;

    /// Size of the factorized matrix.
    fn dimension(&self) -> usize;

    /// Overwrite `rhs` with the solution `x` of `B x = rhs`.
    ///
    /// Requires the status to be `Ok`.
    fn solve(&self, rhs: &mut DenseVector<f64>);

    /// Overwrite `rhs` with the solution `y` of `B^T y = rhs`.
    ///
    /// Requires the status to be `Ok`.
    fn co_solve(&self, rhs: &mut DenseVector<f64>);
}
