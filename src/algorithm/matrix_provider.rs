//! # Representing linear programs for rapid read access
//!
//! The basis only reads from the linear program: its dimensions, its bounds and the vectors that
//! can become part of the basis. This module contains the interface it reads through.
use crate::algorithm::basis::descriptor::Status;
use crate::data::linear_algebra::SparseTuple;
use crate::data::linear_program::elements::{Representation, VectorId, VectorKind};

/// Abstract interface for the linear program `lhs <= A x <= rhs`, `lower <= x <= upper`.
///
/// Implementors own the vectors that are handed out; a basis borrows them for as long as it is
/// bound to the implementor. Nothing in data structures implementing this trait determines a
/// basis.
pub trait MatrixProvider {
    /// The number of rows (constraints) in the problem.
    fn nr_rows(&self) -> usize;

    /// The number of structural columns (variables) in the problem.
    fn nr_columns(&self) -> usize;

    /// The current working form.
    fn representation(&self) -> Representation;

    /// Left-hand side of a row, may be `-infinity`.
    fn lhs(&self, i: usize) -> f64;

    /// Right-hand side of a row, may be `infinity`.
    fn rhs(&self, i: usize) -> f64;

    /// Lower bound of a column, may be `-infinity`.
    fn lower(&self, j: usize) -> f64;

    /// Upper bound of a column, may be `infinity`.
    fn upper(&self, j: usize) -> f64;

    /// The vector that represents a row or column in the basis matrix.
    ///
    /// In the column representation, this is the constraint matrix column for a column identifier
    /// and a unit vector for a row identifier; in the row representation it is the other way
    /// around. The length of the vector is the dimension of the basis.
    fn vector(&self, id: VectorId) -> &[SparseTuple<f64>];

    /// Number of rows or columns of which a basis consists.
    fn dimension(&self) -> usize {
        match self.representation() {
            Representation::Column => self.nr_rows(),
            Representation::Row => self.nr_columns(),
        }
    }

    /// Number of rows or columns that are not covered by the dimension.
    fn co_dimension(&self) -> usize {
        match self.representation() {
            Representation::Column => self.nr_columns(),
            Representation::Row => self.nr_rows(),
        }
    }

    /// Identifier of the `i`th row.
    fn row_id(&self, i: usize) -> VectorId {
        debug_assert!(i < self.nr_rows());

        VectorId::new(VectorKind::Row, i)
    }

    /// Identifier of the `j`th column.
    fn column_id(&self, j: usize) -> VectorId {
        debug_assert!(j < self.nr_columns());

        VectorId::new(VectorKind::Column, j)
    }

    /// Whether a variable with this status is in the basis under the current representation.
    fn is_basic(&self, status: Status) -> bool {
        status.is_basic(self.representation())
    }
}
