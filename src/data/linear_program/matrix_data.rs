//! # Linear program stored in memory
//!
//! The constraint matrix is stored both column- and row-wise, such that the basis can be built in
//! either representation without transposing.
use std::cell::Cell;

use itertools::repeat_n;

use crate::algorithm::matrix_provider::MatrixProvider;
use crate::data::linear_algebra::SparseTuple;
use crate::data::linear_algebra::vector::{SparseVector, UnitVector};
use crate::data::linear_program::elements::{Representation, VectorId};

/// A linear program `lhs <= A x <= rhs`, `lower <= x <= upper`.
#[derive(Clone, Debug, PartialEq)]
pub struct MatrixData {
    /// Column major copy of the constraint matrix, indices are row indices.
    columns: Vec<SparseVector<f64>>,
    /// Row major copy of the constraint matrix, indices are column indices.
    rows: Vec<SparseVector<f64>>,
    /// Slack column of each row, used in the column representation.
    row_units: Vec<UnitVector<f64>>,
    /// Unit row of each column, used in the row representation.
    column_units: Vec<UnitVector<f64>>,

    lhs: Vec<f64>,
    rhs: Vec<f64>,
    lower: Vec<f64>,
    upper: Vec<f64>,

    /// Can be switched while a basis borrows the data.
    representation: Cell<Representation>,
}

impl MatrixData {
    /// Create a new instance in the column representation.
    ///
    /// # Arguments
    ///
    /// * `columns`: Columns of the constraint matrix. Indices should be smaller than the number of
    /// rows and not repeat within a column.
    /// * `lhs`: Left-hand sides of the rows, one per row.
    /// * `rhs`: Right-hand sides of the rows, one per row.
    /// * `lower`: Lower bounds of the columns, one per column.
    /// * `upper`: Upper bounds of the columns, one per column.
    #[must_use]
    pub fn new(
        columns: Vec<SparseVector<f64>>,
        lhs: Vec<f64>,
        rhs: Vec<f64>,
        lower: Vec<f64>,
        upper: Vec<f64>,
    ) -> Self {
        let nr_rows = lhs.len();
        let nr_columns = columns.len();
        assert_eq!(rhs.len(), nr_rows);
        assert_eq!(lower.len(), nr_columns);
        assert_eq!(upper.len(), nr_columns);
        assert!(columns.iter().all(|column| column.dim() <= nr_rows));

        let mut row_tuples = repeat_n(Vec::new(), nr_rows).collect::<Vec<Vec<SparseTuple<f64>>>>();
        for (j, column) in columns.iter().enumerate() {
            for &(i, value) in column.iter() {
                row_tuples[i].push((j, value));
            }
        }
        let rows = row_tuples.into_iter().map(SparseVector::new).collect();

        Self {
            columns,
            rows,
            row_units: (0..nr_rows).map(UnitVector::new).collect(),
            column_units: (0..nr_columns).map(UnitVector::new).collect(),

            lhs,
            rhs,
            lower,
            upper,

            representation: Cell::new(Representation::Column),
        }
    }

    /// Switch the working form.
    ///
    /// A basis bound to this instance should be told with `BasisMatrix::set_rep`.
    pub fn set_representation(&self, representation: Representation) {
        self.representation.set(representation);
    }

    /// A column of the constraint matrix.
    #[must_use]
    pub fn column(&self, j: usize) -> &SparseVector<f64> {
        &self.columns[j]
    }

    /// A row of the constraint matrix.
    #[must_use]
    pub fn row(&self, i: usize) -> &SparseVector<f64> {
        &self.rows[i]
    }
}

impl MatrixProvider for MatrixData {
    fn nr_rows(&self) -> usize {
        self.rows.len()
    }

    fn nr_columns(&self) -> usize {
        self.columns.len()
    }

    fn representation(&self) -> Representation {
        self.representation.get()
    }

    fn lhs(&self, i: usize) -> f64 {
        self.lhs[i]
    }

    fn rhs(&self, i: usize) -> f64 {
        self.rhs[i]
    }

    fn lower(&self, j: usize) -> f64 {
        self.lower[j]
    }

    fn upper(&self, j: usize) -> f64 {
        self.upper[j]
    }

    fn vector(&self, id: VectorId) -> &[SparseTuple<f64>] {
        match (self.representation.get(), id) {
            (Representation::Column, VectorId::Row(i)) => &self.row_units[i],
            (Representation::Column, VectorId::Column(j)) => &self.columns[j],
            (Representation::Row, VectorId::Row(i)) => &self.rows[i],
            (Representation::Row, VectorId::Column(j)) => &self.column_units[j],
        }
    }
}
