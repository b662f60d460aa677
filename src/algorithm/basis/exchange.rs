//! # Exchanging basis descriptions
//!
//! Bases are exchanged between solvers as a list of entries, each pairing a column that becomes
//! basic with a row that leaves the basis, or placing a nonbasic column at one of its bounds.
//! Everything that is not listed is at its default: rows basic, columns nonbasic at their lower
//! bound. Reading and writing the text form of these lists is left to the caller.
use std::fmt;
use std::fmt::Display;

use thiserror::Error;

use crate::algorithm::basis::descriptor::{Descriptor, PrimalStatus, Status, dual_column_status, dual_row_status};
use crate::algorithm::matrix_provider::MatrixProvider;
use crate::data::linear_program::elements::{Representation, Tolerances};

/// A single line of a basis exchange file.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum BasisEntry {
    /// The column is basic, the row is nonbasic at its upper bound.
    XU {
        #[allow(missing_docs)]
        column: usize,
        #[allow(missing_docs)]
        row: usize,
    },
    /// The column is basic, the row is nonbasic at its lower bound.
    XL {
        #[allow(missing_docs)]
        column: usize,
        #[allow(missing_docs)]
        row: usize,
    },
    /// The column is nonbasic at its upper bound.
    UL {
        #[allow(missing_docs)]
        column: usize,
    },
    /// The column is nonbasic at its lower bound.
    LL {
        #[allow(missing_docs)]
        column: usize,
    },
}

impl BasisEntry {
    /// Two letter code identifying the kind of entry.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            BasisEntry::XU { .. } => "XU",
            BasisEntry::XL { .. } => "XL",
            BasisEntry::UL { .. } => "UL",
            BasisEntry::LL { .. } => "LL",
        }
    }

    /// Column the entry is about.
    #[must_use]
    pub fn column(self) -> usize {
        match self {
            BasisEntry::XU { column, .. }
            | BasisEntry::XL { column, .. }
            | BasisEntry::UL { column }
            | BasisEntry::LL { column } => column,
        }
    }

    /// Row that leaves the basis, if any.
    #[must_use]
    pub fn row(self) -> Option<usize> {
        match self {
            BasisEntry::XU { row, .. } | BasisEntry::XL { row, .. } => Some(row),
            BasisEntry::UL { .. } | BasisEntry::LL { .. } => None,
        }
    }
}

impl Display for BasisEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.row() {
            Some(row) => write!(f, "{} C{} R{}", self.code(), self.column(), row),
            None => write!(f, "{} C{}", self.code(), self.column()),
        }
    }
}

/// Reasons a list of entries doesn't describe a basis.
#[derive(Error, Copy, Clone, Debug, Eq, PartialEq)]
pub enum ExchangeError {
    #[allow(missing_docs)]
    #[error("column {0} is out of range")]
    ColumnOutOfRange(usize),
    #[allow(missing_docs)]
    #[error("row {0} is out of range")]
    RowOutOfRange(usize),
    /// A row was made nonbasic twice.
    #[error("row {0} is already nonbasic")]
    RowNotBasic(usize),
    /// The number of primal statuses doesn't equal the number of columns.
    #[error("{primal} primal statuses for {columns} columns")]
    InvalidBasis {
        #[allow(missing_docs)]
        primal: usize,
        #[allow(missing_docs)]
        columns: usize,
    },
    /// Only bases in the column representation can be written.
    #[error("can't write a basis in the row representation")]
    RowRepresentation,
}

impl Descriptor {
    /// Build a description from exchange entries.
    ///
    /// # Arguments
    ///
    /// * `provider`: Problem the entries refer to.
    /// * `entries`: Deviations from the default basis. A later entry about the same column
    /// overrides an earlier one.
    /// * `tolerances`: Used to derive the dual statuses of basic vectors.
    ///
    /// # Errors
    ///
    /// When an index is out of range or when the result is not a basis.
    pub fn from_entries<MP: MatrixProvider>(
        provider: &MP,
        entries: &[BasisEntry],
        tolerances: &Tolerances,
    ) -> Result<Self, ExchangeError> {
        let nr_rows = provider.nr_rows();
        let nr_columns = provider.nr_columns();

        let rows = (0..nr_rows)
            .map(|i| Status::Dual(dual_row_status(provider, i, tolerances)))
            .collect();
        let columns = (0..nr_columns)
            .map(|_| Status::Primal(PrimalStatus::OnLower))
            .collect();
        let mut descriptor = Self::new(rows, columns);

        for &entry in entries {
            let column = entry.column();
            if column >= nr_columns {
                return Err(ExchangeError::ColumnOutOfRange(column));
            }
            let column_id = provider.column_id(column);

            let (column_status, row_status) = match entry {
                BasisEntry::XU { .. } => (
                    Status::Dual(dual_column_status(provider, column, tolerances)),
                    Some(PrimalStatus::OnUpper),
                ),
                BasisEntry::XL { .. } => (
                    Status::Dual(dual_column_status(provider, column, tolerances)),
                    Some(PrimalStatus::OnLower),
                ),
                BasisEntry::UL { .. } => (Status::Primal(PrimalStatus::OnUpper), None),
                BasisEntry::LL { .. } => (Status::Primal(PrimalStatus::OnLower), None),
            };
            descriptor.set_status(column_id, column_status);

            if let (Some(row), Some(status)) = (entry.row(), row_status) {
                if row >= nr_rows {
                    return Err(ExchangeError::RowOutOfRange(row));
                }
                let row_id = provider.row_id(row);
                if let Status::Primal(_) = descriptor.status(row_id) {
                    return Err(ExchangeError::RowNotBasic(row));
                }
                descriptor.set_status(row_id, Status::Primal(status));
            }
        }

        let primal = descriptor.nr_primal();
        if primal == nr_columns {
            Ok(descriptor)
        } else {
            Err(ExchangeError::InvalidBasis { primal, columns: nr_columns })
        }
    }

    /// Express this description as exchange entries.
    ///
    /// Basic columns are paired with nonbasic rows in order of increasing index. Nonbasic columns at
    /// their upper bound are listed, other nonbasic columns are assumed to be at their lower bound.
    ///
    /// # Errors
    ///
    /// When the problem is in the row representation.
    pub fn to_entries<MP: MatrixProvider>(&self, provider: &MP) -> Result<Vec<BasisEntry>, ExchangeError> {
        if provider.representation() == Representation::Row {
            return Err(ExchangeError::RowRepresentation);
        }
        debug_assert_eq!(self.nr_rows(), provider.nr_rows());
        debug_assert_eq!(self.nr_columns(), provider.nr_columns());

        let mut nonbasic_rows = (0..self.nr_rows())
            .filter(|&i| !provider.is_basic(self.row_status(i)));

        let mut entries = Vec::new();
        for column in 0..self.nr_columns() {
            let status = self.column_status(column);
            if provider.is_basic(status) {
                let row = nonbasic_rows.next()
                    .ok_or(ExchangeError::InvalidBasis { primal: self.nr_primal(), columns: self.nr_columns() })?;
                entries.push(match self.row_status(row) {
                    Status::Primal(PrimalStatus::OnUpper) => BasisEntry::XU { column, row },
                    _ => BasisEntry::XL { column, row },
                });
            } else if status == Status::Primal(PrimalStatus::OnUpper) {
                entries.push(BasisEntry::UL { column });
            }
        }

        Ok(entries)
    }
}

#[cfg(test)]
mod test {
    use crate::algorithm::basis::descriptor::{Descriptor, DualStatus, PrimalStatus, Status};
    use crate::algorithm::basis::exchange::{BasisEntry, ExchangeError};
    use crate::data::linear_program::elements::{Representation, Tolerances};
    use crate::tests::problem_1;

    #[test]
    fn codes() {
        assert_eq!(BasisEntry::XU { column: 0, row: 1 }.code(), "XU");
        assert_eq!(BasisEntry::LL { column: 3 }.code(), "LL");
        assert_eq!(BasisEntry::XL { column: 2, row: 0 }.to_string(), "XL C2 R0");
        assert_eq!(BasisEntry::UL { column: 1 }.to_string(), "UL C1");
    }

    #[test]
    fn empty_is_default() {
        let data = problem_1::matrix_data();
        let tolerances = Tolerances::default();
        let descriptor = Descriptor::from_entries(&data, &[], &tolerances).unwrap();
        assert!(descriptor.row_statuses().iter().all(|status| matches!(status, Status::Dual(_))));
        assert!(descriptor.column_statuses().iter().all(|&status| status == Status::Primal(PrimalStatus::OnLower)));
        assert_eq!(descriptor.to_entries(&data), Ok(vec![]));
    }

    #[test]
    fn read() {
        let data = problem_1::matrix_data();
        let entries = [
            BasisEntry::XU { column: 1, row: 1 },
            BasisEntry::XL { column: 2, row: 2 },
            BasisEntry::UL { column: 3 },
        ];
        let descriptor = Descriptor::from_entries(&data, &entries, &Tolerances::default()).unwrap();
        assert_eq!(descriptor.column_status(1), Status::Dual(DualStatus::OnBoth));
        assert_eq!(descriptor.column_status(2), Status::Dual(DualStatus::Undefined));
        assert_eq!(descriptor.column_status(3), Status::Primal(PrimalStatus::OnUpper));
        assert_eq!(descriptor.row_status(1), Status::Primal(PrimalStatus::OnUpper));
        assert_eq!(descriptor.row_status(2), Status::Primal(PrimalStatus::OnLower));
        assert_eq!(descriptor.row_status(0), Status::Dual(DualStatus::OnLower));

        assert_eq!(descriptor.to_entries(&data), Ok(entries.to_vec()));
    }

    #[test]
    fn invalid() {
        let data = problem_1::matrix_data();
        let tolerances = Tolerances::default();
        assert_eq!(
            Descriptor::from_entries(&data, &[BasisEntry::LL { column: 4 }], &tolerances),
            Err(ExchangeError::ColumnOutOfRange(4)),
        );
        assert_eq!(
            Descriptor::from_entries(&data, &[BasisEntry::XL { column: 0, row: 3 }], &tolerances),
            Err(ExchangeError::RowOutOfRange(3)),
        );
        let twice = [BasisEntry::XL { column: 0, row: 1 }, BasisEntry::XU { column: 1, row: 1 }];
        assert_eq!(
            Descriptor::from_entries(&data, &twice, &tolerances),
            Err(ExchangeError::RowNotBasic(1)),
        );
        let overridden = [BasisEntry::XL { column: 0, row: 1 }, BasisEntry::LL { column: 0 }];
        assert_eq!(
            Descriptor::from_entries(&data, &overridden, &tolerances),
            Err(ExchangeError::InvalidBasis { primal: 5, columns: 4 }),
        );
    }

    #[test]
    fn row_representation() {
        let data = problem_1::matrix_data();
        let descriptor = problem_1::descriptor();
        data.set_representation(Representation::Row);
        assert_eq!(descriptor.to_entries(&data), Err(ExchangeError::RowRepresentation));
    }
}
