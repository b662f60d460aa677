//! # Building blocks to describe linear programs.
use std::fmt;
use std::fmt::Display;

use enum_map::Enum;

/// Whether a vector of the linear program is one of its rows or one of its columns.
#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum VectorKind {
    #[allow(missing_docs)]
    Row,
    #[allow(missing_docs)]
    Column,
}

impl VectorKind {
    /// The other kind.
    #[must_use]
    pub fn other(self) -> Self {
        match self {
            VectorKind::Row => VectorKind::Column,
            VectorKind::Column => VectorKind::Row,
        }
    }
}

/// Stable identifier of a row or a column of the linear program.
///
/// In the column representation, a row identifier refers to the slack column of that row.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum VectorId {
    /// Row index.
    Row(usize),
    /// Column index.
    Column(usize),
}

impl VectorId {
    /// Create an identifier of the given kind.
    #[must_use]
    pub fn new(kind: VectorKind, index: usize) -> Self {
        match kind {
            VectorKind::Row => VectorId::Row(index),
            VectorKind::Column => VectorId::Column(index),
        }
    }

    /// Whether this identifies a row or a column.
    #[must_use]
    pub fn kind(self) -> VectorKind {
        match self {
            VectorId::Row(_) => VectorKind::Row,
            VectorId::Column(_) => VectorKind::Column,
        }
    }

    /// Row or column index.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            VectorId::Row(i) | VectorId::Column(i) => i,
        }
    }
}

impl Display for VectorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VectorId::Row(i) => write!(f, "R{}", i),
            VectorId::Column(j) => write!(f, "C{}", j),
        }
    }
}

/// The primary working form of the solver.
///
/// In the column representation, the basis consists of columns of the constraint matrix (and unit
/// columns for the slacks), its dimension equals the number of rows. The row representation is the
/// transposed situation.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Representation {
    #[allow(missing_docs)]
    Row,
    #[allow(missing_docs)]
    Column,
}

impl Representation {
    /// Kind of the "vectors": the columns in the column representation, rows otherwise.
    #[must_use]
    pub fn vector_kind(self) -> VectorKind {
        match self {
            Representation::Row => VectorKind::Row,
            Representation::Column => VectorKind::Column,
        }
    }

    /// Kind of the "covectors", the vectors of which there are as many as the basis dimension.
    #[must_use]
    pub fn co_vector_kind(self) -> VectorKind {
        self.vector_kind().other()
    }
}

/// Type of the simplex algorithm.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Algorithm {
    /// Select an entering variable by pricing, then find the leaving one with a ratio test.
    Entering,
    /// Select a leaving variable by pricing, then find the entering one with a ratio test.
    Leaving,
}

/// Numerical tolerances.
///
/// Passed explicitly to each component that compares floating point values.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Tolerances {
    /// Values with an absolute value not exceeding this are zero.
    pub epsilon: f64,
    /// Smallest absolute value accepted as a pivot in a factorization.
    pub pivot: f64,
    /// Bounds with an absolute value at least this large are infinite.
    pub infinity: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            epsilon: 1e-16,
            pivot: 1e-10,
            infinity: 1e100,
        }
    }
}

impl Tolerances {
    /// Whether an upper bound-like value is finite.
    #[must_use]
    pub fn is_finite_upper(&self, value: f64) -> bool {
        value < self.infinity
    }

    /// Whether a lower bound-like value is finite.
    #[must_use]
    pub fn is_finite_lower(&self, value: f64) -> bool {
        value > -self.infinity
    }
}
