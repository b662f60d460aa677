//! # Basis description
//!
//! Every row and every column of the linear program has a status. Statuses are either primal,
//! describing at which bound a nonbasic variable is fixed, or dual, describing the sign
//! restriction on the dual variable of a basic one. Which of the two families is "basic" depends on
//! the representation: dual statuses are basic in the column representation, primal statuses in
//! the row representation.
use std::fmt;
use std::fmt::Display;

use enum_map::EnumMap;

use crate::algorithm::matrix_provider::MatrixProvider;
use crate::data::linear_program::elements::{Representation, Tolerances, VectorId, VectorKind};

/// Status of a nonbasic variable (in the column representation).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum PrimalStatus {
    /// At its lower bound.
    OnLower,
    /// At its upper bound.
    OnUpper,
    /// Both bounds are equal.
    Fixed,
    /// No finite bounds, at zero.
    Free,
}

/// Status of a basic variable (in the column representation).
///
/// Derived from the bounds of the variable, see `dual_status`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum DualStatus {
    /// The dual variable is free: the bounds are equal.
    Free,
    /// Only an upper bound is finite.
    OnLower,
    /// Only a lower bound is finite.
    OnUpper,
    /// Both bounds are finite and different.
    OnBoth,
    /// Neither bound is finite.
    Undefined,
}

/// Status of a row or a column.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Status {
    #[allow(missing_docs)]
    Primal(PrimalStatus),
    #[allow(missing_docs)]
    Dual(DualStatus),
}

impl Status {
    /// Whether a variable with this status is part of the basis.
    #[must_use]
    pub fn is_basic(self, representation: Representation) -> bool {
        matches!(
            (self, representation),
            (Status::Dual(_), Representation::Column) | (Status::Primal(_), Representation::Row),
        )
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Status::Primal(PrimalStatus::OnLower) => "L",
            Status::Primal(PrimalStatus::OnUpper) => "U",
            Status::Primal(PrimalStatus::Fixed) => "X",
            Status::Primal(PrimalStatus::Free) => "F",
            Status::Dual(DualStatus::Free) => "f",
            Status::Dual(DualStatus::OnLower) => "l",
            Status::Dual(DualStatus::OnUpper) => "u",
            Status::Dual(DualStatus::OnBoth) => "b",
            Status::Dual(DualStatus::Undefined) => "?",
        };
        f.write_str(code)
    }
}

/// Dual status implied by the bounds of a variable.
///
/// # Arguments
///
/// * `lower`: Lower bound, or left-hand side for a row.
/// * `upper`: Upper bound, or right-hand side for a row.
/// * `tolerances`: Determines which values are infinite.
#[must_use]
pub fn dual_status(lower: f64, upper: f64, tolerances: &Tolerances) -> DualStatus {
    match (tolerances.is_finite_lower(lower), tolerances.is_finite_upper(upper)) {
        (true, true) if lower == upper => DualStatus::Free,
        (true, true) => DualStatus::OnBoth,
        (false, true) => DualStatus::OnLower,
        (true, false) => DualStatus::OnUpper,
        (false, false) => DualStatus::Undefined,
    }
}

/// Primal status a nonbasic variable gets when nothing else is known.
///
/// Variables are at their lower bound when it is finite.
#[must_use]
pub fn primal_status(lower: f64, upper: f64, tolerances: &Tolerances) -> PrimalStatus {
    match (tolerances.is_finite_lower(lower), tolerances.is_finite_upper(upper)) {
        (true, true) if lower == upper => PrimalStatus::Fixed,
        (true, _) => PrimalStatus::OnLower,
        (false, true) => PrimalStatus::OnUpper,
        (false, false) => PrimalStatus::Free,
    }
}

/// Dual status of row `i`, derived from its sides.
#[must_use]
pub fn dual_row_status<MP: MatrixProvider>(provider: &MP, i: usize, tolerances: &Tolerances) -> DualStatus {
    dual_status(provider.lhs(i), provider.rhs(i), tolerances)
}

/// Dual status of column `j`, derived from its bounds.
#[must_use]
pub fn dual_column_status<MP: MatrixProvider>(provider: &MP, j: usize, tolerances: &Tolerances) -> DualStatus {
    dual_status(provider.lower(j), provider.upper(j), tolerances)
}

/// Dual status of a row or column.
#[must_use]
pub fn dual_id_status<MP: MatrixProvider>(provider: &MP, id: VectorId, tolerances: &Tolerances) -> DualStatus {
    match id {
        VectorId::Row(i) => dual_row_status(provider, i, tolerances),
        VectorId::Column(j) => dual_column_status(provider, j, tolerances),
    }
}

/// Default primal status of a row or column.
#[must_use]
pub fn primal_id_status<MP: MatrixProvider>(provider: &MP, id: VectorId, tolerances: &Tolerances) -> PrimalStatus {
    match id {
        VectorId::Row(i) => primal_status(provider.lhs(i), provider.rhs(i), tolerances),
        VectorId::Column(j) => primal_status(provider.lower(j), provider.upper(j), tolerances),
    }
}

/// Statuses of all rows and columns.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Descriptor {
    statuses: EnumMap<VectorKind, Vec<Status>>,
}

impl Descriptor {
    /// Create a new instance.
    ///
    /// # Arguments
    ///
    /// * `rows`: Status of each row.
    /// * `columns`: Status of each column.
    #[must_use]
    pub fn new(rows: Vec<Status>, columns: Vec<Status>) -> Self {
        Self {
            statuses: EnumMap::from_array([rows, columns]),
        }
    }

    /// The slack basis.
    ///
    /// Rows have their dual status, columns are nonbasic at a bound. This is a basis in both
    /// representations.
    #[must_use]
    pub fn slack<MP: MatrixProvider>(provider: &MP, tolerances: &Tolerances) -> Self {
        let rows = (0..provider.nr_rows())
            .map(|i| Status::Dual(dual_row_status(provider, i, tolerances)))
            .collect();
        let columns = (0..provider.nr_columns())
            .map(|j| Status::Primal(primal_status(provider.lower(j), provider.upper(j), tolerances)))
            .collect();

        Self::new(rows, columns)
    }

    /// Number of rows described.
    #[must_use]
    pub fn nr_rows(&self) -> usize {
        self.statuses[VectorKind::Row].len()
    }

    /// Number of columns described.
    #[must_use]
    pub fn nr_columns(&self) -> usize {
        self.statuses[VectorKind::Column].len()
    }

    /// Status of row `i`.
    #[must_use]
    pub fn row_status(&self, i: usize) -> Status {
        self.statuses[VectorKind::Row][i]
    }

    /// Status of column `j`.
    #[must_use]
    pub fn column_status(&self, j: usize) -> Status {
        self.statuses[VectorKind::Column][j]
    }

    /// Status of a row or column.
    #[must_use]
    pub fn status(&self, id: VectorId) -> Status {
        self.statuses[id.kind()][id.index()]
    }

    /// Change the status of a row or column.
    pub fn set_status(&mut self, id: VectorId, status: Status) {
        self.statuses[id.kind()][id.index()] = status;
    }

    /// Statuses of the rows.
    #[must_use]
    pub fn row_statuses(&self) -> &[Status] {
        &self.statuses[VectorKind::Row]
    }

    /// Statuses of the columns.
    #[must_use]
    pub fn column_statuses(&self) -> &[Status] {
        &self.statuses[VectorKind::Column]
    }

    /// Statuses of the vectors: the columns in the column representation, the rows otherwise.
    #[must_use]
    pub fn vector_statuses(&self, representation: Representation) -> &[Status] {
        &self.statuses[representation.vector_kind()]
    }

    /// Statuses of the covectors.
    #[must_use]
    pub fn co_vector_statuses(&self, representation: Representation) -> &[Status] {
        &self.statuses[representation.co_vector_kind()]
    }

    /// Identifiers of the basic rows followed by those of the basic columns.
    pub fn basic_ids(&self, representation: Representation) -> impl Iterator<Item = VectorId> + '_ {
        [VectorKind::Row, VectorKind::Column].into_iter()
            .flat_map(move |kind| {
                self.statuses[kind].iter()
                    .enumerate()
                    .filter(move |(_, status)| status.is_basic(representation))
                    .map(move |(index, _)| VectorId::new(kind, index))
            })
    }

    /// Number of statuses that are primal.
    #[must_use]
    pub fn nr_primal(&self) -> usize {
        self.statuses.values()
            .flat_map(|statuses| statuses.iter())
            .filter(|status| matches!(status, Status::Primal(_)))
            .count()
    }
}

impl Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rows: ")?;
        for status in self.row_statuses() {
            write!(f, "{}", status)?;
        }
        write!(f, ", columns: ")?;
        for status in self.column_statuses() {
            write!(f, "{}", status)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use crate::algorithm::basis::descriptor::{Descriptor, DualStatus, PrimalStatus, Status, dual_column_status, dual_row_status, dual_status, primal_status};
    use crate::data::linear_program::elements::{Representation, Tolerances, VectorId};
    use crate::tests::problem_1;

    const INF: f64 = f64::INFINITY;

    #[test]
    fn dual_from_bounds() {
        let tolerances = Tolerances::default();
        assert_eq!(dual_status(1.0, 1.0, &tolerances), DualStatus::Free);
        assert_eq!(dual_status(0.0, 1.0, &tolerances), DualStatus::OnBoth);
        assert_eq!(dual_status(-INF, 1.0, &tolerances), DualStatus::OnLower);
        assert_eq!(dual_status(0.0, INF, &tolerances), DualStatus::OnUpper);
        assert_eq!(dual_status(-INF, INF, &tolerances), DualStatus::Undefined);
        // Large values count as infinite
        assert_eq!(dual_status(-1e100, 1e100, &tolerances), DualStatus::Undefined);
    }

    #[test]
    fn primal_from_bounds() {
        let tolerances = Tolerances::default();
        assert_eq!(primal_status(2.0, 2.0, &tolerances), PrimalStatus::Fixed);
        assert_eq!(primal_status(0.0, 1.0, &tolerances), PrimalStatus::OnLower);
        assert_eq!(primal_status(0.0, INF, &tolerances), PrimalStatus::OnLower);
        assert_eq!(primal_status(-INF, 1.0, &tolerances), PrimalStatus::OnUpper);
        assert_eq!(primal_status(-INF, INF, &tolerances), PrimalStatus::Free);
    }

    #[test]
    fn derived_from_provider() {
        let data = problem_1::matrix_data();
        let tolerances = Tolerances::default();
        assert_eq!(dual_row_status(&data, 0, &tolerances), DualStatus::OnLower);
        assert_eq!(dual_row_status(&data, 1, &tolerances), DualStatus::Free);
        assert_eq!(dual_row_status(&data, 2, &tolerances), DualStatus::OnUpper);
        assert_eq!(dual_column_status(&data, 0, &tolerances), DualStatus::OnUpper);
        assert_eq!(dual_column_status(&data, 1, &tolerances), DualStatus::OnBoth);
        assert_eq!(dual_column_status(&data, 2, &tolerances), DualStatus::Undefined);
        assert_eq!(dual_column_status(&data, 3, &tolerances), DualStatus::OnLower);
    }

    #[test]
    fn slack() {
        let data = problem_1::matrix_data();
        let descriptor = Descriptor::slack(&data, &Tolerances::default());
        assert_eq!(descriptor.nr_rows(), 3);
        assert_eq!(descriptor.nr_columns(), 4);
        assert_eq!(descriptor.nr_primal(), 4);
        assert_eq!(descriptor.row_status(1), Status::Dual(DualStatus::Free));
        assert_eq!(descriptor.column_status(2), Status::Primal(PrimalStatus::Free));
        assert_eq!(descriptor.column_status(3), Status::Primal(PrimalStatus::OnUpper));
        assert_eq!(descriptor.to_string(), "rows: lfu, columns: LLFU");

        let column_basis = descriptor.basic_ids(Representation::Column).collect::<Vec<_>>();
        assert_eq!(column_basis, vec![VectorId::Row(0), VectorId::Row(1), VectorId::Row(2)]);
        let row_basis = descriptor.basic_ids(Representation::Row).collect::<Vec<_>>();
        assert_eq!(row_basis, (0..4).map(VectorId::Column).collect::<Vec<_>>());
    }

    #[test]
    fn representation_views() {
        let data = problem_1::matrix_data();
        let mut descriptor = Descriptor::slack(&data, &Tolerances::default());
        assert_eq!(descriptor.vector_statuses(Representation::Column).len(), 4);
        assert_eq!(descriptor.co_vector_statuses(Representation::Column).len(), 3);
        assert_eq!(descriptor.vector_statuses(Representation::Row).len(), 3);

        descriptor.set_status(VectorId::Column(0), Status::Dual(DualStatus::OnUpper));
        assert_eq!(descriptor.status(VectorId::Column(0)), Status::Dual(DualStatus::OnUpper));
        assert!(descriptor.status(VectorId::Column(0)).is_basic(Representation::Column));
        assert!(!descriptor.status(VectorId::Column(0)).is_basic(Representation::Row));
    }
}
