//! # LU decomposition
//!
//! Sparse Gaussian elimination with threshold row pivoting, followed by a product form update for
//! each column change.
use std::cmp::Ordering;
use std::fmt;
use std::fmt::Display;
use std::mem;

use log::trace;

use crate::algorithm::basis::factorization::{Factorization, FactorizationStatus};
use crate::algorithm::basis::factorization::lower_upper::eta_file::EtaFile;
use crate::data::linear_algebra::SparseTuple;
use crate::data::linear_algebra::vector::{DenseVector, SparseVector};
use crate::data::linear_program::elements::Tolerances;

mod eta_file;

/// A candidate pivot is acceptable when it is at least this fraction of the largest candidate.
const PIVOT_THRESHOLD: f64 = 0.1;

/// Decompose a matrix `B` into `PB = LU` where
///
/// * `P` is a row permutation
/// * `L` is lower triangular with `1`'s on the diagonal
/// * `U` is upper triangular
///
/// Column changes are collected in `updates`, such that the current matrix equals
/// `B E_1 E_2 ... E_k`.
#[derive(PartialEq, Clone, Debug)]
pub struct LUDecomposition {
    /// Row permutation `P`.
    ///
    /// Row `k` of `PB` is row `row_permutation[k]` of `B`.
    row_permutation: Vec<usize>,
    /// Lower triangular matrix `L`.
    ///
    /// Column major, only the values below the diagonal.
    lower_triangular: Vec<Vec<SparseTuple<f64>>>,
    /// Upper triangular matrix `U`.
    ///
    /// Column major, only the values above the diagonal.
    upper_triangular: Vec<Vec<SparseTuple<f64>>>,
    /// Diagonal of `U`.
    diagonal: Vec<f64>,

    updates: Vec<EtaFile>,

    stability: f64,
    status: FactorizationStatus,
    tolerances: Tolerances,
}

impl LUDecomposition {
    /// Create an engine without a factorization.
    #[must_use]
    pub fn new(tolerances: Tolerances) -> Self {
        Self {
            row_permutation: Vec::new(),
            lower_triangular: Vec::new(),
            upper_triangular: Vec::new(),
            diagonal: Vec::new(),

            updates: Vec::new(),

            stability: 0.0,
            status: FactorizationStatus::Unloaded,
            tolerances,
        }
    }

    /// Number of column changes applied since the last load.
    #[must_use]
    pub fn nr_updates(&self) -> usize {
        self.updates.len()
    }

    fn m(&self) -> usize {
        self.diagonal.len()
    }

    /// Solve with `PB = LU` only, ignoring the updates.
    fn solve_decomposition(&self, rhs: &mut DenseVector<f64>) {
        let m = self.m();
        let mut permuted = DenseVector::new(self.row_permutation.iter().map(|&i| rhs[i]).collect());

        for k in 0..m {
            let value = permuted[k];
            if value != 0.0 {
                permuted.mult_add(-value, &self.lower_triangular[k]);
            }
        }
        for k in (0..m).rev() {
            permuted[k] /= self.diagonal[k];
            let value = permuted[k];
            if value != 0.0 {
                permuted.mult_add(-value, &self.upper_triangular[k]);
            }
        }

        *rhs = permuted;
    }

    /// Solve with `B^T = U^T L^T P` only, ignoring the updates.
    fn co_solve_decomposition(&self, rhs: &mut DenseVector<f64>) {
        let m = self.m();

        for k in 0..m {
            let total = rhs.inner_product_with_sparse(&self.upper_triangular[k]);
            rhs[k] = (rhs[k] - total) / self.diagonal[k];
        }
        for k in (0..m).rev() {
            let total = rhs.inner_product_with_sparse(&self.lower_triangular[k]);
            rhs[k] -= total;
        }

        let mut result = DenseVector::zeros(m);
        for (k, &i) in self.row_permutation.iter().enumerate() {
            result[i] = rhs[k];
        }
        *rhs = result;
    }

    fn reset(&mut self, status: FactorizationStatus) {
        self.row_permutation.clear();
        self.lower_triangular.clear();
        self.upper_triangular.clear();
        self.diagonal.clear();
        self.updates.clear();
        self.stability = 0.0;
        self.status = status;
    }
}

impl Factorization for LUDecomposition {
    fn load(&mut self, columns: &[&[SparseTuple<f64>]]) -> FactorizationStatus {
        self.reset(FactorizationStatus::Unloaded);
        let m = columns.len();

        // Sparse, row major work space, each row sorted by column
        let mut rows: Vec<Vec<SparseTuple<f64>>> = vec![Vec::new(); m];
        // Rows that have (or once had) a value in each column
        let mut column_rows: Vec<Vec<usize>> = vec![Vec::new(); m];
        for (j, column) in columns.iter().enumerate() {
            for &(i, value) in column.iter() {
                if i >= m {
                    self.status = FactorizationStatus::Error;
                    return self.status;
                }
                match rows[i].last_mut() {
                    Some((last, total)) if *last == j => *total += value,
                    _ => {
                        rows[i].push((j, value));
                        column_rows[j].push(i);
                    },
                }
            }
        }

        let initial_max = rows.iter()
            .flatten()
            .fold(0.0_f64, |max, &(_, value)| max.max(value.abs()));
        let mut max_seen = initial_max;

        // Step at which each row was pivoted, `m` while it is still active
        let mut position = vec![m; m];
        let mut permutation = Vec::with_capacity(m);
        // Multipliers per original row, as (step, ratio)
        let mut multipliers: Vec<Vec<SparseTuple<f64>>> = vec![Vec::new(); m];
        let mut upper_triangular: Vec<Vec<SparseTuple<f64>>> = vec![Vec::new(); m];
        let mut diagonal = Vec::with_capacity(m);

        for k in 0..m {
            // All values left of column `k` are eliminated, so the candidates start with column `k`
            let starts_at_k = |row: &[SparseTuple<f64>]| row.first().is_some_and(|&(j, _)| j == k);
            let candidates = column_rows[k].iter()
                .copied()
                .filter(|&i| position[i] == m && starts_at_k(rows[i].as_slice()))
                .collect::<Vec<_>>();

            let largest = candidates.iter()
                .fold(0.0_f64, |max, &i| max.max(rows[i][0].1.abs()));
            // Among the numerically acceptable candidates, the shortest row causes the least fill
            let pivot_row = candidates.iter()
                .copied()
                .filter(|&i| rows[i][0].1.abs() >= PIVOT_THRESHOLD * largest)
                .min_by_key(|&i| rows[i].len());
            let pivot_row = match pivot_row {
                Some(i) if largest > self.tolerances.pivot => i,
                _ => {
                    trace!("No pivot for column {} of {}, largest candidate {:e}", k, m, largest);
                    self.status = FactorizationStatus::Singular;
                    return self.status;
                },
            };

            position[pivot_row] = k;
            permutation.push(pivot_row);
            let pivot_value = rows[pivot_row][0].1;
            let pivot = mem::take(&mut rows[pivot_row]);
            let rest = &pivot[1..];

            for &i in &candidates {
                if i == pivot_row || !starts_at_k(rows[i].as_slice()) {
                    continue;
                }
                let ratio = rows[i][0].1 / pivot_value;
                let row = mem::take(&mut rows[i]);
                let (row, added) = subtract_multiple(&row[1..], ratio, rest, self.tolerances.epsilon);
                for j in added {
                    column_rows[j].push(i);
                }
                max_seen = row.iter().fold(max_seen, |max, &(_, value)| max.max(value.abs()));
                rows[i] = row;
                multipliers[i].push((k, ratio));
            }

            diagonal.push(pivot_value);
            for &(j, value) in rest {
                upper_triangular[j].push((k, value));
            }
        }

        let mut lower_triangular: Vec<Vec<SparseTuple<f64>>> = vec![Vec::new(); m];
        for (i, row) in multipliers.into_iter().enumerate() {
            for (k, ratio) in row {
                lower_triangular[k].push((position[i], ratio));
            }
        }

        self.lower_triangular = lower_triangular;
        self.upper_triangular = upper_triangular;
        self.diagonal = diagonal;
        self.row_permutation = permutation;

        self.stability = if max_seen > 0.0 { initial_max / max_seen } else { 1.0 };
        self.status = FactorizationStatus::Ok;
        self.status
    }

    fn change(
        &mut self,
        slot: usize,
        column: &[SparseTuple<f64>],
        eta: Option<&SparseVector<f64>>,
    ) -> FactorizationStatus {
        if self.status != FactorizationStatus::Ok {
            return self.status;
        }
        let m = self.m();
        if slot >= m || column.iter().any(|&(i, _)| i >= m) {
            self.status = FactorizationStatus::Error;
            return self.status;
        }

        let eta = match eta {
            Some(eta) => {
                let mut dense = DenseVector::zeros(m);
                dense.mult_add(1.0, eta);
                dense
            },
            None => {
                let mut dense = DenseVector::zeros(m);
                dense.mult_add(1.0, column);
                self.solve(&mut dense);
                dense
            },
        };

        let pivot_value = eta[slot];
        let max = eta.max_abs();
        if pivot_value.abs() <= self.tolerances.pivot {
            trace!("Update of slot {} has pivot {:e}, factorization is singular", slot, pivot_value);
            self.status = FactorizationStatus::Singular;
            return self.status;
        }
        self.stability *= pivot_value.abs() / max;

        let epsilon = self.tolerances.epsilon;
        let values = eta.iter()
            .enumerate()
            .filter(|&(i, value)| i != slot && value.abs() > epsilon)
            .map(|(i, &value)| (i, value))
            .collect();
        self.updates.push(EtaFile::new(values, slot, pivot_value, m));

        self.status
    }

    fn clear(&mut self) {
        self.reset(FactorizationStatus::Unloaded);
    }

    fn memory(&self) -> usize {
        self.lower_triangular.iter().map(Vec::len).sum::<usize>()
            + self.upper_triangular.iter().map(Vec::len).sum::<usize>()
            + self.diagonal.len()
            + self.updates.iter().map(EtaFile::nonzeros).sum::<usize>()
    }

    fn stability(&self) -> f64 {
        self.stability
    }

    fn status(&self) -> FactorizationStatus {
        self.status
    }

    fn dimension(&self) -> usize {
        self.m()
    }

    fn solve(&self, rhs: &mut DenseVector<f64>) {
        debug_assert_eq!(self.status, FactorizationStatus::Ok);
        debug_assert_eq!(rhs.len(), self.m());

        self.solve_decomposition(rhs);
        for update in &self.updates {
            update.apply_inverse_right(rhs);
        }
    }

    fn co_solve(&self, rhs: &mut DenseVector<f64>) {
        debug_assert_eq!(self.status, FactorizationStatus::Ok);
        debug_assert_eq!(rhs.len(), self.m());

        for update in self.updates.iter().rev() {
            update.apply_inverse_left(rhs);
        }
        self.co_solve_decomposition(rhs);
    }
}

/// Compute `row - ratio * pivot` for two rows sorted by column.
///
/// # Return value
///
/// The new row, sorted by column and without values that cancelled, together with the columns in
/// which it has a value that `row` didn't have.
fn subtract_multiple(
    row: &[SparseTuple<f64>],
    ratio: f64,
    pivot: &[SparseTuple<f64>],
    epsilon: f64,
) -> (Vec<SparseTuple<f64>>, Vec<usize>) {
    let mut result = Vec::with_capacity(row.len() + pivot.len());
    let mut added = Vec::new();

    let (mut r, mut p) = (0, 0);
    while r < row.len() || p < pivot.len() {
        let next_row = row.get(r).map_or(usize::MAX, |&(j, _)| j);
        let next_pivot = pivot.get(p).map_or(usize::MAX, |&(j, _)| j);
        match next_row.cmp(&next_pivot) {
            Ordering::Less => {
                result.push(row[r]);
                r += 1;
            },
            Ordering::Greater => {
                let value = -ratio * pivot[p].1;
                if value.abs() > epsilon {
                    result.push((next_pivot, value));
                    added.push(next_pivot);
                }
                p += 1;
            },
            Ordering::Equal => {
                let value = row[r].1 - ratio * pivot[p].1;
                if value.abs() > epsilon {
                    result.push((next_row, value));
                }
                r += 1;
                p += 1;
            },
        }
    }

    (result, added)
}

impl Display for LUDecomposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = 10;
        let column_width = 3;
        let m = self.m();
        let total_width = column_width + 1 + 1 + m * width;

        let write_triangle = |f: &mut fmt::Formatter<'_>, name: &str, lower: bool| -> fmt::Result {
            writeln!(f, "{}:", name)?;
            write!(f, "{:>width$} |", "", width = column_width)?;
            for j in 0..m {
                write!(f, "{0:^width$}", j, width = width)?;
            }
            writeln!(f)?;
            writeln!(f, "{}", "-".repeat(total_width))?;

            for i in 0..m {
                write!(f, "{0:>width$} |", i, width = column_width)?;
                for j in 0..m {
                    let triangle = if lower { &self.lower_triangular } else { &self.upper_triangular };
                    let value = match (j.cmp(&i), lower) {
                        (Ordering::Equal, true) => "1".to_string(),
                        (Ordering::Equal, false) => self.diagonal[i].to_string(),
                        (Ordering::Less, true) | (Ordering::Greater, false) => triangle[j].iter()
                            .find(|&&(ii, _)| ii == i)
                            .map_or_else(|| "0".to_string(), |(_, value)| value.to_string()),
                        _ => String::new(),
                    };
                    write!(f, "{0:^width$}", value, width = width)?;
                }
                writeln!(f)?;
            }
            writeln!(f)
        };

        write_triangle(f, "Lower", true)?;
        write_triangle(f, "Upper", false)?;
        writeln!(f, "Row permutation: {:?}", self.row_permutation)?;
        writeln!(f, "Updates: {}", self.updates.len())
    }
}

#[cfg(test)]
mod test {
    use approx::assert_relative_eq;

    use crate::algorithm::basis::factorization::{Factorization, FactorizationStatus};
    use crate::algorithm::basis::factorization::lower_upper::LUDecomposition;
    use crate::data::linear_algebra::SparseTuple;
    use crate::data::linear_algebra::vector::{DenseVector, SparseVector};
    use crate::data::linear_program::elements::Tolerances;

    fn multiply(columns: &[&[SparseTuple<f64>]], x: &DenseVector<f64>) -> DenseVector<f64> {
        let mut result = DenseVector::zeros(columns.len());
        for (j, column) in columns.iter().enumerate() {
            result.mult_add(x[j], column);
        }
        result
    }

    fn multiply_transposed(columns: &[&[SparseTuple<f64>]], y: &DenseVector<f64>) -> DenseVector<f64> {
        DenseVector::new(columns.iter().map(|column| y.inner_product_with_sparse(column)).collect())
    }

    fn assert_close(left: &DenseVector<f64>, right: &DenseVector<f64>) {
        assert_eq!(left.len(), right.len());
        for (a, b) in left.iter().zip(right.iter()) {
            assert_relative_eq!(a, b, epsilon = 1e-10);
        }
    }

    #[test]
    fn unloaded() {
        let lu = LUDecomposition::new(Tolerances::default());
        assert_eq!(lu.status(), FactorizationStatus::Unloaded);
        assert_eq!(lu.memory(), 0);
        assert_eq!(lu.dimension(), 0);
    }

    #[test]
    fn identity() {
        let mut lu = LUDecomposition::new(Tolerances::default());
        let columns: [&[SparseTuple<f64>]; 3] = [&[(0, 1.0)], &[(1, 1.0)], &[(2, 1.0)]];
        assert_eq!(lu.load(&columns), FactorizationStatus::Ok);
        assert_eq!(lu.memory(), 3);
        assert_relative_eq!(lu.stability(), 1.0);

        let mut rhs = DenseVector::new(vec![1.0, 2.0, 3.0]);
        lu.solve(&mut rhs);
        assert_eq!(rhs, DenseVector::new(vec![1.0, 2.0, 3.0]));
        lu.co_solve(&mut rhs);
        assert_eq!(rhs, DenseVector::new(vec![1.0, 2.0, 3.0]));
    }

    #[test]
    fn requires_pivoting() {
        let mut lu = LUDecomposition::new(Tolerances::default());
        let columns: [&[SparseTuple<f64>]; 3] = [
            &[(1, 2.0), (2, 1.0)],
            &[(0, 1.0), (2, 3.0)],
            &[(0, 4.0), (1, 1.0)],
        ];
        assert_eq!(lu.load(&columns), FactorizationStatus::Ok);

        let b = DenseVector::new(vec![1.0, -2.0, 5.0]);
        let mut x = b.clone();
        lu.solve(&mut x);
        assert_close(&multiply(&columns, &x), &b);

        let mut y = b.clone();
        lu.co_solve(&mut y);
        assert_close(&multiply_transposed(&columns, &y), &b);
    }

    #[test]
    fn small_pivot_rejected() {
        let mut lu = LUDecomposition::new(Tolerances::default());
        let columns: [&[SparseTuple<f64>]; 2] = [&[(0, 1e-3), (1, 1.0)], &[(0, 1.0), (1, 1.0)]];
        assert_eq!(lu.load(&columns), FactorizationStatus::Ok);
        assert_eq!(lu.row_permutation, vec![1, 0]);
    }

    #[test]
    fn shortest_row_pivots() {
        let mut lu = LUDecomposition::new(Tolerances::default());
        let columns: [&[SparseTuple<f64>]; 3] = [
            &[(0, 2.0), (1, 1.0)],
            &[(0, 1.0), (1, 3.0)],
            &[(0, 1.0), (2, 5.0)],
        ];
        assert_eq!(lu.load(&columns), FactorizationStatus::Ok);
        // Row 1 is acceptable and shorter than row 0
        assert_eq!(lu.row_permutation, vec![1, 0, 2]);
        assert_eq!(lu.memory(), 1 + 2 + 3);

        let b = DenseVector::new(vec![4.0, 0.0, -1.0]);
        let mut x = b.clone();
        lu.solve(&mut x);
        assert_close(&multiply(&columns, &x), &b);
        let mut y = b.clone();
        lu.co_solve(&mut y);
        assert_close(&multiply_transposed(&columns, &y), &b);
    }

    #[test]
    fn tridiagonal_without_fill() {
        let m = 1000;
        let columns = (0..m)
            .map(|j| {
                let mut column = Vec::new();
                if j > 0 {
                    column.push((j - 1, -1.0));
                }
                column.push((j, 4.0));
                if j + 1 < m {
                    column.push((j + 1, -1.0));
                }
                column
            })
            .collect::<Vec<Vec<SparseTuple<f64>>>>();
        let columns = columns.iter().map(Vec::as_slice).collect::<Vec<_>>();

        let mut lu = LUDecomposition::new(Tolerances::default());
        assert_eq!(lu.load(&columns), FactorizationStatus::Ok);
        assert_eq!(lu.memory(), 3 * m - 2);

        let b = DenseVector::constant(1.0, m);
        let mut x = b.clone();
        lu.solve(&mut x);
        assert_close(&multiply(&columns, &x), &b);
    }

    #[test]
    fn large_identity() {
        let m = 50_000;
        let columns = (0..m).map(|j| vec![(j, 1.0)]).collect::<Vec<Vec<SparseTuple<f64>>>>();
        let columns = columns.iter().map(Vec::as_slice).collect::<Vec<_>>();

        let mut lu = LUDecomposition::new(Tolerances::default());
        assert_eq!(lu.load(&columns), FactorizationStatus::Ok);
        assert_eq!(lu.memory(), m);
        assert_relative_eq!(lu.stability(), 1.0);
    }

    #[test]
    fn singular() {
        let mut lu = LUDecomposition::new(Tolerances::default());
        let columns: [&[SparseTuple<f64>]; 2] = [&[(0, 1.0), (1, 2.0)], &[(0, 2.0), (1, 4.0)]];
        assert_eq!(lu.load(&columns), FactorizationStatus::Singular);
        assert_eq!(lu.status(), FactorizationStatus::Singular);

        let columns: [&[SparseTuple<f64>]; 2] = [&[(0, 1.0)], &[]];
        assert_eq!(lu.load(&columns), FactorizationStatus::Singular);
    }

    #[test]
    fn index_out_of_range() {
        let mut lu = LUDecomposition::new(Tolerances::default());
        let columns: [&[SparseTuple<f64>]; 2] = [&[(0, 1.0)], &[(2, 1.0)]];
        assert_eq!(lu.load(&columns), FactorizationStatus::Error);
    }

    #[test]
    fn updates() {
        let mut lu = LUDecomposition::new(Tolerances::default());
        let initial: [&[SparseTuple<f64>]; 3] = [&[(0, 1.0)], &[(1, 1.0)], &[(2, 1.0)]];
        assert_eq!(lu.load(&initial), FactorizationStatus::Ok);

        let new_column = [(0, 2.0), (2, 1.0)];
        assert_eq!(lu.change(0, &new_column, None), FactorizationStatus::Ok);
        assert_eq!(lu.nr_updates(), 1);
        assert_eq!(lu.memory(), 3 + 2);
        assert_relative_eq!(lu.stability(), 1.0);

        let second_column = [(1, 6.0), (2, 3.0)];
        assert_eq!(lu.change(2, &second_column, None), FactorizationStatus::Ok);
        assert_relative_eq!(lu.stability(), 0.5);

        let current: [&[SparseTuple<f64>]; 3] = [&new_column, &[(1, 1.0)], &second_column];
        let b = DenseVector::new(vec![3.0, 1.0, -1.0]);
        let mut x = b.clone();
        lu.solve(&mut x);
        assert_close(&multiply(&current, &x), &b);
        let mut y = b.clone();
        lu.co_solve(&mut y);
        assert_close(&multiply_transposed(&current, &y), &b);
    }

    #[test]
    fn update_with_given_eta() {
        let mut lu = LUDecomposition::new(Tolerances::default());
        let initial: [&[SparseTuple<f64>]; 2] = [&[(0, 2.0)], &[(1, 1.0)]];
        lu.load(&initial);

        // In the current basis, (2, 2) is 1 times the first column plus 2 times the second
        let eta = SparseVector::new(vec![(0, 1.0), (1, 2.0)]);
        assert_eq!(lu.change(1, &[(0, 2.0), (1, 2.0)], Some(&eta)), FactorizationStatus::Ok);

        let mut x = DenseVector::new(vec![2.0, 2.0]);
        lu.solve(&mut x);
        assert_relative_eq!(x[0], 0.0, epsilon = 1e-12);
        assert_relative_eq!(x[1], 1.0);
    }

    #[test]
    fn singular_update() {
        let mut lu = LUDecomposition::new(Tolerances::default());
        let initial: [&[SparseTuple<f64>]; 2] = [&[(0, 1.0)], &[(1, 1.0)]];
        lu.load(&initial);
        assert_eq!(lu.change(1, &[(0, 5.0)], None), FactorizationStatus::Singular);
        assert_eq!(lu.change(1, &[(1, 5.0)], None), FactorizationStatus::Singular);

        lu.clear();
        assert_eq!(lu.status(), FactorizationStatus::Unloaded);
    }

    #[test]
    fn display() {
        let mut lu = LUDecomposition::new(Tolerances::default());
        let columns: [&[SparseTuple<f64>]; 2] = [&[(0, 1.0), (1, 1.0)], &[(1, 1.0)]];
        lu.load(&columns);
        let text = lu.to_string();
        assert!(text.starts_with("Lower:"));
        assert!(text.contains("Upper:"));
        assert!(text.ends_with("Updates: 0\n"));
    }
}
