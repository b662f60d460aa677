//! Properties that should hold for any input, checked on generated problems and vectors.
use approx::assert_relative_eq;
use proptest::prelude::*;

use relp_basis::algorithm::basis::{BasisMatrix, BasisSettings, BasisStatus, Entering};
use relp_basis::algorithm::basis::factorization::lower_upper::LUDecomposition;
use relp_basis::algorithm::matrix_provider::MatrixProvider;
use relp_basis::data::linear_algebra::vector::{DenseVector, SparseVector, UnitVector};
use relp_basis::data::linear_program::elements::{Tolerances, VectorId};
use relp_basis::data::linear_program::matrix_data::MatrixData;

/// Entries with indices below `50`, possibly repeated.
fn entries() -> impl Strategy<Value = Vec<(usize, f64)>> {
    prop::collection::vec((0..50_usize, -10.0..10.0_f64), 0..20)
}

/// A problem with up to five rows and columns, all columns bounded below by zero.
fn problem() -> impl Strategy<Value = MatrixData> {
    (1..6_usize, 1..6_usize).prop_flat_map(|(nr_rows, nr_columns)| {
        prop::collection::vec(
            prop::collection::vec(prop::option::weighted(0.6, 0.5..4.0_f64), nr_rows),
            nr_columns,
        )
            .prop_map(move |columns| {
                let columns = columns.into_iter()
                    .map(|column| {
                        let tuples = column.into_iter()
                            .enumerate()
                            .filter_map(|(i, value)| value.map(|value| (i, value)))
                            .collect();
                        SparseVector::new(tuples)
                    })
                    .collect();

                MatrixData::new(
                    columns,
                    vec![f64::NEG_INFINITY; nr_rows],
                    vec![1.0; nr_rows],
                    vec![0.0; nr_columns],
                    vec![f64::INFINITY; nr_columns],
                )
            })
    })
}

fn basis(data: &MatrixData) -> BasisMatrix<'_, MatrixData, LUDecomposition> {
    let mut basis = BasisMatrix::new(LUDecomposition::new(Tolerances::default()), BasisSettings::default());
    basis.load(data);
    basis
}

fn ids(data: &MatrixData) -> Vec<VectorId> {
    (0..data.nr_rows()).map(VectorId::Row)
        .chain((0..data.nr_columns()).map(VectorId::Column))
        .collect()
}

proptest! {
    /// Sorting orders by index and keeps the values.
    #[test]
    fn sort(entries in entries()) {
        let mut vector = SparseVector::new(entries);
        let length2 = vector.length2();
        vector.sort();

        prop_assert!(vector.is_sorted());
        assert_relative_eq!(vector.length2(), length2, max_relative = 1e-12);
    }

    /// Removing a range leaves exactly the entries outside of it.
    #[test]
    fn remove((entries, lo, hi) in entries()
        .prop_filter("nonempty", |entries| !entries.is_empty())
        .prop_flat_map(|entries| {
            let len = entries.len();
            (Just(entries), 0..len)
        })
        .prop_flat_map(|(entries, lo)| {
            let len = entries.len();
            (Just(entries), Just(lo), lo..len)
        })
    ) {
        let mut expected = entries[..lo].to_vec();
        expected.extend_from_slice(&entries[hi + 1..]);

        let mut vector = SparseVector::new(entries);
        vector.remove(lo, hi);
        prop_assert_eq!(vector.size(), expected.len());

        let order = |a: &(usize, f64), b: &(usize, f64)| a.0.cmp(&b.0).then(a.1.total_cmp(&b.1));
        let mut actual = vector.iter().copied().collect::<Vec<_>>();
        actual.sort_by(order);
        expected.sort_by(order);
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn unit(i in 0..1000_usize) {
        let unit = UnitVector::<f64>::new(i);
        prop_assert_eq!(unit.index(), i);
        prop_assert_eq!(unit.value(0), 1.0);
        prop_assert_eq!(unit.size(), 1);
    }

    /// A loaded basis fills every slot and counts the nonzeros of its vectors.
    #[test]
    fn load(data in problem()) {
        let basis = basis(&data);

        prop_assert_eq!(basis.status(), BasisStatus::Regular);
        prop_assert_eq!(basis.base_ids().len(), data.dimension());
        let nonzeros = (0..basis.dimension()).map(|slot| basis.base_vector(slot).len()).sum::<usize>();
        prop_assert_eq!(basis.nonzeros(), nonzeros);
        prop_assert!(basis.is_consistent());

        let mut again = self::basis(&data);
        again.load_desc(basis.desc().clone());
        prop_assert_eq!(again.base_ids(), basis.base_ids());
        prop_assert_eq!(again.nonzeros(), nonzeros);
    }

    /// Updating the factorization gives the same basis as computing it from scratch after each
    /// change.
    #[test]
    fn incremental_equals_from_scratch(
        data in problem(),
        choices in prop::collection::vec((0..100_usize, 0..100_usize), 1..12),
    ) {
        let mut incremental = basis(&data);
        let mut scratch = basis(&data);

        for (candidate, slot) in choices {
            let candidates = ids(&data).into_iter()
                .filter(|id| !scratch.base_ids().contains(id))
                .collect::<Vec<_>>();
            if candidates.is_empty() {
                break;
            }
            let id = candidates[candidate % candidates.len()];

            // Only slots that keep the basis matrix nonsingular
            let mut eta = DenseVector::zeros(data.dimension());
            eta.mult_add(1.0, data.vector(id));
            scratch.solve(&mut eta).unwrap();
            let slots = (0..data.dimension()).filter(|&k| eta[k].abs() > 0.1).collect::<Vec<_>>();
            if slots.is_empty() {
                continue;
            }
            let slot = slots[slot % slots.len()];

            let entering = Entering { id, vector: data.vector(id) };
            incremental.change(Some(slot), Some(entering), None).unwrap();
            scratch.change(Some(slot), Some(entering), None).unwrap();
            scratch.factorize().unwrap();

            prop_assert_eq!(incremental.base_ids(), scratch.base_ids());
            prop_assert_eq!(incremental.desc(), scratch.desc());
            prop_assert_eq!(incremental.status(), BasisStatus::Regular);
            prop_assert!(incremental.is_consistent());

            let rhs = DenseVector::constant(1.0, data.dimension());
            let mut x = rhs.clone();
            incremental.solve(&mut x).unwrap();
            incremental.mult_with_base(&mut x);
            for k in 0..data.dimension() {
                assert_relative_eq!(x[k], rhs[k], epsilon = 1e-6);
            }
        }
    }
}
