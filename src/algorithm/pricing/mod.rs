//! # Pricing
//!
//! Selecting the variable that enters the basis (in the entering algorithm) or the slot that leaves
//! it (in the leaving algorithm). The strategies differ in how they weigh the violations found in
//! the test values the simplex driver maintains.
use crate::algorithm::basis::descriptor::Status;
use crate::data::linear_algebra::SparseTuple;
use crate::data::linear_algebra::vector::DenseVector;
use crate::data::linear_program::elements::{Algorithm, Representation, Tolerances, VectorId};

pub mod devex;
pub mod hybrid;
pub mod partial_multiple;
pub mod steepest_edge;


/// What a pricing strategy can see of the simplex driver.
///
/// There are `co_dimension` "vectors" and `dimension` "covectors", see `Representation`. Test
/// values are negative when the corresponding variable violates its bounds or its optimality
/// condition.
pub trait PricingView {
    /// Current representation.
    fn representation(&self) -> Representation;

    /// Current algorithm type.
    fn algorithm(&self) -> Algorithm;

    /// Size of the basis.
    fn dimension(&self) -> usize;

    /// Number of vectors.
    fn co_dimension(&self) -> usize;

    /// Identifier of the `i`th vector.
    fn id(&self, i: usize) -> VectorId {
        VectorId::new(self.representation().vector_kind(), i)
    }

    /// Identifier of the `i`th covector.
    fn co_id(&self, i: usize) -> VectorId {
        VectorId::new(self.representation().co_vector_kind(), i)
    }

    /// Status of a row or column.
    fn status(&self, id: VectorId) -> Status;

    /// Whether a row or column is in the basis.
    fn is_basic(&self, id: VectorId) -> bool {
        self.status(id).is_basic(self.representation())
    }

    /// Test value of the `i`th vector, used in the entering algorithm.
    fn test(&self, i: usize) -> f64;

    /// Test value of the `i`th covector, used in the entering algorithm.
    fn co_test(&self, i: usize) -> f64;

    /// Feasibility test value of the basic variable in a slot, used in the leaving algorithm.
    fn f_test(&self, slot: usize) -> f64;

    /// The vector of a row or column in the current representation.
    fn vector(&self, id: VectorId) -> &[SparseTuple<f64>];

    /// Solve `B x = rhs` in place.
    fn solve(&self, rhs: &mut DenseVector<f64>);

    /// Solve `B^T y = rhs` in place.
    fn co_solve(&self, rhs: &mut DenseVector<f64>);
}

/// Quantities of a pivot the weight updates need, computed by the driver anyway.
#[derive(Copy, Clone, Debug)]
pub struct PivotUpdate<'a> {
    /// Slot in which the basis changed.
    pub slot: usize,
    /// Identifier that became basic.
    pub entering: VectorId,
    /// Identifier that left the basis.
    pub leaving: VectorId,
    /// Entering vector expressed in the old basis, `B^-1 a_q`, of length `dimension`.
    pub column: &'a DenseVector<f64>,
    /// Row `slot` of the old basis inverse, `B^-T e_p`, of length `dimension`.
    pub row: &'a DenseVector<f64>,
    /// Inner products of `row` with each vector, of length `co_dimension`.
    pub row_values: &'a DenseVector<f64>,
    /// Inner products of `row` with each covector, of length `dimension`.
    pub co_row_values: &'a DenseVector<f64>,
}

impl PivotUpdate<'_> {
    /// The pivot element.
    #[must_use]
    pub fn pivot(&self) -> f64 {
        self.column[self.slot]
    }
}

/// A pricing strategy.
///
/// The hooks `entered4` and `left4` are called after a pivot was chosen, but before the basis of
/// the view changes.
pub trait PricingRule {
    /// Prepare for the view's problem, algorithm and representation, discarding all history.
    fn load<V: PricingView>(&mut self, view: &V);

    /// Select a vector or covector to enter the basis, if any violates its test.
    fn select_enter<V: PricingView>(&mut self, view: &V) -> Option<VectorId>;

    /// Select a slot to leave the basis, if any violates its feasibility test.
    fn select_leave<V: PricingView>(&mut self, view: &V) -> Option<usize>;

    /// Follow a pivot made in the entering algorithm.
    fn entered4<V: PricingView>(&mut self, view: &V, update: &PivotUpdate<'_>);

    /// Follow a pivot made in the leaving algorithm.
    fn left4<V: PricingView>(&mut self, view: &V, update: &PivotUpdate<'_>);

    /// `n` vectors were appended to the problem.
    fn added_vecs(&mut self, n: usize);

    /// `n` covectors were appended to the problem.
    fn added_co_vecs(&mut self, n: usize);
}

/// Parameters shared by the pricing strategies.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PricerSettings {
    /// Partial multiple pricing is used when `dimension / co_dimension` exceeds this value.
    pub hybrid_factor: f64,
    /// Number of vectors scanned at a time by partial pricing.
    pub partial_size: usize,
    /// Number of candidates partial pricing collects before stopping a scan.
    pub multiple: usize,
    /// Test values below `-epsilon` are violated.
    pub tolerances: Tolerances,
}

impl Default for PricerSettings {
    fn default() -> Self {
        Self {
            hybrid_factor: 0.5,
            partial_size: 17,
            multiple: 8,
            tolerances: Tolerances::default(),
        }
    }
}

/// Position of a row or column among the vectors (`Ok`) or the covectors (`Err`).
fn position<V: PricingView>(view: &V, id: VectorId) -> Result<usize, usize> {
    if id.kind() == view.representation().vector_kind() {
        Ok(id.index())
    } else {
        Err(id.index())
    }
}

/// Most violated test value relative to its weight, among the nonbasic vectors and covectors.
fn select_weighted_enter<V: PricingView>(
    view: &V,
    weights: &[f64],
    co_weights: &[f64],
    epsilon: f64,
) -> Option<VectorId> {
    let vectors = (0..view.co_dimension())
        .map(|i| (view.id(i), view.test(i), weights[i]));
    let covectors = (0..view.dimension())
        .map(|i| (view.co_id(i), view.co_test(i), co_weights[i]));

    vectors.chain(covectors)
        .filter(|&(id, test, _)| test < -epsilon && !view.is_basic(id))
        .map(|(id, test, weight)| (id, test * test / weight))
        .fold(None, |best: Option<(VectorId, f64)>, (id, score)| match best {
            Some((_, best_score)) if best_score >= score => best,
            _ => Some((id, score)),
        })
        .map(|(id, _)| id)
}

/// Most violated feasibility test relative to its weight.
fn select_weighted_leave<V: PricingView>(view: &V, weights: &[f64], epsilon: f64) -> Option<usize> {
    (0..view.dimension())
        .map(|slot| (slot, view.f_test(slot)))
        .filter(|&(_, test)| test < -epsilon)
        .map(|(slot, test)| (slot, test * test / weights[slot]))
        .fold(None, |best: Option<(usize, f64)>, (slot, score)| match best {
            Some((_, best_score)) if best_score >= score => best,
            _ => Some((slot, score)),
        })
        .map(|(slot, _)| slot)
}
