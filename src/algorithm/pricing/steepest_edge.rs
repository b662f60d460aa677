//! # Steepest edge pricing
//!
//! Weights are the squared norms of the edge directions, updated exactly after each pivot. In the
//! entering algorithm these are the primal edges `1 + ||B^-1 a_j||^2`, in the leaving algorithm the
//! rows of the basis inverse `||B^-T e_i||^2`. A cold start uses weight `1` everywhere.
use itertools::repeat_n;

use crate::algorithm::pricing::{PivotUpdate, PricerSettings, PricingRule, PricingView, position, select_weighted_enter, select_weighted_leave};
use crate::data::linear_algebra::vector::DenseVector;
use crate::data::linear_program::elements::VectorId;

/// Smallest weight kept in the leaving algorithm; the weights are norms of nonzero rows.
const MINIMUM_WEIGHT: f64 = 1e-8;

#[allow(missing_docs)]
#[derive(Clone, Debug, PartialEq)]
pub struct SteepestEdgePricer {
    weights: Vec<f64>,
    /// Weights of the covectors in the entering algorithm, of the slots in the leaving algorithm.
    co_weights: Vec<f64>,
    epsilon: f64,
}

impl SteepestEdgePricer {
    /// Create a pricer without weights.
    #[must_use]
    pub fn new(settings: &PricerSettings) -> Self {
        Self {
            weights: Vec::new(),
            co_weights: Vec::new(),
            epsilon: settings.tolerances.epsilon,
        }
    }

    /// Weight of the `i`th vector.
    #[must_use]
    pub fn weight(&self, i: usize) -> f64 {
        self.weights[i]
    }

    /// Weight of the `i`th covector or slot.
    #[must_use]
    pub fn co_weight(&self, i: usize) -> f64 {
        self.co_weights[i]
    }
}

impl PricingRule for SteepestEdgePricer {
    fn load<V: PricingView>(&mut self, view: &V) {
        self.weights = vec![1.0; view.co_dimension()];
        self.co_weights = vec![1.0; view.dimension()];
    }

    fn select_enter<V: PricingView>(&mut self, view: &V) -> Option<VectorId> {
        select_weighted_enter(view, &self.weights, &self.co_weights, self.epsilon)
    }

    fn select_leave<V: PricingView>(&mut self, view: &V) -> Option<usize> {
        select_weighted_leave(view, &self.co_weights, self.epsilon)
    }

    fn entered4<V: PricingView>(&mut self, view: &V, update: &PivotUpdate<'_>) {
        let pivot = update.pivot();
        let reference = 1.0 + update.column.length2();

        let mut w = update.column.clone();
        view.co_solve(&mut w);

        let update_weight = |weight: &mut f64, id: VectorId, row_value: f64| {
            if row_value != 0.0 && !view.is_basic(id) {
                let ratio = row_value / pivot;
                let kappa = w.inner_product_with_sparse(view.vector(id));
                *weight = (*weight - 2.0 * ratio * kappa + ratio * ratio * reference)
                    .max(1.0 + ratio * ratio);
            }
        };
        for (i, weight) in self.weights.iter_mut().enumerate() {
            update_weight(weight, view.id(i), update.row_values[i]);
        }
        for (i, weight) in self.co_weights.iter_mut().enumerate() {
            update_weight(weight, view.co_id(i), update.co_row_values[i]);
        }

        let leaving = (reference / (pivot * pivot)).max(1.0 + 1.0 / (pivot * pivot));
        match position(view, update.leaving) {
            Ok(i) => self.weights[i] = leaving,
            Err(i) => self.co_weights[i] = leaving,
        }
    }

    fn left4<V: PricingView>(&mut self, view: &V, update: &PivotUpdate<'_>) {
        let pivot = update.pivot();
        let reference = update.row.length2();

        let mut tau: DenseVector<f64> = update.row.clone();
        view.solve(&mut tau);

        for (i, weight) in self.co_weights.iter_mut().enumerate() {
            if i != update.slot {
                let ratio = update.column[i] / pivot;
                if ratio != 0.0 {
                    *weight = (*weight - 2.0 * ratio * tau[i] + ratio * ratio * reference)
                        .max(MINIMUM_WEIGHT);
                }
            }
        }
        self.co_weights[update.slot] = (reference / (pivot * pivot)).max(MINIMUM_WEIGHT);
    }

    fn added_vecs(&mut self, n: usize) {
        self.weights.extend(repeat_n(1.0, n));
    }

    fn added_co_vecs(&mut self, n: usize) {
        self.co_weights.extend(repeat_n(1.0, n));
    }
}
