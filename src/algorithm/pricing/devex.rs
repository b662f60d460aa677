//! # Devex pricing
//!
//! Approximates steepest edge weights relative to a reference framework that is fixed at load time.
//! Weights only grow, and the framework is reset once they have grown too much.
use itertools::repeat_n;
use log::trace;

use crate::algorithm::pricing::{PivotUpdate, PricerSettings, PricingRule, PricingView, position, select_weighted_enter, select_weighted_leave};
use crate::data::linear_program::elements::VectorId;

/// Weights larger than this cause a reset of the reference framework.
const RESET_THRESHOLD: f64 = 1e6;

/// Devex weights for the vectors and covectors.
///
/// In the leaving algorithm, `co_weights` holds the weights per slot.
#[derive(Clone, Debug, PartialEq)]
pub struct DevexPricer {
    weights: Vec<f64>,
    co_weights: Vec<f64>,
    epsilon: f64,
    resets: usize,
}

impl DevexPricer {
    /// Create a pricer without weights.
    #[must_use]
    pub fn new(settings: &PricerSettings) -> Self {
        Self {
            weights: Vec::new(),
            co_weights: Vec::new(),
            epsilon: settings.tolerances.epsilon,
            resets: 0,
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

    /// Number of times the reference framework was reset since creation.
    #[must_use]
    pub fn resets(&self) -> usize {
        self.resets
    }

    fn reset_if_large(&mut self) {
        let too_large = self.weights.iter()
            .chain(self.co_weights.iter())
            .any(|&weight| weight > RESET_THRESHOLD);
        if too_large {
            trace!("Devex weights exceed {:e}, resetting reference framework", RESET_THRESHOLD);
            self.weights.iter_mut().for_each(|weight| *weight = 1.0);
            self.co_weights.iter_mut().for_each(|weight| *weight = 1.0);
            self.resets += 1;
        }
    }
}

impl PricingRule for DevexPricer {
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
        let reference = match position(view, update.entering) {
            Ok(i) => self.weights[i],
            Err(i) => self.co_weights[i],
        };

        for (i, weight) in self.weights.iter_mut().enumerate() {
            let ratio = update.row_values[i] / pivot;
            *weight = weight.max(ratio * ratio * reference);
        }
        for (i, weight) in self.co_weights.iter_mut().enumerate() {
            let ratio = update.co_row_values[i] / pivot;
            *weight = weight.max(ratio * ratio * reference);
        }

        let leaving = (reference / (pivot * pivot)).max(1.0);
        match position(view, update.leaving) {
            Ok(i) => self.weights[i] = leaving,
            Err(i) => self.co_weights[i] = leaving,
        }

        self.reset_if_large();
    }

    fn left4<V: PricingView>(&mut self, _view: &V, update: &PivotUpdate<'_>) {
        let pivot = update.pivot();
        let reference = self.co_weights[update.slot];

        for (i, weight) in self.co_weights.iter_mut().enumerate() {
            if i != update.slot {
                let ratio = update.column[i] / pivot;
                *weight = weight.max(ratio * ratio * reference);
            }
        }
        self.co_weights[update.slot] = (reference / (pivot * pivot)).max(1.0);

        self.reset_if_large();
    }

    fn added_vecs(&mut self, n: usize) {
        self.weights.extend(repeat_n(1.0, n));
    }

    fn added_co_vecs(&mut self, n: usize) {
        self.co_weights.extend(repeat_n(1.0, n));
    }
}
