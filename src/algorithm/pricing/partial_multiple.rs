//! # Partial multiple pricing
//!
//! Scans only part of the vectors per selection and remembers the violated ones it found, such that
//! following selections can pick from those candidates again before scanning further. Suited for
//! problems with many more vectors than covectors.
use log::trace;

use crate::algorithm::pricing::{PivotUpdate, PricerSettings, PricingRule, PricingView};
use crate::data::linear_program::elements::VectorId;

/// Candidates are positions in the vectors followed by the covectors.
#[derive(Clone, Debug, PartialEq)]
pub struct PartialMultiplePricer {
    partial_size: usize,
    multiple: usize,
    epsilon: f64,

    /// Position where the next scan starts.
    start: usize,
    pool: Vec<usize>,
}

impl PartialMultiplePricer {
    #[allow(missing_docs)]
    #[must_use]
    pub fn new(settings: &PricerSettings) -> Self {
        Self {
            partial_size: settings.partial_size.max(1),
            multiple: settings.multiple.max(1),
            epsilon: settings.tolerances.epsilon,

            start: 0,
            pool: Vec::new(),
        }
    }

    /// Candidates remembered from earlier scans.
    #[must_use]
    pub fn pool(&self) -> &[usize] {
        &self.pool
    }

    fn id<V: PricingView>(view: &V, position: usize) -> VectorId {
        let co_dimension = view.co_dimension();
        if position < co_dimension {
            view.id(position)
        } else {
            view.co_id(position - co_dimension)
        }
    }

    fn test<V: PricingView>(view: &V, position: usize) -> f64 {
        let co_dimension = view.co_dimension();
        if position < co_dimension {
            view.test(position)
        } else {
            view.co_test(position - co_dimension)
        }
    }

    fn is_violated<V: PricingView>(&self, view: &V, position: usize) -> bool {
        Self::test(view, position) < -self.epsilon && !view.is_basic(Self::id(view, position))
    }

    /// Scan parts until enough candidates are found or everything has been seen.
    fn refill<V: PricingView>(&mut self, view: &V) {
        let total = view.co_dimension() + view.dimension();
        if total == 0 {
            return;
        }
        self.start %= total;

        let mut scanned = 0;
        while scanned < total && self.pool.len() < self.multiple {
            let part = self.partial_size.min(total - scanned);
            for offset in 0..part {
                let position = (self.start + offset) % total;
                if self.is_violated(view, position) {
                    self.pool.push(position);
                }
            }
            scanned += part;
            self.start = (self.start + part) % total;
        }
        trace!("Partial pricing scanned {} of {}, found {} candidates", scanned, total, self.pool.len());
    }
}

impl PricingRule for PartialMultiplePricer {
    fn load<V: PricingView>(&mut self, _view: &V) {
        self.start = 0;
        self.pool.clear();
    }

    fn select_enter<V: PricingView>(&mut self, view: &V) -> Option<VectorId> {
        let total = view.co_dimension() + view.dimension();
        let mut pool = std::mem::take(&mut self.pool);
        pool.retain(|&position| position < total && self.is_violated(view, position));
        self.pool = pool;

        if self.pool.is_empty() {
            self.refill(view);
        }

        let (index, _) = self.pool.iter()
            .enumerate()
            .map(|(index, &position)| (index, Self::test(view, position)))
            .fold(None, |best: Option<(usize, f64)>, (index, test)| match best {
                Some((_, best_test)) if best_test <= test => best,
                _ => Some((index, test)),
            })?;

        let position = self.pool.swap_remove(index);
        Some(Self::id(view, position))
    }

    fn select_leave<V: PricingView>(&mut self, view: &V) -> Option<usize> {
        (0..view.dimension())
            .map(|slot| (slot, view.f_test(slot)))
            .filter(|&(_, test)| test < -self.epsilon)
            .fold(None, |best: Option<(usize, f64)>, (slot, test)| match best {
                Some((_, best_test)) if best_test <= test => best,
                _ => Some((slot, test)),
            })
            .map(|(slot, _)| slot)
    }

    fn entered4<V: PricingView>(&mut self, _view: &V, _update: &PivotUpdate<'_>) {}

    fn left4<V: PricingView>(&mut self, _view: &V, _update: &PivotUpdate<'_>) {}

    fn added_vecs(&mut self, _n: usize) {
        // Positions of covectors shift
        self.pool.clear();
    }

    fn added_co_vecs(&mut self, _n: usize) {}
}
