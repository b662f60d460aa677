//! # Hybrid pricing
//!
//! Chooses one of the other strategies based on the shape of the problem and the algorithm type.
use std::fmt;
use std::fmt::Display;

use log::debug;

use crate::algorithm::pricing::{PivotUpdate, PricerSettings, PricingRule, PricingView};
use crate::algorithm::pricing::devex::DevexPricer;
use crate::algorithm::pricing::partial_multiple::PartialMultiplePricer;
use crate::algorithm::pricing::steepest_edge::SteepestEdgePricer;
use crate::data::linear_program::elements::{Algorithm, VectorId};

/// The strategies the hybrid pricer chooses from.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Strategy {
    #[allow(missing_docs)]
    SteepestEdge,
    #[allow(missing_docs)]
    Devex,
    #[allow(missing_docs)]
    PartialMultiple,
}

impl Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Strategy::SteepestEdge => "steepest edge",
            Strategy::Devex => "devex",
            Strategy::PartialMultiple => "partial multiple",
        })
    }
}

/// Dispatches to the strategy that suits the problem.
///
/// When the ratio `dimension / co_dimension` exceeds the hybrid factor, partial multiple pricing is
/// used. Otherwise, devex is used in the entering algorithm and steepest edge in the leaving
/// algorithm. The choice is made again on each `load`, `set_rep` and `set_type`; a strategy that
/// becomes active starts without history.
#[derive(Clone, Debug, PartialEq)]
pub struct HybridPricer {
    steepest_edge: SteepestEdgePricer,
    devex: DevexPricer,
    partial_multiple: PartialMultiplePricer,
    active: Strategy,

    hybrid_factor: f64,
}

impl HybridPricer {
    #[allow(missing_docs)]
    #[must_use]
    pub fn new(settings: &PricerSettings) -> Self {
        Self {
            steepest_edge: SteepestEdgePricer::new(settings),
            devex: DevexPricer::new(settings),
            partial_multiple: PartialMultiplePricer::new(settings),
            active: Strategy::Devex,

            hybrid_factor: settings.hybrid_factor,
        }
    }

    /// Strategy currently dispatched to.
    #[must_use]
    pub fn active(&self) -> Strategy {
        self.active
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn hybrid_factor(&self) -> f64 {
        self.hybrid_factor
    }

    /// Change the threshold, takes effect at the next selection of a strategy.
    pub fn set_hybrid_factor(&mut self, hybrid_factor: f64) {
        self.hybrid_factor = hybrid_factor;
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn steepest_edge(&self) -> &SteepestEdgePricer {
        &self.steepest_edge
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn devex(&self) -> &DevexPricer {
        &self.devex
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn partial_multiple(&self) -> &PartialMultiplePricer {
        &self.partial_multiple
    }

    /// Follow a change of the representation of the view.
    pub fn set_rep<V: PricingView>(&mut self, view: &V) {
        self.select(view);
    }

    /// Follow a change of the algorithm type of the view.
    pub fn set_type<V: PricingView>(&mut self, view: &V) {
        self.select(view);
    }

    /// Strategy for the shape and algorithm type of a view.
    fn strategy_for<V: PricingView>(&self, view: &V) -> Strategy {
        let ratio = view.dimension() as f64 / view.co_dimension().max(1) as f64;
        if ratio > self.hybrid_factor {
            Strategy::PartialMultiple
        } else {
            match view.algorithm() {
                Algorithm::Entering => Strategy::Devex,
                Algorithm::Leaving => Strategy::SteepestEdge,
            }
        }
    }

    fn select<V: PricingView>(&mut self, view: &V) {
        let strategy = self.strategy_for(view);
        if strategy != self.active {
            debug!("Pricing switches from {} to {}", self.active, strategy);
        }
        self.active = strategy;

        match self.active {
            Strategy::SteepestEdge => self.steepest_edge.load(view),
            Strategy::Devex => self.devex.load(view),
            Strategy::PartialMultiple => self.partial_multiple.load(view),
        }
    }
}

impl PricingRule for HybridPricer {
    fn load<V: PricingView>(&mut self, view: &V) {
        self.select(view);
    }

    fn select_enter<V: PricingView>(&mut self, view: &V) -> Option<VectorId> {
        match self.active {
            Strategy::SteepestEdge => self.steepest_edge.select_enter(view),
            Strategy::Devex => self.devex.select_enter(view),
            Strategy::PartialMultiple => self.partial_multiple.select_enter(view),
        }
    }

    fn select_leave<V: PricingView>(&mut self, view: &V) -> Option<usize> {
        match self.active {
            Strategy::SteepestEdge => self.steepest_edge.select_leave(view),
            Strategy::Devex => self.devex.select_leave(view),
            Strategy::PartialMultiple => self.partial_multiple.select_leave(view),
        }
    }

    fn entered4<V: PricingView>(&mut self, view: &V, update: &PivotUpdate<'_>) {
        match self.active {
            Strategy::SteepestEdge => self.steepest_edge.entered4(view, update),
            Strategy::Devex => self.devex.entered4(view, update),
            Strategy::PartialMultiple => self.partial_multiple.entered4(view, update),
        }
    }

    fn left4<V: PricingView>(&mut self, view: &V, update: &PivotUpdate<'_>) {
        match self.active {
            Strategy::SteepestEdge => self.steepest_edge.left4(view, update),
            Strategy::Devex => self.devex.left4(view, update),
            Strategy::PartialMultiple => self.partial_multiple.left4(view, update),
        }
    }

    fn added_vecs(&mut self, n: usize) {
        match self.active {
            Strategy::SteepestEdge => self.steepest_edge.added_vecs(n),
            Strategy::Devex => self.devex.added_vecs(n),
            Strategy::PartialMultiple => self.partial_multiple.added_vecs(n),
        }
    }

    fn added_co_vecs(&mut self, n: usize) {
        match self.active {
            Strategy::SteepestEdge => self.steepest_edge.added_co_vecs(n),
            Strategy::Devex => self.devex.added_co_vecs(n),
            Strategy::PartialMultiple => self.partial_multiple.added_co_vecs(n),
        }
    }
}
