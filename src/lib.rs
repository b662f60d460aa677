//! # Basis maintenance for the revised simplex method
//!
//! The square matrix of basic columns is kept together with a factorization of it. Every pivot,
//! the basis decides whether to cheaply update that factorization or to recompute it from scratch,
//! steered by fill-in and by the numerical stability the factorization reports. Pricing strategies
//! that select the entering and leaving variables of each pivot are selected at runtime based on
//! the shape of the problem.
#![warn(missing_docs)]

pub mod algorithm;
pub mod data;

#[cfg(test)]
mod tests;
