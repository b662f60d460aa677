//! # Algorithms
//!
//! The basis with its factorization, the interface through which it reads the linear program, and
//! the pricing strategies that choose the pivots.
pub mod basis;
pub mod matrix_provider;
pub mod pricing;
