//! # Representing linear programs
//!
//! The linear programs handled here have the form `lhs <= A x <= rhs`, `lower <= x <= upper`,
//! where any of the bounds may be infinite.
pub mod elements;
pub mod matrix_data;
