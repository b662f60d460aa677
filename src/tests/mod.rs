//! # Fixtures shared by the tests inside the crate.
//!
//! Convention for function names:
//!
//! * `fn matrix_data()`: the problem as a `MatrixData`
//! * `fn descriptor()`: a basis description that differs from the slack basis
