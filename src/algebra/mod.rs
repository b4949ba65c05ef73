//! Dense linear algebra for the homotopy engines.
//!
//! All matrices are stored dense in column major format.  The
//! factor updates used by the active-set engines (Givens rotations,
//! triangular and reverse triangular solves, Cholesky column
//! updates) operate on the leading blocks of preallocated matrices
//! so that no allocation happens once an engine is constructed.

#![allow(non_snake_case)]

mod dense;
mod error_types;
mod floats;
mod math_traits;
mod vecmath;

pub use dense::*;
pub use error_types::*;
pub use floats::*;
pub use math_traits::*;

#[cfg(test)]
mod tests;
