mod cholesky;
mod core;
mod givens;
mod matrix_math;
mod triangular;
mod types;

pub use self::cholesky::*;
pub use self::givens::*;
pub use self::triangular::*;
pub use self::types::*;
