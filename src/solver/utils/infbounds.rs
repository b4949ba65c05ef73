use crate::algebra::{AsFloatT, FloatT};
use crate::solver::utils::atomic::{AtomicF64, Ordering};
use crate::solver::INFINITY_DEFAULT;
use lazy_static::lazy_static;
//
lazy_static! {
    static ref INFINITY: AtomicF64 = AtomicF64::new(INFINITY_DEFAULT);
}

/// Revert the bound infinity to its default value.
pub fn default_infinity() {
    INFINITY.store(INFINITY_DEFAULT, Ordering::Relaxed);
}
/// Set the value at or beyond which bounds are treated as absent.
pub fn set_infinity(v: f64) {
    INFINITY.store(v, Ordering::Relaxed);
}
/// Get the value at or beyond which bounds are treated as absent.
pub fn get_infinity() -> f64 {
    INFINITY.load(Ordering::Relaxed)
}

pub(crate) fn infinity<T: FloatT>() -> T {
    get_infinity().as_T()
}
