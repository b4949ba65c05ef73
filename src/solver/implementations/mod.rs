//! QP engines.
//!
//! [`BoundedQP`](bounded::BoundedQP) handles simple bounds only,
//! [`ConstrainedQP`](constrained::ConstrainedQP) adds general linear
//! constraints, and [`VaryingQP`](varying::VaryingQP) accepts new
//! matrices between solves.

pub mod bounded;
pub mod constrained;
pub mod varying;

#[cfg(feature = "serde")]
mod json;
#[cfg(feature = "serde")]
pub use json::*;
