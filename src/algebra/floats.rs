#![allow(non_snake_case)]
use num_traits::{Float, FloatConst, FromPrimitive, NumAssign};
use std::fmt::{Debug, Display, LowerExp};

/// Core traits for internal floating point values.
///
/// All arithmetic inside the homotopy engines is carried out on values
/// implementing this trait.  Implementations are provided for `f32` and
/// `f64`, but any type satisfying the bounds will do.
pub trait CoreFloatT:
    'static
    + Send
    + Sync
    + Float
    + FloatConst
    + NumAssign
    + Default
    + FromPrimitive
    + Display
    + LowerExp
    + Debug
    + Sized
{
}

impl<T> CoreFloatT for T where
    T: 'static
        + Send
        + Sync
        + Float
        + FloatConst
        + NumAssign
        + Default
        + FromPrimitive
        + Display
        + LowerExp
        + Debug
        + Sized
{
}

cfg_if::cfg_if! {
    if #[cfg(feature="serde")] {
        /// Main trait for floating point types used by the QP engines.
        ///
        /// `FloatT` relies on [`num_traits`](num_traits) for most of its
        /// constituent trait bounds.  With the `serde` feature enabled the
        /// type must additionally support (de)serialization so that problem
        /// data can be written to and read from json files.
        pub trait FloatT: CoreFloatT + serde::Serialize + serde::de::DeserializeOwned {}
        impl<T> FloatT for T where T: CoreFloatT + serde::Serialize + serde::de::DeserializeOwned {}
    } else {
        /// Main trait for floating point types used by the QP engines.
        ///
        /// `FloatT` relies on [`num_traits`](num_traits) for most of its
        /// constituent trait bounds.
        pub trait FloatT: CoreFloatT {}
        impl<T> FloatT for T where T: CoreFloatT {}
    }
}

/// Trait for converting Rust primitives to [`FloatT`](crate::algebra::FloatT)
///
/// Implemented on f32/64, u32/64 and usize.  Used internally for converting
/// constants, and by the [user settings](crate::solver::QPSettings) for
/// converting defaults of primitive type to [`FloatT`](crate::algebra::FloatT).

// NB: lets us write (2.0).as_T() on constants rather than
// T::from_f64(2.0).unwrap() everywhere
pub trait AsFloatT<T>: 'static {
    fn as_T(&self) -> T;
}

macro_rules! impl_as_FloatT {
    ($ty:ty, $ident:ident) => {
        impl<T> AsFloatT<T> for $ty
        where
            T: std::ops::Mul<T, Output = T> + FromPrimitive + 'static,
        {
            #[inline]
            fn as_T(&self) -> T {
                T::$ident(*self).unwrap()
            }
        }
    };
}
impl_as_FloatT!(u32, from_u32);
impl_as_FloatT!(u64, from_u64);
impl_as_FloatT!(usize, from_usize);
impl_as_FloatT!(f32, from_f32);
impl_as_FloatT!(f64, from_f64);
