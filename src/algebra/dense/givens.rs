use crate::algebra::{FloatT, Matrix};

/// Plane rotation acting on a pair of values as
/// ```text
/// [x'] = [ c  s] [x]
/// [y']   [-s  c] [y]
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GivensRotation<T> {
    pub c: T,
    pub s: T,
}

impl<T> GivensRotation<T>
where
    T: FloatT,
{
    pub fn identity() -> Self {
        Self {
            c: T::one(),
            s: T::zero(),
        }
    }

    /// Rotation mapping `(x, y)` onto `(r, 0)`.  Returns the rotation
    /// and `r = hypot(x, y)`.
    pub fn zeroing(x: T, y: T) -> (Self, T) {
        let r = T::hypot(x, y);
        if r == T::zero() {
            return (Self::identity(), T::zero());
        }
        (Self { c: x / r, s: y / r }, r)
    }

    #[inline]
    pub fn apply(&self, x: T, y: T) -> (T, T) {
        (self.c * x + self.s * y, self.c * y - self.s * x)
    }

    /// Rotates columns `(cx, cy)` of `M` over the given rows
    pub fn rotate_cols<I>(&self, M: &mut Matrix<T>, cx: usize, cy: usize, rows: I)
    where
        I: IntoIterator<Item = usize>,
    {
        for r in rows {
            let (x, y) = self.apply(M[(r, cx)], M[(r, cy)]);
            M[(r, cx)] = x;
            M[(r, cy)] = y;
        }
    }

    /// Rotates rows `(rx, ry)` of `M` over the given columns
    pub fn rotate_rows<I>(&self, M: &mut Matrix<T>, rx: usize, ry: usize, cols: I)
    where
        I: IntoIterator<Item = usize>,
    {
        for c in cols {
            let (x, y) = self.apply(M[(rx, c)], M[(ry, c)]);
            M[(rx, c)] = x;
            M[(ry, c)] = y;
        }
    }
}

#[test]
fn test_givens_zeroing() {
    let (rot, r) = GivensRotation::<f64>::zeroing(3.0, 4.0);
    assert_eq!(r, 5.0);
    let (x, y) = rot.apply(3.0, 4.0);
    assert!((x - 5.0).abs() < 1e-15);
    assert!(y.abs() < 1e-15);

    // degenerate input leaves everything untouched
    let (rot, r) = GivensRotation::<f64>::zeroing(0.0, 0.0);
    assert_eq!(r, 0.0);
    assert_eq!(rot.apply(1.0, 2.0), (1.0, 2.0));
}

#[test]
fn test_givens_preserves_norms() {
    #[rustfmt::skip]
    let mut M = Matrix::<f64>::from(
        &[[1., 2.],
          [3., 4.],
          [5., 6.]]);

    let (rot, _) = GivensRotation::zeroing(M[(0, 1)], M[(0, 0)]);
    rot.rotate_cols(&mut M, 1, 0, 0..3);
    assert!(M[(0, 0)].abs() < 1e-14);

    let n0 = (0..3).map(|r| M[(r, 0)].powi(2) + M[(r, 1)].powi(2)).sum::<f64>();
    assert!((n0 - 91.0).abs() < 1e-12);
}
