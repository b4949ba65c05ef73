#![allow(non_snake_case)]
use crate::algebra::{FloatT, Matrix, MatrixMath, MatrixVectorMultiply, VectorMath};

impl<T> MatrixVectorMultiply for Matrix<T>
where
    T: FloatT,
{
    type T = T;

    fn gemv(&self, y: &mut [T], x: &[T], a: T, b: T) {
        assert!(x.len() == self.n && y.len() == self.m);

        y.scale(b);
        for (j, &xj) in x.iter().enumerate() {
            if xj == T::zero() {
                continue;
            }
            let axj = a * xj;
            for (yi, &Aij) in y.iter_mut().zip(self.col_slice(j)) {
                *yi += axj * Aij;
            }
        }
    }

    fn gemv_t(&self, y: &mut [T], x: &[T], a: T, b: T) {
        assert!(x.len() == self.m && y.len() == self.n);

        for (j, yj) in y.iter_mut().enumerate() {
            *yj = a * self.col_slice(j).dot(x) + b * (*yj);
        }
    }
}

impl<T> MatrixMath for Matrix<T>
where
    T: FloatT,
{
    type T = T;

    fn scale(&mut self, c: T) {
        self.data.scale(c);
    }

    fn negate(&mut self) {
        self.data.negate();
    }

    fn max_abs_diag(&self) -> T {
        let k = usize::min(self.m, self.n);
        (0..k).fold(T::zero(), |acc, i| T::max(acc, self[(i, i)].abs()))
    }

    fn norm_inf(&self) -> T {
        self.data.norm_inf()
    }

    fn quad_form(&self, y: &[T], x: &[T]) -> T {
        assert!(y.len() == self.m && x.len() == self.n);
        let mut out = T::zero();
        for (j, &xj) in x.iter().enumerate() {
            out += xj * self.col_slice(j).dot(y);
        }
        out
    }

    fn is_symmetric(&self, tol: T) -> bool {
        if !self.is_square() {
            return false;
        }
        for c in 0..self.n {
            for r in (c + 1)..self.m {
                if (self[(r, c)] - self[(c, r)]).abs() > tol {
                    return false;
                }
            }
        }
        true
    }

    fn is_finite(&self) -> bool {
        self.data.is_finite()
    }
}

#[test]
fn test_gemv() {
    #[rustfmt::skip]
    let A = Matrix::from(
        &[[ 1.,  2.,  0.],
          [-1.,  3.,  4.]]);

    let x = [1., 2., 3.];
    let mut y = [1., 1.];
    A.gemv(&mut y, &x, 2.0, -1.0);
    assert_eq!(y, [9., 33.]);

    let z = [1., -2.];
    let mut w = [0.; 3];
    A.gemv_t(&mut w, &z, 1.0, 0.0);
    assert_eq!(w, [3., -4., -8.]);
}

#[test]
fn test_quad_form() {
    #[rustfmt::skip]
    let H = Matrix::from(
        &[[ 2.,  1.],
          [ 1.,  4.]]);

    assert!(H.is_symmetric(0.0));
    assert_eq!(H.quad_form(&[1., 2.], &[1., 2.]), 22.);
    assert_eq!(H.max_abs_diag(), 4.);
}
