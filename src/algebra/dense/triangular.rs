use crate::algebra::{DenseFactorizationError, FloatT, Matrix};

// Triangular solves on the leading blocks of preallocated
// square matrices.  Nothing here allocates.

/// Solves `R*x = b` in place, where `R` is the leading `k x k`
/// upper triangular block of `R`.
pub fn solve_upper<T: FloatT>(
    R: &Matrix<T>,
    k: usize,
    b: &mut [T],
) -> Result<(), DenseFactorizationError> {
    if k > R.m || b.len() < k {
        return Err(DenseFactorizationError::IncompatibleDimension);
    }
    for i in (0..k).rev() {
        let mut v = b[i];
        for j in (i + 1)..k {
            v -= R[(i, j)] * b[j];
        }
        let d = R[(i, i)];
        if d == T::zero() {
            return Err(DenseFactorizationError::SingularFactor(i));
        }
        b[i] = v / d;
    }
    Ok(())
}

/// Solves `R'*x = b` in place, where `R` is the leading `k x k`
/// upper triangular block of `R`.
pub fn solve_upper_t<T: FloatT>(
    R: &Matrix<T>,
    k: usize,
    b: &mut [T],
) -> Result<(), DenseFactorizationError> {
    if k > R.m || b.len() < k {
        return Err(DenseFactorizationError::IncompatibleDimension);
    }
    for i in 0..k {
        let mut v = b[i];
        for j in 0..i {
            v -= R[(j, i)] * b[j];
        }
        let d = R[(i, i)];
        if d == T::zero() {
            return Err(DenseFactorizationError::SingularFactor(i));
        }
        b[i] = v / d;
    }
    Ok(())
}

/// Solves `(R'*R)*x = b` in place
pub fn solve_normal<T: FloatT>(
    R: &Matrix<T>,
    k: usize,
    b: &mut [T],
) -> Result<(), DenseFactorizationError> {
    solve_upper_t(R, k, b)?;
    solve_upper(R, k, b)
}

/// A `k x k` reverse (anti) triangular block held in the first `k`
/// rows of a square matrix, starting at column `col0`.  Row `i` has
/// nonzeros only in the relative columns `k-1-i ..= k-1`.
pub struct ReverseTriangular<'a, T> {
    pub mat: &'a Matrix<T>,
    pub col0: usize,
    pub k: usize,
}

impl<'a, T> ReverseTriangular<'a, T>
where
    T: FloatT,
{
    pub fn new(mat: &'a Matrix<T>, col0: usize, k: usize) -> Self {
        Self { mat, col0, k }
    }

    #[inline]
    fn at(&self, i: usize, j: usize) -> T {
        self.mat[(i, self.col0 + j)]
    }

    /// Solves `T*x = b`
    pub fn solve(&self, b: &[T], x: &mut [T]) -> Result<(), DenseFactorizationError> {
        let k = self.k;
        if b.len() < k || x.len() < k || self.col0 + k > self.mat.n {
            return Err(DenseFactorizationError::IncompatibleDimension);
        }
        for i in 0..k {
            let p = k - 1 - i;
            let mut v = b[i];
            for j in (p + 1)..k {
                v -= self.at(i, j) * x[j];
            }
            let d = self.at(i, p);
            if d == T::zero() {
                return Err(DenseFactorizationError::SingularFactor(i));
            }
            x[p] = v / d;
        }
        Ok(())
    }

    /// Solves `T'*x = b`
    pub fn solve_t(&self, b: &[T], x: &mut [T]) -> Result<(), DenseFactorizationError> {
        let k = self.k;
        if b.len() < k || x.len() < k || self.col0 + k > self.mat.n {
            return Err(DenseFactorizationError::IncompatibleDimension);
        }
        for j in 0..k {
            let p = k - 1 - j;
            let mut v = b[j];
            for i in (p + 1)..k {
                v -= self.at(i, j) * x[i];
            }
            let d = self.at(p, j);
            if d == T::zero() {
                return Err(DenseFactorizationError::SingularFactor(j));
            }
            x[p] = v / d;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::algebra::{MatrixVectorMultiply, VectorMath};

    #[test]
    fn test_upper_solves() {
        #[rustfmt::skip]
        let R = Matrix::from(
            &[[2., 1., -1.],
              [0., 3.,  2.],
              [0., 0.,  4.]]);

        let xref = [1., -2., 3.];
        let mut b = [0.; 3];
        R.gemv(&mut b, &xref, 1.0, 0.0);
        solve_upper(&R, 3, &mut b).unwrap();
        assert!(b.norm_inf_diff(&xref) < 1e-14);

        let mut b = [0.; 3];
        R.gemv_t(&mut b, &xref, 1.0, 0.0);
        solve_upper_t(&R, 3, &mut b).unwrap();
        assert!(b.norm_inf_diff(&xref) < 1e-14);
    }

    #[test]
    fn test_reverse_triangular_solves() {
        // block sits in columns 1..3 of a 3x3 matrix
        #[rustfmt::skip]
        let M = Matrix::from(
            &[[9., 0., 2.],
              [9., 3., 1.],
              [9., 9., 9.]]);

        let T = ReverseTriangular::new(&M, 1, 2);
        let xref = [1., -1.];

        // T*x = [2*(-1), 3*1 + 1*(-1)]
        let b = [-2., 2.];
        let mut x = [0.; 2];
        T.solve(&b, &mut x).unwrap();
        assert!(x.norm_inf_diff(&xref) < 1e-14);

        // T'*x = [3*(-1), 2*1 + 1*(-1)]
        let b = [-3., 1.];
        T.solve_t(&b, &mut x).unwrap();
        assert!(x.norm_inf_diff(&xref) < 1e-14);
    }

    #[test]
    fn test_singular_factor() {
        let R = Matrix::<f64>::zeros((2, 2));
        let mut b = [1., 1.];
        assert_eq!(
            solve_upper(&R, 2, &mut b),
            Err(DenseFactorizationError::SingularFactor(1))
        );
    }
}
