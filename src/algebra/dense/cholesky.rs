use crate::algebra::{solve_upper_t, DenseFactorizationError, FloatT, GivensRotation, Matrix};

/// Computes the upper triangular factor `R'*R = S` of the leading
/// `k x k` block of `S`.  Only the upper triangle of `S` is referenced.
/// Pivots not exceeding `pivot_tol` are reported as a failure.
pub fn cholesky_upper<T: FloatT>(
    S: &Matrix<T>,
    k: usize,
    R: &mut Matrix<T>,
    pivot_tol: T,
) -> Result<(), DenseFactorizationError> {
    if k > S.m || k > S.n || k > R.m || k > R.n {
        return Err(DenseFactorizationError::IncompatibleDimension);
    }

    for j in 0..k {
        for i in 0..j {
            let mut v = S[(i, j)];
            for l in 0..i {
                v -= R[(l, i)] * R[(l, j)];
            }
            R[(i, j)] = v / R[(i, i)];
        }
        let mut d = S[(j, j)];
        for l in 0..j {
            d -= R[(l, j)] * R[(l, j)];
        }
        if !(d > pivot_tol) {
            return Err(DenseFactorizationError::Cholesky(j));
        }
        R[(j, j)] = d.sqrt();
        for i in (j + 1)..k {
            R[(i, j)] = T::zero();
        }
    }
    Ok(())
}

/// Grows the leading `k x k` factor `R` by one column.
///
/// On entry `r` holds the new column `v` of the factorised matrix
/// restricted to the first `k` rows, and `diag` holds its new
/// diagonal entry.  Returns `false` and leaves `R` untouched if the
/// extended matrix is not numerically positive definite.
pub fn cholesky_append_column<T: FloatT>(
    R: &mut Matrix<T>,
    k: usize,
    r: &mut [T],
    diag: T,
    pivot_tol: T,
) -> Result<bool, DenseFactorizationError> {
    if k >= R.m || k >= R.n {
        return Err(DenseFactorizationError::IncompatibleDimension);
    }
    solve_upper_t(R, k, r)?;

    let rr = r[0..k].iter().fold(T::zero(), |acc, &v| acc + v * v);
    let rho2 = diag - rr;
    if !(rho2 > pivot_tol) {
        return Ok(false);
    }

    for i in 0..k {
        R[(i, k)] = r[i];
        R[(k, i)] = T::zero();
    }
    R[(k, k)] = rho2.sqrt();
    Ok(true)
}

/// Removes column `p` from the leading `k x k` factor `R` and restores
/// upper triangular form with row rotations.  The factor shrinks to
/// `(k-1) x (k-1)`.
pub fn cholesky_remove_column<T: FloatT>(
    R: &mut Matrix<T>,
    k: usize,
    p: usize,
) -> Result<(), DenseFactorizationError> {
    if p >= k || k > R.m || k > R.n {
        return Err(DenseFactorizationError::IncompatibleDimension);
    }

    // shift columns left, leaving an upper Hessenberg block
    for j in p..(k - 1) {
        for i in 0..=(j + 1) {
            R[(i, j)] = R[(i, j + 1)];
        }
    }

    // rotate away the subdiagonal
    for j in p..(k - 1) {
        let (rot, r) = GivensRotation::zeroing(R[(j, j)], R[(j + 1, j)]);
        R[(j, j)] = r;
        R[(j + 1, j)] = T::zero();
        rot.rotate_rows(R, j, j + 1, (j + 1)..(k - 1));
    }

    for i in 0..k {
        R[(i, k - 1)] = T::zero();
        R[(k - 1, i)] = T::zero();
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::algebra::VectorMath;

    fn gram<T: FloatT>(R: &Matrix<T>, k: usize) -> Matrix<T> {
        let mut M = Matrix::zeros((k, k));
        for i in 0..k {
            for j in 0..k {
                for l in 0..k {
                    M[(i, j)] += R[(l, i)] * R[(l, j)];
                }
            }
        }
        M
    }

    #[test]
    fn test_cholesky() {
        #[rustfmt::skip]
        let S = Matrix::from(
            &[[ 8., -2., 4.],
              [-2., 12., 2.],
              [ 4.,  2., 6.]]);

        let mut R = Matrix::<f64>::zeros((3, 3));
        assert!(cholesky_upper(&S, 3, &mut R, 0.0).is_ok());
        assert!(R.is_triu());
        assert!(gram(&R, 3).data.norm_inf_diff(&S.data) < 1e-12);
    }

    #[test]
    fn test_cholesky_indefinite() {
        #[rustfmt::skip]
        let S = Matrix::from(
            &[[ 1.,  2.],
              [ 2.,  1.]]);

        let mut R = Matrix::<f64>::zeros((2, 2));
        assert_eq!(
            cholesky_upper(&S, 2, &mut R, 0.0),
            Err(DenseFactorizationError::Cholesky(1))
        );
    }

    #[test]
    fn test_cholesky_column_updates() {
        #[rustfmt::skip]
        let S = Matrix::from(
            &[[ 8., -2., 4.],
              [-2., 12., 2.],
              [ 4.,  2., 6.]]);

        // factor the leading 2x2 block, then append the third column
        let mut R = Matrix::<f64>::zeros((3, 3));
        cholesky_upper(&S, 2, &mut R, 0.0).unwrap();
        let mut r = [4., 2., 0.];
        assert!(cholesky_append_column(&mut R, 2, &mut r, 6., 0.0).unwrap());
        assert!(gram(&R, 3).data.norm_inf_diff(&S.data) < 1e-12);

        // drop the middle column: result factors S[[0,2],[0,2]]
        cholesky_remove_column(&mut R, 3, 1).unwrap();
        let G = gram(&R, 2);
        assert!((G[(0, 0)] - 8.).abs() < 1e-12);
        assert!((G[(0, 1)] - 4.).abs() < 1e-12);
        assert!((G[(1, 1)] - 6.).abs() < 1e-12);
        assert!(R[(1, 0)] == 0.);
    }
}
