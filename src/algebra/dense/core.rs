use crate::algebra::{FloatT, Matrix, VectorMath};
use std::ops::{Index, IndexMut};

impl<T> Matrix<T>
where
    T: FloatT,
{
    pub fn zeros(size: (usize, usize)) -> Self {
        let (m, n) = size;
        let data = vec![T::zero(); m * n];
        Self { m, n, data }
    }

    pub fn identity(n: usize) -> Self {
        let mut mat = Matrix::zeros((n, n));
        mat.set_identity();
        mat
    }

    pub fn set_identity(&mut self) {
        assert!(self.m == self.n);
        self.data.set(T::zero());
        for i in 0..self.n {
            self[(i, i)] = T::one();
        }
    }

    /// Builds a matrix from a row major slice, e.g. data supplied as `A[i*n + j]`
    pub fn new_from_row_major(size: (usize, usize), src: &[T]) -> Self {
        let (m, n) = size;
        assert!(m * n == src.len());
        let mut mat = Matrix::zeros(size);
        for i in 0..m {
            for j in 0..n {
                mat[(i, j)] = src[i * n + j];
            }
        }
        mat
    }

    pub fn copy_from(&mut self, src: &Matrix<T>) -> &mut Self {
        assert!(self.size() == src.size());
        self.data.copy_from(&src.data);
        self
    }

    #[inline]
    pub fn nrows(&self) -> usize {
        self.m
    }

    #[inline]
    pub fn ncols(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn size(&self) -> (usize, usize) {
        (self.m, self.n)
    }

    pub fn is_square(&self) -> bool {
        self.m == self.n
    }

    #[inline]
    pub(crate) fn index_linear(&self, idx: (usize, usize)) -> usize {
        idx.0 + self.m * idx.1
    }

    pub fn col_slice(&self, col: usize) -> &[T] {
        assert!(col < self.n);
        &self.data[(col * self.m)..(col + 1) * self.m]
    }

    pub fn col_slice_mut(&mut self, col: usize) -> &mut [T] {
        assert!(col < self.n);
        &mut self.data[(col * self.m)..(col + 1) * self.m]
    }

    /// Copies row `row` into `out`
    pub fn row_to(&self, row: usize, out: &mut [T]) {
        assert!(row < self.m && out.len() == self.n);
        for (j, v) in out.iter_mut().enumerate() {
            *v = self[(row, j)];
        }
    }

    /// Inner product of row `row` with `x`
    pub fn row_dot(&self, row: usize, x: &[T]) -> T {
        assert!(x.len() == self.n);
        let mut out = T::zero();
        for (j, &xj) in x.iter().enumerate() {
            out += self[(row, j)] * xj;
        }
        out
    }

    pub fn is_triu(&self) -> bool {
        // check lower triangle for any nonzero entries
        for c in 0..self.ncols() {
            for r in (c + 1)..self.nrows() {
                if self[(r, c)] != T::zero() {
                    return false;
                }
            }
        }
        true
    }

    pub fn is_diagonal(&self) -> bool {
        for c in 0..self.ncols() {
            for r in 0..self.nrows() {
                if r != c && self[(r, c)] != T::zero() {
                    return false;
                }
            }
        }
        true
    }
}

impl<T> IndexMut<(usize, usize)> for Matrix<T>
where
    T: FloatT,
{
    #[inline]
    fn index_mut(&mut self, idx: (usize, usize)) -> &mut Self::Output {
        let lidx = self.index_linear(idx);
        &mut self.data[lidx]
    }
}

impl<T> Index<(usize, usize)> for Matrix<T>
where
    T: FloatT,
{
    type Output = T;
    #[inline]
    fn index(&self, idx: (usize, usize)) -> &Self::Output {
        &self.data[self.index_linear(idx)]
    }
}

impl<T, const R: usize, const C: usize> From<&[[T; C]; R]> for Matrix<T>
where
    T: FloatT,
{
    fn from(rows: &[[T; C]; R]) -> Self {
        let mut mat = Matrix::zeros((R, C));
        for (i, row) in rows.iter().enumerate() {
            for (j, &v) in row.iter().enumerate() {
                mat[(i, j)] = v;
            }
        }
        mat
    }
}

impl<T> std::fmt::Display for Matrix<T>
where
    T: FloatT,
{
    // This trait requires `fmt` with this exact signature.
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f)?;
        for i in 0..self.nrows() {
            write!(f, "[ ")?;
            for j in 0..self.ncols() {
                write!(f, " {:?}", self[(i, j)])?;
            }
            writeln!(f, "]")?;
        }
        writeln!(f)?;
        Ok(())
    }
}
